//! 运行归档：保存已完成的时间序列以供对比。
//! The run archive: finished time series kept for side-by-side comparison.

use crate::congestion::Algorithm;
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::debug;

/// Max cwnd reported when there is no data at all.
const EMPTY_MAX_CWND: f64 = 10.0;

/// One point of a run's time series.
///
/// 运行时间序列中的一个点。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDataPoint {
    /// Number of rounds completed when the point was taken.
    pub time: u64,
    /// cwnd leaving the round, rounded to one decimal.
    pub cwnd: f64,
    pub ssthresh: u32,
}

/// An immutable archived copy of a completed run.
///
/// 已完成运行的不可变归档副本。
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmRun {
    pub algorithm: Algorithm,
    pub data: Vec<ChartDataPoint>,
    pub color: &'static str,
    /// `Start`, `Start2`, `Start3`, ... per algorithm.
    pub label: String,
    /// Unique series key of the run.
    pub run_id: String,
}

/// Archived runs in insertion order, which is also display order.
///
/// The runs live behind one shared slice that is only rebuilt when a run is
/// added or the archive is cleared, so snapshots share it without copying.
#[derive(Debug, Clone, Default)]
pub struct RunArchive {
    runs: Arc<[AlgorithmRun]>,
    /// Survives `clear` so run ids never repeat.
    sequence: u64,
}

impl RunArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps `data` into a run of `algorithm` and appends it. Returns `None`
    /// and archives nothing when `data` is empty.
    ///
    /// 将 `data` 包装为 `algorithm` 的一次运行并追加。`data` 为空时不归档。
    pub fn archive(&mut self, algorithm: Algorithm, data: Vec<ChartDataPoint>) -> Option<&AlgorithmRun> {
        if data.is_empty() {
            return None;
        }

        let run = AlgorithmRun {
            algorithm,
            label: self.next_label(algorithm),
            color: algorithm.color(),
            run_id: self.next_run_id(algorithm),
            data,
        };
        debug!(
            run_id = %run.run_id,
            label = %run.label,
            points = run.data.len(),
            "Run archived"
        );
        let mut runs = self.runs.to_vec();
        runs.push(run);
        self.runs = runs.into();
        self.runs.last()
    }

    /// The label the next archived run of `algorithm` will carry.
    pub fn next_label(&self, algorithm: Algorithm) -> String {
        self.ordinal_label(algorithm, algorithm.label())
    }

    /// `base` for the first run of `algorithm`, then `base2`, `base3`, ...
    pub fn ordinal_label(&self, algorithm: Algorithm, base: &str) -> String {
        let existing = self.runs_for(algorithm).count();
        if existing == 0 {
            base.to_string()
        } else {
            format!("{base}{}", existing + 1)
        }
    }

    fn next_run_id(&mut self, algorithm: Algorithm) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let id = format!("{}-{}-{}", algorithm.id(), millis, self.sequence);
        self.sequence += 1;
        id
    }

    pub fn runs(&self) -> &[AlgorithmRun] {
        &self.runs
    }

    /// A shared handle to the current runs.
    pub fn shared(&self) -> Arc<[AlgorithmRun]> {
        Arc::clone(&self.runs)
    }

    pub fn runs_for(&self, algorithm: Algorithm) -> impl Iterator<Item = &AlgorithmRun> {
        self.runs.iter().filter(move |run| run.algorithm == algorithm)
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn clear(&mut self) {
        self.runs = Arc::default();
        debug!("Run archive cleared");
    }
}

/// cwnd statistics across the live series and every archived run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CwndSummary {
    pub max_cwnd: f64,
    /// Mean cwnd rounded to one decimal.
    pub avg_cwnd: f64,
    pub samples: usize,
}

/// Summarizes cwnd over `live` and `runs`. With no samples the max is 10 and
/// the average 0.
pub fn summarize(live: &[ChartDataPoint], runs: &[AlgorithmRun]) -> CwndSummary {
    let values = live
        .iter()
        .chain(runs.iter().flat_map(|run| run.data.iter()))
        .map(|point| point.cwnd);

    let (count, sum, max) = values.fold((0usize, 0.0f64, f64::MIN), |(count, sum, max), v| {
        (count + 1, sum + v, max.max(v))
    });

    if count == 0 {
        return CwndSummary {
            max_cwnd: EMPTY_MAX_CWND,
            avg_cwnd: 0.0,
            samples: 0,
        };
    }

    CwndSummary {
        max_cwnd: max,
        avg_cwnd: (sum / count as f64 * 10.0).round() / 10.0,
        samples: count,
    }
}

/// Which series an overlay point belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesKey {
    Live,
    Run(String),
}

/// A point on the shared comparison time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPoint {
    pub time: u64,
    pub series: SeriesKey,
    pub cwnd: f64,
    /// Only the live series carries its threshold.
    pub ssthresh: Option<u32>,
}

/// Lays archived runs end to end on one time axis, followed by the live
/// series. Each run is shifted past the previous run's last time.
///
/// 将归档运行首尾相接排列在同一时间轴上，然后是实时序列。
pub fn overlay(runs: &[AlgorithmRun], live: &[ChartDataPoint]) -> Vec<OverlayPoint> {
    let total = live.len() + runs.iter().map(|run| run.data.len()).sum::<usize>();
    let mut points = Vec::with_capacity(total);
    let mut offset = 0;

    for run in runs {
        points.extend(run.data.iter().map(|point| OverlayPoint {
            time: offset + point.time,
            series: SeriesKey::Run(run.run_id.clone()),
            cwnd: point.cwnd,
            ssthresh: None,
        }));
        offset += run.data.iter().map(|point| point.time).max().unwrap_or(0) + 1;
    }

    points.extend(live.iter().map(|point| OverlayPoint {
        time: offset + point.time,
        series: SeriesKey::Live,
        cwnd: point.cwnd,
        ssthresh: Some(point.ssthresh),
    }));
    points
}
