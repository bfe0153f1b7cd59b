//! 模拟器核心：组合状态机、丢包判定、事件记录器和运行归档。
//! The simulation core: composes the state machine, the loss oracle, the
//! event recorder and the run archive.
//!
//! A [`Simulator`] exclusively owns the network state, the live time series
//! and the event log. The three are only ever mutated together, through
//! [`Simulator::step`], [`Simulator::set_algorithm`] or [`Simulator::reset`],
//! so a reader holding `&Simulator` never sees a half-applied round.

use crate::{
    archive::{self, AlgorithmRun, ChartDataPoint, CwndSummary, OverlayPoint, RunArchive},
    config::{Config, SimulationParameters},
    congestion::{Algorithm, CongestionMachine, NetworkState},
    error::Result,
    event::{EventLog, SimulationEvent},
    loss::{LossOracle, RandomLoss},
};
use std::sync::Arc;
use tracing::debug;

/// What a single call to [`Simulator::step`] did.
///
/// 单次推进回合的结果。
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// Rounds completed after this one.
    pub round: u64,
    pub lost: bool,
    pub state: NetworkState,
    pub point: ChartDataPoint,
    pub events: Vec<SimulationEvent>,
}

/// A read-only copy of everything an external consumer displays.
///
/// Only the live series is copied in full. The events are the display tail
/// and the archived runs are shared with the simulator.
///
/// 外部使用者展示所需的全部内容的只读副本。
#[derive(Debug, Clone)]
pub struct SimulationSnapshot {
    pub algorithm: Algorithm,
    pub parameters: SimulationParameters,
    pub round: u64,
    pub running: bool,
    pub state: NetworkState,
    pub series: Vec<ChartDataPoint>,
    /// The last `display_limit` events, oldest first.
    pub events: Vec<SimulationEvent>,
    pub runs: Arc<[AlgorithmRun]>,
}

/// The round-stepping simulator.
#[derive(Debug)]
pub struct Simulator<L: LossOracle = RandomLoss> {
    config: Config,
    algorithm: Algorithm,
    machine: CongestionMachine,
    round: u64,
    series: Vec<ChartDataPoint>,
    events: EventLog,
    archive: RunArchive,
    oracle: L,
}

impl Simulator<RandomLoss> {
    /// Creates a simulator drawing losses from an entropy-seeded source.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_oracle(config, RandomLoss::from_entropy())
    }
}

impl<L: LossOracle> Simulator<L> {
    /// Creates a simulator drawing losses from `oracle`. Fails if the window
    /// bounds are inconsistent or the parameters are out of range.
    ///
    /// 使用 `oracle` 创建模拟器。窗口边界不一致或参数超出范围时失败。
    pub fn with_oracle(config: Config, oracle: L) -> Result<Self> {
        config.validate()?;
        let machine = CongestionMachine::new(&config.parameters, config.window.clone());
        Ok(Self {
            config,
            algorithm: Algorithm::default(),
            machine,
            round: 0,
            series: Vec::new(),
            events: EventLog::new(),
            archive: RunArchive::new(),
            oracle,
        })
    }

    /// Advances the simulation by one round.
    ///
    /// The state update, the event appends and the time series append of the
    /// round all happen inside this call.
    ///
    /// 推进一个回合。状态更新、事件追加和时间序列追加都在此调用内完成。
    pub fn step(&mut self) -> RoundReport {
        let lost = self.oracle.is_lost(self.config.parameters.packet_loss_rate);
        let decision = self.machine.step(self.algorithm, lost, self.round);

        self.events.extend(decision.events.iter().cloned());
        self.round += 1;

        let state = self.machine.state();
        let point = ChartDataPoint {
            time: self.round,
            cwnd: (state.cwnd * 10.0).round() / 10.0,
            ssthresh: state.ssthresh,
        };
        self.series.push(point);

        RoundReport {
            round: self.round,
            lost,
            state: state.clone(),
            point,
            events: decision.events,
        }
    }

    /// Selects the active algorithm. A change archives the live run under the
    /// previous algorithm and starts a fresh one. Returns whether it changed.
    ///
    /// 选择当前算法。变化时将实时运行归档到之前的算法下并开始新的运行。
    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> bool {
        if algorithm == self.algorithm {
            return false;
        }
        let previous = self.algorithm;
        self.algorithm = algorithm;
        self.archive_and_reset(previous);
        true
    }

    /// Archives the live series as a run of `previous` (when it has points)
    /// and resets the round counter, series, event log and network state.
    /// The archive itself is kept.
    pub fn archive_and_reset(&mut self, previous: Algorithm) {
        let data = std::mem::take(&mut self.series);
        self.archive.archive(previous, data);
        self.clear_live();
        debug!(%previous, next = %self.algorithm, runs = self.archive.len(), "Archived run and reset");
    }

    /// Full reset: everything [`archive_and_reset`](Self::archive_and_reset)
    /// clears, plus the whole archive.
    pub fn reset(&mut self) {
        self.archive.clear();
        self.clear_live();
        debug!("Simulator reset");
    }

    fn clear_live(&mut self) {
        self.round = 0;
        self.series.clear();
        self.events.clear();
        self.machine.reset(&self.config.parameters);
    }

    /// Replaces the parameters after validating them. The loss rate applies
    /// from the next round; the initial window and threshold apply at the
    /// next reset or algorithm switch.
    pub fn set_parameters(&mut self, parameters: SimulationParameters) -> Result<()> {
        parameters.validate(&self.config.window)?;
        debug!(?parameters, "Parameters updated");
        self.config.parameters = parameters;
        Ok(())
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.config.parameters
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Rounds completed in the live run.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn state(&self) -> &NetworkState {
        self.machine.state()
    }

    pub fn series(&self) -> &[ChartDataPoint] {
        &self.series
    }

    pub fn events(&self) -> &[SimulationEvent] {
        self.events.events()
    }

    /// The display tail of the event log.
    pub fn recent_events(&self) -> &[SimulationEvent] {
        self.events.recent(self.config.events.display_limit)
    }

    pub fn runs(&self) -> &[AlgorithmRun] {
        self.archive.runs()
    }

    /// The legend label of the live series: the full algorithm name with the
    /// same ordinal the run will get once archived (`Slow Start`,
    /// `Slow Start2`, ...). Archived runs use the short label instead.
    pub fn live_label(&self) -> String {
        self.archive
            .ordinal_label(self.algorithm, self.algorithm.display_name())
    }

    pub fn summary(&self) -> CwndSummary {
        archive::summarize(&self.series, self.archive.runs())
    }

    pub fn overlay(&self) -> Vec<OverlayPoint> {
        archive::overlay(self.archive.runs(), &self.series)
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            algorithm: self.algorithm,
            parameters: self.config.parameters.clone(),
            round: self.round,
            running: false,
            state: self.machine.state().clone(),
            series: self.series.clone(),
            events: self.recent_events().to_vec(),
            runs: self.archive.shared(),
        }
    }
}
