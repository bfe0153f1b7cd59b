//! The user-selected loss-response policies.

use crate::error::{Error, Result};
use std::{fmt, str::FromStr};

/// A user-selectable congestion control strategy.
///
/// The algorithm only picks how a loss is answered. How the window grows on
/// a delivered round is governed by the current [`Phase`](super::Phase),
/// which is tracked separately.
///
/// 用户可选择的拥塞控制策略。算法只决定如何响应丢包；成功回合的窗口增长由当前阶段决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Halve into ssthresh and restart from a window of one.
    #[default]
    SlowStart,
    /// Same arithmetic as slow start, modelling a timeout fallback.
    CongestionAvoidance,
    /// Leave the window alone and resend the lost packet at once.
    FastRetransmit,
    /// Halve into ssthresh and inflate the window by three segments.
    FastRecovery,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::SlowStart,
        Algorithm::CongestionAvoidance,
        Algorithm::FastRetransmit,
        Algorithm::FastRecovery,
    ];

    /// The stable string id of the algorithm.
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::SlowStart => "slow-start",
            Algorithm::CongestionAvoidance => "congestion-avoidance",
            Algorithm::FastRetransmit => "fast-retransmit",
            Algorithm::FastRecovery => "fast-recovery",
        }
    }

    /// The human-readable name, also the base label of the live series.
    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::SlowStart => "Slow Start",
            Algorithm::CongestionAvoidance => "Congestion Avoidance",
            Algorithm::FastRetransmit => "Fast Retransmit",
            Algorithm::FastRecovery => "Fast Recovery",
        }
    }

    /// The base label of archived runs of this algorithm.
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::SlowStart => "Start",
            Algorithm::CongestionAvoidance => "Avoidance",
            Algorithm::FastRetransmit => "Retransmit",
            Algorithm::FastRecovery => "Recovery",
        }
    }

    /// The fixed series color of this algorithm.
    pub fn color(self) -> &'static str {
        match self {
            Algorithm::SlowStart => "#3b82f6",
            Algorithm::CongestionAvoidance => "#ef4444",
            Algorithm::FastRetransmit => "#1f2937",
            Algorithm::FastRecovery => "#22c55e",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.id() == s)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}
