//! The live network state a run mutates once per round.

use crate::config::SimulationParameters;
use std::fmt;

/// The growth rule currently governing a delivered round.
///
/// 当前支配成功回合窗口增长的阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// 慢启动阶段
    /// Slow start phase
    SlowStart,
    /// 拥塞避免阶段
    /// Congestion avoidance phase
    CongestionAvoidance,
    /// 快速恢复阶段
    /// Fast recovery phase
    FastRecovery,
}

impl Phase {
    pub fn id(self) -> &'static str {
        match self {
            Phase::SlowStart => "slow-start",
            Phase::CongestionAvoidance => "congestion-avoidance",
            Phase::FastRecovery => "fast-recovery",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Snapshot of the simulated connection.
///
/// Invariants held after every round: `1 <= cwnd <= 64`, `ssthresh >= 2`
/// and `total_packets_lost <= total_packets_sent`.
///
/// 模拟连接的状态快照。
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkState {
    /// 当前拥塞窗口
    /// Current congestion window
    pub cwnd: f64,
    /// 慢启动阈值
    /// Slow start threshold
    pub ssthresh: u32,
    pub phase: Phase,
    /// `floor(cwnd)` at the end of the last round.
    pub packets_in_flight: u32,
    pub total_packets_sent: u64,
    pub total_packets_lost: u64,
}

impl NetworkState {
    /// The state a fresh run starts from.
    pub fn initial(parameters: &SimulationParameters) -> Self {
        Self {
            cwnd: f64::from(parameters.initial_cwnd),
            ssthresh: parameters.ssthresh,
            phase: Phase::SlowStart,
            packets_in_flight: 0,
            total_packets_sent: 0,
            total_packets_lost: 0,
        }
    }

    /// Lost packets as a percentage of sent packets, 0 before anything was sent.
    pub fn observed_loss_rate(&self) -> f64 {
        if self.total_packets_sent == 0 {
            return 0.0;
        }
        self.total_packets_lost as f64 / self.total_packets_sent as f64 * 100.0
    }
}

impl fmt::Display for NetworkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Network[cwnd:{:.1}, ssthresh:{}, phase:{}, in_flight:{}, sent:{}, lost:{}]",
            self.cwnd,
            self.ssthresh,
            self.phase,
            self.packets_in_flight,
            self.total_packets_sent,
            self.total_packets_lost
        )
    }
}
