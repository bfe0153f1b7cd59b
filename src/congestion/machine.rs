//! 拥塞状态机 - 每回合应用一次转换
//! Congestion state machine - applies one transition per round
//!
//! 职责：
//! - 丢包响应（按所选算法）
//! - 成功回合的窗口增长（按当前阶段）
//! - 窗口边界约束

use super::{Algorithm, NetworkState, Phase};
use crate::{
    config::{SimulationParameters, WindowConfig},
    event::{EventKind, EventLog, SimulationEvent},
};
use tracing::{debug, trace};

/// Divisor used for the `1/cwnd` growth term when cwnd is not positive.
const DIVISOR_FLOOR: f64 = 1.0;

/// The result of one round.
///
/// 单个回合的决策结果。
#[derive(Debug, Clone)]
pub struct RoundDecision {
    /// Whether the round's packet was lost.
    pub lost: bool,
    /// Events of the round in emission order, one or two of them.
    pub events: Vec<SimulationEvent>,
}

/// Holds the live [`NetworkState`] and applies one algorithm-specific
/// transition per round.
///
/// 持有实时网络状态，并在每个回合应用一次特定于算法的转换。
#[derive(Debug, Clone)]
pub struct CongestionMachine {
    pub(super) state: NetworkState,
    window: WindowConfig,
}

impl CongestionMachine {
    pub fn new(parameters: &SimulationParameters, window: WindowConfig) -> Self {
        Self {
            state: NetworkState::initial(parameters),
            window,
        }
    }

    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    /// Replaces the state wholesale with a fresh one.
    pub fn reset(&mut self, parameters: &SimulationParameters) {
        self.state = NetworkState::initial(parameters);
        debug!(state = %self.state, "Congestion state reset");
    }

    /// Applies one round. `round` is the index active when the round starts
    /// and stamps every event the round emits.
    ///
    /// 应用一个回合。`round` 是回合开始时的索引，用于标记本回合产生的所有事件。
    pub fn step(&mut self, algorithm: Algorithm, lost: bool, round: u64) -> RoundDecision {
        let mut log = EventLog::new();
        let mut emit = |kind: EventKind, description: String| log.record(round, kind, description);

        self.state.total_packets_sent += 1;

        if lost {
            self.state.total_packets_lost += 1;
            emit(
                EventKind::PacketLoss,
                format!("Packet loss detected at t={round}"),
            );
            self.handle_packet_loss(algorithm, &mut emit);
        } else {
            self.handle_ack(&mut emit);
        }

        self.clamp_window();

        if !lost {
            emit(
                EventKind::AckReceived,
                format!("cwnd = {}", (self.state.cwnd * 10.0).floor() / 10.0),
            );
        }

        trace!(round, lost, state = %self.state, "Round applied");

        RoundDecision {
            lost,
            events: log.into_events(),
        }
    }

    fn handle_packet_loss(&mut self, algorithm: Algorithm, emit: &mut impl FnMut(EventKind, String)) {
        match algorithm {
            Algorithm::SlowStart => {
                self.state.ssthresh = self.halved_threshold();
                self.state.cwnd = 1.0;
                self.state.phase = Phase::SlowStart;
                emit(
                    EventKind::SlowStartReset,
                    format!("ssthresh set to {}, cwnd reset to 1", self.state.ssthresh),
                );
            }
            Algorithm::CongestionAvoidance => {
                self.state.ssthresh = self.halved_threshold();
                self.state.cwnd = 1.0;
                self.state.phase = Phase::SlowStart;
                emit(
                    EventKind::CongestionAvoidanceReset,
                    "Returning to Slow Start".to_string(),
                );
            }
            Algorithm::FastRetransmit => {
                // The retransmission is a second packet on the wire this round.
                self.state.total_packets_sent += 1;
                emit(
                    EventKind::FastRetransmit,
                    "Retransmitting lost packet immediately".to_string(),
                );
            }
            Algorithm::FastRecovery => {
                self.state.ssthresh = self.halved_threshold();
                self.state.cwnd = f64::from(
                    self.state
                        .ssthresh
                        .saturating_add(self.window.fast_recovery_inflation),
                );
                self.state.phase = Phase::FastRecovery;
                emit(
                    EventKind::FastRecovery,
                    format!("cwnd reduced to {}", self.state.cwnd),
                );
            }
        }

        debug!(
            %algorithm,
            new_ssthresh = self.state.ssthresh,
            new_cwnd = self.state.cwnd,
            "Packet loss handled"
        );
    }

    fn handle_ack(&mut self, emit: &mut impl FnMut(EventKind, String)) {
        let threshold = f64::from(self.state.ssthresh);

        if self.state.cwnd < threshold {
            self.state.cwnd += 1.0;
            self.state.phase = Phase::SlowStart;
            trace!(cwnd = self.state.cwnd, "Slow start: cwnd increased");
            if self.state.cwnd >= threshold {
                self.state.phase = Phase::CongestionAvoidance;
                emit(
                    EventKind::PhaseChange,
                    "Entering Congestion Avoidance".to_string(),
                );
                debug!(cwnd = self.state.cwnd, "Phase changed to congestion avoidance");
            }
        } else if self.state.phase == Phase::FastRecovery {
            self.state.cwnd += 1.0 / self.growth_divisor();
            trace!(cwnd = self.state.cwnd, "Fast recovery: cwnd increased");
            if self.state.cwnd >= threshold {
                self.state.phase = Phase::CongestionAvoidance;
                emit(
                    EventKind::RecoveryComplete,
                    "Returning to Congestion Avoidance".to_string(),
                );
                debug!(cwnd = self.state.cwnd, "Fast recovery complete");
            }
        } else {
            self.state.cwnd += 1.0 / self.growth_divisor();
            self.state.phase = Phase::CongestionAvoidance;
            trace!(cwnd = self.state.cwnd, "Congestion avoidance: cwnd increased");
        }
    }

    /// `max(min_ssthresh, floor(cwnd / 2))`
    fn halved_threshold(&self) -> u32 {
        let half = (self.state.cwnd.max(0.0) / 2.0).floor() as u32;
        half.max(self.window.min_ssthresh)
    }

    fn growth_divisor(&self) -> f64 {
        if self.state.cwnd > 0.0 {
            self.state.cwnd
        } else {
            DIVISOR_FLOOR
        }
    }

    fn clamp_window(&mut self) {
        let cwnd = if self.state.cwnd.is_nan() {
            self.window.min_cwnd
        } else {
            self.state.cwnd
        };
        self.state.cwnd = cwnd.clamp(self.window.min_cwnd, self.window.max_cwnd);
        self.state.ssthresh = self.state.ssthresh.max(self.window.min_ssthresh);
        self.state.packets_in_flight = self.state.cwnd.floor() as u32;
    }
}
