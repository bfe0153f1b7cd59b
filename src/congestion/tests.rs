//! Tests for the congestion state machine.
use super::{Algorithm, CongestionMachine, Phase};
use crate::config::{SimulationParameters, WindowConfig};
use crate::event::{EventColor, EventKind};
use std::str::FromStr;

fn test_parameters() -> SimulationParameters {
    SimulationParameters {
        initial_cwnd: 2,
        ssthresh: 16,
        packet_loss_rate: 0.0,
        ..Default::default()
    }
}

fn machine() -> CongestionMachine {
    CongestionMachine::new(&test_parameters(), WindowConfig::default())
}

fn kinds(decision: &super::RoundDecision) -> Vec<EventKind> {
    decision.events.iter().map(|e| e.kind).collect()
}

#[test]
fn test_initial_state() {
    let machine = machine();
    let state = machine.state();
    assert_eq!(state.cwnd, 2.0);
    assert_eq!(state.ssthresh, 16);
    assert_eq!(state.phase, Phase::SlowStart);
    assert_eq!(state.packets_in_flight, 0);
    assert_eq!(state.total_packets_sent, 0);
    assert_eq!(state.total_packets_lost, 0);
}

#[test]
fn test_slow_start_growth_on_ack() {
    let mut machine = machine();

    let decision = machine.step(Algorithm::SlowStart, false, 0);
    assert_eq!(machine.state().cwnd, 3.0);
    assert_eq!(machine.state().packets_in_flight, 3);
    assert_eq!(machine.state().phase, Phase::SlowStart);
    assert_eq!(kinds(&decision), vec![EventKind::AckReceived]);
    assert_eq!(decision.events[0].description, "cwnd = 3");
    assert_eq!(decision.events[0].time, 0);
}

#[test]
fn test_transition_to_congestion_avoidance() {
    let mut machine = machine();
    machine.state.cwnd = 15.0;

    let decision = machine.step(Algorithm::SlowStart, false, 13);
    assert_eq!(machine.state().cwnd, 16.0);
    assert_eq!(machine.state().phase, Phase::CongestionAvoidance);
    assert_eq!(
        kinds(&decision),
        vec![EventKind::PhaseChange, EventKind::AckReceived]
    );

    // Linear growth from here on.
    machine.step(Algorithm::SlowStart, false, 14);
    assert!((machine.state().cwnd - (16.0 + 1.0 / 16.0)).abs() < 1e-9);
    assert_eq!(machine.state().phase, Phase::CongestionAvoidance);
}

#[test]
fn test_ack_description_floors_to_one_decimal() {
    let mut machine = machine();
    machine.state.cwnd = 16.0;
    machine.state.ssthresh = 2;
    machine.state.phase = Phase::CongestionAvoidance;

    let decision = machine.step(Algorithm::SlowStart, false, 0);
    // 16.0625 floors to 16.0
    assert_eq!(decision.events[0].description, "cwnd = 16");

    machine.state.cwnd = 4.0;
    let decision = machine.step(Algorithm::SlowStart, false, 1);
    // 4.25 floors to 4.2
    assert_eq!(decision.events[0].description, "cwnd = 4.2");
}

#[test]
fn test_slow_start_loss_resets_window() {
    let mut machine = machine();
    machine.state.cwnd = 12.0;

    let decision = machine.step(Algorithm::SlowStart, true, 5);
    let state = machine.state();
    assert_eq!(state.ssthresh, 6);
    assert_eq!(state.cwnd, 1.0);
    assert_eq!(state.phase, Phase::SlowStart);
    assert_eq!(state.total_packets_lost, 1);
    assert_eq!(state.total_packets_sent, 1);
    assert_eq!(state.packets_in_flight, 1);
    assert_eq!(
        kinds(&decision),
        vec![EventKind::PacketLoss, EventKind::SlowStartReset]
    );
    assert_eq!(decision.events[0].description, "Packet loss detected at t=5");
    assert_eq!(decision.events[1].description, "ssthresh set to 6, cwnd reset to 1");
}

#[test]
fn test_congestion_avoidance_loss_falls_back_to_slow_start() {
    let mut machine = machine();
    machine.state.cwnd = 20.5;
    machine.state.phase = Phase::CongestionAvoidance;

    let decision = machine.step(Algorithm::CongestionAvoidance, true, 9);
    assert_eq!(machine.state().ssthresh, 10);
    assert_eq!(machine.state().cwnd, 1.0);
    assert_eq!(machine.state().phase, Phase::SlowStart);
    assert_eq!(
        kinds(&decision),
        vec![EventKind::PacketLoss, EventKind::CongestionAvoidanceReset]
    );
    assert_eq!(decision.events[1].description, "Returning to Slow Start");
}

#[test]
fn test_fast_retransmit_keeps_window() {
    let mut machine = machine();
    machine.state.cwnd = 9.0;
    machine.state.phase = Phase::CongestionAvoidance;

    let decision = machine.step(Algorithm::FastRetransmit, true, 3);
    let state = machine.state();
    assert_eq!(state.cwnd, 9.0);
    assert_eq!(state.ssthresh, 16);
    assert_eq!(state.phase, Phase::CongestionAvoidance);
    assert_eq!(state.total_packets_sent, 2);
    assert_eq!(state.total_packets_lost, 1);
    assert_eq!(
        kinds(&decision),
        vec![EventKind::PacketLoss, EventKind::FastRetransmit]
    );
}

#[test]
fn test_fast_recovery_loss_at_cwnd_eight() {
    let mut machine = machine();
    machine.state.cwnd = 8.0;

    let decision = machine.step(Algorithm::FastRecovery, true, 4);
    assert_eq!(machine.state().ssthresh, 4);
    assert_eq!(machine.state().cwnd, 7.0);
    assert_eq!(machine.state().phase, Phase::FastRecovery);
    assert_eq!(
        kinds(&decision),
        vec![EventKind::PacketLoss, EventKind::FastRecovery]
    );
    assert_eq!(decision.events[1].description, "cwnd reduced to 7");
    assert_eq!(decision.events[0].color, EventColor::Error);
    assert_eq!(decision.events[1].color, EventColor::Warning);
    assert!(decision.events.iter().all(|e| e.time == 4));
}

#[test]
fn test_fast_recovery_completes_on_next_ack() {
    let mut machine = machine();
    machine.state.cwnd = 8.0;
    machine.step(Algorithm::FastRecovery, true, 0);

    let decision = machine.step(Algorithm::FastRecovery, false, 1);
    assert!((machine.state().cwnd - (7.0 + 1.0 / 7.0)).abs() < 1e-9);
    assert_eq!(machine.state().phase, Phase::CongestionAvoidance);
    assert_eq!(
        kinds(&decision),
        vec![EventKind::RecoveryComplete, EventKind::AckReceived]
    );
}

#[test]
fn test_fast_recovery_at_threshold_completes() {
    let mut machine = machine();
    machine.state.phase = Phase::FastRecovery;
    machine.state.cwnd = 10.0;
    machine.state.ssthresh = 10;

    // At the threshold the recovery growth step runs and completes at once.
    machine.step(Algorithm::FastRecovery, false, 0);
    assert_eq!(machine.state().phase, Phase::CongestionAvoidance);
}

#[test]
fn test_ssthresh_floor_on_small_window() {
    let mut machine = machine();
    machine.state.cwnd = 1.0;

    machine.step(Algorithm::SlowStart, true, 0);
    assert_eq!(machine.state().ssthresh, 2);

    machine.state.cwnd = 3.0;
    machine.step(Algorithm::FastRecovery, true, 1);
    assert_eq!(machine.state().ssthresh, 2);
    assert_eq!(machine.state().cwnd, 5.0);
}

#[test]
fn test_window_clamped_at_ceiling() {
    let parameters = SimulationParameters {
        initial_cwnd: 64,
        ssthresh: 64,
        ..test_parameters()
    };
    let mut machine = CongestionMachine::new(&parameters, WindowConfig::default());

    for round in 0..10 {
        machine.step(Algorithm::SlowStart, false, round);
        assert_eq!(machine.state().cwnd, 64.0);
        assert_eq!(machine.state().packets_in_flight, 64);
    }
}

#[test]
fn test_zero_window_does_not_divide_by_zero() {
    let mut machine = machine();
    machine.state.cwnd = 0.0;
    machine.state.ssthresh = 0;
    machine.state.phase = Phase::CongestionAvoidance;

    machine.step(Algorithm::SlowStart, false, 0);
    let state = machine.state();
    assert!(state.cwnd.is_finite());
    assert!(state.cwnd >= 1.0);
    assert!(state.ssthresh >= 2);
}

#[test]
fn test_reset_restores_initial_state() {
    let mut machine = machine();
    for round in 0..5 {
        machine.step(Algorithm::FastRetransmit, round % 2 == 0, round);
    }
    machine.reset(&test_parameters());
    assert_eq!(machine.state().cwnd, 2.0);
    assert_eq!(machine.state().total_packets_sent, 0);
    assert_eq!(machine.state().phase, Phase::SlowStart);
}

#[test]
fn test_observed_loss_rate() {
    let mut machine = machine();
    assert_eq!(machine.state().observed_loss_rate(), 0.0);
    machine.step(Algorithm::SlowStart, true, 0);
    machine.step(Algorithm::SlowStart, false, 1);
    assert_eq!(machine.state().observed_loss_rate(), 50.0);
}

#[test]
fn test_algorithm_ids_round_trip() {
    for algorithm in Algorithm::ALL {
        assert_eq!(Algorithm::from_str(algorithm.id()), Ok(algorithm));
    }
    assert!(Algorithm::from_str("cubic").is_err());
    assert_eq!(Algorithm::FastRecovery.label(), "Recovery");
    assert_eq!(Algorithm::FastRecovery.display_name(), "Fast Recovery");
    assert_eq!(Algorithm::CongestionAvoidance.color(), "#ef4444");
}
