//! tests/common/harness.rs
use congestion_sim::{
    config::{Config, SimulationParameters},
    loss::{LossOracle, RandomLoss},
    Simulator, SimulatorHandle,
};
use std::sync::Once;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter = std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "congestion_sim=debug".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::FULL)
            .with_test_writer()
            .init();
    });
}

/// Builds a config with the given window parameters and loss rate.
pub fn config(initial_cwnd: u32, ssthresh: u32, packet_loss_rate: f64, rtt_ms: u64) -> Config {
    Config {
        parameters: SimulationParameters {
            initial_cwnd,
            ssthresh,
            packet_loss_rate,
            rtt: Duration::from_millis(rtt_ms),
        },
        ..Default::default()
    }
}

/// Creates a simulator with a fixed seed so runs replay exactly.
pub fn seeded_simulator(config: Config, seed: u64) -> Simulator<RandomLoss> {
    init_tracing();
    Simulator::with_oracle(config, RandomLoss::from_seed(seed)).unwrap()
}

/// Spawns a simulator task driven by `oracle`.
pub fn spawn_with<L: LossOracle>(config: Config, oracle: L) -> SimulatorHandle {
    init_tracing();
    SimulatorHandle::spawn(Simulator::with_oracle(config, oracle).unwrap())
}
