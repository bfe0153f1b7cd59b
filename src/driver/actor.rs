//! The task that owns the simulator and its continuous-mode timer.

use super::command::DriverCommand;
use crate::{
    loss::LossOracle,
    simulator::{SimulationSnapshot, Simulator},
};
use std::time::Duration;
use tokio::{
    sync::{mpsc, watch},
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info, trace};

/// Owns a [`Simulator`] and the optional repeating timer of continuous mode.
///
/// 拥有模拟器以及连续模式下可选的重复定时器。
pub(crate) struct SimulatorActor<L: LossOracle> {
    simulator: Simulator<L>,
    /// `Some` exactly while continuous mode is on.
    ticker: Option<Interval>,
    snapshot_tx: watch::Sender<SimulationSnapshot>,
}

impl<L: LossOracle> SimulatorActor<L> {
    pub(crate) fn new(
        simulator: Simulator<L>,
        snapshot_tx: watch::Sender<SimulationSnapshot>,
    ) -> Self {
        Self {
            simulator,
            ticker: None,
            snapshot_tx,
        }
    }

    /// Runs the actor's main loop until shut down or every handle is dropped.
    ///
    /// 运行 actor 主循环，直到关闭或所有句柄被丢弃。
    pub(crate) async fn run(mut self, mut command_rx: mpsc::Receiver<DriverCommand>) {
        info!("Simulator task started");

        loop {
            tokio::select! {
                // Commands first: a stop that races a tick must win.
                biased;

                command = command_rx.recv() => {
                    match command {
                        Some(DriverCommand::Shutdown) => {
                            debug!("Simulator task received shutdown");
                            break;
                        }
                        Some(command) => self.handle_command(command),
                        None => {
                            debug!("All simulator handles dropped, shutting down");
                            break;
                        }
                    }
                }

                _ = Self::next_tick(&mut self.ticker) => {
                    let report = self.simulator.step();
                    trace!(round = report.round, lost = report.lost, "Timer-driven round");
                    self.publish();
                }
            }
        }

        self.ticker = None;
        info!("Simulator task stopped");
    }

    fn handle_command(&mut self, command: DriverCommand) {
        match command {
            DriverCommand::Step { response_tx } => {
                let report = self.simulator.step();
                trace!(round = report.round, lost = report.lost, "Manual round");
                self.publish();
                let _ = response_tx.send(report);
            }
            DriverCommand::SetRunning {
                running,
                response_tx,
            } => {
                let changed = if running { self.arm() } else { self.disarm() };
                if changed {
                    self.publish();
                }
                let _ = response_tx.send(changed);
            }
            DriverCommand::SetAlgorithm {
                algorithm,
                response_tx,
            } => {
                let changed = self.simulator.set_algorithm(algorithm);
                if changed {
                    self.rearm();
                    self.publish();
                }
                let _ = response_tx.send(changed);
            }
            DriverCommand::SetParameters {
                parameters,
                response_tx,
            } => {
                let old_rtt = self.simulator.parameters().rtt;
                let result = self.simulator.set_parameters(parameters);
                if result.is_ok() {
                    if self.simulator.parameters().rtt != old_rtt {
                        self.rearm();
                    }
                    self.publish();
                }
                let _ = response_tx.send(result);
            }
            DriverCommand::Reset { response_tx } => {
                self.simulator.reset();
                self.rearm();
                self.publish();
                let _ = response_tx.send(());
            }
            DriverCommand::Snapshot { response_tx } => {
                let _ = response_tx.send(self.snapshot());
            }
            DriverCommand::Shutdown => {}
        }
    }

    async fn next_tick(ticker: &mut Option<Interval>) {
        match ticker {
            Some(ticker) => {
                ticker.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    fn new_ticker(period: Duration) -> Interval {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    /// Starts continuous mode. Returns `false` if it was already running.
    fn arm(&mut self) -> bool {
        if self.ticker.is_some() {
            return false;
        }
        let rtt = self.simulator.parameters().rtt;
        self.ticker = Some(Self::new_ticker(rtt));
        info!(rtt_ms = rtt.as_millis(), "Continuous mode started");
        true
    }

    /// Stops continuous mode. Dropping the interval drops any pending tick.
    /// Returns `false` if it was not running.
    fn disarm(&mut self) -> bool {
        if self.ticker.take().is_none() {
            return false;
        }
        info!("Continuous mode stopped");
        true
    }

    /// Restarts the period from now if continuous mode is on.
    fn rearm(&mut self) {
        if self.ticker.is_some() {
            let rtt = self.simulator.parameters().rtt;
            self.ticker = Some(Self::new_ticker(rtt));
            debug!(rtt_ms = rtt.as_millis(), "Continuous mode re-armed");
        }
    }

    fn snapshot(&self) -> SimulationSnapshot {
        let mut snapshot = self.simulator.snapshot();
        snapshot.running = self.ticker.is_some();
        snapshot
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}
