//! The user-facing handle to a running simulator task.

use super::{actor::SimulatorActor, command::DriverCommand};
use crate::{
    config::SimulationParameters,
    congestion::Algorithm,
    error::{Error, Result},
    loss::LossOracle,
    simulator::{RoundReport, SimulationSnapshot, Simulator},
};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::info;

/// A handle to a simulator owned by its own task.
///
/// Cloning the handle is cheap; the task stops when [`shutdown`](Self::shutdown)
/// is called or the last handle is dropped.
///
/// 指向由独立任务拥有的模拟器的句柄。
#[derive(Clone)]
pub struct SimulatorHandle {
    command_tx: mpsc::Sender<DriverCommand>,
    snapshot_rx: watch::Receiver<SimulationSnapshot>,
}

impl SimulatorHandle {
    /// Moves `simulator` into a new task and returns a handle to it.
    /// Must be called from within a tokio runtime.
    ///
    /// 将 `simulator` 移入新任务并返回其句柄。必须在 tokio 运行时内调用。
    pub fn spawn<L: LossOracle>(simulator: Simulator<L>) -> Self {
        let (command_tx, command_rx) = mpsc::channel(simulator.config().driver.command_buffer.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(simulator.snapshot());

        let actor = SimulatorActor::new(simulator, snapshot_tx);
        tokio::spawn(actor.run(command_rx));

        info!("Simulator task spawned");
        Self {
            command_tx,
            snapshot_rx,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> DriverCommand) -> Result<T> {
        let (response_tx, response_rx) = oneshot::channel();

        self.command_tx
            .send(command(response_tx))
            .await
            .map_err(|_| Error::SimulatorClosed)?;

        response_rx.await.map_err(|_| Error::SimulatorClosed)
    }

    /// Runs exactly one round now, whether or not continuous mode is on.
    ///
    /// 立即运行一个回合。
    pub async fn step(&self) -> Result<RoundReport> {
        self.request(|response_tx| DriverCommand::Step { response_tx })
            .await
    }

    /// Turns continuous mode on or off. Returns whether the mode changed,
    /// so stopping twice is harmless.
    ///
    /// 开启或关闭连续模式。返回模式是否改变，因此重复停止是安全的。
    pub async fn set_running(&self, running: bool) -> Result<bool> {
        self.request(|response_tx| DriverCommand::SetRunning {
            running,
            response_tx,
        })
        .await
    }

    /// Starts stepping once per RTT.
    pub async fn start(&self) -> Result<bool> {
        self.set_running(true).await
    }

    /// Stops continuous mode. Once this returns no further timer-driven
    /// round runs.
    pub async fn stop(&self) -> Result<bool> {
        self.set_running(false).await
    }

    /// Selects the active algorithm, archiving the live run on a change.
    pub async fn set_algorithm(&self, algorithm: Algorithm) -> Result<bool> {
        self.request(|response_tx| DriverCommand::SetAlgorithm {
            algorithm,
            response_tx,
        })
        .await
    }

    /// Validates and applies new parameters. A changed RTT re-arms a running
    /// timer.
    pub async fn set_parameters(&self, parameters: SimulationParameters) -> Result<()> {
        self.request(|response_tx| DriverCommand::SetParameters {
            parameters,
            response_tx,
        })
        .await?
    }

    /// Clears the live run and the whole archive.
    pub async fn reset(&self) -> Result<()> {
        self.request(|response_tx| DriverCommand::Reset { response_tx })
            .await
    }

    /// Fetches a fresh snapshot from the task.
    pub async fn snapshot(&self) -> Result<SimulationSnapshot> {
        self.request(|response_tx| DriverCommand::Snapshot { response_tx })
            .await
    }

    /// A stream of snapshots, updated after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<SimulationSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Stops the task. Later requests fail with [`Error::SimulatorClosed`].
    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(DriverCommand::Shutdown)
            .await
            .map_err(|_| Error::SimulatorClosed)
    }
}
