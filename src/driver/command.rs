//! Commands understood by the simulator task.

use crate::{
    config::SimulationParameters,
    congestion::Algorithm,
    error::Result,
    simulator::{RoundReport, SimulationSnapshot},
};
use tokio::sync::oneshot;

/// Commands sent to the simulator task.
///
/// 发送到模拟器任务的命令。
#[derive(Debug)]
pub(crate) enum DriverCommand {
    /// Run one round now.
    /// 立即运行一个回合。
    Step {
        response_tx: oneshot::Sender<RoundReport>,
    },
    /// Switch continuous mode on or off. Responds whether the mode changed.
    /// 开启或关闭连续模式。返回模式是否改变。
    SetRunning {
        running: bool,
        response_tx: oneshot::Sender<bool>,
    },
    SetAlgorithm {
        algorithm: Algorithm,
        response_tx: oneshot::Sender<bool>,
    },
    SetParameters {
        parameters: SimulationParameters,
        response_tx: oneshot::Sender<Result<()>>,
    },
    Reset {
        response_tx: oneshot::Sender<()>,
    },
    Snapshot {
        response_tx: oneshot::Sender<SimulationSnapshot>,
    },
    Shutdown,
}
