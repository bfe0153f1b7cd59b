//! 定义了模拟器中所有可能的错误类型。
//! Defines all possible error types in the simulator.

use thiserror::Error;

/// The primary error type for the congestion simulator.
///
/// Stepping a round never fails; every variant is a boundary failure.
///
/// 拥塞模拟器的主要错误类型。推进回合本身永远不会失败，所有变体都是边界错误。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The packet loss rate was not a finite percentage in `[0, 100]`.
    /// 丢包率不是 `[0, 100]` 内的有限百分比。
    #[error("packet loss rate {0} is outside [0, 100]")]
    InvalidLossRate(f64),

    /// The round trip time was zero.
    /// 往返时间为零。
    #[error("round trip time must be greater than zero")]
    InvalidRtt,

    /// The initial congestion window was outside the window bounds.
    /// 初始拥塞窗口超出窗口范围。
    #[error("initial cwnd {0} is outside the supported window range")]
    InvalidInitialCwnd(u32),

    /// The configured slow start threshold was outside the window bounds.
    /// 配置的慢启动阈值超出范围。
    #[error("ssthresh {0} is outside the supported threshold range")]
    InvalidSsthresh(u32),

    /// The window bounds or loss-response constants were inconsistent.
    /// 窗口边界或丢包响应常量不一致。
    #[error("invalid window configuration: {0}")]
    InvalidWindow(&'static str),

    /// An algorithm id did not name one of the four strategies.
    /// 算法标识不属于四种策略之一。
    #[error("unknown algorithm id: {0}")]
    UnknownAlgorithm(String),

    /// The simulator task has shut down and can no longer take commands.
    /// 模拟器任务已关闭，无法再接收命令。
    #[error("simulator task is closed")]
    SimulatorClosed,
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;
