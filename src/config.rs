//! 定义了模拟器的可配置参数。
//! Defines configurable parameters for the simulator.

use crate::error::{Error, Result};
use std::time::Duration;
use tracing::warn;

/// A structure containing all configurable parameters for a simulator.
///
/// 包含模拟器所有可配置参数的结构体。
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Parameters supplied by the user for each run.
    /// 用户为每次运行提供的参数。
    pub parameters: SimulationParameters,

    /// Window bounds and loss-response constants.
    /// 窗口边界和丢包响应常量。
    pub window: WindowConfig,

    /// Event log presentation parameters.
    /// 事件日志展示参数。
    pub events: EventConfig,

    /// Round driver parameters.
    /// 回合驱动器参数。
    pub driver: DriverConfig,
}

/// The externally supplied knobs of a run.
///
/// 外部提供的运行参数。
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    /// The congestion window a fresh run starts with.
    /// 新运行的初始拥塞窗口。
    pub initial_cwnd: u32,
    /// The slow start threshold a fresh run starts with.
    /// 新运行的初始慢启动阈值。
    pub ssthresh: u32,
    /// Probability, in percent, that the packet of a round is lost.
    /// 每回合数据包丢失的概率（百分比）。
    pub packet_loss_rate: f64,
    /// The period of the continuous round driver.
    /// 连续回合驱动器的周期。
    pub rtt: Duration,
}

/// Window bounds and loss-response constants.
///
/// 窗口边界和丢包响应常量。
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// The floor cwnd is clamped to after every round.
    /// 每回合后 cwnd 的下限。
    pub min_cwnd: f64,
    /// The ceiling cwnd is clamped to after every round.
    /// 每回合后 cwnd 的上限。
    pub max_cwnd: f64,
    /// The floor of ssthresh after a halving.
    /// 减半后 ssthresh 的下限。
    pub min_ssthresh: u32,
    /// Segments added on top of ssthresh when entering fast recovery.
    /// 进入快速恢复时在 ssthresh 之上增加的段数。
    pub fast_recovery_inflation: u32,
}

/// Event log presentation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EventConfig {
    /// How many of the most recent events a display shows.
    /// The log itself is never truncated.
    pub display_limit: usize,
}

/// Round driver parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    /// Capacity of the command channel of the simulator task.
    pub command_buffer: usize,
}

impl Config {
    /// Checks the window bounds first, then the parameters against them.
    ///
    /// 先检查窗口边界，再根据窗口边界检查参数。
    pub fn validate(&self) -> Result<()> {
        self.window.validate()?;
        self.parameters.validate(&self.window)
    }
}

impl WindowConfig {
    /// Checks that the bounds are finite and ordered, and that the ssthresh
    /// floor and the fast recovery inflation fit under the ceiling.
    ///
    /// 检查边界是否有限且有序，以及 ssthresh 下限和快速恢复膨胀值是否在上限之内。
    pub fn validate(&self) -> Result<()> {
        let result = self.check();
        if let Err(e) = &result {
            warn!(error = %e, "Rejected window configuration");
        }
        result
    }

    fn check(&self) -> Result<()> {
        if !self.min_cwnd.is_finite() || self.min_cwnd < 1.0 {
            return Err(Error::InvalidWindow("min_cwnd must be a finite value of at least 1"));
        }
        if !self.max_cwnd.is_finite() || self.max_cwnd < self.min_cwnd {
            return Err(Error::InvalidWindow("max_cwnd must be finite and not below min_cwnd"));
        }
        if self.min_ssthresh < 2 || f64::from(self.min_ssthresh) > self.max_cwnd {
            return Err(Error::InvalidWindow("min_ssthresh must be in [2, max_cwnd]"));
        }
        if f64::from(self.fast_recovery_inflation) > self.max_cwnd {
            return Err(Error::InvalidWindow("fast_recovery_inflation must not exceed max_cwnd"));
        }
        Ok(())
    }
}

impl SimulationParameters {
    /// Checks the parameters against the ranges the core accepts.
    ///
    /// Out-of-range values are rejected here rather than clamped inside the
    /// state machine.
    ///
    /// 根据核心接受的范围检查参数。超出范围的值在此被拒绝，而不是在状态机内部被截断。
    pub fn validate(&self, window: &WindowConfig) -> Result<()> {
        let result = self.check(window);
        if let Err(e) = &result {
            warn!(error = %e, "Rejected simulation parameters");
        }
        result
    }

    fn check(&self, window: &WindowConfig) -> Result<()> {
        if !self.packet_loss_rate.is_finite() || !(0.0..=100.0).contains(&self.packet_loss_rate) {
            return Err(Error::InvalidLossRate(self.packet_loss_rate));
        }
        if self.rtt.is_zero() {
            return Err(Error::InvalidRtt);
        }
        let cwnd = f64::from(self.initial_cwnd);
        if self.initial_cwnd == 0 || cwnd < window.min_cwnd || cwnd > window.max_cwnd {
            return Err(Error::InvalidInitialCwnd(self.initial_cwnd));
        }
        if self.ssthresh < window.min_ssthresh || f64::from(self.ssthresh) > window.max_cwnd {
            return Err(Error::InvalidSsthresh(self.ssthresh));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parameters: SimulationParameters::default(),
            window: WindowConfig::default(),
            events: EventConfig::default(),
            driver: DriverConfig::default(),
        }
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_cwnd: 2,
            ssthresh: 16,
            packet_loss_rate: 10.0,
            rtt: Duration::from_millis(50),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            min_cwnd: 1.0,
            max_cwnd: 64.0,
            min_ssthresh: 2,
            fast_recovery_inflation: 3,
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self { display_limit: 20 }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { command_buffer: 128 }
    }
}
