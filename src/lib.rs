#![deny(clippy::expect_used, clippy::unwrap_used)]

//! The root of the TCP congestion control simulator library.
//! TCP拥塞控制模拟器库的根。
//!
//! A round-by-round model of slow start, congestion avoidance, fast
//! retransmit and fast recovery under random packet loss. [`Simulator`] is
//! the synchronous core; [`SimulatorHandle`] runs it in its own task with a
//! manual or RTT-periodic round driver.

pub mod archive;
pub mod config;
pub mod congestion;
pub mod driver;
pub mod error;
pub mod event;
pub mod loss;
pub mod simulator;

pub use config::{Config, SimulationParameters};
pub use congestion::{Algorithm, NetworkState, Phase};
pub use driver::SimulatorHandle;
pub use error::{Error, Result};
pub use simulator::{RoundReport, SimulationSnapshot, Simulator};
