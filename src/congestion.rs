//! 拥塞控制状态机：慢启动、拥塞避免、快速重传和快速恢复。
//! The congestion state machine: slow start, congestion avoidance, fast
//! retransmit and fast recovery, one transition per round.

pub mod algorithm;
pub mod machine;
pub mod state;

pub use algorithm::Algorithm;
pub use machine::{CongestionMachine, RoundDecision};
pub use state::{NetworkState, Phase};

#[cfg(test)]
mod tests;
