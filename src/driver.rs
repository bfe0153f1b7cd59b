//! 回合驱动器：手动或按RTT周期推进模拟。
//! The round driver: steps the simulation manually or once per RTT.
//!
//! The simulator is owned by a single task. Manual steps, timer ticks and
//! control commands are all messages to that task, so one round always runs
//! to completion before the next message is looked at.

mod actor;
mod command;
mod handle;

pub use handle::SimulatorHandle;
