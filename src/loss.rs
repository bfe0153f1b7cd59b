//! 定义了可注入的丢包判定源。
//! Defines the injectable packet loss oracle.
//!
//! The random draw is the only non-deterministic input of a round. Keeping it
//! behind a trait lets tests replay a run exactly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// A draw that is never below a loss rate other than 100.
const DELIVERED_DRAW: f64 = 99.999;

/// A source of per-round Bernoulli trials.
///
/// 每回合伯努利试验的来源。
pub trait LossOracle: Send + 'static {
    /// Draws a uniform value in `[0, 100)`.
    ///
    /// 抽取 `[0, 100)` 内的均匀值。
    fn draw(&mut self) -> f64;

    /// Decides whether this round's packet is lost. The packet is lost iff
    /// the draw is strictly below `loss_rate`.
    ///
    /// 判定本回合的数据包是否丢失。当且仅当抽样值严格小于 `loss_rate` 时丢失。
    fn is_lost(&mut self, loss_rate: f64) -> bool {
        let value = self.draw();
        let lost = value < loss_rate;
        trace!(draw = value, loss_rate, lost, "Loss trial");
        lost
    }
}

impl<L: LossOracle + ?Sized> LossOracle for Box<L> {
    fn draw(&mut self) -> f64 {
        (**self).draw()
    }
}

/// A seedable pseudo-random loss source.
///
/// 可设定种子的伪随机丢包源。
#[derive(Debug, Clone)]
pub struct RandomLoss {
    rng: ChaCha8Rng,
}

impl RandomLoss {
    /// Creates a source that replays the same draws for the same seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }
}

impl Default for RandomLoss {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl LossOracle for RandomLoss {
    fn draw(&mut self) -> f64 {
        self.rng.random_range(0.0..100.0)
    }
}

/// A loss source that replays a fixed script of draws, cycling when it runs
/// out. Useful for forcing a loss at a chosen round.
///
/// 回放固定抽样脚本的丢包源，脚本用完后循环。
#[derive(Debug, Clone)]
pub struct ScriptedLoss {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedLoss {
    /// Replays the given raw draws.
    pub fn from_draws(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Replays a pattern where `true` is a loss at any positive loss rate and
    /// `false` is a delivery at any rate below 100.
    pub fn from_pattern(pattern: impl IntoIterator<Item = bool>) -> Self {
        Self::from_draws(
            pattern
                .into_iter()
                .map(|lost| if lost { 0.0 } else { DELIVERED_DRAW }),
        )
    }
}

impl LossOracle for ScriptedLoss {
    fn draw(&mut self) -> f64 {
        if self.draws.is_empty() {
            return DELIVERED_DRAW;
        }
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor = (self.cursor + 1) % self.draws.len();
        value
    }
}
