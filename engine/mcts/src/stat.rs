//! Outcome statistics with a virtual prior.
//!
//! A `Stat` accumulates scalar playout outcomes. It is initialised as if
//! `prior_count` samples of value `prior_mean` had already been observed,
//! which keeps `mean` total (no division by zero) and seeds fresh nodes
//! with a tunable optimism.

use std::fmt;

/// Commutative accumulator of playout scores.
#[derive(Debug, Clone, Copy)]
pub struct Stat {
    sum: f32,
    count: f32,
}

impl Stat {
    /// Create a statistic seeded with `prior_count` virtual samples of
    /// value `prior_mean`.
    pub fn with_prior(prior_count: f32, prior_mean: f32) -> Stat {
        Stat {
            sum: prior_count * prior_mean,
            count: prior_count,
        }
    }

    /// Forget everything and re-seed with the given prior.
    pub fn reset(&mut self, prior_count: f32, prior_mean: f32) {
        self.sum = prior_count * prior_mean;
        self.count = prior_count;
    }

    /// Record one sample.
    #[inline]
    pub fn update(&mut self, score: f32) {
        self.sum += score;
        self.count += 1.0;
    }

    /// Sample mean, prior included.
    #[inline]
    pub fn mean(&self) -> f32 {
        self.sum / self.count
    }

    /// Number of samples, prior included.
    #[inline]
    pub fn update_count(&self) -> f32 {
        self.count
    }

    /// UCB value: the mean plus an exploration bonus that shrinks with the
    /// sample count. Callers pass `explore_coeff = explore_rate * ln(parent
    /// update count)`.
    #[inline]
    pub fn ucb(&self, explore_coeff: f32) -> f32 {
        self.mean() + (explore_coeff / self.count).sqrt()
    }

    /// Read the weighted blend of two statistics' means. The blend itself
    /// is never stored.
    #[inline]
    pub fn mix(a: &Stat, weight_a: f32, b: &Stat, weight_b: f32) -> f32 {
        let total = weight_a + weight_b;
        if total <= 0.0 {
            return a.mean();
        }
        (weight_a * a.mean() + weight_b * b.mean()) / total
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.3}({:.0})", self.mean(), self.count)
    }
}
