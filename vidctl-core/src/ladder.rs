//! Discrete playback-rate ladder.
//!
//! The controller never sends a rate that is not on the ladder, but the
//! engine's rate can still be changed behind its back, so every lookup starts
//! from the observed rate instead of a cached index.

use crate::commands::RateStep;
use crate::config::{DEFAULT_RATE, RATE_LADDER, RATE_TOLERANCE};

/// Ordered, strictly increasing list of allowed playback rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLadder {
    rates: &'static [f64],
}

impl Default for RateLadder {
    fn default() -> Self {
        Self::standard()
    }
}

impl RateLadder {
    /// The `0.2x .. 5.0x` ladder used by the player.
    pub const fn standard() -> Self {
        Self { rates: &RATE_LADDER }
    }

    pub fn rates(&self) -> &'static [f64] {
        self.rates
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn top(&self) -> usize {
        self.rates.len() - 1
    }

    /// Rate at `index`, clamped to the last rung.
    pub fn rate_at(&self, index: usize) -> f64 {
        self.rates[index.min(self.top())]
    }

    /// Index of the `1.0x` rung.
    pub fn default_index(&self) -> usize {
        self.snap(DEFAULT_RATE)
    }

    /// Index whose rate matches `rate` within [`RATE_TOLERANCE`].
    pub fn index_of(&self, rate: f64) -> Option<usize> {
        let nearest = self.snap(rate);
        ((self.rates[nearest] - rate).abs() < RATE_TOLERANCE).then_some(nearest)
    }

    /// Index of the rung closest to `rate`. Non-finite input lands on the
    /// default rung.
    pub fn snap(&self, rate: f64) -> usize {
        if !rate.is_finite() {
            return self.snap(DEFAULT_RATE);
        }
        self.rates
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - rate).abs().total_cmp(&(*b - rate).abs()))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Index reached by moving one rung from the observed `rate`.
    ///
    /// Steps are clamped at both ends. When `rate` is off the ladder the step
    /// lands on the nearest rung strictly above (or below) it.
    pub fn step_from(&self, rate: f64, step: RateStep) -> usize {
        let rate = if rate.is_finite() { rate } else { DEFAULT_RATE };
        if let Some(index) = self.index_of(rate) {
            return match step {
                RateStep::Up => (index + 1).min(self.top()),
                RateStep::Down => index.saturating_sub(1),
            };
        }

        match step {
            RateStep::Up => self
                .rates
                .iter()
                .position(|&r| r > rate)
                .unwrap_or(self.top()),
            RateStep::Down => self.rates.iter().rposition(|&r| r < rate).unwrap_or(0),
        }
    }
}
