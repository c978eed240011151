//! Exponential backoff that doubles after every attempt.

use super::strategy::{DEFAULT_DELAY_MS, DelayStrategy, scaled_delay};
use serde::{Deserialize, Serialize};

/// Exponential backoff strategy.
///
/// Delays double after every failed attempt, starting from the base delay.
///
/// # Mathematical Formula
///
/// For attempt `n` (1-indexed, first failure is `n = 1`):
/// ```text
/// delay = floor(base_delay * 2 ^ (n - 1))
/// ```
///
/// The product is computed in `f64` and truncated, never rounded. Products
/// beyond `u64::MAX` saturate.
///
/// # Examples
///
/// ```rust
/// use endure::retry::{DelayStrategy, ExponentialStrategy};
///
/// let strategy = ExponentialStrategy::new(100);
///
/// assert_eq!(strategy.delay(1), 100);
/// assert_eq!(strategy.delay(2), 200);
/// assert_eq!(strategy.delay(3), 400);
/// assert_eq!(strategy.delay(4), 800);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExponentialStrategy {
    delay: u64,
}

impl ExponentialStrategy {
    /// Create a strategy whose first delay is `delay` milliseconds.
    pub fn new(delay: u64) -> Self {
        Self { delay }
    }

    /// The delay used after the first failure, in milliseconds.
    pub fn base_delay(&self) -> u64 {
        self.delay
    }
}

impl Default for ExponentialStrategy {
    /// 100ms, doubling each time.
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_MS)
    }
}

impl DelayStrategy for ExponentialStrategy {
    fn delay(&self, attempt: u32) -> u64 {
        scaled_delay(self.delay, 2.0, attempt)
    }

    fn name(&self) -> &'static str {
        "exponential"
    }
}
