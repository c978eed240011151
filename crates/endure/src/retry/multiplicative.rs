//! Geometric backoff with a configurable growth factor.

use super::strategy::{DEFAULT_DELAY_MS, DelayStrategy, scaled_delay};
use crate::error::{Error, Result};
use serde::Serialize;

/// Default growth factor for [`MultiplicativeStrategy`].
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Multiplicative backoff strategy.
///
/// Generalises [`ExponentialStrategy`](super::ExponentialStrategy) to any
/// growth factor of at least `1.0`.
///
/// # Mathematical Formula
///
/// For attempt `n` (1-indexed):
/// ```text
/// delay = floor(base_delay * multiplier ^ (n - 1))
/// ```
///
/// # Examples
///
/// ```rust
/// use endure::retry::{DelayStrategy, MultiplicativeStrategy};
///
/// # fn example() -> endure::Result<()> {
/// let strategy = MultiplicativeStrategy::new(1000, 1.5)?;
///
/// assert_eq!(strategy.delay(1), 1000);
/// assert_eq!(strategy.delay(2), 1500);
/// assert_eq!(strategy.delay(3), 2250);
///
/// // Shrinking delays are rejected.
/// assert!(MultiplicativeStrategy::new(1000, 0.5).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MultiplicativeStrategy {
    delay: u64,
    multiplier: f64,
}

impl MultiplicativeStrategy {
    /// Create a strategy starting at `delay` milliseconds and growing by
    /// `multiplier` after every attempt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `multiplier` is below `1.0`
    /// (or NaN). The message carries the rejected value.
    pub fn new(delay: u64, multiplier: f64) -> Result<Self> {
        if multiplier.is_nan() || multiplier < 1.0 {
            return Err(Error::invalid_configuration(format!(
                "Multiplier must be greater than or equal to 1: \"{}\" given.",
                multiplier
            )));
        }

        Ok(Self { delay, multiplier })
    }

    /// The delay used after the first failure, in milliseconds.
    pub fn base_delay(&self) -> u64 {
        self.delay
    }

    /// The growth factor applied per attempt.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Default for MultiplicativeStrategy {
    /// 100ms, doubling each time.
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY_MS,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl DelayStrategy for MultiplicativeStrategy {
    fn delay(&self, attempt: u32) -> u64 {
        scaled_delay(self.delay, self.multiplier, attempt)
    }

    fn name(&self) -> &'static str {
        "multiplicative"
    }
}
