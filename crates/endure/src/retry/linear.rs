//! Delays that grow by a fixed step per attempt.

use super::strategy::{DEFAULT_DELAY_MS, DelayStrategy};
use serde::{Deserialize, Serialize};

/// Linear backoff: `delay * attempt`.
///
/// The product saturates at `u64::MAX`.
///
/// # Examples
///
/// ```rust
/// use endure::retry::{DelayStrategy, LinearStrategy};
///
/// let strategy = LinearStrategy::new(100);
/// assert_eq!(strategy.delay(1), 100);
/// assert_eq!(strategy.delay(2), 200);
/// assert_eq!(strategy.delay(3), 300);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearStrategy {
    delay: u64,
}

impl LinearStrategy {
    /// Create a strategy that adds `delay` milliseconds per attempt.
    pub fn new(delay: u64) -> Self {
        Self { delay }
    }

    /// The per-attempt step in milliseconds.
    pub fn base_delay(&self) -> u64 {
        self.delay
    }
}

impl Default for LinearStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_MS)
    }
}

impl DelayStrategy for LinearStrategy {
    fn delay(&self, attempt: u32) -> u64 {
        self.delay.saturating_mul(u64::from(attempt))
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}
