//! Fixed delay between attempts.

use super::strategy::{DEFAULT_DELAY_MS, DelayStrategy};
use serde::{Deserialize, Serialize};

/// Waits the same amount of time after every failed attempt.
///
/// ```rust
/// use endure::retry::{ConstantStrategy, DelayStrategy};
///
/// let strategy = ConstantStrategy::new(250);
/// assert_eq!(strategy.delay(1), 250);
/// assert_eq!(strategy.delay(10), 250);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantStrategy {
    delay: u64,
}

impl ConstantStrategy {
    /// Create a strategy that always waits `delay` milliseconds.
    pub fn new(delay: u64) -> Self {
        Self { delay }
    }

    /// The configured delay in milliseconds.
    pub fn base_delay(&self) -> u64 {
        self.delay
    }
}

impl Default for ConstantStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_MS)
    }
}

impl DelayStrategy for ConstantStrategy {
    fn delay(&self, _attempt: u32) -> u64 {
        self.delay
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}
