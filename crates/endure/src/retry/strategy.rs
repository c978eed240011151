//! The delay strategy abstraction shared by every backoff curve.

use std::fmt::Debug;

/// Default base delay, in milliseconds, for every built-in strategy.
pub const DEFAULT_DELAY_MS: u64 = 100;

/// A strategy for spacing out retry attempts.
///
/// Implementations map a 1-based attempt number to the number of milliseconds
/// to wait before the next attempt. The mapping must be pure: the same attempt
/// always yields the same delay, and computing it must never block.
///
/// # Attempt numbering
///
/// `attempt` is the number of the attempt that just failed, so the first
/// failure is reported as `1`. Callers never pass `0`.
///
/// # Examples
///
/// ```rust
/// use endure::retry::DelayStrategy;
///
/// /// Waits one second per attempt, but never more than five.
/// #[derive(Debug)]
/// struct Stepped;
///
/// impl DelayStrategy for Stepped {
///     fn delay(&self, attempt: u32) -> u64 {
///         1_000 * u64::from(attempt.min(5))
///     }
/// }
///
/// assert_eq!(Stepped.delay(2), 2_000);
/// assert_eq!(Stepped.delay(9), 5_000);
/// assert_eq!(Stepped.name(), "custom");
/// ```
pub trait DelayStrategy: Debug + Send + Sync {
    /// Delay in milliseconds to wait after the given failed attempt.
    fn delay(&self, attempt: u32) -> u64;

    /// Short identifier used in log fields.
    ///
    /// Built-in strategies report their curve (`"linear"`, `"exponential"`...).
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<S: DelayStrategy + ?Sized> DelayStrategy for Box<S> {
    fn delay(&self, attempt: u32) -> u64 {
        (**self).delay(attempt)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Scale `base` by `factor^(attempt - 1)` and truncate toward zero.
///
/// Float-to-integer casts saturate, so an overflowing product becomes
/// `u64::MAX` instead of wrapping.
/// The power must be `powf`: `powi` rounds differently and can truncate one
/// millisecond higher.
pub(crate) fn scaled_delay(base: u64, factor: f64, attempt: u32) -> u64 {
    let exponent = f64::from(attempt.saturating_sub(1));
    (base as f64 * factor.powf(exponent)) as u64
}
