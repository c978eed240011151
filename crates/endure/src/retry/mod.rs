//! Retry driver and delay strategies.
//!
//! This module provides the attempt loop ([`RetryDriver`]) and the family of
//! backoff curves it can use between attempts.
//!
//! # Key Types
//!
//! - [`DelayStrategy`] - Core trait mapping an attempt number to a delay
//! - [`ConstantStrategy`] - Same delay every time
//! - [`LinearStrategy`] - `delay * attempt`
//! - [`ExponentialStrategy`] - `delay * 2^(attempt - 1)`
//! - [`MultiplicativeStrategy`] - `delay * multiplier^(attempt - 1)`
//! - [`RetryDriver`] - Runs an operation with a strategy, budget and observer
//!
//! # Examples
//!
//! ```rust
//! use endure::retry::{ExponentialStrategy, RetryDriver};
//!
//! let mut driver = RetryDriver::with_limits(ExponentialStrategy::new(0), 3, Some(1_000));
//!
//! let result = driver.run(|| {
//!     // Your operation here
//!     Ok::<_, std::io::Error>(42)
//! });
//! assert_eq!(result.unwrap(), 42);
//! ```

mod constant;
mod driver;
mod exponential;
mod linear;
mod multiplicative;
mod strategy;

pub use constant::ConstantStrategy;
pub use driver::{DEFAULT_MAX_ATTEMPTS, ErrorObserver, RetryDriver};
pub use exponential::ExponentialStrategy;
pub use linear::LinearStrategy;
pub use multiplicative::{DEFAULT_MULTIPLIER, MultiplicativeStrategy};
pub use strategy::{DEFAULT_DELAY_MS, DelayStrategy};
