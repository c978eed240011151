#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Retry orchestration with pluggable delay strategies.
//!
//! This crate wraps an unreliable operation in a [`RetryDriver`](retry::RetryDriver)
//! that keeps invoking it until it succeeds, the attempt budget runs out, or an
//! error observer decides to stop early.
//!
//! - **Delay strategies** via the `DelayStrategy` trait
//!   - Constant, linear, exponential and multiplicative backoff
//!   - Swappable at any time, including from inside a running loop
//! - **Global delay cap** applied on top of whatever the strategy computes
//! - **Error observers** that see every failure and may reconfigure the driver
//! - **Declarative configuration** via `RetryConfig` (JSON, TOML or environment)
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use endure::prelude::*;
//!
//! # fn example() -> Result<(), std::io::Error> {
//! let mut driver = RetryDriver::with_limits(LinearStrategy::new(10), 3, Some(25));
//!
//! let value = driver.run(|| Ok::<_, std::io::Error>(42))?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod retry;


pub use error::{Error, Result};

/// Convenient re-exports of commonly used items.
///
/// Import everything needed to build and run a driver with:
///
/// ```rust
/// use endure::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{RetryConfig, StrategyConfig};
    pub use crate::error::Error;
    pub use crate::retry::{
        ConstantStrategy, DelayStrategy, ExponentialStrategy, LinearStrategy,
        MultiplicativeStrategy, RetryDriver,
    };
}
