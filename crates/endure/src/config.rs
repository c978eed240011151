//! Declarative configuration for retry drivers.
//!
//! A [`RetryConfig`] describes a driver without building it, so it can live in
//! a JSON or TOML file, or be assembled from environment variables, and be
//! turned into a [`RetryDriver`] when needed.

use crate::error::{Error, Result};
use crate::retry::{
    ConstantStrategy, DEFAULT_DELAY_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MULTIPLIER, DelayStrategy,
    ExponentialStrategy, LinearStrategy, MultiplicativeStrategy, RetryDriver,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Which backoff curve to use, and its parameters.
///
/// Serialized with an internal `kind` tag:
///
/// ```json
/// { "kind": "multiplicative", "delay_ms": 1000, "multiplier": 1.5 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// See [`ConstantStrategy`].
    Constant {
        /// Delay in milliseconds
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
    },

    /// See [`LinearStrategy`].
    Linear {
        /// Per-attempt step in milliseconds
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
    },

    /// See [`ExponentialStrategy`].
    Exponential {
        /// First delay in milliseconds
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
    },

    /// See [`MultiplicativeStrategy`].
    Multiplicative {
        /// First delay in milliseconds
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
        /// Growth factor, at least 1.0
        #[serde(default = "default_multiplier")]
        multiplier: f64,
    },
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

fn default_multiplier() -> f64 {
    DEFAULT_MULTIPLIER
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::Exponential {
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl StrategyConfig {
    /// Assemble a config from a kind name and raw parameters.
    ///
    /// `multiplier` is ignored by every kind except `multiplicative`.
    pub fn from_parts(kind: &str, delay_ms: u64, multiplier: f64) -> Result<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "constant" => Ok(Self::Constant { delay_ms }),
            "linear" => Ok(Self::Linear { delay_ms }),
            "exponential" => Ok(Self::Exponential { delay_ms }),
            "multiplicative" => Ok(Self::Multiplicative {
                delay_ms,
                multiplier,
            }),
            other => Err(Error::invalid_configuration(format!(
                "Unknown strategy kind: \"{}\"",
                other
            ))),
        }
    }

    /// The tag this config serializes under.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "constant",
            Self::Linear { .. } => "linear",
            Self::Exponential { .. } => "exponential",
            Self::Multiplicative { .. } => "multiplicative",
        }
    }

    /// Build the strategy this config describes.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidConfiguration`] when a multiplicative
    /// config carries a multiplier below 1.0.
    pub fn build(&self) -> Result<Box<dyn DelayStrategy>> {
        let strategy: Box<dyn DelayStrategy> = match *self {
            Self::Constant { delay_ms } => Box::new(ConstantStrategy::new(delay_ms)),
            Self::Linear { delay_ms } => Box::new(LinearStrategy::new(delay_ms)),
            Self::Exponential { delay_ms } => Box::new(ExponentialStrategy::new(delay_ms)),
            Self::Multiplicative {
                delay_ms,
                multiplier,
            } => Box::new(MultiplicativeStrategy::new(delay_ms, multiplier)?),
        };

        Ok(strategy)
    }
}

/// Configuration for a [`RetryDriver`].
///
/// Every field has a default, so partial documents are accepted.
///
/// # Examples
///
/// ```rust
/// use endure::config::{RetryConfig, StrategyConfig};
///
/// # fn example() -> endure::Result<()> {
/// let config = RetryConfig::from_json(
///     r#"{ "strategy": { "kind": "linear", "delay_ms": 50 }, "max_delay_ms": 120 }"#,
/// )?;
///
/// assert_eq!(config.strategy, StrategyConfig::Linear { delay_ms: 50 });
/// assert_eq!(config.max_attempts, 5);
///
/// let driver = config.build_driver::<std::io::Error>()?;
/// assert_eq!(driver.delay(3), 120);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Backoff curve between attempts
    pub strategy: StrategyConfig,

    /// Maximum number of attempts
    pub max_attempts: u32,

    /// Cap on any single delay, in milliseconds
    pub max_delay_ms: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyConfig::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_delay_ms: None,
        }
    }
}

impl RetryConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::invalid_configuration(format!("Invalid retry configuration: {}", e))
        })
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `ENDURE_STRATEGY` for the strategy kind (`constant`, `linear`,
    ///   `exponential`, `multiplicative`)
    /// - `ENDURE_DELAY_MS` for the base delay
    /// - `ENDURE_MULTIPLIER` for the multiplicative growth factor
    /// - `ENDURE_MAX_ATTEMPTS` for the attempt budget
    /// - `ENDURE_MAX_DELAY_MS` for the delay cap
    ///
    /// Unset variables keep their defaults; set but unparseable ones are an
    /// error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        let kind = env::var("ENDURE_STRATEGY").ok();
        let delay_ms = parse_var::<u64>("ENDURE_DELAY_MS")?;
        let multiplier = parse_var::<f64>("ENDURE_MULTIPLIER")?;

        if kind.is_some() || delay_ms.is_some() || multiplier.is_some() {
            config.strategy = StrategyConfig::from_parts(
                kind.as_deref().unwrap_or(config.strategy.kind()),
                delay_ms.unwrap_or(DEFAULT_DELAY_MS),
                multiplier.unwrap_or(DEFAULT_MULTIPLIER),
            )?;
        }

        if let Some(max_attempts) = parse_var::<u32>("ENDURE_MAX_ATTEMPTS")? {
            config.max_attempts = max_attempts;
        }

        if let Some(max_delay) = parse_var::<u64>("ENDURE_MAX_DELAY_MS")? {
            config.max_delay_ms = Some(max_delay);
        }

        Ok(config)
    }

    /// Build a driver from this configuration.
    ///
    /// The driver starts without an error observer.
    pub fn build_driver<E>(&self) -> Result<RetryDriver<E>> {
        let strategy = self.strategy.build()?;

        Ok(RetryDriver::with_limits(
            strategy,
            self.max_attempts,
            self.max_delay_ms,
        ))
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            Error::invalid_configuration(format!("{} has invalid value \"{}\": {}", name, raw, e))
        }),
        Err(_) => Ok(None),
    }
}
