//! The attempt loop that ties a strategy, a budget and an observer together.

use super::strategy::DelayStrategy;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Default number of attempts made by a new driver.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Callback invoked after every failed attempt.
///
/// Receives the driver itself, the failure, and the 1-based number of the
/// attempt that failed.
pub type ErrorObserver<E> = Box<dyn FnMut(&mut RetryDriver<E>, &E, u32) + Send>;

/// Repeatedly runs an operation until it succeeds or the attempt budget is spent.
///
/// The driver owns a [`DelayStrategy`], an attempt limit, an optional cap on
/// individual delays and an optional error observer. All of them are read
/// fresh on every iteration, so the observer can reconfigure the run that is
/// currently in progress: swapping the strategy changes the next delay, and
/// lowering `max_attempts` to the current attempt number stops the run on the
/// spot.
///
/// `E` is the failure type of the operations this driver runs. Failures are
/// never wrapped: once the budget is spent the last one is returned as is.
///
/// # Examples
///
/// ```rust
/// use endure::retry::{ConstantStrategy, RetryDriver};
///
/// let mut driver: RetryDriver<String> = RetryDriver::new(ConstantStrategy::new(0));
/// driver.set_error_observer(|driver, err, attempt| {
///     if err == "fatal" && attempt >= 2 {
///         // stop right here, no more attempts
///         driver.set_max_attempts(0);
///     }
/// });
///
/// let mut calls = 0;
/// let result: Result<(), String> = driver.run(|| {
///     calls += 1;
///     Err("fatal".to_string())
/// });
///
/// assert_eq!(result, Err("fatal".to_string()));
/// assert_eq!(calls, 2);
/// ```
pub struct RetryDriver<E> {
    strategy: Box<dyn DelayStrategy>,
    max_attempts: u32,
    max_delay: Option<u64>,
    observer: Option<ErrorObserver<E>>,
}

impl<E> RetryDriver<E> {
    /// Create a driver with the default budget of 5 attempts and no delay cap.
    pub fn new<S>(strategy: S) -> Self
    where
        S: DelayStrategy + 'static,
    {
        Self::with_limits(strategy, DEFAULT_MAX_ATTEMPTS, None)
    }

    /// Create a driver with an explicit attempt budget and delay cap.
    ///
    /// Values are stored verbatim. A budget of `0` still lets the operation
    /// run once. The budget is unsigned, so there is no negative budget that
    /// skips the operation entirely; every run makes at least one attempt.
    pub fn with_limits<S>(strategy: S, max_attempts: u32, max_delay: Option<u64>) -> Self
    where
        S: DelayStrategy + 'static,
    {
        Self {
            strategy: Box::new(strategy),
            max_attempts,
            max_delay,
            observer: None,
        }
    }

    /// The strategy currently in use.
    pub fn strategy(&self) -> &dyn DelayStrategy {
        self.strategy.as_ref()
    }

    /// Replace the strategy. Takes effect from the next computed delay.
    pub fn set_strategy<S>(&mut self, strategy: S) -> &mut Self
    where
        S: DelayStrategy + 'static,
    {
        self.strategy = Box::new(strategy);
        self
    }

    /// Maximum number of attempts.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Change the attempt budget. Takes effect on the next termination check.
    pub fn set_max_attempts(&mut self, max_attempts: u32) -> &mut Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Upper bound on any single delay, in milliseconds.
    pub fn max_delay(&self) -> Option<u64> {
        self.max_delay
    }

    /// Set or clear the delay cap.
    pub fn set_max_delay(&mut self, max_delay: Option<u64>) -> &mut Self {
        self.max_delay = max_delay;
        self
    }

    /// Register the callback invoked after every failed attempt.
    ///
    /// Replaces any previously registered observer. The observer runs
    /// synchronously inside the loop, before the termination check, and may
    /// reconfigure the driver through the `&mut RetryDriver` it receives. If
    /// it registers a new observer, the new one is used from the next failure
    /// on.
    pub fn set_error_observer<F>(&mut self, observer: F) -> &mut Self
    where
        F: FnMut(&mut RetryDriver<E>, &E, u32) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Whether an error observer is registered.
    pub fn has_error_observer(&self) -> bool {
        self.observer.is_some()
    }

    /// Delay in milliseconds after the given failed attempt, capped by
    /// `max_delay` when one is set.
    pub fn delay(&self, attempt: u32) -> u64 {
        let delay = self.strategy.delay(attempt);

        match self.max_delay {
            Some(cap) => delay.min(cap),
            None => delay,
        }
    }

    /// Run `operation` until it succeeds or the attempt budget is spent,
    /// blocking the current thread between attempts.
    ///
    /// Returns the first success, or the failure of the last attempt made.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use endure::retry::{LinearStrategy, RetryDriver};
    ///
    /// let mut driver = RetryDriver::new(LinearStrategy::new(0));
    /// let mut attempts = 0;
    ///
    /// let value = driver.run(|| {
    ///     attempts += 1;
    ///     if attempts < 3 { Err("not yet") } else { Ok(attempts) }
    /// });
    ///
    /// assert_eq!(value, Ok(3));
    /// ```
    pub fn run<T, F>(&mut self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt: u32 = 0;

        // The budget is only consulted after a failure; an unsigned budget can
        // never reject the attempt that follows a delay.
        loop {
            attempt += 1;

            let delay = {
                let err = match operation() {
                    Ok(value) => return Ok(value),
                    Err(err) => err,
                };

                match self.after_failure(&err, attempt) {
                    Some(delay) => delay,
                    None => return Err(err),
                }
            };

            if delay > 0 {
                std::thread::sleep(Duration::from_millis(delay));
            }
        }
    }

    /// Async counterpart of [`run`](Self::run).
    ///
    /// Same state machine, but `operation` returns a future and delays are
    /// awaited with `tokio::time::sleep`, so a Tokio runtime must be running.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use endure::retry::{ExponentialStrategy, RetryDriver};
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicU32, Ordering};
    ///
    /// # async fn example() -> Result<(), std::io::Error> {
    /// let mut driver = RetryDriver::with_limits(ExponentialStrategy::new(1), 4, None);
    /// let attempts = Arc::new(AtomicU32::new(0));
    ///
    /// let value = driver
    ///     .run_async(|| {
    ///         let attempts = Arc::clone(&attempts);
    ///         async move {
    ///             if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
    ///                 Err(std::io::Error::other("retry me"))
    ///             } else {
    ///                 Ok(42)
    ///             }
    ///         }
    ///     })
    ///     .await?;
    ///
    /// assert_eq!(value, 42);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_async<T, F, Fut>(&mut self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let delay = {
                let err = match operation().await {
                    Ok(value) => return Ok(value),
                    Err(err) => err,
                };

                match self.after_failure(&err, attempt) {
                    Some(delay) => delay,
                    None => return Err(err),
                }
            };

            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
        }
    }

    /// Notify the observer, then decide between giving up (`None`) and
    /// waiting `Some(delay)` milliseconds.
    fn after_failure(&mut self, err: &E, attempt: u32) -> Option<u64> {
        self.notify(err, attempt);

        if attempt >= self.max_attempts {
            warn!(
                attempt,
                max_attempts = self.max_attempts,
                "attempt budget exhausted, giving up"
            );
            return None;
        }

        let delay = self.delay(attempt);
        debug!(
            attempt,
            max_attempts = self.max_attempts,
            delay_ms = delay,
            strategy = self.strategy.name(),
            "attempt failed, retrying"
        );

        Some(delay)
    }

    fn notify(&mut self, err: &E, attempt: u32) {
        // Taken out for the duration of the call so the observer can borrow
        // the driver mutably.
        if let Some(mut observer) = self.observer.take() {
            observer(self, err, attempt);

            if self.observer.is_none() {
                self.observer = Some(observer);
            }
        }
    }
}

impl<E> fmt::Debug for RetryDriver<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryDriver")
            .field("strategy", &self.strategy)
            .field("max_attempts", &self.max_attempts)
            .field("max_delay", &self.max_delay)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}
