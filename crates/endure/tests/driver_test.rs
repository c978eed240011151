//! Retry driver behaviour tests
//!
//! Exercises the public attempt loop end to end:
//! - Attempt counting and budget exhaustion
//! - Observer interception and mid-run reconfiguration
//! - Delay computation with and without a cap
//! - Blocking and async runs

use endure::prelude::*;
use rstest::*;
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Failure(u32);

#[fixture]
fn instant_driver() -> RetryDriver<Failure> {
    RetryDriver::new(LinearStrategy::new(0))
}

/// Counts observer invocations and records the attempt numbers seen.
fn recording_observer(driver: &mut RetryDriver<Failure>) -> Arc<Mutex<Vec<u32>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);
    driver.set_error_observer(move |_, _, attempt| {
        seen_clone.lock().unwrap().push(attempt);
    });
    seen
}

#[rstest]
#[case::linear(Box::new(LinearStrategy::new(100)) as Box<dyn DelayStrategy>, [100, 200, 250, 250, 250])]
#[case::constant(Box::new(ConstantStrategy::new(100)), [100, 100, 100, 100, 100])]
#[case::exponential(Box::new(ExponentialStrategy::new(100)), [100, 200, 250, 250, 250])]
#[case::multiplicative(
    Box::new(MultiplicativeStrategy::new(100, 1.5).unwrap()),
    [100, 150, 225, 250, 250]
)]
fn test_delay_is_capped(#[case] strategy: Box<dyn DelayStrategy>, #[case] expected: [u64; 5]) {
    let driver: RetryDriver<Failure> = RetryDriver::with_limits(strategy, 5, Some(250));

    let delays: Vec<u64> = (1..=5).map(|attempt| driver.delay(attempt)).collect();
    assert_eq!(delays, expected.to_vec());
}

#[rstest]
fn test_success_runs_once(mut instant_driver: RetryDriver<Failure>) {
    let seen = recording_observer(&mut instant_driver);

    let mut calls = 0;
    let result = instant_driver.run(|| {
        calls += 1;
        Ok::<_, Failure>("success")
    });

    assert_eq!(result, Ok("success"));
    assert_eq!(calls, 1);
    assert!(seen.lock().unwrap().is_empty());
}

#[rstest]
fn test_failure_exhausts_budget(mut instant_driver: RetryDriver<Failure>) {
    let seen = recording_observer(&mut instant_driver);

    let mut calls = 0;
    let result: Result<(), Failure> = instant_driver.run(|| {
        calls += 1;
        Err(Failure(calls))
    });

    // Last failure is returned untouched, earlier ones are dropped
    assert_eq!(result, Err(Failure(5)));
    assert_eq!(calls, 5);
    // The observer sees the terminal failure too
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
}

#[rstest]
fn test_success_on_fifth_attempt(mut instant_driver: RetryDriver<Failure>) {
    let seen = recording_observer(&mut instant_driver);

    let mut calls = 0;
    let result = instant_driver.run(|| {
        calls += 1;
        if calls < 5 {
            Err(Failure(calls))
        } else {
            Ok("success")
        }
    });

    assert_eq!(result, Ok("success"));
    assert_eq!(calls, 5);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(5)]
fn test_observer_aborts_at_attempt(mut instant_driver: RetryDriver<Failure>, #[case] stop_at: u32) {
    let observed = Arc::new(AtomicU32::new(0));
    let observed_clone = Arc::clone(&observed);
    instant_driver.set_error_observer(move |driver, _, attempt| {
        observed_clone.fetch_add(1, Ordering::SeqCst);
        if attempt >= stop_at {
            driver.set_max_attempts(0);
        }
    });

    let mut calls = 0;
    let result: Result<(), Failure> = instant_driver.run(|| {
        calls += 1;
        Err(Failure(calls))
    });

    assert_eq!(result, Err(Failure(stop_at)));
    assert_eq!(calls, stop_at);
    assert_eq!(observed.load(Ordering::SeqCst), stop_at);
}

#[rstest]
fn test_observer_extends_budget(mut instant_driver: RetryDriver<Failure>) {
    instant_driver.set_error_observer(|driver, _, attempt| {
        if attempt == 5 {
            driver.set_max_attempts(8);
        }
    });

    let mut calls = 0;
    let result: Result<(), Failure> = instant_driver.run(|| {
        calls += 1;
        Err(Failure(calls))
    });

    assert_eq!(result, Err(Failure(8)));
    assert_eq!(calls, 8);
}

#[rstest]
fn test_observer_swaps_strategy(mut instant_driver: RetryDriver<Failure>) {
    instant_driver.set_error_observer(|driver, _, attempt| {
        if attempt > 2 {
            driver.set_strategy(ConstantStrategy::new(0));
        }
    });

    let mut calls = 0;
    let result: Result<(), Failure> = instant_driver.run(|| {
        calls += 1;
        Err(Failure(calls))
    });

    assert!(result.is_err());
    assert_eq!(calls, 5);
    assert_eq!(instant_driver.strategy().name(), "constant");
}

#[test]
fn test_swapped_strategy_drives_next_delay() {
    // A 10s linear delay would make the test hang; the observer replaces it
    // before the first sleep.
    let mut driver: RetryDriver<Failure> =
        RetryDriver::with_limits(LinearStrategy::new(10_000), 3, None);
    driver.set_error_observer(|driver, _, _| {
        driver.set_strategy(ConstantStrategy::new(1));
    });

    let start = Instant::now();
    let result: Result<(), Failure> = driver.run(|| Err(Failure(0)));

    assert!(result.is_err());
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_observer_lowers_cap_mid_run() {
    let mut driver: RetryDriver<Failure> =
        RetryDriver::with_limits(ConstantStrategy::new(10_000), 2, None);
    driver.set_error_observer(|driver, _, _| {
        driver.set_max_delay(Some(0));
    });

    let start = Instant::now();
    let _ = driver.run(|| Err::<(), _>(Failure(0)));

    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_driver_is_reusable_across_runs() {
    let mut driver: RetryDriver<Failure> = RetryDriver::with_limits(ConstantStrategy::new(0), 2, None);

    let first: Result<(), Failure> = driver.run(|| Err(Failure(1)));
    let second = driver.run(|| Ok::<_, Failure>(2));

    assert_eq!(first, Err(Failure(1)));
    assert_eq!(second, Ok(2));
}

#[test]
fn test_configured_driver_runs() {
    let config = RetryConfig {
        strategy: StrategyConfig::Constant { delay_ms: 0 },
        max_attempts: 3,
        max_delay_ms: None,
    };
    let mut driver = config.build_driver::<io::Error>().unwrap();

    let mut calls = 0;
    let result = driver.run(|| {
        calls += 1;
        if calls < 3 {
            Err(io::Error::other("flaky"))
        } else {
            Ok(calls)
        }
    });

    assert_eq!(result.unwrap(), 3);
}

#[tokio::test]
async fn test_run_async_exhausts_budget() {
    let mut driver: RetryDriver<io::Error> =
        RetryDriver::with_limits(ExponentialStrategy::new(1), 3, None);

    let seen = Arc::new(AtomicU32::new(0));
    let seen_clone = Arc::clone(&seen);
    driver.set_error_observer(move |_, _, _| {
        seen_clone.fetch_add(1, Ordering::SeqCst);
    });

    let attempts = Arc::new(AtomicU32::new(0));
    let attempts_clone = Arc::clone(&attempts);

    let result = driver
        .run_async(|| {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(io::Error::other("always fail"))
            }
        })
        .await;

    assert_eq!(result.unwrap_err().to_string(), "always fail");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(seen.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_run_async_observer_aborts() {
    let mut driver: RetryDriver<io::Error> = RetryDriver::new(ConstantStrategy::new(0));
    driver.set_error_observer(|driver, err, _| {
        if err.kind() == io::ErrorKind::PermissionDenied {
            driver.set_max_attempts(0);
        }
    });

    let attempts = Arc::new(AtomicU32::new(0));
    let attempts_clone = Arc::clone(&attempts);

    let result = driver
        .run_async(|| {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(io::Error::new(io::ErrorKind::PermissionDenied, "auth failed"))
            }
        })
        .await;

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}
