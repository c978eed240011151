//! Example: Driving an unreliable operation with `RetryDriver`
//!
//! This example demonstrates:
//! 1. Simple retry with a capped linear strategy
//! 2. An error observer that aborts on non-transient failures
//! 3. An error observer that switches strategy mid-run
//! 4. Building a driver from configuration and running it async
//!
//! Run with:
//! ```bash
//! cargo run -p endure --example retry_example
//! ```

use endure::prelude::*;
use std::error::Error as StdError;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// A simulated API that fails the first few times
struct UnreliableApi {
    attempts: Arc<AtomicU32>,
    fail_count: u32,
    kind: io::ErrorKind,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self::failing_with(fail_count, io::ErrorKind::TimedOut)
    }

    fn failing_with(fail_count: u32, kind: io::ErrorKind) -> Self {
        Self {
            attempts: Arc::new(AtomicU32::new(0)),
            fail_count,
            kind,
        }
    }

    fn call(&self) -> Result<String, io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.fail_count {
            println!("  Attempt {}: FAILED ({:?})", attempt + 1, self.kind);
            Err(io::Error::new(
                self.kind,
                format!("Transient error on attempt {}", attempt + 1),
            ))
        } else {
            println!("  Attempt {}: SUCCESS", attempt + 1);
            Ok("API response data".to_string())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Example 1: Capped linear backoff
fn example_simple_retry() -> Result<(), Box<dyn StdError>> {
    println!("\n=== Example 1: Linear Backoff Capped at 150ms ===\n");

    let mut driver = RetryDriver::with_limits(LinearStrategy::new(100), 4, Some(150));
    let api = UnreliableApi::new(3);

    let start = Instant::now();
    let result = driver.run(|| api.call())?;

    println!("\nResult: {}", result);
    println!("Total attempts: {}", api.total_attempts());
    println!("Total time: {:?}", start.elapsed());
    println!("Expected delays: 100ms + 150ms + 150ms = ~400ms");

    Ok(())
}

/// Example 2: Observer that gives up on permission errors
fn example_abort_on_fatal() {
    println!("\n=== Example 2: Observer Aborts on Fatal Errors ===\n");

    let mut driver: RetryDriver<io::Error> = RetryDriver::new(ConstantStrategy::new(10));
    driver.set_error_observer(|driver, err, attempt| {
        if err.kind() == io::ErrorKind::PermissionDenied {
            println!("  Attempt {} is not retryable, stopping", attempt);
            driver.set_max_attempts(0);
        }
    });

    let api = UnreliableApi::failing_with(10, io::ErrorKind::PermissionDenied);
    let result = driver.run(|| api.call());

    assert!(result.is_err());
    println!("Total attempts: {}", api.total_attempts());
}

/// Example 3: Observer that slows down after repeated failures
fn example_switch_strategy() -> Result<(), Box<dyn StdError>> {
    println!("\n=== Example 3: Switching Strategy Mid-Run ===\n");

    let mut driver: RetryDriver<io::Error> =
        RetryDriver::with_limits(ConstantStrategy::new(10), 6, None);
    driver.set_error_observer(|driver, _, attempt| {
        if attempt == 2 {
            println!("  Two failures, switching to exponential backoff");
            driver.set_strategy(ExponentialStrategy::new(20));
        }
    });

    let api = UnreliableApi::new(4);
    let result = driver.run(|| api.call())?;

    println!("\nResult: {}", result);
    println!("Strategy now: {}", driver.strategy().name());

    Ok(())
}

/// Example 4: Configuration-driven async retry
async fn example_configured_async() -> Result<(), Box<dyn StdError>> {
    println!("\n=== Example 4: Driver From Configuration (async) ===\n");

    let config = RetryConfig::from_json(
        r#"{ "strategy": { "kind": "multiplicative", "delay_ms": 20, "multiplier": 1.5 },
             "max_attempts": 5 }"#,
    )?;
    let mut driver = config.build_driver::<io::Error>()?;

    let api = UnreliableApi::new(2);
    let result = driver.run_async(|| async { api.call() }).await?;

    println!("\nResult: {}", result);
    println!("Total attempts: {}", api.total_attempts());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn StdError>> {
    println!("==============================================");
    println!("   endure: Retry Driver Examples");
    println!("==============================================");

    example_simple_retry()?;
    example_abort_on_fatal();
    example_switch_strategy()?;
    example_configured_async().await?;

    println!("\n==============================================");
    println!("   All examples completed successfully!");
    println!("==============================================\n");

    Ok(())
}
