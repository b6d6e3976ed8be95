//! Schedules a flaky callback-style operation with a retry budget.
//!
//! Run with: `cargo run --example retrying_call`

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use redial::{CallFn, CallOptions, Completion, RawFailure, Scheduler, SchedulerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = Scheduler::new(SchedulerConfig::default());

    // Fails twice with a retryable status, then succeeds.
    let attempts = Arc::new(AtomicU32::new(0));
    let op = CallFn::new("flaky-lookup", {
        let attempts = attempts.clone();
        move |key: String, done: Completion<String>| {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            println!("dispatch #{n} for key={key}");
            if n < 3 {
                done.reject(RawFailure::new("upstream unavailable").with_status(503));
            } else {
                done.resolve(format!("value-of-{key}"));
            }
            Ok(())
        }
    });

    let lookup = scheduler.schedule(
        op,
        CallOptions::default()
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(3)
            .with_retry_delay(Duration::from_millis(200)),
    );

    let value = lookup.call("alpha".to_string()).await?;
    println!("resolved: {value}");
    Ok(())
}
