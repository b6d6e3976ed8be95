//! Shows the admission gate deferring calls past the concurrency limit,
//! with the LogWriter subscriber printing lifecycle events.
//!
//! Run with: `cargo run --example bounded_concurrency --features logging`

use std::sync::Arc;
use std::time::Duration;

use redial::{
    CallFn, CallOptions, Completion, LogWriter, Scheduler, SchedulerConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = Scheduler::new(SchedulerConfig {
        limit: 2,
        ..SchedulerConfig::default()
    });
    let _forwarder = scheduler.attach_subscriber(Arc::new(LogWriter));

    // Each dispatch takes 300ms; with limit=2 the six calls run in waves.
    let op = CallFn::new("slow-op", |id: u32, done: Completion<u32>| {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            done.resolve(id);
        });
        Ok(())
    });
    let call = scheduler.schedule(op, CallOptions::default());

    let mut handles = Vec::new();
    for id in 0..6 {
        let call = call.clone();
        handles.push(tokio::spawn(async move { call.call(id).await }));
    }
    for handle in handles {
        let id = handle.await??;
        println!("settled: {id} (in_flight={})", scheduler.gate().in_flight());
    }
    Ok(())
}
