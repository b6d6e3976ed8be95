//! # Value-carrying delay.
//!
//! [`delay`] settles with a given value once a duration has elapsed. It backs
//! the retry backoff between attempts and is exported as a standalone
//! utility for embedding applications.

use std::time::Duration;

use tokio::time;

/// Resolves with `value` no earlier than `after` has elapsed.
///
/// Never fails; the only way to cancel it is to drop the future.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use redial::delay;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let x = delay(Duration::from_millis(5), "x").await;
///     assert_eq!(x, "x");
/// }
/// ```
pub async fn delay<T>(after: Duration, value: T) -> T {
    time::sleep(after).await;
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn resolves_with_value_after_duration() {
        let start = Instant::now();
        let got = delay(Duration::from_millis(30), "x").await;
        assert_eq!(got, "x");
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_resolves_immediately() {
        let got = delay(Duration::ZERO, 7u32).await;
        assert_eq!(got, 7);
    }
}
