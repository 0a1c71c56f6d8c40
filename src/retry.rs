//! Bounded retry with a fixed delay between attempts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Delay used when the caller does not pick one.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Raised once every attempt of a [`retry`] sequence has failed.
///
/// `attempts` is the configured retry budget; the operation itself ran
/// `attempts + 1` times. Only the last failure is kept.
#[derive(Debug, thiserror::Error)]
#[error("failed after {attempts} attempts: {last_error}")]
pub struct RetryError<E: fmt::Debug + fmt::Display> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `operation` until it succeeds, at most `max_attempts + 1` times,
/// sleeping `delay` between consecutive attempts.
///
/// `max_attempts = 0` runs the operation exactly once and never sleeps.
pub async fn retry<T, E, F, Fut>(
    mut operation: F,
    max_attempts: u32,
    delay: Duration,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Debug + fmt::Display,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("Attempt {} succeeded", attempt + 1);
                }
                return Ok(value);
            }
            Err(e) => {
                warn!("Attempt {}/{} failed: {}", attempt + 1, max_attempts + 1, e);

                if attempt >= max_attempts {
                    return Err(RetryError {
                        attempts: max_attempts,
                        last_error: e,
                    });
                }

                debug!("Retrying in {}ms", delay.as_millis());
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Retry settings, typically loaded from the `[retry]` config table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_attempts: u32,

    /// Fixed wait between attempts, in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay_ms: delay.as_millis() as u64,
        }
    }

    /// A policy that runs the operation once.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Run `operation` under this policy.
    pub async fn run<T, E, F, Fut>(&self, operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Debug + fmt::Display,
    {
        retry(operation, self.max_attempts, self.delay()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    /// Operation that fails until its `succeed_at`-th call (0-indexed).
    fn flaky(calls: &AtomicU32, succeed_at: Option<u32>) -> impl Future<Output = Result<u32, String>> + '_ {
        async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            match succeed_at {
                Some(k) if n >= k => Ok(n),
                _ => Err(format!("boom #{}", n)),
            }
        }
    }

    /// Paused-clock sleeps may round up to the next timer tick.
    fn assert_waited(start: Instant, ms: u64) {
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(ms), "waited {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(ms + 50), "waited {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn first_attempt_success_never_sleeps() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let out = retry(|| flaky(&calls, Some(0)), 3, Duration::from_millis(1000)).await;

        assert_eq!(out.unwrap(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn success_at_attempt_k_waits_k_times() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let out = retry(|| flaky(&calls, Some(2)), 3, Duration::from_millis(1000)).await;

        assert_eq!(out.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_waited(start, 2000);
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_last_allowed_attempt() {
        let calls = AtomicU32::new(0);

        let out = retry(|| flaky(&calls, Some(3)), 3, Duration::from_millis(10)).await;

        assert_eq!(out.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_reports_budget_and_last_error() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let err = retry(|| flaky(&calls, None), 2, Duration::from_millis(500))
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_waited(start, 1000);
        assert_eq!(err.attempts, 2);
        assert_eq!(err.last_error, "boom #2");
        assert_eq!(err.to_string(), "failed after 2 attempts: boom #2");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_runs_once() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let err = retry(|| flaky(&calls, None), 0, Duration::from_millis(1000))
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(err.attempts, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_invocations_do_not_share_counters() {
        let policy = RetryPolicy::new(1, Duration::from_millis(100));

        for _ in 0..2 {
            let calls = AtomicU32::new(0);
            let out = policy.run(|| flaky(&calls, Some(1))).await;
            assert_eq!(out.unwrap(), 1);
            assert_eq!(calls.load(Ordering::SeqCst), 2);
        }
    }

    #[test]
    fn default_policy_uses_one_second_delay() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(), Duration::from_secs(1));
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(RetryPolicy::none().max_attempts, 0);
    }
}
