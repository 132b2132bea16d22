use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::RetryPolicy;
use crate::error::AttemptError;

/// Terminal state of one governed network operation.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// Operation succeeded; the value is returned upward
    Done(T),
    /// Retry budget exhausted; this page or detail fetch is skipped and the
    /// run continues
    Failed,
    /// The post-cooldown retry was blocked again; the entire run stops
    Aborted,
}

impl<T> FetchOutcome<T> {
    pub fn is_aborted(&self) -> bool {
        matches!(self, FetchOutcome::Aborted)
    }
}

/// Counters from one governed operation, folded into the run state.
#[derive(Debug, Default, Clone, Copy)]
pub struct AttemptReport {
    pub attempts: u32,
    pub block_hits: u32,
}

/// Runs a network operation under the retry/backoff state machine.
///
/// Transient failures get a cheap bounded retry with a randomized delay in
/// [backoff_min, backoff_max). A detected block gets the expensive path: one
/// long cooldown and a single retry of the same operation; a second block
/// aborts. The two are kept distinct so ordinary flakiness never triggers
/// the cooldown and a block never burns rapid-fire retries.
pub async fn govern<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> (FetchOutcome<T>, AttemptReport)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let mut report = AttemptReport::default();

    loop {
        report.attempts += 1;
        match op().await {
            Ok(value) => return (FetchOutcome::Done(value), report),
            Err(AttemptError::Blocked) => {
                report.block_hits += 1;
                ::log::warn!(
                    "Block detected, cooling down {}s before one retry",
                    policy.block_cooldown().as_secs()
                );
                sleep(policy.block_cooldown()).await;

                report.attempts += 1;
                return match op().await {
                    Ok(value) => (FetchOutcome::Done(value), report),
                    Err(AttemptError::Blocked) => {
                        report.block_hits += 1;
                        ::log::error!("Still blocked after cooldown, aborting run");
                        (FetchOutcome::Aborted, report)
                    }
                    Err(AttemptError::Transient(e)) => {
                        ::log::warn!("Post-cooldown retry failed: {}", e);
                        (FetchOutcome::Failed, report)
                    }
                };
            }
            Err(AttemptError::Transient(e)) => {
                if report.attempts >= policy.max_attempts {
                    ::log::warn!(
                        "Giving up after {} attempts: {}",
                        report.attempts,
                        e
                    );
                    return (FetchOutcome::Failed, report);
                }
                let delay = jitter_delay(policy);
                ::log::debug!(
                    "Attempt {} failed ({}), retrying in {}ms",
                    report.attempts,
                    e,
                    delay.as_millis()
                );
                sleep(delay).await;
            }
        }
    }
}

/// A randomized delay in [backoff_min, backoff_max), also used as the
/// inter-page pacing jitter.
pub fn jitter_delay(policy: &RetryPolicy) -> Duration {
    let min = policy.backoff_min_ms;
    let max = policy.backoff_max_ms.max(min + 1);
    let ms = rand::thread_rng().gen_range(min..max);
    Duration::from_millis(ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use std::cell::Cell;
    use std::io;

    fn transient() -> AttemptError {
        AttemptError::Transient(ScrapeError::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            "page load timed out",
        )))
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let policy = RetryPolicy::immediate();
        let (outcome, report) = govern(&policy, || async { Ok::<_, AttemptError>(42) }).await;

        assert!(matches!(outcome, FetchOutcome::Done(42)));
        assert_eq!(report.attempts, 1);
        assert_eq!(report.block_hits, 0);
    }

    #[tokio::test]
    async fn test_transient_failures_retried_then_done() {
        let policy = RetryPolicy::immediate();
        let calls = Cell::new(0u32);

        let (outcome, report) = govern(&policy, || {
            let n = calls.get() + 1;
            calls.set(n);
            async move {
                if n < 3 {
                    Err(transient())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert!(matches!(outcome, FetchOutcome::Done(3)));
        assert_eq!(report.attempts, 3);
    }

    #[tokio::test]
    async fn test_transient_budget_exhausted_fails() {
        let policy = RetryPolicy::immediate();
        let calls = Cell::new(0u32);

        let (outcome, report) = govern(&policy, || {
            calls.set(calls.get() + 1);
            async { Err::<u32, _>(transient()) }
        })
        .await;

        assert!(matches!(outcome, FetchOutcome::Failed));
        assert_eq!(report.attempts, 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_block_then_success_is_done() {
        let policy = RetryPolicy::immediate();
        let calls = Cell::new(0u32);

        let (outcome, report) = govern(&policy, || {
            let n = calls.get() + 1;
            calls.set(n);
            async move {
                if n == 1 {
                    Err(AttemptError::Blocked)
                } else {
                    Ok("page source")
                }
            }
        })
        .await;

        assert!(matches!(outcome, FetchOutcome::Done("page source")));
        assert_eq!(report.block_hits, 1);
        assert_eq!(report.attempts, 2);
    }

    #[tokio::test]
    async fn test_block_twice_aborts() {
        let policy = RetryPolicy::immediate();

        let (outcome, report) =
            govern(&policy, || async { Err::<u32, _>(AttemptError::Blocked) }).await;

        assert!(outcome.is_aborted());
        assert_eq!(report.block_hits, 2);
        assert_eq!(report.attempts, 2);
    }

    #[tokio::test]
    async fn test_transient_after_cooldown_fails_without_abort() {
        let policy = RetryPolicy::immediate();
        let calls = Cell::new(0u32);

        let (outcome, _) = govern(&policy, || {
            let n = calls.get() + 1;
            calls.set(n);
            async move {
                if n == 1 {
                    Err::<u32, _>(AttemptError::Blocked)
                } else {
                    Err(transient())
                }
            }
        })
        .await;

        assert!(matches!(outcome, FetchOutcome::Failed));
    }

    #[test]
    fn test_jitter_delay_within_bounds() {
        let policy = RetryPolicy {
            backoff_min_ms: 2000,
            backoff_max_ms: 5000,
            ..RetryPolicy::immediate()
        };

        for _ in 0..50 {
            let d = jitter_delay(&policy);
            assert!(d >= Duration::from_millis(2000));
            assert!(d < Duration::from_millis(5000));
        }
    }
}
