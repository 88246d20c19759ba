//! Bounded retry
//!
//! Runs an operation repeatedly while it reports a retryable failure, with
//! exponential backoff, until a deadline passes or a cancellation token
//! fires. The operation itself classifies each outcome.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Timing of a retry window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total window measured from the first attempt
    pub timeout: Duration,
    /// Delay before the second attempt
    pub initial_delay: Duration,
    /// Cap on any single delay
    pub max_delay: Duration,
}

/// Deadline used when the timeout does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

impl RetryPolicy {
    fn deadline_from(&self, start: Instant) -> Instant {
        start
            .checked_add(self.timeout)
            .unwrap_or_else(|| start + FAR_FUTURE)
    }

    fn next_delay(&self, current: Duration) -> Duration {
        (current * 2).min(self.max_delay)
    }
}

/// Classified result of one attempt
#[derive(Debug)]
pub enum Attempt<T, E> {
    Success(T),
    /// Try again after backing off
    Retryable(E),
    /// Stop immediately
    NonRetryable(E),
}

/// Why a retry loop ended without success
#[derive(Debug)]
pub enum RetryError<E> {
    /// The window elapsed while the last outcome was still retryable
    TimedOut { attempts: u32, last: E },
    /// An attempt reported a non-retryable failure
    Stopped(E),
    /// The token fired before the next attempt could start
    Cancelled,
}

/// Retry `op` until it succeeds, stops, the window elapses or `cancel` fires
///
/// The first attempt starts immediately. Waits are cut short at the
/// deadline, and no attempt is started once the deadline has passed. An
/// attempt already running is never interrupted.
pub async fn retry_until<T, E, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt<T, E>>,
    E: std::fmt::Display,
{
    let deadline = policy.deadline_from(Instant::now());
    let mut delay = policy.initial_delay;
    let mut attempts: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled);
        }

        attempts += 1;

        let last = match op().await {
            Attempt::Success(value) => return Ok(value),
            Attempt::NonRetryable(e) => return Err(RetryError::Stopped(e)),
            Attempt::Retryable(e) => e,
        };

        let now = Instant::now();
        if now >= deadline {
            return Err(RetryError::TimedOut { attempts, last });
        }

        let wait = delay.min(deadline - now);
        warn!(
            "Attempt {} failed with a retryable error, retrying in {:?}: {}",
            attempts, wait, last
        );

        tokio::select! {
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            _ = tokio::time::sleep(wait) => {}
        }

        if Instant::now() >= deadline {
            return Err(RetryError::TimedOut { attempts, last });
        }

        delay = policy.next_delay(delay);
    }
}
