//! Caller-side retry with polling.
//!
//! Page operations never retry on their own; every wait inside them is bounded
//! once. Suites that run against a flaky environment wrap individual
//! operations with [`retry_on`], choosing which failures are worth another
//! attempt (usually [`ProbeError::is_widget_error`]).

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};
use tracing::warn;

/// Future returned by one attempt, borrowing the retried target
pub type Attempt<'t, R> = Pin<Box<dyn Future<Output = ProbeResult<R>> + Send + 't>>;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total time budget across attempts
    pub timeout: Duration,
    /// Pause between attempts
    pub poll_interval: Duration,
    /// Maximum number of attempts (0 = unlimited within timeout)
    pub max_attempts: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
            max_attempts: 0,
        }
    }
}

impl RetryConfig {
    /// Create a config with the given time budget
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(100),
            max_attempts: 0,
        }
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set maximum attempts
    #[must_use]
    pub const fn with_max_attempts(mut self, max: usize) -> Self {
        self.max_attempts = max;
        self
    }

    /// Short budget, fast polling
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            timeout: Duration::from_millis(500),
            poll_interval: Duration::from_millis(50),
            max_attempts: 0,
        }
    }

    /// Long budget, slow polling
    #[must_use]
    pub const fn slow() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
            max_attempts: 0,
        }
    }
}

/// A value produced after one or more attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retried<R> {
    /// Value of the successful attempt
    pub value: R,
    /// Attempts made, including the successful one
    pub attempts: usize,
    /// Time spent across all attempts
    pub duration: Duration,
}

/// Run `op` against `target` until it succeeds, fails with an error
/// `should_retry` rejects, or the budget in `config` runs out.
///
/// The last error is returned when the budget is exhausted.
///
/// ```ignore
/// retry_on(&mut page, &RetryConfig::fast(), ProbeError::is_widget_error, |p| {
///     Box::pin(p.select_dates("2026-11-12", "2026-11-20"))
/// })
/// .await?;
/// ```
pub async fn retry_on<T, R, F>(
    target: &mut T,
    config: &RetryConfig,
    should_retry: fn(&ProbeError) -> bool,
    mut op: F,
) -> ProbeResult<Retried<R>>
where
    T: ?Sized,
    F: for<'t> FnMut(&'t mut T) -> Attempt<'t, R>,
{
    let start = Instant::now();
    let mut attempts = 0;

    loop {
        attempts += 1;
        let err = match op(target).await {
            Ok(value) => {
                return Ok(Retried {
                    value,
                    attempts,
                    duration: start.elapsed(),
                })
            }
            Err(e) => e,
        };

        let exhausted = start.elapsed() >= config.timeout
            || (config.max_attempts > 0 && attempts >= config.max_attempts);
        if !should_retry(&err) || exhausted {
            return Err(err);
        }

        warn!(attempts, error = %err, "attempt failed, retrying");
        tokio::time::sleep(config.poll_interval).await;
    }
}
