// src/scraper/retry.rs
use crate::scraper::ScraperError;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Wait applied to a 429 that carried no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(10);

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocks the current thread.
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Delay before the next attempt, given the 1-based number of the failed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed(Duration),
    Linear { step: Duration, max: Duration },
}

impl Backoff {
    pub fn delay(&self, failed_attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed(d) => d,
            Backoff::Linear { step, max } => std::cmp::min(step * failed_attempt, max),
        }
    }
}

/// What a walk does once a page has used up its attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustionPolicy {
    /// Surface the error and stop the whole walk.
    Abort,
    /// Record the page as empty and stop, keeping what was collected.
    EndWalk,
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
    pub default_retry_after: Duration,
    /// Whether a non-2xx, non-429 status is worth another attempt.
    pub retryable_status: fn(StatusCode) -> bool,
}

pub fn retry_any_status(_: StatusCode) -> bool {
    true
}

pub fn retry_server_errors(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(delay),
            default_retry_after: DEFAULT_RETRY_AFTER,
            retryable_status: retry_any_status,
        }
    }

    pub fn with_retryable_status(mut self, predicate: fn(StatusCode) -> bool) -> Self {
        self.retryable_status = predicate;
        self
    }

    fn is_retryable(&self, err: &ScraperError) -> bool {
        match err {
            ScraperError::Status { status, .. } => (self.retryable_status)(*status),
            ScraperError::InvalidUrl { .. } => false,
            _ => true,
        }
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    ///
    /// `op` receives the 1-based attempt number. A `RateLimited` error sleeps
    /// for the server's hint (or `default_retry_after`) and reissues the same
    /// attempt without spending budget.
    pub fn run<T, F>(&self, sleeper: &dyn Sleeper, mut op: F) -> Result<T, ScraperError>
    where
        F: FnMut(u32) -> Result<T, ScraperError>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(ScraperError::RateLimited { url, retry_after }) => {
                    let wait = retry_after.unwrap_or(self.default_retry_after);
                    warn!(%url, wait_secs = wait.as_secs(), "rate limited, waiting before retrying");
                    sleeper.sleep(wait);
                }
                Err(e) if !self.is_retryable(&e) => return Err(e),
                Err(e) => {
                    warn!(attempt, max_attempts, error = %e, "attempt failed");

                    if attempt >= max_attempts {
                        return Err(ScraperError::RetriesExhausted {
                            attempts: attempt,
                            last: Box::new(e),
                        });
                    }

                    sleeper.sleep(self.backoff.delay(attempt));
                    attempt += 1;
                }
            }
        }
    }
}
