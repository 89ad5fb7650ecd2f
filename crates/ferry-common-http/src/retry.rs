//! Retrying request sender.
//!
//! Transport failures are retried with exponential backoff: the first retry
//! waits `initial_backoff`, each later one twice as long as the previous.
//! Responses are never retried, whatever their status.

use crate::error::HttpError;
use crate::response::Response;
use crate::transport::Transport;
use ferry_common_async::{CancellationToken, Sleeper, TokioSleeper};
use reqwest::Request;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// How many times to try a request and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
        }
    }

    /// A policy that sends once and never retries.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(retry - 1);
        self.initial_backoff.saturating_mul(factor)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Sends requests through a [`Transport`], retrying transport failures.
#[derive(Debug, Clone)]
pub struct RetryingSender<T, S = TokioSleeper> {
    transport: T,
    policy: RetryPolicy,
    sleeper: S,
}

impl<T: Transport> RetryingSender<T> {
    /// Default policy, sleeping on the tokio timer.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
            sleeper: TokioSleeper,
        }
    }
}

impl<T: Transport, S: Sleeper> RetryingSender<T, S> {
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace how backoff delays are waited out.
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> RetryingSender<T, S2> {
        RetryingSender {
            transport: self.transport,
            policy: self.policy,
            sleeper,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request`, retrying transport failures per the policy.
    ///
    /// Returns the first response received, or the last transport error
    /// once attempts are exhausted. `cancel` is observed during the send and
    /// during every backoff sleep.
    #[instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    pub async fn send(
        &self,
        request: &Request,
        cancel: &CancellationToken,
    ) -> Result<Response, HttpError> {
        let max_attempts = self.policy.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            if cancel.is_cancelled() {
                return Err(HttpError::Cancelled);
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(HttpError::Cancelled),
                result = self.transport.send(request) => result,
            };

            let error = match result {
                Ok(response) => {
                    debug!(attempt, status = %response.status(), "exchange complete");
                    return Ok(response);
                }
                Err(error) => error,
            };

            if attempt >= max_attempts || !error.is_retryable() {
                return Err(HttpError::Transport {
                    attempts: attempt,
                    source: error,
                });
            }

            let delay = self.policy.backoff(attempt);
            warn!(attempt, max_attempts, ?delay, %error, "transport failure, retrying");

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(HttpError::Cancelled),
                _ = self.sleeper.sleep(delay) => {}
            }
        }
    }
}
