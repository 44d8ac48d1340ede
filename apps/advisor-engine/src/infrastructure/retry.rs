//! Bounded retry with exponential backoff and jitter.
//!
//! Retries live here, at the adapter boundary, and nowhere else: by
//! the time an error crosses a port it is terminal. Only transient
//! failures (timeouts, transport faults, retryable HTTP statuses) are
//! replayed; 4xx responses other than 408/425/429 are not.

use std::time::Duration;

use rand::Rng;

use crate::application::ports::CapabilityError;

/// Response bodies quoted in error messages are cut at this length.
const ERROR_BODY_LIMIT: usize = 256;

/// Retry schedule for one adapter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Ceiling on any single delay, before jitter.
    pub max_backoff: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier: f64,
    /// Fraction of the delay added as random jitter, in `[0, 1]`.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
            multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }
}

/// Iterator-style backoff calculator for a [`RetryPolicy`].
#[derive(Debug)]
pub struct ExponentialBackoff {
    policy: RetryPolicy,
    retries_taken: u32,
}

impl ExponentialBackoff {
    /// Start a fresh schedule.
    #[must_use]
    pub const fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            retries_taken: 0,
        }
    }

    /// Next delay to sleep before retrying, or `None` once the attempt
    /// budget is spent.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if self.retries_taken + 1 >= self.policy.max_attempts {
            return None;
        }
        let exp = self
            .policy
            .multiplier
            .powi(i32::try_from(self.retries_taken).unwrap_or(i32::MAX));
        let base = self.policy.initial_backoff.as_secs_f64() * exp;
        let capped = base.min(self.policy.max_backoff.as_secs_f64());
        let jitter = if self.policy.jitter_factor > 0.0 {
            rand::rng().random_range(0.0..self.policy.jitter_factor)
        } else {
            0.0
        };
        self.retries_taken += 1;
        Some(Duration::from_secs_f64(capped * (1.0 + jitter)))
    }
}

/// Whether an HTTP status is worth retrying.
#[must_use]
pub const fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 425 | 429) || status >= 500
}

/// Send a request, retrying transient failures per the policy.
///
/// Requests with streaming bodies cannot be replayed and get a single
/// attempt.
///
/// # Errors
///
/// Returns [`CapabilityError::RetriesExhausted`] once the attempt
/// budget is spent on retryable failures, or the classified error
/// directly when it is not retryable.
pub async fn execute_with_retry(
    request: reqwest::RequestBuilder,
    policy: RetryPolicy,
) -> Result<reqwest::Response, CapabilityError> {
    let mut backoff = ExponentialBackoff::new(policy);
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let this_try = match request.try_clone() {
            Some(cloned) => cloned,
            None => return send_once(request).await,
        };

        let error = match this_try.send().await {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) => http_error(response).await,
            Err(e) => classify_transport(&e),
        };

        if !error.is_retryable() {
            return Err(error);
        }
        match backoff.next_backoff() {
            Some(delay) => {
                tracing::debug!(attempts, delay_ms = delay.as_millis(), %error, "retrying request");
                tokio::time::sleep(delay).await;
            }
            None => {
                return Err(CapabilityError::RetriesExhausted {
                    attempts,
                    last: error.to_string(),
                });
            }
        }
    }
}

async fn send_once(request: reqwest::RequestBuilder) -> Result<reqwest::Response, CapabilityError> {
    match request.send().await {
        Ok(response) if response.status().is_success() => Ok(response),
        Ok(response) => Err(http_error(response).await),
        Err(e) => Err(classify_transport(&e)),
    }
}

async fn http_error(response: reqwest::Response) -> CapabilityError {
    let status = response.status().as_u16();
    let mut message = response.text().await.unwrap_or_default();
    if message.len() > ERROR_BODY_LIMIT {
        let mut cut = ERROR_BODY_LIMIT;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }
    CapabilityError::Http { status, message }
}

fn classify_transport(error: &reqwest::Error) -> CapabilityError {
    if error.is_timeout() {
        CapabilityError::Timeout
    } else {
        CapabilityError::Transport(error.to_string())
    }
}
