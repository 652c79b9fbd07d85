// SPDX-License-Identifier: MIT
//! Fixed-delay retry for the startup database connection.
//!
//! Provides [`retry_fixed`], which retries a fallible async operation a
//! bounded number of times with a constant delay between attempts.

use std::time::Duration;

use tracing::{debug, warn};

/// Configuration for [`retry_fixed`].
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first try).
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    /// A config suitable for quick unit tests (no real waiting).
    pub fn instant() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1),
        }
    }
}

/// Retry an async operation with a fixed delay between attempts.
///
/// Calls `f()` up to `config.max_attempts` times. Returns `Ok(value)` on the
/// first success, or `Err(last_error)` once all attempts are exhausted.
///
/// # Panics
/// Panics if `config.max_attempts` is 0 (would never attempt the operation).
pub async fn retry_fixed<F, Fut, T, E>(config: &RetryConfig, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Debug,
{
    assert!(
        config.max_attempts > 0,
        "RetryConfig.max_attempts must be at least 1"
    );

    let mut last_err: Option<E> = None;

    for attempt in 1..=config.max_attempts {
        match f().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "retry succeeded");
                }
                return Ok(value);
            }
            Err(e) => {
                if attempt < config.max_attempts {
                    warn!(
                        attempt,
                        max = config.max_attempts,
                        delay_ms = config.delay.as_millis(),
                        err = ?e,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(config.delay).await;
                } else {
                    warn!(
                        attempt,
                        max = config.max_attempts,
                        err = ?e,
                        "all retry attempts exhausted"
                    );
                    last_err = Some(e);
                }
            }
        }
    }

    // The loop always assigns last_err when all attempts fail.
    Err(last_err.expect("retry loop ended without setting last_err"))
}
