//! Bounded retries with exponential backoff.
//!
//! Mirrors how the API behaves in practice: connection resets, rate limits and
//! 5xx responses usually clear up on a second try, everything else will fail
//! the same way again.

use std::future::Future;
use std::time::Duration;

use failsafe::backoff;

use crate::config::Config;
use crate::errors::AdsError;

const MIN_DELAY: Duration = Duration::from_millis(1);

/// How a failure should be treated by [`RetryPolicy::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transience {
    Transient,
    Fatal,
}

/// Default classifier built on [`AdsError::is_transient`].
pub fn classify(err: &AdsError) -> Transience {
    if err.is_transient() {
        Transience::Transient
    } else {
        Transience::Fatal
    }
}

/// Attempt bookkeeping for one [`RetryPolicy::run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub attempt: u32,
    pub max_attempts: u32,
}

impl RetryState {
    fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts,
        }
    }

    /// Counts one failed attempt and tells whether another one is allowed.
    pub fn record_failure(&mut self, transience: Transience) -> bool {
        self.attempt += 1;
        transience == Transience::Transient && self.attempt < self.max_attempts
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(30))
    }
}

impl RetryPolicy {
    /// At least one attempt is always made; delays are clamped to 1ms.
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        let base_delay = base_delay.max(MIN_DELAY);
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: max_delay.max(base_delay),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_base_delay_ms),
            Duration::from_secs(30),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs `operation` with [`classify`] as classifier.
    pub async fn run_default<T, F, Fut>(&self, what: &str, operation: F) -> Result<T, AdsError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AdsError>>,
    {
        self.run(what, operation, classify).await
    }

    /// Invokes `operation` until it succeeds, fails fatally, or attempts run out.
    ///
    /// The error of the last attempt is returned unchanged.
    pub async fn run<T, F, Fut, C>(
        &self,
        what: &str,
        mut operation: F,
        classify: C,
    ) -> Result<T, AdsError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AdsError>>,
        C: Fn(&AdsError) -> Transience,
    {
        let mut state = RetryState::new(self.max_attempts);
        let mut delays = backoff::exponential(self.base_delay, self.max_delay);

        loop {
            match operation().await {
                Ok(value) => {
                    if state.attempt > 0 {
                        tracing::info!("{} succeeded after {} retries", what, state.attempt);
                    }
                    return Ok(value);
                }
                Err(err) => {
                    let transience = classify(&err);
                    if !state.record_failure(transience) {
                        if transience == Transience::Transient {
                            tracing::error!(
                                "{} failed after {} attempts: {}",
                                what,
                                state.attempt,
                                err
                            );
                        }
                        return Err(err);
                    }

                    let delay = delays.next().unwrap_or(self.max_delay);
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}. Retrying in {:?}",
                        what,
                        state.attempt,
                        state.max_attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
