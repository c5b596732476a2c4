//! Bounded exponential backoff with jitter around any fallible call.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::error::{Error, Result};

/// Upper bound of the jitter added to every delay, as a fraction of the delay
const JITTER_FACTOR: f64 = 0.25;

/// Retry limits and backoff schedule
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt; `0` runs the operation once
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }
}

/// Delay before retry `attempt` (0-based), without jitter
///
/// `min(initial_delay * multiplier^attempt, max_delay)`
pub fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let secs = config.initial_delay.as_secs_f64() * config.backoff_multiplier.powi(exponent);
    if !secs.is_finite() || secs < 0.0 {
        return config.max_delay;
    }
    Duration::from_secs_f64(secs.min(config.max_delay.as_secs_f64()))
}

/// [`backoff_delay`] plus uniform jitter in `[0, 0.25 * delay]`
pub fn jittered_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let delay = backoff_delay(config, attempt);
    let jitter = rand::thread_rng().gen_range(0.0..=JITTER_FACTOR);
    delay + delay.mul_f64(jitter)
}

/// Decides whether a failed attempt is retried; receives the 0-based attempt index
pub type RetryPredicate = Arc<dyn Fn(&Error, u32) -> bool + Send + Sync>;

/// Retries rate limiting, server errors and transport connect/timeout failures
pub fn default_predicate(err: &Error, _attempt: u32) -> bool {
    err.is_retryable()
}

/// Retry policy: a backoff schedule plus a retry predicate
///
/// The final error is returned unchanged once the budget is spent or the
/// predicate declines.
#[derive(Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    predicate: RetryPredicate,
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            predicate: Arc::new(default_predicate),
        }
    }

    pub fn with_predicate<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Error, u32) -> bool + Send + Sync + 'static,
    {
        self.predicate = Arc::new(predicate);
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    fn should_retry(&self, err: &Error, attempt: u32) -> bool {
        attempt < self.config.max_retries && (self.predicate)(err, attempt)
    }

    fn next_delay(&self, err: &Error, attempt: u32) -> Duration {
        let delay = jittered_delay(&self.config, attempt);
        warn!(
            attempt = attempt + 1,
            max_retries = self.config.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "retrying after failure"
        );
        delay
    }

    /// Run `op` until it succeeds or the policy gives up
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if self.should_retry(&err, attempt) => {
                    tokio::time::sleep(self.next_delay(&err, attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Blocking counterpart of [`RetryPolicy::run`]; sleeps the current thread
    pub fn run_blocking<T, F>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if self.should_retry(&err, attempt) => {
                    std::thread::sleep(self.next_delay(&err, attempt));
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Wrap `f` so every call goes through this policy
    pub fn wrap<F>(&self, f: F) -> Retryable<F> {
        Retryable {
            policy: self.clone(),
            f,
        }
    }
}

/// A function bound to a [`RetryPolicy`]
///
/// Arguments are cloned for each attempt.
#[derive(Debug, Clone)]
pub struct Retryable<F> {
    policy: RetryPolicy,
    f: F,
}

impl<F> Retryable<F> {
    pub async fn call<A, T, Fut>(&self, args: A) -> Result<T>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T>>,
        A: Clone,
    {
        self.policy.run(|| (self.f)(args.clone())).await
    }

    pub fn call_blocking<A, T>(&self, args: A) -> Result<T>
    where
        F: Fn(A) -> Result<T>,
        A: Clone,
    {
        self.policy.run_blocking(|| (self.f)(args.clone()))
    }
}

/// Run `op` under the default policy
pub async fn with_retry<T, F, Fut>(op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    RetryPolicy::default().run(op).await
}

/// Run `op` under the default policy, blocking between attempts
pub fn with_retry_blocking<T, F>(op: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    RetryPolicy::default().run_blocking(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig::default()
            .with_initial_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(4))
    }

    fn api(status: u16) -> Error {
        Error::Api {
            status,
            message: format!("HTTP {}", status),
            body: None,
        }
    }

    #[test]
    fn test_backoff_grows_then_caps() {
        let config = RetryConfig::default();
        let delays: Vec<_> = (0..10).map(|a| backoff_delay(&config, a)).collect();
        assert_eq!(delays[0], Duration::from_secs(1));
        assert_eq!(delays[1], Duration::from_secs(2));
        assert_eq!(delays[4], Duration::from_secs(16));
        assert_eq!(delays[5], Duration::from_secs(30));
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        assert!(delays.iter().all(|d| *d <= config.max_delay));
        assert_eq!(backoff_delay(&config, u32::MAX), config.max_delay);
    }

    #[test]
    fn test_jitter_stays_within_quarter() {
        let config = RetryConfig::default();
        for attempt in 0..6 {
            let base = backoff_delay(&config, attempt);
            let delay = jittered_delay(&config, attempt);
            assert!(delay >= base);
            assert!(delay <= base + base.mul_f64(JITTER_FACTOR));
        }
    }

    #[test]
    fn test_predicate_sees_attempt_index() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let record = seen.clone();
        let policy = RetryPolicy::new(fast()).with_predicate(move |_, attempt| {
            record.lock().unwrap().push(attempt);
            attempt < 1
        });
        let calls = AtomicU32::new(0);
        let result: Result<()> = policy.run_blocking(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(api(400))
        });
        assert_eq!(result.unwrap_err().status_code(), Some(400));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_zero_retries_runs_once() {
        let policy = RetryPolicy::new(fast().with_max_retries(0));
        let calls = AtomicU32::new(0);
        let result: Result<()> = policy.run_blocking(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(api(503))
        });
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wrapped_function_retries_each_call() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let fetch = RetryPolicy::new(fast()).wrap(move |ticker: String| {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                    Err(api(500))
                } else {
                    Ok(format!("{}-ok", ticker))
                }
            }
        });
        assert_eq!(fetch.call("A".to_string()).await.unwrap(), "A-ok");
        assert_eq!(fetch.call("B".to_string()).await.unwrap(), "B-ok");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
