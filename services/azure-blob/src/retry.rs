use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use log::warn;

use sasgen_core::Result;

type SleepFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type SleepFn = Arc<dyn Fn(Duration) -> SleepFuture + Send + Sync>;

/// Bounded retry with a fixed delay between attempts.
///
/// Every error is retried the same way; there is no transient/permanent
/// split. An operation runs at most `1 + max_retries` times and the last
/// error is returned when the budget is exhausted.
#[derive(Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    delay: Duration,
    sleep: SleepFn,
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("delay", &self.delay)
            .finish()
    }
}

impl Default for RetryPolicy {
    /// Three retries with a one second delay.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    /// Create a policy with the given retry budget and inter-attempt delay.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay,
            sleep: Arc::new(|d| Box::pin(tokio::time::sleep(d))),
        }
    }

    /// Replace the sleep implementation.
    ///
    /// Tests use this to record delays instead of waiting them out.
    pub fn with_sleep_fn(
        mut self,
        sleep: impl Fn(Duration) -> SleepFuture + Send + Sync + 'static,
    ) -> Self {
        self.sleep = Arc::new(sleep);
        self
    }

    /// Run `f` under this policy, returning its first success or the error
    /// of the final attempt.
    pub async fn run<T, F, Fut>(&self, op: &str, f: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retries = 0;
        loop {
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    retries += 1;
                    if retries > self.max_retries {
                        return Err(e);
                    }
                    warn!("{op} failed (retry {retries}/{}): {e}", self.max_retries);
                    (self.sleep)(self.delay).await;
                }
            }
        }
    }
}
