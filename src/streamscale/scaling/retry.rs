//! Retry policy and the retrying operation executor
//!
//! Every control-plane call goes through [`OperationExecutor::execute`]. Two
//! transient failure classes are retried: resource-busy (the target partition
//! is mid-mutation, fixed short delay) and throttling (deterministic
//! `2^attempt * backoff_unit` exponential backoff, no jitter). Anything else
//! is fatal and propagates immediately. Exhausting the attempt budget raises
//! [`ScalingError::OperationExhausted`]; the remote state is then unknown and
//! the caller must re-derive it before acting again.

use crate::streamscale::client::{ClientError, StreamControlPlane};
use crate::streamscale::partition::types::{StreamStatus, StreamSummary};
use crate::streamscale::scaling::cancel::CancelToken;
use crate::streamscale::scaling::compare::DEFAULT_COMPARISON_SCALE;
use crate::streamscale::scaling::error::ScalingError;
use log::{debug, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Attempt budget for read-only (describe/list) calls.
pub const DEFAULT_DESCRIBE_ATTEMPTS: u32 = 10;

/// Attempt budget for mutating (split/merge) calls.
pub const DEFAULT_MODIFY_ATTEMPTS: u32 = 10;

// control planes tend to throttle above ~10 calls/sec, so the backoff unit
// starts at 100ms
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_millis(100);

/// Fixed delay while the target resource is mid-mutation.
pub const DEFAULT_BUSY_DELAY: Duration = Duration::from_millis(1000);

// stream mutations take around 30 seconds, so the first status poll waits 20
pub const DEFAULT_INITIAL_STATUS_WAIT: Duration = Duration::from_secs(20);
pub const DEFAULT_STATUS_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Immutable retry configuration. Process-wide defaults, overridable per
/// coordinator through the builder.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempt cap for describe/list calls
    pub describe_attempts: u32,
    /// Attempt cap for split/merge calls
    pub modify_attempts: u32,
    /// Base unit for exponential throttle backoff
    pub backoff_unit: Duration,
    /// Fixed delay after a resource-busy signal
    pub busy_delay: Duration,
    /// Fractional-digit scale for keyspace-share comparisons
    pub comparison_scale: u32,
    /// First wait during stabilization polling
    pub initial_status_wait: Duration,
    /// Subsequent waits during stabilization polling
    pub status_poll_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            describe_attempts: DEFAULT_DESCRIBE_ATTEMPTS,
            modify_attempts: DEFAULT_MODIFY_ATTEMPTS,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
            busy_delay: DEFAULT_BUSY_DELAY,
            comparison_scale: DEFAULT_COMPARISON_SCALE,
            initial_status_wait: DEFAULT_INITIAL_STATUS_WAIT,
            status_poll_interval: DEFAULT_STATUS_POLL_INTERVAL,
        }
    }
}

impl RetryPolicy {
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::new()
    }

    /// Throttle backoff for the given attempt count: `2^attempt * unit`.
    /// Deterministic: no jitter, matching the reference behavior
    /// and keeping timing tests exact.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis((self.backoff_unit.as_millis() as u64).saturating_mul(factor))
    }
}

/// Builder for [`RetryPolicy`].
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
        }
    }

    pub fn describe_attempts(mut self, attempts: u32) -> Self {
        self.policy.describe_attempts = attempts;
        self
    }

    pub fn modify_attempts(mut self, attempts: u32) -> Self {
        self.policy.modify_attempts = attempts;
        self
    }

    pub fn backoff_unit(mut self, unit: Duration) -> Self {
        self.policy.backoff_unit = unit;
        self
    }

    pub fn busy_delay(mut self, delay: Duration) -> Self {
        self.policy.busy_delay = delay;
        self
    }

    pub fn comparison_scale(mut self, scale: u32) -> Self {
        self.policy.comparison_scale = scale;
        self
    }

    pub fn initial_status_wait(mut self, wait: Duration) -> Self {
        self.policy.initial_status_wait = wait;
        self
    }

    pub fn status_poll_interval(mut self, interval: Duration) -> Self {
        self.policy.status_poll_interval = interval;
        self
    }

    pub fn build(self) -> RetryPolicy {
        self.policy
    }
}

/// Runs control-plane operations with transient-failure retry, backoff, and
/// optional post-success stabilization.
pub struct OperationExecutor<C: StreamControlPlane> {
    client: Arc<C>,
    policy: RetryPolicy,
    cancel: CancelToken,
}

impl<C: StreamControlPlane> OperationExecutor<C> {
    pub fn new(client: Arc<C>, policy: RetryPolicy, cancel: CancelToken) -> Self {
        Self {
            client,
            policy,
            cancel,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `op` up to `max_attempts` times. On success, if `stabilize` is
    /// set, block until the stream reports ACTIVE again before returning.
    pub async fn execute<T, F, Fut>(
        &self,
        stream_id: &str,
        op: F,
        max_attempts: u32,
        stabilize: bool,
    ) -> Result<T, ScalingError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let value = self.run_with_retry(stream_id, op, max_attempts).await?;
        if stabilize {
            self.wait_for_status(stream_id, StreamStatus::Active)
                .await?;
        }
        Ok(value)
    }

    /// Describe the stream, with the read-only attempt budget.
    pub async fn describe(&self, stream_id: &str) -> Result<StreamSummary, ScalingError> {
        let client = Arc::clone(&self.client);
        let stream = stream_id.to_string();
        self.run_with_retry(
            stream_id,
            move || {
                let client = Arc::clone(&client);
                let stream = stream.clone();
                async move { client.describe_stream(&stream).await }
            },
            self.policy.describe_attempts,
        )
        .await
    }

    /// Poll the stream status until it equals `target`.
    ///
    /// The first wait is long (mutations take tens of seconds), subsequent
    /// waits are short. There is no attempt cap: an overall deadline is the
    /// caller's responsibility, enforced through the cancellation token.
    pub async fn wait_for_status(
        &self,
        stream_id: &str,
        target: StreamStatus,
    ) -> Result<(), ScalingError> {
        let mut wait = self.policy.initial_status_wait;
        loop {
            let summary = self.describe(stream_id).await?;
            if summary.status == target {
                return Ok(());
            }
            debug!(
                "Stream {} is {}, waiting for {}",
                stream_id, summary.status, target
            );
            self.pause("status poll", wait).await?;
            wait = self.policy.status_poll_interval;
        }
    }

    async fn run_with_retry<T, F, Fut>(
        &self,
        stream_id: &str,
        mut op: F,
        max_attempts: u32,
    ) -> Result<T, ScalingError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(ClientError::Busy { resource }) => {
                    // the target is still mid-mutation; wait until the
                    // closure propagates or attempts run out
                    debug!(
                        "Resource '{}' busy on stream {}, retrying",
                        resource, stream_id
                    );
                    self.pause("busy wait", self.policy.busy_delay).await?;
                }
                Err(ClientError::Throttled) => {
                    warn!("Throttled on stream {}", stream_id);
                    self.pause("throttle backoff", self.policy.backoff_delay(attempts))
                        .await?;
                }
                Err(fatal) => return Err(ScalingError::from_fatal(fatal, stream_id)),
            }

            if attempts >= max_attempts {
                return Err(ScalingError::OperationExhausted {
                    stream_id: stream_id.to_string(),
                    attempts,
                });
            }
        }
    }

    /// Sleep that races the cancellation token.
    async fn pause(&self, operation: &str, delay: Duration) -> Result<(), ScalingError> {
        // subscribe before the flag check: a trigger landing in between is
        // then caught by the flag, and one landing after by the receiver
        let mut cancelled = self.cancel.subscribe();
        if self.cancel.is_triggered() {
            return Err(ScalingError::Cancelled {
                operation: operation.to_string(),
            });
        }
        tokio::select! {
            _ = tokio::time::sleep(delay) => Ok(()),
            // any completion here means a trigger arrived: the executor holds
            // a sender, so the channel cannot close underneath us
            _ = cancelled.recv() => Err(ScalingError::Cancelled {
                operation: operation.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_delay_is_exponential() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(200));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(400));
        assert_eq!(policy.backoff_delay(5), Duration::from_millis(3200));
    }

    #[test]
    fn test_policy_builder() {
        let policy = RetryPolicy::builder()
            .modify_attempts(3)
            .backoff_unit(Duration::from_millis(50))
            .busy_delay(Duration::from_millis(10))
            .build();
        assert_eq!(policy.modify_attempts, 3);
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(200));
        assert_eq!(policy.busy_delay, Duration::from_millis(10));
        // untouched fields keep their defaults
        assert_eq!(policy.describe_attempts, DEFAULT_DESCRIBE_ATTEMPTS);
    }
}
