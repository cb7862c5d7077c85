//! Split/merge mutation coordination
//!
//! The coordinator is the write path of the crate: it validates a mutation
//! locally where it can, issues it through the retrying executor, and
//! optionally blocks until the stream stabilizes. It also exposes the
//! read-side view (the derived open-partition map), which callers re-fetch
//! immediately before any dependent mutation; nothing is cached here.

use crate::streamscale::client::StreamControlPlane;
use crate::streamscale::partition::registry;
use crate::streamscale::partition::types::{
    OpenPartitionMap, Partition, SortOrder, StreamStatus, StreamSummary,
};
use crate::streamscale::scaling::cancel::CancelToken;
use crate::streamscale::scaling::compare::keyspace_compare_at_scale;
use crate::streamscale::scaling::error::ScalingError;
use crate::streamscale::scaling::retry::{OperationExecutor, RetryPolicy};
use log::debug;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A requested partition mutation.
///
/// `wait_for_stable` makes the call block until the stream reports ACTIVE
/// again after the mutation is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationIntent {
    /// Split one open partition at a target hash key strictly inside its range
    Split {
        partition_id: String,
        target_hash_key: BigUint,
        wait_for_stable: bool,
    },
    /// Merge two hash-key-adjacent open partitions
    Merge {
        lower_partition_id: String,
        higher_partition_id: String,
        wait_for_stable: bool,
    },
}

/// Coordinates split and merge mutations against the control plane.
pub struct MutationCoordinator<C: StreamControlPlane> {
    client: Arc<C>,
    policy: RetryPolicy,
    cancel: CancelToken,
    executor: OperationExecutor<C>,
}

impl<C: StreamControlPlane> MutationCoordinator<C> {
    /// Coordinator with the process-wide default retry policy.
    pub fn new(client: Arc<C>) -> Self {
        Self::with_policy(client, RetryPolicy::default())
    }

    pub fn with_policy(client: Arc<C>, policy: RetryPolicy) -> Self {
        let cancel = CancelToken::new();
        let executor = OperationExecutor::new(Arc::clone(&client), policy.clone(), cancel.clone());
        Self {
            client,
            policy,
            cancel,
            executor,
        }
    }

    /// Handle the host can trigger to abort every blocking wait.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Compare two keyspace shares (percentages) at the policy's comparison
    /// scale. Shares within the rounding tolerance compare equal, so a
    /// three-partition stream's thirds are all "the same size".
    pub fn compare_shares(&self, a: f64, b: f64) -> std::cmp::Ordering {
        keyspace_compare_at_scale(a, b, self.policy.comparison_scale)
    }

    /// Split `partition_id` at `target_hash_key`.
    ///
    /// The target must lie strictly inside the partition's current range;
    /// that is checked locally against a fresh open-partition view before any
    /// remote call. On success the parent closes and two children tile its
    /// range at the split point.
    pub async fn split(
        &self,
        stream_id: &str,
        partition_id: &str,
        target_hash_key: &BigUint,
        wait_for_stable: bool,
    ) -> Result<(), ScalingError> {
        debug!("Splitting partition {} at {}", partition_id, target_hash_key);

        let partition = self.open_partition(stream_id, partition_id).await?;
        if !partition.hash_key_range.strictly_contains(target_hash_key) {
            return Err(ScalingError::InvalidMutation {
                reason: format!(
                    "split target {} is outside partition {} range {}",
                    target_hash_key, partition_id, partition.hash_key_range
                ),
            });
        }

        let client = Arc::clone(&self.client);
        let stream = stream_id.to_string();
        let target_partition = partition_id.to_string();
        let key = target_hash_key.clone();
        self.executor
            .execute(
                stream_id,
                move || {
                    let client = Arc::clone(&client);
                    let stream = stream.clone();
                    let target_partition = target_partition.clone();
                    let key = key.clone();
                    async move {
                        client
                            .split_partition(&stream, &target_partition, &key)
                            .await
                    }
                },
                self.policy.modify_attempts,
                wait_for_stable,
            )
            .await
    }

    /// Merge two adjacent partitions (end of `lower` == start of `higher`).
    /// Adjacency is enforced by the remote service; this side only issues the
    /// call and manages retries and stabilization. On success both inputs
    /// close and one child spans their combined range.
    pub async fn merge(
        &self,
        stream_id: &str,
        lower_partition_id: &str,
        higher_partition_id: &str,
        wait_for_stable: bool,
    ) -> Result<(), ScalingError> {
        debug!(
            "Merging partitions {} and {}",
            lower_partition_id, higher_partition_id
        );

        let client = Arc::clone(&self.client);
        let stream = stream_id.to_string();
        let lower = lower_partition_id.to_string();
        let higher = higher_partition_id.to_string();
        self.executor
            .execute(
                stream_id,
                move || {
                    let client = Arc::clone(&client);
                    let stream = stream.clone();
                    let lower = lower.clone();
                    let higher = higher.clone();
                    async move { client.merge_partitions(&stream, &lower, &higher).await }
                },
                self.policy.modify_attempts,
                wait_for_stable,
            )
            .await
    }

    /// Dispatch a [`MutationIntent`] to [`split`](Self::split) or
    /// [`merge`](Self::merge).
    pub async fn apply(&self, stream_id: &str, intent: &MutationIntent) -> Result<(), ScalingError> {
        match intent {
            MutationIntent::Split {
                partition_id,
                target_hash_key,
                wait_for_stable,
            } => {
                self.split(stream_id, partition_id, target_hash_key, *wait_for_stable)
                    .await
            }
            MutationIntent::Merge {
                lower_partition_id,
                higher_partition_id,
                wait_for_stable,
            } => {
                self.merge(
                    stream_id,
                    lower_partition_id,
                    higher_partition_id,
                    *wait_for_stable,
                )
                .await
            }
        }
    }

    /// Block until the stream reports `target` status. No attempt cap; abort
    /// through the cancellation token.
    pub async fn wait_for_status(
        &self,
        stream_id: &str,
        target: StreamStatus,
    ) -> Result<(), ScalingError> {
        self.executor.wait_for_status(stream_id, target).await
    }

    /// Stream summary, retried with the read-only attempt budget.
    pub async fn describe(&self, stream_id: &str) -> Result<StreamSummary, ScalingError> {
        self.executor.describe(stream_id).await
    }

    /// Number of currently open partitions as reported by the control plane.
    pub async fn open_partition_count(&self, stream_id: &str) -> Result<usize, ScalingError> {
        Ok(self.describe(stream_id).await?.open_partition_count)
    }

    /// Fresh open-partition view, presented in `order`.
    pub async fn open_partitions(
        &self,
        stream_id: &str,
        order: SortOrder,
    ) -> Result<OpenPartitionMap, ScalingError> {
        let listing = self.list_partitions(stream_id, None).await?;
        Ok(registry::derive_open_partitions(&listing, order))
    }

    /// One specific open partition by id; `NotFound` when it never existed or
    /// has since been closed by a split or merge.
    pub async fn open_partition(
        &self,
        stream_id: &str,
        partition_id: &str,
    ) -> Result<Partition, ScalingError> {
        let listing = self.list_partitions(stream_id, None).await?;
        registry::get_single_partition(&listing, stream_id, partition_id)
    }

    async fn list_partitions(
        &self,
        stream_id: &str,
        start_after: Option<&str>,
    ) -> Result<Vec<Partition>, ScalingError> {
        debug!("Listing stream {} from partition {:?}", stream_id, start_after);

        let client = Arc::clone(&self.client);
        let stream = stream_id.to_string();
        let start_after = start_after.map(|s| s.to_string());
        self.executor
            .execute(
                stream_id,
                move || {
                    let client = Arc::clone(&client);
                    let stream = stream.clone();
                    let start_after = start_after.clone();
                    async move { client.list_partitions(&stream, start_after.as_deref()).await }
                },
                self.policy.describe_attempts,
                false,
            )
            .await
    }
}
