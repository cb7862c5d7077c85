//! Control-plane client trait

use crate::streamscale::client::error::ClientError;
use crate::streamscale::partition::types::{Partition, StreamSummary};
use async_trait::async_trait;
use num_bigint::BigUint;

/// Binding to the remote stream control plane.
///
/// Implementations own the wire format, authentication, and pagination; the
/// coordinator layers retry, backoff, and stabilization on top.
#[async_trait]
pub trait StreamControlPlane: Send + Sync + 'static {
    /// Current status and open-partition count for a stream.
    async fn describe_stream(&self, stream_id: &str) -> Result<StreamSummary, ClientError>;

    /// Full partition listing for a stream, optionally starting after the
    /// given partition id.
    ///
    /// The returned sequence must be fully materialized: implementations
    /// exhaust every continuation token before returning, so callers never
    /// see a partial page.
    async fn list_partitions(
        &self,
        stream_id: &str,
        start_after: Option<&str>,
    ) -> Result<Vec<Partition>, ClientError>;

    /// Split one open partition in two at `target_hash_key`.
    ///
    /// Raises [`ClientError::Busy`] while the target is mid-mutation and
    /// [`ClientError::Throttled`] under rate limiting.
    async fn split_partition(
        &self,
        stream_id: &str,
        partition_id: &str,
        target_hash_key: &BigUint,
    ) -> Result<(), ClientError>;

    /// Merge two hash-key-adjacent open partitions into one. Same transient
    /// signal set as [`split_partition`](Self::split_partition); adjacency is
    /// enforced remotely.
    async fn merge_partitions(
        &self,
        stream_id: &str,
        lower_partition_id: &str,
        higher_partition_id: &str,
    ) -> Result<(), ClientError>;
}
