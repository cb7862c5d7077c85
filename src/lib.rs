//! # streamscale
//!
//! Online repartitioning for hash-keyed, append-only streams. The crate
//! derives the currently-writable partition set from a raw (history-bearing)
//! partition listing and performs split/merge mutations against an
//! eventually-consistent remote control plane with bounded retry, exponential
//! backoff, and optional post-mutation stabilization.
//!
//! ## Features
//!
//! - **Open-partition derivation**: one pass over the full listing closes
//!   every partition referenced as a parent, leaving the set that disjointly
//!   tiles the keyspace
//! - **Bounded retry with backoff**: resource-busy and throttling signals are
//!   retried (fixed delay and deterministic `2^attempt` backoff respectively);
//!   everything else is fatal
//! - **Stabilization**: mutations can block until the stream reports a stable
//!   status again
//! - **Exact hash-key arithmetic**: partition ranges are arbitrary-precision
//!   integers, never floats
//! - **Cancellation**: every blocking wait observes a broadcast cancel token
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use streamscale::{MutationCoordinator, SortOrder, StreamControlPlane};
//! use num_bigint::BigUint;
//! use std::sync::Arc;
//!
//! async fn halve_hottest_partition<C: StreamControlPlane>(
//!     client: Arc<C>,
//! ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let coordinator = MutationCoordinator::new(client);
//!
//!     let open = coordinator.open_partitions("orders", SortOrder::Ascending).await?;
//!     let (id, partition) = open.first().expect("stream has no open partitions");
//!
//!     let midpoint: BigUint = (&partition.hash_key_range.start
//!         + &partition.hash_key_range.end) / 2u32;
//!     coordinator.split("orders", id, &midpoint, true).await?;
//!     Ok(())
//! }
//! ```

pub mod streamscale;

// Re-export the main API at the crate root for easy access
pub use streamscale::client::{ClientError, StreamControlPlane};
pub use streamscale::partition::{
    derive_open_partitions, get_single_partition, HashKeyRange, OpenPartitionMap, Partition,
    SortOrder, StreamStatus, StreamSummary,
};
pub use streamscale::scaling::{
    keyspace_compare, CancelToken, MutationCoordinator, MutationIntent, OperationExecutor,
    RetryPolicy, RetryPolicyBuilder, ScalingError,
};
