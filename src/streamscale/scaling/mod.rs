//! Mutation coordination: retry, backoff, stabilization, comparison
//!
//! - `compare`: fuzzy keyspace-share comparison
//! - `cancel`: broadcast cancellation observed by every blocking wait
//! - `retry`: retry policy and the executor that classifies transient failures
//! - `coordinator`: split/merge mutations and the open-partition view
//! - `error`: the crate-level error taxonomy

pub mod cancel;
pub mod compare;
pub mod coordinator;
pub mod error;
pub mod retry;

pub use cancel::CancelToken;
pub use compare::{keyspace_compare, keyspace_compare_at_scale};
pub use coordinator::{MutationCoordinator, MutationIntent};
pub use error::ScalingError;
pub use retry::{OperationExecutor, RetryPolicy, RetryPolicyBuilder};
