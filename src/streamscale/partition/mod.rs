//! Partition data model and open-set derivation
//!
//! A stream's partition listing is append-only history: every partition ever
//! created is present, including ones closed by a later split or merge. This
//! module holds the typed model for that listing and the derivation that
//! recovers the currently-writable (open) set from it.

pub mod registry;
pub mod types;

pub use registry::{derive_open_partitions, get_single_partition};
pub use types::{
    HashKeyRange, OpenPartitionMap, Partition, SortOrder, StreamStatus, StreamSummary,
    UnknownStatusError,
};
