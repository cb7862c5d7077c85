//! Core modules for stream repartitioning
//!
//! - `partition`: the partition data model and open-set derivation
//! - `client`: the control-plane seam (the only external boundary)
//! - `scaling`: the mutation coordinator, retry executor, fuzzy keyspace
//!   comparator, and cancellation plumbing

pub mod client;
pub mod partition;
pub mod scaling;
