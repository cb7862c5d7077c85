//! Typed partition and stream model
//!
//! Hash-key ranges are arbitrary-precision unsigned integers. The reference
//! keyspace spans `0..2^128`, but nothing here assumes a fixed width: ranges
//! are compared and divided as exact integers, never as floats.

use indexmap::IndexMap;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A contiguous, inclusive-exclusive slice `[start, end)` of the stream's
/// hash keyspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashKeyRange {
    pub start: BigUint,
    pub end: BigUint,
}

impl HashKeyRange {
    pub fn new(start: BigUint, end: BigUint) -> Self {
        Self { start, end }
    }

    /// Number of hash keys covered by this range.
    pub fn width(&self) -> BigUint {
        &self.end - &self.start
    }

    /// Whether `key` falls inside `[start, end)`.
    pub fn contains(&self, key: &BigUint) -> bool {
        key >= &self.start && key < &self.end
    }

    /// Whether `key` lies strictly inside the range; a valid split point
    /// must leave a non-empty child on both sides.
    pub fn strictly_contains(&self, key: &BigUint) -> bool {
        key > &self.start && key < &self.end
    }

    /// Fraction of the total keyspace this range covers, as a percentage.
    ///
    /// The result is approximate by nature (the keyspace rarely divides
    /// evenly), which is why callers compare shares with
    /// [`keyspace_compare`](crate::streamscale::scaling::keyspace_compare)
    /// rather than exact equality.
    pub fn share_of(&self, keyspace_width: &BigUint) -> f64 {
        let width = self.width().to_f64().unwrap_or(0.0);
        let total = keyspace_width.to_f64().unwrap_or(f64::MAX);
        if total == 0.0 {
            0.0
        } else {
            width / total * 100.0
        }
    }
}

impl fmt::Display for HashKeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A single partition from the raw listing.
///
/// `parent_id` / `adjacent_parent_id` record lineage: a split produces two
/// children carrying the same `parent_id`; a merge produces one child carrying
/// both. A partition is closed exactly when some later partition references it
/// as a parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub partition_id: String,
    pub hash_key_range: HashKeyRange,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub adjacent_parent_id: Option<String>,
}

impl Partition {
    pub fn new(partition_id: impl Into<String>, start: BigUint, end: BigUint) -> Self {
        Self {
            partition_id: partition_id.into(),
            hash_key_range: HashKeyRange::new(start, end),
            parent_id: None,
            adjacent_parent_id: None,
        }
    }

    pub fn with_parents(
        mut self,
        parent_id: Option<String>,
        adjacent_parent_id: Option<String>,
    ) -> Self {
        self.parent_id = parent_id;
        self.adjacent_parent_id = adjacent_parent_id;
        self
    }
}

/// Insertion-ordered view of the open partitions, keyed by partition id.
///
/// A derived snapshot with no lifecycle of its own: recomputed from a raw
/// listing on demand, never cached process-wide.
pub type OpenPartitionMap = IndexMap<String, Partition>;

/// Presentation order for a derived open-partition map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Lowest start hash key first
    Ascending,
    /// Highest start hash key first
    Descending,
    /// Keep discovery (listing) order
    None,
}

/// Stream lifecycle status as reported by the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamStatus {
    Creating,
    Active,
    Updating,
    Deleting,
}

/// Raised when the control plane reports a status string this model does not
/// know about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stream status '{0}'")]
pub struct UnknownStatusError(pub String);

impl FromStr for StreamStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATING" => Ok(StreamStatus::Creating),
            "ACTIVE" => Ok(StreamStatus::Active),
            "UPDATING" => Ok(StreamStatus::Updating),
            "DELETING" => Ok(StreamStatus::Deleting),
            other => Err(UnknownStatusError(other.to_string())),
        }
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StreamStatus::Creating => "CREATING",
            StreamStatus::Active => "ACTIVE",
            StreamStatus::Updating => "UPDATING",
            StreamStatus::Deleting => "DELETING",
        };
        write!(f, "{}", s)
    }
}

/// Summary of a stream as returned by `describe_stream`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSummary {
    pub status: StreamStatus,
    pub open_partition_count: usize,
}
