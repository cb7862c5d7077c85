//! Open-partition derivation from a raw, history-bearing listing
//!
//! The listing contains every partition ever created for the stream. A
//! partition is closed exactly when a later entry references it as `parent_id`
//! or `adjacent_parent_id`; what remains is the open set, whose ranges tile
//! the keyspace disjointly. Derivation is a pure function over an explicitly
//! passed snapshot; the physical order of the listing affects presentation
//! order only, never set membership.

use crate::streamscale::partition::types::{OpenPartitionMap, Partition, SortOrder};
use crate::streamscale::scaling::error::ScalingError;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Derive the open partitions from `raw`, presented in `order`.
///
/// One pass collects every partition as a candidate and every referenced
/// parent id as closed; the closed ids are then filtered out of the candidate
/// set. Openness is determined by lineage alone, so a parent is evicted even
/// when the listing places it after its children.
pub fn derive_open_partitions(raw: &[Partition], order: SortOrder) -> OpenPartitionMap {
    let mut candidates: IndexMap<String, Partition> = IndexMap::new();
    let mut closed: HashSet<String> = HashSet::new();

    for partition in raw {
        candidates.insert(partition.partition_id.clone(), partition.clone());

        if let Some(parent) = &partition.parent_id {
            closed.insert(parent.clone());
        }
        if let Some(adjacent) = &partition.adjacent_parent_id {
            closed.insert(adjacent.clone());
        }
    }

    candidates.retain(|id, _| !closed.contains(id));

    let mut open: Vec<Partition> = candidates.into_values().collect();

    match order {
        SortOrder::Ascending => {
            open.sort_by(|a, b| a.hash_key_range.start.cmp(&b.hash_key_range.start))
        }
        SortOrder::Descending => {
            open.sort_by(|a, b| b.hash_key_range.start.cmp(&a.hash_key_range.start))
        }
        SortOrder::None => {}
    }

    open.into_iter()
        .map(|p| (p.partition_id.clone(), p))
        .collect()
}

/// Look up one specific open partition by id.
///
/// Fails with [`ScalingError::NotFound`] when the id is absent from the
/// derived open set: either it never existed or it has since been closed by
/// a split or merge.
pub fn get_single_partition(
    raw: &[Partition],
    stream_id: &str,
    partition_id: &str,
) -> Result<Partition, ScalingError> {
    let mut open = derive_open_partitions(raw, SortOrder::None);
    open.shift_remove(partition_id)
        .ok_or_else(|| ScalingError::NotFound {
            partition_id: partition_id.to_string(),
            stream_id: stream_id.to_string(),
        })
}
