//! Shared in-memory control plane for integration tests
//!
//! `FakeControlPlane` keeps a real append-only partition listing and applies
//! split/merge semantics to it (children are appended with their parent ids
//! set, ancestors are never removed). Transient and fatal failures can be
//! scripted per mutation call, and describe responses can be scripted to
//! simulate the post-mutation UPDATING window.

// not every test binary exercises every helper
#![allow(dead_code)]

use async_trait::async_trait;
use num_bigint::BigUint;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use streamscale::{
    derive_open_partitions, ClientError, Partition, SortOrder, StreamControlPlane, StreamStatus,
    StreamSummary,
};

pub struct FakeControlPlane {
    partitions: Mutex<Vec<Partition>>,
    next_partition: AtomicU32,
    statuses: Mutex<VecDeque<StreamStatus>>,
    mutation_faults: Mutex<VecDeque<ClientError>>,
    pub describe_calls: AtomicU32,
    pub list_calls: AtomicU32,
    pub split_calls: AtomicU32,
    pub merge_calls: AtomicU32,
}

impl FakeControlPlane {
    pub fn new(initial: Vec<Partition>) -> Self {
        let next = initial.len() as u32;
        Self {
            partitions: Mutex::new(initial),
            next_partition: AtomicU32::new(next),
            statuses: Mutex::new(VecDeque::new()),
            mutation_faults: Mutex::new(VecDeque::new()),
            describe_calls: AtomicU32::new(0),
            list_calls: AtomicU32::new(0),
            split_calls: AtomicU32::new(0),
            merge_calls: AtomicU32::new(0),
        }
    }

    /// Queue statuses for successive describe calls; once drained the stream
    /// reports ACTIVE.
    pub fn push_status(&self, status: StreamStatus) {
        self.statuses.lock().unwrap().push_back(status);
    }

    /// Queue a failure for the next mutation call (consumed before any state
    /// change happens).
    pub fn push_fault(&self, fault: ClientError) {
        self.mutation_faults.lock().unwrap().push_back(fault);
    }

    pub fn listing(&self) -> Vec<Partition> {
        self.partitions.lock().unwrap().clone()
    }

    fn next_id(&self) -> String {
        let n = self.next_partition.fetch_add(1, Ordering::SeqCst);
        format!("shard-{:06}", n)
    }

    fn take_fault(&self) -> Option<ClientError> {
        self.mutation_faults.lock().unwrap().pop_front()
    }

    fn open_partition(&self, partition_id: &str) -> Result<Partition, ClientError> {
        let listing = self.partitions.lock().unwrap().clone();
        let mut open = derive_open_partitions(&listing, SortOrder::None);
        open.shift_remove(partition_id)
            .ok_or_else(|| ClientError::NotFound {
                entity: format!("partition {}", partition_id),
            })
    }
}

#[async_trait]
impl StreamControlPlane for FakeControlPlane {
    async fn describe_stream(&self, _stream_id: &str) -> Result<StreamSummary, ClientError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(StreamStatus::Active);
        let listing = self.partitions.lock().unwrap().clone();
        let open = derive_open_partitions(&listing, SortOrder::None);
        Ok(StreamSummary {
            status,
            open_partition_count: open.len(),
        })
    }

    async fn list_partitions(
        &self,
        _stream_id: &str,
        start_after: Option<&str>,
    ) -> Result<Vec<Partition>, ClientError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let listing = self.partitions.lock().unwrap().clone();
        match start_after {
            None => Ok(listing),
            Some(after) => Ok(listing
                .into_iter()
                .skip_while(|p| p.partition_id != after)
                .skip(1)
                .collect()),
        }
    }

    async fn split_partition(
        &self,
        _stream_id: &str,
        partition_id: &str,
        target_hash_key: &BigUint,
    ) -> Result<(), ClientError> {
        self.split_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(fault) = self.take_fault() {
            return Err(fault);
        }

        let parent = self.open_partition(partition_id)?;
        if !parent.hash_key_range.strictly_contains(target_hash_key) {
            return Err(ClientError::InvalidArgument {
                reason: format!(
                    "split target {} outside {}",
                    target_hash_key, parent.hash_key_range
                ),
            });
        }

        let lower = Partition::new(
            self.next_id(),
            parent.hash_key_range.start.clone(),
            target_hash_key.clone(),
        )
        .with_parents(Some(parent.partition_id.clone()), None);
        let higher = Partition::new(
            self.next_id(),
            target_hash_key.clone(),
            parent.hash_key_range.end.clone(),
        )
        .with_parents(Some(parent.partition_id.clone()), None);

        let mut listing = self.partitions.lock().unwrap();
        listing.push(lower);
        listing.push(higher);
        Ok(())
    }

    async fn merge_partitions(
        &self,
        _stream_id: &str,
        lower_partition_id: &str,
        higher_partition_id: &str,
    ) -> Result<(), ClientError> {
        self.merge_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(fault) = self.take_fault() {
            return Err(fault);
        }

        let lower = self.open_partition(lower_partition_id)?;
        let higher = self.open_partition(higher_partition_id)?;
        if lower.hash_key_range.end != higher.hash_key_range.start {
            return Err(ClientError::InvalidArgument {
                reason: format!(
                    "partitions {} and {} are not adjacent",
                    lower_partition_id, higher_partition_id
                ),
            });
        }

        let child = Partition::new(
            self.next_id(),
            lower.hash_key_range.start.clone(),
            higher.hash_key_range.end.clone(),
        )
        .with_parents(
            Some(lower.partition_id.clone()),
            Some(higher.partition_id.clone()),
        );

        self.partitions.lock().unwrap().push(child);
        Ok(())
    }
}

/// Partition helper for test setup.
pub fn partition(id: &str, start: u64, end: u64) -> Partition {
    Partition::new(id, BigUint::from(start), BigUint::from(end))
}
