//! In-process record store.
//!
//! # Responsibility
//! - Serve seeded collections without network access (tests, offline demo).
//! - Record every fetch and insert so callers can assert call counts.
//!
//! # Invariants
//! - Inserted rows are appended to their collection and show up on the next
//!   fetch, mirroring the hosted store.
//! - Injected failures never mutate stored rows.

use crate::model::record::{Collection, Record};
use crate::store::{FetchError, FetchResult, RecordStore, StoreFailure, WriteError, WriteResult};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct MemoryState {
    collections: BTreeMap<Collection, Vec<Record>>,
    inserted: BTreeMap<Collection, Vec<Map<String, Value>>>,
    fetch_counts: BTreeMap<Collection, usize>,
    fail_fetches: bool,
    fail_inserts: bool,
}

/// Record store backed by process memory.
#[derive(Default)]
pub struct MemoryRecordStore {
    state: Mutex<MemoryState>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the rows of one collection.
    pub fn seed(&self, collection: impl Into<Collection>, records: Vec<Record>) {
        self.lock().collections.insert(collection.into(), records);
    }

    /// Makes every subsequent fetch fail until reset.
    pub fn set_fail_fetches(&self, fail: bool) {
        self.lock().fail_fetches = fail;
    }

    /// Makes every subsequent insert fail until reset.
    pub fn set_fail_inserts(&self, fail: bool) {
        self.lock().fail_inserts = fail;
    }

    /// Returns rows accepted by `insert` for one collection, oldest first.
    pub fn inserted(&self, collection: &Collection) -> Vec<Map<String, Value>> {
        self.lock()
            .inserted
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns how many fetches were attempted for one collection.
    pub fn fetch_count(&self, collection: &Collection) -> usize {
        self.lock()
            .fetch_counts
            .get(collection)
            .copied()
            .unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panicking test thread must not hide the rows from later asserts.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RecordStore for MemoryRecordStore {
    async fn fetch_all(&self, collection: &Collection) -> FetchResult<Vec<Record>> {
        let mut state = self.lock();
        *state.fetch_counts.entry(collection.clone()).or_insert(0) += 1;

        if state.fail_fetches {
            return Err(FetchError::new(
                collection,
                StoreFailure::Unavailable("fetch failure injected".to_string()),
            ));
        }

        Ok(state
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &Collection, row: &Map<String, Value>) -> WriteResult<()> {
        let mut state = self.lock();
        if state.fail_inserts {
            return Err(WriteError::new(
                collection,
                StoreFailure::Unavailable("insert failure injected".to_string()),
            ));
        }

        let record = Record::from_fields(row.clone())
            .map_err(|err| WriteError::new(collection, StoreFailure::Decode(err.to_string())))?;
        state
            .collections
            .entry(collection.clone())
            .or_default()
            .push(record);
        state
            .inserted
            .entry(collection.clone())
            .or_default()
            .push(row.clone());
        Ok(())
    }
}
