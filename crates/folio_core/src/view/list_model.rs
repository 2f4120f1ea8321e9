//! Fetch-all list view model with single selection.
//!
//! # Responsibility
//! - Hold one collection's fetched records, a loading flag and the selection.
//! - Convert fetch failures into a silent empty list plus an error log.
//!
//! # Invariants
//! - `selected`, when set, names a record currently in `records`.
//! - A reload keeps the selection only if its id is still present.
//! - `load()` never returns an error to the caller.

use crate::model::record::{Collection, Record, RecordId};
use crate::store::{FetchResult, RecordStore};
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use std::time::Instant;

/// Observable list state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    /// Records in store arrival order.
    pub records: Vec<Record>,
    pub loading: bool,
    pub selected: Option<RecordId>,
}

impl ListState {
    pub fn selected_record(&self) -> Option<&Record> {
        let id = self.selected.as_ref()?;
        self.records.iter().find(|record| record.id() == Some(id))
    }

    fn contains(&self, id: &RecordId) -> bool {
        self.records.iter().any(|record| record.id() == Some(id))
    }
}

/// List view model bound to one collection of one store.
pub struct ListViewModel<S: RecordStore> {
    store: S,
    collection: Collection,
    state: ListState,
    load_started: Option<Instant>,
}

impl<S: RecordStore> ListViewModel<S> {
    /// Creates an empty, idle model. Nothing is fetched until `load()`.
    pub fn new(store: S, collection: impl Into<Collection>) -> Self {
        Self {
            store,
            collection: collection.into(),
            state: ListState::default(),
            load_started: None,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn records(&self) -> &[Record] {
        &self.state.records
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn is_empty(&self) -> bool {
        self.state.records.is_empty()
    }

    /// Fetches the whole collection once and replaces local records.
    ///
    /// On failure the list becomes empty; the error is only logged.
    pub async fn load(&mut self) {
        self.begin_load();
        let result = self.store.fetch_all(&self.collection).await;
        self.finish_load(result);
    }

    /// Marks the list as loading.
    ///
    /// A renderer that drives the fetch itself calls this, awaits
    /// `store().fetch_all(collection())`, then hands the outcome to
    /// `finish_load`; `is_loading()` is true in between.
    pub fn begin_load(&mut self) {
        self.state.loading = true;
        self.load_started = Some(Instant::now());
        info!(
            "event=list_load module=view status=start collection={}",
            self.collection
        );
    }

    /// Applies a fetch outcome and clears the loading flag.
    pub fn finish_load(&mut self, result: FetchResult<Vec<Record>>) {
        let duration_ms = self
            .load_started
            .take()
            .map_or(0, |started_at| started_at.elapsed().as_millis());

        match result {
            Ok(records) => {
                info!(
                    "event=list_load module=view status=ok collection={} count={} duration_ms={}",
                    self.collection,
                    records.len(),
                    duration_ms
                );
                self.state.records = records;
            }
            Err(err) => {
                error!(
                    "event=list_load module=view status=error collection={} duration_ms={} error={}",
                    self.collection, duration_ms, err
                );
                self.state.records.clear();
            }
        }

        self.reconcile_selection();
        self.state.loading = false;
    }

    /// Selects the record whose id equals `id`.
    ///
    /// An unknown id leaves nothing selected.
    pub fn select(&mut self, id: impl Into<RecordId>) -> Option<&Record> {
        let id = id.into();
        self.state.selected = if self.state.contains(&id) {
            Some(id)
        } else {
            None
        };
        self.state.selected_record()
    }

    /// Clears the selection unconditionally.
    pub fn clear(&mut self) {
        self.state.selected = None;
    }

    pub fn selected(&self) -> Option<&Record> {
        self.state.selected_record()
    }

    /// Decodes the selected record, logging and hiding decode failures.
    pub fn selected_as<T: DeserializeOwned>(&self) -> Option<T> {
        let record = self.selected()?;
        match record.decode() {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    "event=record_decode module=view status=error collection={} error={}",
                    self.collection, err
                );
                None
            }
        }
    }

    /// Decodes every record, skipping rows that do not fit `T`.
    pub fn records_as<T: DeserializeOwned>(&self) -> Vec<T> {
        self.state
            .records
            .iter()
            .filter_map(|record| match record.decode() {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!(
                        "event=record_decode module=view status=error collection={} error={}",
                        self.collection, err
                    );
                    None
                }
            })
            .collect()
    }

    fn reconcile_selection(&mut self) {
        let dangling = match self.state.selected.as_ref() {
            Some(id) => !self.state.contains(id),
            None => false,
        };
        if dangling {
            info!(
                "event=selection_cleared module=view status=ok collection={} reason=missing_after_load",
                self.collection
            );
            self.state.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ListViewModel;
    use crate::model::record::{Collection, Record, RecordId};
    use crate::store::{FetchError, MemoryRecordStore, RecordStore, StoreFailure};
    use serde_json::json;

    fn seeded(ids: &[i64]) -> MemoryRecordStore {
        let store = MemoryRecordStore::new();
        store.seed(
            "Companies",
            ids.iter()
                .map(|id| Record::from_row(json!({"id": id, "name": format!("co-{id}")})).unwrap())
                .collect(),
        );
        store
    }

    #[tokio::test]
    async fn new_model_is_idle_and_empty() {
        let model = ListViewModel::new(seeded(&[1]), "Companies");
        assert!(model.is_empty());
        assert!(!model.is_loading());
        assert!(model.selected().is_none());
        assert_eq!(model.store().fetch_count(&Collection::new("Companies")), 0);
    }

    #[tokio::test]
    async fn reload_keeps_selection_when_id_survives() {
        let mut model = ListViewModel::new(seeded(&[1, 2]), "Companies");
        model.load().await;
        model.select(2);

        model.load().await;
        assert_eq!(model.state().selected, Some(RecordId::from(2)));
    }

    #[tokio::test]
    async fn reload_clears_selection_when_id_disappears() {
        let mut model = ListViewModel::new(seeded(&[1, 2]), "Companies");
        model.load().await;
        model.select(2);

        model.store().seed(
            "Companies",
            vec![Record::from_row(json!({"id": 1, "name": "co-1"})).unwrap()],
        );
        model.load().await;
        assert!(model.state().selected.is_none());
        assert!(model.selected().is_none());
    }

    #[tokio::test]
    async fn rows_without_id_cannot_be_selected() {
        let store = MemoryRecordStore::new();
        store.seed(
            "projects",
            vec![Record::from_row(json!({"title": "Folio"})).unwrap()],
        );
        let mut model = ListViewModel::new(store, "projects");
        model.load().await;

        assert!(model.select("").is_none());
        assert!(model.state().selected.is_none());
    }

    #[tokio::test]
    async fn loading_is_visible_between_begin_and_finish() {
        let mut model = ListViewModel::new(seeded(&[1, 2]), "Companies");

        model.begin_load();
        assert!(model.is_loading());
        let result = model.store().fetch_all(model.collection()).await;
        assert!(model.is_loading());
        model.finish_load(result);

        assert!(!model.is_loading());
        assert_eq!(model.records().len(), 2);
    }

    #[test]
    fn finish_load_with_error_empties_list() {
        let mut model = ListViewModel::new(MemoryRecordStore::new(), "Companies");
        model.finish_load(Ok(vec![Record::from_row(json!({"id": 1})).unwrap()]));
        model.select(1);

        model.begin_load();
        let collection = Collection::new("Companies");
        model.finish_load(Err(FetchError::new(
            &collection,
            StoreFailure::Unavailable("offline".to_string()),
        )));

        assert!(!model.is_loading());
        assert!(model.is_empty());
        assert!(model.selected().is_none());
    }
}
