//! Portfolio page composition.
//!
//! # Responsibility
//! - Own one view model per data-backed section plus navigation state.
//! - Mount the data sections with exactly one fetch each.

use crate::config::CollectionNames;
use crate::repo::pref_repo::PreferenceRepository;
use crate::store::RecordStore;
use crate::view::list_model::ListViewModel;
use crate::view::submission::SubmissionModel;
use crate::view::tabs::TabState;
use log::info;
use std::sync::Arc;
use std::time::Instant;

/// All stateful sections of the portfolio page over one shared store.
pub struct Portfolio<S: RecordStore> {
    pub projects: ListViewModel<Arc<S>>,
    pub experience: ListViewModel<Arc<S>>,
    pub skills: ListViewModel<Arc<S>>,
    pub contact: SubmissionModel<Arc<S>>,
    pub tabs: TabState,
}

impl<S: RecordStore> Portfolio<S> {
    pub fn new(store: Arc<S>, collections: &CollectionNames) -> Self {
        Self {
            projects: ListViewModel::new(Arc::clone(&store), collections.projects.clone()),
            experience: ListViewModel::new(Arc::clone(&store), collections.experience.clone()),
            skills: ListViewModel::new(Arc::clone(&store), collections.skills.clone()),
            contact: SubmissionModel::contact_form(store, collections.contact.clone()),
            tabs: TabState::default(),
        }
    }

    /// Restores the last active tab from `prefs`.
    pub fn restore_tab<R: PreferenceRepository + ?Sized>(&mut self, prefs: &R) {
        self.tabs = TabState::load(prefs);
    }

    /// Loads every list section concurrently on the current task.
    pub async fn mount(&mut self) {
        let started_at = Instant::now();
        tokio::join!(
            self.projects.load(),
            self.experience.load(),
            self.skills.load()
        );
        info!(
            "event=portfolio_mount module=app status=ok projects={} experience={} skills={} duration_ms={}",
            self.projects.records().len(),
            self.experience.records().len(),
            self.skills.records().len(),
            started_at.elapsed().as_millis()
        );
    }
}
