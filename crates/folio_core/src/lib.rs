//! Core logic for the Folio portfolio site.
//! Store clients and view models live here; renderers only read state.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod view;

pub use app::Portfolio;
pub use config::{CollectionNames, ConfigError, FolioConfig, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::contact::{ContactSubmission, InquiryType, CONTACT_FIELDS};
pub use model::portfolio::{Experience, Project, Skill};
pub use model::record::{Collection, Record, RecordError, RecordId};
pub use repo::pref_repo::{PrefError, PrefResult, PreferenceRepository, SqlitePreferenceRepository};
pub use store::{
    FetchError, MemoryRecordStore, RecordStore, RestRecordStore, StoreFailure, WriteError,
};
pub use view::list_model::{ListState, ListViewModel};
pub use view::overlay::{DetailOverlay, DetailView, OverlayAction, OverlayContent, OverlayEvent};
pub use view::submission::{
    SubmissionModel, SubmissionResult, SubmissionState, SubmitError, SUBMIT_FAILURE_MESSAGE,
    SUBMIT_SUCCESS_MESSAGE,
};
pub use view::tabs::{Tab, TabState, ACTIVE_TAB_KEY};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
