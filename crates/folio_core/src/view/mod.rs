//! Framework-independent view models.
//!
//! # Responsibility
//! - Own per-component UI state and the operations that mutate it.
//! - Keep rendering layers free of store and logging details.
//!
//! # Invariants
//! - Each model owns its state exclusively; nothing is shared across models.
//! - Store failures are converted into state, never propagated to renderers.

pub mod list_model;
pub mod overlay;
pub mod submission;
pub mod tabs;
