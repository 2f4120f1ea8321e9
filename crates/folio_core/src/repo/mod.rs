//! Local persistence repositories.
//!
//! # Responsibility
//! - Define storage-agnostic contracts for on-device UI state.
//! - Keep SQL details out of view models.

pub mod pref_repo;
