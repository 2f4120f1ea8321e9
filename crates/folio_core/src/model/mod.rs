//! Record model for hosted table-store rows.
//!
//! # Responsibility
//! - Define the opaque `Record` shape every collection row arrives in.
//! - Provide typed projections for the collections the portfolio renders.
//!
//! # Invariants
//! - A `Record` always wraps a JSON object; scalar or array rows are rejected.
//! - `RecordId` is unique within one collection, never across collections.

pub mod contact;
pub mod portfolio;
pub mod record;
