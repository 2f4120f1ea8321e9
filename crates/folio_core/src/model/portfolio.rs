//! Typed projections for the read-only portfolio collections.
//!
//! # Responsibility
//! - Describe project, experience and skill rows as the store returns them.
//! - Derive display helpers (tech badges) without touching the store.
//!
//! # Invariants
//! - Field names follow the hosted table columns, including `Duration`.
//! - Missing optional columns decode to `None`, never to empty strings.

use crate::model::record::{lenient_id, RecordId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// The store editor saves newlines inside text cells as `↵` in some exports.
static TECH_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\n↵]").expect("valid tech separator regex"));

/// Project card row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<RecordId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Comma or newline delimited technology list.
    #[serde(default)]
    pub tech: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub live: Option<String>,
    /// Cover image URL.
    #[serde(default)]
    pub images: Option<String>,
}

impl Project {
    /// Splits `tech` into trimmed, non-empty badge labels.
    pub fn tech_items(&self) -> Vec<String> {
        self.tech
            .as_deref()
            .map(split_tech)
            .unwrap_or_default()
    }
}

/// Experience (company) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "Duration", default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Skill (tech stack) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: RecordId,
    pub techs: String,
}

pub fn split_tech(value: &str) -> Vec<String> {
    TECH_SEPARATOR_RE
        .split(value)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
