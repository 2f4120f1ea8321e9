//! Runtime configuration from environment variables.
//!
//! # Responsibility
//! - Resolve store endpoint, API key, collection names and logging options.
//! - Report missing or malformed values as `ConfigError` instead of panicking.
//!
//! # Invariants
//! - `FOLIO_STORE_URL` and `FOLIO_STORE_KEY` are required; everything else
//!   has a default.
//! - The store URL is always `http` or `https`.

use crate::logging::{default_log_level, LoggingConfig};
use crate::model::record::Collection;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use url::Url;

pub const STORE_URL_VAR: &str = "FOLIO_STORE_URL";
pub const STORE_KEY_VAR: &str = "FOLIO_STORE_KEY";
pub const PROJECTS_TABLE_VAR: &str = "FOLIO_PROJECTS_TABLE";
pub const EXPERIENCE_TABLE_VAR: &str = "FOLIO_EXPERIENCE_TABLE";
pub const SKILLS_TABLE_VAR: &str = "FOLIO_SKILLS_TABLE";
pub const CONTACT_TABLE_VAR: &str = "FOLIO_CONTACT_TABLE";
pub const LOG_LEVEL_VAR: &str = "FOLIO_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "FOLIO_LOG_DIR";
pub const STATE_DB_VAR: &str = "FOLIO_STATE_DB";

const DEFAULT_PROJECTS_TABLE: &str = "projects";
const DEFAULT_EXPERIENCE_TABLE: &str = "Companies";
const DEFAULT_SKILLS_TABLE: &str = "techStack";
const DEFAULT_CONTACT_TABLE: &str = "contact-form";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "required environment variable {key} is not set"),
            Self::Invalid { key, value, reason } => {
                write!(f, "invalid {key} value `{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Hosted store connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: Url,
    pub api_key: String,
}

/// Collection names per portfolio section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    pub projects: Collection,
    pub experience: Collection,
    pub skills: Collection,
    pub contact: Collection,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            projects: Collection::new(DEFAULT_PROJECTS_TABLE),
            experience: Collection::new(DEFAULT_EXPERIENCE_TABLE),
            skills: Collection::new(DEFAULT_SKILLS_TABLE),
            contact: Collection::new(DEFAULT_CONTACT_TABLE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolioConfig {
    pub store: StoreConfig,
    pub collections: CollectionNames,
    pub logging: LoggingConfig,
    /// Local preference database; `None` keeps UI state in memory only.
    pub state_db: Option<PathBuf>,
}

impl FolioConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let raw_url = var(STORE_URL_VAR).ok_or(ConfigError::Missing(STORE_URL_VAR))?;
        let url = parse_store_url(&raw_url)?;
        let api_key = var(STORE_KEY_VAR).ok_or(ConfigError::Missing(STORE_KEY_VAR))?;

        let collection = |key: &'static str, default: &str| {
            Collection::new(var(key).unwrap_or_else(|| {
                info!("event=config_default module=config key={key} value={default}");
                default.to_string()
            }))
        };
        let collections = CollectionNames {
            projects: collection(PROJECTS_TABLE_VAR, DEFAULT_PROJECTS_TABLE),
            experience: collection(EXPERIENCE_TABLE_VAR, DEFAULT_EXPERIENCE_TABLE),
            skills: collection(SKILLS_TABLE_VAR, DEFAULT_SKILLS_TABLE),
            contact: collection(CONTACT_TABLE_VAR, DEFAULT_CONTACT_TABLE),
        };

        let log_dir = match var(LOG_DIR_VAR) {
            Some(dir) => {
                let path = PathBuf::from(&dir);
                if !path.is_absolute() {
                    return Err(ConfigError::Invalid {
                        key: LOG_DIR_VAR,
                        value: dir,
                        reason: "must be an absolute path".to_string(),
                    });
                }
                Some(path)
            }
            None => None,
        };
        let logging = LoggingConfig {
            level: var(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
            duplicate_to_stderr: false,
        };

        Ok(Self {
            store: StoreConfig { url, api_key },
            collections,
            logging,
            state_db: var(STATE_DB_VAR).map(PathBuf::from),
        })
    }
}

fn parse_store_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: STORE_URL_VAR,
        value: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme `{other}`"))),
    }
}
