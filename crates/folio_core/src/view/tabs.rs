//! Active tab navigation state.
//!
//! # Responsibility
//! - Enumerate the portfolio sections in display order.
//! - Load and save the last active tab through a preference repository.
//!
//! # Invariants
//! - Unknown or missing stored values resolve to `Tab::Home`.
//! - `activate` updates in-memory state even when persistence fails.

use crate::repo::pref_repo::{PreferenceRepository, PrefResult};
use log::{info, warn};
use std::fmt::{Display, Formatter};

/// Preference key holding the last active tab.
pub const ACTIVE_TAB_KEY: &str = "folio.active_tab";

/// Portfolio section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Home,
    Projects,
    Skills,
    About,
    Experience,
    Contact,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Home,
        Tab::Projects,
        Tab::Skills,
        Tab::About,
        Tab::Experience,
        Tab::Contact,
    ];

    /// Stable storage and display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Projects => "Projects",
            Self::Skills => "Skills",
            Self::About => "About",
            Self::Experience => "Experience",
            Self::Contact => "Contact",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl Display for Tab {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-memory navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabState {
    active: Tab,
}

impl TabState {
    pub fn new(active: Tab) -> Self {
        Self { active }
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }

    /// Restores the last active tab at application start.
    ///
    /// Read failures and unknown values fall back to `Tab::Home`.
    pub fn load<R: PreferenceRepository + ?Sized>(prefs: &R) -> Self {
        let stored = match prefs.get(ACTIVE_TAB_KEY) {
            Ok(value) => value,
            Err(err) => {
                warn!("event=tab_load module=view status=error error={err}");
                None
            }
        };

        let active = match stored.as_deref() {
            Some(value) => Tab::parse(value).unwrap_or_else(|| {
                warn!("event=tab_load module=view status=fallback stored={value}");
                Tab::Home
            }),
            None => Tab::Home,
        };
        info!("event=tab_load module=view status=ok active={active}");
        Self { active }
    }

    /// Switches tab and persists the choice.
    pub fn activate<R: PreferenceRepository + ?Sized>(
        &mut self,
        tab: Tab,
        prefs: &R,
    ) -> PrefResult<()> {
        self.active = tab;
        prefs.set(ACTIVE_TAB_KEY, tab.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Tab, TabState};

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Tab::parse(" projects "), Some(Tab::Projects));
        assert_eq!(Tab::parse("CONTACT"), Some(Tab::Contact));
        assert_eq!(Tab::parse("Blog"), None);
    }

    #[test]
    fn default_state_is_home() {
        let state = TabState::default();
        assert_eq!(state.active(), Tab::Home);
        assert!(state.is_active(Tab::Home));
    }

    #[test]
    fn names_round_trip_for_every_tab() {
        for tab in Tab::ALL {
            assert_eq!(Tab::parse(tab.as_str()), Some(tab));
        }
    }
}
