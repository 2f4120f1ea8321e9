//! Detail overlay contract.
//!
//! # Responsibility
//! - Project a selected record into displayable detail content.
//! - Decide which pointer events dismiss the overlay.
//!
//! # Invariants
//! - No selection renders nothing.
//! - Events inside the panel never reach the backdrop handler.

use crate::model::portfolio::{split_tech, Experience, Project, Skill};
use crate::model::record::Record;
use crate::store::RecordStore;
use crate::view::list_model::ListViewModel;
use log::debug;
use serde::de::DeserializeOwned;

/// Content shown in the detail panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayContent {
    pub title: String,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub tags: Vec<String>,
}

impl OverlayContent {
    /// Best-effort projection for rows without a typed view.
    pub fn from_record(record: &Record) -> Self {
        let title = record
            .text("title")
            .or_else(|| record.text("name"))
            .map(str::to_string)
            .or_else(|| record.id().map(ToString::to_string))
            .unwrap_or_default();

        Self {
            title,
            subtitle: record.text("Duration").map(str::to_string),
            body: record.text("description").map(str::to_string),
            image: record
                .text("image")
                .or_else(|| record.text("images"))
                .map(str::to_string),
            link: record
                .text("link")
                .or_else(|| record.text("live"))
                .or_else(|| record.text("github"))
                .map(str::to_string),
            tags: record.text("tech").map(split_tech).unwrap_or_default(),
        }
    }
}

/// Typed rows that know how to present themselves in the overlay.
pub trait DetailView {
    fn overlay_content(&self) -> OverlayContent;
}

impl DetailView for Experience {
    fn overlay_content(&self) -> OverlayContent {
        OverlayContent {
            title: self.name.clone(),
            subtitle: self.duration.clone(),
            body: non_empty(&self.description),
            image: self.image.clone(),
            link: self.link.clone(),
            tags: Vec::new(),
        }
    }
}

impl DetailView for Project {
    fn overlay_content(&self) -> OverlayContent {
        OverlayContent {
            title: self.title.clone(),
            subtitle: None,
            body: non_empty(&self.description),
            image: self.images.clone(),
            link: self.live.clone().or_else(|| self.github.clone()),
            tags: self.tech_items(),
        }
    }
}

impl DetailView for Skill {
    fn overlay_content(&self) -> OverlayContent {
        OverlayContent {
            title: self.techs.clone(),
            ..OverlayContent::default()
        }
    }
}

/// Pointer interaction delivered to an open overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    /// Click on the dimmed area around the panel.
    Backdrop,
    /// Explicit close control.
    CloseButton,
    /// Click anywhere inside the panel.
    Panel,
}

/// Outcome of one overlay event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    Dismiss,
    Ignore,
}

impl OverlayEvent {
    pub fn action(self) -> OverlayAction {
        match self {
            Self::Backdrop | Self::CloseButton => OverlayAction::Dismiss,
            // Panel clicks stop propagation before the backdrop sees them.
            Self::Panel => OverlayAction::Ignore,
        }
    }
}

/// Stateless overlay presenter.
pub struct DetailOverlay;

impl DetailOverlay {
    /// Renders the selection with the generic projection.
    pub fn render(selected: Option<&Record>) -> Option<OverlayContent> {
        selected.map(OverlayContent::from_record)
    }

    /// Renders the selection through a typed view, falling back to the
    /// generic projection when the row does not decode as `T`.
    pub fn render_as<T: DeserializeOwned + DetailView>(
        selected: Option<&Record>,
    ) -> Option<OverlayContent> {
        let record = selected?;
        Some(match record.decode::<T>() {
            Ok(value) => value.overlay_content(),
            Err(_) => OverlayContent::from_record(record),
        })
    }

    /// Applies one event to the list model owning the selection.
    pub fn dispatch<S: RecordStore>(
        model: &mut ListViewModel<S>,
        event: OverlayEvent,
    ) -> OverlayAction {
        let action = event.action();
        if action == OverlayAction::Dismiss && model.selected().is_some() {
            debug!(
                "event=overlay_dismiss module=view status=ok collection={} trigger={:?}",
                model.collection(),
                event
            );
            model.clear();
        }
        action
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
