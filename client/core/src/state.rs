//! Application state: the three collections and the notification banner

use serde::Serialize;

use crate::models::{Campaign, Event, Segment};

/// Notification severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    #[default]
    Info,
}

/// Transient banner message. An empty message means nothing is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    pub fn is_visible(&self) -> bool {
        !self.message.is_empty()
    }
}

/// Snapshot of everything the pages render from.
///
/// Collections always hold the full lists returned by the last successful
/// reload; they are never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub segments: Vec<Segment>,
    pub campaigns: Vec<Campaign>,
    pub events: Vec<Event>,
    pub notice: Notice,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a complete reload result
    pub(crate) fn replace_collections(
        &mut self,
        segments: Vec<Segment>,
        campaigns: Vec<Campaign>,
        events: Vec<Event>,
    ) {
        self.segments = segments;
        self.campaigns = campaigns;
        self.events = events;
    }

    /// Drops all collections, as on logout
    pub(crate) fn reset_collections(&mut self) {
        self.segments.clear();
        self.campaigns.clear();
        self.events.clear();
    }

    pub(crate) fn show(&mut self, notice: Notice) {
        self.notice = notice;
    }

    pub(crate) fn dismiss(&mut self) {
        self.notice = Notice::default();
    }

    pub fn segment(&self, id: i64) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn campaign(&self, id: i64) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == id)
    }
}
