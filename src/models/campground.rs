//! Campground record as stored in the canonical campground JSON list

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Waterfront tag meaning "not on the water"
pub const NO_WATERFRONT: &str = "none";

/// A single campground entry.
///
/// Only `name` and `location` are required. `website` and `index` are
/// produced and consumed by the conversion tools; the search never reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campground {
    pub name: String,
    pub location: GeoPoint,
    /// Elevation (meters when filled in by the elevation lookup)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waterfront: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Row index from a Takeout import
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl Campground {
    #[must_use]
    pub fn new(name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            name: name.into(),
            location,
            elevation: None,
            waterfront: None,
            note: None,
            website: None,
            index: None,
        }
    }

    #[must_use]
    pub fn with_waterfront(mut self, waterfront: impl Into<String>) -> Self {
        self.waterfront = Some(waterfront.into());
        self
    }

    #[must_use]
    pub fn with_elevation(mut self, elevation: i32) -> Self {
        self.elevation = Some(elevation);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Waterfront tag, `"none"` when absent
    #[must_use]
    pub fn waterfront_label(&self) -> &str {
        self.waterfront.as_deref().unwrap_or(NO_WATERFRONT)
    }

    #[must_use]
    pub fn is_waterfront(&self) -> bool {
        self.waterfront_label() != NO_WATERFRONT
    }
}
