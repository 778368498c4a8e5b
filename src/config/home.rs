//! User configuration: home location and SMS target
//!
//! ```json
//! { "home_lat": 38.93, "home_long": -77.37, "phone": "5555555555" }
//! ```
//!
//! Every field is optional and a missing file is an empty configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::HomeLocation;
use crate::{Result, SummerFinderError};

/// Default user configuration file
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_long: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl HomeConfig {
    /// Load the configuration; an absent file yields an empty configuration
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {}, using empty configuration", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|e| {
            SummerFinderError::config(format!("Failed to read {}: {e}", path.display()))
        })?;

        serde_json::from_str(&text).map_err(|e| {
            SummerFinderError::config(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Home location, when both coordinates are configured
    #[must_use]
    pub fn home(&self) -> Option<HomeLocation> {
        match (self.home_lat, self.home_long) {
            (Some(lat), Some(lon)) => Some(HomeLocation::new(lat, lon)),
            _ => None,
        }
    }

    /// Phone number, ignoring blank values
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().filter(|phone| !phone.trim().is_empty())
    }
}

/// Resolve the home location once for a search.
///
/// An explicit caller-supplied pair wins over the configuration file; a
/// half-specified explicit pair is ignored.
#[must_use]
pub fn resolve_home(
    explicit_lat: Option<f64>,
    explicit_long: Option<f64>,
    config: &HomeConfig,
) -> Option<HomeLocation> {
    match (explicit_lat, explicit_long) {
        (Some(lat), Some(lon)) => Some(HomeLocation::new(lat, lon)),
        _ => config.home(),
    }
}
