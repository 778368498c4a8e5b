//! Campground store
//!
//! Loads and saves the canonical campground JSON list:
//!
//! ```json
//! [
//!   {
//!     "name": "FR 812 Dispersed Sites",
//!     "location": "37.6103,-79.3787",
//!     "elevation": 269,
//!     "waterfront": "river",
//!     "note": "..."
//!   }
//! ]
//! ```

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::models::Campground;
use crate::{Result, SummerFinderError};

/// Default campground list consulted by the CLI and server
pub const DEFAULT_CAMPGROUNDS_FILE: &str = "all-campgrounds.json";

/// Load the campground list. Any failure here is fatal to a search.
pub fn load_campgrounds(path: impl AsRef<Path>) -> Result<Vec<Campground>> {
    let path = path.as_ref();
    let path_name = path.display().to_string();

    let text = fs::read_to_string(path)
        .map_err(|e| SummerFinderError::campground_load(&path_name, e.to_string()))?;

    let campgrounds = parse_campgrounds(&text)
        .map_err(|e| SummerFinderError::campground_load(&path_name, e.to_string()))?;

    info!("Loaded {} campgrounds from {}", campgrounds.len(), path.display());
    Ok(campgrounds)
}

/// Parse a campground list from JSON text
pub fn parse_campgrounds(text: &str) -> Result<Vec<Campground>> {
    Ok(serde_json::from_str(text)?)
}

/// Write a campground list as pretty-printed JSON
pub fn save_campgrounds(path: impl AsRef<Path>, campgrounds: &[Campground]) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(campgrounds)?;
    fs::write(path, json)?;
    debug!("Wrote {} campgrounds to {}", campgrounds.len(), path.display());
    Ok(())
}
