//! Tools for building and exporting the campground list
//!
//! Every tool reads or writes the canonical campground JSON; locations are
//! always written as four-decimal `"lat,lon"` strings.

pub mod clean;
pub mod csv_export;
pub mod elevation;
pub mod kml;
pub mod labels;
pub mod place_url;
pub mod takeout;

pub use clean::{clean_campground, clean_campgrounds, extract_links};
pub use csv_export::{CsvRow, delta_fahrenheit, write_csv};
pub use elevation::{ElevationClient, ElevationResult, add_elevations};
pub use kml::{elevation_bucket, to_kml};
pub use labels::{Labels, labels_from_geojson};
pub use place_url::{campground_from_place_url, parse_place_url};
pub use takeout::{TakeoutImporter, TakeoutRow, read_rows, split_note_elevation};
