//! Data models for the SummerFinder application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic points, home location and distance
//! - Campground: Records from the canonical campground list
//! - Forecast: Daily forecast samples
//! - Summer day: Search parameters and result records

pub mod campground;
pub mod forecast;
pub mod location;
pub mod summer_day;

// Re-export all public types for convenient access
pub use campground::{Campground, NO_WATERFRONT};
pub use forecast::ForecastDay;
pub use location::{GeoPoint, HomeLocation, distance_from_home};
pub use summer_day::{SearchParameters, SummerDayMatch, round_miles};
