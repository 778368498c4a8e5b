//! Campground record from a Google Maps place URL

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::elevation::ElevationClient;
use crate::models::{Campground, GeoPoint};
use crate::{Result, SummerFinderError};

static PLACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"place/(.+)/@(-?\d{1,3}\.\d{1,9}),(-?\d{1,3}\.\d{1,9})")
        .expect("place URL pattern is valid")
});

/// Place name and coordinates from `…/place/<name>/@<lat>,<lon>…`
#[must_use]
pub fn parse_place_url(url: &str) -> Option<(String, GeoPoint)> {
    let captures = PLACE_PATTERN.captures(url)?;
    let name = captures[1].replace('+', " ");
    let latitude = captures[2].parse().ok()?;
    let longitude = captures[3].parse().ok()?;
    Some((name, GeoPoint::new(latitude, longitude)))
}

/// Build a campground from a place URL, looking up its elevation.
///
/// A failed elevation lookup leaves `elevation` empty.
pub async fn campground_from_place_url(client: &ElevationClient, url: &str) -> Result<Campground> {
    let (name, location) = parse_place_url(url)
        .ok_or_else(|| SummerFinderError::validation(format!("Not a place URL: {url}")))?;

    let mut campground = Campground::new(name, location);
    match client.lookup(&location).await {
        Ok(elevation) => campground.elevation = elevation,
        Err(e) => warn!("Elevation lookup failed for {}: {e}", campground.name),
    }
    Ok(campground)
}
