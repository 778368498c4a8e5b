//! Geographic point model and great-circle distance

use std::fmt;
use std::str::FromStr;

use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Serialize};

use crate::SummerFinderError;

/// A point on the globe in decimal degrees.
///
/// Serialized as the canonical `"lat,lon"` string with four decimal places and
/// no surrounding whitespace, which is also the key the conversion tools match on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// Home is just a point; absence is modelled as `Option<HomeLocation>`.
pub type HomeLocation = GeoPoint;

impl GeoPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in statute miles
    #[must_use]
    pub fn miles_to(&self, other: &GeoPoint) -> f64 {
        distance(self.as_haversine(), other.as_haversine(), Units::Miles)
    }

    /// Canonical four-decimal `"lat,lon"` key
    #[must_use]
    pub fn key(&self) -> String {
        format!("{:.4},{:.4}", self.latitude, self.longitude)
    }

    fn as_haversine(&self) -> HaversineLocation {
        HaversineLocation {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Distance used for filtering: miles from home, or 0 when no home is set.
#[must_use]
pub fn distance_from_home(home: Option<&HomeLocation>, point: &GeoPoint) -> f64 {
    home.map_or(0.0, |home| home.miles_to(point))
}

impl FromStr for GeoPoint {
    type Err = SummerFinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(SummerFinderError::validation(format!(
                "Invalid location '{s}': expected \"lat,lon\""
            )));
        }

        let parse = |part: &str| -> Result<f64, SummerFinderError> {
            part.trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| {
                    SummerFinderError::validation(format!(
                        "Invalid coordinate '{part}' in location '{s}'"
                    ))
                })
        };

        Ok(Self::new(parse(parts[0])?, parse(parts[1])?))
    }
}

impl TryFrom<String> for GeoPoint {
    type Error = SummerFinderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GeoPoint> for String {
    fn from(point: GeoPoint) -> Self {
        point.key()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
