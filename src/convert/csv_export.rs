//! Map-friendly CSV export with an estimated temperature offset per campground

use std::io::Write;

use serde::Serialize;

use crate::models::Campground;
use crate::{Result, SummerFinderError};

const FEET_PER_METER: f64 = 3.281;
/// Temperature drop per meter of altitude (°C)
const LAPSE_RATE_C_PER_M: f64 = 0.0065;

/// Reference point the temperature offsets are relative to (Reston, VA)
const BASE_LATITUDE: f64 = 38.9527;
const BASE_ALTITUDE_M: f64 = 110.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvRow {
    pub location: String,
    pub name: String,
    pub note: String,
    /// Feet, truncated
    pub elevation: i64,
    /// Expected difference in °F from the reference point
    pub delta_temp: f64,
}

impl From<&Campground> for CsvRow {
    fn from(campground: &Campground) -> Self {
        let elevation_m = f64::from(campground.elevation.unwrap_or(0));
        Self {
            location: campground.location.key(),
            name: campground.name.clone(),
            note: campground.note.clone().unwrap_or_default(),
            elevation: (elevation_m * FEET_PER_METER) as i64,
            delta_temp: delta_fahrenheit(campground.location.latitude, elevation_m),
        }
    }
}

/// Estimated high-temperature difference in °F against the reference point:
/// one °C cooler per degree of latitude north, plus the standard lapse rate.
#[must_use]
pub fn delta_fahrenheit(latitude: f64, altitude_m: f64) -> f64 {
    let latitude_effect = -(latitude - BASE_LATITUDE);
    let altitude_effect = -LAPSE_RATE_C_PER_M * (altitude_m - BASE_ALTITUDE_M);
    (latitude_effect + altitude_effect) * 9.0 / 5.0
}

/// Write the CSV, header first
pub fn write_csv<W: Write>(writer: W, campgrounds: &[Campground]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for campground in campgrounds {
        csv_writer
            .serialize(CsvRow::from(campground))
            .map_err(|e| SummerFinderError::conversion(format!("CSV write failed: {e}")))?;
    }
    csv_writer.flush()?;
    Ok(())
}
