//! Search parameters and the summer-day result record

use serde::{Deserialize, Serialize};

use super::NO_WATERFRONT;

pub const DEFAULT_MAX_MILES: f64 = 400.0;
pub const DEFAULT_MIN_HIGH_TEMP: f64 = 70.0;
pub const DEFAULT_MAX_HIGH_TEMP: f64 = 88.0;

/// Filters applied to every campground during a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    /// Eligible campgrounds are strictly closer than this
    pub max_miles: f64,
    /// Inclusive lower bound on the daily high (°F)
    pub min_high_temp: f64,
    /// Inclusive upper bound on the daily high (°F)
    pub max_high_temp: f64,
    pub prefer_waterfront: bool,
    pub weekends_only: bool,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            max_miles: DEFAULT_MAX_MILES,
            min_high_temp: DEFAULT_MIN_HIGH_TEMP,
            max_high_temp: DEFAULT_MAX_HIGH_TEMP,
            prefer_waterfront: false,
            weekends_only: true,
        }
    }
}

impl SearchParameters {
    /// Whether a daily high falls within the configured band
    #[must_use]
    pub fn temp_in_band(&self, temp: f64) -> bool {
        self.min_high_temp <= temp && temp <= self.max_high_temp
    }
}

/// A campground/day pair with a summer-like forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummerDayMatch {
    pub name: String,
    /// Miles from home rounded to one decimal; 0 when no home is set
    pub dist: f64,
    /// ISO `YYYY-MM-DD`
    pub date: String,
    /// Weekday name
    pub day: String,
    /// Forecast daily high in °F
    pub temp: f64,
    #[serde(default = "default_waterfront")]
    pub waterfront: String,
}

fn default_waterfront() -> String {
    NO_WATERFRONT.to_string()
}

impl SummerDayMatch {
    #[must_use]
    pub fn is_waterfront(&self) -> bool {
        self.waterfront != NO_WATERFRONT
    }
}

/// Round a distance to one decimal place
#[must_use]
pub fn round_miles(miles: f64) -> f64 {
    (miles * 10.0).round() / 10.0
}
