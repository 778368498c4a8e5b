//! Daily forecast samples

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// One day of a forecast at a campground, dated in the campground's local timezone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Daily maximum 2 m temperature in Fahrenheit; the provider may report null
    pub max_temp_f: Option<f64>,
}

impl ForecastDay {
    #[must_use]
    pub fn new(date: NaiveDate, max_temp_f: Option<f64>) -> Self {
        Self { date, max_temp_f }
    }

    /// Full English weekday name, e.g. "Saturday"
    #[must_use]
    pub fn weekday_name(&self) -> String {
        self.date.format("%A").to_string()
    }

    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}
