//! Weather forecasts for campground locations
//!
//! The search only depends on [`ForecastProvider`]; [`WeatherClient`] is the
//! open-meteo implementation used by the front ends.

use crate::Result;
use crate::models::{ForecastDay, GeoPoint};

pub mod open_meteo;

pub use open_meteo::{GeocodingResult, WeatherClient};

/// Number of calendar days requested per forecast
pub const FORECAST_DAYS: u32 = 16;

/// Source of daily maximum temperature forecasts (°F).
///
/// One call issues at most one logical request; a failure is reported as
/// [`crate::SummerFinderError::WeatherFetch`] and the caller decides whether to
/// skip the location or abort.
#[allow(async_fn_in_trait)]
pub trait ForecastProvider {
    async fn forecast(&self, point: &GeoPoint) -> Result<Vec<ForecastDay>>;
}
