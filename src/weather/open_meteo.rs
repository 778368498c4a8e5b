//! Open-Meteo forecast and geocoding client
//!
//! Requests the daily maximum 2 m temperature in Fahrenheit with the timezone
//! resolved from the coordinates, so forecast dates are local to the campground.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use reqwest::Response;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::{FORECAST_DAYS, ForecastProvider};
use crate::config::{RetryMode, WeatherSettings};
use crate::models::{ForecastDay, GeoPoint};
use crate::{Result, SummerFinderError};

const MIN_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Open-Meteo API client
#[derive(Clone)]
pub struct WeatherClient {
    client: ClientWithMiddleware,
    base_url: String,
    geocoding_base_url: String,
    retry: RetryMode,
}

/// Forecast response, reduced to the fields requested
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: DailyData,
}

#[derive(Debug, Deserialize)]
struct DailyData {
    time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    temperature_max: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

/// One geocoding candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl WeatherClient {
    /// Create a new client; `settings.retry` selects the failure policy
    pub fn new(settings: &WeatherSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(concat!("SummerFinder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SummerFinderError::config(format!("Failed to create HTTP client: {e}")))?;

        let mut builder = ClientBuilder::new(http);
        if settings.retry == RetryMode::Backoff && settings.max_retries > 0 {
            let policy = ExponentialBackoff::builder()
                .retry_bounds(MIN_BACKOFF, MAX_BACKOFF)
                .build_with_max_retries(settings.max_retries);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(policy));
        }

        Ok(Self {
            client: builder.build(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            geocoding_base_url: settings.geocoding_base_url.trim_end_matches('/').to_string(),
            retry: settings.retry,
        })
    }

    /// Daily maximum temperatures for the next [`FORECAST_DAYS`] days
    #[instrument(skip(self), fields(location = %point.key()))]
    pub async fn daily_max_temperatures(&self, point: &GeoPoint) -> Result<Vec<ForecastDay>> {
        let target = point.key();
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&daily=temperature_2m_max&timezone=auto&forecast_days={}&temperature_unit=fahrenheit",
            self.base_url, point.latitude, point.longitude, FORECAST_DAYS
        );

        let start_time = Instant::now();
        let response = self.send(&url, &target).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummerFinderError::weather_fetch(
                &target,
                format!(
                    "forecast request failed with status {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown error")
                ),
            ));
        }

        let forecast_response: ForecastResponse = response.json().await.map_err(|e| {
            SummerFinderError::weather_fetch(&target, format!("invalid forecast data: {e}"))
        })?;

        let days = forecast_response
            .daily
            .into_forecast_days()
            .map_err(|message| SummerFinderError::weather_fetch(&target, message))?;

        let total_duration = start_time.elapsed();
        debug!(
            "Retrieved {} forecast days in {:.3}s",
            days.len(),
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow forecast API response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(days)
    }

    /// Look up candidate coordinates for a place name
    #[instrument(skip(self))]
    pub async fn geocode(&self, name: &str) -> Result<Vec<GeocodingResult>> {
        let url = format!(
            "{}/search?name={}&count=5&language=en&format=json",
            self.geocoding_base_url,
            urlencoding::encode(name)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SummerFinderError::api(format!("Geocoding request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SummerFinderError::api(format!(
                "Geocoding request failed with status {}",
                response.status()
            )));
        }

        let geocoding: GeocodingResponse = response.json().await.map_err(|e| {
            SummerFinderError::api(format!("Failed to parse geocoding response: {e}"))
        })?;

        let results = geocoding.results.unwrap_or_default();
        if results.is_empty() {
            warn!("No geocoding results found for '{}'", name);
        } else {
            info!("Found {} geocoding results for '{}'", results.len(), name);
        }
        Ok(results)
    }

    /// Issue a GET; under `until_success` a timed-out attempt is repeated
    /// until the service answers.
    async fn send(&self, url: &str, target: &str) -> Result<Response> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.client.get(url).send().await {
                Ok(response) => return Ok(response),
                Err(e) if self.retry == RetryMode::UntilSuccess && is_timeout(&e) => {
                    warn!(
                        "Timed out fetching weather for {} (attempt {}), retrying",
                        target, attempt
                    );
                }
                Err(e) => return Err(SummerFinderError::weather_fetch(target, e.to_string())),
            }
        }
    }
}

impl ForecastProvider for WeatherClient {
    async fn forecast(&self, point: &GeoPoint) -> Result<Vec<ForecastDay>> {
        self.daily_max_temperatures(point).await
    }
}

fn is_timeout(error: &reqwest_middleware::Error) -> bool {
    matches!(error, reqwest_middleware::Error::Reqwest(e) if e.is_timeout())
}

impl DailyData {
    /// Pair dates with temperatures; the arrays must line up index for index
    fn into_forecast_days(self) -> std::result::Result<Vec<ForecastDay>, String> {
        if self.time.len() != self.temperature_max.len() {
            return Err(format!(
                "forecast has {} dates but {} temperatures",
                self.time.len(),
                self.temperature_max.len()
            ));
        }

        self.time
            .iter()
            .zip(self.temperature_max)
            .map(|(date, temp)| {
                NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map(|date| ForecastDay::new(date, temp))
                    .map_err(|e| format!("invalid forecast date '{date}': {e}"))
            })
            .collect()
    }
}
