//! Elevation lookups against an Open-Elevation compatible service

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::ElevationSettings;
use crate::models::{Campground, GeoPoint};
use crate::{Result, SummerFinderError};

const ELEVATION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct LookupRequest {
    locations: Vec<LookupLocation>,
}

#[derive(Debug, Serialize)]
struct LookupLocation {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    results: Vec<ElevationResult>,
}

/// One looked-up point, elevation in meters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ElevationResult {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl ElevationResult {
    fn key(&self) -> String {
        GeoPoint::new(self.latitude, self.longitude).key()
    }

    fn meters(&self) -> i32 {
        self.elevation.round() as i32
    }
}

#[derive(Debug, Clone)]
pub struct ElevationClient {
    client: reqwest::Client,
    base_url: String,
}

impl ElevationClient {
    pub fn new(settings: &ElevationSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(ELEVATION_TIMEOUT)
            .build()
            .map_err(|e| SummerFinderError::api(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up every point with a single POST
    #[instrument(skip_all, fields(points = points.len()))]
    pub async fn lookup_many(&self, points: &[GeoPoint]) -> Result<Vec<ElevationResult>> {
        let request = LookupRequest {
            locations: points
                .iter()
                .map(|point| LookupLocation {
                    latitude: point.latitude,
                    longitude: point.longitude,
                })
                .collect(),
        };

        let response = self
            .client
            .post(format!("{}/lookup", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| SummerFinderError::api(format!("Elevation request failed: {e}")))?;

        Self::parse(response).await
    }

    /// Look up a single point, `None` when the service has no answer
    #[instrument(skip(self))]
    pub async fn lookup(&self, point: &GeoPoint) -> Result<Option<i32>> {
        let response = self
            .client
            .get(format!("{}/lookup", self.base_url))
            .query(&[("locations", point.key())])
            .send()
            .await
            .map_err(|e| SummerFinderError::api(format!("Elevation request failed: {e}")))?;

        let results = Self::parse(response).await?;
        Ok(results.first().map(ElevationResult::meters))
    }

    async fn parse(response: reqwest::Response) -> Result<Vec<ElevationResult>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummerFinderError::api(format!(
                "Elevation service returned {status}: {body}"
            )));
        }

        let lookup: LookupResponse = response.json().await.map_err(|e| {
            SummerFinderError::api(format!("Invalid elevation response: {e}"))
        })?;
        Ok(lookup.results)
    }
}

/// Add or update `elevation` on every campground the service answered for.
///
/// Results are matched back by four-decimal location key. Returns the number
/// of campgrounds updated.
pub async fn add_elevations(
    client: &ElevationClient,
    campgrounds: &mut [Campground],
) -> Result<usize> {
    if campgrounds.is_empty() {
        return Ok(0);
    }

    let points: Vec<GeoPoint> = campgrounds.iter().map(|c| c.location).collect();
    let results = client.lookup_many(&points).await?;

    let elevations: HashMap<String, i32> = results
        .iter()
        .map(|result| (result.key(), result.meters()))
        .collect();

    let mut updated = 0;
    for campground in campgrounds.iter_mut() {
        match elevations.get(&campground.location.key()) {
            Some(&meters) => {
                campground.elevation = Some(meters);
                updated += 1;
            }
            None => warn!("No elevation returned for {}", campground.name),
        }
    }

    info!("Updated elevation for {} of {} campgrounds", updated, campgrounds.len());
    Ok(updated)
}
