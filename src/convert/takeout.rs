//! Import a Google Takeout saved-places CSV
//!
//! Each row's location comes from the `lat,lon` in its URL when present.
//! Otherwise the page behind the URL is fetched and searched for `@lat,lon`;
//! those fetches are spaced out by a random delay so long lists are not
//! throttled.

use std::io::Read;
use std::ops::Range;
use std::sync::LazyLock;
use std::time::Duration;

use rand::RngExt;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::labels::Labels;
use crate::models::{Campground, GeoPoint};
use crate::{Result, SummerFinderError};

static URL_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?\d{1,3}\.\d{1,9}),(-?\d{1,3}\.\d{1,9})").expect("location pattern is valid")
});

static PAGE_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@(-?\d{1,3}\.\d{1,9}),(-?\d{1,3}\.\d{1,9})").expect("location pattern is valid")
});

static NOTE_ELEVATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{3,5}) ?ft\.? elev\.?\n?").expect("elevation pattern is valid")
});

/// Delay range (seconds) between page fetches
const FETCH_DELAY_SECS: std::ops::RangeInclusive<u64> = 30..=90;
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Deserialize)]
pub struct TakeoutRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Note", default)]
    pub note: Option<String>,
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
}

/// Read every row of a Takeout CSV
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<TakeoutRow>> {
    csv::Reader::from_reader(reader)
        .deserialize()
        .collect::<std::result::Result<Vec<TakeoutRow>, _>>()
        .map_err(|e| SummerFinderError::conversion(format!("Invalid Takeout CSV: {e}")))
}

/// Elevation written as `NNN ft elev` in a note, and the note without it
#[must_use]
pub fn split_note_elevation(note: &str) -> (Option<i32>, String) {
    let elevation = NOTE_ELEVATION
        .captures(note)
        .and_then(|captures| captures[1].parse().ok());
    match elevation {
        Some(elevation) => (
            Some(elevation),
            NOTE_ELEVATION.replace_all(note, "").into_owned(),
        ),
        None => (None, note.to_string()),
    }
}

fn point_from(captures: &regex::Captures<'_>) -> Option<GeoPoint> {
    let latitude = captures[1].parse().ok()?;
    let longitude = captures[2].parse().ok()?;
    Some(GeoPoint::new(latitude, longitude))
}

pub struct TakeoutImporter<'a> {
    client: reqwest::Client,
    labels: &'a Labels,
    fetch_delay: bool,
}

impl<'a> TakeoutImporter<'a> {
    pub fn new(labels: &'a Labels) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| SummerFinderError::api(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            labels,
            fetch_delay: true,
        })
    }

    /// Disable the pause before page fetches
    #[must_use]
    pub fn without_fetch_delay(mut self) -> Self {
        self.fetch_delay = false;
        self
    }

    /// Convert `rows[range]`; rows whose location cannot be found are skipped.
    ///
    /// The range is clamped to the available rows.
    pub async fn import(&self, rows: &[TakeoutRow], range: Range<usize>) -> Vec<Campground> {
        let stop = range.end.min(rows.len());
        let start = range.start.min(stop);
        let delay = self.fetch_delay && stop - start != 1;

        let mut campgrounds = Vec::new();
        for (index, row) in rows.iter().enumerate().take(stop).skip(start) {
            let Some((location, label)) = self.locate(row, delay).await else {
                debug!("No location for row {} ({})", index, row.title);
                continue;
            };

            let name = label.unwrap_or_else(|| row.title.clone());
            let mut campground = Campground::new(name, location);
            campground.index = Some(index);
            if let Some(note) = &row.note {
                let (elevation, note) = split_note_elevation(note);
                campground.elevation = elevation;
                campground.note = Some(note);
            }
            campgrounds.push(campground);
        }

        info!(
            "Imported {} of {} Takeout rows",
            campgrounds.len(),
            stop - start
        );
        campgrounds
    }

    /// Location for a row plus a label looked up by it
    async fn locate(&self, row: &TakeoutRow, delay: bool) -> Option<(GeoPoint, Option<String>)> {
        let url = row.url.as_deref()?;

        if let Some(location) = URL_LOCATION.captures(url).as_ref().and_then(point_from) {
            let label = self.labels.get(&location.key()).cloned();
            return Some((location, label));
        }

        if delay {
            let secs = rand::rng().random_range(FETCH_DELAY_SECS);
            debug!("Waiting {}s before fetching {}", secs, url);
            tokio::time::sleep(Duration::from_secs(secs)).await;
        }

        match self.fetch_page_location(url).await {
            Ok(location) => location.map(|location| (location, None)),
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }

    async fn fetch_page_location(&self, url: &str) -> Result<Option<GeoPoint>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SummerFinderError::api(format!("Failed to fetch {url}: {e}")))?;
        if !response.status().is_success() {
            return Err(SummerFinderError::api(format!(
                "Failed to fetch {url}: status {}",
                response.status()
            )));
        }

        let page = response
            .text()
            .await
            .map_err(|e| SummerFinderError::api(format!("Failed to read {url}: {e}")))?;
        Ok(PAGE_LOCATION.captures(&page).as_ref().and_then(point_from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CSV: &str = "Title,Note,URL,Comment
Big Meadows,\"3500 ft elev.\nshady\",\"https://www.google.com/maps/search/38.52912,-78.43801\",
Lake Anna,,\"https://www.google.com/maps/search/38.1,-77.8\",
No Link,something,,
";

    #[test]
    fn test_read_rows() {
        let rows = read_rows(CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].title, "Big Meadows");
        assert_eq!(rows[1].note, None);
        assert_eq!(rows[2].url, None);
    }

    #[test]
    fn test_split_note_elevation() {
        assert_eq!(
            split_note_elevation("3500 ft elev.\nshady"),
            (Some(3500), "shady".to_string())
        );
        assert_eq!(
            split_note_elevation("at 1200ft elev by the creek"),
            (Some(1200), "at  by the creek".to_string())
        );
        assert_eq!(
            split_note_elevation("no height"),
            (None, "no height".to_string())
        );
    }

    #[tokio::test]
    async fn test_import_from_url_coordinates() {
        let rows = read_rows(CSV.as_bytes()).unwrap();
        let mut labels = Labels::new();
        labels.insert("38.1000,-77.8000".to_string(), "Lake Anna State Park".to_string());

        let importer = TakeoutImporter::new(&labels).unwrap();
        let campgrounds = importer.import(&rows, 0..usize::MAX).await;

        assert_eq!(campgrounds.len(), 2);
        assert_eq!(campgrounds[0].name, "Big Meadows");
        assert_eq!(campgrounds[0].location.key(), "38.5291,-78.4380");
        assert_eq!(campgrounds[0].elevation, Some(3500));
        assert_eq!(campgrounds[0].note.as_deref(), Some("shady"));
        assert_eq!(campgrounds[0].index, Some(0));

        assert_eq!(campgrounds[1].name, "Lake Anna State Park");
        assert_eq!(campgrounds[1].index, Some(1));
    }

    #[tokio::test]
    async fn test_import_respects_range() {
        let rows = read_rows(CSV.as_bytes()).unwrap();
        let labels = Labels::new();
        let importer = TakeoutImporter::new(&labels).unwrap();

        let campgrounds = importer.import(&rows, 1..2).await;

        assert_eq!(campgrounds.len(), 1);
        assert_eq!(campgrounds[0].name, "Lake Anna");
    }

    #[tokio::test]
    async fn test_location_from_fetched_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/place/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><meta content="https://maps.google.com/@37.25,-79.5,15z"></html>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let rows = vec![TakeoutRow {
            title: "Hidden Valley".to_string(),
            note: None,
            url: Some(format!("{}/maps/place/abc", server.uri())),
        }];
        let labels = Labels::new();
        let importer = TakeoutImporter::new(&labels)
            .unwrap()
            .without_fetch_delay();

        let campgrounds = importer.import(&rows, 0..1).await;

        assert_eq!(campgrounds.len(), 1);
        assert_eq!(campgrounds[0].name, "Hidden Valley");
        assert_eq!(campgrounds[0].location.key(), "37.2500,-79.5000");
    }
}
