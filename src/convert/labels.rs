//! Place labels from a GeoJSON export, keyed by four-decimal location

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::models::GeoPoint;
use crate::{Result, SummerFinderError};

/// `"lat,lon"` key to place name
pub type Labels = BTreeMap<String, String>;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// GeoJSON order: longitude first
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    name: Option<String>,
}

/// Build the label map from a GeoJSON `FeatureCollection` of points
pub fn labels_from_geojson(text: &str) -> Result<Labels> {
    let collection: FeatureCollection = serde_json::from_str(text)?;

    collection
        .features
        .into_iter()
        .map(|feature| match feature.geometry.coordinates[..] {
            [longitude, latitude, ..] => Ok((
                GeoPoint::new(latitude, longitude).key(),
                feature.properties.name.unwrap_or_default(),
            )),
            _ => Err(SummerFinderError::conversion(
                "GeoJSON point needs at least two coordinates",
            )),
        })
        .collect()
}
