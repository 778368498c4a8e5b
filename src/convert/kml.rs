//! KML export for map viewers

use serde::Serialize;

use crate::models::Campground;
use crate::{Result, SummerFinderError};

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Serialize)]
#[serde(rename = "kml")]
struct Kml {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "Document")]
    document: Document,
}

#[derive(Serialize)]
struct Document {
    #[serde(rename = "Placemark")]
    placemarks: Vec<Placemark>,
}

#[derive(Serialize)]
struct Placemark {
    name: String,
    elevation: &'static str,
    #[serde(rename = "Point")]
    point: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

#[derive(Serialize)]
struct Point {
    coordinates: String,
}

/// Coarse elevation bucket shown as a map layer attribute
#[must_use]
pub fn elevation_bucket(elevation: Option<i32>) -> &'static str {
    match elevation {
        None => "unknown",
        Some(e) if e < 2000 => "low",
        Some(e) if e < 2500 => "2000+",
        Some(e) if e < 3000 => "2500+",
        Some(e) if e < 3500 => "3000+",
        Some(e) if e < 4000 => "3500+",
        Some(_) => "4000+",
    }
}

impl From<&Campground> for Placemark {
    fn from(campground: &Campground) -> Self {
        let location = campground.location;
        Self {
            name: campground.name.clone(),
            elevation: elevation_bucket(campground.elevation),
            point: Point {
                coordinates: format!(
                    "{:.4},{:.4},{}",
                    location.longitude,
                    location.latitude,
                    campground.elevation.unwrap_or(0)
                ),
            },
            note: campground.note.clone(),
        }
    }
}

/// Render a KML 2.2 document with one placemark per campground
pub fn to_kml(campgrounds: &[Campground]) -> Result<String> {
    let kml = Kml {
        xmlns: KML_NAMESPACE,
        document: Document {
            placemarks: campgrounds.iter().map(Placemark::from).collect(),
        },
    };

    let mut body = String::new();
    let mut serializer = quick_xml::se::Serializer::new(&mut body);
    serializer.indent(' ', 2);
    kml.serialize(serializer)
        .map_err(|e| SummerFinderError::conversion(format!("KML write failed: {e}")))?;

    Ok(format!("{XML_DECLARATION}\n{body}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;
    use rstest::rstest;

    #[rstest]
    #[case(None, "unknown")]
    #[case(Some(0), "low")]
    #[case(Some(1999), "low")]
    #[case(Some(2000), "2000+")]
    #[case(Some(2999), "2500+")]
    #[case(Some(3000), "3000+")]
    #[case(Some(3500), "3500+")]
    #[case(Some(4000), "4000+")]
    #[case(Some(9000), "4000+")]
    fn test_elevation_bucket(#[case] elevation: Option<i32>, #[case] expected: &str) {
        assert_eq!(elevation_bucket(elevation), expected);
    }

    #[test]
    fn test_to_kml() {
        let campgrounds = vec![
            Campground::new("Tom & Jerry's", GeoPoint::new(38.1, -78.2))
                .with_elevation(2600)
                .with_note("near <river>"),
            Campground::new("Plain", GeoPoint::new(37.0, -79.0)),
        ];

        let kml = to_kml(&campgrounds).unwrap();

        assert!(kml.starts_with(XML_DECLARATION));
        assert!(kml.contains(r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#));
        assert_eq!(kml.matches("<Placemark>").count(), 2);
        assert!(kml.contains("Tom &amp; Jerry"));
        assert!(kml.contains("<elevation>2500+</elevation>"));
        assert!(kml.contains("<coordinates>-78.2000,38.1000,2600</coordinates>"));
        assert!(kml.contains("near &lt;river&gt;"));
        assert!(kml.contains("<coordinates>-79.0000,37.0000,0</coordinates>"));
        assert!(kml.contains("<elevation>unknown</elevation>"));
        assert_eq!(kml.matches("<note>").count(), 1);
    }
}
