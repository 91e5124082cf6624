//! Parser for the BIA Tribal Leaders Directory GeoJSON export.
//!
//! Every feature must carry a numeric `id`, a point geometry
//! `[longitude, latitude]` and all of [`REQUIRED_PROPERTIES`]. Property values
//! may be `null`. A single bad feature fails the whole parse.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Error, Result, tribe::Tribe};

/// Property keys every feature must have, present even when `null`.
pub const REQUIRED_PROPERTIES: [&str; 10] = [
  "tribefullname",
  "tribe",
  "tribealternatename",
  "biaregion",
  "firstname",
  "lastname",
  "jobtitle",
  "phone",
  "email",
  "website",
];

#[derive(Deserialize)]
struct RawCollection {
  features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
  #[serde(default)]
  id:         Option<Value>,
  geometry:   RawGeometry,
  properties: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawGeometry {
  coordinates: Vec<f64>,
}

/// Read and parse the dataset at `path`.
pub fn read_tribes(path: impl AsRef<Path>) -> Result<Vec<Tribe>> {
  let raw = std::fs::read_to_string(path)?;
  parse_tribes(&raw)
}

/// Parse a GeoJSON feature collection into tribes, in feature order.
pub fn parse_tribes(input: &str) -> Result<Vec<Tribe>> {
  let collection: RawCollection = serde_json::from_str(input)?;
  collection
    .features
    .into_iter()
    .enumerate()
    .map(|(i, f)| into_tribe(i, f))
    .collect()
}

fn into_tribe(index: usize, feature: RawFeature) -> Result<Tribe> {
  let props = &feature.properties;
  if let Some(key) = REQUIRED_PROPERTIES.iter().find(|k| !props.contains_key(**k)) {
    return Err(Error::MissingProperty { feature: index, key: *key });
  }

  let tribe_id = match feature.id {
    None | Some(Value::Null) => return Err(Error::MissingId { feature: index }),
    Some(Value::Number(n)) if n.is_i64() => n.as_i64().unwrap_or_default(),
    Some(Value::String(s)) => s
      .parse()
      .map_err(|_| Error::InvalidId { feature: index, value: s.clone() })?,
    Some(other) => {
      return Err(Error::InvalidId { feature: index, value: other.to_string() });
    }
  };

  let (longitude, latitude) = match feature.geometry.coordinates.as_slice() {
    [lon, lat, ..] => (*lon, *lat),
    _ => return Err(Error::InvalidCoordinates { feature: index }),
  };

  let first = text(props, "firstname").unwrap_or_default();
  let last = text(props, "lastname").unwrap_or_default();

  Ok(Tribe {
    tribe_id,
    full_name: text(props, "tribefullname"),
    name: text(props, "tribe"),
    alternate_name: text(props, "tribealternatename"),
    bia_region: text(props, "biaregion"),
    latitude,
    longitude,
    leader_name: format!("{first} {last}").trim().to_string(),
    leader_title: text(props, "jobtitle"),
    phone: text(props, "phone"),
    email: text(props, "email"),
    website: text(props, "website"),
  })
}

/// Read a property as text. Numbers and booleans are stringified.
fn text(props: &Map<String, Value>, key: &str) -> Option<String> {
  match props.get(key)? {
    Value::Null => None,
    Value::String(s) => Some(s.clone()),
    other => Some(other.to_string()),
  }
}

/// Test fixtures shared by downstream crates' tests.
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures {
  use serde_json::json;

  /// One feature with every required property filled in.
  pub fn feature(id: i64, full_name: &str, region: &str, lon: f64, lat: f64) -> serde_json::Value {
    json!({
      "type": "Feature",
      "id": id,
      "geometry": { "type": "Point", "coordinates": [lon, lat] },
      "properties": {
        "tribefullname": full_name,
        "tribe": full_name.split_whitespace().next().unwrap_or_default(),
        "tribealternatename": null,
        "biaregion": region,
        "firstname": "A",
        "lastname": "B",
        "jobtitle": "Chairperson",
        "phone": "(555) 555-0100",
        "email": "office@example.org",
        "website": "https://example.org"
      }
    })
  }

  /// Wrap features into a `FeatureCollection` string.
  pub fn collection(features: Vec<serde_json::Value>) -> String {
    json!({ "type": "FeatureCollection", "features": features }).to_string()
  }
}
