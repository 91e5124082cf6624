//! Decoding of the lookup service's feature array.
//!
//! Each feature's `description` is a URL like
//! `https://native-land.ca/maps/territories/<slug>`; the `territories` /
//! `languages` / `treaties` path segment decides the [`LandKind`].

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use tribal_core::land::{LandArea, LandKind, LandReport};

use crate::Result;

#[derive(Deserialize)]
struct RawFeature {
  #[serde(default)]
  properties: RawProperties,
  #[serde(default)]
  geometry:   Value,
}

#[derive(Deserialize, Default)]
struct RawProperties {
  #[serde(rename = "Name", default)]
  name:        Option<String>,
  #[serde(rename = "Slug", default)]
  slug:        Option<String>,
  #[serde(rename = "ID", default)]
  id:          Option<Value>,
  #[serde(default)]
  description: Option<String>,
}

/// Decode a success body into a [`LandReport`].
///
/// Features without an identifier or a recognisable kind are skipped.
pub fn parse_response(body: &str) -> Result<LandReport> {
  let features: Vec<RawFeature> = serde_json::from_str(body)?;
  Ok(LandReport::from_areas(features.into_iter().filter_map(into_area)))
}

fn into_area(feature: RawFeature) -> Option<LandArea> {
  let props = feature.properties;

  let kind = props
    .description
    .as_deref()
    .and_then(|d| d.split('/').find_map(LandKind::from_dataset));
  let id = props.slug.clone().or_else(|| match &props.id {
    Some(Value::String(s)) => Some(s.clone()),
    Some(Value::Number(n)) => Some(n.to_string()),
    _ => None,
  });

  let (Some(kind), Some(id)) = (kind, id) else {
    debug!(name = ?props.name, description = ?props.description, "skipping unclassified feature");
    return None;
  };

  Some(LandArea {
    kind,
    name: props.name.unwrap_or_else(|| id.clone()),
    id,
    description: props.description,
    geometry: feature.geometry,
  })
}
