//! Leaflet HTML rendering.
//!
//! The page pulls Leaflet from its CDN and inlines every marker as JSON, so
//! the output is a single file.

use std::path::Path;

use serde::Serialize;
use tracing::info;
use tribal_core::tribe::{Position, Tribe};

use crate::Result;

// ─── Markers ─────────────────────────────────────────────────────────────────

/// Why a tribe is on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  /// Its BIA region is one of the target regions.
  Region,
  /// Added through a custom name fragment.
  Custom,
}

impl Category {
  pub fn color(self) -> &'static str {
    match self {
      Category::Region => "#2a81cb",
      Category::Custom => "#cb2b3e",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
  pub position: Position,
  pub category: Category,
  /// Escaped name shown on hover.
  pub tooltip:  String,
  /// Escaped HTML shown on click.
  pub popup:    String,
}

impl Marker {
  /// `region_label` names [`Category::Region`], as in the legend.
  pub(crate) fn for_tribe(tribe: &Tribe, category: Category, region_label: &str) -> Self {
    let text = |v: &Option<String>| escape(v.as_deref().unwrap_or_default());
    let kind = match category {
      Category::Region => escape(region_label),
      Category::Custom => CUSTOM_LABEL.to_string(),
    };
    let popup = format!(
      "<b>{}</b><br>Region: {}<br>Leader: {}<br>Title: {}<br>Phone: {}<br>Email: {}<br>Type: {}",
      text(&tribe.full_name),
      text(&tribe.bia_region),
      escape(&tribe.leader_name),
      text(&tribe.leader_title),
      text(&tribe.phone),
      text(&tribe.email),
      kind,
    );
    Self {
      position: tribe.position(),
      category,
      tooltip: text(&tribe.full_name),
      popup,
    }
  }
}

const CUSTOM_LABEL: &str = "Custom Added";

/// Label for region markers, e.g. `Northwest Region`.
pub(crate) fn region_label(target_regions: &[String]) -> String {
  format!("{} Region", target_regions.join(" / "))
}

// ─── Map ─────────────────────────────────────────────────────────────────────

/// A rendered map: centre, markers and a two-entry legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TribalMap {
  pub center:       Position,
  pub zoom_start:   u8,
  pub markers:      Vec<Marker>,
  /// Legend text for [`Category::Region`], e.g. `Northwest Region`.
  pub region_label: String,
}

impl TribalMap {
  /// Centre on the arithmetic mean of the marker positions.
  ///
  /// `markers` must be non-empty.
  pub(crate) fn new(region_label: String, zoom_start: u8, markers: Vec<Marker>) -> Self {
    let n = markers.len() as f64;
    let (lat, lon) = markers.iter().fold((0.0, 0.0), |(lat, lon), m| {
      (lat + m.position.latitude, lon + m.position.longitude)
    });
    Self {
      center: Position::new(lat / n, lon / n),
      zoom_start,
      markers,
      region_label,
    }
  }

  /// The legend entries as `(label, colour)`.
  pub fn legend(&self) -> [(&str, &'static str); 2] {
    [
      (self.region_label.as_str(), Category::Region.color()),
      (CUSTOM_LABEL, Category::Custom.color()),
    ]
  }

  pub fn to_html(&self) -> Result<String> {
    // `</` inside an inline script would end it early.
    let markers = serde_json::to_string(&self.markers)?.replace("</", "<\\/");
    let legend: String = self
      .legend()
      .iter()
      .map(|(label, color)| {
        format!(
          "<p><span class=\"swatch\" style=\"background:{color}\"></span> {}</p>",
          escape(label)
        )
      })
      .collect();

    Ok(format!(
      r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Tribal Lands Map</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="{LEAFLET}/leaflet.css">
<script src="{LEAFLET}/leaflet.js"></script>
<style>
  html, body, #map {{ height: 100%; margin: 0; }}
  .legend {{ position: fixed; bottom: 50px; right: 50px; z-index: 9999;
             background: white; border: 2px solid grey; border-radius: 5px;
             padding: 10px; font-size: 14px; }}
  .legend p {{ margin: 4px 0; }}
  .swatch {{ display: inline-block; width: 12px; height: 12px; border-radius: 50%; }}
</style>
</head>
<body>
<div id="map"></div>
<div class="legend">{legend}</div>
<script>
  const map = L.map("map").setView([{lat}, {lon}], {zoom});
  L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
    attribution: "&copy; OpenStreetMap contributors"
  }}).addTo(map);
  const colors = {{ region: "{region}", custom: "{custom}" }};
  const markers = {markers};
  for (const m of markers) {{
    L.circleMarker([m.position.latitude, m.position.longitude], {{
      radius: 8, color: colors[m.category], fillColor: colors[m.category], fillOpacity: 0.8
    }}).bindTooltip(m.tooltip).bindPopup(m.popup).addTo(map);
  }}
</script>
</body>
</html>
"#,
      lat = self.center.latitude,
      lon = self.center.longitude,
      zoom = self.zoom_start,
      region = Category::Region.color(),
      custom = Category::Custom.color(),
    ))
  }

  /// Write the page to `path`, replacing any existing file.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, self.to_html()?)?;
    info!(path = %path.display(), markers = self.markers.len(), "saved map");
    Ok(())
  }
}

const LEAFLET: &str = "https://unpkg.com/leaflet@1.9.4/dist";

/// Minimal HTML text escaping.
fn escape(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
    .replace('\'', "&#39;")
}
