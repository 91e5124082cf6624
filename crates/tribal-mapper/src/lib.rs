//! Regional subsetting and map rendering for the BIA tribal dataset.
//!
//! A [`TribalMapper`] holds the whole dataset in memory, a list of target
//! BIA regions and a set of "custom" name fragments. [`TribalMapper::select`]
//! returns the union of both, and [`TribalMapper::render`] turns it into a
//! standalone Leaflet page.
//!
//! ```no_run
//! use tribal_mapper::{MapperConfig, TribalMapper};
//!
//! let mut mapper = TribalMapper::load("tribes.geojson", MapperConfig::default()).unwrap();
//! mapper.add_custom_tribe("Standing Rock Sioux");
//! mapper.render().unwrap().save("pnw_and_custom_tribes_map.html").unwrap();
//! ```

pub mod error;
mod render;

use std::{collections::BTreeSet, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tribal_core::{source, tribe::Tribe};

pub use error::{Error, Result};
pub use render::{Category, Marker, TribalMap};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Mapper settings; the defaults target the Pacific Northwest.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MapperConfig {
  /// BIA region labels always included in the selection.
  pub target_regions: Vec<String>,
  /// Initial Leaflet zoom level.
  pub zoom_start:     u8,
}

impl Default for MapperConfig {
  fn default() -> Self {
    Self { target_regions: vec!["Northwest".to_string()], zoom_start: 5 }
  }
}

/// A row of [`TribalMapper::list_all_tribes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TribeSummary {
  pub name:   Option<String>,
  pub region: Option<String>,
}

// ─── Mapper ──────────────────────────────────────────────────────────────────

pub struct TribalMapper {
  tribes:         Vec<Tribe>,
  target_regions: Vec<String>,
  custom_tribes:  BTreeSet<String>,
  zoom_start:     u8,
}

impl TribalMapper {
  /// Load the GeoJSON dataset at `path`.
  pub fn load(path: impl AsRef<Path>, config: MapperConfig) -> Result<Self> {
    let tribes = source::read_tribes(path)?;
    info!(count = tribes.len(), "loaded tribes");
    Ok(Self::from_tribes(tribes, config))
  }

  pub fn from_tribes(tribes: Vec<Tribe>, config: MapperConfig) -> Self {
    Self {
      tribes,
      target_regions: config.target_regions,
      custom_tribes: BTreeSet::new(),
      zoom_start: config.zoom_start,
    }
  }

  pub fn tribes(&self) -> &[Tribe] { &self.tribes }

  pub fn target_regions(&self) -> &[String] { &self.target_regions }

  pub fn set_target_regions(&mut self, regions: Vec<String>) { self.target_regions = regions; }

  /// The current custom fragments, lower-cased.
  pub fn custom_tribes(&self) -> &BTreeSet<String> { &self.custom_tribes }

  /// Track tribes whose full name contains `fragment` (case-insensitive).
  ///
  /// Returns `false` and leaves the set unchanged if no tribe matches.
  pub fn add_custom_tribe(&mut self, fragment: &str) -> bool {
    let fragment = fragment.to_lowercase();
    if !self.tribes.iter().any(|t| t.full_name_contains(&fragment)) {
      debug!(fragment = %fragment, "no tribe matches custom fragment");
      return false;
    }
    self.custom_tribes.insert(fragment);
    true
  }

  /// Stop tracking `fragment`. Returns `false` if it was not tracked.
  pub fn remove_custom_tribe(&mut self, fragment: &str) -> bool {
    self.custom_tribes.remove(&fragment.to_lowercase())
  }

  fn is_region(&self, tribe: &Tribe) -> bool { tribe.in_region(&self.target_regions) }

  fn is_custom(&self, tribe: &Tribe) -> bool {
    self.custom_tribes.iter().any(|f| tribe.full_name_contains(f))
  }

  /// Target-region tribes in load order, then custom-only tribes.
  ///
  /// Rows with identical columns appear once, whatever their feature ids.
  pub fn select(&self) -> Vec<&Tribe> {
    let region = self.tribes.iter().filter(|t| self.is_region(t));
    let custom = self.tribes.iter().filter(|t| self.is_custom(t));

    let mut selected: Vec<&Tribe> = Vec::new();
    for tribe in region.chain(custom) {
      if !selected.iter().any(|s| s.same_record(tribe)) {
        selected.push(tribe);
      }
    }
    selected
  }

  /// Render the current selection as a map centred on its mean coordinate.
  pub fn render(&self) -> Result<TribalMap> {
    let selected = self.select();
    if selected.is_empty() {
      return Err(Error::EmptySelection);
    }

    let label = render::region_label(&self.target_regions);
    let markers = selected
      .iter()
      .map(|t| {
        let category = if self.is_region(t) { Category::Region } else { Category::Custom };
        Marker::for_tribe(t, category, &label)
      })
      .collect();

    Ok(TribalMap::new(label, self.zoom_start, markers))
  }

  /// Every tribe's full name and region, sorted by name. Unnamed rows last.
  pub fn list_all_tribes(&self) -> Vec<TribeSummary> {
    let mut rows: Vec<TribeSummary> = self
      .tribes
      .iter()
      .map(|t| TribeSummary { name: t.full_name.clone(), region: t.bia_region.clone() })
      .collect();
    rows.sort_by(|a, b| (a.name.is_none(), &a.name).cmp(&(b.name.is_none(), &b.name)));
    rows
  }

  /// Write `map` to `path` as a single HTML document.
  pub fn save_map(&self, map: &TribalMap, path: impl AsRef<Path>) -> Result<()> { map.save(path) }
}
