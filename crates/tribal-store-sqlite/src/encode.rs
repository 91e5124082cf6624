//! Mapping between domain types and SQLite rows.
//!
//! Geometry payloads are stored as compact JSON text. The three land tables
//! share one shape and differ only in table and id column names.

use tribal_core::{
  facility::Facility,
  land::{LandArea, LandKind},
  mapping::TribeTerritoryMapping,
  member::Member,
  tribe::Tribe,
};

use crate::Result;

// ─── Land tables ─────────────────────────────────────────────────────────────

/// `(table, id column)` for each land kind.
pub fn land_table(kind: LandKind) -> (&'static str, &'static str) {
  match kind {
    LandKind::Territory => ("native_land_territories", "territory_id"),
    LandKind::Language => ("native_land_languages", "language_id"),
    LandKind::Treaty => ("native_land_treaties", "treaty_id"),
  }
}

pub fn encode_geometry(geometry: &serde_json::Value) -> Result<String> {
  Ok(serde_json::to_string(geometry)?)
}

/// Raw columns read from one of the land tables.
pub struct RawLandArea {
  pub id:          String,
  pub name:        String,
  pub description: Option<String>,
  pub geometry:    String,
}

impl RawLandArea {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      geometry:    row.get(3)?,
    })
  }

  pub fn into_area(self, kind: LandKind) -> Result<LandArea> {
    Ok(LandArea {
      kind,
      id: self.id,
      name: self.name,
      description: self.description,
      geometry: serde_json::from_str(&self.geometry)?,
    })
  }
}

// ─── Tribes ──────────────────────────────────────────────────────────────────

pub const TRIBE_COLUMNS: &str = "tribe_id, tribe_full_name, tribe_name, tribe_alternate_name, \
   bia_region, latitude, longitude, leader_name, leader_title, phone, email, website";

pub fn tribe_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Tribe> {
  Ok(Tribe {
    tribe_id:       row.get(0)?,
    full_name:      row.get(1)?,
    name:           row.get(2)?,
    alternate_name: row.get(3)?,
    bia_region:     row.get(4)?,
    latitude:       row.get(5)?,
    longitude:      row.get(6)?,
    leader_name:    row.get(7)?,
    leader_title:   row.get(8)?,
    phone:          row.get(9)?,
    email:          row.get(10)?,
    website:        row.get(11)?,
  })
}

// ─── Facilities, members, mappings ───────────────────────────────────────────

pub const FACILITY_COLUMNS: &str =
  "facility_id, name, address, city, state, zip, latitude, longitude";

pub fn facility_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Facility> {
  Ok(Facility {
    facility_id: row.get(0)?,
    name:        row.get(1)?,
    address:     row.get(2)?,
    city:        row.get(3)?,
    state:       row.get(4)?,
    zip:         row.get(5)?,
    latitude:    row.get(6)?,
    longitude:   row.get(7)?,
  })
}

pub fn member_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Member> {
  Ok(Member {
    member_id: row.get(0)?,
    name:      row.get(1)?,
    tribe_id:  row.get(2)?,
    notes:     row.get(3)?,
  })
}

pub fn mapping_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TribeTerritoryMapping> {
  Ok(TribeTerritoryMapping {
    tribe_id:     row.get(0)?,
    territory_id: row.get(1)?,
    confidence:   row.get(2)?,
    notes:        row.get(3)?,
  })
}
