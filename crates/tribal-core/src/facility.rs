//! Facilities: the locations checked against tribal lands.

use serde::{Deserialize, Serialize};

use crate::tribe::Position;

/// Input for [`TribalStore::add_facility`](crate::store::TribalStore::add_facility).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFacility {
  pub name:      String,
  pub address:   String,
  pub city:      String,
  pub state:     String,
  pub zip:       String,
  pub latitude:  f64,
  pub longitude: f64,
}

/// A persisted facility. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
  pub facility_id: i64,
  pub name:        String,
  pub address:     String,
  pub city:        String,
  pub state:       String,
  pub zip:         String,
  pub latitude:    f64,
  pub longitude:   f64,
}

impl Facility {
  pub fn position(&self) -> Position { Position::new(self.latitude, self.longitude) }
}
