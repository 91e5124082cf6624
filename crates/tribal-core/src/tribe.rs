//! One row of the BIA Tribal Leaders Directory.

use serde::{Deserialize, Serialize};

/// A decimal-degree coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub latitude:  f64,
  pub longitude: f64,
}

impl Position {
  pub fn new(latitude: f64, longitude: f64) -> Self { Self { latitude, longitude } }
}

/// A federally recognised tribe and its point of contact.
///
/// Text columns mirror the source dataset, where any of them may be `null`.
/// The leader name is the source's first and last name joined and trimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tribe {
  pub tribe_id:       i64,
  pub full_name:      Option<String>,
  pub name:           Option<String>,
  pub alternate_name: Option<String>,
  pub bia_region:     Option<String>,
  pub latitude:       f64,
  pub longitude:      f64,
  pub leader_name:    String,
  pub leader_title:   Option<String>,
  pub phone:          Option<String>,
  pub email:          Option<String>,
  pub website:        Option<String>,
}

impl Tribe {
  pub fn position(&self) -> Position { Position::new(self.latitude, self.longitude) }

  /// Case-insensitive substring test against the full name.
  ///
  /// `fragment` must already be lower-cased.
  pub fn full_name_contains(&self, fragment: &str) -> bool {
    self
      .full_name
      .as_deref()
      .is_some_and(|n| n.to_lowercase().contains(fragment))
  }

  /// Whether the tribe's BIA region is one of `regions`.
  pub fn in_region(&self, regions: &[String]) -> bool {
    self
      .bia_region
      .as_deref()
      .is_some_and(|r| regions.iter().any(|t| t == r))
  }

  /// Equality over the dataset row: every column except `tribe_id`.
  pub fn same_record(&self, other: &Tribe) -> bool {
    Tribe { tribe_id: other.tribe_id, ..self.clone() } == *other
  }
}
