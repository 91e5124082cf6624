//! Curated associations between BIA tribes and lookup-service territories.

use serde::{Deserialize, Serialize};

/// One tribe ↔ territory association with a curator-assigned confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TribeTerritoryMapping {
  pub tribe_id:     i64,
  pub territory_id: String,
  pub confidence:   f64,
  pub notes:        Option<String>,
}
