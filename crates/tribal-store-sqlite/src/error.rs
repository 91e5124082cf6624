//! Error type for `tribal-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The source dataset could not be read or is malformed.
  #[error("source dataset error: {0}")]
  Source(#[from] tribal_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// No tribe's full or short name contains the fragment.
  #[error("tribe not found: {0}")]
  TribeNotFound(String),

  #[error("tribe id not found: {0}")]
  TribeIdNotFound(i64),

  #[error("facility not found: {0}")]
  FacilityNotFound(i64),

  #[error("territory not found: {0}")]
  TerritoryNotFound(String),

  #[error("land lookup failed: {0}")]
  Lookup(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
