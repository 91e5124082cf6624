//! Error types for `tribal-mapper`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("source dataset error: {0}")]
  Source(#[from] tribal_core::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// Neither a target region nor a custom fragment matched any tribe.
  #[error("no tribes selected; nothing to map")]
  EmptySelection,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
