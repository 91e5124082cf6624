//! Error types for `tribal-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read source dataset: {0}")]
  Io(#[from] std::io::Error),

  #[error("malformed source dataset: {0}")]
  Json(#[from] serde_json::Error),

  /// A feature's `properties` object lacks one of the required keys.
  #[error("feature {feature}: missing property {key:?}")]
  MissingProperty { feature: usize, key: &'static str },

  #[error("feature {feature}: missing id")]
  MissingId { feature: usize },

  #[error("feature {feature}: id {value} is not an integer")]
  InvalidId { feature: usize, value: String },

  #[error("feature {feature}: point geometry needs [longitude, latitude]")]
  InvalidCoordinates { feature: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
