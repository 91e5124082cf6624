//! Native-Land.ca client for the tribal lands toolkit.
//!
//! Implements [`LandLookup`] with one `GET` per call against the
//! `index.php?maps=territories,languages,treaties&position=<lat>,<lon>`
//! endpoint. No retries; a non-success status is reported as `Ok(None)`.

pub mod error;
mod response;

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use tribal_core::{
  land::{LandKind, LandLookup, LandReport},
  tribe::Position,
};

pub use error::{Error, Result};
pub use response::parse_response;

/// The public endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://native-land.ca/api/index.php";

/// Connection settings for the lookup service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NativeLandConfig {
  pub base_url:     String,
  /// Sent as the `key` query parameter when set.
  pub api_key:      Option<String>,
  /// Whole-request timeout; `None` waits indefinitely.
  pub timeout_secs: Option<u64>,
}

impl Default for NativeLandConfig {
  fn default() -> Self {
    Self {
      base_url:     DEFAULT_BASE_URL.to_string(),
      api_key:      None,
      timeout_secs: Some(30),
    }
  }
}

/// Async HTTP client for the Native-Land.ca lookup API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct NativeLandClient {
  client: Client,
  config: NativeLandConfig,
}

impl NativeLandClient {
  pub fn new(config: NativeLandConfig) -> Result<Self> {
    let mut builder = Client::builder();
    if let Some(secs) = config.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(Self { client: builder.build()?, config })
  }

  /// Query parameters for a lookup at `position`.
  fn params(&self, position: Position) -> Vec<(&'static str, String)> {
    let maps = LandKind::ALL.map(LandKind::dataset).join(",");
    let mut params = vec![
      ("maps", maps),
      ("position", format!("{},{}", position.latitude, position.longitude)),
    ];
    if let Some(key) = &self.config.api_key {
      params.push(("key", key.clone()));
    }
    params
  }

  /// Build the `GET` request for `position` without sending it.
  pub fn request(&self, position: Position) -> Result<reqwest::Request> {
    Ok(
      self
        .client
        .get(&self.config.base_url)
        .query(&self.params(position))
        .build()?,
    )
  }
}

impl LandLookup for NativeLandClient {
  type Error = Error;

  async fn lookup(&self, position: Position) -> Result<Option<LandReport>> {
    let request = self.request(position)?;
    debug!(url = %request.url(), "GET native-land");

    let resp = self.client.execute(request).await?;
    if !resp.status().is_success() {
      debug!(status = %resp.status(), "native-land lookup unavailable");
      return Ok(None);
    }

    let body = resp.text().await?;
    Ok(Some(parse_response(&body)?))
  }
}
