//! Layered configuration: optional TOML file, then `TRIBAL_*` environment.
//!
//! Nested keys use `__`, e.g. `TRIBAL_NATIVE_LAND__API_KEY` or
//! `TRIBAL_MAPPER__TARGET_REGIONS=Northwest,Alaska`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use tribal_mapper::MapperConfig;
use tribal_native_land::NativeLandConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub database_path: PathBuf,
  /// BIA GeoJSON used when a command is not given a path.
  pub source_path:   Option<PathBuf>,
  pub native_land:   NativeLandConfig,
  pub mapper:        MapperConfig,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      database_path: PathBuf::from("native_lands.db"),
      source_path:   None,
      native_land:   NativeLandConfig::default(),
      mapper:        MapperConfig::default(),
    }
  }
}

impl Settings {
  /// Load from `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::load_with(path, environment())
  }

  fn load_with(path: &Path, env: config::Environment) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(env)
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  /// The source dataset: `explicit` if given, else the configured one.
  pub fn source(&self, explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    explicit
      .or_else(|| self.source_path.clone())
      .map(|p| expand_tilde(&p))
      .context("no source dataset given and `source_path` is not configured")
  }
}

/// `TRIBAL_` prefix, `__` between nested keys.
fn environment() -> config::Environment {
  config::Environment::with_prefix("TRIBAL")
    .prefix_separator("_")
    .separator("__")
    .try_parsing(true)
    .list_separator(",")
    .with_list_parse_key("mapper.target_regions")
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
