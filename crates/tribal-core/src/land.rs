//! Territories, languages and treaties served by the land lookup service,
//! and the [`LandLookup`] trait that fetches them.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::tribe::Position;

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// The three structurally identical polygon datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandKind {
  Territory,
  Language,
  Treaty,
}

impl LandKind {
  pub const ALL: [LandKind; 3] = [LandKind::Territory, LandKind::Language, LandKind::Treaty];

  /// The plural dataset name used by the lookup service (`territories`, …).
  pub fn dataset(self) -> &'static str {
    match self {
      LandKind::Territory => "territories",
      LandKind::Language => "languages",
      LandKind::Treaty => "treaties",
    }
  }

  pub fn from_dataset(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|k| k.dataset() == s)
  }
}

// ─── Areas ───────────────────────────────────────────────────────────────────

/// One polygon returned by the lookup service.
///
/// `geometry` is persisted verbatim and never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandArea {
  pub kind:        LandKind,
  pub id:          String,
  pub name:        String,
  pub description: Option<String>,
  pub geometry:    serde_json::Value,
}

/// Everything the lookup service reported for one position, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandReport {
  pub territories: Vec<LandArea>,
  pub languages:   Vec<LandArea>,
  pub treaties:    Vec<LandArea>,
}

impl LandReport {
  /// Sort `areas` into their per-kind lists, keeping input order.
  pub fn from_areas(areas: impl IntoIterator<Item = LandArea>) -> Self {
    let mut report = Self::default();
    for area in areas {
      match area.kind {
        LandKind::Territory => report.territories.push(area),
        LandKind::Language => report.languages.push(area),
        LandKind::Treaty => report.treaties.push(area),
      }
    }
    report
  }

  pub fn of_kind(&self, kind: LandKind) -> &[LandArea] {
    match kind {
      LandKind::Territory => &self.territories,
      LandKind::Language => &self.languages,
      LandKind::Treaty => &self.treaties,
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = &LandArea> {
    self.territories.iter().chain(&self.languages).chain(&self.treaties)
  }

  pub fn is_empty(&self) -> bool {
    self.territories.is_empty() && self.languages.is_empty() && self.treaties.is_empty()
  }

  pub fn len(&self) -> usize {
    self.territories.len() + self.languages.len() + self.treaties.len()
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A service that reports the lands covering a coordinate.
///
/// Implementations make a single attempt per call. `Ok(None)` means the
/// service answered with a non-success status; `Err` is reserved for
/// transport and decoding failures.
pub trait LandLookup: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn lookup(
    &self,
    position: Position,
  ) -> impl Future<Output = Result<Option<LandReport>, Self::Error>> + Send + '_;
}
