//! The `TribalStore` trait.
//!
//! Implemented by storage backends (e.g. `tribal-store-sqlite`). The CLI
//! depends on this abstraction rather than on a concrete backend.

use std::future::Future;

use crate::{
  facility::{Facility, NewFacility},
  land::{LandArea, LandKind, LandReport},
  mapping::TribeTerritoryMapping,
  member::{Member, NewMember},
  tribe::{Position, Tribe},
};

/// Abstraction over a tribal lands store backend.
///
/// All methods return `Send` futures so the trait can be driven from a
/// multi-threaded tokio runtime.
pub trait TribalStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Tribes ────────────────────────────────────────────────────────────

  /// Replace the whole tribe table with `tribes`. All-or-nothing; returns
  /// the number of rows now stored.
  fn import_tribes(
    &self,
    tribes: Vec<Tribe>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  fn get_tribe(
    &self,
    tribe_id: i64,
  ) -> impl Future<Output = Result<Option<Tribe>, Self::Error>> + Send + '_;

  /// All tribes ordered by full name.
  fn list_tribes(&self) -> impl Future<Output = Result<Vec<Tribe>, Self::Error>> + Send + '_;

  // ── Lands ─────────────────────────────────────────────────────────────

  /// Ask the lookup service which lands cover `position`.
  ///
  /// `None` when the service answered with a non-success status.
  fn query_lands(
    &self,
    position: Position,
  ) -> impl Future<Output = Result<Option<LandReport>, Self::Error>> + Send + '_;

  /// Insert or refresh every area in `report`. Returns the number written.
  fn upsert_land_areas(
    &self,
    report: LandReport,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  fn get_land_area(
    &self,
    kind: LandKind,
    id: String,
  ) -> impl Future<Output = Result<Option<LandArea>, Self::Error>> + Send + '_;

  fn list_land_areas(
    &self,
    kind: LandKind,
  ) -> impl Future<Output = Result<Vec<LandArea>, Self::Error>> + Send + '_;

  // ── Facilities ────────────────────────────────────────────────────────

  /// Persist a facility and return its id. The lands covering it are
  /// looked up and stored as a side effect.
  fn add_facility(
    &self,
    facility: NewFacility,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn get_facility(
    &self,
    facility_id: i64,
  ) -> impl Future<Output = Result<Option<Facility>, Self::Error>> + Send + '_;

  fn list_facilities(&self) -> impl Future<Output = Result<Vec<Facility>, Self::Error>> + Send + '_;

  /// Look up the lands covering a stored facility.
  ///
  /// Fails without contacting the lookup service if the facility is unknown.
  fn facility_lands(
    &self,
    facility_id: i64,
  ) -> impl Future<Output = Result<Option<LandReport>, Self::Error>> + Send + '_;

  // ── Members ───────────────────────────────────────────────────────────

  /// Resolve the member's tribe by name fragment, insert, and return the id.
  /// When several tribes match, the lowest tribe id wins.
  fn add_member(
    &self,
    member: NewMember,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn get_member(
    &self,
    member_id: i64,
  ) -> impl Future<Output = Result<Option<Member>, Self::Error>> + Send + '_;

  fn list_members(&self) -> impl Future<Output = Result<Vec<Member>, Self::Error>> + Send + '_;

  // ── Tribe ↔ territory mappings ────────────────────────────────────────

  /// Record a curated association. Both sides must already exist.
  fn map_tribe_to_territory(
    &self,
    mapping: TribeTerritoryMapping,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn mappings_for_tribe(
    &self,
    tribe_id: i64,
  ) -> impl Future<Output = Result<Vec<TribeTerritoryMapping>, Self::Error>> + Send + '_;
}
