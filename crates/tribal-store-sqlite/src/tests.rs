//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::{
  Arc,
  atomic::{AtomicUsize, Ordering},
};

use serde_json::json;
use tribal_core::{
  facility::NewFacility,
  land::{LandArea, LandKind, LandLookup, LandReport},
  mapping::TribeTerritoryMapping,
  member::NewMember,
  source::{
    fixtures::{collection, feature},
    parse_tribes,
  },
  store::TribalStore,
  tribe::Position,
};

use crate::{Error, SqliteStore};

// ─── Fake lookup ─────────────────────────────────────────────────────────────

#[derive(Clone)]
enum Canned {
  Report(LandReport),
  Unavailable,
  Broken,
}

/// A lookup that returns a canned answer and counts calls.
#[derive(Clone)]
struct FakeLookup {
  answer: Canned,
  calls:  Arc<AtomicUsize>,
}

impl FakeLookup {
  fn new(answer: Canned) -> Self { Self { answer, calls: Arc::new(AtomicUsize::new(0)) } }

  fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl LandLookup for FakeLookup {
  type Error = std::io::Error;

  async fn lookup(&self, _position: Position) -> Result<Option<LandReport>, Self::Error> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    match &self.answer {
      Canned::Report(r) => Ok(Some(r.clone())),
      Canned::Unavailable => Ok(None),
      Canned::Broken => Err(std::io::Error::other("connection reset")),
    }
  }
}

fn area(kind: LandKind, id: &str, name: &str) -> LandArea {
  LandArea {
    kind,
    id: id.into(),
    name: name.into(),
    description: Some(format!("https://native-land.ca/maps/{}/{id}", kind.dataset())),
    geometry: json!({"type": "Polygon", "coordinates": [[[-118.0, 45.0], [-119.0, 46.0], [-118.0, 45.0]]]}),
  }
}

fn umatilla_report() -> LandReport {
  LandReport::from_areas(vec![
    area(LandKind::Territory, "umatilla", "Umatilla"),
    area(LandKind::Territory, "cayuse", "Cayuse"),
    area(LandKind::Language, "sahaptin", "Sahaptin"),
    area(LandKind::Treaty, "treaty-1855", "Treaty with the Walla Walla, Cayuse, and Umatilla, 1855"),
  ])
}

async fn store_with(answer: Canned) -> SqliteStore<FakeLookup> {
  SqliteStore::open_in_memory(FakeLookup::new(answer))
    .await
    .expect("in-memory store")
}

async fn store() -> SqliteStore<FakeLookup> { store_with(Canned::Report(umatilla_report())).await }

fn dataset() -> String {
  let mut standing_rock =
    feature(12, "Standing Rock Sioux Tribe of North & South Dakota", "Great Plains", -100.6, 45.9);
  standing_rock["properties"]["tribe"] = json!("Hunkpapa");
  collection(vec![
    feature(42, "Example Nation", "Northwest", -122.5, 45.0),
    feature(7, "Confederated Tribes of the Umatilla Indian Reservation", "Northwest", -118.7, 45.6),
    standing_rock,
  ])
}

async fn seeded() -> SqliteStore<FakeLookup> {
  let s = store().await;
  s.import_tribes(parse_tribes(&dataset()).unwrap()).await.unwrap();
  s
}

fn portland() -> NewFacility {
  NewFacility {
    name:      "Example Hospital".into(),
    address:   "123 Main St".into(),
    city:      "Portland".into(),
    state:     "OR".into(),
    zip:       "97201".into(),
    latitude:  45.5155,
    longitude: -122.6789,
  }
}

// ─── Initialisation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_keeps_data() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("native_lands.db");

  let s = SqliteStore::open(&path, FakeLookup::new(Canned::Unavailable)).await.unwrap();
  s.import_tribes(parse_tribes(&dataset()).unwrap()).await.unwrap();
  s.add_facility(portland()).await.unwrap();
  s.close().await.unwrap();

  let s = SqliteStore::open(&path, FakeLookup::new(Canned::Unavailable)).await.unwrap();
  assert_eq!(s.list_tribes().await.unwrap().len(), 3);
  assert_eq!(s.list_facilities().await.unwrap().len(), 1);
  s.close().await.unwrap();
}

// ─── Tribe import ────────────────────────────────────────────────────────────

#[tokio::test]
async fn import_stores_converted_fields() {
  let s = seeded().await;

  let t = s.get_tribe(42).await.unwrap().expect("tribe 42");
  assert_eq!(t.full_name.as_deref(), Some("Example Nation"));
  assert_eq!(t.latitude, 45.0);
  assert_eq!(t.longitude, -122.5);
  assert_eq!(t.leader_name, "A B");
  assert_eq!(t.bia_region.as_deref(), Some("Northwest"));
  assert_eq!(t.alternate_name, None);
}

#[tokio::test]
async fn import_twice_replaces_rather_than_accumulates() {
  let s = seeded().await;
  assert_eq!(s.list_tribes().await.unwrap().len(), 3);

  let second = collection(vec![
    feature(100, "Only Tribe", "Alaska", -150.0, 61.0),
    feature(101, "Other Tribe", "Alaska", -151.0, 62.0),
  ]);
  let n = s.import_tribes(parse_tribes(&second).unwrap()).await.unwrap();

  assert_eq!(n, 2);
  let tribes = s.list_tribes().await.unwrap();
  assert_eq!(tribes.len(), 2);
  assert!(s.get_tribe(42).await.unwrap().is_none());
}

#[tokio::test]
async fn list_tribes_is_ordered_by_full_name() {
  let s = seeded().await;
  let names: Vec<_> = s
    .list_tribes()
    .await
    .unwrap()
    .into_iter()
    .filter_map(|t| t.full_name)
    .collect();
  let mut sorted = names.clone();
  sorted.sort();
  assert_eq!(names, sorted);
}

#[tokio::test]
async fn malformed_source_file_leaves_table_untouched() {
  let s = seeded().await;

  let mut bad = feature(5, "Broken", "Northwest", -120.0, 45.0);
  bad["properties"].as_object_mut().unwrap().remove("biaregion");
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("broken.geojson");
  std::fs::write(&path, collection(vec![bad])).unwrap();

  let err = s.import_tribes_from_path(&path).await.unwrap_err();
  assert!(matches!(err, Error::Source(_)), "got {err:?}");
  assert_eq!(s.list_tribes().await.unwrap().len(), 3);
}

#[tokio::test]
async fn import_from_path_reads_geojson() {
  let s = store().await;
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("tribes.geojson");
  std::fs::write(&path, dataset()).unwrap();

  assert_eq!(s.import_tribes_from_path(&path).await.unwrap(), 3);
}

#[tokio::test]
async fn duplicate_ids_abort_the_whole_import() {
  let s = seeded().await;
  let dupes = collection(vec![
    feature(1, "One", "Alaska", -150.0, 61.0),
    feature(1, "Also One", "Alaska", -150.0, 61.0),
  ]);

  assert!(s.import_tribes(parse_tribes(&dupes).unwrap()).await.is_err());
  assert_eq!(s.list_tribes().await.unwrap().len(), 3);
  assert!(s.get_tribe(42).await.unwrap().is_some());
}

#[tokio::test]
async fn reimport_keeps_members_whose_tribe_survives() {
  let s = seeded().await;
  let member_id = s
    .add_member(NewMember { name: "John Doe".into(), tribe_name: "Umatilla".into(), notes: None })
    .await
    .unwrap();

  s.import_tribes(parse_tribes(&dataset()).unwrap()).await.unwrap();

  let m = s.get_member(member_id).await.unwrap().unwrap();
  assert_eq!(m.tribe_id, 7);
}

#[tokio::test]
async fn reimport_dropping_a_referenced_tribe_rolls_back() {
  let s = seeded().await;
  s.add_member(NewMember { name: "John Doe".into(), tribe_name: "Umatilla".into(), notes: None })
    .await
    .unwrap();

  let without_umatilla = collection(vec![feature(42, "Example Nation", "Northwest", -122.5, 45.0)]);
  let result = s.import_tribes(parse_tribes(&without_umatilla).unwrap()).await;

  assert!(matches!(result, Err(Error::Database(_))), "got {result:?}");
  assert_eq!(s.list_tribes().await.unwrap().len(), 3);
}

// ─── Members ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_member_matches_full_name_case_insensitively() {
  let s = seeded().await;
  let id = s
    .add_member(NewMember {
      name:       "John Doe".into(),
      tribe_name: "confederated tribes of the UMATILLA".into(),
      notes:      Some("Member since 2023".into()),
    })
    .await
    .unwrap();

  let m = s.get_member(id).await.unwrap().unwrap();
  assert_eq!(m.tribe_id, 7);
  assert_eq!(m.name, "John Doe");
  assert_eq!(m.notes.as_deref(), Some("Member since 2023"));
}

#[tokio::test]
async fn add_member_matches_short_name() {
  let s = seeded().await;
  let id = s
    .add_member(NewMember { name: "Jane".into(), tribe_name: "HUNKPAPA".into(), notes: None })
    .await
    .unwrap();
  assert_eq!(s.get_member(id).await.unwrap().unwrap().tribe_id, 12);
}

#[tokio::test]
async fn add_member_ties_resolve_to_lowest_tribe_id() {
  let s = seeded().await;
  // "n" appears in all three full names: ids 7, 12, 42.
  let id = s
    .add_member(NewMember { name: "Ambiguous".into(), tribe_name: "n".into(), notes: None })
    .await
    .unwrap();
  assert_eq!(s.get_member(id).await.unwrap().unwrap().tribe_id, 7);
}

#[tokio::test]
async fn add_member_unknown_tribe_inserts_nothing() {
  let s = seeded().await;
  let err = s
    .add_member(NewMember { name: "Nobody".into(), tribe_name: "Atlantis".into(), notes: None })
    .await
    .unwrap_err();

  assert!(matches!(err, Error::TribeNotFound(ref f) if f == "Atlantis"), "got {err:?}");
  assert!(s.list_members().await.unwrap().is_empty());
}

#[tokio::test]
async fn like_wildcards_are_matched_literally() {
  let s = seeded().await;
  let err = s
    .add_member(NewMember { name: "Wild".into(), tribe_name: "%".into(), notes: None })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::TribeNotFound(_)));
}

// ─── Facilities and lands ────────────────────────────────────────────────────

#[tokio::test]
async fn add_facility_assigns_ids_and_stores_lands() {
  let s = seeded().await;

  let first = s.add_facility(portland()).await.unwrap();
  let second = s.add_facility(portland()).await.unwrap();
  assert_ne!(first, second);
  assert_eq!(s.lookup().calls(), 2);

  let f = s.get_facility(first).await.unwrap().unwrap();
  assert_eq!(f.city, "Portland");
  assert_eq!(f.zip, "97201");

  let territories = s.list_land_areas(LandKind::Territory).await.unwrap();
  assert_eq!(territories.len(), 2);
  assert_eq!(territories[0].name, "Cayuse");
  let sahaptin = s
    .get_land_area(LandKind::Language, "sahaptin".into())
    .await
    .unwrap()
    .expect("language stored");
  assert_eq!(sahaptin.geometry["type"], "Polygon");
  assert_eq!(s.list_land_areas(LandKind::Treaty).await.unwrap().len(), 1);
}

#[tokio::test]
async fn add_facility_survives_unavailable_lookup() {
  let s = store_with(Canned::Unavailable).await;
  let id = s.add_facility(portland()).await.unwrap();

  assert!(s.get_facility(id).await.unwrap().is_some());
  assert!(s.list_land_areas(LandKind::Territory).await.unwrap().is_empty());
}

#[tokio::test]
async fn add_facility_survives_broken_lookup() {
  let s = store_with(Canned::Broken).await;
  let id = s.add_facility(portland()).await.unwrap();
  assert!(s.get_facility(id).await.unwrap().is_some());
  assert_eq!(s.lookup().calls(), 1);
}

#[tokio::test]
async fn add_facility_keeps_row_when_lands_cannot_be_stored() {
  let s = store().await;
  s.conn
    .call(|conn| Ok(conn.execute_batch("DROP TABLE languages")?))
    .await
    .unwrap();

  let id = s.add_facility(portland()).await.unwrap();

  assert_eq!(s.get_facility(id).await.unwrap().unwrap().city, "Portland");
  assert_eq!(s.lookup().calls(), 1);
  // The land upsert is one transaction, so no territory survives either.
  assert!(s.list_land_areas(LandKind::Territory).await.unwrap().is_empty());
}

#[tokio::test]
async fn facility_lands_unknown_id_makes_no_lookup() {
  let s = store().await;
  let err = s.facility_lands(999).await.unwrap_err();

  assert!(matches!(err, Error::FacilityNotFound(999)), "got {err:?}");
  assert_eq!(s.lookup().calls(), 0);
}

#[tokio::test]
async fn facility_lands_delegates_to_lookup() {
  let s = store().await;
  let id = s.add_facility(portland()).await.unwrap();

  let report = s.facility_lands(id).await.unwrap().expect("report");
  assert_eq!(report, umatilla_report());
  assert_eq!(s.lookup().calls(), 2);
}

#[tokio::test]
async fn facility_lands_unavailable_is_none() {
  let s = store_with(Canned::Unavailable).await;
  let id = s.add_facility(portland()).await.unwrap();
  assert!(s.facility_lands(id).await.unwrap().is_none());
}

#[tokio::test]
async fn facility_lands_surfaces_transport_errors() {
  let s = store_with(Canned::Broken).await;
  let id = s.add_facility(portland()).await.unwrap();
  assert!(matches!(s.facility_lands(id).await, Err(Error::Lookup(_))));
}

#[tokio::test]
async fn upsert_refreshes_existing_areas() {
  let s = store().await;
  s.upsert_land_areas(umatilla_report()).await.unwrap();

  let mut renamed = area(LandKind::Territory, "umatilla", "Imatalamłáma");
  renamed.description = None;
  s.upsert_land_areas(LandReport::from_areas(vec![renamed])).await.unwrap();

  let t = s
    .get_land_area(LandKind::Territory, "umatilla".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(t.name, "Imatalamłáma");
  assert_eq!(t.description, None);
  assert_eq!(s.list_land_areas(LandKind::Territory).await.unwrap().len(), 2);
}

// ─── Mappings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn map_tribe_to_territory_round_trip() {
  let s = seeded().await;
  s.upsert_land_areas(umatilla_report()).await.unwrap();

  s.map_tribe_to_territory(TribeTerritoryMapping {
    tribe_id:     7,
    territory_id: "cayuse".into(),
    confidence:   0.6,
    notes:        None,
  })
  .await
  .unwrap();
  s.map_tribe_to_territory(TribeTerritoryMapping {
    tribe_id:     7,
    territory_id: "umatilla".into(),
    confidence:   0.9,
    notes:        Some("reservation overlaps".into()),
  })
  .await
  .unwrap();

  let mappings = s.mappings_for_tribe(7).await.unwrap();
  assert_eq!(mappings.len(), 2);
  assert_eq!(mappings[0].territory_id, "umatilla");
  assert_eq!(mappings[1].confidence, 0.6);
}

#[tokio::test]
async fn mapping_requires_both_sides() {
  let s = seeded().await;
  s.upsert_land_areas(umatilla_report()).await.unwrap();

  let missing_tribe = s
    .map_tribe_to_territory(TribeTerritoryMapping {
      tribe_id:     9999,
      territory_id: "umatilla".into(),
      confidence:   1.0,
      notes:        None,
    })
    .await;
  assert!(matches!(missing_tribe, Err(Error::TribeIdNotFound(9999))));

  let missing_territory = s
    .map_tribe_to_territory(TribeTerritoryMapping {
      tribe_id:     7,
      territory_id: "nowhere".into(),
      confidence:   1.0,
      notes:        None,
    })
    .await;
  assert!(matches!(missing_territory, Err(Error::TerritoryNotFound(ref t)) if t == "nowhere"));
  assert!(s.mappings_for_tribe(7).await.unwrap().is_empty());
}
