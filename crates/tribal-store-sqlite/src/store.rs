//! [`SqliteStore`], the SQLite implementation of [`TribalStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tracing::{debug, info, warn};

use tribal_core::{
  facility::{Facility, NewFacility},
  land::{LandArea, LandKind, LandLookup, LandReport},
  mapping::TribeTerritoryMapping,
  member::{Member, NewMember},
  source,
  store::TribalStore,
  tribe::{Position, Tribe},
};

use crate::{
  Error, Result,
  encode::{
    FACILITY_COLUMNS, RawLandArea, TRIBE_COLUMNS, encode_geometry, facility_from_row,
    land_table, mapping_from_row, member_from_row, tribe_from_row,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tribal lands store backed by a single SQLite file.
///
/// `L` answers land lookups for coordinates. The store owns its connection;
/// [`SqliteStore::close`] consumes it.
pub struct SqliteStore<L> {
  pub(crate) conn: tokio_rusqlite::Connection,
  lookup:          L,
}

/// Outcome of a mapping write, decided inside the connection thread.
enum MappingWrite {
  Written,
  MissingTribe,
  MissingTerritory,
}

impl<L: LandLookup> SqliteStore<L> {
  /// Open (or create) a store at `path` and ensure the schema exists.
  pub async fn open(path: impl AsRef<Path>, lookup: L) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, lookup };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory(lookup: L) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, lookup };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Parse the GeoJSON dataset at `path` and replace the tribe table with it.
  ///
  /// A malformed dataset fails before the table is touched.
  pub async fn import_tribes_from_path(&self, path: impl AsRef<Path>) -> Result<usize> {
    let tribes = source::read_tribes(path)?;
    self.import_tribes(tribes).await
  }

  /// The lookup this store delegates to.
  pub fn lookup(&self) -> &L { &self.lookup }

  /// Release the connection. The store cannot be used afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}

// ─── TribalStore impl ────────────────────────────────────────────────────────

impl<L: LandLookup> TribalStore for SqliteStore<L> {
  type Error = Error;

  // ── Tribes ──────────────────────────────────────────────────────────────

  async fn import_tribes(&self, tribes: Vec<Tribe>) -> Result<usize> {
    let count = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Members may point at tribes that the new set re-inserts; check
        // references at commit rather than at the delete.
        tx.execute_batch("PRAGMA defer_foreign_keys = ON; DELETE FROM bia_tribes;")?;
        {
          let mut stmt = tx.prepare(&format!(
            "INSERT INTO bia_tribes ({TRIBE_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
          ))?;
          for t in &tribes {
            stmt.execute(rusqlite::params![
              t.tribe_id,
              t.full_name,
              t.name,
              t.alternate_name,
              t.bia_region,
              t.latitude,
              t.longitude,
              t.leader_name,
              t.leader_title,
              t.phone,
              t.email,
              t.website,
            ])?;
          }
        }
        tx.commit()?;
        Ok(tribes.len())
      })
      .await?;

    info!(count, "imported tribes");
    Ok(count)
  }

  async fn get_tribe(&self, tribe_id: i64) -> Result<Option<Tribe>> {
    let tribe = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {TRIBE_COLUMNS} FROM bia_tribes WHERE tribe_id = ?1"),
            rusqlite::params![tribe_id],
            tribe_from_row,
          )
          .optional()?)
      })
      .await?;
    Ok(tribe)
  }

  async fn list_tribes(&self) -> Result<Vec<Tribe>> {
    let tribes = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TRIBE_COLUMNS} FROM bia_tribes ORDER BY tribe_full_name, tribe_id"
        ))?;
        let rows = stmt
          .query_map([], tribe_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(tribes)
  }

  // ── Lands ───────────────────────────────────────────────────────────────

  async fn query_lands(&self, position: Position) -> Result<Option<LandReport>> {
    debug!(lat = position.latitude, lon = position.longitude, "querying land lookup");
    self
      .lookup
      .lookup(position)
      .await
      .map_err(|e| Error::Lookup(Box::new(e)))
  }

  async fn upsert_land_areas(&self, report: LandReport) -> Result<usize> {
    let rows = report
      .iter()
      .map(|a| {
        Ok((a.kind, a.id.clone(), a.name.clone(), a.description.clone(), encode_geometry(&a.geometry)?))
      })
      .collect::<Result<Vec<_>>>()?;

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for (kind, id, name, description, geometry) in &rows {
          let (table, id_col) = land_table(*kind);
          tx.execute(
            &format!(
              "INSERT INTO {table} ({id_col}, name, description, geometry)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT({id_col}) DO UPDATE SET
                 name        = excluded.name,
                 description = excluded.description,
                 geometry    = excluded.geometry"
            ),
            rusqlite::params![id, name, description, geometry],
          )?;
        }
        tx.commit()?;
        Ok(rows.len())
      })
      .await?;
    Ok(written)
  }

  async fn get_land_area(&self, kind: LandKind, id: String) -> Result<Option<LandArea>> {
    let (table, id_col) = land_table(kind);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {id_col}, name, description, geometry FROM {table} WHERE {id_col} = ?1"),
            rusqlite::params![id],
            RawLandArea::from_row,
          )
          .optional()?)
      })
      .await?;
    raw.map(|r| r.into_area(kind)).transpose()
  }

  async fn list_land_areas(&self, kind: LandKind) -> Result<Vec<LandArea>> {
    let (table, id_col) = land_table(kind);
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {id_col}, name, description, geometry FROM {table} ORDER BY name"
        ))?;
        let rows = stmt
          .query_map([], RawLandArea::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(|r| r.into_area(kind)).collect()
  }

  // ── Facilities ──────────────────────────────────────────────────────────

  async fn add_facility(&self, facility: NewFacility) -> Result<i64> {
    let position = Position::new(facility.latitude, facility.longitude);

    let facility_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO facilities (name, address, city, state, zip, latitude, longitude)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            facility.name,
            facility.address,
            facility.city,
            facility.state,
            facility.zip,
            facility.latitude,
            facility.longitude,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    // The facility row is committed; nothing after this point fails the insert.
    match self.query_lands(position).await {
      Ok(Some(report)) => match self.upsert_land_areas(report).await {
        Ok(written) => debug!(facility_id, written, "stored lands for facility"),
        Err(e) => warn!(facility_id, error = %e, "failed to store lands for facility"),
      },
      Ok(None) => debug!(facility_id, "land lookup unavailable"),
      Err(e) => warn!(facility_id, error = %e, "land lookup failed"),
    }

    Ok(facility_id)
  }

  async fn get_facility(&self, facility_id: i64) -> Result<Option<Facility>> {
    let facility = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {FACILITY_COLUMNS} FROM facilities WHERE facility_id = ?1"),
            rusqlite::params![facility_id],
            facility_from_row,
          )
          .optional()?)
      })
      .await?;
    Ok(facility)
  }

  async fn list_facilities(&self) -> Result<Vec<Facility>> {
    let facilities = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FACILITY_COLUMNS} FROM facilities ORDER BY facility_id"
        ))?;
        let rows = stmt
          .query_map([], facility_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(facilities)
  }

  async fn facility_lands(&self, facility_id: i64) -> Result<Option<LandReport>> {
    let facility = self
      .get_facility(facility_id)
      .await?
      .ok_or(Error::FacilityNotFound(facility_id))?;
    self.query_lands(facility.position()).await
  }

  // ── Members ─────────────────────────────────────────────────────────────

  async fn add_member(&self, member: NewMember) -> Result<i64> {
    let fragment = member.tribe_name.clone();

    let member_id = self
      .conn
      .call(move |conn| {
        let tribe_id: Option<i64> = conn
          .query_row(
            "SELECT tribe_id FROM bia_tribes
             WHERE instr(lower(tribe_full_name), lower(?1)) > 0
                OR instr(lower(tribe_name), lower(?1)) > 0
             ORDER BY tribe_id
             LIMIT 1",
            rusqlite::params![member.tribe_name],
            |r| r.get(0),
          )
          .optional()?;

        let Some(tribe_id) = tribe_id else {
          return Ok(None);
        };

        conn.execute(
          "INSERT INTO erg_members (name, tribe_id, notes) VALUES (?1, ?2, ?3)",
          rusqlite::params![member.name, tribe_id, member.notes],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    member_id.ok_or(Error::TribeNotFound(fragment))
  }

  async fn get_member(&self, member_id: i64) -> Result<Option<Member>> {
    let member = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT member_id, name, tribe_id, notes FROM erg_members WHERE member_id = ?1",
            rusqlite::params![member_id],
            member_from_row,
          )
          .optional()?)
      })
      .await?;
    Ok(member)
  }

  async fn list_members(&self) -> Result<Vec<Member>> {
    let members = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT member_id, name, tribe_id, notes FROM erg_members ORDER BY member_id")?;
        let rows = stmt
          .query_map([], member_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(members)
  }

  // ── Mappings ────────────────────────────────────────────────────────────

  async fn map_tribe_to_territory(&self, mapping: TribeTerritoryMapping) -> Result<()> {
    let tribe_id = mapping.tribe_id;
    let territory_id = mapping.territory_id.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let tribe_exists = conn
          .query_row(
            "SELECT 1 FROM bia_tribes WHERE tribe_id = ?1",
            rusqlite::params![mapping.tribe_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !tribe_exists {
          return Ok(MappingWrite::MissingTribe);
        }

        let territory_exists = conn
          .query_row(
            "SELECT 1 FROM native_land_territories WHERE territory_id = ?1",
            rusqlite::params![mapping.territory_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !territory_exists {
          return Ok(MappingWrite::MissingTerritory);
        }

        conn.execute(
          "INSERT INTO tribe_territory_mapping (tribe_id, territory_id, confidence, notes)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(tribe_id, territory_id) DO UPDATE SET
             confidence = excluded.confidence,
             notes      = excluded.notes",
          rusqlite::params![
            mapping.tribe_id,
            mapping.territory_id,
            mapping.confidence,
            mapping.notes,
          ],
        )?;
        Ok(MappingWrite::Written)
      })
      .await?;

    match outcome {
      MappingWrite::Written => Ok(()),
      MappingWrite::MissingTribe => Err(Error::TribeIdNotFound(tribe_id)),
      MappingWrite::MissingTerritory => Err(Error::TerritoryNotFound(territory_id)),
    }
  }

  async fn mappings_for_tribe(&self, tribe_id: i64) -> Result<Vec<TribeTerritoryMapping>> {
    let mappings = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT tribe_id, territory_id, confidence, notes
           FROM tribe_territory_mapping
           WHERE tribe_id = ?1
           ORDER BY confidence DESC, territory_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![tribe_id], mapping_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(mappings)
  }
}
