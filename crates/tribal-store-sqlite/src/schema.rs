//! SQL schema for the tribal lands SQLite store.
//!
//! Executed on every open. Every statement is `IF NOT EXISTS`, so reopening
//! an existing file only creates what is missing.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Replaced wholesale on every import.
CREATE TABLE IF NOT EXISTS bia_tribes (
    tribe_id             INTEGER PRIMARY KEY,
    tribe_full_name      TEXT,
    tribe_name           TEXT,
    tribe_alternate_name TEXT,
    bia_region           TEXT,
    latitude             REAL NOT NULL,
    longitude            REAL NOT NULL,
    leader_name          TEXT NOT NULL,
    leader_title         TEXT,
    phone                TEXT,
    email                TEXT,
    website              TEXT
);

-- geometry holds the service's GeoJSON verbatim.
CREATE TABLE IF NOT EXISTS native_land_territories (
    territory_id TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    description  TEXT,
    geometry     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS native_land_languages (
    language_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    geometry    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS native_land_treaties (
    treaty_id   TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    geometry    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS facilities (
    facility_id INTEGER PRIMARY KEY,
    name        TEXT NOT NULL,
    address     TEXT NOT NULL,
    city        TEXT NOT NULL,
    state       TEXT NOT NULL,
    zip         TEXT NOT NULL,
    latitude    REAL NOT NULL,
    longitude   REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS erg_members (
    member_id INTEGER PRIMARY KEY,
    name      TEXT NOT NULL,
    tribe_id  INTEGER NOT NULL REFERENCES bia_tribes(tribe_id),
    notes     TEXT
);

CREATE TABLE IF NOT EXISTS tribe_territory_mapping (
    tribe_id     INTEGER NOT NULL REFERENCES bia_tribes(tribe_id),
    territory_id TEXT    NOT NULL REFERENCES native_land_territories(territory_id),
    confidence   REAL    NOT NULL,
    notes        TEXT,
    PRIMARY KEY (tribe_id, territory_id)
);

CREATE INDEX IF NOT EXISTS erg_members_tribe_idx ON erg_members(tribe_id);
CREATE INDEX IF NOT EXISTS bia_tribes_region_idx ON bia_tribes(bia_region);

PRAGMA user_version = 1;
";
