//! `tribal`: command-line front end for the tribal lands store and mapper.
//!
//! # Usage
//!
//! ```text
//! tribal import bia_tribal_leaders.geojson
//! tribal add-facility "Example Hospital" "123 Main St" Portland OR 97201 --lat 45.5155 --lon -122.6789
//! tribal add-member "John Doe" "Umatilla" --notes "Member since 2023"
//! tribal lands 1
//! tribal map --custom "Standing Rock Sioux" --custom "Fort Sill Apache"
//! ```

mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tribal_core::{
  facility::NewFacility,
  mapping::TribeTerritoryMapping,
  member::NewMember,
  store::TribalStore,
  tribe::Position,
};
use tribal_mapper::TribalMapper;
use tribal_native_land::NativeLandClient;
use tribal_store_sqlite::SqliteStore;

use settings::{Settings, expand_tilde};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Associate facilities with tribal lands")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "tribal.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  #[command(flatten)]
  Store(StoreCommand),

  /// Render the target-region and custom tribes to an HTML map.
  Map(MapArgs),
}

#[derive(Subcommand)]
enum StoreCommand {
  /// Replace the stored tribes with a BIA GeoJSON export.
  Import {
    /// Dataset path; defaults to `source_path` from the config.
    path: Option<PathBuf>,
  },

  /// Ask the lookup service which lands cover a coordinate.
  #[command(allow_negative_numbers = true)]
  Lookup { lat: f64, lon: f64 },

  /// Store a facility and the lands covering it.
  #[command(allow_negative_numbers = true)]
  AddFacility {
    name:    String,
    address: String,
    city:    String,
    state:   String,
    zip:     String,
    #[arg(long)]
    lat:     f64,
    #[arg(long)]
    lon:     f64,
  },

  /// Store an organisation member, resolving the tribe by name fragment.
  AddMember {
    name:  String,
    tribe: String,
    #[arg(long)]
    notes: Option<String>,
  },

  /// Look up the lands covering a stored facility.
  Lands { facility_id: i64 },

  /// Record a curated tribe ↔ territory association.
  MapTribe {
    tribe_id:     i64,
    territory_id: String,
    #[arg(long, default_value_t = 1.0)]
    confidence:   f64,
    #[arg(long)]
    notes:        Option<String>,
  },

  /// List stored tribes.
  Tribes,
}

#[derive(Args)]
struct MapArgs {
  /// Dataset path; defaults to `source_path` from the config.
  path:    Option<PathBuf>,
  /// Target BIA region; repeat to add more. Replaces the configured list.
  #[arg(long = "region")]
  regions: Vec<String>,
  /// Tribe name fragment to add; repeatable.
  #[arg(long = "custom")]
  custom:  Vec<String>,
  #[arg(short, long, default_value = "pnw_and_custom_tribes_map.html")]
  out:     PathBuf,
  /// Also print every tribe and its region.
  #[arg(long)]
  list:    bool,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  match cli.command {
    Command::Store(command) => run_store(&settings, command).await,
    Command::Map(args) => run_map(&settings, args),
  }
}

// ─── Store commands ───────────────────────────────────────────────────────────

async fn run_store(settings: &Settings, command: StoreCommand) -> anyhow::Result<()> {
  let client = NativeLandClient::new(settings.native_land.clone())
    .context("failed to build lookup client")?;
  let db_path = expand_tilde(&settings.database_path);
  let store = SqliteStore::open(&db_path, client)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;

  let result = dispatch(&store, settings, command).await;
  store.close().await.context("failed to close store")?;
  result
}

async fn dispatch(
  store: &SqliteStore<NativeLandClient>,
  settings: &Settings,
  command: StoreCommand,
) -> anyhow::Result<()> {
  match command {
    StoreCommand::Import { path } => {
      let path = settings.source(path)?;
      let count = store
        .import_tribes_from_path(&path)
        .await
        .with_context(|| format!("failed to import {}", path.display()))?;
      println!("imported {count} tribes");
    }
    StoreCommand::Lookup { lat, lon } => {
      let report = store.query_lands(Position::new(lat, lon)).await?;
      print_json(&report)?;
    }
    StoreCommand::AddFacility { name, address, city, state, zip, lat, lon } => {
      let id = store
        .add_facility(NewFacility {
          name,
          address,
          city,
          state,
          zip,
          latitude: lat,
          longitude: lon,
        })
        .await?;
      println!("{id}");
    }
    StoreCommand::AddMember { name, tribe, notes } => {
      let id = store.add_member(NewMember { name, tribe_name: tribe, notes }).await?;
      println!("{id}");
    }
    StoreCommand::Lands { facility_id } => {
      let report = store.facility_lands(facility_id).await?;
      print_json(&report)?;
    }
    StoreCommand::MapTribe { tribe_id, territory_id, confidence, notes } => {
      store
        .map_tribe_to_territory(TribeTerritoryMapping { tribe_id, territory_id, confidence, notes })
        .await?;
    }
    StoreCommand::Tribes => {
      for t in store.list_tribes().await? {
        println!(
          "{}\t{}\t{}",
          t.tribe_id,
          t.full_name.unwrap_or_default(),
          t.bia_region.unwrap_or_default()
        );
      }
    }
  }
  Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

// ─── Map command ──────────────────────────────────────────────────────────────

fn run_map(settings: &Settings, args: MapArgs) -> anyhow::Result<()> {
  let MapArgs { path, regions, custom, out, list } = args;
  let path = settings.source(path)?;
  let mut mapper = TribalMapper::load(&path, settings.mapper.clone())
    .with_context(|| format!("failed to load {}", path.display()))?;

  if !regions.is_empty() {
    mapper.set_target_regions(regions);
  }
  for fragment in &custom {
    if !mapper.add_custom_tribe(fragment) {
      tracing::warn!(fragment = %fragment, "no tribe matches; skipped");
    }
  }

  let map = mapper.render()?;
  mapper.save_map(&map, &out)?;
  println!("wrote {} markers to {}", map.markers.len(), out.display());

  if list {
    for row in mapper.list_all_tribes() {
      println!("{}\t{}", row.name.unwrap_or_default(), row.region.unwrap_or_default());
    }
  }
  Ok(())
}
