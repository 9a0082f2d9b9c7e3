//! Reading entity definitions and encounter lists from disk.
//!
//! Weapons live in `*.weapon` files and units in `*.unit` files, each a JSON
//! document named after the entity. Only files whose stem starts with the
//! configured prefix are read.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use broadside_core::catalog::raw::{RawUnit, RawWeapon};
use broadside_core::{Catalog, CatalogOptions, EncounterSpec, FleetSpec};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Entity stems that pass the prefix filter for one extension, in name order.
fn entity_files(dir: &Path, extension: &str, prefix: &str) -> Result<BTreeMap<String, PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading entities directory {}", dir.display()))?;

    let mut files = BTreeMap::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("listing {}", dir.display()))?
            .path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if stem.starts_with(prefix) {
            files.insert(stem.to_string(), path);
        }
    }
    Ok(files)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn read_all<T: DeserializeOwned>(files: BTreeMap<String, PathBuf>) -> Result<Vec<(String, T)>> {
    files
        .into_iter()
        .map(|(name, path)| {
            debug!(entity = %name, path = %path.display(), "loading");
            read_json(&path).map(|raw| (name, raw))
        })
        .collect()
}

/// Loads and resolves every matching weapon and unit in `dir`.
pub fn load_catalog(dir: &Path, prefix: &str, options: &CatalogOptions) -> Result<Catalog> {
    let weapons: Vec<(String, RawWeapon)> = read_all(entity_files(dir, "weapon", prefix)?)?;
    let units: Vec<(String, RawUnit)> = read_all(entity_files(dir, "unit", prefix)?)?;
    if weapons.is_empty() && units.is_empty() {
        bail!(
            "no '{prefix}*' weapon or unit files found in {}",
            dir.display()
        );
    }

    let (weapon_files, unit_files) = (weapons.len(), units.len());
    let catalog = Catalog::build(weapons, units, options)
        .with_context(|| format!("resolving entities in {}", dir.display()))?;
    info!(
        weapon_files,
        unit_files,
        ships = catalog.ship_count(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Reads a JSON list of encounters.
pub fn load_encounters(path: &Path) -> Result<Vec<EncounterSpec>> {
    let encounters: Vec<EncounterSpec> = read_json(path)?;
    if encounters.is_empty() {
        bail!("{} lists no encounters", path.display());
    }
    Ok(encounters)
}

/// Light frigates against long-range cruisers, the stock early-game matchup.
pub fn default_encounters() -> Vec<EncounterSpec> {
    vec![EncounterSpec::new(
        "LF vs LRC",
        FleetSpec::new("LF", BTreeMap::new()).with_ships("trader_light_frigate", 6),
        FleetSpec::new("LRC", BTreeMap::new()).with_ships("trader_long_range_cruiser", 5),
    )]
}
