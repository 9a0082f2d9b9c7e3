//! Immutable ship, weapon and projectile definitions.
//!
//! A [`Catalog`] is built once from raw entity definitions (see [`raw`]) and
//! then shared read-only by every engagement. Ships hold their weapons by
//! [`Arc`], so combatants spawned from the same type never copy stat blocks.
//!
//! # Example
//!
//! ```
//! use broadside_core::catalog::{Catalog, CatalogOptions};
//! use broadside_core::catalog::raw::{RawPhysics, RawUnit, RawWeapon, RawWeaponMount, RawWeaponsBlock};
//!
//! let weapons = vec![("cannon".to_string(), RawWeapon::default().with_damage(10.0).with_range(500.0))];
//! let unit = RawUnit {
//!     physics: Some(RawPhysics::default()),
//!     weapons: Some(RawWeaponsBlock {
//!         weapons: vec![RawWeaponMount { weapon: "cannon".to_string() }],
//!     }),
//!     ..RawUnit::default()
//! };
//! let catalog = Catalog::build(weapons, vec![("gunboat".to_string(), unit)], &CatalogOptions::default())?;
//!
//! assert_eq!(catalog.ship("gunboat").map(|s| s.weapons.len()), Some(1));
//! # Ok::<(), broadside_core::CatalogError>(())
//! ```

pub mod raw;
mod tags;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};

use raw::{RawAttackTarget, RawProjectile, RawUnit, RawWeapon};

pub use tags::{AcquisitionLogic, TargetTypes, WeaponKind};

// =============================================================================
// Shared Metadata
// =============================================================================

/// How enemies see a combatant when scoring targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackTarget {
    /// Base priority assigned by any attacker.
    pub base_priority: f64,
    /// Tags matched against the attacker's [`AiProfile`] bonuses.
    pub tags: Vec<String>,
}

impl From<RawAttackTarget> for AttackTarget {
    fn from(raw: RawAttackTarget) -> Self {
        Self {
            base_priority: raw.attack_priority,
            tags: raw.attack_target_types,
        }
    }
}

/// Targeting preferences of a ship type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiProfile {
    /// Extra priority per attack-target tag.
    pub priority_bonus: BTreeMap<String, f64>,
}

impl AiProfile {
    /// Sums the bonuses for every tag the target carries. Missing tags add 0.
    #[must_use]
    pub fn bonus_for(&self, target: &AttackTarget) -> f64 {
        target
            .tags
            .iter()
            .filter_map(|tag| self.priority_bonus.get(tag))
            .sum()
    }

    /// Full score of a candidate target.
    #[must_use]
    pub fn score(&self, target: &AttackTarget) -> f64 {
        target.base_priority + self.bonus_for(target)
    }
}

/// Build cost of one ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    /// Supply consumed.
    pub supply: f64,
    /// Credits.
    pub credits: f64,
    /// Metal.
    pub metal: f64,
    /// Crystal.
    pub crystal: f64,
}

impl Cost {
    /// Credits, metal and crystal combined.
    #[must_use]
    pub fn resources(&self) -> f64 {
        self.credits + self.metal + self.crystal
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

/// A weapon as defined by its `.weapon` file.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponType {
    /// Weapon name (file stem).
    pub name: String,
    /// Seconds between firing events.
    pub cooldown_secs: f64,
    /// Maximum engagement distance.
    pub range: f64,
    /// Armor penetration.
    pub armor_penetration: f64,
    /// Damage per firing event.
    pub damage: f64,
    /// Direct fire or projectile launcher.
    pub kind: WeaponKind,
    /// Targeting policy.
    pub logic: AcquisitionLogic,
    /// Categories this weapon may engage.
    pub target_filter: TargetTypes,
    /// Projectiles per firing event. Always 1 for direct fire.
    pub salvo_size: u32,
    /// Launched projectile, present for every projectile weapon.
    pub projectile: Option<Arc<ProjectileType>>,
}

impl WeaponType {
    /// Resolves a raw weapon definition.
    ///
    /// # Errors
    ///
    /// Fails on an unknown acquisition logic or target-filter tag, and on a
    /// projectile weapon without a projectile block or with an empty salvo.
    pub fn from_raw(name: &str, raw: RawWeapon) -> Result<Self> {
        let logic = match raw.acquire_target_logic.as_deref() {
            None => AcquisitionLogic::default(),
            Some(tag) => AcquisitionLogic::from_tag(tag).ok_or_else(|| {
                CatalogError::UnknownAcquisitionLogic {
                    weapon: name.to_string(),
                    logic: tag.to_string(),
                }
            })?,
        };

        let target_filter = if raw.target_filter.is_empty() {
            TargetTypes::all()
        } else {
            TargetTypes::parse_tags(name, &raw.target_filter)?
        };

        let kind = WeaponKind::from_weapon_name(name);
        let (salvo_size, projectile) = match kind {
            WeaponKind::DirectFire => (1, None),
            WeaponKind::Projectile => {
                if raw.salvo_size == 0 {
                    return Err(CatalogError::InvalidSalvoSize {
                        weapon: name.to_string(),
                    });
                }
                let projectile = raw.projectile.ok_or_else(|| CatalogError::MissingProjectile {
                    weapon: name.to_string(),
                })?;
                (
                    raw.salvo_size,
                    Some(Arc::new(ProjectileType::from_raw(name, projectile))),
                )
            }
        };

        Ok(Self {
            name: name.to_string(),
            cooldown_secs: raw.cooldown_duration,
            range: raw.range,
            armor_penetration: raw.hull_armor_penetration,
            damage: raw.damage,
            kind,
            logic,
            target_filter,
            salvo_size,
            projectile,
        })
    }

    /// Damage carried by each projectile of a salvo.
    #[must_use]
    pub fn damage_per_projectile(&self) -> f64 {
        self.damage / f64::from(self.salvo_size.max(1))
    }
}

/// An in-flight missile or torpedo definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileType {
    /// Display name.
    pub name: String,
    /// Hull points.
    pub max_hull: f64,
    /// Shield points.
    pub max_shield: f64,
    /// Top speed.
    pub speed: f64,
    /// Seconds to reach top speed.
    pub accel_time: f64,
    /// How point defense scores this projectile.
    pub attack_target: AttackTarget,
    /// Category matched against weapon filters.
    pub category: TargetTypes,
}

impl ProjectileType {
    fn from_raw(weapon: &str, raw: RawProjectile) -> Self {
        let name = raw.name.unwrap_or_else(|| weapon.to_string());
        let attack_target = raw.ai_attack_target.map_or_else(
            || AttackTarget {
                base_priority: 0.0,
                tags: vec!["torpedo".to_string()],
            },
            AttackTarget::from,
        );
        let category = known_categories(&attack_target.tags);
        Self {
            category: if category.is_empty() {
                TargetTypes::TORPEDO
            } else {
                category
            },
            name,
            max_hull: raw.max_hull_points,
            max_shield: raw.max_shield_points,
            speed: raw.max_linear_speed,
            accel_time: raw.time_to_max_linear_speed,
            attack_target,
        }
    }
}

/// A combat-capable ship as defined by its `.unit` file.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipType {
    /// Ship name (file stem).
    pub name: String,
    /// Targeting preferences.
    pub ai: AiProfile,
    /// How enemies score this ship.
    pub attack_target: AttackTarget,
    /// Seconds to reach top speed.
    pub accel_time: f64,
    /// Top speed.
    pub speed: f64,
    /// Ordered weapons; index 0 is the primary.
    pub weapons: Vec<Arc<WeaponType>>,
    /// Hull points.
    pub max_hull: f64,
    /// Shield points.
    pub max_shield: f64,
    /// Flat reduction applied to hits against shields.
    pub mitigation: f64,
    /// Hull armor.
    pub armor: f64,
    /// Build cost.
    pub cost: Cost,
    /// Category matched against weapon filters.
    pub category: TargetTypes,
}

/// Tags outside the target-type enumeration are legal priority keys; only
/// recognized ones contribute to a category.
fn known_categories(tags: &[String]) -> TargetTypes {
    tags.iter()
        .filter_map(|tag| TargetTypes::from_tag(tag))
        .fold(TargetTypes::empty(), |acc, flag| acc | flag)
}

// =============================================================================
// Catalog
// =============================================================================

/// Options applied while resolving raw definitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogOptions {
    /// Index into a levelled unit's stat table.
    pub level: usize,
}

impl CatalogOptions {
    /// Sets the level.
    #[must_use]
    pub const fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }
}

/// Lookup of every known weapon and combat-capable ship.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    weapons: BTreeMap<String, Arc<WeaponType>>,
    ships: BTreeMap<String, Arc<ShipType>>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves raw weapon and unit definitions.
    ///
    /// Weapons are resolved first so ships can reference them. Units without
    /// a `physics` or `weapons` block are not combat units and are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] encountered.
    pub fn build<W, U>(weapons: W, units: U, options: &CatalogOptions) -> Result<Self>
    where
        W: IntoIterator<Item = (String, RawWeapon)>,
        U: IntoIterator<Item = (String, RawUnit)>,
    {
        let mut catalog = Self::new();
        for (name, raw) in weapons {
            let weapon = WeaponType::from_raw(&name, raw)?;
            catalog.add_weapon(weapon);
        }
        for (name, raw) in units {
            if let Some(ship) = catalog.resolve_unit(&name, raw, options)? {
                catalog.add_ship(ship);
            }
        }
        debug!(
            weapons = catalog.weapons.len(),
            ships = catalog.ships.len(),
            "catalog built"
        );
        Ok(catalog)
    }

    fn resolve_unit(
        &self,
        name: &str,
        raw: RawUnit,
        options: &CatalogOptions,
    ) -> Result<Option<ShipType>> {
        let (Some(physics), Some(mounts)) = (raw.physics, raw.weapons) else {
            debug!(unit = name, "skipping unit without physics or weapons");
            return Ok(None);
        };

        let weapons = mounts
            .weapons
            .iter()
            .map(|mount| {
                self.weapon(&mount.weapon)
                    .ok_or_else(|| CatalogError::UnknownWeapon {
                        ship: name.to_string(),
                        weapon: mount.weapon.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut health = raw.health;
        if let Some(last) = health.levels.len().checked_sub(1) {
            if options.level > last {
                warn!(
                    unit = name,
                    requested = options.level,
                    used = last,
                    "level out of range, using highest"
                );
            }
            let entry = &health.levels[options.level.min(last)];
            health.max_hull_points = entry.max_hull_points.unwrap_or(health.max_hull_points);
            health.max_shield_points = entry.max_shield_points.unwrap_or(health.max_shield_points);
            health.shield_mitigation = entry.shield_mitigation.unwrap_or(health.shield_mitigation);
            health.hull_armor = entry.hull_armor.unwrap_or(health.hull_armor);
        }

        let attack_target = AttackTarget::from(raw.ai_attack_target);
        let category = match raw.attack_target_type.as_deref() {
            Some(tag) => TargetTypes::parse_tags(name, &[tag])?,
            None => {
                let derived = known_categories(&attack_target.tags);
                if derived.is_empty() {
                    TargetTypes::all()
                } else {
                    derived
                }
            }
        };

        Ok(Some(ShipType {
            name: name.to_string(),
            ai: AiProfile {
                priority_bonus: raw.ai.priority_bonus_per_attack_target_type,
            },
            attack_target,
            accel_time: physics.time_to_max_linear_speed,
            speed: physics.max_linear_speed,
            weapons,
            max_hull: health.max_hull_points,
            max_shield: health.max_shield_points,
            mitigation: health.shield_mitigation,
            armor: health.hull_armor,
            cost: Cost {
                supply: raw.build.supply_cost,
                credits: raw.build.price.credits,
                metal: raw.build.price.metal,
                crystal: raw.build.price.crystal,
            },
            category,
        }))
    }

    /// Adds or replaces a weapon, returning the shared handle.
    pub fn add_weapon(&mut self, weapon: WeaponType) -> Arc<WeaponType> {
        let weapon = Arc::new(weapon);
        self.weapons.insert(weapon.name.clone(), Arc::clone(&weapon));
        weapon
    }

    /// Adds or replaces a ship, returning the shared handle.
    pub fn add_ship(&mut self, ship: ShipType) -> Arc<ShipType> {
        let ship = Arc::new(ship);
        self.ships.insert(ship.name.clone(), Arc::clone(&ship));
        ship
    }

    /// Looks up a ship type by name.
    #[must_use]
    pub fn ship(&self, name: &str) -> Option<Arc<ShipType>> {
        self.ships.get(name).cloned()
    }

    /// Looks up a weapon type by name.
    #[must_use]
    pub fn weapon(&self, name: &str) -> Option<Arc<WeaponType>> {
        self.weapons.get(name).cloned()
    }

    /// Ship names in sorted order.
    pub fn ship_names(&self) -> impl Iterator<Item = &str> {
        self.ships.keys().map(String::as_str)
    }

    /// Ship types in name order.
    pub fn ships(&self) -> impl Iterator<Item = &Arc<ShipType>> {
        self.ships.values()
    }

    /// Number of ship types.
    #[must_use]
    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    /// Number of weapon types.
    #[must_use]
    pub fn weapon_count(&self) -> usize {
        self.weapons.len()
    }
}
