//! Serde models of the game's `.weapon` and `.unit` entity files.
//!
//! These mirror the on-disk JSON closely and carry no validation. The
//! entity name is not part of the file body; callers pair each model with
//! its file stem before handing it to [`Catalog::build`].
//!
//! Unknown fields are ignored so full game files deserialize without
//! listing every block they contain.
//!
//! [`Catalog::build`]: super::Catalog::build

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A `.weapon` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawWeapon {
    /// Seconds between firing events.
    pub cooldown_duration: f64,
    /// Maximum engagement distance.
    pub range: f64,
    /// Armor penetration applied to hull damage.
    pub hull_armor_penetration: f64,
    /// Damage per firing event, split evenly across a projectile salvo.
    pub damage: f64,
    /// Acquisition logic tag; absent means the independent-choice default.
    pub acquire_target_logic: Option<String>,
    /// Target-type tags this weapon may engage; empty means any.
    pub target_filter: Vec<String>,
    /// Projectiles per firing event.
    pub salvo_size: u32,
    /// Projectile launched by missile and torpedo weapons.
    pub projectile: Option<RawProjectile>,
}

impl Default for RawWeapon {
    fn default() -> Self {
        Self {
            cooldown_duration: 0.0,
            range: 0.0,
            hull_armor_penetration: 0.0,
            damage: 0.0,
            acquire_target_logic: None,
            target_filter: Vec::new(),
            salvo_size: 1,
            projectile: None,
        }
    }
}

impl RawWeapon {
    /// Sets the damage per firing event.
    #[must_use]
    pub fn with_damage(mut self, damage: f64) -> Self {
        self.damage = damage;
        self
    }

    /// Sets the range.
    #[must_use]
    pub fn with_range(mut self, range: f64) -> Self {
        self.range = range;
        self
    }

    /// Sets the cooldown in seconds.
    #[must_use]
    pub fn with_cooldown(mut self, secs: f64) -> Self {
        self.cooldown_duration = secs;
        self
    }
}

/// Projectile block nested in a missile or torpedo weapon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProjectile {
    /// Display name; defaults to the launching weapon's name.
    pub name: Option<String>,
    /// Hull points.
    pub max_hull_points: f64,
    /// Shield points.
    pub max_shield_points: f64,
    /// Top speed.
    pub max_linear_speed: f64,
    /// Seconds to reach top speed.
    pub time_to_max_linear_speed: f64,
    /// How point defense sees the projectile.
    pub ai_attack_target: Option<RawAttackTarget>,
}

/// A `.unit` file.
///
/// Only units with both a `physics` and a `weapons` block are combat units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawUnit {
    /// Targeting preferences.
    pub ai: RawAi,
    /// How enemies see this unit.
    pub ai_attack_target: RawAttackTarget,
    /// Explicit target-type category; when absent it is derived from
    /// `ai_attack_target` tags.
    pub attack_target_type: Option<String>,
    /// Movement block.
    pub physics: Option<RawPhysics>,
    /// Weapon mounts.
    pub weapons: Option<RawWeaponsBlock>,
    /// Durability block.
    pub health: RawHealth,
    /// Cost block.
    pub build: RawBuild,
}

/// The `ai` block of a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAi {
    /// Additional priority per attack-target tag.
    pub priority_bonus_per_attack_target_type: BTreeMap<String, f64>,
}

/// The `ai_attack_target` block of a unit or projectile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAttackTarget {
    /// Base priority enemies assign to this target.
    pub attack_priority: f64,
    /// Tags matched against an attacker's priority bonuses.
    pub attack_target_types: Vec<String>,
}

/// The `physics` block of a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPhysics {
    /// Top speed.
    pub max_linear_speed: f64,
    /// Seconds to reach top speed.
    pub time_to_max_linear_speed: f64,
}

/// The `weapons` block of a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawWeaponsBlock {
    /// Ordered mounts; the first is the primary weapon.
    pub weapons: Vec<RawWeaponMount>,
}

/// One weapon mount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawWeaponMount {
    /// Name of the mounted weapon.
    pub weapon: String,
}

/// The `health` block of a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawHealth {
    /// Hull points.
    pub max_hull_points: f64,
    /// Shield points.
    pub max_shield_points: f64,
    /// Flat reduction applied to hits against shields.
    pub shield_mitigation: f64,
    /// Hull armor.
    pub hull_armor: f64,
    /// Per-level overrides for capital ships and titans.
    pub levels: Vec<RawHealthLevel>,
}

/// One entry of a levelled unit's stat table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawHealthLevel {
    /// Hull points at this level.
    pub max_hull_points: Option<f64>,
    /// Shield points at this level.
    pub max_shield_points: Option<f64>,
    /// Shield mitigation at this level.
    pub shield_mitigation: Option<f64>,
    /// Hull armor at this level.
    pub hull_armor: Option<f64>,
}

/// The `build` block of a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBuild {
    /// Supply consumed by one unit.
    pub supply_cost: f64,
    /// Resource price.
    pub price: RawPrice,
}

/// Resource price of a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPrice {
    /// Credits.
    pub credits: f64,
    /// Metal.
    pub metal: f64,
    /// Crystal.
    pub crystal: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_file_parses_with_extra_blocks() {
        let json = r#"{
            "ai": { "priority_bonus_per_attack_target_type": { "cruiser": 5.0 } },
            "ai_attack_target": { "attack_priority": 10, "attack_target_types": ["frigate"] },
            "physics": { "max_linear_speed": 900, "time_to_max_linear_speed": 2 },
            "weapons": { "weapons": [ { "weapon": "trader_light_frigate_autocannon" } ] },
            "health": { "max_hull_points": 1200, "max_shield_points": 400,
                        "shield_mitigation": 2, "hull_armor": 3 },
            "build": { "supply_cost": 4, "price": { "credits": 250, "metal": 40, "crystal": 0 } },
            "ui": { "tooltip": "ignored" }
        }"#;
        let unit: RawUnit = serde_json::from_str(json).unwrap();
        assert_eq!(unit.ai.priority_bonus_per_attack_target_type["cruiser"], 5.0);
        assert_eq!(unit.ai_attack_target.attack_target_types, vec!["frigate"]);
        assert_eq!(unit.weapons.unwrap().weapons[0].weapon, "trader_light_frigate_autocannon");
        assert_eq!(unit.build.price.credits, 250.0);
        assert!(unit.health.levels.is_empty());
    }

    #[test]
    fn weapon_file_defaults() {
        let weapon: RawWeapon =
            serde_json::from_str(r#"{ "cooldown_duration": 1.5, "range": 3000 }"#).unwrap();
        assert_eq!(weapon.range, 3000.0);
        assert_eq!(weapon.damage, 0.0);
        assert!(weapon.target_filter.is_empty());
        assert!(weapon.projectile.is_none());
        assert!(weapon.acquire_target_logic.is_none());
        assert_eq!(weapon.salvo_size, 1);
    }

    #[test]
    fn non_combat_unit_has_no_physics() {
        let unit: RawUnit = serde_json::from_str(r#"{ "health": { "max_hull_points": 10 } }"#).unwrap();
        assert!(unit.physics.is_none());
        assert!(unit.weapons.is_none());
    }
}
