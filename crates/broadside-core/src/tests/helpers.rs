//! Factories for ship types, weapons and fleets used across the test suite.
//!
//! Defaults are deliberately plain: a stock ship has 1000 hull, no shield,
//! no armor, and does not move unless a test gives it speed.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::{
    AcquisitionLogic, AiProfile, AttackTarget, Catalog, Cost, ProjectileType, ShipType, TargetTypes,
    WeaponKind, WeaponType,
};
use crate::entity::Side;
use crate::fleet::Fleet;

// =============================================================================
// Weapons
// =============================================================================

/// A direct-fire weapon that can engage anything.
pub fn direct_weapon(name: &str, damage: f64, range: f64, cooldown_secs: f64) -> Arc<WeaponType> {
    Arc::new(WeaponType {
        name: name.to_string(),
        cooldown_secs,
        range,
        armor_penetration: 0.0,
        damage,
        kind: WeaponKind::DirectFire,
        logic: AcquisitionLogic::default(),
        target_filter: TargetTypes::all(),
        salvo_size: 1,
        projectile: None,
    })
}

/// A launcher firing `salvo` of [`projectile_type`] per volley.
pub fn projectile_weapon(
    name: &str,
    damage: f64,
    range: f64,
    cooldown_secs: f64,
    salvo: u32,
) -> Arc<WeaponType> {
    Arc::new(WeaponType {
        kind: WeaponKind::Projectile,
        salvo_size: salvo,
        projectile: Some(projectile_type()),
        ..(*direct_weapon(name, damage, range, cooldown_secs)).clone()
    })
}

/// A fragile torpedo that point defense can see.
pub fn projectile_type() -> Arc<ProjectileType> {
    Arc::new(ProjectileType {
        name: "test_torpedo".to_string(),
        max_hull: 10.0,
        max_shield: 0.0,
        speed: 1_500.0,
        accel_time: 0.0,
        attack_target: AttackTarget {
            base_priority: 0.0,
            tags: vec!["torpedo".to_string()],
        },
        category: TargetTypes::TORPEDO,
    })
}

// =============================================================================
// Ships
// =============================================================================

/// A stationary frigate with the given weapons.
pub fn ship_type(name: &str, weapons: Vec<Arc<WeaponType>>) -> Arc<ShipType> {
    ship_type_with(name, weapons, |_| {})
}

/// A stock ship adjusted by `configure`.
pub fn ship_type_with(
    name: &str,
    weapons: Vec<Arc<WeaponType>>,
    configure: impl FnOnce(&mut ShipType),
) -> Arc<ShipType> {
    let mut ship = ShipType {
        name: name.to_string(),
        ai: AiProfile::default(),
        attack_target: AttackTarget {
            base_priority: 1.0,
            tags: vec!["frigate".to_string()],
        },
        accel_time: 0.0,
        speed: 0.0,
        weapons,
        max_hull: 1_000.0,
        max_shield: 0.0,
        mitigation: 0.0,
        armor: 0.0,
        cost: Cost {
            supply: 4.0,
            credits: 100.0,
            metal: 20.0,
            crystal: 0.0,
        },
        category: TargetTypes::FRIGATE,
    };
    configure(&mut ship);
    Arc::new(ship)
}

/// An unarmed ship with the given defences.
pub fn defended_ship(name: &str, hull: f64, shield: f64, mitigation: f64, armor: f64) -> Arc<ShipType> {
    ship_type_with(name, Vec::new(), |ship| {
        ship.max_hull = hull;
        ship.max_shield = shield;
        ship.mitigation = mitigation;
        ship.armor = armor;
    })
}

// =============================================================================
// Fleets and catalogs
// =============================================================================

/// `count` copies of `ship`, all at `position`, facing the usual way for
/// their side.
pub fn fleet_of(side: Side, ship: Arc<ShipType>, count: u32, position: f64) -> Fleet {
    let direction = match side {
        Side::A => -1.0,
        Side::B => 1.0,
    };
    let mut fleet = Fleet::new(side, format!("fleet {side}"), position, direction);
    for _ in 0..count {
        fleet.enlist(Arc::clone(&ship));
    }
    fleet
}

/// Deterministic RNG for a test.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Catalog with a few small ships for end-to-end runs.
///
/// - `gunboat`: 500 hull, 50-damage autocannon at 1000 range, moves at 200
/// - `missile_boat`: fires two-torpedo salvos at 3000 range
/// - `picket`: point defense that only engages torpedoes
/// - `anchor`: immobile, zero-range gun
pub fn duel_catalog() -> Catalog {
    let mut catalog = Catalog::new();

    let autocannon = catalog.add_weapon((*direct_weapon("autocannon", 50.0, 1_000.0, 1.0)).clone());
    let launcher = catalog.add_weapon((*projectile_weapon("boat_torpedo", 120.0, 3_000.0, 6.0, 2)).clone());
    let mut flak = (*direct_weapon("flak", 20.0, 2_000.0, 0.5)).clone();
    flak.target_filter = TargetTypes::TORPEDO;
    let flak = catalog.add_weapon(flak);
    let stub = catalog.add_weapon((*direct_weapon("stub", 10.0, 0.0, 1.0)).clone());

    catalog.add_ship(
        (*ship_type_with("gunboat", vec![autocannon], |ship| {
            ship.max_hull = 500.0;
            ship.speed = 200.0;
            ship.accel_time = 1.0;
        }))
        .clone(),
    );
    catalog.add_ship(
        (*ship_type_with("missile_boat", vec![launcher], |ship| {
            ship.max_hull = 400.0;
            ship.speed = 150.0;
            ship.category = TargetTypes::CRUISER;
            ship.cost.supply = 8.0;
        }))
        .clone(),
    );
    catalog.add_ship(
        (*ship_type_with("picket", vec![flak], |ship| {
            ship.max_hull = 300.0;
            ship.speed = 100.0;
        }))
        .clone(),
    );
    catalog.add_ship((*ship_type("anchor", vec![stub])).clone());

    catalog
}
