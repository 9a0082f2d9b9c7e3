//! Battle participants.
//!
//! This module provides the mutable per-battle state:
//! - [`Side`]: which fleet a combatant belongs to
//! - [`CombatantId`]: stable handle used for non-owning target references
//! - [`CombatantKind`] / [`CombatantInner`]: ship or in-flight projectile
//! - [`Combatant`]: the live state shared by both kinds
//!
//! Behaviour is split across sibling modules: [`crate::targeting`] for target
//! selection, [`crate::movement`] for closing distance and [`crate::combat`]
//! for firing and damage resolution.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use broadside_core::catalog::{AiProfile, AttackTarget, Cost, ShipType, TargetTypes};
//! use broadside_core::entity::{Combatant, CombatantId, CombatantKind, Side};
//!
//! let hull = Arc::new(ShipType {
//!     name: "picket".to_string(),
//!     ai: AiProfile::default(),
//!     attack_target: AttackTarget::default(),
//!     accel_time: 0.0,
//!     speed: 0.0,
//!     weapons: Vec::new(),
//!     max_hull: 100.0,
//!     max_shield: 0.0,
//!     mitigation: 0.0,
//!     armor: 0.0,
//!     cost: Cost::default(),
//!     category: TargetTypes::CORVETTE,
//! });
//!
//! let ship = Combatant::new_ship(CombatantId::new(Side::A, 0), hull, 10_000.0, -1.0);
//! assert_eq!(ship.kind(), CombatantKind::Ship);
//! assert_eq!(ship.hull(), 100.0);
//! assert_eq!(ship.id().to_string(), "A0");
//! ```

mod weapon;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{AttackTarget, Cost, ProjectileType, ShipType, TargetTypes, WeaponType};

pub use weapon::{warhead, WeaponState};

// =============================================================================
// Identity
// =============================================================================

/// One of the two opposing fleets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Starts at positive positions, facing down the axis.
    A,
    /// Starts at negative positions, facing up the axis.
    B,
}

impl Side {
    /// The opposing side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Stable identifier of a combatant within one engagement.
///
/// Serials are allocated per fleet: roster ships take `0..n` at
/// construction, projectiles take the following serials as they launch.
/// Ordering is by side, then serial.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId {
    side: Side,
    serial: u32,
}

impl CombatantId {
    /// Creates an identifier.
    #[must_use]
    pub const fn new(side: Side, serial: u32) -> Self {
        Self { side, serial }
    }

    /// Owning side.
    #[must_use]
    pub const fn side(self) -> Side {
        self.side
    }

    /// Serial within the side.
    #[must_use]
    pub const fn serial(self) -> u32 {
        self.serial
    }
}

impl fmt::Debug for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CombatantId({}{})", self.side, self.serial)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side, self.serial)
    }
}

// =============================================================================
// Kind
// =============================================================================

/// Discriminant of [`CombatantInner`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantKind {
    /// A roster ship.
    Ship,
    /// An in-flight missile or torpedo.
    Projectile,
}

impl fmt::Display for CombatantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ship => write!(f, "Ship"),
            Self::Projectile => write!(f, "Projectile"),
        }
    }
}

/// Type-specific data of a combatant.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatantInner {
    /// Ship spawned from a catalog type.
    Ship(Arc<ShipType>),
    /// Projectile launched by a ship on the same side.
    Projectile {
        /// Projectile definition.
        projectile_type: Arc<ProjectileType>,
        /// Ship credited with the damage this projectile deals.
        spawner: CombatantId,
    },
}

impl CombatantInner {
    /// Returns the matching [`CombatantKind`].
    #[must_use]
    pub const fn kind(&self) -> CombatantKind {
        match self {
            Self::Ship(_) => CombatantKind::Ship,
            Self::Projectile { .. } => CombatantKind::Projectile,
        }
    }
}

// =============================================================================
// Combatant
// =============================================================================

/// A live battle participant.
///
/// Hull and shield never go below zero once damage resolves. A combatant is
/// dead once its hull reaches zero, and stays dead until [`reset`].
///
/// `dealt`, `tanked` and `survived` accumulate across repetitions and are
/// left untouched by [`reset`].
///
/// [`reset`]: Combatant::reset
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub(crate) id: CombatantId,
    pub(crate) inner: CombatantInner,
    pub(crate) position: f64,
    pub(crate) direction: f64,
    start_position: f64,
    start_direction: f64,
    pub(crate) hull: f64,
    pub(crate) shield: f64,
    pub(crate) weapons: Vec<WeaponState>,
    pub(crate) target: Option<CombatantId>,
    pub(crate) target_priority: f64,
    pub(crate) lifetime_ticks: u64,
    pub(crate) dealt: f64,
    pub(crate) tanked: f64,
    pub(crate) survived: u32,
    pub(crate) is_dead: bool,
}

impl Combatant {
    /// Spawns a ship at full health with every weapon loaded.
    #[must_use]
    pub fn new_ship(id: CombatantId, ship: Arc<ShipType>, position: f64, direction: f64) -> Self {
        let weapons = ship.weapons.iter().cloned().map(WeaponState::new).collect();
        Self {
            id,
            position,
            direction,
            start_position: position,
            start_direction: direction,
            hull: ship.max_hull,
            shield: ship.max_shield,
            weapons,
            target: None,
            target_priority: f64::NEG_INFINITY,
            lifetime_ticks: 0,
            dealt: 0.0,
            tanked: 0.0,
            survived: 0,
            is_dead: false,
            inner: CombatantInner::Ship(ship),
        }
    }

    /// Spawns a projectile carrying `warhead` toward `target`.
    ///
    /// The projectile's single weapon is locked onto the target from the
    /// start and is never re-aimed.
    #[must_use]
    pub fn new_projectile(
        id: CombatantId,
        projectile_type: Arc<ProjectileType>,
        spawner: CombatantId,
        warhead: Arc<WeaponType>,
        target: CombatantId,
        position: f64,
        direction: f64,
    ) -> Self {
        let mut weapon = WeaponState::new(warhead);
        weapon.target = Some(target);
        Self {
            id,
            position,
            direction,
            start_position: position,
            start_direction: direction,
            hull: projectile_type.max_hull,
            shield: projectile_type.max_shield,
            weapons: vec![weapon],
            target: Some(target),
            target_priority: f64::NEG_INFINITY,
            lifetime_ticks: 0,
            dealt: 0.0,
            tanked: 0.0,
            survived: 0,
            is_dead: false,
            inner: CombatantInner::Projectile {
                projectile_type,
                spawner,
            },
        }
    }

    /// Restores the combatant to its spawn state for another repetition.
    pub fn reset(&mut self) {
        self.position = self.start_position;
        self.direction = self.start_direction;
        self.hull = self.max_hull();
        self.shield = self.max_shield();
        self.lifetime_ticks = 0;
        self.target = None;
        self.target_priority = f64::NEG_INFINITY;
        self.is_dead = false;
        for weapon in &mut self.weapons {
            weapon.reset();
        }
    }

    // -------------------------------------------------------------------------
    // Identity
    // -------------------------------------------------------------------------

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> CombatantId {
        self.id
    }

    /// Ship or projectile.
    #[must_use]
    pub const fn kind(&self) -> CombatantKind {
        self.inner.kind()
    }

    /// Type-specific data.
    #[must_use]
    pub const fn inner(&self) -> &CombatantInner {
        &self.inner
    }

    /// Returns true for projectiles.
    #[must_use]
    pub const fn is_projectile(&self) -> bool {
        matches!(self.inner, CombatantInner::Projectile { .. })
    }

    /// The ship type, if this is a ship.
    #[must_use]
    pub fn ship_type(&self) -> Option<&Arc<ShipType>> {
        match &self.inner {
            CombatantInner::Ship(ship) => Some(ship),
            CombatantInner::Projectile { .. } => None,
        }
    }

    /// The launching ship, if this is a projectile.
    #[must_use]
    pub const fn spawner(&self) -> Option<CombatantId> {
        match &self.inner {
            CombatantInner::Ship(_) => None,
            CombatantInner::Projectile { spawner, .. } => Some(*spawner),
        }
    }

    /// Type name.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.inner {
            CombatantInner::Ship(ship) => &ship.name,
            CombatantInner::Projectile {
                projectile_type, ..
            } => &projectile_type.name,
        }
    }

    // -------------------------------------------------------------------------
    // Type stats
    // -------------------------------------------------------------------------

    /// Maximum hull.
    #[must_use]
    pub fn max_hull(&self) -> f64 {
        match &self.inner {
            CombatantInner::Ship(ship) => ship.max_hull,
            CombatantInner::Projectile {
                projectile_type, ..
            } => projectile_type.max_hull,
        }
    }

    /// Maximum shield.
    #[must_use]
    pub fn max_shield(&self) -> f64 {
        match &self.inner {
            CombatantInner::Ship(ship) => ship.max_shield,
            CombatantInner::Projectile {
                projectile_type, ..
            } => projectile_type.max_shield,
        }
    }

    /// Shield mitigation. Projectiles have none.
    #[must_use]
    pub fn mitigation(&self) -> f64 {
        self.ship_type().map_or(0.0, |ship| ship.mitigation)
    }

    /// Hull armor. Projectiles have none.
    #[must_use]
    pub fn armor(&self) -> f64 {
        self.ship_type().map_or(0.0, |ship| ship.armor)
    }

    /// Top speed.
    #[must_use]
    pub fn speed(&self) -> f64 {
        match &self.inner {
            CombatantInner::Ship(ship) => ship.speed,
            CombatantInner::Projectile {
                projectile_type, ..
            } => projectile_type.speed,
        }
    }

    /// Seconds to reach top speed.
    #[must_use]
    pub fn accel_time(&self) -> f64 {
        match &self.inner {
            CombatantInner::Ship(ship) => ship.accel_time,
            CombatantInner::Projectile {
                projectile_type, ..
            } => projectile_type.accel_time,
        }
    }

    /// How enemies score this combatant.
    #[must_use]
    pub fn attack_target(&self) -> &AttackTarget {
        match &self.inner {
            CombatantInner::Ship(ship) => &ship.attack_target,
            CombatantInner::Projectile {
                projectile_type, ..
            } => &projectile_type.attack_target,
        }
    }

    /// Category matched against weapon filters.
    #[must_use]
    pub fn category(&self) -> TargetTypes {
        match &self.inner {
            CombatantInner::Ship(ship) => ship.category,
            CombatantInner::Projectile {
                projectile_type, ..
            } => projectile_type.category,
        }
    }

    /// Build cost. Projectiles cost nothing.
    #[must_use]
    pub fn cost(&self) -> Cost {
        self.ship_type().map(|ship| ship.cost).unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Live state
    // -------------------------------------------------------------------------

    /// Position on the battle axis.
    #[must_use]
    pub const fn position(&self) -> f64 {
        self.position
    }

    /// Facing, `+1.0` or `-1.0`.
    #[must_use]
    pub const fn direction(&self) -> f64 {
        self.direction
    }

    /// Current hull.
    #[must_use]
    pub const fn hull(&self) -> f64 {
        self.hull
    }

    /// Current shield.
    #[must_use]
    pub const fn shield(&self) -> f64 {
        self.shield
    }

    /// Per-weapon live state, in mount order.
    #[must_use]
    pub fn weapons(&self) -> &[WeaponState] {
        &self.weapons
    }

    /// Primary target (weapon 0's target).
    #[must_use]
    pub const fn target(&self) -> Option<CombatantId> {
        self.target
    }

    /// Score of the primary target.
    #[must_use]
    pub const fn target_priority(&self) -> f64 {
        self.target_priority
    }

    /// Ticks this combatant has acted since spawning.
    #[must_use]
    pub const fn lifetime_ticks(&self) -> u64 {
        self.lifetime_ticks
    }

    /// Damage dealt, summed over every repetition.
    #[must_use]
    pub const fn dealt(&self) -> f64 {
        self.dealt
    }

    /// Raw damage received, summed over every repetition.
    #[must_use]
    pub const fn tanked(&self) -> f64 {
        self.tanked
    }

    /// Repetitions this combatant was alive at the end of.
    #[must_use]
    pub const fn survived(&self) -> u32 {
        self.survived
    }

    /// Returns true once the hull has been destroyed.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.is_dead
    }

    /// Absolute distance along the battle axis.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.position - other.position).abs()
    }

    pub(crate) fn mark_survived(&mut self) {
        self.survived += 1;
    }

    pub(crate) fn credit(&mut self, amount: f64) {
        self.dealt += amount;
    }
}
