//! One side of an engagement.
//!
//! A [`Fleet`] owns every combatant on its side, including projectiles its
//! ships launch. Storage is a `BTreeMap` keyed by [`CombatantId`] so lookups
//! of non-owning target references are cheap and iteration is deterministic.
//!
//! Two ordered id lists sit on top of the storage:
//!
//! - the **roster**: every ship present at battle start, fixed for the
//!   lifetime of the fleet
//! - the **active** list: who acts each tick, pruned of the dead and with
//!   fresh projectiles at the front
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use broadside_core::catalog::Catalog;
//! use broadside_core::entity::Side;
//! use broadside_core::fleet::{Fleet, FleetSpec};
//!
//! let spec = FleetSpec::new("LF", BTreeMap::from([("unknown_ship".to_string(), 3)]));
//! let fleet = Fleet::from_spec(Side::A, &spec, &Catalog::new(), 10_000.0);
//!
//! // Unknown ship names are skipped.
//! assert!(fleet.is_defeated());
//! assert_eq!(fleet.name(), "LF");
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{Catalog, ShipType};
use crate::combat::ProjectileLaunch;
use crate::entity::{Combatant, CombatantId, Side};

/// Named fleet composition: ship type name to count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSpec {
    /// Display name of the side.
    pub name: String,
    /// Ship type name to number of ships.
    pub composition: BTreeMap<String, u32>,
}

impl FleetSpec {
    /// Creates a composition.
    #[must_use]
    pub fn new(name: impl Into<String>, composition: BTreeMap<String, u32>) -> Self {
        Self {
            name: name.into(),
            composition,
        }
    }

    /// Adds `count` ships of `ship` to the composition.
    #[must_use]
    pub fn with_ships(mut self, ship: impl Into<String>, count: u32) -> Self {
        *self.composition.entry(ship.into()).or_default() += count;
        self
    }
}

/// A side's combatants.
#[derive(Debug, Clone)]
pub struct Fleet {
    side: Side,
    name: String,
    start_position: f64,
    direction: f64,
    members: BTreeMap<CombatantId, Combatant>,
    roster: Vec<CombatantId>,
    active: Vec<CombatantId>,
    pending: Vec<CombatantId>,
    next_serial: u32,
}

impl Fleet {
    /// Creates an empty fleet whose ships spawn at `start_position`.
    #[must_use]
    pub fn new(side: Side, name: impl Into<String>, start_position: f64, direction: f64) -> Self {
        Self {
            side,
            name: name.into(),
            start_position,
            direction,
            members: BTreeMap::new(),
            roster: Vec::new(),
            active: Vec::new(),
            pending: Vec::new(),
            next_serial: 0,
        }
    }

    /// Creates an empty fleet in its side's standard starting geometry.
    ///
    /// Side A starts at `+start_distance` facing down the axis, side B at
    /// `-start_distance` facing up.
    #[must_use]
    pub fn for_side(side: Side, name: impl Into<String>, start_distance: f64) -> Self {
        match side {
            Side::A => Self::new(side, name, start_distance, -1.0),
            Side::B => Self::new(side, name, -start_distance, 1.0),
        }
    }

    /// Builds a fleet from a composition.
    ///
    /// Unknown ship names are logged and contribute no ships.
    #[must_use]
    pub fn from_spec(side: Side, spec: &FleetSpec, catalog: &Catalog, start_distance: f64) -> Self {
        let mut fleet = Self::for_side(side, spec.name.clone(), start_distance);
        for (name, &count) in &spec.composition {
            let Some(ship) = catalog.ship(name) else {
                warn!(fleet = %spec.name, ship = %name, "unrecognized ship type");
                continue;
            };
            for _ in 0..count {
                fleet.enlist(Arc::clone(&ship));
            }
        }
        fleet
    }

    // =========================================================================
    // Membership
    // =========================================================================

    fn allocate_id(&mut self) -> CombatantId {
        let id = CombatantId::new(self.side, self.next_serial);
        self.next_serial += 1;
        id
    }

    /// Adds a ship to the roster and the active list.
    pub fn enlist(&mut self, ship: Arc<ShipType>) -> CombatantId {
        let id = self.allocate_id();
        let combatant = Combatant::new_ship(id, ship, self.start_position, self.direction);
        self.members.insert(id, combatant);
        self.roster.push(id);
        self.active.push(id);
        id
    }

    /// Spawns a projectile. It joins the active list at the next
    /// [`flush_launches`](Self::flush_launches).
    pub fn launch(&mut self, launch: ProjectileLaunch) -> CombatantId {
        let id = self.allocate_id();
        let projectile = Combatant::new_projectile(
            id,
            launch.projectile_type,
            launch.spawner,
            launch.warhead,
            launch.target,
            launch.position,
            launch.direction,
        );
        self.members.insert(id, projectile);
        self.pending.push(id);
        id
    }

    /// Moves buffered projectiles to the front of the active list, most
    /// recently launched first.
    pub fn flush_launches(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let mut active = std::mem::take(&mut self.pending);
        active.reverse();
        active.append(&mut self.active);
        self.active = active;
    }

    /// Drops dead combatants from the active list. Dead projectiles are
    /// removed entirely; dead ships stay on the roster.
    pub fn prune_dead(&mut self) {
        let members = &mut self.members;
        self.active.retain(|id| {
            let (dead, projectile) = members
                .get(id)
                .map_or((true, false), |c| (c.is_dead(), c.is_projectile()));
            if dead && projectile {
                members.remove(id);
            }
            !dead
        });
    }

    /// Adds damage to an allied ship's running total.
    pub fn credit(&mut self, id: CombatantId, amount: f64) {
        if let Some(combatant) = self.members.get_mut(&id) {
            combatant.credit(amount);
        }
    }

    /// Counts a survived repetition for every living roster ship.
    pub fn record_survivors(&mut self) {
        for id in &self.roster {
            if let Some(ship) = self.members.get_mut(id) {
                if !ship.is_dead() {
                    ship.mark_survived();
                }
            }
        }
    }

    /// Prepares for another repetition: projectiles are discarded, roster
    /// ships are restored and the active list is rebuilt from the roster.
    pub fn reset(&mut self) {
        self.members.retain(|_, c| !c.is_projectile());
        for ship in self.members.values_mut() {
            ship.reset();
        }
        self.pending.clear();
        self.active.clone_from(&self.roster);
        self.next_serial = u32::try_from(self.roster.len()).unwrap_or(u32::MAX);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Owning side.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a member.
    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.members.get(&id)
    }

    /// Looks up a member mutably.
    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.members.get_mut(&id)
    }

    /// Active ids in acting order.
    #[must_use]
    pub fn active_ids(&self) -> &[CombatantId] {
        &self.active
    }

    /// Active combatants in acting order.
    pub fn active(&self) -> impl Iterator<Item = &Combatant> {
        self.active.iter().filter_map(|id| self.members.get(id))
    }

    /// Roster ships in enlistment order.
    pub fn roster(&self) -> impl Iterator<Item = &Combatant> {
        self.roster.iter().filter_map(|id| self.members.get(id))
    }

    /// Number of roster ships.
    #[must_use]
    pub fn roster_len(&self) -> usize {
        self.roster.len()
    }

    /// Returns true once nothing on this side is left to act.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.active.is_empty()
    }
}
