//! Live per-weapon state.

use std::sync::Arc;

use crate::catalog::{AcquisitionLogic, TargetTypes, WeaponKind, WeaponType};

use super::CombatantId;

/// A mounted weapon's target lock and reload timer.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponState {
    weapon: Arc<WeaponType>,
    pub(crate) target: Option<CombatantId>,
    pub(crate) target_priority: f64,
    /// Milliseconds until the weapon can fire again. May dip below zero
    /// between firing events since ticks are not infinitely small.
    pub(crate) cooldown_remaining: f64,
}

impl WeaponState {
    /// Mounts a loaded weapon with no target.
    #[must_use]
    pub fn new(weapon: Arc<WeaponType>) -> Self {
        Self {
            weapon,
            target: None,
            target_priority: f64::NEG_INFINITY,
            cooldown_remaining: 0.0,
        }
    }

    /// Drops the target lock.
    pub fn clear_target(&mut self) {
        self.target = None;
        self.target_priority = f64::NEG_INFINITY;
    }

    /// Reloads and clears the target.
    pub fn reset(&mut self) {
        self.clear_target();
        self.cooldown_remaining = 0.0;
    }

    /// Weapon definition.
    #[must_use]
    pub fn weapon(&self) -> &Arc<WeaponType> {
        &self.weapon
    }

    /// Current target.
    #[must_use]
    pub const fn target(&self) -> Option<CombatantId> {
        self.target
    }

    /// Score of the current target, or negative infinity with no target.
    #[must_use]
    pub const fn target_priority(&self) -> f64 {
        self.target_priority
    }

    /// Milliseconds of reload left.
    #[must_use]
    pub const fn cooldown_remaining(&self) -> f64 {
        self.cooldown_remaining
    }

    /// Returns true if the weapon can fire this tick.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }
}

/// Builds the single weapon a projectile carries.
///
/// The warhead has zero range and deals `damage` with the launcher's armor
/// penetration. One warhead is shared by every projectile of a salvo.
#[must_use]
pub fn warhead(launcher: &WeaponType, damage: f64) -> WeaponType {
    WeaponType {
        name: format!("{}_warhead", launcher.name),
        cooldown_secs: 0.0,
        range: 0.0,
        armor_penetration: launcher.armor_penetration,
        damage,
        kind: WeaponKind::DirectFire,
        logic: AcquisitionLogic::default(),
        target_filter: TargetTypes::all(),
        salvo_size: 1,
        projectile: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Side;
    use crate::tests::helpers::direct_weapon;

    #[test]
    fn reset_reloads_and_unlocks() {
        let mut state = WeaponState::new(direct_weapon("gun", 5.0, 100.0, 2.0));
        state.target = Some(CombatantId::new(Side::B, 0));
        state.target_priority = 4.0;
        state.cooldown_remaining = 1500.0;
        assert!(!state.is_loaded());

        state.reset();

        assert!(state.is_loaded());
        assert_eq!(state.target(), None);
        assert_eq!(state.target_priority(), f64::NEG_INFINITY);
    }

    #[test]
    fn warhead_keeps_penetration() {
        let mut launcher = (*direct_weapon("lrc_torpedo", 120.0, 6000.0, 10.0)).clone();
        launcher.armor_penetration = 15.0;
        let head = warhead(&launcher, 40.0);
        assert_eq!(head.name, "lrc_torpedo_warhead");
        assert_eq!(head.range, 0.0);
        assert_eq!(head.damage, 40.0);
        assert_eq!(head.armor_penetration, 15.0);
    }
}
