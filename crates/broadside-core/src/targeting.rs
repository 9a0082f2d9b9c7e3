//! Per-weapon target selection.
//!
//! Each weapon picks from the enemy's active, living combatants that its
//! target filter accepts, preferring those already in range. Candidates are
//! shuffled before scoring so equal-priority targets spread across weapons;
//! a candidate replaces the current target only with a strictly higher
//! score, so a lock survives as long as its target lives.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::AcquisitionLogic;
use crate::combat::ActionContext;
use crate::entity::{Combatant, CombatantInner};
use crate::fleet::Fleet;
use crate::trace::BattleEvent;

impl Combatant {
    /// Refreshes every weapon's target and returns whether a primary target
    /// exists.
    ///
    /// Weapon 0 sets the ship's primary target. Projectiles never re-acquire.
    pub fn select_target<R: Rng + ?Sized>(
        &mut self,
        enemies: &Fleet,
        ctx: &ActionContext<'_>,
        rng: &mut R,
    ) -> bool {
        let ship = match &self.inner {
            CombatantInner::Ship(ship) => Arc::clone(ship),
            CombatantInner::Projectile { .. } => return self.target.is_some(),
        };

        for index in 0..self.weapons.len() {
            let weapon = Arc::clone(self.weapons[index].weapon());

            if index > 0 && weapon.logic == AcquisitionLogic::OrderTargetOnly {
                let (target, priority) = (self.weapons[0].target, self.weapons[0].target_priority);
                let state = &mut self.weapons[index];
                state.target = target;
                state.target_priority = priority;
                continue;
            }

            let mut candidates: Vec<&Combatant> = enemies
                .active()
                .filter(|enemy| !enemy.is_dead() && weapon.target_filter.matches(enemy.category()))
                .collect();
            if candidates
                .iter()
                .any(|enemy| self.distance_to(enemy) <= weapon.range)
            {
                candidates.retain(|enemy| self.distance_to(enemy) <= weapon.range);
            }
            if weapon.logic == AcquisitionLogic::BestTargetInRange {
                if let Some(primary) = self.target {
                    candidates.retain(|enemy| enemy.id() != primary);
                }
            }
            candidates.shuffle(rng);

            let state = &mut self.weapons[index];
            let lock_lost = state
                .target
                .map_or(true, |id| enemies.get(id).map_or(true, Combatant::is_dead));
            if lock_lost {
                state.clear_target();
            }

            let previous = state.target;
            for candidate in candidates {
                let priority = ship.ai.score(candidate.attack_target());
                if priority > state.target_priority {
                    state.target = Some(candidate.id());
                    state.target_priority = priority;
                }
            }
            if let Some(target) = state.target.filter(|t| Some(*t) != previous) {
                ctx.emit(&BattleEvent::TargetAcquired {
                    combatant: self.id,
                    weapon: index,
                    target,
                    priority: state.target_priority,
                });
            }

            if index == 0 {
                self.target = state.target;
                self.target_priority = state.target_priority;
            }
        }

        self.target.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::catalog::{AttackTarget, TargetTypes, WeaponType};
    use crate::entity::{CombatantId, Side};
    use crate::tests::helpers::{direct_weapon, seeded_rng, ship_type_with};
    use crate::trace::NullSink;

    fn weapon_with(range: f64, logic: AcquisitionLogic, filter: TargetTypes) -> Arc<WeaponType> {
        let mut weapon = (*direct_weapon("gun", 1.0, range, 1.0)).clone();
        weapon.logic = logic;
        weapon.target_filter = filter;
        Arc::new(weapon)
    }

    fn shooter(weapons: Vec<Arc<WeaponType>>) -> Combatant {
        let ship = ship_type_with("shooter", weapons, |ship| {
            ship.ai.priority_bonus = BTreeMap::from([("cruiser".to_string(), 10.0)]);
        });
        Combatant::new_ship(CombatantId::new(Side::A, 0), ship, 0.0, 1.0)
    }

    fn enemy_fleet(entries: &[(f64, TargetTypes, &str)]) -> Fleet {
        let mut fleet = Fleet::new(Side::B, "enemy", 0.0, 1.0);
        for (position, category, tag) in entries {
            let ship = ship_type_with("enemy", Vec::new(), |ship| {
                ship.category = *category;
                ship.attack_target = AttackTarget {
                    base_priority: 1.0,
                    tags: vec![(*tag).to_string()],
                };
            });
            let id = fleet.enlist(ship);
            fleet.get_mut(id).unwrap().position = *position;
        }
        fleet
    }

    fn select(c: &mut Combatant, enemies: &Fleet, seed: u64) -> bool {
        let sink = NullSink;
        c.select_target(enemies, &ActionContext::new(0, 100, &sink), &mut seeded_rng(seed))
    }

    #[test]
    fn prefers_in_range_candidates() {
        let enemies = enemy_fleet(&[
            (5_000.0, TargetTypes::CRUISER, "cruiser"),
            (100.0, TargetTypes::FRIGATE, "frigate"),
        ]);
        let mut c = shooter(vec![weapon_with(500.0, AcquisitionLogic::default(), TargetTypes::all())]);
        assert!(select(&mut c, &enemies, 3));
        assert_eq!(c.target(), Some(CombatantId::new(Side::B, 1)));
        assert_eq!(c.target_priority(), 1.0);
    }

    #[test]
    fn falls_back_to_whole_fleet_and_scores_bonuses() {
        let enemies = enemy_fleet(&[
            (5_000.0, TargetTypes::FRIGATE, "frigate"),
            (6_000.0, TargetTypes::CRUISER, "cruiser"),
        ]);
        let mut c = shooter(vec![weapon_with(500.0, AcquisitionLogic::default(), TargetTypes::all())]);
        assert!(select(&mut c, &enemies, 3));
        assert_eq!(c.target(), Some(CombatantId::new(Side::B, 1)));
        assert_eq!(c.target_priority(), 11.0);
    }

    #[test]
    fn filter_excludes_categories() {
        let enemies = enemy_fleet(&[(100.0, TargetTypes::CRUISER, "cruiser")]);
        let mut c = shooter(vec![weapon_with(
            500.0,
            AcquisitionLogic::default(),
            TargetTypes::STRIKECRAFT | TargetTypes::TORPEDO,
        )]);
        assert!(!select(&mut c, &enemies, 3));
        assert_eq!(c.weapons()[0].target_priority(), f64::NEG_INFINITY);
    }

    #[test]
    fn order_target_only_mirrors_primary() {
        let enemies = enemy_fleet(&[
            (100.0, TargetTypes::FRIGATE, "frigate"),
            (100.0, TargetTypes::CRUISER, "cruiser"),
        ]);
        let mut c = shooter(vec![
            weapon_with(500.0, AcquisitionLogic::default(), TargetTypes::FRIGATE),
            weapon_with(500.0, AcquisitionLogic::OrderTargetOnly, TargetTypes::CRUISER),
        ]);
        select(&mut c, &enemies, 5);
        assert_eq!(c.weapons()[1].target(), c.target());
        assert_eq!(c.weapons()[1].target(), Some(CombatantId::new(Side::B, 0)));
    }

    #[test]
    fn best_target_in_range_avoids_primary() {
        let enemies = enemy_fleet(&[
            (100.0, TargetTypes::CRUISER, "cruiser"),
            (100.0, TargetTypes::FRIGATE, "frigate"),
        ]);
        let mut c = shooter(vec![
            weapon_with(500.0, AcquisitionLogic::default(), TargetTypes::all()),
            weapon_with(500.0, AcquisitionLogic::BestTargetInRange, TargetTypes::all()),
        ]);
        select(&mut c, &enemies, 5);
        assert_eq!(c.target(), Some(CombatantId::new(Side::B, 0)));
        assert_eq!(c.weapons()[1].target(), Some(CombatantId::new(Side::B, 1)));
    }

    #[test]
    fn dead_lock_is_dropped() {
        let mut enemies = enemy_fleet(&[
            (100.0, TargetTypes::CRUISER, "cruiser"),
            (100.0, TargetTypes::FRIGATE, "frigate"),
        ]);
        let mut c = shooter(vec![weapon_with(500.0, AcquisitionLogic::default(), TargetTypes::all())]);
        select(&mut c, &enemies, 1);
        assert_eq!(c.target(), Some(CombatantId::new(Side::B, 0)));

        enemies
            .get_mut(CombatantId::new(Side::B, 0))
            .unwrap()
            .take_damage(1e9, 0.0);
        select(&mut c, &enemies, 1);
        assert_eq!(c.target(), Some(CombatantId::new(Side::B, 1)));
        assert_eq!(c.target_priority(), 1.0);
    }

    #[test]
    fn repeated_selection_is_stable() {
        let enemies = enemy_fleet(&[
            (100.0, TargetTypes::FRIGATE, "frigate"),
            (100.0, TargetTypes::FRIGATE, "frigate"),
            (100.0, TargetTypes::FRIGATE, "frigate"),
        ]);
        let mut c = shooter(vec![weapon_with(500.0, AcquisitionLogic::default(), TargetTypes::all())]);
        select(&mut c, &enemies, 11);
        let first = c.target();
        for seed in 0..8 {
            select(&mut c, &enemies, seed);
            assert_eq!(c.target(), first);
        }
    }

    #[test]
    fn empty_enemy_fleet_leaves_no_target() {
        let enemies = Fleet::new(Side::B, "none", 0.0, 1.0);
        let mut c = shooter(vec![direct_weapon("gun", 1.0, 10.0, 1.0)]);
        assert!(!select(&mut c, &enemies, 0));
    }
}
