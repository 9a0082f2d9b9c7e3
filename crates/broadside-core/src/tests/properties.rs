//! Damage invariants under arbitrary ship stats and hit sequences.

use proptest::prelude::*;

use crate::entity::{Combatant, CombatantId, Side};

use super::helpers::defended_ship;

fn defences() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (1.0..5_000.0, 0.0..2_000.0, 0.0..50.0, 0.0..200.0)
}

fn hits() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0..1_000.0, 0.0..100.0), 1..40)
}

proptest! {
    #[test]
    fn pools_stay_within_bounds(
        (hull, shield, mitigation, armor) in defences(),
        sequence in hits(),
    ) {
        let ship = defended_ship("target", hull, shield, mitigation, armor);
        let mut c = Combatant::new_ship(CombatantId::new(Side::B, 0), ship, 0.0, 1.0);

        for (damage, penetration) in sequence {
            c.take_damage(damage, penetration);
            prop_assert!(c.hull() >= 0.0 && c.hull() <= hull);
            prop_assert!(c.shield() >= 0.0 && c.shield() <= shield);
            prop_assert_eq!(c.is_dead(), c.hull() <= 0.0);
        }
    }

    #[test]
    fn dealt_never_exceeds_remaining_pools(
        (hull, shield, mitigation, armor) in defences(),
        sequence in hits(),
    ) {
        let ship = defended_ship("target", hull, shield, mitigation, armor);
        let mut c = Combatant::new_ship(CombatantId::new(Side::B, 0), ship, 0.0, 1.0);

        for (damage, penetration) in sequence {
            let before = c.hull() + c.shield();
            let dealt = c.take_damage(damage, penetration);
            let after = c.hull() + c.shield();
            prop_assert!(dealt >= 0.0);
            prop_assert!(dealt <= damage + 1e-9);
            prop_assert!(dealt <= before + 1e-9);
            prop_assert!((before - after - dealt).abs() < 1e-6);
        }
    }

    #[test]
    fn tanked_only_grows(
        (hull, shield, mitigation, armor) in defences(),
        sequence in hits(),
    ) {
        let ship = defended_ship("target", hull, shield, mitigation, armor);
        let mut c = Combatant::new_ship(CombatantId::new(Side::B, 0), ship, 0.0, 1.0);

        let mut previous = c.tanked();
        for (damage, penetration) in sequence {
            c.take_damage(damage, penetration);
            prop_assert!(c.tanked() >= previous);
            previous = c.tanked();
        }
    }
}
