//! Closing distance on the primary target.
//!
//! Ships accelerate linearly from rest, reaching top speed after
//! `1000 * accel_time / tick_ms` ticks of lifetime. A ship holds position as
//! soon as every weapon that has a target can reach the primary target.

use crate::combat::ActionContext;
use crate::entity::Combatant;
use crate::fleet::Fleet;
use crate::trace::BattleEvent;

impl Combatant {
    /// Speed this tick, given the ship's lifetime so far.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn current_speed(&self, tick_interval_ms: u32) -> f64 {
        let ticks_to_max = 1000.0 * self.accel_time() / f64::from(tick_interval_ms);
        let lifetime = self.lifetime_ticks as f64;
        if ticks_to_max <= 0.0 || lifetime >= ticks_to_max {
            self.speed()
        } else {
            self.speed() * lifetime / ticks_to_max
        }
    }

    /// Returns true if every weapon holding a target can reach `distance`.
    #[must_use]
    pub fn all_weapons_reach(&self, distance: f64) -> bool {
        self.weapons
            .iter()
            .filter(|state| state.target().is_some())
            .all(|state| state.weapon().range >= distance)
    }

    /// Advances toward the primary target unless every targeted weapon can
    /// already reach it. Returns whether the ship moved.
    ///
    /// The ship turns to face its target and never overshoots it.
    pub fn move_to_target(&mut self, enemies: &Fleet, ctx: &ActionContext<'_>) -> bool {
        if self.is_projectile() {
            return false;
        }
        let Some(target) = self.target.and_then(|id| enemies.get(id)) else {
            return false;
        };

        let distance = self.distance_to(target);
        if self.all_weapons_reach(distance) {
            return false;
        }

        let offset = target.position() - self.position;
        if offset != 0.0 {
            self.direction = offset.signum();
        }
        let tick_ms = ctx.tick_ms();
        let step = distance.min(self.current_speed(ctx.tick_interval_ms) * tick_ms / 1000.0);
        if step <= 0.0 {
            return false;
        }

        self.position += step * self.direction;
        ctx.emit(&BattleEvent::Moved {
            combatant: self.id,
            position: self.position,
        });
        true
    }
}
