//! Firing, damage resolution and the per-tick action protocol.
//!
//! A combatant never touches its own fleet while acting. Anything that must
//! land on the acting side (new projectiles, damage credited to a spawner)
//! is returned in an [`ActionOutcome`] for the engagement to apply.
//!
//! # Damage model
//!
//! ```text
//! tanked += damage
//! if shield > 0:
//!     absorbed = max(0, damage - mitigation)
//!     shield  -= absorbed            (overflow below zero spills to hull)
//! hull -= overflow / (1 + 0.01 * max(0, armor - armor_penetration))
//! ```
//!
//! The returned damage counts what actually came off shield and hull, never
//! overkill.

use std::sync::Arc;

use rand::Rng;

use crate::catalog::{ProjectileType, WeaponKind, WeaponType};
use crate::entity::{warhead, Combatant, CombatantId};
use crate::fleet::Fleet;
use crate::trace::{BattleEvent, TraceSink};

// =============================================================================
// Action Protocol
// =============================================================================

/// Per-tick inputs shared by every acting combatant.
#[derive(Clone, Copy)]
pub struct ActionContext<'a> {
    /// Zero-based tick within the repetition.
    pub tick: u64,
    /// Simulated milliseconds per tick.
    pub tick_interval_ms: u32,
    /// Event receiver.
    pub sink: &'a dyn TraceSink,
}

impl<'a> ActionContext<'a> {
    /// Creates a context.
    #[must_use]
    pub fn new(tick: u64, tick_interval_ms: u32, sink: &'a dyn TraceSink) -> Self {
        Self {
            tick,
            tick_interval_ms,
            sink,
        }
    }

    pub(crate) fn emit(&self, event: &BattleEvent) {
        self.sink.record(self.tick, event);
    }

    pub(crate) fn tick_ms(&self) -> f64 {
        f64::from(self.tick_interval_ms)
    }
}

impl std::fmt::Debug for ActionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionContext")
            .field("tick", &self.tick)
            .field("tick_interval_ms", &self.tick_interval_ms)
            .finish_non_exhaustive()
    }
}

/// Request to spawn one projectile on the acting side.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileLaunch {
    /// Ship credited with the projectile's damage.
    pub spawner: CombatantId,
    /// Enemy the projectile is locked onto.
    pub target: CombatantId,
    /// Projectile definition.
    pub projectile_type: Arc<ProjectileType>,
    /// Warhead shared by the whole salvo.
    pub warhead: Arc<WeaponType>,
    /// Spawn position (the spawner's position).
    pub position: f64,
    /// Spawn facing (the spawner's facing).
    pub direction: f64,
}

/// Effects of one action on the acting combatant's own fleet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionOutcome {
    /// Projectiles to add, in firing order.
    pub launches: Vec<ProjectileLaunch>,
    /// Damage to credit to allied ships.
    pub credits: Vec<(CombatantId, f64)>,
}

impl Combatant {
    /// Takes this combatant's turn against `enemies`.
    ///
    /// Ships select targets, close distance if any targeted weapon is out of
    /// reach, then fire or reload every weapon. Projectiles detonate on their
    /// target or fizzle, and expire either way.
    pub fn act<R: Rng + ?Sized>(
        &mut self,
        enemies: &mut Fleet,
        ctx: &ActionContext<'_>,
        rng: &mut R,
    ) -> ActionOutcome {
        if self.is_projectile() {
            return self.detonate(enemies, ctx);
        }

        let mut outcome = ActionOutcome::default();
        if self.select_target(enemies, ctx, rng) {
            self.move_to_target(enemies, ctx);
        }
        self.attack(enemies, ctx, &mut outcome);
        self.lifetime_ticks += 1;
        outcome
    }

    // =========================================================================
    // Damage
    // =========================================================================

    /// Applies a hit and returns the damage that landed.
    ///
    /// A combatant that is already dead is not hit again.
    pub fn take_damage(&mut self, damage: f64, armor_penetration: f64) -> f64 {
        if self.is_dead {
            return 0.0;
        }
        self.tanked += damage;

        let mut remaining = damage;
        let mut dealt = 0.0;

        if self.shield > 0.0 {
            let absorbed = (remaining - self.mitigation()).max(0.0);
            dealt += absorbed.min(self.shield);
            self.shield -= absorbed;
            remaining = 0.0;
            if self.shield < 0.0 {
                remaining = -self.shield;
                self.shield = 0.0;
            }
        }

        if remaining > 0.0 {
            let effective_armor = (self.armor() - armor_penetration).max(0.0);
            let after_armor = remaining / (1.0 + 0.01 * effective_armor);
            self.hull -= after_armor;
            dealt += if self.hull < 0.0 {
                (after_armor + self.hull).max(0.0)
            } else {
                after_armor
            };
        }

        if self.hull <= 0.0 {
            self.hull = 0.0;
            self.is_dead = true;
        }
        dealt
    }

    // =========================================================================
    // Firing
    // =========================================================================

    /// Fires every loaded weapon whose target is alive and in range, and
    /// reloads the rest.
    ///
    /// A weapon that is loaded but has nothing to shoot keeps its cooldown
    /// where it is.
    pub fn attack(&mut self, enemies: &mut Fleet, ctx: &ActionContext<'_>, outcome: &mut ActionOutcome) {
        let tick_ms = ctx.tick_ms();

        for (index, state) in self.weapons.iter_mut().enumerate() {
            if !state.is_loaded() {
                state.cooldown_remaining -= tick_ms;
                continue;
            }
            let Some(target) = state.target.and_then(|id| enemies.get_mut(id)) else {
                continue;
            };
            let weapon = Arc::clone(state.weapon());
            if target.is_dead || (self.position - target.position).abs() > weapon.range {
                continue;
            }

            match (weapon.kind, &weapon.projectile) {
                (WeaponKind::Projectile, Some(projectile_type)) => {
                    let head = Arc::new(warhead(&weapon, weapon.damage_per_projectile()));
                    for _ in 0..weapon.salvo_size {
                        outcome.launches.push(ProjectileLaunch {
                            spawner: self.id,
                            target: target.id,
                            projectile_type: Arc::clone(projectile_type),
                            warhead: Arc::clone(&head),
                            position: self.position,
                            direction: self.direction,
                        });
                    }
                }
                _ => {
                    let dealt = strike(target, weapon.damage, weapon.armor_penetration, ctx);
                    self.dealt += dealt;
                    ctx.emit(&BattleEvent::WeaponFired {
                        combatant: self.id,
                        weapon: index,
                        target: target.id,
                        dealt,
                    });
                }
            }
            state.cooldown_remaining += weapon.cooldown_secs * 1000.0;
        }
    }

    fn detonate(&mut self, enemies: &mut Fleet, ctx: &ActionContext<'_>) -> ActionOutcome {
        let mut outcome = ActionOutcome::default();

        let payload = self
            .weapons
            .first()
            .and_then(|state| state.target.map(|id| (id, Arc::clone(state.weapon()))));
        let strike_target = payload.and_then(|(id, head)| {
            enemies
                .get_mut(id)
                .filter(|target| !target.is_dead)
                .map(|target| (target, head))
        });

        match strike_target {
            Some((target, head)) => {
                let dealt = strike(target, head.damage, head.armor_penetration, ctx);
                if let Some(spawner) = self.spawner() {
                    outcome.credits.push((spawner, dealt));
                }
                ctx.emit(&BattleEvent::Detonated {
                    projectile: self.id,
                    target: target.id,
                    dealt,
                });
            }
            None => ctx.emit(&BattleEvent::Fizzled { projectile: self.id }),
        }

        self.hull = 0.0;
        self.is_dead = true;
        self.lifetime_ticks += 1;
        outcome
    }
}

/// Hits `target` and reports the result.
fn strike(target: &mut Combatant, damage: f64, armor_penetration: f64, ctx: &ActionContext<'_>) -> f64 {
    let dealt = target.take_damage(damage, armor_penetration);
    ctx.emit(&BattleEvent::DamageTaken {
        combatant: target.id,
        shield: target.shield,
        hull: target.hull,
    });
    if target.is_dead {
        ctx.emit(&BattleEvent::Destroyed {
            combatant: target.id,
        });
    }
    dealt
}
