//! Per-actor damage and death state.
//!
//! Health only ever decreases; there is no healing. Death happens exactly
//! once, when health first reaches zero. The owning actor composite routes
//! the [`DamageOutcome`] of each hit to its single subscriber (the actor's
//! controller, and on death the ragdoll rig).

use serde::{Deserialize, Serialize};

/// Result of applying damage to a [`Health`].
///
/// A single `take_damage` call reports exactly one outcome: a hit is either
/// ignored (already dead), non-lethal, or lethal — never two of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// The actor was already dead; nothing changed.
    Ignored,
    /// A non-lethal hit landed.
    Damaged,
    /// The hit reduced health to zero. Reported exactly once per actor.
    Died,
}

/// Health pool for an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    max: f32,
    current: f32,
}

impl Health {
    /// Creates a full health pool. `max` must be positive.
    #[must_use]
    pub fn new(max: f32) -> Self {
        debug_assert!(max > 0.0, "health pool must start positive");
        Self { max, current: max }
    }

    /// Applies damage, floored at zero. `amount` must be positive.
    ///
    /// No-op once dead: a dead actor ignores all further damage.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        debug_assert!(amount > 0.0, "damage must be positive");
        if self.current <= 0.0 {
            return DamageOutcome::Ignored;
        }

        self.current = (self.current - amount).max(0.0);

        if self.current == 0.0 {
            DamageOutcome::Died
        } else {
            DamageOutcome::Damaged
        }
    }

    /// Returns whether the actor is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Current health value.
    #[must_use]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Maximum health value.
    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Remaining health as a fraction in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        (self.current / self.max).clamp(0.0, 1.0)
    }
}
