//! Actor composite: everything one combatant exclusively owns.
//!
//! Each actor bundles its health, combo attacker, animation channel,
//! ragdoll rig and controller. Cross-actor interaction happens only
//! through damage application in the simulation; no state here is shared
//! between actors.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skirmish_common::ActorId;

use crate::animation::{AnimationChannel, AnimationCue};
use crate::enemy::{AiState, EnemyAi};
use crate::health::Health;
use crate::player::PlayerController;
use crate::ragdoll::RagdollRig;
use crate::strike::{ComboAttacker, StrikeConfig};

/// Actor archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    /// The input-driven player character.
    Player,
    /// An AI-driven enemy.
    Enemy,
}

/// The controller variant owned by an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Controller {
    /// Player combat controller.
    Player(PlayerController),
    /// Enemy AI controller.
    Enemy(EnemyAi),
}

/// One combatant in the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Unique ID.
    pub id: ActorId,
    /// Archetype.
    pub kind: ActorKind,
    /// World position.
    pub position: Vec3,
    /// Facing yaw in radians (0 faces +Z).
    pub yaw: f32,
    /// Vertical velocity integrated by the controller.
    pub vertical_velocity: f32,
    /// Damage and death state.
    pub health: Health,
    /// Shared combo strike state.
    pub attacker: ComboAttacker,
    /// Outbound animation requests.
    pub animation: AnimationChannel,
    /// Death transition state.
    pub rig: RagdollRig,
    /// Per-frame behavior.
    pub controller: Controller,
    /// False once dead; the simulation stops ticking inactive actors.
    pub active: bool,
}

/// Mutable view of the actor fields a controller works on each frame.
///
/// Splitting the borrow this way lets a controller mutate its actor's
/// transform, attacker and animation while remaining a field of the same
/// actor.
#[derive(Debug)]
pub struct ActorFrame<'a> {
    /// The actor's ID.
    pub id: ActorId,
    /// World position.
    pub position: &'a mut Vec3,
    /// Facing yaw.
    pub yaw: &'a mut f32,
    /// Vertical velocity.
    pub vertical_velocity: &'a mut f32,
    /// Combo strike state.
    pub attacker: &'a mut ComboAttacker,
    /// Animation requests.
    pub animation: &'a mut AnimationChannel,
}

impl Actor {
    /// Splits the actor into a controller-facing frame view plus the
    /// controller itself.
    pub fn split_frame(&mut self) -> (ActorFrame<'_>, &mut Controller) {
        let Self {
            id,
            position,
            yaw,
            vertical_velocity,
            attacker,
            animation,
            controller,
            ..
        } = self;
        (
            ActorFrame {
                id: *id,
                position,
                yaw,
                vertical_velocity,
                attacker,
                animation,
            },
            controller,
        )
    }

    /// The enemy AI state, if this actor is an enemy.
    #[must_use]
    pub fn ai_state(&self) -> Option<AiState> {
        match &self.controller {
            Controller::Enemy(ai) => Some(ai.state()),
            Controller::Player(_) => None,
        }
    }

    /// Shared hit reaction: interrupt whatever the actor is doing.
    ///
    /// Cancels the pending strike, clears queued attack cues, plays the
    /// hit reaction and resets the combo, then lets the controller apply
    /// its own reaction. Returns an AI state change for event reporting.
    pub(crate) fn react_to_hit(&mut self) -> Option<(AiState, AiState)> {
        self.attacker.cancel_pending();
        self.animation.clear_attack_triggers();
        self.animation.play(AnimationCue::Hit);
        self.attacker.reset_combo();

        match &mut self.controller {
            Controller::Player(player) => {
                player.on_hit();
                None
            }
            Controller::Enemy(ai) => ai.on_hit(),
        }
    }

    /// Death transition: silence everything except the ragdoll.
    ///
    /// The pending strike can never resolve after this, the animation
    /// channel stops accepting cues, and the simulation skips the actor
    /// from now on. The rig flips to physically simulated control.
    pub(crate) fn die(&mut self) {
        self.attacker.cancel_pending();
        self.animation.disable();
        self.rig.enable_ragdoll();
        self.active = false;
    }
}

/// Spawn-time description of an actor.
///
/// Carries the flat numeric parameters for one actor instance: transform,
/// health pool, strike tuning and the body volume registered with the
/// spatial index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSpawn {
    /// Spawn position.
    pub position: Vec3,
    /// Spawn yaw.
    pub yaw: f32,
    /// Health pool size.
    pub max_health: f32,
    /// Strike tuning.
    pub strike: StrikeConfig,
    /// Offset of the body volume from the actor origin.
    pub body_offset: Vec3,
    /// Radius of the body volume.
    pub body_radius: f32,
    /// Ragdoll skeleton.
    pub rig: RagdollRig,
}

impl ActorSpawn {
    fn with_strike_defaults(position: Vec3, strike: StrikeConfig) -> Self {
        Self {
            position,
            yaw: 0.0,
            max_health: 100.0,
            strike,
            body_offset: Vec3::new(0.0, 1.0, 0.0),
            body_radius: 0.5,
            rig: RagdollRig::new(),
        }
    }

    /// Spawn description with player-archetype strike tuning.
    #[must_use]
    pub fn player(position: Vec3) -> Self {
        Self::with_strike_defaults(position, StrikeConfig::player())
    }

    /// Spawn description with enemy-archetype strike tuning.
    #[must_use]
    pub fn enemy(position: Vec3) -> Self {
        Self::with_strike_defaults(position, StrikeConfig::enemy())
    }

    /// Sets the spawn yaw.
    #[must_use]
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    /// Sets the health pool size.
    #[must_use]
    pub fn with_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health;
        self
    }

    /// Sets the strike tuning.
    #[must_use]
    pub fn with_strike(mut self, strike: StrikeConfig) -> Self {
        self.strike = strike;
        self
    }

    /// Sets the body volume registered with the spatial index.
    #[must_use]
    pub fn with_body_volume(mut self, offset: Vec3, radius: f32) -> Self {
        self.body_offset = offset;
        self.body_radius = radius;
        self
    }

    /// Sets the ragdoll skeleton.
    #[must_use]
    pub fn with_rig(mut self, rig: RagdollRig) -> Self {
        self.rig = rig;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerConfig;
    use crate::ragdoll::RigMode;

    fn player_actor() -> Actor {
        Actor {
            id: ActorId::new(),
            kind: ActorKind::Player,
            position: Vec3::ZERO,
            yaw: 0.0,
            vertical_velocity: 0.0,
            health: Health::new(100.0),
            attacker: ComboAttacker::new(StrikeConfig::player()),
            animation: AnimationChannel::new(),
            rig: RagdollRig::new(),
            controller: Controller::Player(PlayerController::new(PlayerConfig::default())),
            active: true,
        }
    }

    #[test]
    fn test_hit_reaction_cancels_strike_and_combo() {
        let mut actor = player_actor();
        actor.attacker.try_attack(1.0, &mut actor.animation);
        assert!(actor.attacker.has_pending());
        assert_eq!(actor.attacker.combo(), 1);

        actor.react_to_hit();

        assert!(!actor.attacker.has_pending());
        assert_eq!(actor.attacker.combo(), 0);
        // the queued Attack1 trigger was cleared; the Hit play remains
        let requests = actor.animation.drain();
        assert_eq!(requests.len(), 1);
    }

    #[test]
    fn test_death_disables_everything_but_the_rig() {
        let mut actor = player_actor();
        actor.attacker.try_attack(1.0, &mut actor.animation);
        actor.die();

        assert!(!actor.active);
        assert!(!actor.attacker.has_pending());
        assert!(!actor.animation.is_enabled());
        assert_eq!(actor.rig.mode(), RigMode::Ragdolled);
    }

    #[test]
    fn test_spawn_builder() {
        let spawn = ActorSpawn::enemy(Vec3::new(1.0, 0.0, 2.0))
            .with_health(40.0)
            .with_yaw(1.0);
        assert_eq!(spawn.max_health, 40.0);
        assert_eq!(spawn.strike, StrikeConfig::enemy());
        assert_eq!(spawn.yaw, 1.0);
    }
}
