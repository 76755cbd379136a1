//! # Skirmish Combat
//!
//! Real-time combat core for Project Skirmish.
//!
//! This crate provides the shared combat and decision logic for player-
//! and AI-controlled actors:
//! - Health tracking with damage/death outcomes
//! - Combo-based melee attacks with delayed strike resolution
//! - Cone-constrained spatial hit detection over a volume registry
//! - Player controller with soft-lock targeting, jump and landing
//! - Enemy AI with a three-state reactive loop
//! - Animated-to-ragdoll death transition
//! - Frame-stepped simulation loop and combat event bus
//!
//! Animation playback, movement collision response and rigid-body
//! simulation stay on the host side of the [`animation`], [`motion`] and
//! [`ragdoll`] boundaries.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actor;
pub mod animation;
pub mod enemy;
pub mod events;
pub mod health;
pub mod input;
pub mod motion;
pub mod player;
pub mod ragdoll;
pub mod simulation;
pub mod spatial;
pub mod strike;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actor::*;
    pub use crate::animation::*;
    pub use crate::enemy::*;
    pub use crate::events::*;
    pub use crate::health::*;
    pub use crate::input::*;
    pub use crate::motion::*;
    pub use crate::player::*;
    pub use crate::ragdoll::*;
    pub use crate::simulation::*;
    pub use crate::spatial::*;
    pub use crate::strike::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_kill_flow_end_to_end() {
        let mut sim = Simulation::new();
        let mut ground = FlatGround::default();

        let player = sim
            .spawn_player(ActorSpawn::player(Vec3::ZERO), PlayerConfig::default())
            .expect("player spawn");
        let enemy = sim.spawn_enemy(
            ActorSpawn::enemy(Vec3::new(0.0, 0.0, 1.2))
                .with_health(25.0)
                .with_strike(StrikeConfig::enemy()),
            EnemyConfig::default().with_move_speed(0.0).with_attack_range(0.0),
        );

        let mut killed_at = None;
        for frame in 0..60 {
            let input = if frame == 0 {
                CombatInput::idle().with_attack()
            } else {
                CombatInput::idle()
            };
            sim.advance(&input, &mut ground, simulation::FIXED_TIMESTEP);
            if killed_at.is_none() && !sim.is_alive(enemy) {
                killed_at = Some(frame);
            }
        }

        assert!(killed_at.is_some(), "one strike kills a 25 hp enemy");
        assert!(sim.is_alive(player));
        assert!(sim
            .drain_events()
            .contains(&CombatEvent::ActorDied {
                actor: enemy,
                source: Some(player)
            }));
    }

    #[test]
    fn test_ragdoll_flags_visible_to_host_after_death() {
        let mut sim = Simulation::new();
        let rig = RagdollRig::new()
            .with_part(RigPart::new("pelvis").excluded())
            .with_part(RigPart::new("spine"))
            .with_part(RigPart::new("head"));
        let enemy = sim.spawn_enemy(
            ActorSpawn::enemy(Vec3::ZERO).with_health(10.0).with_rig(rig),
            EnemyConfig::default(),
        );

        sim.damage(enemy, 10.0).expect("known actor");

        let actor = sim.actor(enemy).expect("actor");
        assert_eq!(actor.rig.mode(), RigMode::Ragdolled);
        assert!(actor.rig.parts().iter().all(|part| part.simulated));
        assert!(!actor.rig.parts()[0].volume_enabled);
        assert!(actor.rig.parts()[1].volume_enabled);
        assert!(!actor.animation.is_enabled());
    }
}
