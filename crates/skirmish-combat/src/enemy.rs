//! Enemy AI controller.
//!
//! A three-state reactive loop driven by distance to the player: idle
//! until the player comes within chase range, chase until within attack
//! range, then attack through the shared combo resolver (its cooldown gate
//! throttles the per-frame attempts). Being hit forces the enemy back into
//! the chase — there is no stun window; unlike the player, the enemy may
//! attack again on the very next frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skirmish_common::{flatten, forward_to_yaw, lerp_angle};
use std::fmt;

use crate::actor::ActorFrame;
use crate::motion::{MotionBackend, GROUNDED_FALL_VELOCITY};

/// Enemy behavior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    /// Standing still, waiting for the player to come close.
    Idle,
    /// Moving toward the player.
    Chasing,
    /// In range, swinging at the player.
    Attacking,
}

impl fmt::Display for AiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Chasing => write!(f, "Chasing"),
            Self::Attacking => write!(f, "Attacking"),
        }
    }
}

impl AiState {
    /// Next state for a given distance to the player.
    #[must_use]
    pub fn transition(self, distance: f32, config: &EnemyConfig) -> Self {
        match self {
            Self::Idle if distance < config.chase_range => Self::Chasing,
            Self::Chasing if distance < config.attack_range => Self::Attacking,
            Self::Attacking if distance > config.attack_range => Self::Chasing,
            state => state,
        }
    }
}

/// Tuning for the enemy controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// Chase movement speed.
    pub move_speed: f32,
    /// Distance at which the enemy starts chasing.
    pub chase_range: f32,
    /// Distance at which the enemy starts attacking.
    pub attack_range: f32,
    /// Turn rate while chasing (fraction of the remaining angle per second).
    pub turn_speed: f32,
    /// Gravity acceleration (negative = down).
    pub gravity: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            chase_range: 10.0,
            attack_range: 2.0,
            turn_speed: 8.0,
            gravity: -9.81,
        }
    }
}

impl EnemyConfig {
    /// Creates the reference tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chase movement speed.
    #[must_use]
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Sets the chase trigger range.
    #[must_use]
    pub fn with_chase_range(mut self, range: f32) -> Self {
        self.chase_range = range;
        self
    }

    /// Sets the attack trigger range.
    #[must_use]
    pub fn with_attack_range(mut self, range: f32) -> Self {
        self.attack_range = range;
        self
    }
}

/// Per-frame combat logic for an enemy actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyAi {
    config: EnemyConfig,
    state: AiState,
}

impl EnemyAi {
    /// Creates an idle controller with the given tuning.
    #[must_use]
    pub fn new(config: EnemyConfig) -> Self {
        Self {
            config,
            state: AiState::Idle,
        }
    }

    /// Current behavior state.
    #[must_use]
    pub fn state(&self) -> AiState {
        self.state
    }

    /// The controller's tuning.
    #[must_use]
    pub fn config(&self) -> &EnemyConfig {
        &self.config
    }

    /// Hit reaction: wake up and close back in, whatever was in progress.
    ///
    /// Returns the state change for event reporting. Strike cancellation
    /// and cue cleanup happen in the actor composite's shared hit path.
    pub fn on_hit(&mut self) -> Option<(AiState, AiState)> {
        let previous = self.state;
        self.state = AiState::Chasing;
        (previous != self.state).then_some((previous, self.state))
    }

    /// Runs one frame of enemy logic. Caller guarantees the actor is alive.
    ///
    /// `player_position` is None when no living player exists; the enemy
    /// degrades to idle. Returns the state change, if any, for event
    /// reporting.
    pub fn tick<M: MotionBackend>(
        &mut self,
        frame: &mut ActorFrame<'_>,
        player_position: Option<Vec3>,
        motion: &mut M,
        now: f32,
        dt: f32,
    ) -> Option<(AiState, AiState)> {
        let previous = self.state;

        let Some(player_position) = player_position else {
            frame.animation.set_speed(0.0);
            self.state = AiState::Idle;
            return (previous != self.state).then_some((previous, self.state));
        };

        self.apply_gravity(frame, motion, dt);

        let distance = frame.position.distance(player_position);
        match self.state {
            AiState::Idle => frame.animation.set_speed(0.0),
            AiState::Chasing => {
                frame.animation.set_speed(1.0);
                self.chase(frame, player_position, motion, dt);
            }
            AiState::Attacking => {
                frame.animation.set_speed(0.0);
                if distance <= self.config.attack_range {
                    // the cooldown gate inside the attacker throttles this
                    frame.attacker.try_attack(now, frame.animation);
                }
            }
        }
        self.state = self.state.transition(distance, &self.config);

        (previous != self.state).then_some((previous, self.state))
    }

    fn apply_gravity<M: MotionBackend>(
        &mut self,
        frame: &mut ActorFrame<'_>,
        motion: &mut M,
        dt: f32,
    ) {
        if motion.is_grounded(frame.id, *frame.position) && *frame.vertical_velocity < 0.0 {
            *frame.vertical_velocity = GROUNDED_FALL_VELOCITY;
        }
        *frame.vertical_velocity += self.config.gravity * dt;
        *frame.position = motion.move_actor(
            frame.id,
            *frame.position,
            Vec3::new(0.0, *frame.vertical_velocity * dt, 0.0),
        );
    }

    fn chase<M: MotionBackend>(
        &mut self,
        frame: &mut ActorFrame<'_>,
        player_position: Vec3,
        motion: &mut M,
        dt: f32,
    ) {
        let to_player = flatten(player_position - *frame.position);
        if to_player.length_squared() <= f32::EPSILON {
            return;
        }
        let direction = to_player.normalize();
        *frame.yaw = lerp_angle(
            *frame.yaw,
            forward_to_yaw(direction),
            (self.config.turn_speed * dt).min(1.0),
        );
        *frame.position = motion.move_actor(
            frame.id,
            *frame.position,
            direction * self.config.move_speed * dt,
        );
    }
}
