//! Player combat controller.
//!
//! Per-frame: decay stun, acquire a soft-lock target, blend movement and
//! facing toward it, handle jump and landing, and feed attack presses to
//! the shared combo attacker. Runs only while the actor is alive.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use skirmish_common::{
    flatten, forward_to_yaw, lerp_angle, smooth_damp_angle, yaw_to_forward, ActorId,
};
use std::f32::consts::PI;

use crate::actor::ActorFrame;
use crate::animation::AnimationCue;
use crate::input::CombatInput;
use crate::motion::{MotionBackend, GROUNDED_FALL_VELOCITY};

/// Movement input magnitude required for the landing shortcut.
const LANDING_INPUT_THRESHOLD: f32 = 0.1;

/// A living enemy eligible for soft lock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftLockTarget {
    /// The enemy actor.
    pub id: ActorId,
    /// Its current world position.
    pub position: Vec3,
}

/// Tuning for the player controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Horizontal movement speed.
    pub move_speed: f32,
    /// Smooth time for facing rotation (seconds).
    pub rotation_smooth: f32,
    /// Gravity acceleration (negative = down).
    pub gravity: f32,
    /// Apex height of a jump.
    pub jump_height: f32,
    /// Maximum distance at which an enemy is soft-locked.
    pub soft_lock_range: f32,
    /// Blend factor toward facing the locked target when strafing (0-1).
    pub soft_blend: f32,
    /// Duration attack input stays ignored after being hit.
    pub stun_duration: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            rotation_smooth: 0.1,
            gravity: -9.81,
            jump_height: 1.5,
            soft_lock_range: 6.0,
            soft_blend: 0.7,
            stun_duration: 0.5,
        }
    }
}

impl PlayerConfig {
    /// Creates the reference tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the movement speed.
    #[must_use]
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Sets the soft-lock range.
    #[must_use]
    pub fn with_soft_lock_range(mut self, range: f32) -> Self {
        self.soft_lock_range = range;
        self
    }

    /// Sets the jump apex height.
    #[must_use]
    pub fn with_jump_height(mut self, height: f32) -> Self {
        self.jump_height = height;
        self
    }

    /// Sets the stun duration.
    #[must_use]
    pub fn with_stun_duration(mut self, duration: f32) -> Self {
        self.stun_duration = duration;
        self
    }
}

/// Per-frame combat logic for the player actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerController {
    config: PlayerConfig,
    yaw_velocity: f32,
    stun_timer: f32,
    was_grounded: bool,
}

impl PlayerController {
    /// Creates a controller with the given tuning.
    #[must_use]
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            yaw_velocity: 0.0,
            stun_timer: 0.0,
            was_grounded: true,
        }
    }

    /// The controller's tuning.
    #[must_use]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Remaining stun time; attack input is ignored while positive.
    #[must_use]
    pub fn stun_remaining(&self) -> f32 {
        self.stun_timer
    }

    /// Hit reaction: start the stun window.
    ///
    /// Strike cancellation and cue cleanup happen in the actor composite's
    /// shared hit path.
    pub fn on_hit(&mut self) {
        self.stun_timer = self.config.stun_duration;
    }

    /// Nearest living enemy within soft-lock range, if any.
    ///
    /// Recomputed from scratch every frame; there is no hysteresis.
    #[must_use]
    pub fn acquire_target(
        &self,
        position: Vec3,
        enemies: &[SoftLockTarget],
    ) -> Option<SoftLockTarget> {
        let mut best = self.config.soft_lock_range * self.config.soft_lock_range;
        let mut found = None;
        for target in enemies {
            let distance_squared = (target.position - position).length_squared();
            if distance_squared < best {
                best = distance_squared;
                found = Some(*target);
            }
        }
        found
    }

    /// Runs one frame of player logic. Caller guarantees the actor is alive.
    pub fn tick<M: MotionBackend>(
        &mut self,
        frame: &mut ActorFrame<'_>,
        input: &CombatInput,
        enemies: &[SoftLockTarget],
        motion: &mut M,
        now: f32,
        dt: f32,
    ) {
        self.stun_timer = (self.stun_timer - dt).max(0.0);

        let target = self.acquire_target(*frame.position, enemies);
        let input_direction = normalize_or_zero(input.movement);

        self.update_movement(frame, input, input_direction, target, motion, dt);
        self.update_landing(frame, input_direction, motion);
        self.update_jump(frame, input, motion);
        self.update_attack(frame, input, now);
    }

    fn update_movement<M: MotionBackend>(
        &mut self,
        frame: &mut ActorFrame<'_>,
        input: &CombatInput,
        input_direction: Vec2,
        target: Option<SoftLockTarget>,
        motion: &mut M,
        dt: f32,
    ) {
        if motion.is_grounded(frame.id, *frame.position) && *frame.vertical_velocity < 0.0 {
            *frame.vertical_velocity = GROUNDED_FALL_VELOCITY;
        }
        *frame.vertical_velocity += self.config.gravity * dt;

        frame.animation.set_speed(input_direction.length());

        if input_direction.length_squared() > 0.01 {
            let mut wish_yaw = input_direction.x.atan2(input_direction.y) + input.camera_yaw;

            if let Some(target) = target {
                let to_target = flatten(target.position - *frame.position);
                if to_target.length_squared() > f32::EPSILON {
                    let target_yaw = forward_to_yaw(to_target);
                    // moving mostly along the target axis snaps fully onto it;
                    // strafing only blends partway
                    wish_yaw = if input_direction.y.abs() > input_direction.x.abs() {
                        if input_direction.y > 0.0 {
                            target_yaw
                        } else {
                            target_yaw + PI
                        }
                    } else {
                        lerp_angle(wish_yaw, target_yaw, self.config.soft_blend)
                    };
                }
            }

            *frame.yaw = smooth_damp_angle(
                *frame.yaw,
                wish_yaw,
                &mut self.yaw_velocity,
                self.config.rotation_smooth,
                dt,
            );
            let direction = yaw_to_forward(wish_yaw);
            *frame.position = motion.move_actor(
                frame.id,
                *frame.position,
                direction * self.config.move_speed * dt,
            );
        } else if let Some(target) = target {
            // idle with a lock: face the target in place
            let to_target = flatten(target.position - *frame.position);
            if to_target.length_squared() > f32::EPSILON {
                *frame.yaw = smooth_damp_angle(
                    *frame.yaw,
                    forward_to_yaw(to_target),
                    &mut self.yaw_velocity,
                    self.config.rotation_smooth,
                    dt,
                );
            }
        }

        *frame.position = motion.move_actor(
            frame.id,
            *frame.position,
            Vec3::new(0.0, *frame.vertical_velocity * dt, 0.0),
        );
    }

    fn update_landing<M: MotionBackend>(
        &mut self,
        frame: &mut ActorFrame<'_>,
        input_direction: Vec2,
        motion: &M,
    ) {
        let grounded = motion.is_grounded(frame.id, *frame.position);
        let landed_this_frame = grounded && !self.was_grounded;
        if landed_this_frame && input_direction.length() >= LANDING_INPUT_THRESHOLD {
            // already moving on touchdown: skip the lingering airborne pose
            frame.animation.clear_trigger(AnimationCue::Jump);
            frame.animation.set_speed(input_direction.length());
            frame.animation.enter_move_state();
        }
        self.was_grounded = grounded;
    }

    fn update_jump<M: MotionBackend>(
        &mut self,
        frame: &mut ActorFrame<'_>,
        input: &CombatInput,
        motion: &M,
    ) {
        if input.jump_pressed && motion.is_grounded(frame.id, *frame.position) {
            *frame.vertical_velocity =
                (2.0 * self.config.jump_height * self.config.gravity.abs()).sqrt();
            frame.animation.trigger(AnimationCue::Jump);
        }
    }

    fn update_attack(&mut self, frame: &mut ActorFrame<'_>, input: &CombatInput, now: f32) {
        if self.stun_timer > 0.0 {
            return;
        }
        if !input.attack_pressed {
            return;
        }
        frame.attacker.try_attack(now, frame.animation);
    }
}

fn normalize_or_zero(v: Vec2) -> Vec2 {
    if v.length_squared() > 0.0 {
        v.normalize()
    } else {
        Vec2::ZERO
    }
}
