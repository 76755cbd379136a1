//! Frame input for the player controller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One frame of sampled player input.
///
/// Edge flags (`*_pressed`) are true only on the frame the button went
/// down; the host computes them with [`ButtonState`] or its own tracking.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CombatInput {
    /// Raw directional input: `x` strafe, `y` forward (each -1 to 1).
    pub movement: Vec2,
    /// Camera yaw in radians; movement is camera-relative.
    pub camera_yaw: f32,
    /// Jump was pressed this frame.
    pub jump_pressed: bool,
    /// Attack was pressed this frame.
    pub attack_pressed: bool,
}

impl CombatInput {
    /// No input at all.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Sets directional input.
    #[must_use]
    pub fn with_movement(mut self, movement: Vec2) -> Self {
        self.movement = movement;
        self
    }

    /// Sets the camera yaw.
    #[must_use]
    pub fn with_camera_yaw(mut self, yaw: f32) -> Self {
        self.camera_yaw = yaw;
        self
    }

    /// Marks attack as pressed this frame.
    #[must_use]
    pub fn with_attack(mut self) -> Self {
        self.attack_pressed = true;
        self
    }

    /// Marks jump as pressed this frame.
    #[must_use]
    pub fn with_jump(mut self) -> Self {
        self.jump_pressed = true;
        self
    }
}

/// Tracks a button's held state and rising edge across frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonState {
    /// Whether the button is currently held.
    pub pressed: bool,
    /// Whether the button went down this frame.
    pub just_pressed: bool,
}

impl ButtonState {
    /// Updates from the raw held state sampled this frame.
    pub fn update(&mut self, is_pressed: bool) {
        self.just_pressed = is_pressed && !self.pressed;
        self.pressed = is_pressed;
    }
}
