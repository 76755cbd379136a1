//! Movement integration boundary.
//!
//! The combat core decides *where* actors want to move; resolving that
//! displacement against world geometry belongs to the host. The
//! [`MotionBackend`] trait is that boundary, mirroring the character
//! controller contract (`is_grounded` + `move`). [`FlatGround`] is the
//! reference implementation used by tests and headless runs.

use glam::Vec3;
use skirmish_common::ActorId;

/// Vertical velocity pinned while standing on the ground.
///
/// Keeps the controller pressed into the floor so the grounded test stays
/// stable between frames instead of oscillating on contact.
pub const GROUNDED_FALL_VELOCITY: f32 = -2.0;

/// Tolerance for the grounded test against a ground plane.
pub const GROUND_EPSILON: f32 = 1e-3;

/// Host-side movement integration for one actor.
pub trait MotionBackend {
    /// Returns whether the actor stands on the ground at `position`.
    fn is_grounded(&self, actor: ActorId, position: Vec3) -> bool;

    /// Moves the actor by `displacement`, returning the resolved position
    /// after collision response.
    fn move_actor(&mut self, actor: ActorId, position: Vec3, displacement: Vec3) -> Vec3;
}

/// Infinite flat ground plane with no obstacles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    /// Height of the ground plane.
    pub height: f32,
}

impl Default for FlatGround {
    fn default() -> Self {
        Self { height: 0.0 }
    }
}

impl FlatGround {
    /// Creates a ground plane at the given height.
    #[must_use]
    pub fn at(height: f32) -> Self {
        Self { height }
    }
}

impl MotionBackend for FlatGround {
    fn is_grounded(&self, _actor: ActorId, position: Vec3) -> bool {
        position.y <= self.height + GROUND_EPSILON
    }

    fn move_actor(&mut self, _actor: ActorId, position: Vec3, displacement: Vec3) -> Vec3 {
        let mut next = position + displacement;
        if next.y < self.height {
            next.y = self.height;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_ground_grounded() {
        let ground = FlatGround::default();
        let actor = ActorId::from_raw(1);
        assert!(ground.is_grounded(actor, Vec3::ZERO));
        assert!(!ground.is_grounded(actor, Vec3::new(0.0, 0.5, 0.0)));
    }

    #[test]
    fn test_flat_ground_clamps_below_plane() {
        let mut ground = FlatGround::at(1.0);
        let actor = ActorId::from_raw(1);
        let next = ground.move_actor(actor, Vec3::new(0.0, 1.2, 0.0), Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(next.y, 1.0);
    }

    #[test]
    fn test_flat_ground_free_horizontal_movement() {
        let mut ground = FlatGround::default();
        let actor = ActorId::from_raw(1);
        let next = ground.move_actor(actor, Vec3::ZERO, Vec3::new(3.0, 0.0, 4.0));
        assert_eq!(next, Vec3::new(3.0, 0.0, 4.0));
    }
}
