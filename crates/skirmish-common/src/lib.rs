//! # Skirmish Common
//!
//! Common types and shared abstractions for Project Skirmish.
//!
//! This crate provides foundational types used across all Skirmish subsystems:
//! - ID types (`ActorId`, `VolumeId`)
//! - Angle and vector math helpers on top of `glam`
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ids;
pub mod math;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::math::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_generation() {
        let id1 = ActorId::new();
        let id2 = ActorId::new();
        assert_ne!(id1, id2);
        assert!(id1.is_valid());
    }

    #[test]
    fn test_actor_id_null() {
        assert!(!ActorId::NULL.is_valid());
        assert_eq!(ActorId::from_raw(0), ActorId::NULL);
    }

    #[test]
    fn test_volume_id_roundtrip() {
        let id = VolumeId::new(7);
        assert_eq!(id.raw(), 7);
    }
}
