//! Spatial overlap queries over registered collision volumes.
//!
//! The simulation builds a [`VolumeRegistry`] once at spawn time: each
//! actor registers the sphere volumes that can be struck, and updates its
//! origin as it moves. Strike resolution goes through the [`SpatialQuery`]
//! trait so tests can script candidate sets directly.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skirmish_common::{ActorId, VolumeId};

/// One volume returned from an overlap query, resolvable to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeHit {
    /// The overlapping volume.
    pub volume: VolumeId,
    /// Actor the volume belongs to.
    pub owner: ActorId,
}

/// Read-only sphere overlap query.
///
/// Implementations must return hits in a deterministic order; the strike
/// resolver damages the first qualifying candidate it sees.
pub trait SpatialQuery {
    /// Returns all volumes intersecting the sphere at `center`.
    fn overlap_sphere(&self, center: Vec3, radius: f32, include_triggers: bool) -> Vec<VolumeHit>;
}

/// A registered sphere volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Volume {
    id: VolumeId,
    owner: ActorId,
    /// Offset from the owner's origin.
    offset: Vec3,
    radius: f32,
    trigger: bool,
    enabled: bool,
    /// Owner origin, refreshed by the simulation each frame.
    origin: Vec3,
}

impl Volume {
    fn center(&self) -> Vec3 {
        self.origin + self.offset
    }
}

/// Registry of all collidable volumes in the arena.
///
/// Queries iterate volumes in registration order, which the simulation
/// keeps equal to spawn order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeRegistry {
    volumes: Vec<Volume>,
    next_id: u32,
}

impl VolumeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sphere volume owned by `owner` at `offset` from its origin.
    pub fn register(&mut self, owner: ActorId, offset: Vec3, radius: f32, trigger: bool) -> VolumeId {
        let id = VolumeId::new(self.next_id);
        self.next_id += 1;
        self.volumes.push(Volume {
            id,
            owner,
            offset,
            radius,
            trigger,
            enabled: true,
            origin: Vec3::ZERO,
        });
        id
    }

    /// Moves all of an owner's volumes to a new origin.
    pub fn set_origin(&mut self, owner: ActorId, origin: Vec3) {
        for volume in self.volumes.iter_mut().filter(|v| v.owner == owner) {
            volume.origin = origin;
        }
    }

    /// Enables or disables a single volume.
    pub fn set_enabled(&mut self, id: VolumeId, enabled: bool) {
        if let Some(volume) = self.volumes.iter_mut().find(|v| v.id == id) {
            volume.enabled = enabled;
        }
    }

    /// Removes every volume owned by `owner`.
    pub fn remove_owner(&mut self, owner: ActorId) {
        self.volumes.retain(|v| v.owner != owner);
    }

    /// Number of registered volumes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}

impl SpatialQuery for VolumeRegistry {
    fn overlap_sphere(&self, center: Vec3, radius: f32, include_triggers: bool) -> Vec<VolumeHit> {
        self.volumes
            .iter()
            .filter(|v| v.enabled)
            .filter(|v| include_triggers || !v.trigger)
            .filter(|v| {
                let reach = radius + v.radius;
                v.center().distance_squared(center) <= reach * reach
            })
            .map(|v| VolumeHit {
                volume: v.id,
                owner: v.owner,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(raw: u64) -> ActorId {
        ActorId::from_raw(raw)
    }

    #[test]
    fn test_query_respects_registration_order() {
        let mut registry = VolumeRegistry::new();
        let first = registry.register(actor(1), Vec3::ZERO, 0.5, false);
        let second = registry.register(actor(2), Vec3::ZERO, 0.5, false);
        registry.set_origin(actor(1), Vec3::new(0.5, 0.0, 0.0));
        registry.set_origin(actor(2), Vec3::new(-0.5, 0.0, 0.0));

        let hits = registry.overlap_sphere(Vec3::ZERO, 1.0, true);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].volume, first);
        assert_eq!(hits[1].volume, second);
    }

    #[test]
    fn test_query_radius() {
        let mut registry = VolumeRegistry::new();
        registry.register(actor(1), Vec3::ZERO, 0.5, false);
        registry.set_origin(actor(1), Vec3::new(3.0, 0.0, 0.0));

        assert!(registry.overlap_sphere(Vec3::ZERO, 1.0, true).is_empty());
        assert_eq!(registry.overlap_sphere(Vec3::ZERO, 2.6, true).len(), 1);
    }

    #[test]
    fn test_trigger_volumes_filtered() {
        let mut registry = VolumeRegistry::new();
        registry.register(actor(1), Vec3::ZERO, 0.5, true);

        assert!(registry.overlap_sphere(Vec3::ZERO, 1.0, false).is_empty());
        assert_eq!(registry.overlap_sphere(Vec3::ZERO, 1.0, true).len(), 1);
    }

    #[test]
    fn test_disabled_volume_skipped() {
        let mut registry = VolumeRegistry::new();
        let id = registry.register(actor(1), Vec3::ZERO, 0.5, false);
        registry.set_enabled(id, false);
        assert!(registry.overlap_sphere(Vec3::ZERO, 1.0, true).is_empty());

        registry.set_enabled(id, true);
        assert_eq!(registry.overlap_sphere(Vec3::ZERO, 1.0, true).len(), 1);
    }

    #[test]
    fn test_offset_applies_from_origin() {
        let mut registry = VolumeRegistry::new();
        registry.register(actor(1), Vec3::new(0.0, 1.0, 0.0), 0.5, false);
        registry.set_origin(actor(1), Vec3::new(0.0, 0.0, 4.0));

        let hits = registry.overlap_sphere(Vec3::new(0.0, 1.0, 4.0), 0.1, true);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_remove_owner() {
        let mut registry = VolumeRegistry::new();
        registry.register(actor(1), Vec3::ZERO, 0.5, false);
        registry.register(actor(2), Vec3::ZERO, 0.5, false);
        registry.remove_owner(actor(1));
        assert_eq!(registry.len(), 1);
        let hits = registry.overlap_sphere(Vec3::ZERO, 1.0, true);
        assert_eq!(hits[0].owner, actor(2));
    }
}
