//! Animated-to-ragdoll death transition.
//!
//! While alive, an actor's skeleton is animation-driven: every rig part is
//! kinematic and its physical collision volume is off. On death the rig
//! flips once to physically simulated control. The flip is one-way; the
//! host reads the part flags after it and applies them to its rigid-body
//! backend (`set_simulated` / collider toggles).

use serde::{Deserialize, Serialize};

/// Which system drives the skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RigMode {
    /// Animation playback drives the bones; bodies are kinematic.
    Animated,
    /// Rigid-body simulation drives the bones.
    Ragdolled,
}

/// One rigid body in the ragdoll skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigPart {
    /// Host-side name of the bone/body this part maps to.
    pub name: String,
    /// Whether the body is physically simulated (false = kinematic).
    pub simulated: bool,
    /// Whether the part's physical collision volume is active.
    pub volume_enabled: bool,
    /// Keeps this part's volume off even when ragdolled.
    ///
    /// Used for the root volume, which would otherwise collide with the
    /// limb volumes attached to it.
    pub keep_volume_disabled: bool,
}

impl RigPart {
    /// Creates a kinematic part with its volume off.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            simulated: false,
            volume_enabled: false,
            keep_volume_disabled: false,
        }
    }

    /// Marks the part's volume as permanently excluded from the ragdoll.
    #[must_use]
    pub fn excluded(mut self) -> Self {
        self.keep_volume_disabled = true;
        self
    }
}

/// Ragdoll state for one actor's skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagdollRig {
    parts: Vec<RigPart>,
    mode: RigMode,
}

impl Default for RagdollRig {
    fn default() -> Self {
        Self::new()
    }
}

impl RagdollRig {
    /// Creates an empty animated rig.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parts: Vec::new(),
            mode: RigMode::Animated,
        }
    }

    /// Adds a rig part.
    #[must_use]
    pub fn with_part(mut self, part: RigPart) -> Self {
        self.parts.push(part);
        self
    }

    /// Current drive mode.
    #[must_use]
    pub fn mode(&self) -> RigMode {
        self.mode
    }

    /// Rig parts, for the host to mirror onto its physics bodies.
    #[must_use]
    pub fn parts(&self) -> &[RigPart] {
        &self.parts
    }

    /// Flips the skeleton to physically simulated control.
    ///
    /// Every part becomes simulated and its volume turns on, except parts
    /// flagged `keep_volume_disabled`. Calling again after the flip does
    /// nothing; upstream death handling already guarantees a single call.
    pub fn enable_ragdoll(&mut self) {
        if self.mode == RigMode::Ragdolled {
            return;
        }
        self.mode = RigMode::Ragdolled;
        for part in &mut self.parts {
            part.simulated = true;
            part.volume_enabled = !part.keep_volume_disabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn humanoid() -> RagdollRig {
        RagdollRig::new()
            .with_part(RigPart::new("root").excluded())
            .with_part(RigPart::new("torso"))
            .with_part(RigPart::new("arm_l"))
            .with_part(RigPart::new("arm_r"))
    }

    #[test]
    fn test_starts_animated_and_kinematic() {
        let rig = humanoid();
        assert_eq!(rig.mode(), RigMode::Animated);
        for part in rig.parts() {
            assert!(!part.simulated);
            assert!(!part.volume_enabled);
        }
    }

    #[test]
    fn test_enable_flips_all_parts() {
        let mut rig = humanoid();
        rig.enable_ragdoll();
        assert_eq!(rig.mode(), RigMode::Ragdolled);
        for part in rig.parts() {
            assert!(part.simulated);
            assert_eq!(part.volume_enabled, !part.keep_volume_disabled);
        }
    }

    #[test]
    fn test_root_volume_stays_disabled() {
        let mut rig = humanoid();
        rig.enable_ragdoll();
        let root = &rig.parts()[0];
        assert!(root.simulated);
        assert!(!root.volume_enabled);
    }

    #[test]
    fn test_second_enable_is_noop() {
        let mut rig = humanoid();
        rig.enable_ragdoll();
        let snapshot = rig.clone();
        rig.enable_ragdoll();
        assert_eq!(rig, snapshot);
    }
}
