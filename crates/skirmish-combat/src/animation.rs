//! Outbound animation requests.
//!
//! The combat core never drives animation clips itself. Each actor owns an
//! [`AnimationChannel`], a fire-and-forget queue of cue requests plus the
//! continuous Speed value; the host drains the queue every frame and maps
//! the cues onto its animation rig. Nothing reports back — strike timing is
//! handled by the combat core's own timers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named animation cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationCue {
    /// Numbered combo swing (`Attack1`, `Attack2`, ...).
    Attack(u8),
    /// Combo finisher.
    BigAttack,
    /// Jump take-off.
    Jump,
    /// Hit reaction.
    Hit,
}

impl fmt::Display for AnimationCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack(step) => write!(f, "Attack{step}"),
            Self::BigAttack => write!(f, "BigAttack"),
            Self::Jump => write!(f, "Jump"),
            Self::Hit => write!(f, "Hit"),
        }
    }
}

/// A single request queued for the host's animation rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationRequest {
    /// Fire a trigger; the rig decides when to blend in.
    Trigger(AnimationCue),
    /// Restart a state from the beginning immediately (used for `Hit`).
    Play(AnimationCue),
    /// Switch to the locomotion state with no blend (landing shortcut).
    EnterMoveState,
}

/// Per-actor outbound animation queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationChannel {
    requests: Vec<AnimationRequest>,
    speed: f32,
    disabled: bool,
}

impl AnimationChannel {
    /// Creates an empty, enabled channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a trigger request.
    pub fn trigger(&mut self, cue: AnimationCue) {
        if !self.disabled {
            self.requests.push(AnimationRequest::Trigger(cue));
        }
    }

    /// Queues an immediate play request (restarts the state from time 0).
    pub fn play(&mut self, cue: AnimationCue) {
        if !self.disabled {
            self.requests.push(AnimationRequest::Play(cue));
        }
    }

    /// Queues an immediate switch to the locomotion state.
    pub fn enter_move_state(&mut self) {
        if !self.disabled {
            self.requests.push(AnimationRequest::EnterMoveState);
        }
    }

    /// Sets the continuous Speed value sampled by the rig's blend tree.
    pub fn set_speed(&mut self, speed: f32) {
        if !self.disabled {
            self.speed = speed;
        }
    }

    /// Current Speed value.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Removes any queued trigger for `cue` that has not been drained yet.
    pub fn clear_trigger(&mut self, cue: AnimationCue) {
        self.requests
            .retain(|request| *request != AnimationRequest::Trigger(cue));
    }

    /// Removes all queued attack triggers (numbered swings and the finisher).
    pub fn clear_attack_triggers(&mut self) {
        self.requests.retain(|request| {
            !matches!(
                request,
                AnimationRequest::Trigger(AnimationCue::Attack(_) | AnimationCue::BigAttack)
            )
        });
    }

    /// Takes all pending requests, oldest first.
    pub fn drain(&mut self) -> Vec<AnimationRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Number of queued requests.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.requests.len()
    }

    /// Permanently disables the channel and drops anything queued.
    ///
    /// Used on death: the skeleton is handed to the ragdoll and the rig
    /// must not receive further cues.
    pub fn disable(&mut self) {
        self.disabled = true;
        self.requests.clear();
        self.speed = 0.0;
    }

    /// Returns whether the channel still accepts requests.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }
}
