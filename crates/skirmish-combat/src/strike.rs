//! Shared combo attack and delayed strike resolution.
//!
//! Player and enemy actors drive the same algorithm: each accepted attack
//! advances a combo counter, requests the matching animation cue, and
//! schedules a single delayed strike that resolves after the wind-up.
//! Resolution runs a sphere overlap in front of the attacker and damages
//! at most one victim — the first candidate that is alive, within reach
//! and inside the frontal cone.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skirmish_common::{flatten, ActorId};

use crate::animation::{AnimationChannel, AnimationCue};
use crate::spatial::SpatialQuery;

/// Vertical lift of the strike query center above the attacker's origin.
pub const STRIKE_CENTER_HEIGHT: f32 = 1.2;

// ============================================================================
// Configuration
// ============================================================================

/// Per-actor tuning for the combo strike resolver.
///
/// Supplied as a flat set of named numeric parameters per actor instance;
/// player and enemy archetypes ship reference tunings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeConfig {
    /// Minimum time between accepted attacks (seconds).
    pub cooldown: f32,
    /// Gap after which the combo counter resets (seconds).
    pub combo_reset: f32,
    /// Number of numbered swings before the finisher.
    pub combo_steps: u32,
    /// Wind-up delay between the attack and its strike resolving (seconds).
    pub strike_delay: f32,
    /// Maximum horizontal distance to a struck victim.
    pub reach: f32,
    /// Radius of the strike overlap sphere.
    pub radius: f32,
    /// Cosine of the half-cone angle a victim must fall within.
    pub angle_threshold: f32,
    /// Damage applied to the struck victim.
    pub damage: f32,
}

impl Default for StrikeConfig {
    fn default() -> Self {
        Self::player()
    }
}

impl StrikeConfig {
    /// Reference tuning for the player archetype.
    #[must_use]
    pub fn player() -> Self {
        Self {
            cooldown: 0.8,
            combo_reset: 1.0,
            combo_steps: 3,
            strike_delay: 0.3,
            reach: 1.6,
            radius: 0.9,
            angle_threshold: 0.5,
            damage: 25.0,
        }
    }

    /// Reference tuning for the enemy archetype (faster chaining, lighter hits).
    #[must_use]
    pub fn enemy() -> Self {
        Self {
            cooldown: 0.5,
            combo_reset: 1.0,
            combo_steps: 3,
            strike_delay: 0.3,
            reach: 1.6,
            radius: 0.8,
            angle_threshold: 0.5,
            damage: 15.0,
        }
    }

    /// Sets the attack cooldown.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Sets the combo reset window.
    #[must_use]
    pub fn with_combo_reset(mut self, combo_reset: f32) -> Self {
        self.combo_reset = combo_reset;
        self
    }

    /// Sets the number of numbered swings before the finisher.
    #[must_use]
    pub fn with_combo_steps(mut self, steps: u32) -> Self {
        self.combo_steps = steps;
        self
    }

    /// Sets the strike wind-up delay.
    #[must_use]
    pub fn with_strike_delay(mut self, delay: f32) -> Self {
        self.strike_delay = delay;
        self
    }

    /// Sets reach and sphere radius.
    #[must_use]
    pub fn with_reach(mut self, reach: f32, radius: f32) -> Self {
        self.reach = reach;
        self.radius = radius;
        self
    }

    /// Sets the frontal cone threshold (cosine of the half-angle).
    #[must_use]
    pub fn with_angle_threshold(mut self, threshold: f32) -> Self {
        self.angle_threshold = threshold;
        self
    }

    /// Sets the damage per strike.
    #[must_use]
    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }
}

// ============================================================================
// Combo state and scheduling
// ============================================================================

/// A scheduled strike waiting out its wind-up delay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingStrike {
    /// Simulation time at which the strike resolves.
    pub resolve_at: f32,
}

impl PendingStrike {
    /// Returns whether the wind-up has elapsed.
    #[must_use]
    pub fn is_due(&self, now: f32) -> bool {
        now >= self.resolve_at
    }
}

/// Combo and scheduling state for one attacking actor.
///
/// `pending` holds at most one strike; scheduling a new one always
/// replaces (and thereby cancels) its predecessor, so two strikes from the
/// same combo can never both resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboAttacker {
    config: StrikeConfig,
    combo: u32,
    last_attack: Option<f32>,
    pending: Option<PendingStrike>,
}

impl ComboAttacker {
    /// Creates an attacker with the given tuning.
    #[must_use]
    pub fn new(config: StrikeConfig) -> Self {
        Self {
            config,
            combo: 0,
            last_attack: None,
            pending: None,
        }
    }

    /// Attempts an attack at simulation time `now`.
    ///
    /// Rejected attempts (cooldown not elapsed) change no state and return
    /// false. Accepted attempts advance the combo, request the matching
    /// cue on `animation`, and schedule the delayed strike.
    pub fn try_attack(&mut self, now: f32, animation: &mut AnimationChannel) -> bool {
        if let Some(last) = self.last_attack {
            if now - last > self.config.combo_reset {
                self.combo = 0;
            }
            if now - last < self.config.cooldown {
                return false;
            }
        }

        self.combo += 1;
        self.last_attack = Some(now);

        if self.combo <= self.config.combo_steps {
            animation.trigger(AnimationCue::Attack(self.combo as u8));
        } else {
            animation.trigger(AnimationCue::BigAttack);
            self.combo = 0;
        }

        // replacing the option cancels any strike still waiting
        self.pending = Some(PendingStrike {
            resolve_at: now + self.config.strike_delay,
        });
        true
    }

    /// Removes and returns the pending strike once its delay has elapsed.
    ///
    /// The handle is cleared before the caller resolves the strike, so a
    /// cancellation arriving afterwards has nothing left to cancel.
    pub fn take_due(&mut self, now: f32) -> Option<PendingStrike> {
        if self.pending.is_some_and(|strike| strike.is_due(now)) {
            self.pending.take()
        } else {
            None
        }
    }

    /// Cancels the pending strike, if any. It will never resolve.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Resets the combo counter (hit interrupt).
    pub fn reset_combo(&mut self) {
        self.combo = 0;
    }

    /// Current combo counter.
    #[must_use]
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Returns whether a strike is scheduled and unresolved.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The attacker's tuning.
    #[must_use]
    pub fn config(&self) -> &StrikeConfig {
        &self.config
    }
}

// ============================================================================
// Strike resolution
// ============================================================================

/// Position and aliveness lookup for strike candidates.
pub trait VictimQuery {
    /// World position of the candidate's actor, or None if unknown.
    fn position(&self, actor: ActorId) -> Option<Vec3>;

    /// Whether the candidate's actor is alive.
    fn is_alive(&self, actor: ActorId) -> bool;
}

/// Resolves a delayed strike, returning the single victim to damage.
///
/// The overlap sphere sits in front of and above the attacker. Candidates
/// are visited in query order; the first one that belongs to another,
/// living actor within horizontal `reach` and inside the frontal cone
/// (`dot >= angle_threshold`) wins. Zero candidates is a whiff, not an
/// error.
pub fn resolve_strike<S: SpatialQuery, V: VictimQuery>(
    attacker: ActorId,
    origin: Vec3,
    forward: Vec3,
    config: &StrikeConfig,
    spatial: &S,
    victims: &V,
) -> Option<ActorId> {
    let center = origin + Vec3::Y * STRIKE_CENTER_HEIGHT + forward * (config.reach * 0.5);

    for hit in spatial.overlap_sphere(center, config.radius, true) {
        // own body and attached parts
        if hit.owner == attacker {
            continue;
        }
        let Some(victim_position) = victims.position(hit.owner) else {
            continue;
        };
        if !victims.is_alive(hit.owner) {
            continue;
        }

        let to_victim = flatten(victim_position - origin);
        if to_victim.length_squared() > config.reach * config.reach {
            continue;
        }
        let Some(direction) = to_victim.try_normalize() else {
            continue;
        };
        if forward.dot(direction) < config.angle_threshold {
            continue;
        }

        // one hit per swing
        return Some(hit.owner);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationRequest;
    use crate::spatial::VolumeHit;
    use skirmish_common::VolumeId;
    use std::collections::HashMap;

    fn attacker() -> ComboAttacker {
        ComboAttacker::new(StrikeConfig::player())
    }

    fn drained_triggers(channel: &mut AnimationChannel) -> Vec<AnimationCue> {
        channel
            .drain()
            .into_iter()
            .filter_map(|request| match request {
                AnimationRequest::Trigger(cue) => Some(cue),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_combo_advances_to_finisher() {
        let mut combat = attacker();
        let mut channel = AnimationChannel::new();

        // four swings spaced past the cooldown but inside the reset window
        for (i, now) in [10.0, 10.9, 11.8, 12.7].into_iter().enumerate() {
            assert!(combat.try_attack(now, &mut channel), "attack {i} rejected");
        }

        assert_eq!(
            drained_triggers(&mut channel),
            vec![
                AnimationCue::Attack(1),
                AnimationCue::Attack(2),
                AnimationCue::Attack(3),
                AnimationCue::BigAttack,
            ]
        );
        assert_eq!(combat.combo(), 0);
    }

    #[test]
    fn test_cooldown_rejects_without_state_change() {
        let mut combat = attacker();
        let mut channel = AnimationChannel::new();

        assert!(combat.try_attack(10.0, &mut channel));
        assert!(!combat.try_attack(10.3, &mut channel));

        assert_eq!(combat.combo(), 1);
        assert_eq!(combat.last_attack, Some(10.0));
        assert_eq!(drained_triggers(&mut channel), vec![AnimationCue::Attack(1)]);
    }

    #[test]
    fn test_combo_resets_after_gap() {
        let mut combat = attacker();
        let mut channel = AnimationChannel::new();

        assert!(combat.try_attack(10.0, &mut channel));
        assert!(combat.try_attack(10.9, &mut channel));
        assert_eq!(combat.combo(), 2);

        // gap beyond the reset window drops back to the first swing
        assert!(combat.try_attack(13.0, &mut channel));
        assert_eq!(combat.combo(), 1);
        assert_eq!(
            drained_triggers(&mut channel),
            vec![
                AnimationCue::Attack(1),
                AnimationCue::Attack(2),
                AnimationCue::Attack(1),
            ]
        );
    }

    #[test]
    fn test_first_attack_always_passes_gate() {
        let mut combat = attacker();
        let mut channel = AnimationChannel::new();
        assert!(combat.try_attack(0.0, &mut channel));
    }

    #[test]
    fn test_scheduling_replaces_pending_strike() {
        let mut combat = attacker();
        let mut channel = AnimationChannel::new();

        assert!(combat.try_attack(10.0, &mut channel));
        assert!(combat.try_attack(10.9, &mut channel));

        // the first strike (due 10.3) was replaced and never resolves
        assert!(combat.take_due(10.5).is_none());
        let strike = combat.take_due(11.2).expect("second strike due");
        assert_eq!(strike.resolve_at, 11.2);
        assert!(!combat.has_pending());
    }

    #[test]
    fn test_cancel_prevents_resolution() {
        let mut combat = attacker();
        let mut channel = AnimationChannel::new();

        assert!(combat.try_attack(10.0, &mut channel));
        combat.cancel_pending();
        assert!(combat.take_due(11.0).is_none());
    }

    #[test]
    fn test_take_due_clears_handle() {
        let mut combat = attacker();
        let mut channel = AnimationChannel::new();

        assert!(combat.try_attack(10.0, &mut channel));
        assert!(combat.take_due(10.2).is_none());
        assert!(combat.has_pending());
        assert!(combat.take_due(10.3).is_some());
        assert!(combat.take_due(10.3).is_none());
    }

    // ------------------------------------------------------------------
    // resolution
    // ------------------------------------------------------------------

    struct ScriptedScene(Vec<VolumeHit>);

    impl SpatialQuery for ScriptedScene {
        fn overlap_sphere(&self, _c: Vec3, _r: f32, _t: bool) -> Vec<VolumeHit> {
            self.0.clone()
        }
    }

    struct Targets(HashMap<ActorId, (Vec3, bool)>);

    impl VictimQuery for Targets {
        fn position(&self, actor: ActorId) -> Option<Vec3> {
            self.0.get(&actor).map(|(position, _)| *position)
        }

        fn is_alive(&self, actor: ActorId) -> bool {
            self.0.get(&actor).is_some_and(|(_, alive)| *alive)
        }
    }

    fn hit(owner: u64) -> VolumeHit {
        VolumeHit {
            volume: VolumeId::new(owner as u32),
            owner: ActorId::from_raw(owner),
        }
    }

    const SELF: u64 = 1;

    fn resolve(scene: &ScriptedScene, targets: &Targets) -> Option<ActorId> {
        resolve_strike(
            ActorId::from_raw(SELF),
            Vec3::ZERO,
            Vec3::Z,
            &StrikeConfig::player(),
            scene,
            targets,
        )
    }

    #[test]
    fn test_resolution_picks_first_qualifying_candidate() {
        let scene = ScriptedScene(vec![hit(2), hit(3)]);
        let targets = Targets(HashMap::from([
            (ActorId::from_raw(2), (Vec3::new(0.0, 0.0, 1.2), true)),
            (ActorId::from_raw(3), (Vec3::new(0.2, 0.0, 1.0), true)),
        ]));
        assert_eq!(resolve(&scene, &targets), Some(ActorId::from_raw(2)));
    }

    #[test]
    fn test_resolution_skips_self_and_unknown_owners() {
        let scene = ScriptedScene(vec![hit(SELF), hit(9), hit(2)]);
        // actor 9 has no registered health
        let targets = Targets(HashMap::from([(
            ActorId::from_raw(2),
            (Vec3::new(0.0, 0.0, 1.2), true),
        )]));
        assert_eq!(resolve(&scene, &targets), Some(ActorId::from_raw(2)));
    }

    #[test]
    fn test_resolution_skips_dead_victims() {
        let scene = ScriptedScene(vec![hit(2), hit(3)]);
        let targets = Targets(HashMap::from([
            (ActorId::from_raw(2), (Vec3::new(0.0, 0.0, 1.2), false)),
            (ActorId::from_raw(3), (Vec3::new(0.0, 0.0, 1.4), true)),
        ]));
        assert_eq!(resolve(&scene, &targets), Some(ActorId::from_raw(3)));
    }

    #[test]
    fn test_resolution_enforces_reach() {
        let scene = ScriptedScene(vec![hit(2)]);
        // inside the overlap sphere but beyond horizontal reach
        let targets = Targets(HashMap::from([(
            ActorId::from_raw(2),
            (Vec3::new(0.0, 0.0, 1.7), true),
        )]));
        assert_eq!(resolve(&scene, &targets), None);
    }

    #[test]
    fn test_resolution_enforces_frontal_cone() {
        let scene = ScriptedScene(vec![hit(2)]);
        // ~77 degrees off axis: dot ~0.22 < 0.5
        let targets = Targets(HashMap::from([(
            ActorId::from_raw(2),
            (Vec3::new(1.3, 0.0, 0.3), true),
        )]));
        assert_eq!(resolve(&scene, &targets), None);
    }

    #[test]
    fn test_resolution_ignores_vertical_offset_within_reach() {
        let scene = ScriptedScene(vec![hit(2)]);
        let targets = Targets(HashMap::from([(
            ActorId::from_raw(2),
            (Vec3::new(0.0, 0.8, 1.2), true),
        )]));
        assert_eq!(resolve(&scene, &targets), Some(ActorId::from_raw(2)));
    }

    #[test]
    fn test_whiff_is_none() {
        let scene = ScriptedScene(Vec::new());
        let targets = Targets(HashMap::new());
        assert_eq!(resolve(&scene, &targets), None);
    }
}
