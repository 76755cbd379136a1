//! Frame-stepped combat simulation.
//!
//! The simulation owns every actor and drives them in spawn order, one
//! tick at a time. Within a tick each actor first resolves its due delayed
//! strike — damage application synchronously runs the victim's hit or
//! death reaction before anything else continues — and then runs its
//! controller frame (state machine and movement before the attack-trigger
//! check). Nothing observes another actor's mid-tick partial state except
//! through that synchronous damage path.

use glam::Vec3;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

use skirmish_common::{yaw_to_forward, ActorId};

use crate::actor::{Actor, ActorKind, ActorSpawn, Controller};
use crate::animation::AnimationRequest;
use crate::enemy::{AiState, EnemyAi, EnemyConfig};
use crate::events::{CombatEvent, EventBus};
use crate::health::{DamageOutcome, Health};
use crate::input::CombatInput;
use crate::motion::MotionBackend;
use crate::player::{PlayerConfig, PlayerController, SoftLockTarget};
use crate::spatial::VolumeRegistry;
use crate::strike::{resolve_strike, ComboAttacker, VictimQuery};

/// Fixed timestep used by [`Simulation::advance`] (60 Hz).
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Errors from the simulation API.
#[derive(Debug, Clone, Error)]
pub enum ArenaError {
    /// No actor with the given ID exists.
    #[error("actor not found: {0:?}")]
    ActorNotFound(ActorId),
    /// A second player cannot be spawned.
    #[error("a player is already spawned")]
    PlayerAlreadySpawned,
}

/// Result type for simulation operations.
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Victim lookup over the actor map, used during strike resolution.
struct ActorsView<'a>(&'a HashMap<ActorId, Actor>);

impl VictimQuery for ActorsView<'_> {
    fn position(&self, actor: ActorId) -> Option<Vec3> {
        self.0.get(&actor).map(|a| a.position)
    }

    fn is_alive(&self, actor: ActorId) -> bool {
        self.0.get(&actor).is_some_and(|a| a.health.is_alive())
    }
}

/// The combat arena: all actors, the spatial index and the sim clock.
#[derive(Debug)]
pub struct Simulation {
    time: f32,
    accumulator: f32,
    actors: HashMap<ActorId, Actor>,
    /// Tick order; equals spawn order.
    order: Vec<ActorId>,
    registry: VolumeRegistry,
    events: EventBus,
    player: Option<ActorId>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            time: 0.0,
            accumulator: 0.0,
            actors: HashMap::new(),
            order: Vec::new(),
            registry: VolumeRegistry::new(),
            events: EventBus::default(),
            player: None,
        }
    }

    // ------------------------------------------------------------------
    // Spawning
    // ------------------------------------------------------------------

    /// Spawns the player actor. At most one player exists at a time.
    pub fn spawn_player(
        &mut self,
        spawn: ActorSpawn,
        config: PlayerConfig,
    ) -> ArenaResult<ActorId> {
        if self.player.is_some() {
            return Err(ArenaError::PlayerAlreadySpawned);
        }
        let controller = Controller::Player(PlayerController::new(config));
        let id = self.insert_actor(ActorKind::Player, spawn, controller);
        self.player = Some(id);
        Ok(id)
    }

    /// Spawns an enemy actor.
    pub fn spawn_enemy(&mut self, spawn: ActorSpawn, config: EnemyConfig) -> ActorId {
        let controller = Controller::Enemy(EnemyAi::new(config));
        self.insert_actor(ActorKind::Enemy, spawn, controller)
    }

    fn insert_actor(&mut self, kind: ActorKind, spawn: ActorSpawn, controller: Controller) -> ActorId {
        let id = ActorId::new();
        self.registry
            .register(id, spawn.body_offset, spawn.body_radius, false);
        self.registry.set_origin(id, spawn.position);

        let actor = Actor {
            id,
            kind,
            position: spawn.position,
            yaw: spawn.yaw,
            vertical_velocity: 0.0,
            health: Health::new(spawn.max_health),
            attacker: ComboAttacker::new(spawn.strike),
            animation: crate::animation::AnimationChannel::new(),
            rig: spawn.rig,
            controller,
            active: true,
        };
        debug!(actor = ?id, ?kind, "actor spawned");
        self.actors.insert(id, actor);
        self.order.push(id);
        id
    }

    // ------------------------------------------------------------------
    // Stepping
    // ------------------------------------------------------------------

    /// Advances the simulation by a variable frame time, running fixed
    /// timestep ticks as they accumulate.
    pub fn advance<M: MotionBackend>(&mut self, input: &CombatInput, motion: &mut M, dt: f32) {
        self.accumulator += dt;
        while self.accumulator >= FIXED_TIMESTEP {
            self.step(input, motion, FIXED_TIMESTEP);
            self.accumulator -= FIXED_TIMESTEP;
        }
    }

    /// Runs exactly one simulation tick of length `dt`.
    pub fn step<M: MotionBackend>(&mut self, input: &CombatInput, motion: &mut M, dt: f32) {
        self.time += dt;
        let order = self.order.clone();
        for id in order {
            self.resolve_due_strike(id);
            self.tick_actor(id, input, motion, dt);
        }
    }

    /// Resolves the actor's pending strike if its wind-up has elapsed.
    fn resolve_due_strike(&mut self, id: ActorId) {
        let now = self.time;
        let Some(mut actor) = self.actors.remove(&id) else {
            return;
        };

        if actor.attacker.take_due(now).is_some() {
            let config = actor.attacker.config().clone();
            let forward = yaw_to_forward(actor.yaw);
            let origin = actor.position;
            let victim = resolve_strike(
                id,
                origin,
                forward,
                &config,
                &self.registry,
                &ActorsView(&self.actors),
            );
            self.actors.insert(id, actor);

            match victim {
                Some(victim_id) => {
                    debug!(attacker = ?id, victim = ?victim_id, "strike landed");
                    self.events.publish(CombatEvent::StrikeLanded {
                        attacker: id,
                        victim: victim_id,
                    });
                    self.apply_damage(victim_id, config.damage, Some(id));
                }
                None => {
                    trace!(attacker = ?id, "strike whiffed");
                    self.events.publish(CombatEvent::StrikeWhiffed { attacker: id });
                }
            }
        } else {
            self.actors.insert(id, actor);
        }
    }

    /// Runs one controller frame for the actor.
    fn tick_actor<M: MotionBackend>(
        &mut self,
        id: ActorId,
        input: &CombatInput,
        motion: &mut M,
        dt: f32,
    ) {
        let Some(mut actor) = self.actors.remove(&id) else {
            return;
        };

        if actor.active {
            let now = self.time;
            let (mut frame, controller) = actor.split_frame();
            match controller {
                Controller::Player(player) => {
                    let enemies = self.living_enemies();
                    player.tick(&mut frame, input, &enemies, motion, now, dt);
                }
                Controller::Enemy(ai) => {
                    let player_position = self.living_player_position();
                    if let Some((from, to)) = ai.tick(&mut frame, player_position, motion, now, dt)
                    {
                        trace!(actor = ?id, %from, %to, "ai state changed");
                        self.events
                            .publish(CombatEvent::AiStateChanged { actor: id, from, to });
                    }
                }
            }
        }

        self.registry.set_origin(id, actor.position);
        self.actors.insert(id, actor);
    }

    // ------------------------------------------------------------------
    // Damage
    // ------------------------------------------------------------------

    /// Applies damage from the host (environment, scripted hazards).
    pub fn damage(&mut self, actor: ActorId, amount: f32) -> ArenaResult<DamageOutcome> {
        if !self.actors.contains_key(&actor) {
            return Err(ArenaError::ActorNotFound(actor));
        }
        Ok(self.apply_damage(actor, amount, None))
    }

    /// Applies damage and synchronously dispatches the victim's reaction.
    fn apply_damage(
        &mut self,
        victim: ActorId,
        amount: f32,
        source: Option<ActorId>,
    ) -> DamageOutcome {
        let Some(actor) = self.actors.get_mut(&victim) else {
            return DamageOutcome::Ignored;
        };

        let outcome = actor.health.take_damage(amount);
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Damaged => {
                let remaining = actor.health.current();
                let state_change = actor.react_to_hit();
                self.events.publish(CombatEvent::ActorDamaged {
                    actor: victim,
                    amount,
                    remaining,
                    source,
                });
                if let Some((from, to)) = state_change {
                    self.events.publish(CombatEvent::AiStateChanged {
                        actor: victim,
                        from,
                        to,
                    });
                }
            }
            DamageOutcome::Died => {
                actor.die();
                debug!(actor = ?victim, "actor died");
                self.events
                    .publish(CombatEvent::ActorDied { actor: victim, source });
            }
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Current simulation time in seconds.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// The actor with the given ID.
    #[must_use]
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// The actor's health, if it exists.
    #[must_use]
    pub fn health(&self, id: ActorId) -> Option<&Health> {
        self.actors.get(&id).map(|a| &a.health)
    }

    /// Whether the actor exists and is alive.
    #[must_use]
    pub fn is_alive(&self, id: ActorId) -> bool {
        self.actors.get(&id).is_some_and(|a| a.health.is_alive())
    }

    /// The actor's position, if it exists.
    #[must_use]
    pub fn position(&self, id: ActorId) -> Option<Vec3> {
        self.actors.get(&id).map(|a| a.position)
    }

    /// The enemy's AI state, if the actor is an enemy.
    #[must_use]
    pub fn ai_state(&self, id: ActorId) -> Option<AiState> {
        self.actors.get(&id).and_then(Actor::ai_state)
    }

    /// The player actor's ID, if one was spawned.
    #[must_use]
    pub fn player_id(&self) -> Option<ActorId> {
        self.player
    }

    /// Number of actors in the arena (including dead ones).
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// The spatial volume registry.
    #[must_use]
    pub fn registry(&self) -> &VolumeRegistry {
        &self.registry
    }

    /// Drains all pending combat events.
    pub fn drain_events(&self) -> Vec<CombatEvent> {
        self.events.drain()
    }

    /// Drains the actor's pending animation requests for the host.
    pub fn drain_animation(&mut self, id: ActorId) -> Vec<AnimationRequest> {
        self.actors
            .get_mut(&id)
            .map(|a| a.animation.drain())
            .unwrap_or_default()
    }

    /// The actor's current animation Speed value.
    #[must_use]
    pub fn animation_speed(&self, id: ActorId) -> Option<f32> {
        self.actors.get(&id).map(|a| a.animation.speed())
    }

    fn living_enemies(&self) -> Vec<SoftLockTarget> {
        self.order
            .iter()
            .filter_map(|id| self.actors.get(id).map(|a| (*id, a)))
            .filter(|(_, a)| a.kind == ActorKind::Enemy && a.health.is_alive())
            .map(|(id, a)| SoftLockTarget {
                id,
                position: a.position,
            })
            .collect()
    }

    fn living_player_position(&self) -> Option<Vec3> {
        let id = self.player?;
        self.actors
            .get(&id)
            .filter(|a| a.health.is_alive())
            .map(|a| a.position)
    }
}
