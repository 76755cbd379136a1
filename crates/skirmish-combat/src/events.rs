//! Event bus for observing combat outcomes.
//!
//! The simulation publishes a [`CombatEvent`] for every externally visible
//! outcome: damage, death, strike results and AI state changes. Nothing in
//! the core consumes them — they exist for the host (UI, audio, telemetry)
//! and for tests.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use skirmish_common::ActorId;

use crate::enemy::AiState;

/// Events published by the combat simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// An actor took a non-lethal hit.
    ActorDamaged {
        /// Actor that was hit
        actor: ActorId,
        /// Damage applied
        amount: f32,
        /// Health remaining after the hit
        remaining: f32,
        /// Attacker, if the damage came from a strike
        source: Option<ActorId>,
    },
    /// An actor's health reached zero.
    ActorDied {
        /// Actor that died
        actor: ActorId,
        /// Attacker, if the damage came from a strike
        source: Option<ActorId>,
    },
    /// A delayed strike resolved and damaged a victim.
    StrikeLanded {
        /// Actor whose strike resolved
        attacker: ActorId,
        /// Victim that was damaged
        victim: ActorId,
    },
    /// A delayed strike resolved with no qualifying victim.
    StrikeWhiffed {
        /// Actor whose strike resolved
        attacker: ActorId,
    },
    /// An enemy controller changed state.
    AiStateChanged {
        /// Enemy whose state changed
        actor: ActorId,
        /// State before the change
        from: AiState,
        /// State after the change
        to: AiState,
    },
}

/// Bounded bus for broadcasting combat events to the host.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for publishing events
    sender: Sender<CombatEvent>,
    /// Receiver for collecting events
    receiver: Receiver<CombatEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: CombatEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<CombatEvent> {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(8);
        bus.publish(CombatEvent::StrikeWhiffed {
            attacker: ActorId::from_raw(1),
        });
        bus.publish(CombatEvent::ActorDied {
            actor: ActorId::from_raw(2),
            source: None,
        });

        assert_eq!(bus.pending_count(), 2);
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops_events() {
        let bus = EventBus::new(1);
        for _ in 0..3 {
            bus.publish(CombatEvent::StrikeWhiffed {
                attacker: ActorId::from_raw(1),
            });
        }
        assert_eq!(bus.drain().len(), 1);
    }
}
