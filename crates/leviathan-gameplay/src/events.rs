//! Event bus carrying monster effects and kills to outside collaborators.
//!
//! Rendering, audio, HUD, and the network relay subscribe here; the simulation
//! itself never waits on a consumer.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{bounded, Receiver, Sender};
use glam::Vec3;
use leviathan_common::{LootId, MonsterId};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::kind::MonsterKind;

/// Emitted once when a monster's health reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KillEvent {
    /// Killed monster
    pub id: MonsterId,
    /// Its kind, which decides the reward
    pub kind: MonsterKind,
    /// Last position before sinking
    pub position: Vec3,
}

/// Event types that can be sent through the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Monster added to the world
    MonsterSpawned {
        /// Monster ID
        id: MonsterId,
        /// Kind
        kind: MonsterKind,
        /// Spawn position
        position: Vec3,
    },
    /// Monster removed after its death animation
    MonsterRemoved {
        /// Monster ID
        id: MonsterId,
    },
    /// Monster took non-lethal damage (flash indicator)
    MonsterDamaged {
        /// Monster ID
        id: MonsterId,
        /// Damage dealt
        damage: i32,
        /// Health left
        remaining: i32,
    },
    /// Monster killed
    MonsterKilled(KillEvent),
    /// Monster broke the surface
    SurfaceSplash {
        /// Monster ID
        id: MonsterId,
        /// Splash position
        position: Vec3,
    },
    /// Kraken lunge or serpent strike
    Lunge {
        /// Monster ID
        id: MonsterId,
        /// Kind
        kind: MonsterKind,
        /// Lunge start position
        position: Vec3,
    },
    /// Jellyfish electric discharge
    Discharge {
        /// Monster ID
        id: MonsterId,
        /// Discharge position
        position: Vec3,
    },
    /// Contact hit on the player's boat
    PlayerHit {
        /// Striking monster
        id: MonsterId,
        /// Damage reported to the boat
        damage: i32,
        /// Velocity impulse applied to the boat
        impulse: Vec3,
    },
    /// Night fell and the population was topped up
    NightRespawn {
        /// Monsters spawned
        count: usize,
    },
    /// Cannon volley fired
    CannonFired {
        /// Monsters within range at fire time
        targets: usize,
        /// Hits landed
        hits: usize,
    },
    /// Cannonball hit the water
    CannonballSplash {
        /// Splash position
        position: Vec3,
    },
    /// Loot drop created
    LootSpawned {
        /// Loot ID
        loot: LootId,
        /// Reward name
        reward: String,
        /// Drop position
        position: Vec3,
    },
    /// Loot drop sank without being collected
    LootExpired {
        /// Loot ID
        loot: LootId,
    },
    /// Loot drop collected by the player
    LootCollected {
        /// Loot ID
        loot: LootId,
        /// Reward name
        reward: String,
    },
}

impl GameEvent {
    /// Short tag for logs and summaries.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::MonsterSpawned { .. } => "monster_spawned",
            Self::MonsterRemoved { .. } => "monster_removed",
            Self::MonsterDamaged { .. } => "monster_damaged",
            Self::MonsterKilled(_) => "monster_killed",
            Self::SurfaceSplash { .. } => "surface_splash",
            Self::Lunge { .. } => "lunge",
            Self::Discharge { .. } => "discharge",
            Self::PlayerHit { .. } => "player_hit",
            Self::NightRespawn { .. } => "night_respawn",
            Self::CannonFired { .. } => "cannon_fired",
            Self::CannonballSplash { .. } => "cannonball_splash",
            Self::LootSpawned { .. } => "loot_spawned",
            Self::LootExpired { .. } => "loot_expired",
            Self::LootCollected { .. } => "loot_collected",
        }
    }
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<GameEvent>,
    /// Receiver for collecting events
    receiver: Receiver<GameEvent>,
    /// Channel capacity
    capacity: usize,
    /// Events lost to a full channel
    dropped: AtomicU64,
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
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
            dropped: AtomicU64::new(0),
        }
    }

    /// Publishes an event to the bus.
    ///
    /// Never blocks; when the bus is full the event is dropped and counted.
    pub fn publish(&self, event: GameEvent) {
        if let Err(err) = self.sender.try_send(event) {
            let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            warn!(
                tag = err.into_inner().tag(),
                total, "Event bus full, dropping event"
            );
        }
    }

    /// Publishes a batch of events in order.
    pub fn publish_all(&self, events: impl IntoIterator<Item = GameEvent>) {
        for event in events {
            self.publish(event);
        }
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
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

    /// Events dropped because the bus was full.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(8);
        bus.publish(GameEvent::NightRespawn { count: 3 });
        bus.publish(GameEvent::MonsterRemoved {
            id: MonsterId::from_raw(1),
        });

        assert_eq!(bus.pending_count(), 2);
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].tag(), "night_respawn");
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops_events() {
        let bus = EventBus::new(1);
        bus.publish(GameEvent::NightRespawn { count: 1 });
        bus.publish(GameEvent::NightRespawn { count: 2 });

        let events = bus.drain();
        assert_eq!(events, vec![GameEvent::NightRespawn { count: 1 }]);
        assert_eq!(bus.dropped_count(), 1);
    }

    #[test]
    fn test_full_bus_counts_each_dropped_kill() {
        let bus = EventBus::new(2);
        let kill = |raw| {
            GameEvent::MonsterKilled(KillEvent {
                id: MonsterId::from_raw(raw),
                kind: MonsterKind::Beast,
                position: Vec3::ZERO,
            })
        };
        bus.publish_all((1..=5).map(kill));

        assert_eq!(bus.drain().len(), 2);
        assert_eq!(bus.dropped_count(), 3);
        bus.publish(kill(6));
        assert_eq!(bus.pending_count(), 1);
        assert_eq!(bus.dropped_count(), 3);
    }

    #[test]
    fn test_kill_event_serializes() {
        let kill = KillEvent {
            id: MonsterId::from_raw(5),
            kind: MonsterKind::Kraken,
            position: Vec3::new(1.0, 0.0, 2.0),
        };
        let json = serde_json::to_string(&GameEvent::MonsterKilled(kill)).expect("serialize");
        assert!(json.contains("Kraken"));
    }
}
