//! Loot drops: spawned on kills, collected by proximity, sunk on timeout.

use glam::Vec3;
use leviathan_common::{IdAllocator, LootId};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::LootConfig;
use crate::events::{GameEvent, KillEvent};
use crate::kind::{MonsterKind, Reward};
use crate::stats::PlayerStats;

/// A floating reward waiting to be collected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LootDrop {
    /// Loot ID
    pub id: LootId,
    /// Kind of the monster that dropped it
    pub kind: MonsterKind,
    /// What collecting it awards
    pub reward: Reward,
    /// Floating position
    pub position: Vec3,
    /// Game time of creation
    pub created_at: f64,
}

impl LootDrop {
    /// Seconds since the drop appeared.
    #[must_use]
    pub fn age(&self, now: f64) -> f64 {
        now - self.created_at
    }
}

/// How a drop left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LootFate {
    /// Picked up by the player
    Collected,
    /// Lifetime ran out
    Expired,
}

/// Drops removed during one [`LootLifecycle::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LootTick {
    /// Removed drops and how each one went
    pub removed: Vec<(LootDrop, LootFate)>,
}

impl LootTick {
    /// Number of drops collected this tick.
    #[must_use]
    pub fn collected(&self) -> usize {
        self.removed
            .iter()
            .filter(|(_, fate)| *fate == LootFate::Collected)
            .count()
    }

    /// Number of drops that expired this tick.
    #[must_use]
    pub fn expired(&self) -> usize {
        self.removed.len() - self.collected()
    }
}

/// Owns every live loot drop.
#[derive(Debug, Default)]
pub struct LootLifecycle {
    drops: Vec<LootDrop>,
    ids: IdAllocator,
}

impl LootLifecycle {
    /// Creates an empty lifecycle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Materializes the reward for a kill at the monster's last position.
    pub fn on_kill(
        &mut self,
        kill: &KillEvent,
        now: f64,
        config: &LootConfig,
        events: &mut Vec<GameEvent>,
    ) -> LootId {
        let id = self.ids.next_loot();
        let reward = kill.kind.reward();
        let position = Vec3::new(kill.position.x, config.float_height, kill.position.z);

        self.drops.push(LootDrop {
            id,
            kind: kill.kind,
            reward,
            position,
            created_at: now,
        });
        debug!(%id, reward = reward.name, ?position, "Loot spawned");
        events.push(GameEvent::LootSpawned {
            loot: id,
            reward: reward.name.to_string(),
            position,
        });
        id
    }

    /// Collects drops near the player and expires old ones.
    ///
    /// Each drop is checked for collection first; only drops that were not
    /// collected can expire. Removal happens after every drop was examined.
    pub fn tick(
        &mut self,
        now: f64,
        player: Option<Vec3>,
        config: &LootConfig,
        stats: &mut PlayerStats,
        events: &mut Vec<GameEvent>,
    ) -> LootTick {
        let reach = player.map(|p| Vec3::new(p.x, config.float_height, p.z));

        let fates: Vec<(usize, LootFate)> = self
            .drops
            .iter()
            .enumerate()
            .filter_map(|(index, drop)| {
                let collected =
                    reach.is_some_and(|p| drop.position.distance(p) < config.collect_radius);
                if collected {
                    Some((index, LootFate::Collected))
                } else if drop.age(now) > f64::from(config.lifetime) {
                    Some((index, LootFate::Expired))
                } else {
                    None
                }
            })
            .collect();

        let mut report = LootTick::default();
        for &(index, fate) in fates.iter().rev() {
            let drop = self.drops.remove(index);
            match fate {
                LootFate::Collected => {
                    stats.award(&drop.reward);
                    info!(id = %drop.id, reward = drop.reward.name, "Loot collected");
                    events.push(GameEvent::LootCollected {
                        loot: drop.id,
                        reward: drop.reward.name.to_string(),
                    });
                }
                LootFate::Expired => {
                    debug!(id = %drop.id, "Loot expired");
                    events.push(GameEvent::LootExpired { loot: drop.id });
                }
            }
            report.removed.push((drop, fate));
        }
        report.removed.reverse();
        report
    }

    /// Removes a drop. Removing an absent ID is a no-op.
    pub fn remove(&mut self, id: LootId) -> Option<LootDrop> {
        let index = self.drops.iter().position(|d| d.id == id)?;
        Some(self.drops.remove(index))
    }

    /// Live drops in creation order.
    #[must_use]
    pub fn drops(&self) -> &[LootDrop] {
        &self.drops
    }

    /// Gets a drop.
    #[must_use]
    pub fn get(&self, id: LootId) -> Option<&LootDrop> {
        self.drops.iter().find(|d| d.id == id)
    }

    /// Number of live drops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drops.len()
    }

    /// Whether there are no drops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    /// Drops everything.
    pub fn clear(&mut self) {
        self.drops.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leviathan_common::MonsterId;

    fn kill(kind: MonsterKind, position: Vec3) -> KillEvent {
        KillEvent {
            id: MonsterId::from_raw(1),
            kind,
            position,
        }
    }

    #[test]
    fn test_on_kill_places_drop() {
        let config = LootConfig::default();
        let mut loot = LootLifecycle::new();
        let mut events = Vec::new();

        let id = loot.on_kill(&kill(MonsterKind::Kraken, Vec3::new(10.0, -3.0, 4.0)), 2.0, &config, &mut events);
        let drop = loot.get(id).expect("drop exists");
        assert_eq!(drop.reward.name, "Abyssal Pearl");
        assert_eq!(drop.position, Vec3::new(10.0, config.float_height, 4.0));
        assert_eq!(drop.created_at, 2.0);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_collect_awards_reward() {
        let config = LootConfig::default();
        let mut loot = LootLifecycle::new();
        let mut stats = PlayerStats::new();
        let mut events = Vec::new();
        loot.on_kill(&kill(MonsterKind::Beast, Vec3::new(10.0, 0.0, 0.0)), 0.0, &config, &mut events);

        let report = loot.tick(1.0, Some(Vec3::new(20.0, 0.0, 0.0)), &config, &mut stats, &mut events);
        assert!(report.removed.is_empty());

        let report = loot.tick(2.0, Some(Vec3::new(13.0, 0.0, 0.0)), &config, &mut stats, &mut events);
        assert_eq!(report.collected(), 1);
        assert_eq!(stats.count("Monster Scale"), 1);
        assert!(loot.is_empty());
    }

    #[test]
    fn test_expiry_without_player() {
        let config = LootConfig::default();
        let mut loot = LootLifecycle::new();
        let mut stats = PlayerStats::new();
        let mut events = Vec::new();
        loot.on_kill(&kill(MonsterKind::Serpent, Vec3::ZERO), 0.0, &config, &mut events);

        assert!(loot.tick(30.0, None, &config, &mut stats, &mut events).removed.is_empty());
        let report = loot.tick(31.0, None, &config, &mut stats, &mut events);
        assert_eq!(report.expired(), 1);
        assert_eq!(stats.count("Emerald Fang"), 0);
        assert!(loot.is_empty());
    }

    #[test]
    fn test_collection_beats_expiry() {
        let config = LootConfig::default();
        let mut loot = LootLifecycle::new();
        let mut stats = PlayerStats::new();
        let mut events = Vec::new();
        loot.on_kill(&kill(MonsterKind::Jellyfish, Vec3::ZERO), 0.0, &config, &mut events);

        let report = loot.tick(45.0, Some(Vec3::ZERO), &config, &mut stats, &mut events);
        assert_eq!(report.removed.len(), 1);
        assert_eq!(report.removed[0].1, LootFate::Collected);
        assert_eq!(stats.count("Crimson Crystal"), 1);
    }

    #[test]
    fn test_mixed_removal_keeps_order() {
        let config = LootConfig::default();
        let mut loot = LootLifecycle::new();
        let mut stats = PlayerStats::new();
        let mut events = Vec::new();
        let old = loot.on_kill(&kill(MonsterKind::Beast, Vec3::new(500.0, 0.0, 0.0)), 0.0, &config, &mut events);
        let keep = loot.on_kill(&kill(MonsterKind::Beast, Vec3::new(900.0, 0.0, 0.0)), 20.0, &config, &mut events);
        let near = loot.on_kill(&kill(MonsterKind::Kraken, Vec3::ZERO), 20.0, &config, &mut events);

        let report = loot.tick(35.0, Some(Vec3::ZERO), &config, &mut stats, &mut events);
        let ids: Vec<_> = report.removed.iter().map(|(d, _)| d.id).collect();
        assert_eq!(ids, vec![old, near]);
        assert_eq!(loot.drops().len(), 1);
        assert_eq!(loot.drops()[0].id, keep);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let config = LootConfig::default();
        let mut loot = LootLifecycle::new();
        let mut events = Vec::new();
        let id = loot.on_kill(&kill(MonsterKind::Beast, Vec3::ZERO), 0.0, &config, &mut events);

        assert!(loot.remove(id).is_some());
        assert!(loot.remove(id).is_none());
    }
}
