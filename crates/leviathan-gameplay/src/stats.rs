//! Player stats accumulator: kills and collected rewards.
//!
//! Counters only grow during a session; [`PlayerStats::reset`] is the one way
//! to bring them back to zero.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::kind::Reward;

/// Running total for one reward name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTally {
    /// Times collected
    pub count: u32,
    /// Summed value of collected rewards
    pub value: u64,
    /// Display color
    pub color: u32,
}

/// Kill and reward counters for the current session.
#[derive(Debug, Clone, Default)]
pub struct PlayerStats {
    kills: u64,
    rewards: AHashMap<String, RewardTally>,
    total_value: u64,
}

impl PlayerStats {
    /// Creates empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a monster kill.
    pub fn record_kill(&mut self) {
        self.kills = self.kills.saturating_add(1);
    }

    /// Awards a collected reward.
    pub fn award(&mut self, reward: &Reward) {
        let tally = self.rewards.entry(reward.name.to_string()).or_default();
        tally.count = tally.count.saturating_add(1);
        tally.value = tally.value.saturating_add(u64::from(reward.value));
        tally.color = reward.color;
        self.total_value = self.total_value.saturating_add(u64::from(reward.value));
    }

    /// Kills this session.
    #[must_use]
    pub const fn kills(&self) -> u64 {
        self.kills
    }

    /// Times a reward has been collected.
    #[must_use]
    pub fn count(&self, name: &str) -> u32 {
        self.rewards.get(name).map_or(0, |t| t.count)
    }

    /// Tally for one reward name.
    #[must_use]
    pub fn tally(&self, name: &str) -> Option<&RewardTally> {
        self.rewards.get(name)
    }

    /// Summed value of every collected reward.
    #[must_use]
    pub const fn total_value(&self) -> u64 {
        self.total_value
    }

    /// Ordered copy for display and serialization.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            kills: self.kills,
            total_value: self.total_value,
            rewards: self
                .rewards
                .iter()
                .map(|(name, tally)| (name.clone(), *tally))
                .collect(),
        }
    }

    /// Clears everything for a new session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Serializable view of [`PlayerStats`], ordered by reward name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Kills this session
    pub kills: u64,
    /// Summed reward value
    pub total_value: u64,
    /// Per-reward tallies
    pub rewards: BTreeMap<String, RewardTally>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::MonsterKind;

    #[test]
    fn test_award_accumulates() {
        let mut stats = PlayerStats::new();
        let scale = MonsterKind::Beast.reward();
        stats.award(&scale);
        stats.award(&scale);
        stats.award(&MonsterKind::Jellyfish.reward());

        assert_eq!(stats.count("Monster Scale"), 2);
        assert_eq!(stats.count("Crimson Crystal"), 1);
        assert_eq!(stats.count("Abyssal Pearl"), 0);
        assert_eq!(stats.total_value(), 5 + 5 + 15);
        assert_eq!(stats.tally("Monster Scale").map(|t| t.value), Some(10));
    }

    #[test]
    fn test_snapshot_is_ordered() {
        let mut stats = PlayerStats::new();
        stats.award(&MonsterKind::Serpent.reward());
        stats.award(&MonsterKind::Kraken.reward());
        stats.record_kill();

        let snapshot = stats.snapshot();
        let names: Vec<_> = snapshot.rewards.keys().cloned().collect();
        assert_eq!(names, vec!["Abyssal Pearl", "Emerald Fang"]);
        assert_eq!(snapshot.kills, 1);
    }

    #[test]
    fn test_reset() {
        let mut stats = PlayerStats::new();
        stats.record_kill();
        stats.award(&MonsterKind::Beast.reward());
        stats.reset();

        assert_eq!(stats.kills(), 0);
        assert_eq!(stats.count("Monster Scale"), 0);
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }
}
