//! Monster archetypes and their static tables.
//!
//! Each kind fixes base health, the reward it drops, and the animation rate
//! the renderer uses for its tentacles, fins, or segments.

use serde::{Deserialize, Serialize};

use crate::monster::MonsterState;

/// Closed set of monster archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    /// Yellow tentacled beast, the most common kind
    Beast,
    /// Many-armed kraken that lunges at close range
    Kraken,
    /// Segmented serpent with long-range strikes
    Serpent,
    /// Phantom jellyfish that charges an electric discharge
    Jellyfish,
}

impl MonsterKind {
    /// All kinds, in table order.
    pub const ALL: [Self; 4] = [Self::Beast, Self::Kraken, Self::Serpent, Self::Jellyfish];

    /// Get display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Beast => "Yellow Beast",
            Self::Kraken => "Kraken",
            Self::Serpent => "Sea Serpent",
            Self::Jellyfish => "Phantom Jellyfish",
        }
    }

    /// Starting (and maximum) health.
    #[must_use]
    pub const fn max_health(self) -> i32 {
        match self {
            Self::Beast | Self::Jellyfish => 3,
            Self::Kraken => 6,
            Self::Serpent => 4,
        }
    }

    /// Reward dropped when this kind is killed.
    #[must_use]
    pub const fn reward(self) -> Reward {
        REWARDS[self as usize]
    }

    /// Looks a kind up by table index, falling back to [`MonsterKind::Beast`].
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Self::Beast)
    }

    /// Parses a kind name, falling back to [`MonsterKind::Beast`].
    ///
    /// Accepts variant names, display names, and the camel-case tags used by
    /// the web client (`yellowBeast`, `seaSerpent`, ...), case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "kraken" => Self::Kraken,
            "serpent" | "seaserpent" => Self::Serpent,
            "jellyfish" | "phantomjellyfish" => Self::Jellyfish,
            _ => Self::Beast,
        }
    }

    /// Animation rate for tentacles, fins, or body segments.
    #[must_use]
    pub fn animation_rate(self, state: MonsterState) -> f32 {
        match self {
            Self::Beast => {
                if state == MonsterState::Attacking {
                    5.0
                } else {
                    2.0
                }
            },
            Self::Kraken => 3.0,
            Self::Serpent => 2.0,
            Self::Jellyfish => 1.5,
        }
    }
}

/// Collectible reward definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reward {
    /// Display name, also the stats key
    pub name: &'static str,
    /// Trade value
    pub value: u32,
    /// RGB color for the floating orb
    pub color: u32,
    /// Flavor text
    pub description: &'static str,
}

/// Rewards indexed by [`MonsterKind`] discriminant.
const REWARDS: [Reward; 4] = [
    Reward {
        name: "Monster Scale",
        value: 5,
        color: 0x00FF_D700,
        description: "A glimmering scale from a sea beast.",
    },
    Reward {
        name: "Abyssal Pearl",
        value: 8,
        color: 0x0000_BFFF,
        description: "A mysterious pearl with swirling blue patterns.",
    },
    Reward {
        name: "Emerald Fang",
        value: 12,
        color: 0x0032_CD32,
        description: "A razor-sharp tooth with verdant energy.",
    },
    Reward {
        name: "Crimson Crystal",
        value: 15,
        color: 0x00FF_4500,
        description: "A blood-red crystal that pulses with heat.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_table() {
        assert_eq!(MonsterKind::Beast.max_health(), 3);
        assert_eq!(MonsterKind::Kraken.max_health(), 6);
        assert_eq!(MonsterKind::Serpent.max_health(), 4);
        assert_eq!(MonsterKind::Jellyfish.max_health(), 3);
    }

    #[test]
    fn test_rewards_are_distinct() {
        let names: Vec<_> = MonsterKind::ALL.iter().map(|k| k.reward().name).collect();
        assert_eq!(MonsterKind::Beast.reward().name, "Monster Scale");
        for (i, a) in names.iter().enumerate() {
            assert!(!names[i + 1..].contains(a));
        }
    }

    #[test]
    fn test_from_name_variants() {
        assert_eq!(MonsterKind::from_name("kraken"), MonsterKind::Kraken);
        assert_eq!(MonsterKind::from_name("seaSerpent"), MonsterKind::Serpent);
        assert_eq!(
            MonsterKind::from_name("Phantom Jellyfish"),
            MonsterKind::Jellyfish
        );
        assert_eq!(MonsterKind::from_name("yellowBeast"), MonsterKind::Beast);
    }

    #[test]
    fn test_unknown_kind_falls_back() {
        assert_eq!(MonsterKind::from_name("blueDevil"), MonsterKind::Beast);
        assert_eq!(MonsterKind::from_index(99), MonsterKind::Beast);
        assert_eq!(MonsterKind::from_index(1), MonsterKind::Kraken);
    }

    #[test]
    fn test_beast_animates_faster_when_attacking() {
        let calm = MonsterKind::Beast.animation_rate(MonsterState::Lurking);
        let angry = MonsterKind::Beast.animation_rate(MonsterState::Attacking);
        assert!(angry > calm);
    }
}
