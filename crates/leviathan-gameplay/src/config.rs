//! Tunable parameters for sea monster behavior.
//!
//! Every distance is in world units, every duration in seconds, every speed in
//! world units per second. Defaults reproduce the shipped game balance.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::kind::MonsterKind;

/// Top-level monster configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    /// Maximum live (non-dying) monsters
    pub max_population: usize,
    /// Base swim speed
    pub base_speed: f32,
    /// Range at which a lurking monster can notice the player
    pub detection_range: f32,
    /// Range at which a hunting monster surfaces to attack
    pub attack_range: f32,
    /// Resting depth (negative, below the surface)
    pub depth_floor: f32,
    /// Time spent on the surface after surfacing
    pub surface_time: f32,
    /// Random extra surface time added after surfacing
    pub surface_jitter: f32,
    /// Random extra surface time given to freshly spawned monsters
    pub spawn_surface_jitter: f32,
    /// Time budget for an unprompted rise from the depths
    pub surfacing_time: f32,
    /// Time budget for a rise to attack a nearby player
    pub fast_surfacing_time: f32,
    /// Time spent lurking after a dive
    pub dive_time: f32,
    /// Time budget for a dive back to depth
    pub diving_time: f32,
    /// Time spent hunting before deciding to surface or give up
    pub hunt_time: f32,
    /// Distance at which a charge counts as a pass through the player
    pub close_hit_distance: f32,
    /// Minimum repositioning time between charges
    pub reposition_time: f32,
    /// Random extra repositioning time
    pub reposition_jitter: f32,
    /// Time a wounded monster keeps its flee velocity
    pub recoil_time: f32,
    /// Length of the death animation before removal
    pub dying_time: f32,
    /// Initial sinking speed of a dying monster
    pub dying_sink_speed: f32,
    /// Downward acceleration of a dying monster
    pub dying_sink_acceleration: f32,
    /// Horizontal radius beyond which monsters are pulled back
    pub world_radius: f32,
    /// Speed added per second toward the origin outside the world radius
    pub world_pull: f32,
    /// Spawn placement
    pub spawn: SpawnConfig,
    /// Kind selection weights
    pub weights: KindWeights,
    /// Player contact damage
    pub contact: ContactConfig,
    /// Ship cannons
    pub cannon: CannonConfig,
    /// Loot drops
    pub loot: LootConfig,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            max_population: 15,
            base_speed: 18.0,
            detection_range: 200.0,
            attack_range: 50.0,
            depth_floor: -20.0,
            surface_time: 10.0,
            surface_jitter: 2.0,
            spawn_surface_jitter: 20.0,
            surfacing_time: 5.0,
            fast_surfacing_time: 3.0,
            dive_time: 30.0,
            diving_time: 5.0,
            hunt_time: 10.0,
            close_hit_distance: 5.0,
            reposition_time: 5.0,
            reposition_jitter: 2.0,
            recoil_time: 0.5,
            dying_time: 3.0,
            dying_sink_speed: 12.0,
            dying_sink_acceleration: 36.0,
            world_radius: 5000.0,
            world_pull: 3.0,
            spawn: SpawnConfig::default(),
            weights: KindWeights::default(),
            contact: ContactConfig::default(),
            cannon: CannonConfig::default(),
            loot: LootConfig::default(),
        }
    }
}

impl MonsterConfig {
    /// Validate and clamp values to sensible ranges.
    ///
    /// Returns the number of fields that had to be clamped.
    pub fn validate(&mut self) -> usize {
        let mut clamped = 0;
        let mut clamp = |name: &str, value: &mut f32, min: f32, max: f32| {
            let fixed = if value.is_nan() { min } else { value.clamp(min, max) };
            if (fixed - *value).abs() > f32::EPSILON || value.is_nan() {
                warn!("Clamped monster config {name}: {value} -> {fixed}");
                *value = fixed;
                clamped += 1;
            }
        };

        clamp("base_speed", &mut self.base_speed, 0.1, 500.0);
        clamp("attack_range", &mut self.attack_range, 1.0, 10_000.0);
        clamp(
            "detection_range",
            &mut self.detection_range,
            self.attack_range,
            20_000.0,
        );
        clamp("depth_floor", &mut self.depth_floor, -1000.0, -1.0);
        clamp("surface_time", &mut self.surface_time, 0.1, 600.0);
        clamp("surface_jitter", &mut self.surface_jitter, 0.0, 600.0);
        clamp("dying_time", &mut self.dying_time, 0.1, 60.0);
        clamp("hit_cooldown", &mut self.contact.cooldown, 0.0, 60.0);
        clamp("contact_radius", &mut self.contact.radius, 0.0, 1000.0);
        clamp("cannon_range", &mut self.cannon.range, 1.0, 10_000.0);
        clamp("loot_lifetime", &mut self.loot.lifetime, 0.1, 3600.0);
        clamp("collect_radius", &mut self.loot.collect_radius, 0.0, 1000.0);

        for ring in [&mut self.spawn.initial_ring, &mut self.spawn.respawn_ring] {
            if ring.min < 0.0 || ring.max < ring.min {
                warn!("Invalid spawn ring [{}, {}], resetting", ring.min, ring.max);
                ring.min = ring.min.max(0.0);
                ring.max = ring.max.max(ring.min);
                clamped += 1;
            }
        }

        if self.max_population == 0 {
            warn!("max_population of 0 disables monsters entirely");
        }

        clamped
    }
}

/// A horizontal band around a center point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRing {
    /// Inner radius
    pub min: f32,
    /// Outer radius
    pub max: f32,
}

impl SpawnRing {
    /// Creates a spawn ring.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Maps a unit roll to a radius within the ring.
    #[must_use]
    pub fn radius_at(&self, roll: f32) -> f32 {
        self.min + roll.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

/// Spawn placement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Ring around the player used at world-seed time
    pub initial_ring: SpawnRing,
    /// Ring around the player used for night respawns
    pub respawn_ring: SpawnRing,
    /// Height of monsters placed at world-seed time
    pub initial_height: f32,
    /// Half-width of the origin-centered box used when there is no player
    pub fallback_extent: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_ring: SpawnRing::new(200.0, 1000.0),
            respawn_ring: SpawnRing::new(300.0, 800.0),
            initial_height: 5.0,
            fallback_extent: 500.0,
        }
    }
}

/// Relative spawn weights per monster kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindWeights {
    /// Beast weight
    pub beast: f32,
    /// Kraken weight
    pub kraken: f32,
    /// Serpent weight
    pub serpent: f32,
    /// Jellyfish weight
    pub jellyfish: f32,
}

impl Default for KindWeights {
    fn default() -> Self {
        Self {
            beast: 0.4,
            kraken: 0.2,
            serpent: 0.2,
            jellyfish: 0.2,
        }
    }
}

impl KindWeights {
    /// Weight for a single kind.
    #[must_use]
    pub fn weight(&self, kind: MonsterKind) -> f32 {
        let w = match kind {
            MonsterKind::Beast => self.beast,
            MonsterKind::Kraken => self.kraken,
            MonsterKind::Serpent => self.serpent,
            MonsterKind::Jellyfish => self.jellyfish,
        };
        w.max(0.0)
    }

    /// Picks a kind from a unit roll using cumulative weights.
    ///
    /// Falls back to [`MonsterKind::Beast`] when every weight is zero.
    #[must_use]
    pub fn pick(&self, roll: f32) -> MonsterKind {
        let total: f32 = MonsterKind::ALL.iter().map(|&k| self.weight(k)).sum();
        if total <= 0.0 {
            return MonsterKind::Beast;
        }

        let target = roll.clamp(0.0, 1.0) * total;
        let mut cumulative = 0.0;
        for kind in MonsterKind::ALL {
            cumulative += self.weight(kind);
            if target < cumulative {
                return kind;
            }
        }
        MonsterKind::Beast
    }
}

/// Contact damage dealt to the player by surfaced monsters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Distance at which an attacking monster strikes the boat
    pub radius: f32,
    /// Global time between two contact hits
    pub cooldown: f32,
    /// Damage reported per hit
    pub damage: i32,
    /// Magnitude of the velocity impulse applied to the boat
    pub knockback: f32,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            radius: 15.0,
            cooldown: 1.5,
            damage: 1,
            knockback: 0.5,
        }
    }
}

/// Ship cannon battery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannonConfig {
    /// Maximum volley range
    pub range: f32,
    /// Damage per hit
    pub damage: i32,
    /// Time between volleys
    pub cooldown: f32,
    /// Cannonball lifetime
    pub ball_lifetime: f32,
    /// Downward acceleration of cannonballs
    pub ball_gravity: f32,
    /// Distance at which a cannonball strikes a monster
    pub ball_hit_radius: f32,
}

impl Default for CannonConfig {
    fn default() -> Self {
        Self {
            range: 100.0,
            damage: 3,
            cooldown: 3.0,
            ball_lifetime: 3.0,
            ball_gravity: 36.0,
            ball_hit_radius: 5.0,
        }
    }
}

/// Loot drop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    /// Time a drop floats before sinking
    pub lifetime: f32,
    /// Distance at which the boat picks a drop up
    pub collect_radius: f32,
    /// Height drops float at
    pub float_height: f32,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            lifetime: 30.0,
            collect_radius: 5.0,
            float_height: 0.5,
        }
    }
}
