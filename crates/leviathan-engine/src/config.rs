//! Engine configuration.
//!
//! Session length, tick rate, and the monster tunables, loaded from and saved
//! to a TOML file.

use leviathan_common::{ConfigError, LeviathanResult};
use leviathan_gameplay::MonsterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Session Settings ===
    /// Seed for every random roll in the session
    pub seed: u64,
    /// Fixed simulation ticks per second
    pub tick_rate: u32,
    /// Game seconds to simulate
    pub session_seconds: f32,
    /// Length of a full day/night cycle in seconds
    pub day_length: f32,

    // === Boat Settings ===
    /// Radius of the circle the boat sails
    pub sail_radius: f32,
    /// Boat speed along its circle
    pub sail_speed: f32,
    /// Cannon mounts relative to the boat
    pub cannon_offsets: Vec<[f32; 3]>,

    // === Monsters ===
    /// Sea monster tunables
    pub monsters: MonsterConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EA_B0A7,
            tick_rate: 60,
            session_seconds: 300.0,
            day_length: 200.0,

            sail_radius: 120.0,
            sail_speed: 12.0,
            cannon_offsets: vec![[-2.0, 1.0, 0.0], [2.0, 1.0, 0.0]],

            monsters: MonsterConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml(contents: &str) -> LeviathanResult<Self> {
        let mut config: Self = toml::from_str(contents).map_err(ConfigError::from)?;
        config.validate();
        Ok(config)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match Self::from_toml(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> LeviathanResult<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).map_err(ConfigError::from)?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Session
        self.tick_rate = self.tick_rate.clamp(1, 240);
        if !self.session_seconds.is_finite() {
            self.session_seconds = 0.0;
        }
        self.session_seconds = self.session_seconds.clamp(0.0, 86_400.0);
        self.day_length = self.day_length.max(1.0);

        // Boat
        self.sail_radius = self.sail_radius.clamp(0.0, 5_000.0);
        self.sail_speed = self.sail_speed.clamp(0.0, 200.0);
        if self.cannon_offsets.is_empty() {
            warn!("No cannon mounts configured, using one on deck");
            self.cannon_offsets.push([0.0, 1.0, 0.0]);
        }

        let clamped = self.monsters.validate();
        if clamped > 0 {
            warn!("Clamped {clamped} monster settings");
        }
    }

    /// Fixed timestep in seconds.
    #[must_use]
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}
