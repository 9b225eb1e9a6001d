//! Scripted headless session.
//!
//! A boat sails a slow circle through monster waters, firing its cannons
//! whenever something is surfaced within range, while the day cycle drives
//! night respawns.

use std::collections::BTreeMap;

use glam::Vec3;
use leviathan_common::LeviathanResult;
use leviathan_gameplay::{
    CannonBattery, DayCycle, NullScene, PlayerBoat, SimClock, Simulation, StatsSnapshot, TimeSource,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::timing::FixedStep;

/// Host frame duration fed to the fixed-step accumulator.
const FRAME_DT: f32 = 1.0 / 30.0;

/// Per-tick decay of the boat's knockback velocity.
const BOAT_DRAG: f32 = 0.98;

/// What a finished session reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    /// Game seconds simulated
    pub seconds: f64,
    /// Fixed ticks run
    pub ticks: u64,
    /// Kill counter and collected rewards
    pub stats: StatsSnapshot,
    /// Monsters still alive at the end
    pub live_monsters: usize,
    /// Monsters spawned over the session
    pub spawned: u64,
    /// Night respawn waves
    pub night_respawns: u64,
    /// Cannon volleys fired
    pub volleys_fired: u64,
    /// Contact hits taken by the boat
    pub contact_hits: u64,
    /// Event counts by tag
    pub events: BTreeMap<&'static str, u64>,
    /// Events lost to a full bus
    pub dropped_events: u64,
}

impl SessionSummary {
    /// Encodes the summary as pretty JSON.
    pub fn to_json(&self) -> LeviathanResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A headless game session.
#[derive(Debug)]
pub struct Session {
    config: EngineConfig,
    sim: Simulation,
    battery: CannonBattery,
    boat: PlayerBoat,
    clock: SimClock,
    cycle: DayCycle,
    step: FixedStep,
    heading: f32,
    knockback: Vec3,
    event_counts: BTreeMap<&'static str, u64>,
}

impl Session {
    /// Creates a session; the world is seeded on the first [`Self::run`].
    #[must_use]
    pub fn new(mut config: EngineConfig) -> Self {
        config.validate();
        let sim = Simulation::new(config.monsters.clone(), config.seed);
        let battery = CannonBattery::from_config(&config.monsters.cannon);
        let boat = PlayerBoat::at(Vec3::new(config.sail_radius, 0.0, 0.0));
        let cycle = DayCycle::new(config.day_length);
        let step = FixedStep::new(config.tick_rate);

        Self {
            config,
            sim,
            battery,
            boat,
            clock: SimClock::new(),
            cycle,
            step,
            heading: 0.0,
            knockback: Vec3::ZERO,
            event_counts: BTreeMap::new(),
        }
    }

    /// The simulation being driven.
    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// The player's boat.
    #[must_use]
    pub fn boat(&self) -> &PlayerBoat {
        &self.boat
    }

    /// Runs the configured number of seconds and summarizes them.
    pub fn run(&mut self) -> SessionSummary {
        let seeded = self.sim.seed_world(Some(self.boat.position));
        info!(
            "Session started: {} monsters, {}s at {} Hz",
            seeded.len(),
            self.config.session_seconds,
            self.config.tick_rate
        );
        self.count_events();

        let end = f64::from(self.config.session_seconds);
        while self.clock.now() < end {
            for _ in 0..self.step.accumulate(FRAME_DT) {
                self.tick(self.step.fixed_dt());
            }
        }

        let summary = self.summary();
        info!(
            "Session finished: {} kills, {} reward value, {} monsters left",
            summary.stats.kills, summary.stats.total_value, summary.live_monsters
        );
        summary
    }

    /// Runs one fixed tick.
    pub fn tick(&mut self, dt: f32) {
        let dt = self.clock.advance(dt);
        self.sail(dt);

        let now = self.clock.now();
        if self.battery.targets_in_range(self.sim.roster(), self.boat.position) > 0 {
            let origins = self.cannon_origins();
            if let Some(volley) = self.battery.try_fire(now, origins) {
                debug!("Cannons fired at {now:.2}s");
                self.sim.queue_volley(volley);
            }
        }

        let phase = self.cycle.phase_at(now);
        self.sim
            .tick(&self.clock, Some(phase), Some(&mut self.boat), &mut NullScene);
        self.count_events();
    }

    /// Current summary without stopping the session.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            seconds: self.clock.now(),
            ticks: self.step.total_steps(),
            stats: self.sim.stats().snapshot(),
            live_monsters: self.sim.live_count(),
            spawned: self.sim.population().spawned_total(),
            night_respawns: self.sim.population().night_respawns(),
            volleys_fired: self.battery.volleys_fired(),
            contact_hits: self.sim.combat().contact_hits(),
            events: self.event_counts.clone(),
            dropped_events: self.sim.events().dropped_count(),
        }
    }

    fn sail(&mut self, dt: f32) {
        let radius = self.config.sail_radius;
        if radius > 0.0 {
            self.heading += self.config.sail_speed / radius * dt;
        }
        let course = Vec3::new(radius * self.heading.cos(), 0.0, radius * self.heading.sin());

        self.knockback += self.boat.velocity * dt;
        self.boat.velocity *= BOAT_DRAG;
        self.boat.position = course + self.knockback;
    }

    fn cannon_origins(&self) -> Vec<Vec3> {
        self.config
            .cannon_offsets
            .iter()
            .map(|offset| self.boat.position + Vec3::from_array(*offset))
            .collect()
    }

    fn count_events(&mut self) {
        for event in self.sim.events().drain() {
            *self.event_counts.entry(event.tag()).or_default() += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config(seconds: f32) -> EngineConfig {
        EngineConfig {
            session_seconds: seconds,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_session_runs_for_configured_time() {
        let mut session = Session::new(short_config(2.0));
        let summary = session.run();

        assert!(summary.seconds >= 2.0);
        assert!((120..=122).contains(&summary.ticks), "ticks = {}", summary.ticks);
        assert_eq!(summary.events.get("monster_spawned"), Some(&15));
        assert_eq!(summary.dropped_events, 0);
    }

    #[test]
    fn test_session_is_deterministic() {
        let a = Session::new(short_config(20.0)).run();
        let b = Session::new(short_config(20.0)).run();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cannons_fire_at_surfaced_monsters() {
        let mut config = short_config(10.0);
        config.monsters.cannon.range = 2_000.0;
        let summary = Session::new(config).run();

        assert!(summary.volleys_fired > 0);
        let killed = summary.events.get("monster_killed").copied().unwrap_or(0);
        assert_eq!(summary.stats.kills, killed);
    }

    #[test]
    fn test_spawn_accounting_across_nights() {
        let mut config = short_config(25.0);
        config.day_length = 10.0;
        config.monsters.cannon.range = 2_000.0;
        config.monsters.cannon.cooldown = 0.5;
        let summary = Session::new(config).run();

        assert!(summary.live_monsters <= 15);
        assert_eq!(summary.events.get("monster_spawned").copied(), Some(summary.spawned));
        assert_eq!(
            summary.events.get("night_respawn").copied().unwrap_or(0),
            summary.night_respawns
        );
    }

    #[test]
    fn test_summary_json() {
        let mut session = Session::new(short_config(1.0));
        let json = session.run().to_json().expect("summary encodes");
        assert!(json.contains("\"kills\""));
        assert!(json.contains("\"monster_spawned\""));
    }
}
