//! Population management: bounded spawning and the night respawn trigger.

use glam::Vec3;
use leviathan_common::{ring_point, MonsterId};
use tracing::{debug, info, warn};

use crate::config::{MonsterConfig, SpawnRing};
use crate::dice::Dice;
use crate::events::GameEvent;
use crate::kind::MonsterKind;
use crate::monster::{Monster, MonsterError, MonsterResult, MonsterRoster};
use crate::time::DayPhase;

/// Where new monsters are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnStrategy {
    /// Wide ring around the player, near the surface, when the world is seeded
    WorldSeed,
    /// Narrower ring around the player's current position, at depth
    Respawn,
}

impl SpawnStrategy {
    fn ring(self, config: &MonsterConfig) -> SpawnRing {
        match self {
            Self::WorldSeed => config.spawn.initial_ring,
            Self::Respawn => config.spawn.respawn_ring,
        }
    }

    fn height(self, config: &MonsterConfig) -> f32 {
        match self {
            Self::WorldSeed => config.spawn.initial_height,
            Self::Respawn => config.depth_floor,
        }
    }

    /// Picks a spawn position.
    ///
    /// Without a player the position falls back to a box around the world
    /// origin instead of failing.
    pub fn position(self, config: &MonsterConfig, dice: &mut Dice, player: Option<Vec3>) -> Vec3 {
        let y = self.height(config);
        match player {
            Some(center) => {
                let angle = dice.angle();
                let radius = self.ring(config).radius_at(dice.roll());
                ring_point(center, angle, radius, y)
            }
            None => {
                let extent = config.spawn.fallback_extent * 2.0;
                Vec3::new(dice.centered() * extent, y, dice.centered() * extent)
            }
        }
    }
}

/// Mutable world state a spawn needs.
#[derive(Debug)]
pub struct SpawnContext<'a> {
    /// Monsters in the world
    pub roster: &'a mut MonsterRoster,
    /// Tunables
    pub config: &'a MonsterConfig,
    /// Randomness source
    pub dice: &'a mut Dice,
    /// Player position, if any
    pub player: Option<Vec3>,
    /// Event sink
    pub events: &'a mut Vec<GameEvent>,
}

/// Keeps the monster count bounded and tops it up when night falls.
#[derive(Debug, Clone, Default)]
pub struct PopulationManager {
    last_phase: Option<DayPhase>,
    spawned_total: u64,
    night_respawns: u64,
}

impl PopulationManager {
    /// Creates a manager that has not seen any day phase yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Monsters spawned this session.
    #[must_use]
    pub const fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// Night respawns that spawned at least one monster.
    #[must_use]
    pub const fn night_respawns(&self) -> u64 {
        self.night_respawns
    }

    /// Last phase seen by [`Self::on_day_night_transition`].
    #[must_use]
    pub const fn last_phase(&self) -> Option<DayPhase> {
        self.last_phase
    }

    /// Spawns one monster of `kind` at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`MonsterError::PopulationFull`] when the live population is
    /// already at the cap.
    pub fn spawn(
        &mut self,
        ctx: &mut SpawnContext<'_>,
        kind: MonsterKind,
        position: Vec3,
    ) -> MonsterResult<MonsterId> {
        let cap = ctx.config.max_population;
        if ctx.roster.live_count() >= cap {
            return Err(MonsterError::PopulationFull { cap });
        }

        let config = ctx.config;
        let velocity = Vec3::new(
            ctx.dice.centered() * config.base_speed,
            0.0,
            ctx.dice.centered() * config.base_speed,
        );
        let timer = config.surface_time + ctx.dice.roll() * config.spawn_surface_jitter;
        let id = ctx
            .roster
            .insert_with(|id| Monster::new(id, kind, position, velocity, timer));

        self.spawned_total += 1;
        debug!(%id, ?kind, ?position, "Monster spawned");
        ctx.events.push(GameEvent::MonsterSpawned { id, kind, position });
        Ok(id)
    }

    /// Spawns up to `count` monsters with weighted kinds.
    ///
    /// The count is clamped to the room left under the population cap.
    pub fn spawn_initial(
        &mut self,
        ctx: &mut SpawnContext<'_>,
        count: usize,
        strategy: SpawnStrategy,
    ) -> Vec<MonsterId> {
        let room = ctx
            .config
            .max_population
            .saturating_sub(ctx.roster.live_count());
        if count > room {
            warn!("Requested {count} monsters but only {room} fit under the cap");
        }
        if ctx.player.is_none() && count > 0 {
            warn!("No player position; spawning around the world origin");
        }

        let mut spawned = Vec::with_capacity(count.min(room));
        for _ in 0..count.min(room) {
            let kind = ctx.config.weights.pick(ctx.dice.roll());
            let position = strategy.position(ctx.config, ctx.dice, ctx.player);
            match self.spawn(ctx, kind, position) {
                Ok(id) => spawned.push(id),
                Err(err) => {
                    warn!("Spawn stopped early: {err}");
                    break;
                }
            }
        }
        spawned
    }

    /// Reacts to the day/night signal.
    ///
    /// On the first tick of a night, tops the live population back up to the
    /// cap with the respawn strategy. Staying in night, or any other phase,
    /// spawns nothing.
    pub fn on_day_night_transition(
        &mut self,
        ctx: &mut SpawnContext<'_>,
        phase: DayPhase,
    ) -> Vec<MonsterId> {
        let was_night = self.last_phase.is_some_and(DayPhase::is_night);
        self.last_phase = Some(phase);
        if !phase.is_night() || was_night {
            return Vec::new();
        }

        let deficit = ctx
            .config
            .max_population
            .saturating_sub(ctx.roster.live_count());
        if deficit == 0 {
            debug!("Night fell with a full population");
            return Vec::new();
        }

        info!("Night has fallen, respawning {deficit} sea monsters");
        let spawned = self.spawn_initial(ctx, deficit, SpawnStrategy::Respawn);
        if !spawned.is_empty() {
            self.night_respawns += 1;
            ctx.events.push(GameEvent::NightRespawn {
                count: spawned.len(),
            });
        }
        spawned
    }

    /// Forgets phase history and counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leviathan_common::SeaPlane;

    struct World {
        roster: MonsterRoster,
        config: MonsterConfig,
        dice: Dice,
        events: Vec<GameEvent>,
    }

    impl World {
        fn new(max_population: usize) -> Self {
            Self {
                roster: MonsterRoster::new(),
                config: MonsterConfig {
                    max_population,
                    ..MonsterConfig::default()
                },
                dice: Dice::seeded(7),
                events: Vec::new(),
            }
        }

        fn ctx(&mut self, player: Option<Vec3>) -> SpawnContext<'_> {
            SpawnContext {
                roster: &mut self.roster,
                config: &self.config,
                dice: &mut self.dice,
                player,
                events: &mut self.events,
            }
        }
    }

    #[test]
    fn test_world_seed_ring() {
        let mut world = World::new(15);
        let player = Vec3::new(100.0, 0.0, -50.0);
        let mut population = PopulationManager::new();

        let ids = population.spawn_initial(&mut world.ctx(Some(player)), 15, SpawnStrategy::WorldSeed);
        assert_eq!(ids.len(), 15);

        let ring = world.config.spawn.initial_ring;
        for monster in world.roster.iter() {
            let d = monster.position.horizontal_distance(player);
            assert!(d >= ring.min - 1e-2 && d <= ring.max + 1e-2, "distance {d}");
            assert_eq!(monster.position.y, world.config.spawn.initial_height);
            assert_eq!(monster.state(), crate::monster::MonsterState::Attacking);
        }
    }

    #[test]
    fn test_spawn_initial_clamped_to_cap() {
        let mut world = World::new(5);
        let mut population = PopulationManager::new();

        let ids = population.spawn_initial(&mut world.ctx(None), 8, SpawnStrategy::WorldSeed);
        assert_eq!(ids.len(), 5);
        assert_eq!(world.roster.live_count(), 5);
    }

    #[test]
    fn test_spawn_over_cap_errors() {
        let mut world = World::new(1);
        let mut population = PopulationManager::new();
        let mut ctx = world.ctx(None);

        assert!(population.spawn(&mut ctx, MonsterKind::Beast, Vec3::ZERO).is_ok());
        assert_eq!(
            population.spawn(&mut ctx, MonsterKind::Beast, Vec3::ZERO),
            Err(MonsterError::PopulationFull { cap: 1 })
        );
    }

    #[test]
    fn test_fallback_without_player() {
        let mut world = World::new(20);
        let mut population = PopulationManager::new();
        population.spawn_initial(&mut world.ctx(None), 20, SpawnStrategy::Respawn);

        let extent = world.config.spawn.fallback_extent;
        for monster in world.roster.iter() {
            assert!(monster.position.x.abs() <= extent);
            assert!(monster.position.z.abs() <= extent);
            assert_eq!(monster.position.y, world.config.depth_floor);
        }
    }

    #[test]
    fn test_night_rising_edge_only() {
        let mut world = World::new(10);
        let player = Some(Vec3::ZERO);
        let mut population = PopulationManager::new();

        assert!(population
            .on_day_night_transition(&mut world.ctx(player), DayPhase::Dusk)
            .is_empty());
        let first = population.on_day_night_transition(&mut world.ctx(player), DayPhase::Night);
        assert_eq!(first.len(), 10);

        let removed = world.roster.remove(first[0]);
        assert!(removed.is_some());
        assert!(population
            .on_day_night_transition(&mut world.ctx(player), DayPhase::Night)
            .is_empty());
        assert_eq!(world.roster.live_count(), 9);

        population.on_day_night_transition(&mut world.ctx(player), DayPhase::Dawn);
        let second = population.on_day_night_transition(&mut world.ctx(player), DayPhase::Night);
        assert_eq!(second.len(), 1);
        assert_eq!(world.roster.live_count(), 10);
        assert_eq!(population.night_respawns(), 2);
    }

    #[test]
    fn test_night_at_cap_is_noop() {
        let mut world = World::new(3);
        let mut population = PopulationManager::new();
        population.spawn_initial(&mut world.ctx(None), 3, SpawnStrategy::WorldSeed);

        let spawned = population.on_day_night_transition(&mut world.ctx(None), DayPhase::Night);
        assert!(spawned.is_empty());
        assert_eq!(world.roster.len(), 3);
        assert!(!world
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::NightRespawn { .. })));
    }

    #[test]
    fn test_respawn_ring() {
        let mut world = World::new(15);
        let player = Vec3::new(-400.0, 0.0, 900.0);
        let mut population = PopulationManager::new();
        population.on_day_night_transition(&mut world.ctx(Some(player)), DayPhase::Night);

        let ring = world.config.spawn.respawn_ring;
        for monster in world.roster.iter() {
            let d = monster.position.horizontal_distance(player);
            assert!(d >= ring.min - 1e-2 && d <= ring.max + 1e-2, "distance {d}");
            assert_eq!(monster.position.y, world.config.depth_floor);
        }
    }
}
