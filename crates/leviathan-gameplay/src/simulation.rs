//! The simulation context that owns every monster, drop, and counter.
//!
//! One [`Simulation::tick`] runs the components in a fixed order:
//! population, state machine, combat, loot, then the render sync. Combat sees
//! post-movement positions from the same tick and loot sees the kills that
//! combat produced in the same tick.

use glam::Vec3;
use leviathan_common::{MonsterId, RenderHandle};
use tracing::debug;

use crate::ai::{self, StepContext, StepOutcome};
use crate::cannon::CannonballPool;
use crate::combat::{CombatResolver, ContactHit, DamageOutcome, PlayerBoat, VolleyReport, WeaponVolley};
use crate::config::MonsterConfig;
use crate::dice::Dice;
use crate::events::{EventBus, GameEvent, KillEvent};
use crate::kind::MonsterKind;
use crate::loot::{LootLifecycle, LootTick};
use crate::monster::{Monster, MonsterResult, MonsterRoster, MonsterView};
use crate::population::{PopulationManager, SpawnContext, SpawnStrategy};
use crate::scene::MonsterScene;
use crate::stats::PlayerStats;
use crate::time::{sanitize_delta, DayPhase, TimeSource};

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Monsters spawned by the population pass
    pub spawned: Vec<MonsterId>,
    /// Monsters removed after their death animation
    pub removed: Vec<MonsterId>,
    /// Volleys resolved this tick
    pub volleys: Vec<VolleyReport>,
    /// Kills from any source this tick
    pub kills: Vec<KillEvent>,
    /// Contact hit on the player, if one landed
    pub contact: Option<ContactHit>,
    /// Loot collected or expired
    pub loot: LootTick,
}

/// Sea monster simulation for one game session.
#[derive(Debug)]
pub struct Simulation {
    config: MonsterConfig,
    dice: Dice,
    roster: MonsterRoster,
    population: PopulationManager,
    combat: CombatResolver,
    cannonballs: CannonballPool,
    loot: LootLifecycle,
    stats: PlayerStats,
    events: EventBus,
    pending_volleys: Vec<WeaponVolley>,
    now: f64,
}

impl Simulation {
    /// Creates an empty simulation with seeded dice.
    #[must_use]
    pub fn new(config: MonsterConfig, seed: u64) -> Self {
        Self::with_dice(config, Dice::seeded(seed))
    }

    /// Creates an empty simulation with the given dice.
    #[must_use]
    pub fn with_dice(mut config: MonsterConfig, dice: Dice) -> Self {
        config.validate();
        Self {
            config,
            dice,
            roster: MonsterRoster::new(),
            population: PopulationManager::new(),
            combat: CombatResolver::new(),
            cannonballs: CannonballPool::new(),
            loot: LootLifecycle::new(),
            stats: PlayerStats::new(),
            events: EventBus::default(),
            pending_volleys: Vec::new(),
            now: 0.0,
        }
    }

    /// Fills the world up to the population cap around the player.
    pub fn seed_world(&mut self, player: Option<Vec3>) -> Vec<MonsterId> {
        let mut events = Vec::new();
        let count = self.config.max_population;
        let spawned = {
            let mut ctx = SpawnContext {
                roster: &mut self.roster,
                config: &self.config,
                dice: &mut self.dice,
                player,
                events: &mut events,
            };
            self.population
                .spawn_initial(&mut ctx, count, SpawnStrategy::WorldSeed)
        };
        self.events.publish_all(events);
        spawned
    }

    /// Spawns one monster at an exact position.
    ///
    /// # Errors
    ///
    /// Returns [`crate::monster::MonsterError::PopulationFull`] at the cap.
    pub fn spawn_monster_at(&mut self, kind: MonsterKind, position: Vec3) -> MonsterResult<MonsterId> {
        let mut events = Vec::new();
        let result = {
            let mut ctx = SpawnContext {
                roster: &mut self.roster,
                config: &self.config,
                dice: &mut self.dice,
                player: None,
                events: &mut events,
            };
            self.population.spawn(&mut ctx, kind, position)
        };
        self.events.publish_all(events);
        result
    }

    /// Advances the whole simulation by one tick.
    ///
    /// `phase` is the day/night signal for this tick, if the host has one.
    pub fn tick(
        &mut self,
        clock: &impl TimeSource,
        phase: Option<DayPhase>,
        mut player: Option<&mut PlayerBoat>,
        scene: &mut dyn MonsterScene,
    ) -> TickReport {
        self.now = clock.now();
        let dt = sanitize_delta(clock.delta_seconds());
        let player_pos = player.as_ref().map(|p| p.position);
        let mut events = Vec::new();
        let mut report = TickReport::default();

        // Population
        if let Some(phase) = phase {
            let mut ctx = SpawnContext {
                roster: &mut self.roster,
                config: &self.config,
                dice: &mut self.dice,
                player: player_pos,
                events: &mut events,
            };
            report.spawned = self.population.on_day_night_transition(&mut ctx, phase);
        }

        // State machine
        let step_ctx = StepContext {
            config: &self.config,
            player: player_pos,
            now: self.now,
            dt,
        };
        let mut expired = Vec::new();
        for monster in self.roster.iter_mut() {
            if ai::step(monster, &step_ctx, &mut self.dice, &mut events) == StepOutcome::Expired {
                expired.push(monster.id());
            }
        }
        for id in expired {
            if self.despawn(id, scene, &mut events) {
                report.removed.push(id);
            }
        }

        // Combat: projectiles and volleys first, then contact.
        let hits = self.cannonballs.tick(
            self.now,
            dt,
            &self.roster,
            &self.config.cannon,
            &mut events,
        );
        for hit in hits {
            let outcome = self.combat.apply_damage(
                &mut self.roster,
                hit.target,
                self.config.cannon.damage,
                Some(hit.origin),
                &self.config,
                &mut events,
            );
            match outcome {
                Ok(DamageOutcome::Killed(kill)) => report.kills.push(kill),
                Ok(DamageOutcome::Wounded { .. }) => {}
                Err(err) => debug!("Cannonball hit ignored: {err}"),
            }
        }
        for volley in std::mem::take(&mut self.pending_volleys) {
            let volley_report = self.combat.fire_weapon_at(
                &mut self.roster,
                &volley,
                &self.config,
                &mut self.dice,
                &mut events,
            );
            report.kills.extend(volley_report.kills().copied());
            report.volleys.push(volley_report);
        }
        if let Some(boat) = player.as_deref_mut() {
            report.contact =
                self.combat
                    .resolve_player_contact(&self.roster, boat, self.now, &self.config, &mut events);
        }

        // Loot
        for kill in &report.kills {
            self.settle_kill(kill, &mut events);
        }
        report.loot = self.loot.tick(
            self.now,
            player_pos,
            &self.config.loot,
            &mut self.stats,
            &mut events,
        );

        // Render
        for monster in self.roster.iter_mut() {
            if monster.handle == RenderHandle::DETACHED {
                monster.handle = scene.spawn(monster.id(), monster.kind(), monster.position);
            }
            scene.sync(monster.handle, &monster.transform());
        }

        self.events.publish_all(events);
        report
    }

    /// Resolves a volley immediately.
    ///
    /// Kills spawn their loot at once; removal still waits for the death
    /// animation.
    pub fn fire_weapon_at(&mut self, volley: &WeaponVolley) -> VolleyReport {
        let mut events = Vec::new();
        let report = self.combat.fire_weapon_at(
            &mut self.roster,
            volley,
            &self.config,
            &mut self.dice,
            &mut events,
        );
        for kill in report.kills() {
            self.settle_kill(kill, &mut events);
        }
        self.events.publish_all(events);
        report
    }

    /// Queues a volley for the next tick's combat pass.
    pub fn queue_volley(&mut self, volley: WeaponVolley) {
        self.pending_volleys.push(volley);
    }

    /// Launches a cannonball from `position`.
    pub fn launch_cannonball(&mut self, position: Vec3, velocity: Vec3) {
        self.cannonballs.launch(position, velocity, self.now);
    }

    /// Applies damage to one monster.
    ///
    /// # Errors
    ///
    /// See [`CombatResolver::apply_damage`].
    pub fn apply_damage(
        &mut self,
        id: MonsterId,
        amount: i32,
        origin: Option<Vec3>,
    ) -> MonsterResult<DamageOutcome> {
        let mut events = Vec::new();
        let outcome =
            self.combat
                .apply_damage(&mut self.roster, id, amount, origin, &self.config, &mut events);
        if let Ok(DamageOutcome::Killed(kill)) = &outcome {
            self.settle_kill(kill, &mut events);
        }
        self.events.publish_all(events);
        outcome
    }

    /// Removes a monster and its visuals. Removing an absent ID returns false.
    pub fn remove_monster(&mut self, id: MonsterId, scene: &mut dyn MonsterScene) -> bool {
        let mut events = Vec::new();
        let removed = self.despawn(id, scene, &mut events);
        self.events.publish_all(events);
        removed
    }

    fn despawn(&mut self, id: MonsterId, scene: &mut dyn MonsterScene, events: &mut Vec<GameEvent>) -> bool {
        let Some(monster) = self.roster.remove(id) else {
            return false;
        };
        if monster.handle() != RenderHandle::DETACHED {
            scene.despawn(monster.handle());
        }
        debug!(%id, "Monster removed");
        events.push(GameEvent::MonsterRemoved { id });
        true
    }

    fn settle_kill(&mut self, kill: &KillEvent, events: &mut Vec<GameEvent>) {
        self.stats.record_kill();
        self.loot.on_kill(kill, self.now, &self.config.loot, events);
    }

    /// Monsters that count toward the population, for radar display.
    #[must_use]
    pub fn live_entities(&self) -> Vec<MonsterView> {
        self.roster
            .iter()
            .filter(|m| !m.is_dying())
            .map(Monster::view)
            .collect()
    }

    /// Monsters visible at the surface, for proximity UI.
    #[must_use]
    pub fn surfaced_entities(&self) -> Vec<MonsterView> {
        self.roster
            .iter()
            .filter(|m| m.state().is_surfaced())
            .map(Monster::view)
            .collect()
    }

    /// Live monster count.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.roster.live_count()
    }

    /// Gets a monster.
    #[must_use]
    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.roster.get(id)
    }

    /// Gets a mutable monster, e.g. to teleport it.
    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.roster.get_mut(id)
    }

    /// Every monster, dying ones included.
    #[must_use]
    pub fn roster(&self) -> &MonsterRoster {
        &self.roster
    }

    /// Player stats accumulator.
    #[must_use]
    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// Loot drops.
    #[must_use]
    pub fn loot(&self) -> &LootLifecycle {
        &self.loot
    }

    /// Event bus.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Combat resolver, for cooldown and hit counters.
    #[must_use]
    pub fn combat(&self) -> &CombatResolver {
        &self.combat
    }

    /// Population manager, for spawn counters.
    #[must_use]
    pub fn population(&self) -> &PopulationManager {
        &self.population
    }

    /// Cannonballs in flight.
    #[must_use]
    pub fn cannonballs(&self) -> &CannonballPool {
        &self.cannonballs
    }

    /// Tunables in effect.
    #[must_use]
    pub fn config(&self) -> &MonsterConfig {
        &self.config
    }

    /// Time of the last tick.
    #[must_use]
    pub const fn now(&self) -> f64 {
        self.now
    }

    /// Clears monsters, drops, stats, and cooldowns for a new session.
    pub fn reset_session(&mut self, scene: &mut dyn MonsterScene) {
        let ids: Vec<_> = self.roster.iter().map(Monster::id).collect();
        let mut events = Vec::new();
        for &id in &ids {
            self.despawn(id, scene, &mut events);
        }
        self.loot.clear();
        self.cannonballs.clear();
        self.pending_volleys.clear();
        self.stats.reset();
        self.combat.reset();
        self.population.reset();
        self.events.drain();
        debug!("Session reset, removed {} monsters", ids.len());
    }
}
