//! Combat resolution between the player's weapons and sea monsters.
//!
//! This module provides:
//! - Volley hit rolls with linear distance falloff
//! - Damage application, flinch and death
//! - Cooldown-gated contact hits on the player's boat

use glam::Vec3;
use leviathan_common::{MonsterId, SeaPlane};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::RETREAT_SPEED;
use crate::config::MonsterConfig;
use crate::dice::Dice;
use crate::events::{GameEvent, KillEvent};
use crate::monster::{Monster, MonsterError, MonsterResult, MonsterRoster, MonsterState};

/// Hit chance at exactly the weapon's range.
pub const MIN_HIT_PROBABILITY: f32 = 0.3;
/// Chance lost between point blank and maximum range.
const HIT_FALLOFF: f32 = 1.0 - MIN_HIT_PROBABILITY;

/// Chance that a shot at `distance` lands, for a weapon of `range`.
///
/// Falls off linearly from 1.0 at point blank to 0.3 at maximum range;
/// distances are clamped into `[0, range]`.
#[must_use]
pub fn hit_probability(distance: f32, range: f32) -> f32 {
    let ratio = if range > 0.0 && distance.is_finite() {
        (distance / range).clamp(0.0, 1.0)
    } else {
        1.0
    };
    1.0 - ratio * HIT_FALLOFF
}

/// The player's boat as seen by combat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerBoat {
    /// World position
    pub position: Vec3,
    /// Velocity; contact hits add an impulse here
    pub velocity: Vec3,
}

impl PlayerBoat {
    /// Creates a stationary boat.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }
}

/// One weapon-fire command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponVolley {
    /// Positions the shots leave from
    pub origins: Vec<Vec3>,
    /// Maximum reach of the volley
    pub range: f32,
    /// Damage per landed hit
    pub damage: i32,
}

impl WeaponVolley {
    /// Creates a volley.
    #[must_use]
    pub fn new(origins: Vec<Vec3>, range: f32, damage: i32) -> Self {
        Self {
            origins,
            range,
            damage,
        }
    }

    /// Closest origin to `target` and its distance.
    #[must_use]
    pub fn nearest_origin(&self, target: Vec3) -> Option<(Vec3, f32)> {
        self.origins
            .iter()
            .map(|&origin| (origin, origin.distance(target)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// What a hit did to a monster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Survived and flinched away
    Wounded {
        /// Health left
        remaining: i32,
    },
    /// Health reached zero
    Killed(KillEvent),
}

impl DamageOutcome {
    /// The kill event, if this hit was lethal.
    #[must_use]
    pub const fn kill(&self) -> Option<&KillEvent> {
        match self {
            Self::Killed(kill) => Some(kill),
            Self::Wounded { .. } => None,
        }
    }
}

/// Result of resolving one volley.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolleyReport {
    /// Attacking monsters within range of some origin
    pub targets: usize,
    /// Landed hits in roster order
    pub hits: Vec<(MonsterId, DamageOutcome)>,
}

impl VolleyReport {
    /// Kill events produced by the volley.
    pub fn kills(&self) -> impl Iterator<Item = &KillEvent> {
        self.hits.iter().filter_map(|(_, outcome)| outcome.kill())
    }
}

/// A contact hit that landed on the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactHit {
    /// Striking monster
    pub id: MonsterId,
    /// Damage reported to the boat
    pub damage: i32,
    /// Impulse added to the boat's velocity
    pub impulse: Vec3,
    /// Game time of the hit
    pub at: f64,
}

/// Resolves weapon fire and monster contact.
///
/// The contact cooldown is a single timer shared by all monsters: at most one
/// contact hit lands per cooldown window however many monsters are adjacent.
#[derive(Debug, Clone)]
pub struct CombatResolver {
    last_player_hit: f64,
    contact_hits: u64,
}

impl Default for CombatResolver {
    fn default() -> Self {
        Self {
            last_player_hit: f64::NEG_INFINITY,
            contact_hits: 0,
        }
    }
}

impl CombatResolver {
    /// Creates a resolver with no hits recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Game time of the last contact hit, if any.
    #[must_use]
    pub fn last_player_hit(&self) -> Option<f64> {
        self.last_player_hit.is_finite().then_some(self.last_player_hit)
    }

    /// Contact hits landed this session.
    #[must_use]
    pub const fn contact_hits(&self) -> u64 {
        self.contact_hits
    }

    /// Rolls one hit per attacking monster in range of any origin.
    pub fn fire_weapon_at(
        &mut self,
        roster: &mut MonsterRoster,
        volley: &WeaponVolley,
        config: &MonsterConfig,
        dice: &mut Dice,
        events: &mut Vec<GameEvent>,
    ) -> VolleyReport {
        let mut report = VolleyReport::default();

        for monster in roster.iter_mut() {
            if monster.state != MonsterState::Attacking {
                continue;
            }
            let Some((origin, distance)) = volley.nearest_origin(monster.position) else {
                break;
            };
            if distance > volley.range {
                continue;
            }
            report.targets += 1;

            if dice.chance(hit_probability(distance, volley.range)) {
                let outcome = damage(monster, volley.damage, Some(origin), config, events);
                report.hits.push((monster.id, outcome));
            }
        }

        debug!(
            targets = report.targets,
            hits = report.hits.len(),
            "Volley resolved"
        );
        report
    }

    /// Applies damage to one monster.
    ///
    /// `origin` is where the shot came from; a surviving monster flees away
    /// from it.
    ///
    /// # Errors
    ///
    /// Returns [`MonsterError::NotFound`] for an unknown ID and
    /// [`MonsterError::AlreadyDying`] if the monster is already dying, in which
    /// case nothing changes.
    pub fn apply_damage(
        &mut self,
        roster: &mut MonsterRoster,
        id: MonsterId,
        amount: i32,
        origin: Option<Vec3>,
        config: &MonsterConfig,
        events: &mut Vec<GameEvent>,
    ) -> MonsterResult<DamageOutcome> {
        let monster = roster.get_mut(id).ok_or(MonsterError::NotFound(id))?;
        if monster.is_dying() {
            return Err(MonsterError::AlreadyDying(id));
        }
        Ok(damage(monster, amount, origin, config, events))
    }

    /// Lands a contact hit from the nearest attacking monster, if the global
    /// cooldown allows.
    pub fn resolve_player_contact(
        &mut self,
        roster: &MonsterRoster,
        player: &mut PlayerBoat,
        now: f64,
        config: &MonsterConfig,
        events: &mut Vec<GameEvent>,
    ) -> Option<ContactHit> {
        let contact = &config.contact;
        if now - self.last_player_hit <= f64::from(contact.cooldown) {
            return None;
        }

        let (striker, _) = roster
            .iter()
            .filter(|m| m.state == MonsterState::Attacking)
            .map(|m| (m, m.position.distance(player.position)))
            .filter(|(_, d)| *d < contact.radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        let impulse = striker.position.flat().direction_to(player.position.flat()) * contact.knockback;
        player.velocity += impulse;
        self.last_player_hit = now;
        self.contact_hits += 1;

        let hit = ContactHit {
            id: striker.id,
            damage: contact.damage,
            impulse,
            at: now,
        };
        debug!(id = %hit.id, at = now, "Monster hit the boat");
        events.push(GameEvent::PlayerHit {
            id: hit.id,
            damage: hit.damage,
            impulse,
        });
        Some(hit)
    }

    /// Forgets the contact cooldown and hit count.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Subtracts health and resolves the consequence on a live monster.
fn damage(
    monster: &mut Monster,
    amount: i32,
    origin: Option<Vec3>,
    config: &MonsterConfig,
    events: &mut Vec<GameEvent>,
) -> DamageOutcome {
    let amount = amount.max(0);
    monster.health -= amount;

    if monster.health <= 0 {
        monster.enter(MonsterState::Dying, config.dying_time);
        monster.velocity = Vec3::new(0.0, -config.dying_sink_speed, 0.0);
        monster.glow = false;

        let kill = KillEvent {
            id: monster.id,
            kind: monster.kind,
            position: monster.position,
        };
        info!(id = %kill.id, kind = kill.kind.display_name(), "Monster killed");
        events.push(GameEvent::MonsterKilled(kill));
        return DamageOutcome::Killed(kill);
    }

    if let Some(origin) = origin {
        let away = origin.flat().direction_to(monster.position.flat());
        let speed = config.base_speed * RETREAT_SPEED;
        monster.velocity.x = away.x * speed;
        monster.velocity.z = away.z * speed;
        monster.recoil = config.recoil_time;
    }
    events.push(GameEvent::MonsterDamaged {
        id: monster.id,
        damage: amount,
        remaining: monster.health,
    });
    DamageOutcome::Wounded {
        remaining: monster.health,
    }
}
