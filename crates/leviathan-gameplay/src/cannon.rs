//! Ship cannons: the battery that fires volleys and the cannonballs in flight.

use glam::Vec3;
use leviathan_common::MonsterId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::WeaponVolley;
use crate::config::CannonConfig;
use crate::events::GameEvent;
use crate::monster::{MonsterRoster, MonsterState};

// ============================================================================
// Battery
// ============================================================================

/// Cooldown-gated cannon battery mounted on the player's boat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannonBattery {
    /// Volley range
    pub range: f32,
    /// Damage per hit
    pub damage: i32,
    /// Seconds between volleys
    pub cooldown: f32,
    last_fired: Option<f64>,
    volleys_fired: u64,
}

impl Default for CannonBattery {
    fn default() -> Self {
        Self::from_config(&CannonConfig::default())
    }
}

impl CannonBattery {
    /// Creates a battery from configuration.
    #[must_use]
    pub fn from_config(config: &CannonConfig) -> Self {
        Self {
            range: config.range,
            damage: config.damage,
            cooldown: config.cooldown,
            last_fired: None,
            volleys_fired: 0,
        }
    }

    /// Seconds until the battery can fire again.
    #[must_use]
    pub fn remaining_cooldown(&self, now: f64) -> f32 {
        self.last_fired.map_or(0.0, |at| {
            (f64::from(self.cooldown) - (now - at)).max(0.0) as f32
        })
    }

    /// Whether the battery can fire.
    #[must_use]
    pub fn ready(&self, now: f64) -> bool {
        self.remaining_cooldown(now) <= 0.0
    }

    /// Reload progress in `[0, 1]`, for the cooldown bar.
    #[must_use]
    pub fn reload_progress(&self, now: f64) -> f32 {
        if self.cooldown <= 0.0 {
            return 1.0;
        }
        1.0 - (self.remaining_cooldown(now) / self.cooldown).clamp(0.0, 1.0)
    }

    /// Attacking monsters within range of `position`.
    #[must_use]
    pub fn targets_in_range(&self, roster: &MonsterRoster, position: Vec3) -> usize {
        roster
            .iter()
            .filter(|m| m.state() == MonsterState::Attacking)
            .filter(|m| m.position.distance(position) <= self.range)
            .count()
    }

    /// Fires if off cooldown, returning the volley to resolve.
    ///
    /// Firing starts the cooldown even when nothing is in range.
    pub fn try_fire(&mut self, now: f64, origins: Vec<Vec3>) -> Option<WeaponVolley> {
        if !self.ready(now) {
            return None;
        }
        self.last_fired = Some(now);
        self.volleys_fired += 1;
        Some(WeaponVolley::new(origins, self.range, self.damage))
    }

    /// Volleys fired this session.
    #[must_use]
    pub const fn volleys_fired(&self) -> u64 {
        self.volleys_fired
    }
}

// ============================================================================
// Cannonballs
// ============================================================================

/// A cannonball in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cannonball {
    /// Current position
    pub position: Vec3,
    /// Current velocity
    pub velocity: Vec3,
    /// Where it was fired from
    pub origin: Vec3,
    /// Game time of launch
    pub launched_at: f64,
}

/// A cannonball that struck a monster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannonballHit {
    /// Struck monster
    pub target: MonsterId,
    /// Launch point, used as the damage origin
    pub origin: Vec3,
}

/// Cannonballs currently in flight.
#[derive(Debug, Clone, Default)]
pub struct CannonballPool {
    balls: Vec<Cannonball>,
}

impl CannonballPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Launches a cannonball.
    pub fn launch(&mut self, position: Vec3, velocity: Vec3, now: f64) {
        self.balls.push(Cannonball {
            position,
            velocity,
            origin: position,
            launched_at: now,
        });
    }

    /// Cannonballs in flight.
    #[must_use]
    pub fn balls(&self) -> &[Cannonball] {
        &self.balls
    }

    /// Number of cannonballs in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.balls.len()
    }

    /// Whether no cannonball is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Moves every ball and reports the monsters struck.
    ///
    /// A ball is spent when it outlives its lifetime, touches the water, or
    /// strikes a surfacing or attacking monster; each ball strikes at most one.
    pub fn tick(
        &mut self,
        now: f64,
        dt: f32,
        roster: &MonsterRoster,
        config: &CannonConfig,
        events: &mut Vec<GameEvent>,
    ) -> Vec<CannonballHit> {
        let mut hits = Vec::new();

        self.balls.retain_mut(|ball| {
            ball.position += ball.velocity * dt;
            ball.velocity.y -= config.ball_gravity * dt;

            if now - ball.launched_at > f64::from(config.ball_lifetime) {
                return false;
            }
            if ball.position.y <= 0.0 {
                events.push(GameEvent::CannonballSplash {
                    position: Vec3::new(ball.position.x, 0.0, ball.position.z),
                });
                return false;
            }

            let struck = roster.iter().find(|m| {
                m.state().is_surfaced() && m.position.distance(ball.position) < config.ball_hit_radius
            });
            match struck {
                Some(monster) => {
                    debug!(id = %monster.id(), "Cannonball hit");
                    hits.push(CannonballHit {
                        target: monster.id(),
                        origin: ball.origin,
                    });
                    false
                }
                None => true,
            }
        });

        hits
    }

    /// Removes every ball.
    pub fn clear(&mut self) {
        self.balls.clear();
    }
}
