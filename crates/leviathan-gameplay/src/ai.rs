//! Per-monster behavior state machine.
//!
//! Each tick a monster's timer is decremented, its current state's behavior
//! runs (possibly switching state), the kind overlay is applied, and the
//! position is integrated. All waiting is expressed through `state_timer`;
//! nothing here blocks or schedules callbacks.

use glam::Vec3;
use leviathan_common::SeaPlane;
use tracing::trace;

use crate::config::MonsterConfig;
use crate::dice::Dice;
use crate::events::GameEvent;
use crate::monster::{AttackPhase, Monster, MonsterState};
use crate::overlay;

/// Chance per tick that a lurking monster picks a new drift.
pub const DRIFT_ODDS: f32 = 0.01;
/// Chance per tick that a lurking monster starts hunting a detected player.
pub const HUNT_ODDS: f32 = 0.2;
/// Chance per tick that an idle lurking monster surfaces on its own.
pub const IDLE_SURFACE_ODDS: f32 = 0.005;
/// Chance that a hunt ending near the player turns into an attack.
pub const PRESS_ATTACK_ODDS: f32 = 0.7;

/// Horizontal velocity kept per tick while diving.
const DIVE_DRAG: f32 = 0.95;
/// Speed multiplier while hunting.
const HUNT_SPEED: f32 = 1.5;
/// Speed multiplier while charging through the player.
const CHARGE_SPEED: f32 = 3.0;
/// Speed multiplier while repositioning or fleeing a hit.
pub(crate) const RETREAT_SPEED: f32 = 1.2;
/// Withdrawal distance, in attack ranges.
const WITHDRAW_RANGES: f32 = 1.5;
/// Surface bobbing frequency and amplitude.
const BOB_RATE: f64 = 0.5;
const BOB_HEIGHT: f32 = 0.5;
/// Death tumble, radians per second around x and z.
const DEATH_SPIN: Vec3 = Vec3::new(1.2, 0.0, 0.6);
/// Opacity lost per second while dying.
const FADE_RATE: f32 = 0.6;

/// Everything a monster may read about the world during one step.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Tunables
    pub config: &'a MonsterConfig,
    /// Player boat position, if a player exists
    pub player: Option<Vec3>,
    /// Elapsed game seconds
    pub now: f64,
    /// Seconds since the previous tick
    pub dt: f32,
}

/// Result of stepping one monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Still in the world
    Active,
    /// Death animation finished; remove it
    Expired,
}

/// Advances one monster by one tick.
pub fn step(
    monster: &mut Monster,
    ctx: &StepContext<'_>,
    dice: &mut Dice,
    events: &mut Vec<GameEvent>,
) -> StepOutcome {
    monster.state_timer -= ctx.dt;

    if monster.state == MonsterState::Dying {
        return update_dying(monster, ctx);
    }

    let before = monster.state;
    match monster.state {
        MonsterState::Lurking => update_lurking(monster, ctx, dice),
        MonsterState::Hunting => update_hunting(monster, ctx, dice),
        MonsterState::Surfacing => update_surfacing(monster, ctx, dice, events),
        MonsterState::Attacking => update_attacking(monster, ctx, dice),
        MonsterState::Diving => update_diving(monster, ctx, dice),
        MonsterState::Dying => {}
    }
    if monster.state != before {
        trace!(id = %monster.id, from = ?before, to = ?monster.state, "Monster state change");
    }

    overlay::apply(monster, ctx, dice, events);

    monster.position += monster.velocity * ctx.dt;
    keep_in_world(monster, ctx.config, ctx.dt);
    monster.anim_time += ctx.dt * monster.kind.animation_rate(monster.state);

    StepOutcome::Active
}

/// Sets a slow random drift at the current depth.
fn drift(monster: &mut Monster, config: &MonsterConfig, dice: &mut Dice) {
    monster.velocity = Vec3::new(
        dice.centered() * config.base_speed,
        0.0,
        dice.centered() * config.base_speed,
    );
}

fn enter_lurking(monster: &mut Monster, config: &MonsterConfig, timer: f32, dice: &mut Dice) {
    monster.enter(MonsterState::Lurking, timer);
    monster.glow = false;
    drift(monster, config, dice);
}

fn update_lurking(monster: &mut Monster, ctx: &StepContext<'_>, dice: &mut Dice) {
    let config = ctx.config;
    if dice.chance(DRIFT_ODDS) {
        drift(monster, config, dice);
    }

    if let Some(player) = ctx.player {
        if monster.position.distance(player) < config.detection_range && dice.chance(HUNT_ODDS) {
            monster.enter(MonsterState::Hunting, config.hunt_time);
            monster.glow = true;
            return;
        }
    }

    if monster.state_timer <= 0.0 && dice.chance(IDLE_SURFACE_ODDS) {
        monster.enter(MonsterState::Surfacing, config.surfacing_time);
    }
}

fn update_hunting(monster: &mut Monster, ctx: &StepContext<'_>, dice: &mut Dice) {
    let config = ctx.config;
    let Some(player) = ctx.player else {
        if monster.state_timer <= 0.0 {
            enter_lurking(monster, config, config.dive_time / 2.0, dice);
        }
        return;
    };

    // Track the player's position projected to the monster's depth.
    let heading = monster.position.flat().direction_to(player.flat());
    monster.velocity = heading * config.base_speed * HUNT_SPEED;

    let distance = monster.position.distance(player);
    if distance < config.attack_range {
        monster.enter(MonsterState::Surfacing, config.fast_surfacing_time);
        return;
    }

    if monster.state_timer <= 0.0 {
        if distance < config.attack_range * 2.0 && dice.chance(PRESS_ATTACK_ODDS) {
            monster.enter(MonsterState::Surfacing, config.fast_surfacing_time);
        } else {
            enter_lurking(monster, config, config.dive_time / 2.0, dice);
        }
    }
}

fn update_surfacing(
    monster: &mut Monster,
    ctx: &StepContext<'_>,
    dice: &mut Dice,
    events: &mut Vec<GameEvent>,
) {
    let config = ctx.config;
    monster.velocity.y = config.base_speed;

    if let Some(player) = ctx.player {
        if monster.position.distance(player) < config.attack_range * 2.0 {
            let heading = monster.position.flat().direction_to(player.flat());
            monster.velocity.x = heading.x * config.base_speed;
            monster.velocity.z = heading.z * config.base_speed;
        }
    }

    if monster.position.y >= 0.0 {
        monster.position.y = 0.0;
        monster.velocity.y = 0.0;
        let timer = config.surface_time + dice.roll() * config.surface_jitter;
        monster.enter(MonsterState::Attacking, timer);
        events.push(GameEvent::SurfaceSplash {
            id: monster.id,
            position: monster.position,
        });
    }
}

fn update_attacking(monster: &mut Monster, ctx: &StepContext<'_>, dice: &mut Dice) {
    let config = ctx.config;

    monster.position.y = ((ctx.now * BOB_RATE).sin() as f32) * BOB_HEIGHT;
    monster.velocity.y = 0.0;

    let Some(player) = ctx.player else {
        monster.enter(MonsterState::Diving, config.diving_time);
        return;
    };

    if monster.state_timer <= 0.0 || monster.position.distance(player) > config.attack_range * 3.0
    {
        monster.enter(MonsterState::Diving, config.diving_time);
        return;
    }

    // A fresh wound overrides steering until the flinch wears off.
    if monster.recoil > 0.0 {
        monster.recoil -= ctx.dt;
        return;
    }

    let phase = monster.attack.unwrap_or(AttackPhase::Charging);
    monster.attack = Some(match phase {
        AttackPhase::Charging => charge(monster, config, player, ctx.dt, dice),
        AttackPhase::Repositioning { timer, target } => {
            let timer = timer - ctx.dt;
            if timer > 0.0 {
                let heading = monster.position.flat().direction_to(target.flat());
                monster.velocity.x = heading.x * config.base_speed * RETREAT_SPEED;
                monster.velocity.z = heading.z * config.base_speed * RETREAT_SPEED;
                AttackPhase::Repositioning { timer, target }
            } else {
                AttackPhase::Charging
            }
        }
    });
}

/// One charging step; returns the next attack phase.
///
/// The charge ends when the monster is within striking distance or when this
/// tick's stride would carry it through the player.
fn charge(
    monster: &mut Monster,
    config: &MonsterConfig,
    player: Vec3,
    dt: f32,
    dice: &mut Dice,
) -> AttackPhase {
    let to_player = (player - monster.position).flat();
    let distance = to_player.length();
    let stride = config.base_speed * CHARGE_SPEED * dt;

    if distance < config.close_hit_distance || distance <= stride {
        let mut away = (monster.position - player).flat().normalize_or_zero();
        if away == Vec3::ZERO {
            away = monster.velocity.flat().normalize_or_zero();
        }
        if away == Vec3::ZERO {
            away = Vec3::X;
        }
        return AttackPhase::Repositioning {
            timer: dice.range(
                config.reposition_time,
                config.reposition_time + config.reposition_jitter,
            ),
            target: player.flat() + away * config.attack_range * WITHDRAW_RANGES,
        };
    }

    let heading = to_player / distance;
    monster.velocity.x = heading.x * config.base_speed * CHARGE_SPEED;
    monster.velocity.z = heading.z * config.base_speed * CHARGE_SPEED;
    AttackPhase::Charging
}

fn update_diving(monster: &mut Monster, ctx: &StepContext<'_>, dice: &mut Dice) {
    let config = ctx.config;
    monster.velocity.y = -config.base_speed;
    monster.velocity.x *= DIVE_DRAG;
    monster.velocity.z *= DIVE_DRAG;

    if monster.position.y <= config.depth_floor {
        monster.position.y = config.depth_floor;
        enter_lurking(monster, config, config.dive_time, dice);
    }
}

fn update_dying(monster: &mut Monster, ctx: &StepContext<'_>) -> StepOutcome {
    let dt = ctx.dt;
    monster.position += monster.velocity * dt;
    monster.velocity.y -= ctx.config.dying_sink_acceleration * dt;
    monster.rotation += DEATH_SPIN * dt;
    monster.opacity = (monster.opacity - FADE_RATE * dt).max(0.0);

    if monster.state_timer <= 0.0 {
        StepOutcome::Expired
    } else {
        StepOutcome::Active
    }
}

/// Pulls monsters that strayed past the world radius back toward the origin.
fn keep_in_world(monster: &mut Monster, config: &MonsterConfig, dt: f32) {
    if monster.position.horizontal_length() > config.world_radius {
        let inward = (-monster.position).flat().normalize_or_zero();
        monster.velocity += inward * config.world_pull * dt;
    }
}
