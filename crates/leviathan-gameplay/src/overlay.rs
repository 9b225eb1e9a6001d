//! Kind-specific behavior layered over the shared state machine.
//!
//! Overlays may rewrite velocity or charge but never change `state`.

use leviathan_common::SeaPlane;

use crate::ai::StepContext;
use crate::dice::Dice;
use crate::events::GameEvent;
use crate::kind::MonsterKind;
use crate::monster::{Monster, MonsterState};

/// Kraken lunge: reach in attack ranges, chance per tick, speed multiplier.
const KRAKEN_LUNGE: Lunge = Lunge {
    reach: 0.7,
    odds: 0.01,
    speed: 4.0,
};
/// Serpent strike.
const SERPENT_STRIKE: Lunge = Lunge {
    reach: 1.5,
    odds: 0.005,
    speed: 5.0,
};
/// Jellyfish charge gained per second near the player.
pub const JELLYFISH_CHARGE_RATE: f32 = 0.2;
/// Jellyfish charge lost per second away from the player.
pub const JELLYFISH_DECAY_RATE: f32 = 0.1;

#[derive(Debug, Clone, Copy)]
struct Lunge {
    reach: f32,
    odds: f32,
    speed: f32,
}

/// Applies the monster's kind overlay for this tick.
pub fn apply(monster: &mut Monster, ctx: &StepContext<'_>, dice: &mut Dice, events: &mut Vec<GameEvent>) {
    if monster.state != MonsterState::Attacking {
        return;
    }
    let Some(player) = ctx.player else {
        return;
    };
    let distance = monster.position.distance(player);
    let range = ctx.config.attack_range;

    match monster.kind {
        MonsterKind::Beast => {}
        MonsterKind::Kraken => lunge(monster, KRAKEN_LUNGE, distance, ctx, dice, events),
        MonsterKind::Serpent => lunge(monster, SERPENT_STRIKE, distance, ctx, dice, events),
        MonsterKind::Jellyfish => {
            if distance < range {
                monster.charge += JELLYFISH_CHARGE_RATE * ctx.dt;
                if monster.charge >= 1.0 {
                    monster.charge = 0.0;
                    events.push(GameEvent::Discharge {
                        id: monster.id,
                        position: monster.position,
                    });
                }
            } else {
                monster.charge = (monster.charge - JELLYFISH_DECAY_RATE * ctx.dt).max(0.0);
            }
        }
    }
}

fn lunge(
    monster: &mut Monster,
    lunge: Lunge,
    distance: f32,
    ctx: &StepContext<'_>,
    dice: &mut Dice,
    events: &mut Vec<GameEvent>,
) {
    let Some(player) = ctx.player else {
        return;
    };
    if distance >= ctx.config.attack_range * lunge.reach || !dice.chance(lunge.odds) {
        return;
    }

    let heading = monster.position.flat().direction_to(player.flat());
    monster.velocity = heading * ctx.config.base_speed * lunge.speed;
    events.push(GameEvent::Lunge {
        id: monster.id,
        kind: monster.kind,
        position: monster.position,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonsterConfig;
    use glam::Vec3;
    use leviathan_common::MonsterId;

    fn attacking(kind: MonsterKind, position: Vec3) -> Monster {
        Monster::new(MonsterId::from_raw(7), kind, position, Vec3::ZERO, 10.0)
    }

    fn ctx(config: &MonsterConfig) -> StepContext<'_> {
        StepContext {
            config,
            player: Some(Vec3::ZERO),
            now: 0.0,
            dt: 0.625,
        }
    }

    #[test]
    fn test_kraken_lunge() {
        let config = MonsterConfig::default();
        let mut dice = Dice::fixed(0.0);
        let mut events = Vec::new();
        let mut m = attacking(MonsterKind::Kraken, Vec3::new(20.0, 0.0, 0.0));

        apply(&mut m, &ctx(&config), &mut dice, &mut events);
        assert!((m.velocity.x + config.base_speed * 4.0).abs() < 1e-3);
        assert_eq!(m.state(), MonsterState::Attacking);
        assert!(matches!(events[0], GameEvent::Lunge { kind: MonsterKind::Kraken, .. }));
    }

    #[test]
    fn test_kraken_out_of_reach() {
        let config = MonsterConfig::default();
        let mut dice = Dice::fixed(0.0);
        let mut events = Vec::new();
        let mut m = attacking(MonsterKind::Kraken, Vec3::new(40.0, 0.0, 0.0));

        apply(&mut m, &ctx(&config), &mut dice, &mut events);
        assert_eq!(m.velocity, Vec3::ZERO);
        assert!(events.is_empty());
    }

    #[test]
    fn test_serpent_strike_reach() {
        let config = MonsterConfig::default();
        let mut dice = Dice::fixed(0.0);
        let mut events = Vec::new();
        let mut m = attacking(MonsterKind::Serpent, Vec3::new(0.0, 0.0, 70.0));

        apply(&mut m, &ctx(&config), &mut dice, &mut events);
        assert!((m.velocity.z + config.base_speed * 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_jellyfish_discharge_cycle() {
        let config = MonsterConfig::default();
        let mut dice = Dice::fixed(0.5);
        let mut events = Vec::new();
        let mut m = attacking(MonsterKind::Jellyfish, Vec3::new(10.0, 0.0, 0.0));

        for _ in 0..7 {
            apply(&mut m, &ctx(&config), &mut dice, &mut events);
        }
        assert!(events.is_empty());
        assert!((m.charge() - 0.875).abs() < 1e-4);

        apply(&mut m, &ctx(&config), &mut dice, &mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(m.charge(), 0.0);
        assert_eq!(m.state(), MonsterState::Attacking);
    }

    #[test]
    fn test_jellyfish_decay_outside_range() {
        let config = MonsterConfig::default();
        let mut dice = Dice::fixed(0.5);
        let mut events = Vec::new();
        let mut m = attacking(MonsterKind::Jellyfish, Vec3::new(100.0, 0.0, 0.0));
        m.charge = 0.5;

        apply(&mut m, &ctx(&config), &mut dice, &mut events);
        assert!((m.charge() - 0.4375).abs() < 1e-4);

        m.charge = 0.01;
        apply(&mut m, &ctx(&config), &mut dice, &mut events);
        assert_eq!(m.charge(), 0.0);
    }

    #[test]
    fn test_overlay_idle_outside_attacking() {
        let config = MonsterConfig::default();
        let mut dice = Dice::fixed(0.0);
        let mut events = Vec::new();
        let mut m = attacking(MonsterKind::Jellyfish, Vec3::new(10.0, 0.0, 0.0));
        m.enter(MonsterState::Hunting, 10.0);

        apply(&mut m, &ctx(&config), &mut dice, &mut events);
        assert_eq!(m.charge(), 0.0);
    }
}
