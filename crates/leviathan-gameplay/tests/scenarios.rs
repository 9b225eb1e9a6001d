use glam::Vec3;
use leviathan_gameplay::prelude::*;

const FRAME: f32 = 1.0 / 60.0;

fn drain_kills(sim: &Simulation) -> Vec<KillEvent> {
    sim.events()
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            GameEvent::MonsterKilled(kill) => Some(kill),
            _ => None,
        })
        .collect()
}

#[test]
fn beast_killed_by_volley_drops_scale_that_can_be_collected() {
    let mut sim = Simulation::with_dice(MonsterConfig::default(), Dice::fixed(0.0));
    let id = sim
        .spawn_monster_at(MonsterKind::Beast, Vec3::new(10.0, 0.0, 0.0))
        .expect("room");
    assert_eq!(sim.monster(id).map(Monster::health), Some(3));

    let report = sim.fire_weapon_at(&WeaponVolley::new(vec![Vec3::ZERO], 100.0, 3));
    assert_eq!(report.targets, 1);
    assert_eq!(sim.monster(id).map(Monster::state), Some(MonsterState::Dying));

    let kills = drain_kills(&sim);
    assert_eq!(kills.len(), 1);
    assert_eq!(kills[0].kind, MonsterKind::Beast);
    assert_eq!(kills[0].id, id);

    let drop = sim.loot().drops()[0];
    assert_eq!(drop.reward.name, "Monster Scale");
    assert_eq!(drop.position.x, kills[0].position.x);
    assert_eq!(drop.position.z, kills[0].position.z);

    // Far away while the carcass sinks.
    let mut clock = SimClock::new();
    let mut boat = PlayerBoat::at(Vec3::new(200.0, 0.0, 0.0));
    let mut removed = false;
    for _ in 0..210 {
        clock.advance(FRAME);
        let tick = sim.tick(&clock, None, Some(&mut boat), &mut NullScene);
        removed |= tick.removed.contains(&id);
    }
    assert!(removed);
    assert!(sim.monster(id).is_none());
    assert_eq!(sim.loot().len(), 1);
    assert_eq!(sim.stats().count("Monster Scale"), 0);

    boat.position = Vec3::new(drop.position.x + 2.0, 0.0, drop.position.z);
    clock.advance(FRAME);
    let tick = sim.tick(&clock, None, Some(&mut boat), &mut NullScene);
    assert_eq!(tick.loot.collected(), 1);
    assert_eq!(sim.stats().count("Monster Scale"), 1);
    assert!(sim.loot().is_empty());
}

#[test]
fn wounded_monster_flees_without_dying() {
    let mut sim = Simulation::new(MonsterConfig::default(), 11);
    let id = sim
        .spawn_monster_at(MonsterKind::Kraken, Vec3::new(0.0, 0.0, 20.0))
        .expect("room");
    sim.apply_damage(id, 1, None).expect("monster exists");
    assert_eq!(sim.monster(id).map(Monster::health), Some(5));
    sim.events().drain();

    let outcome = sim.apply_damage(id, 3, Some(Vec3::ZERO)).expect("monster exists");
    assert_eq!(outcome, DamageOutcome::Wounded { remaining: 2 });

    let monster = sim.monster(id).expect("monster exists");
    assert_eq!(monster.state(), MonsterState::Attacking);
    assert!(monster.velocity.z > 0.0);
    assert!(drain_kills(&sim).is_empty());
    assert!(sim.loot().is_empty());
}

#[test]
fn untouched_loot_expires_without_reward() {
    let mut sim = Simulation::new(MonsterConfig::default(), 5);
    let id = sim
        .spawn_monster_at(MonsterKind::Jellyfish, Vec3::new(50.0, 0.0, 0.0))
        .expect("room");
    sim.apply_damage(id, 99, None).expect("monster exists");
    assert_eq!(sim.loot().len(), 1);

    sim.tick(&SimClock::at(30.0), None, None, &mut NullScene);
    assert_eq!(sim.loot().len(), 1);

    let tick = sim.tick(&SimClock::at(31.0), None, None, &mut NullScene);
    assert_eq!(tick.loot.expired(), 1);
    assert!(sim.loot().is_empty());
    assert_eq!(sim.stats().count("Crimson Crystal"), 0);
    assert_eq!(sim.stats().kills(), 1);
}

#[test]
fn night_tops_population_back_up_once() {
    let mut sim = Simulation::new(MonsterConfig::default(), 21);
    let mut boat = PlayerBoat::at(Vec3::ZERO);
    let ids = sim.seed_world(Some(boat.position));
    for &id in &ids[..3] {
        sim.apply_damage(id, 100, None).expect("monster exists");
    }
    assert_eq!(sim.live_count(), 12);

    let mut clock = SimClock::new();
    clock.advance(FRAME);
    let dusk = sim.tick(&clock, Some(DayPhase::Dusk), Some(&mut boat), &mut NullScene);
    assert!(dusk.spawned.is_empty());

    clock.advance(FRAME);
    let night = sim.tick(&clock, Some(DayPhase::Night), Some(&mut boat), &mut NullScene);
    assert_eq!(night.spawned.len(), 3);
    assert_eq!(sim.live_count(), 15);

    clock.advance(FRAME);
    let again = sim.tick(&clock, Some(DayPhase::Night), Some(&mut boat), &mut NullScene);
    assert!(again.spawned.is_empty());
    assert_eq!(sim.live_count(), 15);
}

#[test]
fn contact_hits_respect_the_shared_cooldown() {
    let mut sim = Simulation::with_dice(MonsterConfig::default(), Dice::fixed(0.5));
    sim.spawn_monster_at(MonsterKind::Beast, Vec3::new(8.0, 0.0, 0.0))
        .expect("room");
    sim.spawn_monster_at(MonsterKind::Beast, Vec3::new(-8.0, 0.0, 0.0))
        .expect("room");
    let mut boat = PlayerBoat::at(Vec3::ZERO);

    let mut clock = SimClock::at(10.0);
    clock.advance(FRAME);
    let first = sim.tick(&clock, None, Some(&mut boat), &mut NullScene);
    let hit = first.contact.expect("monster in contact range");
    assert_eq!(hit.damage, 1);
    assert!(boat.velocity.length() > 0.0);

    clock.advance(0.25);
    clock.advance(0.25);
    let second = sim.tick(&clock, None, Some(&mut boat), &mut NullScene);
    assert!(second.contact.is_none());
}

#[test]
fn dying_monster_ignores_damage_and_removal_is_idempotent() {
    let mut sim = Simulation::new(MonsterConfig::default(), 4);
    let mut scene = RecordingScene::new();
    let id = sim
        .spawn_monster_at(MonsterKind::Beast, Vec3::new(0.0, 0.0, 30.0))
        .expect("room");
    sim.tick(&SimClock::at(0.0), None, None, &mut scene);
    assert_eq!(scene.live_count(), 1);

    sim.apply_damage(id, 3, None).expect("monster exists");
    assert_eq!(
        sim.apply_damage(id, 3, None),
        Err(MonsterError::AlreadyDying(id))
    );
    assert_eq!(sim.loot().len(), 1);

    assert!(sim.remove_monster(id, &mut scene));
    assert!(!sim.remove_monster(id, &mut scene));
    assert_eq!(scene.live_count(), 0);
    assert_eq!(
        sim.apply_damage(id, 1, None),
        Err(MonsterError::NotFound(id))
    );
}

#[test]
fn radar_only_lists_surfaced_monsters() {
    let mut sim = Simulation::new(MonsterConfig::default(), 8);
    let surfaced = sim
        .spawn_monster_at(MonsterKind::Serpent, Vec3::new(30.0, 0.0, 0.0))
        .expect("room");
    let diving = sim
        .spawn_monster_at(MonsterKind::Kraken, Vec3::new(900.0, 0.0, 0.0))
        .expect("room");

    let mut boat = PlayerBoat::at(Vec3::ZERO);
    let mut clock = SimClock::new();
    clock.advance(FRAME);
    sim.tick(&clock, None, Some(&mut boat), &mut NullScene);

    let radar: Vec<_> = sim.surfaced_entities().iter().map(|v| v.id).collect();
    assert_eq!(radar, vec![surfaced]);
    assert_eq!(sim.live_entities().len(), 2);
    assert_eq!(sim.monster(diving).map(Monster::state), Some(MonsterState::Diving));
}
