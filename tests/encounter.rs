mod common;

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use siege_arena::GameConfig;
use siege_arena::sim::{
    CharacterKind, Clock, CooldownState, Difficulty, EffectKind, OpenGround, ProgressionEvent,
    TickInput, World, fixed_tick, frame, tick,
};

use common::{quiet_config, world_with};

/// Twenty seconds of 60 Hz frames
const SESSION_FRAMES: usize = 20 * 60;

fn idle() -> TickInput {
    TickInput::default()
}

fn press_primary() -> TickInput {
    TickInput {
        primary: true,
        ..Default::default()
    }
}

#[test]
fn same_seed_same_session() {
    let run = || {
        let mut world = World::new(GameConfig::default(), 99);
        let mut clock = Clock::new();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..SESSION_FRAMES {
            frame(&mut world, &mut clock, &input, 1.0 / 60.0);
        }
        let enemies: Vec<Vec2> = world.enemies.iter().map(|e| e.pos).collect();
        let player = world.player.as_ref().map(|p| p.pos);
        (world.progression.score(), world.time_ticks, enemies, player)
    };
    assert_eq!(run(), run());
}

#[test]
fn walls_stop_projectiles() {
    let ground = OpenGround::new(100.0).with_obstacle(Vec2::new(5.0, 0.0), 1.0);
    let (mut world, effects) = world_with(quiet_config(CharacterKind::Ranged), ground);
    let enemy = world.spawn_enemy_at(Vec2::new(8.0, 0.0), Difficulty::default());

    tick(&mut world, &press_primary(), 0.0);
    assert_eq!(world.projectiles.len(), 1);
    for _ in 0..30 {
        fixed_tick(&mut world, &idle(), 0.02);
    }

    assert!(world.projectiles.is_empty());
    assert_eq!(world.enemies.get(enemy).unwrap().health(), 30.0);
    assert_eq!(effects.count(EffectKind::MuzzleFlash), 1);
    assert_eq!(effects.count(EffectKind::ProjectileHit), 1);
}

#[test]
fn kills_level_up_and_scale_next_wave() {
    let mut config = quiet_config(CharacterKind::Ranged);
    config.progression.points_per_level = 20;
    let (mut world, effects) = world_with(config, OpenGround::new(100.0));

    let levels = Rc::new(RefCell::new(Vec::new()));
    let sink = levels.clone();
    world.progression.subscribe(move |event| {
        if let ProgressionEvent::LevelChanged(level) = event {
            sink.borrow_mut().push(*level);
        }
    });

    for x in [5.0, -5.0] {
        let id = world.spawn_enemy_at(Vec2::new(x, 0.0), Difficulty::default());
        world.damage_enemy(id, 100.0);
    }
    assert_eq!(world.progression.score(), 20);
    assert_eq!(world.progression.level(), 2);
    assert_eq!(*levels.borrow(), vec![2]);
    assert_eq!(effects.count(EffectKind::EnemyDeath), 2);

    world.spawner.start(&mut world.scheduler, world.time);
    tick(&mut world, &idle(), 0.25);
    // 3 + (2 - 1) * 2 enemies, each with +20% damage applied once
    assert_eq!(world.enemies.len(), 5);
    for enemy in world.enemies.iter() {
        assert!((enemy.current_damage() - 12.0).abs() < 1e-5);
        assert!(enemy.pos.length() >= 10.0);
    }
    // Next wave is 10% sooner, counted from when this one was due
    assert_eq!(world.scheduler.next_due(), Some(4.5));
}

#[test]
fn enemy_strikes_reach_health_observers() {
    let (mut world, _) = world_with(quiet_config(CharacterKind::Melee), OpenGround::new(100.0));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    world.progression.subscribe(move |event| {
        if let ProgressionEvent::HealthChanged { current, .. } = event {
            sink.borrow_mut().push(*current);
        }
    });

    world.spawn_enemy_at(Vec2::new(0.0, 1.0), Difficulty::default());
    for _ in 0..5 {
        tick(&mut world, &idle(), 0.5);
    }
    // Acquire at 0.5, strikes at 1.0, 2.0
    assert_eq!(*seen.borrow(), vec![90.0, 80.0]);
}

#[test]
fn cooldown_fills_published_every_tick() {
    let (mut world, _) = world_with(quiet_config(CharacterKind::Ranged), OpenGround::new(100.0));
    let states: Rc<RefCell<Vec<CooldownState>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = states.clone();
    world.subscribe_cooldowns(move |state| sink.borrow_mut().push(*state));

    tick(&mut world, &press_primary(), 0.25);
    tick(&mut world, &idle(), 0.25);
    tick(&mut world, &idle(), 0.25);

    let states = states.borrow();
    assert_eq!(states.len(), 3);
    assert_eq!(states[0].primary.fill, 1.0);
    assert_eq!(states[1].primary.fill, 0.5);
    assert_eq!(states[2].primary.fill, 0.0);
    assert_eq!(states[2].secondary.fill, 0.0);
}

#[test]
fn double_detonation_scores_once() {
    let (mut world, effects) =
        world_with(quiet_config(CharacterKind::Trapper), OpenGround::new(100.0));
    world.spawn_enemy_at(Vec2::new(2.0, 0.0), Difficulty::default());

    tick(
        &mut world,
        &TickInput {
            secondary: true,
            ..Default::default()
        },
        0.0,
    );
    let explosive = world.explosives[0].id;
    world.explosives[0].damage = 500.0;
    assert!(world.detonate_explosive(explosive));
    assert!(!world.detonate_explosive(explosive));

    assert_eq!(world.progression.score(), 10);
    assert!(world.enemies.is_empty());
    assert_eq!(effects.count(EffectKind::Explosion), 1);
    assert_eq!(effects.count(EffectKind::EnemyDeath), 1);
}

#[test]
fn enemy_walking_into_a_charge_sets_it_off_once() {
    let mut config = quiet_config(CharacterKind::Trapper);
    config.explosive.detonate_on_contact = true;
    let (mut world, effects) = world_with(config, OpenGround::new(100.0));
    let enemy = world.spawn_enemy_at(Vec2::new(8.0, 0.0), Difficulty::default());
    let mut clock = Clock::new();
    let frame_dt = 1.0 / 60.0;

    frame(
        &mut world,
        &mut clock,
        &TickInput {
            secondary: true,
            ..Default::default()
        },
        frame_dt,
    );
    assert_eq!(world.explosives.len(), 1);
    let (charge, damage, radius) = {
        let x = &world.explosives[0];
        (x.pos, x.damage, x.radius)
    };

    // The enemy reaches the charge well inside its 3 s fuse
    let mut contact_at = None;
    for _ in 0..120 {
        frame(&mut world, &mut clock, &idle(), frame_dt);
        if world.explosives.is_empty() {
            contact_at = world.enemies.get(enemy).map(|e| e.pos);
            break;
        }
    }
    let pos = contact_at.expect("charge should go off on contact");
    let expected = 30.0 - damage * (1.0 - pos.distance(charge) / radius);
    let health = world.enemies.get(enemy).unwrap().health();
    assert!((health - expected).abs() < 1e-3);
    assert_eq!(world.scheduler.pending_count(), 0);
    assert_eq!(effects.count(EffectKind::Explosion), 1);

    // Nothing else goes off when the old fuse time passes
    for _ in 0..240 {
        frame(&mut world, &mut clock, &idle(), frame_dt);
    }
    assert_eq!(effects.count(EffectKind::Explosion), 1);
    assert_eq!(world.enemies.get(enemy).unwrap().health(), health);
}

#[test]
fn pause_freezes_every_timer() {
    let (mut world, _) = world_with(quiet_config(CharacterKind::Trapper), OpenGround::new(100.0));
    let mut clock = Clock::new();
    frame(
        &mut world,
        &mut clock,
        &TickInput {
            secondary: true,
            ..Default::default()
        },
        0.05,
    );
    assert_eq!(world.explosives.len(), 1);

    frame(
        &mut world,
        &mut clock,
        &TickInput {
            pause: true,
            ..Default::default()
        },
        0.05,
    );
    for _ in 0..200 {
        frame(&mut world, &mut clock, &idle(), 0.05);
    }
    // Fuse is 3 s; 10 s of paused frames must not set it off
    assert_eq!(world.explosives.len(), 1);

    frame(
        &mut world,
        &mut clock,
        &TickInput {
            pause: true,
            ..Default::default()
        },
        0.05,
    );
    for _ in 0..70 {
        frame(&mut world, &mut clock, &idle(), 0.05);
    }
    assert!(world.explosives.is_empty());
}

#[test]
fn placements_free_up_when_traps_expire() {
    let mut config = quiet_config(CharacterKind::Trapper);
    config.player.trapper.max_traps = 1;
    config.player.trapper.trap_duration = 2.0;
    let (mut world, _) = world_with(config, OpenGround::new(100.0));

    tick(&mut world, &press_primary(), 0.0);
    assert_eq!(world.traps.len(), 1);
    tick(&mut world, &press_primary(), 1.5);
    assert_eq!(world.traps.len(), 1);
    tick(&mut world, &idle(), 1.0);
    assert!(world.traps.is_empty());
    tick(&mut world, &press_primary(), 0.0);
    assert_eq!(world.traps.len(), 1);
}
