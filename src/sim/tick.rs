//! Simulation ticks
//!
//! Two rates drive the world. [`fixed_tick`] integrates movement and
//! projectile flight at `SIM_DT`; [`tick`] runs once per frame with the
//! frame's delta for input, abilities, AI decisions, hazards and the
//! scheduler. [`frame`] runs both in the right order.

use glam::Vec2;

use super::clock::Clock;
use super::enemy::EnemyIntent;
use super::player::{AbilitySlot, CharacterKind};
use super::projectile::{Contact, ContactResponse, sweep_entry};
use super::services::EffectKind;
use super::state::{EntityId, World};
use crate::consts::*;
use crate::error::AbilityError;

/// Input commands for a single frame (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement stick, length up to 1 (x east, y north)
    pub move_axis: Vec2,
    /// World-space point to face (from mouse/touch position)
    pub aim_point: Option<Vec2>,
    /// Primary ability held
    pub primary: bool,
    /// Secondary ability pressed
    pub secondary: bool,
    /// Detonate all placed explosives
    pub detonate: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start over (after game over, or from the pause menu)
    pub restart: bool,
    /// Idle/demo mode - AI plays the game
    pub autopilot: bool,
}

/// Replace player intent with the autopilot's when it is on
pub fn resolve_input(world: &World, input: &TickInput) -> TickInput {
    let mut input = input.clone();
    if !input.autopilot {
        return input;
    }
    let Some(player) = &world.player else {
        return input;
    };

    input.move_axis = Vec2::ZERO;
    input.primary = false;
    input.secondary = false;
    input.detonate = false;

    let Some(enemy) = world.enemies.nearest(player.pos) else {
        // Nothing to fight: go grab the nearest pickup
        if let Some(pickup) = world
            .pickups
            .iter()
            .min_by(|a, b| a.pos.distance(player.pos).total_cmp(&b.pos.distance(player.pos)))
        {
            input.move_axis = (pickup.pos - player.pos).normalize_or_zero();
        }
        return input;
    };

    let to_enemy = enemy.pos - player.pos;
    let dist = to_enemy.length();
    input.aim_point = Some(enemy.pos);

    match player.kind() {
        CharacterKind::Ranged => {
            input.primary = true;
            input.secondary = dist < 12.0;
            // Kite
            if dist < 5.0 {
                input.move_axis = -to_enemy.normalize_or_zero();
            }
        }
        CharacterKind::Melee => {
            input.primary = dist <= 2.0;
            let crowd = world
                .enemies
                .alive()
                .filter(|e| e.pos.distance(player.pos) <= 3.0)
                .count();
            input.secondary = crowd >= 2;
            if dist > 1.5 {
                input.move_axis = to_enemy.normalize_or_zero();
            }
        }
        CharacterKind::Trapper => {
            input.primary = dist < 8.0;
            input.secondary = dist < 10.0;
            input.detonate = world
                .explosives
                .iter()
                .any(|x| x.owner == player.id && x.pos.distance(enemy.pos) < x.radius * 0.5);
            if dist < 4.0 {
                input.move_axis = -to_enemy.normalize_or_zero();
            }
        }
    }
    input
}

/// Advance one frame: fixed substeps first, then the logic tick.
/// Returns the number of fixed steps run.
pub fn frame(world: &mut World, clock: &mut Clock, input: &TickInput, frame_dt: f32) -> u32 {
    let input = resolve_input(world, input);

    // A new session starts with no leftover physics time
    if input.restart {
        clock.reset();
        tick(world, &input, 0.0);
        return 0;
    }

    let substeps = if world.progression.is_playing() {
        clock.advance(frame_dt)
    } else {
        clock.reset();
        0
    };
    for _ in 0..substeps {
        fixed_tick(world, &input, SIM_DT);
    }

    tick(world, &input, frame_dt.clamp(0.0, MAX_FRAME_DT));
    substeps
}

/// Fixed-rate physics: locomotion and projectile flight
pub fn fixed_tick(world: &mut World, input: &TickInput, dt: f32) {
    if !world.progression.is_playing() {
        return;
    }
    world.time_ticks += 1;

    world.move_actors(input.move_axis, input.aim_point, dt);
    step_projectiles(world, dt);
}

/// Move projectiles and resolve what they touched along the way
fn step_projectiles(world: &mut World, dt: f32) {
    for i in 0..world.projectiles.len() {
        let (from, to) = world.projectiles[i].advance(dt);
        let radius = world.projectiles[i].radius;

        // Enemies and walls met this step, in order along the path
        let mut contacts: Vec<(f32, Contact)> = world
            .enemies
            .alive()
            .filter_map(|e| {
                let t = sweep_entry(from, to, e.pos, e.radius + radius)?;
                Some((t, Contact::Enemy(e.id)))
            })
            .collect();
        if let Some(t) = world.navigation().first_blocked(from, to) {
            contacts.push((t, Contact::Obstacle));
        }
        contacts.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        for (_, contact) in contacts {
            match world.projectiles[i].on_contact(contact) {
                ContactResponse::HitEnemy { enemy, damage } => {
                    world.damage_enemy(enemy, damage);
                }
                ContactResponse::Blocked => {
                    log::debug!("Projectile {:?} hit a wall", world.projectiles[i].id);
                }
                ContactResponse::Ignore => {}
            }
        }
        if world.projectiles[i].is_spent() {
            let p = &world.projectiles[i];
            let (pos, facing) = (p.pos, crate::angle_of(p.dir));
            world.play_effect(EffectKind::ProjectileHit, pos, facing);
        }
    }
    world.remove_spent_projectiles();
}

/// Advance game logic by one frame
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    if input.restart {
        world.restart();
        return;
    }

    // Handle pause toggle
    if input.pause {
        world.toggle_pause();
    }

    // Don't tick if paused or game over
    if !world.progression.is_playing() {
        return;
    }

    world.time += dt;
    let input = resolve_input(world, input);

    // Abilities
    if input.primary {
        report(world.use_ability(AbilitySlot::Primary));
    }
    if input.secondary {
        report(world.use_ability(AbilitySlot::Secondary));
    }
    if input.detonate {
        world.detonate_all();
    }

    // Enemy decisions
    let target = world.player_target();
    for id in world.enemies.ids() {
        let Some(enemy) = world.enemies.get_mut(id) else {
            continue;
        };
        if let EnemyIntent::Strike(damage) = enemy.think(world.time, target) {
            world.damage_player(damage);
            if world.progression.is_game_over() {
                break;
            }
        }
    }

    // Hazards and loot
    world.update_traps();
    world.update_explosive_contacts();
    world.update_pickups();

    world.run_due();
    world.cleanup();
    world.publish_cooldowns();
}

/// Ability rejections are routine; only note the unusual ones
fn report(result: Result<(), AbilityError>) {
    match result {
        Ok(()) | Err(AbilityError::OnCooldown { .. }) => {}
        Err(err) => log::debug!("Ability rejected: {}", err),
    }
}
