//! World state and entity bookkeeping
//!
//! The [`World`] owns every live entity, the progression state, the event
//! scheduler and the single seeded RNG. All mutation goes through its
//! methods so that destroying an entity always cancels what it scheduled.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{Difficulty, Enemy, EnemyRoster, TargetInfo};
use super::explosive::{Explosive, ExplosiveSpec};
use super::health::DamageOutcome;
use super::observer::{Observers, SubscriptionId};
use super::pickup::{Pickup, PickupKind};
use super::player::{AbilityOutcome, AbilitySlot, CooldownState, Kit, PlacementKind, Player};
use super::progression::Progression;
use super::projectile::{Projectile, ShotSpec};
use super::scheduler::{Due, Scheduler};
use super::services::{EffectKind, EffectSink, Navigation, NullEffects, OpenGround};
use super::spawner::SpawnDirector;
use super::trap::{Trap, TrapSpec};
use crate::config::GameConfig;
use crate::error::AbilityError;

/// Half size of the default open arena
pub const DEFAULT_ARENA_HALF_EXTENT: f32 = 60.0;

/// Stable entity handle. Ids are never reused within a world.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Owner of world-level timers such as the wave cycle
    pub const WORLD: EntityId = EntityId(0);
}

/// Deferred work queued in the world's scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scheduled {
    /// One delayed shot of a ranged burst
    BurstShot { spread: f32 },
    /// Periodic damage for an enemy standing in a trap
    TrapTick { trap: EntityId, enemy: EntityId },
    /// Explosive fuse ran out
    Fuse { explosive: EntityId },
    /// Wave cycle
    SpawnWave,
    /// Lifetime of a projectile, trap or pickup ended
    Expire(EntityId),
}

pub struct World {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation time (seconds), frozen while paused
    pub time: f32,
    /// Fixed ticks run so far
    pub time_ticks: u64,
    pub progression: Progression,
    pub player: Option<Player>,
    /// Sorted by id
    pub enemies: EnemyRoster,
    pub projectiles: Vec<Projectile>,
    pub traps: Vec<Trap>,
    pub explosives: Vec<Explosive>,
    pub pickups: Vec<Pickup>,
    pub spawner: SpawnDirector,
    pub scheduler: Scheduler<Scheduled>,
    navigation: Box<dyn Navigation>,
    effects: Box<dyn EffectSink>,
    cooldown_observers: Observers<CooldownState>,
    next_id: u32,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("seed", &self.seed)
            .field("time", &self.time)
            .field("phase", &self.progression.phase())
            .field("enemies", &self.enemies.len())
            .field("projectiles", &self.projectiles.len())
            .field("traps", &self.traps.len())
            .field("explosives", &self.explosives.len())
            .field("pickups", &self.pickups.len())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

impl World {
    /// Create a world with the player spawned and, if configured, the wave
    /// cycle running
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut world = Self {
            progression: Progression::new(config.progression.clone()),
            spawner: SpawnDirector::new(config.spawn.clone()),
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time: 0.0,
            time_ticks: 0,
            player: None,
            enemies: EnemyRoster::new(),
            projectiles: Vec::new(),
            traps: Vec::new(),
            explosives: Vec::new(),
            pickups: Vec::new(),
            scheduler: Scheduler::new(),
            navigation: Box::new(OpenGround::new(DEFAULT_ARENA_HALF_EXTENT)),
            effects: Box::new(NullEffects),
            cooldown_observers: Observers::default(),
            next_id: 1,
        };
        world.begin_session();
        world
    }

    pub fn with_navigation(mut self, navigation: impl Navigation + 'static) -> Self {
        self.navigation = Box::new(navigation);
        self
    }

    pub fn with_effects(mut self, effects: impl EffectSink + 'static) -> Self {
        self.effects = Box::new(effects);
        self
    }

    pub fn navigation(&self) -> &dyn Navigation {
        self.navigation.as_ref()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Forward a cosmetic effect to the host
    pub fn play_effect(&mut self, kind: EffectKind, position: Vec2, facing: f32) {
        self.effects.play_effect(kind, position, facing);
    }

    fn begin_session(&mut self) {
        self.spawn_player();
        if self.config.spawn.auto_start {
            self.spawner.start(&mut self.scheduler, self.time);
        }
    }

    /// Clear the arena and start a fresh session. The RNG keeps running so
    /// consecutive sessions differ.
    pub fn restart(&mut self) {
        self.destroy_all_enemies();
        self.scheduler.clear();
        self.spawner.reset(&mut self.scheduler);
        self.player = None;
        self.enemies.clear();
        self.projectiles.clear();
        self.traps.clear();
        self.explosives.clear();
        self.pickups.clear();
        self.time = 0.0;
        self.time_ticks = 0;
        self.progression.restart();
        self.begin_session();
    }

    pub fn subscribe_cooldowns(
        &mut self,
        callback: impl FnMut(&CooldownState) + 'static,
    ) -> SubscriptionId {
        self.cooldown_observers.subscribe(callback)
    }

    pub fn unsubscribe_cooldowns(&mut self, id: SubscriptionId) -> bool {
        self.cooldown_observers.unsubscribe(id)
    }

    /// Push the player's cooldown fills to listeners
    pub fn publish_cooldowns(&mut self) {
        if let Some(player) = &self.player {
            let state = player.cooldown_state(self.time);
            self.cooldown_observers.emit(&state);
        }
    }

    // --- Player ---

    /// Spawn (or respawn) the player at the configured point
    pub fn spawn_player(&mut self) -> EntityId {
        self.despawn_player();
        let id = self.next_entity_id();
        let player = Player::new(id, &self.config.player);
        log::info!("Spawned {} player {:?}", player.kind().name(), id);
        self.player = Some(player);
        id
    }

    /// Remove the player and its pending burst shots
    pub fn despawn_player(&mut self) {
        if let Some(player) = self.player.take() {
            self.scheduler.cancel_owner(player.id);
        }
    }

    pub fn player_target(&self) -> Option<TargetInfo> {
        self.player.as_ref().map(|p| TargetInfo {
            id: p.id,
            pos: p.pos,
        })
    }

    /// Fixed-tick locomotion for the player and every enemy
    pub fn move_actors(&mut self, move_axis: Vec2, aim_point: Option<Vec2>, dt: f32) {
        let nav = self.navigation.as_ref();
        if let Some(player) = self.player.as_mut() {
            player.apply_movement(move_axis, nav, dt);
            if let Some(aim) = aim_point {
                player.aim_toward(aim, dt);
            }
        }
        for enemy in self.enemies.iter_mut() {
            enemy.step_movement(nav, dt);
        }
    }

    /// Damage from enemies lands on the progression state
    pub fn damage_player(&mut self, amount: f32) {
        self.progression.take_damage(amount);
        if self.progression.is_game_over() {
            self.spawner.stop(&mut self.scheduler);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.progression.toggle_pause();
    }

    pub fn use_ability(&mut self, slot: AbilitySlot) -> Result<(), AbilityError> {
        if !self.progression.is_playing() {
            return Err(AbilityError::GameNotRunning);
        }
        let Some(player) = self.player.as_mut() else {
            return Err(AbilityError::GameNotRunning);
        };
        let outcome = match slot {
            AbilitySlot::Primary => player.perform_primary(self.time, &self.enemies)?,
            AbilitySlot::Secondary => player.perform_secondary(self.time, &self.enemies)?,
        };
        self.apply_outcome(outcome);
        Ok(())
    }

    fn apply_outcome(&mut self, outcome: AbilityOutcome) {
        let Some((owner, pos, facing)) = self.player.as_ref().map(|p| (p.id, p.pos, p.facing))
        else {
            return;
        };
        match outcome {
            AbilityOutcome::Fire(shot) => {
                self.fire_projectile(owner, &shot);
            }
            AbilityOutcome::Burst(shots) => {
                for shot in shots {
                    self.scheduler.schedule(
                        owner,
                        self.time + shot.delay,
                        Scheduled::BurstShot { spread: shot.spread },
                    );
                }
            }
            AbilityOutcome::Strike { hits, spin } => {
                let kind = if spin { EffectKind::Spin } else { EffectKind::Slash };
                self.play_effect(kind, pos, facing);
                for (enemy, damage) in hits {
                    self.damage_enemy(enemy, damage);
                }
            }
            AbilityOutcome::PlaceTrap(spec) => {
                let id = self.place_trap(owner, &spec);
                if let Some(player) = self.player.as_mut() {
                    player.track_placement(PlacementKind::Trap, id);
                }
            }
            AbilityOutcome::PlaceExplosive(spec) => {
                let id = self.place_explosive(owner, &spec);
                if let Some(player) = self.player.as_mut() {
                    player.track_placement(PlacementKind::Explosive, id);
                }
            }
        }
    }

    /// Set off every explosive the player placed. Returns how many went off.
    pub fn detonate_all(&mut self) -> usize {
        let ids = self
            .player
            .as_ref()
            .map(|p| p.detonate_all())
            .unwrap_or_default();
        ids.into_iter()
            .filter(|id| self.detonate_explosive(*id))
            .count()
    }

    // --- Enemies ---

    /// Stat multipliers for an enemy spawned right now
    pub fn current_difficulty(&self) -> Difficulty {
        self.spawner
            .difficulty(self.progression.enemy_damage_multiplier())
    }

    /// Spawn an enemy exactly at `pos` with explicit multipliers
    pub fn spawn_enemy_at(&mut self, pos: Vec2, difficulty: Difficulty) -> EntityId {
        let id = self.next_entity_id();
        self.enemies
            .insert(Enemy::spawn(id, pos, &self.config.enemy, difficulty));
        self.spawner.track(id);
        id
    }

    /// Spawn one enemy on walkable ground near `pos`
    pub fn spawn_specific(&mut self, pos: Vec2) -> Option<EntityId> {
        let player_pos = self.player.as_ref().map_or(pos, |p| p.pos);
        let spot = self.spawner.find_spawn_position(
            pos,
            player_pos,
            self.navigation.as_ref(),
            &mut self.rng,
        )?;
        let difficulty = self.current_difficulty();
        Some(self.spawn_enemy_at(spot, difficulty))
    }

    /// Run the wave that was due at `due_at` and queue the next one a
    /// level-scaled interval after it
    pub fn spawn_wave(&mut self, due_at: f32) {
        self.spawner.on_wave_due();
        if self.progression.is_game_over() {
            self.spawner.stop(&mut self.scheduler);
            return;
        }

        let base_interval = self.spawner.config().base_interval;
        let next_at = due_at + self.progression.spawn_interval(base_interval);

        if let Some(player_pos) = self.player.as_ref().map(|p| p.pos) {
            let count = self
                .progression
                .enemy_spawn_count(self.spawner.config().base_enemies_per_wave);
            let plan =
                self.spawner
                    .plan_wave(count, player_pos, self.navigation.as_ref(), &mut self.rng);
            let difficulty = self.current_difficulty();
            for pos in &plan.positions {
                self.spawn_enemy_at(*pos, difficulty);
            }
            if !plan.positions.is_empty() {
                log::info!(
                    "Wave spawned! Enemies: {}, Direction: {:?}",
                    plan.positions.len(),
                    plan.direction
                );
            }
            if plan.skipped > 0 {
                log::warn!("{} spawn slots found no ground", plan.skipped);
            }
        }

        self.spawner.schedule_wave(&mut self.scheduler, next_at);
    }

    /// Remove every enemy the spawn director is tracking, without scoring
    pub fn destroy_all_enemies(&mut self) -> usize {
        let ids = self.spawner.destroy_all();
        for id in &ids {
            if self.enemies.remove(*id).is_some() {
                for trap in self.traps.iter_mut() {
                    if let Some(timer) = trap.untrack(*id) {
                        self.scheduler.cancel(timer);
                    }
                }
                self.scheduler.cancel_owner(*id);
            }
        }
        ids.len()
    }

    /// Damage one enemy. A killing blow scores, rolls loot and removes it.
    pub fn damage_enemy(&mut self, id: EntityId, amount: f32) -> DamageOutcome {
        let Some(enemy) = self.enemies.get_mut(id) else {
            return DamageOutcome::Ignored;
        };
        let outcome = enemy.take_damage(amount);
        let (pos, facing) = (enemy.pos, enemy.facing);
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Wounded => {
                log::debug!("Enemy {:?} took {:.1} damage", id, amount);
                self.play_effect(EffectKind::EnemyHit, pos, facing);
            }
            DamageOutcome::Killed => self.on_enemy_killed(id),
        }
        outcome
    }

    fn on_enemy_killed(&mut self, id: EntityId) {
        let Some(enemy) = self.enemies.remove(id) else {
            return;
        };
        self.play_effect(EffectKind::EnemyDeath, enemy.pos, enemy.facing);
        self.progression.add_score(enemy.score_value());

        for trap in self.traps.iter_mut() {
            if let Some(timer) = trap.untrack(id) {
                self.scheduler.cancel(timer);
            }
        }
        self.scheduler.cancel_owner(id);
        self.spawner.prune(&self.enemies);

        if enemy.roll_loot(&mut self.rng) {
            let kind = PickupKind::roll(&mut self.rng);
            self.drop_pickup(kind, enemy.pos);
        }
    }

    // --- Hazards ---

    pub fn fire_projectile(&mut self, owner: EntityId, shot: &ShotSpec) -> EntityId {
        let id = self.next_entity_id();
        let projectile = Projectile::new(id, owner, shot, &self.config.projectile);
        self.play_effect(
            EffectKind::MuzzleFlash,
            shot.origin,
            crate::angle_of(projectile.dir),
        );
        self.projectiles.push(projectile);
        self.scheduler
            .schedule(id, self.time + shot.lifetime, Scheduled::Expire(id));
        id
    }

    /// Fire the next shot of a burst along the player's current facing
    fn fire_burst_shot(&mut self, spread: f32) {
        let Some(player) = &self.player else {
            return;
        };
        let Kit::Ranged(kit) = player.kit() else {
            return;
        };
        let dir = crate::direction_from_angle(player.facing + spread);
        let shot = ShotSpec {
            origin: player.pos + dir * kit.muzzle_offset,
            dir,
            speed: kit.projectile_speed,
            lifetime: kit.projectile_lifetime,
            damage: player.current_damage(),
        };
        let owner = player.id;
        self.fire_projectile(owner, &shot);
    }

    pub fn place_trap(&mut self, owner: EntityId, spec: &TrapSpec) -> EntityId {
        let id = self.next_entity_id();
        let trap = Trap::new(id, owner, spec, &self.config.trap, self.time);
        self.scheduler
            .schedule(id, trap.expires_at(), Scheduled::Expire(id));
        self.traps.push(trap);
        self.play_effect(EffectKind::TrapPlaced, spec.pos, 0.0);
        id
    }

    pub fn place_explosive(&mut self, owner: EntityId, spec: &ExplosiveSpec) -> EntityId {
        let id = self.next_entity_id();
        let explosive = Explosive::new(id, owner, spec, &self.config.explosive, self.time);
        self.scheduler.schedule(
            id,
            explosive.fuse_at(),
            Scheduled::Fuse { explosive: id },
        );
        self.explosives.push(explosive);
        self.play_effect(EffectKind::ExplosivePlaced, spec.pos, 0.0);
        id
    }

    /// Detonate one explosive. False if it is gone or already went off.
    pub fn detonate_explosive(&mut self, id: EntityId) -> bool {
        let Some(explosive) = self.explosives.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        let Some(hits) = explosive.detonate(&self.enemies) else {
            return false;
        };
        let pos = explosive.pos;
        log::info!("Explosive {:?} detonated, {} enemies hit", id, hits.len());
        self.play_effect(EffectKind::Explosion, pos, 0.0);
        for (enemy, damage) in hits {
            self.damage_enemy(enemy, damage);
        }
        self.destroy_explosive(id);
        true
    }

    /// Enter, tick and exit bookkeeping for every trap, by containment
    pub fn update_traps(&mut self) {
        let mut entered = Vec::new();
        for trap in self.traps.iter_mut() {
            for enemy in self.enemies.alive() {
                let inside = trap.contains(enemy.pos);
                let tracked = trap.is_tracking(enemy.id);
                if inside && !tracked {
                    entered.push((trap.id, enemy.id));
                } else if !inside && tracked {
                    if let Some(timer) = trap.untrack(enemy.id) {
                        self.scheduler.cancel(timer);
                    }
                }
            }
        }

        for (trap_id, enemy) in entered {
            let Some((damage, interval)) = self
                .traps
                .iter()
                .find(|t| t.id == trap_id)
                .map(|t| (t.damage, t.interval))
            else {
                continue;
            };
            if !self.enemies.is_alive(enemy) {
                continue;
            }
            log::debug!("Enemy {:?} stepped on trap {:?}", enemy, trap_id);
            if self.damage_enemy(enemy, damage) == DamageOutcome::Wounded {
                self.schedule_trap_tick(trap_id, enemy, self.time + interval);
            }
        }
    }

    fn schedule_trap_tick(&mut self, trap_id: EntityId, enemy: EntityId, at: f32) {
        let timer = self.scheduler.schedule(
            trap_id,
            at,
            Scheduled::TrapTick {
                trap: trap_id,
                enemy,
            },
        );
        if let Some(trap) = self.traps.iter_mut().find(|t| t.id == trap_id) {
            trap.track(enemy, timer);
        }
    }

    /// Periodic trap damage that was due at `due_at`. The next tick is
    /// counted from `due_at`, not from the frame that ran this one.
    fn trap_tick(&mut self, trap_id: EntityId, enemy: EntityId, due_at: f32) {
        let Some(trap) = self.traps.iter_mut().find(|t| t.id == trap_id) else {
            return;
        };
        trap.untrack(enemy);
        let still_inside = self
            .enemies
            .get(enemy)
            .is_some_and(|e| !e.is_dead() && trap.contains(e.pos));
        if !still_inside {
            return;
        }
        let (damage, interval) = (trap.tick_damage(), trap.interval);
        if self.damage_enemy(enemy, damage) == DamageOutcome::Wounded {
            self.schedule_trap_tick(trap_id, enemy, due_at + interval);
        }
    }

    /// Contact-triggered explosives
    pub fn update_explosive_contacts(&mut self) {
        let triggered: Vec<EntityId> = self
            .explosives
            .iter()
            .filter(|x| self.enemies.alive().any(|e| x.touched_by(e.pos, e.radius)))
            .map(|x| x.id)
            .collect();
        for id in triggered {
            self.detonate_explosive(id);
        }
    }

    pub fn destroy_projectile(&mut self, id: EntityId) {
        self.projectiles.retain(|p| p.id != id);
        self.scheduler.cancel_owner(id);
    }

    pub fn destroy_trap(&mut self, id: EntityId) {
        self.traps.retain(|t| t.id != id);
        self.scheduler.cancel_owner(id);
        if let Some(player) = self.player.as_mut() {
            player.forget_placement(id);
        }
    }

    pub fn destroy_explosive(&mut self, id: EntityId) {
        self.explosives.retain(|x| x.id != id);
        self.scheduler.cancel_owner(id);
        if let Some(player) = self.player.as_mut() {
            player.forget_placement(id);
        }
    }

    /// Drop spent projectiles
    pub fn remove_spent_projectiles(&mut self) {
        let spent: Vec<EntityId> = self
            .projectiles
            .iter()
            .filter(|p| p.is_spent())
            .map(|p| p.id)
            .collect();
        for id in spent {
            self.destroy_projectile(id);
        }
    }

    // --- Pickups ---

    pub fn drop_pickup(&mut self, kind: PickupKind, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let pickup = Pickup::new(id, kind, pos, self.time, self.config.pickup.lifetime);
        self.scheduler
            .schedule(id, pickup.expires_at, Scheduled::Expire(id));
        self.pickups.push(pickup);
        log::info!("Loot dropped: {:?}", kind);
        self.play_effect(EffectKind::LootDropped, pos, 0.0);
        id
    }

    /// Collect every pickup within reach of the player
    pub fn update_pickups(&mut self) {
        let Some(player_pos) = self.player.as_ref().map(|p| p.pos) else {
            return;
        };
        let radius = self.config.pickup.collect_radius;
        let reached: Vec<EntityId> = self
            .pickups
            .iter()
            .filter(|p| p.in_reach(player_pos, radius))
            .map(|p| p.id)
            .collect();
        for id in reached {
            self.collect_pickup(id);
        }
    }

    pub fn collect_pickup(&mut self, id: EntityId) {
        let Some(index) = self.pickups.iter().position(|p| p.id == id) else {
            return;
        };
        let pickup = self.pickups.remove(index);
        self.scheduler.cancel_owner(id);
        match pickup.kind {
            PickupKind::DamageBoost => {
                if let Some(player) = self.player.as_mut() {
                    player.increase_damage(self.config.pickup.damage_boost);
                }
            }
            PickupKind::HealthRestore => {
                self.progression.heal(self.config.pickup.health_restore);
            }
        }
        log::info!("Picked up {:?}", pickup.kind);
        self.play_effect(EffectKind::PickupCollected, pickup.pos, 0.0);
    }

    pub fn destroy_pickup(&mut self, id: EntityId) {
        self.pickups.retain(|p| p.id != id);
        self.scheduler.cancel_owner(id);
    }

    // --- Scheduler ---

    /// Run every scheduled entry due at the current time
    pub fn run_due(&mut self) {
        while let Some(due) = self.scheduler.pop_due(self.time) {
            self.handle_due(due);
        }
    }

    fn handle_due(&mut self, due: Due<Scheduled>) {
        match due.payload {
            Scheduled::BurstShot { spread } => self.fire_burst_shot(spread),
            Scheduled::TrapTick { trap, enemy } => self.trap_tick(trap, enemy, due.fire_at),
            Scheduled::Fuse { explosive } => {
                self.detonate_explosive(explosive);
            }
            Scheduled::SpawnWave => self.spawn_wave(due.fire_at),
            Scheduled::Expire(id) => self.expire(id),
        }
    }

    fn expire(&mut self, id: EntityId) {
        if self.projectiles.iter().any(|p| p.id == id) {
            self.destroy_projectile(id);
        } else if self.traps.iter().any(|t| t.id == id) {
            log::debug!("Trap {:?} expired", id);
            self.destroy_trap(id);
        } else if self.pickups.iter().any(|p| p.id == id) {
            self.destroy_pickup(id);
        }
    }

    /// Keep per-owner registries in step with the live entity set
    pub fn cleanup(&mut self) {
        for id in self.enemies.remove_dead() {
            self.scheduler.cancel_owner(id);
        }
        self.spawner.prune(&self.enemies);
        self.remove_spent_projectiles();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::CharacterKind;

    fn quiet_config(kind: CharacterKind) -> GameConfig {
        let mut config = GameConfig::default();
        config.spawn.auto_start = false;
        config.enemy.drop_chance = 0.0;
        config.player.kind = kind;
        config
    }

    #[test]
    fn test_new_world_has_player_and_wave_timer() {
        let world = World::new(GameConfig::default(), 1);
        assert!(world.player.is_some());
        assert!(world.spawner.is_spawning());
        assert_eq!(world.scheduler.pending_count(), 1);
    }

    #[test]
    fn test_entity_ids_are_monotonic() {
        let mut world = World::new(quiet_config(CharacterKind::Ranged), 1);
        let a = world.next_entity_id();
        let b = world.next_entity_id();
        assert!(b > a);
        assert_ne!(a, EntityId::WORLD);
    }

    #[test]
    fn test_kill_scores_once_and_removes_enemy() {
        let mut world = World::new(quiet_config(CharacterKind::Ranged), 1);
        let id = world.spawn_enemy_at(Vec2::new(5.0, 0.0), Difficulty::default());
        assert_eq!(world.spawner.active_enemy_count(), 1);
        assert_eq!(world.damage_enemy(id, 50.0), DamageOutcome::Killed);
        assert_eq!(world.damage_enemy(id, 50.0), DamageOutcome::Ignored);
        assert_eq!(world.progression.score(), 10);
        assert!(world.enemies.is_empty());
        assert_eq!(world.spawner.active_enemy_count(), 0);
    }

    #[test]
    fn test_guaranteed_loot_drops_pickup() {
        let mut config = quiet_config(CharacterKind::Ranged);
        config.enemy.drop_chance = 1.0;
        let mut world = World::new(config, 9);
        let id = world.spawn_enemy_at(Vec2::new(5.0, 0.0), Difficulty::default());
        world.damage_enemy(id, 100.0);
        assert_eq!(world.pickups.len(), 1);
        assert_eq!(world.pickups[0].pos, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_destroying_explosive_cancels_fuse() {
        let mut world = World::new(quiet_config(CharacterKind::Trapper), 1);
        let owner = world.player_target().unwrap().id;
        let spec = ExplosiveSpec {
            pos: Vec2::new(3.0, 0.0),
            damage: 20.0,
            radius: 4.0,
            fuse: 3.0,
        };
        let id = world.place_explosive(owner, &spec);
        assert_eq!(world.scheduler.pending_count(), 1);
        world.destroy_explosive(id);
        assert_eq!(world.scheduler.pending_count(), 0);
        assert!(!world.detonate_explosive(id));
    }

    #[test]
    fn test_pickups_apply_effects() {
        let mut world = World::new(quiet_config(CharacterKind::Ranged), 1);
        world.progression.take_damage(50.0);
        world.drop_pickup(PickupKind::HealthRestore, Vec2::new(0.5, 0.0));
        world.drop_pickup(PickupKind::DamageBoost, Vec2::new(0.0, 0.5));
        world.drop_pickup(PickupKind::DamageBoost, Vec2::new(10.0, 0.0));
        world.update_pickups();
        assert_eq!(world.progression.health(), 75.0);
        assert_eq!(world.player.as_ref().unwrap().current_damage(), 15.0);
        assert_eq!(world.pickups.len(), 1);
        assert_eq!(world.scheduler.pending_count(), 1);
    }

    #[test]
    fn test_spawn_specific_lands_away_from_player() {
        let mut world = World::new(quiet_config(CharacterKind::Ranged), 5);
        let id = world.spawn_specific(Vec2::new(15.0, 0.0)).unwrap();
        let enemy = world.enemies.get(id).unwrap();
        assert!(enemy.pos.distance(Vec2::new(15.0, 0.0)) <= 6.0);
        assert_eq!(world.spawner.active_enemy_count(), 1);
    }

    #[test]
    fn test_destroy_all_enemies_scores_nothing() {
        let mut world = World::new(quiet_config(CharacterKind::Ranged), 1);
        for x in [5.0, 10.0, 15.0] {
            world.spawn_enemy_at(Vec2::new(x, 0.0), Difficulty::default());
        }
        assert_eq!(world.destroy_all_enemies(), 3);
        assert!(world.enemies.is_empty());
        assert_eq!(world.spawner.active_enemy_count(), 0);
        assert_eq!(world.progression.score(), 0);
    }

    #[test]
    fn test_restart_clears_arena() {
        let mut world = World::new(GameConfig::default(), 3);
        world.spawn_enemy_at(Vec2::new(5.0, 0.0), Difficulty::default());
        world.time = 42.0;
        world.progression.add_score(30);
        world.restart();
        assert!(world.enemies.is_empty());
        assert_eq!(world.time, 0.0);
        assert_eq!(world.progression.score(), 0);
        assert!(world.spawner.is_spawning());
        assert_eq!(world.scheduler.pending_count(), 1);
    }
}
