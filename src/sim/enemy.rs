//! Enemy actors and their AI state machine
//!
//! Seeking → Approaching ⇄ Attacking → Dead. Decisions run on the logic
//! tick; walking toward the destination runs on the fixed tick and defers
//! the route to the [`Navigation`] service.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cooldown::CooldownGate;
use super::health::{DamageOutcome, Health};
use super::services::{Navigation, SpatialQuery};
use super::state::EntityId;
use crate::config::EnemyConfig;
use crate::consts::ENEMY_STOPPING_DISTANCE;
use crate::{angle_of, move_towards};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    /// No target known
    Seeking,
    /// Walking toward a target out of attack range
    Approaching,
    /// Target in range, standing still and striking
    Attacking,
    /// Terminal
    Dead,
}

/// Stat multipliers applied when an enemy spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub health: f32,
    pub damage: f32,
    pub speed: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            health: 1.0,
            damage: 1.0,
            speed: 1.0,
        }
    }
}

/// What the AI decided this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyIntent {
    Idle,
    /// Deal this much damage to the player
    Strike(f32),
}

/// The actor an enemy can hunt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    pub id: EntityId,
    pub pos: Vec2,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    /// Heading (radians)
    pub facing: f32,
    pub radius: f32,
    pub state: AiState,
    health: Health,
    base_damage: f32,
    current_damage: f32,
    move_speed: f32,
    attack_range: f32,
    attack: CooldownGate,
    score_value: u32,
    drop_chance: f32,
    target: Option<EntityId>,
    destination: Option<Vec2>,
}

impl Enemy {
    /// Spawn with difficulty already folded in. `difficulty.damage` is the
    /// full damage multiplier, level scaling included.
    pub fn spawn(id: EntityId, pos: Vec2, config: &EnemyConfig, difficulty: Difficulty) -> Self {
        Self {
            id,
            pos,
            facing: 0.0,
            radius: config.radius,
            state: AiState::Seeking,
            health: Health::new(config.max_health * difficulty.health),
            base_damage: config.base_damage,
            current_damage: config.base_damage * difficulty.damage,
            move_speed: config.move_speed * difficulty.speed,
            attack_range: config.attack_range,
            attack: CooldownGate::new(config.attack_cooldown),
            score_value: config.score_value,
            drop_chance: config.drop_chance,
            target: None,
            destination: None,
        }
    }

    pub fn health(&self) -> f32 {
        self.health.current()
    }

    pub fn max_health(&self) -> f32 {
        self.health.max()
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn base_damage(&self) -> f32 {
        self.base_damage
    }

    pub fn current_damage(&self) -> f32 {
        self.current_damage
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn set_move_speed(&mut self, speed: f32) {
        self.move_speed = speed.max(0.0);
    }

    pub fn score_value(&self) -> u32 {
        self.score_value
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn destination(&self) -> Option<Vec2> {
        self.destination
    }

    pub fn set_destination(&mut self, destination: Vec2) {
        self.destination = Some(destination);
    }

    pub fn halt(&mut self) {
        self.destination = None;
    }

    /// Logic tick: pick a state and maybe strike.
    ///
    /// `player` is the current registry answer for "who can be hunted".
    /// A newly acquired target is acted on from the next tick.
    pub fn think(&mut self, now: f32, player: Option<TargetInfo>) -> EnemyIntent {
        if self.is_dead() {
            return EnemyIntent::Idle;
        }

        let target = match (self.target, player) {
            (Some(id), Some(p)) if p.id == id => p,
            _ => {
                self.target = player.map(|p| p.id);
                self.state = AiState::Seeking;
                self.halt();
                return EnemyIntent::Idle;
            }
        };

        let to_target = target.pos - self.pos;
        if to_target.length() <= self.attack_range {
            self.state = AiState::Attacking;
            self.halt();
            if to_target != Vec2::ZERO {
                self.facing = angle_of(to_target);
            }
            if self.attack.try_fire(now) {
                log::debug!("Enemy {:?} strikes for {:.1}", self.id, self.current_damage);
                return EnemyIntent::Strike(self.current_damage);
            }
        } else {
            self.state = AiState::Approaching;
            self.set_destination(target.pos);
        }
        EnemyIntent::Idle
    }

    /// Fixed tick: walk toward the destination along the service's route
    pub fn step_movement(&mut self, nav: &dyn Navigation, dt: f32) {
        if self.state != AiState::Approaching {
            return;
        }
        let Some(destination) = self.destination else {
            return;
        };
        if self.pos.distance(destination) <= ENEMY_STOPPING_DISTANCE {
            return;
        }
        let Some(waypoint) = nav.find_path(self.pos, destination) else {
            return;
        };
        let next = move_towards(self.pos, waypoint, self.move_speed * dt);
        if next != self.pos && nav.is_navigable(next) {
            self.facing = angle_of(next - self.pos);
            self.pos = next;
        }
    }

    /// Apply damage; the killing blow is reported once
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        let outcome = self.health.apply_damage(amount);
        if outcome == DamageOutcome::Killed {
            self.state = AiState::Dead;
            self.target = None;
            self.halt();
        }
        outcome
    }

    /// `uniform(0, 1) <= drop_chance`
    pub fn roll_loot(&self, rng: &mut impl Rng) -> bool {
        rng.random::<f32>() <= self.drop_chance
    }
}

/// Live enemies in ascending id order
#[derive(Debug, Clone, Default)]
pub struct EnemyRoster {
    enemies: Vec<Enemy>,
}

impl EnemyRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids are allocated monotonically, so pushing keeps the roster sorted
    pub fn insert(&mut self, enemy: Enemy) {
        debug_assert!(self.enemies.last().is_none_or(|e| e.id < enemy.id));
        self.enemies.push(enemy);
    }

    pub fn get(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.enemies[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        match self.enemies.binary_search_by_key(&id, |e| e.id) {
            Ok(i) => Some(&mut self.enemies[i]),
            Err(_) => None,
        }
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| !e.is_dead())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| !e.is_dead())
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.enemies.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Remove one enemy regardless of state
    pub fn remove(&mut self, id: EntityId) -> Option<Enemy> {
        let i = self.enemies.binary_search_by_key(&id, |e| e.id).ok()?;
        Some(self.enemies.remove(i))
    }

    /// Drop dead enemies, returning their ids
    pub fn remove_dead(&mut self) -> Vec<EntityId> {
        let dead: Vec<EntityId> = self
            .enemies
            .iter()
            .filter(|e| e.is_dead())
            .map(|e| e.id)
            .collect();
        self.enemies.retain(|e| !e.is_dead());
        dead
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    /// Nearest live enemy to `point`
    pub fn nearest(&self, point: Vec2) -> Option<&Enemy> {
        self.alive()
            .min_by(|a, b| a.pos.distance(point).total_cmp(&b.pos.distance(point)))
    }
}

impl SpatialQuery for EnemyRoster {
    fn query_radius(
        &self,
        center: Vec2,
        radius: f32,
        filter: &dyn Fn(&Enemy) -> bool,
    ) -> Vec<EntityId> {
        self.enemies
            .iter()
            .filter(|e| e.pos.distance(center) <= radius && filter(e))
            .map(|e| e.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::services::OpenGround;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy_at(pos: Vec2) -> Enemy {
        Enemy::spawn(EntityId(10), pos, &EnemyConfig::default(), Difficulty::default())
    }

    fn player_at(pos: Vec2) -> Option<TargetInfo> {
        Some(TargetInfo {
            id: EntityId(1),
            pos,
        })
    }

    #[test]
    fn test_seeks_then_approaches() {
        let mut e = enemy_at(Vec2::ZERO);
        assert_eq!(e.think(0.0, None), EnemyIntent::Idle);
        assert_eq!(e.state, AiState::Seeking);

        // Acquire this tick, act next tick
        e.think(0.1, player_at(Vec2::new(10.0, 0.0)));
        assert_eq!(e.state, AiState::Seeking);
        assert_eq!(e.target(), Some(EntityId(1)));

        e.think(0.2, player_at(Vec2::new(10.0, 0.0)));
        assert_eq!(e.state, AiState::Approaching);
        assert_eq!(e.destination(), Some(Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_attack_respects_cooldown() {
        let mut e = enemy_at(Vec2::ZERO);
        let p = player_at(Vec2::new(1.0, 0.0));
        e.think(0.0, p);
        assert_eq!(e.think(0.0, p), EnemyIntent::Strike(10.0));
        assert_eq!(e.state, AiState::Attacking);
        assert!(e.destination().is_none());
        assert_eq!(e.think(0.5, p), EnemyIntent::Idle);
        assert_eq!(e.think(1.0, p), EnemyIntent::Strike(10.0));
    }

    #[test]
    fn test_lost_target_returns_to_seeking() {
        let mut e = enemy_at(Vec2::ZERO);
        e.think(0.0, player_at(Vec2::new(5.0, 0.0)));
        e.think(0.1, player_at(Vec2::new(5.0, 0.0)));
        assert_eq!(e.state, AiState::Approaching);
        e.think(0.2, None);
        assert_eq!(e.state, AiState::Seeking);
        assert!(e.target().is_none());
    }

    #[test]
    fn test_difficulty_scales_stats() {
        let difficulty = Difficulty {
            health: 2.0,
            damage: 1.5,
            speed: 0.5,
        };
        let e = Enemy::spawn(EntityId(3), Vec2::ZERO, &EnemyConfig::default(), difficulty);
        assert_eq!(e.max_health(), 60.0);
        assert_eq!(e.current_damage(), 15.0);
        assert_eq!(e.move_speed(), 2.0);
    }

    #[test]
    fn test_death_is_terminal() {
        let mut e = enemy_at(Vec2::ZERO);
        assert_eq!(e.take_damage(40.0), DamageOutcome::Killed);
        assert_eq!(e.state, AiState::Dead);
        assert_eq!(e.take_damage(40.0), DamageOutcome::Ignored);
        assert_eq!(e.think(5.0, player_at(Vec2::ZERO)), EnemyIntent::Idle);
        assert_eq!(e.state, AiState::Dead);
    }

    #[test]
    fn test_moves_toward_destination() {
        let nav = OpenGround::new(50.0);
        let mut e = enemy_at(Vec2::ZERO);
        e.think(0.0, player_at(Vec2::new(10.0, 0.0)));
        e.think(0.0, player_at(Vec2::new(10.0, 0.0)));
        for _ in 0..50 {
            e.step_movement(&nav, 0.02);
        }
        // 4 units/s for one second
        assert!((e.pos.x - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_loot_roll_extremes() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut e = enemy_at(Vec2::ZERO);
        e.drop_chance = 1.0;
        assert!(e.roll_loot(&mut rng));
        e.drop_chance = -1.0;
        assert!(!e.roll_loot(&mut rng));
    }

    #[test]
    fn test_roster_queries() {
        let config = EnemyConfig::default();
        let mut roster = EnemyRoster::new();
        for (i, x) in [0.0, 3.0, 8.0].iter().enumerate() {
            roster.insert(Enemy::spawn(
                EntityId(i as u32 + 1),
                Vec2::new(*x, 0.0),
                &config,
                Difficulty::default(),
            ));
        }
        let hits = roster.query_radius(Vec2::ZERO, 4.0, &|e: &Enemy| !e.is_dead());
        assert_eq!(hits, vec![EntityId(1), EntityId(2)]);

        roster.get_mut(EntityId(2)).unwrap().take_damage(100.0);
        let hits = roster.query_radius(Vec2::ZERO, 4.0, &|e: &Enemy| !e.is_dead());
        assert_eq!(hits, vec![EntityId(1)]);
        assert_eq!(roster.remove_dead(), vec![EntityId(2)]);
        assert_eq!(roster.nearest(Vec2::new(9.0, 0.0)).unwrap().id, EntityId(3));
    }
}
