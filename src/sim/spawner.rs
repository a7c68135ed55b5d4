//! Wave spawning around the player
//!
//! Each wave picks one side of the player, lines the enemies up along it
//! and searches for walkable ground near each slot. A slot that finds no
//! ground is skipped; the rest of the wave still spawns. The wave timer is
//! a scheduler entry owned by [`EntityId::WORLD`].

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{Difficulty, EnemyRoster};
use super::scheduler::{Scheduler, TimerHandle};
use super::services::Navigation;
use super::state::{EntityId, Scheduled};
use crate::config::SpawnConfig;

/// Side of the player a wave comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnDirection {
    North,
    South,
    East,
    West,
}

impl SpawnDirection {
    pub const ALL: [SpawnDirection; 4] = [
        SpawnDirection::North,
        SpawnDirection::South,
        SpawnDirection::East,
        SpawnDirection::West,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Offset from the player for slot `index` of a `total`-enemy wave
    pub fn slot_offset(self, radius: f32, index: u32, total: u32, spacing: f32) -> Vec2 {
        let lateral = (index as f32 - total as f32 / 2.0) * spacing;
        match self {
            SpawnDirection::North => Vec2::new(lateral, radius),
            SpawnDirection::South => Vec2::new(lateral, -radius),
            SpawnDirection::East => Vec2::new(radius, lateral),
            SpawnDirection::West => Vec2::new(-radius, lateral),
        }
    }
}

/// Uniform point in a disk of `radius` around the origin
fn random_in_disk(rng: &mut impl Rng, radius: f32) -> Vec2 {
    let theta = rng.random_range(0.0..TAU);
    let r = radius * rng.random::<f32>().sqrt();
    crate::direction_from_angle(theta) * r
}

/// A wave's placements
#[derive(Debug, Clone, PartialEq)]
pub struct WavePlan {
    pub direction: SpawnDirection,
    pub positions: Vec<Vec2>,
    /// Slots that found no ground
    pub skipped: u32,
}

#[derive(Debug)]
pub struct SpawnDirector {
    config: SpawnConfig,
    spawning: bool,
    wave_timer: Option<TimerHandle>,
    /// Enemies this director spawned that are still alive
    active: Vec<EntityId>,
    waves_spawned: u32,
}

impl SpawnDirector {
    pub fn new(config: SpawnConfig) -> Self {
        Self {
            config,
            spawning: false,
            wave_timer: None,
            active: Vec::new(),
            waves_spawned: 0,
        }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    pub fn is_spawning(&self) -> bool {
        self.spawning
    }

    pub fn waves_spawned(&self) -> u32 {
        self.waves_spawned
    }

    /// Begin the wave cycle; the first wave is due immediately
    pub fn start(&mut self, scheduler: &mut Scheduler<Scheduled>, now: f32) {
        if self.spawning {
            return;
        }
        self.spawning = true;
        self.schedule_wave(scheduler, now);
        log::info!("Spawning started");
    }

    pub fn stop(&mut self, scheduler: &mut Scheduler<Scheduled>) {
        if let Some(timer) = self.wave_timer.take() {
            scheduler.cancel(timer);
        }
        if self.spawning {
            self.spawning = false;
            log::info!("Spawning stopped");
        }
    }

    /// Queue the next wave at `at`
    pub fn schedule_wave(&mut self, scheduler: &mut Scheduler<Scheduled>, at: f32) {
        if let Some(old) = self.wave_timer.take() {
            scheduler.cancel(old);
        }
        self.wave_timer = Some(scheduler.schedule(EntityId::WORLD, at, Scheduled::SpawnWave));
    }

    /// The wave timer fired
    pub fn on_wave_due(&mut self) {
        self.wave_timer = None;
        self.waves_spawned += 1;
    }

    pub fn set_difficulty_multipliers(&mut self, health: f32, damage: f32, speed: f32) {
        self.config.health_multiplier = health;
        self.config.damage_multiplier = damage;
        self.config.speed_multiplier = speed;
    }

    /// Director multipliers combined with the level's damage scaling
    pub fn difficulty(&self, level_damage_multiplier: f32) -> Difficulty {
        Difficulty {
            health: self.config.health_multiplier,
            damage: self.config.damage_multiplier * level_damage_multiplier,
            speed: self.config.speed_multiplier,
        }
    }

    /// Where slot `index` would ideally go
    pub fn target_position(
        &self,
        direction: SpawnDirection,
        index: u32,
        total: u32,
        player_pos: Vec2,
        rng: &mut impl Rng,
    ) -> Vec2 {
        let points = &self.config.custom_spawn_points;
        if !points.is_empty() {
            return points[rng.random_range(0..points.len())];
        }
        let spacing = self.config.slot_spacing;
        player_pos + direction.slot_offset(self.config.spawn_radius, index, total, spacing)
    }

    /// Walkable point near `target`, preferably at least the minimum
    /// distance from the player.
    ///
    /// Jittered samples that land too close are retried. When every attempt
    /// fails, a wider search around the target itself is the last resort,
    /// and that one skips the distance check.
    pub fn find_spawn_position(
        &self,
        target: Vec2,
        player_pos: Vec2,
        nav: &dyn Navigation,
        rng: &mut impl Rng,
    ) -> Option<Vec2> {
        let sample = self.config.sample_distance;
        for _ in 0..self.config.max_spawn_attempts {
            let candidate = target + random_in_disk(rng, sample);
            if let Some(hit) = nav.sample_position(candidate, sample) {
                if hit.distance(player_pos) < self.config.min_spawn_distance {
                    continue;
                }
                return Some(hit);
            }
        }

        let fallback = nav.sample_position(target, sample * 2.0);
        if fallback.is_none() {
            log::warn!(
                "No walkable spawn position near ({:.1}, {:.1})",
                target.x,
                target.y
            );
        }
        fallback
    }

    pub fn plan_wave(
        &self,
        count: u32,
        player_pos: Vec2,
        nav: &dyn Navigation,
        rng: &mut impl Rng,
    ) -> WavePlan {
        let direction = SpawnDirection::random(rng);
        let mut positions = Vec::with_capacity(count as usize);
        let mut skipped = 0;
        for i in 0..count {
            let target = self.target_position(direction, i, count, player_pos, rng);
            match self.find_spawn_position(target, player_pos, nav, rng) {
                Some(pos) => positions.push(pos),
                None => skipped += 1,
            }
        }
        WavePlan {
            direction,
            positions,
            skipped,
        }
    }

    pub fn track(&mut self, enemy: EntityId) {
        self.active.push(enemy);
    }

    /// Drop enemies that are no longer alive
    pub fn prune(&mut self, enemies: &EnemyRoster) {
        self.active.retain(|id| enemies.is_alive(*id));
    }

    pub fn active_enemy_count(&self) -> usize {
        self.active.len()
    }

    pub fn active_enemies(&self) -> &[EntityId] {
        &self.active
    }

    /// Forget every tracked enemy; returns them for removal
    pub fn destroy_all(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.active)
    }

    /// Back to a fresh director (keeps tuning)
    pub fn reset(&mut self, scheduler: &mut Scheduler<Scheduled>) {
        self.stop(scheduler);
        self.active.clear();
        self.waves_spawned = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::services::OpenGround;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_slot_offsets_line_up_along_side() {
        let north = SpawnDirection::North;
        assert_eq!(north.slot_offset(20.0, 0, 3, 2.0), Vec2::new(-3.0, 20.0));
        assert_eq!(north.slot_offset(20.0, 2, 3, 2.0), Vec2::new(1.0, 20.0));
        assert_eq!(SpawnDirection::West.slot_offset(20.0, 1, 2, 2.0), Vec2::new(-20.0, 0.0));
        assert_eq!(SpawnDirection::South.slot_offset(20.0, 0, 1, 2.0), Vec2::new(-1.0, -20.0));
        assert_eq!(SpawnDirection::East.slot_offset(20.0, 0, 1, 2.0), Vec2::new(20.0, -1.0));
    }

    #[test]
    fn test_spawn_respects_min_distance() {
        let director = SpawnDirector::new(SpawnConfig::default());
        let nav = OpenGround::new(100.0);
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..20 {
            let pos = director
                .find_spawn_position(Vec2::new(20.0, 0.0), Vec2::ZERO, &nav, &mut rng)
                .unwrap();
            assert!(pos.distance(Vec2::ZERO) >= 10.0);
            assert!(pos.distance(Vec2::new(20.0, 0.0)) <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn test_fallback_ignores_min_distance() {
        let director = SpawnDirector::new(SpawnConfig::default());
        let nav = OpenGround::new(100.0);
        let mut rng = Pcg32::seed_from_u64(2);
        // Every jittered sample is within 5 of the player
        let pos = director
            .find_spawn_position(Vec2::ZERO, Vec2::ZERO, &nav, &mut rng)
            .unwrap();
        assert_eq!(pos, Vec2::ZERO);
    }

    #[test]
    fn test_unreachable_slot_is_skipped() {
        let director = SpawnDirector::new(SpawnConfig::default());
        // Arena too small to hold anything 20 units out
        let nav = OpenGround::new(5.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let plan = director.plan_wave(3, Vec2::ZERO, &nav, &mut rng);
        assert!(plan.positions.is_empty());
        assert_eq!(plan.skipped, 3);
    }

    #[test]
    fn test_plan_wave_places_every_slot_on_open_ground() {
        let director = SpawnDirector::new(SpawnConfig::default());
        let nav = OpenGround::new(100.0);
        let mut rng = Pcg32::seed_from_u64(4);
        let plan = director.plan_wave(5, Vec2::new(3.0, 3.0), &nav, &mut rng);
        assert_eq!(plan.positions.len(), 5);
        assert_eq!(plan.skipped, 0);
        for pos in plan.positions {
            assert!(pos.distance(Vec2::new(3.0, 3.0)) >= 10.0);
        }
    }

    #[test]
    fn test_custom_points_replace_sides() {
        let config = SpawnConfig {
            custom_spawn_points: vec![Vec2::new(30.0, 30.0)],
            ..Default::default()
        };
        let director = SpawnDirector::new(config);
        let mut rng = Pcg32::seed_from_u64(5);
        let target = director.target_position(SpawnDirection::North, 0, 3, Vec2::ZERO, &mut rng);
        assert_eq!(target, Vec2::new(30.0, 30.0));
    }

    #[test]
    fn test_difficulty_combines_level_multiplier() {
        let mut director = SpawnDirector::new(SpawnConfig::default());
        director.set_difficulty_multipliers(2.0, 1.5, 0.5);
        let d = director.difficulty(1.2);
        assert_eq!(d.health, 2.0);
        assert!((d.damage - 1.8).abs() < 1e-6);
        assert_eq!(d.speed, 0.5);
    }

    #[test]
    fn test_start_stop_manage_wave_timer() {
        let mut sched = Scheduler::new();
        let mut director = SpawnDirector::new(SpawnConfig::default());
        director.start(&mut sched, 0.0);
        director.start(&mut sched, 0.0);
        assert!(director.is_spawning());
        assert_eq!(sched.pending_count(), 1);
        director.stop(&mut sched);
        assert!(!director.is_spawning());
        assert_eq!(sched.pending_count(), 0);
    }
}
