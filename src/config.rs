//! Game balance configuration
//!
//! Every simulation component is built from its section of [`GameConfig`].
//! Defaults reproduce the shipped tuning; a JSON file may override any
//! subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::player::CharacterKind;

/// Score, lives and player health
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub starting_lives: u32,
    pub max_health: f32,
    /// Level N is cleared at `N * points_per_level` score
    pub points_per_level: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            max_health: 100.0,
            points_per_level: 100,
        }
    }
}

/// Player locomotion (fixed tick)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub move_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Facing smoothing factor (per second)
    pub rotation_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 10.0,
            acceleration: 50.0,
            deceleration: 40.0,
            rotation_speed: 15.0,
        }
    }
}

/// Ranged character: single shots and a spread burst
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RangedKit {
    pub primary_cooldown: f32,
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    /// Distance ahead of the player where shots appear
    pub muzzle_offset: f32,
    pub burst_cooldown: f32,
    pub burst_count: u32,
    /// Delay between the muzzle flash and each burst shot
    pub muzzle_delay: f32,
    /// Gap between consecutive burst shots
    pub burst_delay: f32,
    /// Half-angle of the burst fan (degrees)
    pub burst_spread_deg: f32,
}

impl Default for RangedKit {
    fn default() -> Self {
        Self {
            primary_cooldown: 0.5,
            projectile_speed: 20.0,
            projectile_lifetime: 3.0,
            muzzle_offset: 1.5,
            burst_cooldown: 5.0,
            burst_count: 3,
            muzzle_delay: 0.1,
            burst_delay: 0.1,
            burst_spread_deg: 15.0,
        }
    }
}

/// Melee character: frontal cone strike and a spin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeKit {
    pub primary_cooldown: f32,
    pub attack_range: f32,
    /// Full width of the strike cone (degrees)
    pub attack_angle_deg: f32,
    pub spin_cooldown: f32,
    pub spin_radius: f32,
    pub spin_damage_multiplier: f32,
}

impl Default for MeleeKit {
    fn default() -> Self {
        Self {
            primary_cooldown: 0.5,
            attack_range: 2.0,
            attack_angle_deg: 90.0,
            spin_cooldown: 3.0,
            spin_radius: 3.0,
            spin_damage_multiplier: 0.5,
        }
    }
}

/// Trapper character: spike traps and explosives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapperKit {
    pub trap_cooldown: f32,
    pub explosive_cooldown: f32,
    pub max_traps: usize,
    pub max_explosives: usize,
    pub placement_distance: f32,
    pub trap_duration: f32,
    pub trap_interval: f32,
    pub explosive_delay: f32,
    pub explosive_radius: f32,
    /// Explosive damage as a multiple of the player's current damage
    pub explosive_damage_multiplier: f32,
}

impl Default for TrapperKit {
    fn default() -> Self {
        Self {
            trap_cooldown: 1.0,
            explosive_cooldown: 2.0,
            max_traps: 5,
            max_explosives: 3,
            placement_distance: 2.0,
            trap_duration: 15.0,
            trap_interval: 0.3,
            explosive_delay: 3.0,
            explosive_radius: 4.0,
            explosive_damage_multiplier: 2.0,
        }
    }
}

/// Player character selection and abilities
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub kind: CharacterKind,
    pub base_damage: f32,
    pub spawn_point: Vec2,
    pub movement: MovementConfig,
    pub ranged: RangedKit,
    pub melee: MeleeKit,
    pub trapper: TrapperKit,
}

/// Enemy archetype stats (before difficulty multipliers)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub max_health: f32,
    pub base_damage: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub move_speed: f32,
    pub radius: f32,
    pub score_value: u32,
    /// Probability in [0, 1] that a kill drops a pickup
    pub drop_chance: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_health: 30.0,
            base_damage: 10.0,
            attack_range: 1.5,
            attack_cooldown: 1.0,
            move_speed: 4.0,
            radius: 0.5,
            score_value: 10,
            drop_chance: 0.1,
        }
    }
}

/// Wave spawning around the player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Start the wave timer as soon as the world is created
    pub auto_start: bool,
    pub base_interval: f32,
    pub base_enemies_per_wave: u32,
    /// Distance from the player along the chosen side
    pub spawn_radius: f32,
    pub min_spawn_distance: f32,
    /// Radius of the random jitter and of navigable-surface sampling
    pub sample_distance: f32,
    pub max_spawn_attempts: u32,
    /// Lateral spacing between enemies of one wave
    pub slot_spacing: f32,
    pub health_multiplier: f32,
    pub damage_multiplier: f32,
    pub speed_multiplier: f32,
    /// When non-empty, waves spawn at these points instead of a side
    pub custom_spawn_points: Vec<Vec2>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            auto_start: true,
            base_interval: 5.0,
            base_enemies_per_wave: 3,
            spawn_radius: 20.0,
            min_spawn_distance: 10.0,
            sample_distance: 5.0,
            max_spawn_attempts: 10,
            slot_spacing: 2.0,
            health_multiplier: 1.0,
            damage_multiplier: 1.0,
            speed_multiplier: 1.0,
            custom_spawn_points: Vec::new(),
        }
    }
}

/// Projectile body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub radius: f32,
    /// When false the projectile pierces and keeps flying after a hit
    pub destroy_on_hit: bool,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            radius: 0.15,
            destroy_on_hit: true,
        }
    }
}

/// Spike trap body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapConfig {
    /// Half size of the trap's ground footprint
    pub half_extents: Vec2,
    /// Periodic damage as a fraction of the entry hit
    pub tick_damage_fraction: f32,
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec2::splat(1.0),
            tick_damage_fraction: 0.5,
        }
    }
}

/// Explosive body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosiveConfig {
    pub detonate_on_contact: bool,
    /// Contact distance for `detonate_on_contact`
    pub trigger_radius: f32,
}

impl Default for ExplosiveConfig {
    fn default() -> Self {
        Self {
            detonate_on_contact: false,
            trigger_radius: 0.5,
        }
    }
}

/// Loot dropped by enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub lifetime: f32,
    pub collect_radius: f32,
    pub damage_boost: f32,
    pub health_restore: f32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            lifetime: 15.0,
            collect_radius: 1.0,
            damage_boost: 5.0,
            health_restore: 25.0,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub progression: ProgressionConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub spawn: SpawnConfig,
    pub projectile: ProjectileConfig,
    pub trap: TrapConfig,
    pub explosive: ExplosiveConfig,
    pub pickup: PickupConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            kind: CharacterKind::default(),
            base_damage: 10.0,
            spawn_point: Vec2::ZERO,
            movement: MovementConfig::default(),
            ranged: RangedKit::default(),
            melee: MeleeKit::default(),
            trapper: TrapperKit::default(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be zero or positive, got {value}"),
        })
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.progression;
        if p.starting_lives == 0 {
            return Err(ConfigError::Invalid {
                field: "progression.starting_lives",
                reason: "must be at least 1".into(),
            });
        }
        if p.points_per_level == 0 {
            return Err(ConfigError::Invalid {
                field: "progression.points_per_level",
                reason: "must be at least 1".into(),
            });
        }
        positive("progression.max_health", p.max_health)?;

        let pl = &self.player;
        non_negative("player.base_damage", pl.base_damage)?;
        non_negative("player.movement.move_speed", pl.movement.move_speed)?;
        // Zero cooldowns are allowed: they mean continuous fire
        non_negative("player.ranged.primary_cooldown", pl.ranged.primary_cooldown)?;
        non_negative("player.ranged.burst_cooldown", pl.ranged.burst_cooldown)?;
        positive("player.ranged.projectile_speed", pl.ranged.projectile_speed)?;
        positive("player.ranged.projectile_lifetime", pl.ranged.projectile_lifetime)?;
        non_negative("player.melee.primary_cooldown", pl.melee.primary_cooldown)?;
        non_negative("player.melee.spin_cooldown", pl.melee.spin_cooldown)?;
        positive("player.melee.attack_range", pl.melee.attack_range)?;
        positive("player.melee.spin_radius", pl.melee.spin_radius)?;
        non_negative("player.trapper.trap_cooldown", pl.trapper.trap_cooldown)?;
        non_negative("player.trapper.explosive_cooldown", pl.trapper.explosive_cooldown)?;
        positive("player.trapper.trap_duration", pl.trapper.trap_duration)?;
        positive("player.trapper.trap_interval", pl.trapper.trap_interval)?;
        non_negative("player.trapper.explosive_delay", pl.trapper.explosive_delay)?;
        positive("player.trapper.explosive_radius", pl.trapper.explosive_radius)?;

        let e = &self.enemy;
        positive("enemy.max_health", e.max_health)?;
        non_negative("enemy.base_damage", e.base_damage)?;
        positive("enemy.attack_range", e.attack_range)?;
        non_negative("enemy.attack_cooldown", e.attack_cooldown)?;
        non_negative("enemy.move_speed", e.move_speed)?;
        if !(0.0..=1.0).contains(&e.drop_chance) {
            return Err(ConfigError::Invalid {
                field: "enemy.drop_chance",
                reason: format!("must be within [0, 1], got {}", e.drop_chance),
            });
        }

        let s = &self.spawn;
        positive("spawn.base_interval", s.base_interval)?;
        non_negative("spawn.sample_distance", s.sample_distance)?;
        non_negative("spawn.min_spawn_distance", s.min_spawn_distance)?;

        positive("pickup.lifetime", self.pickup.lifetime)?;
        positive("trap.half_extents.x", self.trap.half_extents.x)?;
        positive("trap.half_extents.y", self.trap.half_extents.y)?;
        Ok(())
    }
}
