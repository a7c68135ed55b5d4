//! The player character and its ability kits
//!
//! Character classes are a closed set. Each kind carries its tuning record
//! and the two ability slots dispatch on it, so adding a class means adding
//! a [`Kit`] variant and its match arms, not a new type.
//!
//! Abilities never touch the world directly. They return an
//! [`AbilityOutcome`] describing what should happen and the world carries
//! it out, which keeps the player testable on its own.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cooldown::{CooldownGate, CooldownReading};
use super::enemy::{Enemy, EnemyRoster};
use super::explosive::ExplosiveSpec;
use super::health::scale_percent;
use super::projectile::ShotSpec;
use super::services::{Navigation, SpatialQuery};
use super::state::EntityId;
use super::trap::TrapSpec;
use crate::config::{MeleeKit, MovementConfig, PlayerConfig, RangedKit, TrapperKit};
use crate::consts::AIM_DEADZONE;
use crate::error::AbilityError;
use crate::{angle_delta, angle_of, direction_from_angle, move_towards};

/// Selectable character class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterKind {
    #[default]
    Ranged,
    Melee,
    Trapper,
}

impl CharacterKind {
    pub fn name(self) -> &'static str {
        match self {
            CharacterKind::Ranged => "Ranged",
            CharacterKind::Melee => "Melee",
            CharacterKind::Trapper => "Trapper",
        }
    }
}

/// Hazards the player places and keeps a count of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementKind {
    Trap,
    Explosive,
}

impl fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementKind::Trap => write!(f, "trap"),
            PlacementKind::Explosive => write!(f, "explosive"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilitySlot {
    Primary,
    Secondary,
}

/// Per-class tuning
#[derive(Debug, Clone)]
pub enum Kit {
    Ranged(RangedKit),
    Melee(MeleeKit),
    Trapper(TrapperKit),
}

impl Kit {
    pub fn for_kind(kind: CharacterKind, config: &PlayerConfig) -> Self {
        match kind {
            CharacterKind::Ranged => Kit::Ranged(config.ranged.clone()),
            CharacterKind::Melee => Kit::Melee(config.melee.clone()),
            CharacterKind::Trapper => Kit::Trapper(config.trapper.clone()),
        }
    }

    pub fn kind(&self) -> CharacterKind {
        match self {
            Kit::Ranged(_) => CharacterKind::Ranged,
            Kit::Melee(_) => CharacterKind::Melee,
            Kit::Trapper(_) => CharacterKind::Trapper,
        }
    }

    fn cooldowns(&self) -> (f32, f32) {
        match self {
            Kit::Ranged(k) => (k.primary_cooldown, k.burst_cooldown),
            Kit::Melee(k) => (k.primary_cooldown, k.spin_cooldown),
            Kit::Trapper(k) => (k.trap_cooldown, k.explosive_cooldown),
        }
    }
}

/// One shot of a burst, fired `delay` seconds after the ability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstShot {
    pub delay: f32,
    /// Angle offset from the facing at fire time (radians)
    pub spread: f32,
}

/// What an accepted ability asks the world to do
#[derive(Debug, Clone, PartialEq)]
pub enum AbilityOutcome {
    /// Launch one projectile now
    Fire(ShotSpec),
    /// Schedule delayed shots
    Burst(Vec<BurstShot>),
    /// Damage these enemies now
    Strike {
        hits: Vec<(EntityId, f32)>,
        spin: bool,
    },
    PlaceTrap(TrapSpec),
    PlaceExplosive(ExplosiveSpec),
}

/// Both ability slots for the HUD
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CooldownState {
    pub primary: CooldownReading,
    pub secondary: CooldownReading,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading (radians)
    pub facing: f32,
    pub radius: f32,
    kit: Kit,
    movement: MovementConfig,
    base_damage: f32,
    current_damage: f32,
    primary: CooldownGate,
    secondary: CooldownGate,
    traps: Vec<EntityId>,
    explosives: Vec<EntityId>,
}

impl Player {
    pub fn new(id: EntityId, config: &PlayerConfig) -> Self {
        let kit = Kit::for_kind(config.kind, config);
        let (primary, secondary) = kit.cooldowns();
        Self {
            id,
            pos: config.spawn_point,
            vel: Vec2::ZERO,
            facing: 0.0,
            radius: crate::consts::PLAYER_RADIUS,
            kit,
            movement: config.movement.clone(),
            base_damage: config.base_damage,
            current_damage: config.base_damage,
            primary: CooldownGate::new(primary),
            secondary: CooldownGate::new(secondary),
            traps: Vec::new(),
            explosives: Vec::new(),
        }
    }

    pub fn kind(&self) -> CharacterKind {
        self.kit.kind()
    }

    pub fn kit(&self) -> &Kit {
        &self.kit
    }

    pub fn forward(&self) -> Vec2 {
        direction_from_angle(self.facing)
    }

    pub fn base_damage(&self) -> f32 {
        self.base_damage
    }

    pub fn current_damage(&self) -> f32 {
        self.current_damage
    }

    pub fn increase_damage(&mut self, amount: f32) {
        self.current_damage += amount;
        log::debug!("Player damage now {:.1}", self.current_damage);
    }

    pub fn increase_damage_percent(&mut self, percent: f32) {
        self.current_damage = scale_percent(self.current_damage, percent);
    }

    pub fn reset_damage(&mut self) {
        self.current_damage = self.base_damage;
    }

    /// Accelerate toward `axis * move_speed` and integrate (fixed tick).
    /// Steps onto unwalkable ground are refused.
    pub fn apply_movement(&mut self, axis: Vec2, nav: &dyn Navigation, dt: f32) {
        let axis = axis.clamp_length_max(1.0);
        let target_vel = axis * self.movement.move_speed;
        let rate = if axis == Vec2::ZERO {
            self.movement.deceleration
        } else {
            self.movement.acceleration
        };
        self.vel = move_towards(self.vel, target_vel, rate * dt);

        let next = self.pos + self.vel * dt;
        if nav.is_navigable(next) {
            self.pos = next;
        } else {
            self.vel = Vec2::ZERO;
        }
    }

    /// Turn smoothly toward a world-space aim point
    pub fn aim_toward(&mut self, point: Vec2, dt: f32) {
        let to_aim = point - self.pos;
        if to_aim.length() < AIM_DEADZONE {
            return;
        }
        let target = angle_of(to_aim);
        let t = (self.movement.rotation_speed * dt).min(1.0);
        self.facing = crate::normalize_angle(self.facing + angle_delta(self.facing, target) * t);
    }

    pub fn cooldown_state(&self, now: f32) -> CooldownState {
        CooldownState {
            primary: self.primary.reading(now),
            secondary: self.secondary.reading(now),
        }
    }

    pub fn can_use(&self, slot: AbilitySlot, now: f32) -> bool {
        self.gate(slot).can_fire(now)
    }

    fn gate(&self, slot: AbilitySlot) -> &CooldownGate {
        match slot {
            AbilitySlot::Primary => &self.primary,
            AbilitySlot::Secondary => &self.secondary,
        }
    }

    fn check_gate(&self, slot: AbilitySlot, now: f32) -> Result<(), AbilityError> {
        let gate = self.gate(slot);
        if gate.can_fire(now) {
            Ok(())
        } else {
            Err(AbilityError::OnCooldown {
                remaining: gate.remaining(now),
            })
        }
    }

    fn check_cap(&self, kind: PlacementKind, max: usize) -> Result<(), AbilityError> {
        if self.placed(kind) >= max {
            log::info!("Maximum {} count reached ({})", kind, max);
            return Err(AbilityError::CapReached { kind, max });
        }
        Ok(())
    }

    pub fn perform_primary(
        &mut self,
        now: f32,
        enemies: &EnemyRoster,
    ) -> Result<AbilityOutcome, AbilityError> {
        self.check_gate(AbilitySlot::Primary, now)?;
        let outcome = match &self.kit {
            Kit::Ranged(k) => AbilityOutcome::Fire(ShotSpec {
                origin: self.pos + self.forward() * k.muzzle_offset,
                dir: self.forward(),
                speed: k.projectile_speed,
                lifetime: k.projectile_lifetime,
                damage: self.current_damage,
            }),
            Kit::Melee(k) => {
                let half_angle = k.attack_angle_deg.to_radians() / 2.0;
                AbilityOutcome::Strike {
                    hits: self.cone_hits(enemies, k.attack_range, half_angle),
                    spin: false,
                }
            }
            Kit::Trapper(k) => {
                // A capped placement is rejected before the gate fires
                self.check_cap(PlacementKind::Trap, k.max_traps)?;
                AbilityOutcome::PlaceTrap(TrapSpec {
                    pos: self.pos + self.forward() * k.placement_distance,
                    damage: self.current_damage,
                    duration: k.trap_duration,
                    interval: k.trap_interval,
                })
            }
        };
        self.primary.fire(now);
        Ok(outcome)
    }

    pub fn perform_secondary(
        &mut self,
        now: f32,
        enemies: &EnemyRoster,
    ) -> Result<AbilityOutcome, AbilityError> {
        self.check_gate(AbilitySlot::Secondary, now)?;
        let outcome = match &self.kit {
            Kit::Ranged(k) => AbilityOutcome::Burst(burst_pattern(k)),
            Kit::Melee(k) => {
                let damage = self.current_damage * k.spin_damage_multiplier;
                let hits = enemies
                    .query_radius(self.pos, k.spin_radius, &|e: &Enemy| !e.is_dead())
                    .into_iter()
                    .map(|id| (id, damage))
                    .collect();
                AbilityOutcome::Strike { hits, spin: true }
            }
            Kit::Trapper(k) => {
                self.check_cap(PlacementKind::Explosive, k.max_explosives)?;
                AbilityOutcome::PlaceExplosive(ExplosiveSpec {
                    pos: self.pos + self.forward() * k.placement_distance,
                    damage: self.current_damage * k.explosive_damage_multiplier,
                    radius: k.explosive_radius,
                    fuse: k.explosive_delay,
                })
            }
        };
        self.secondary.fire(now);
        Ok(outcome)
    }

    /// Explosives to set off right now (empty for non-trappers)
    pub fn detonate_all(&self) -> Vec<EntityId> {
        match self.kit {
            Kit::Trapper(_) => self.explosives.clone(),
            _ => Vec::new(),
        }
    }

    /// Live enemies within `range` and `half_angle` of the facing
    fn cone_hits(
        &self,
        enemies: &EnemyRoster,
        range: f32,
        half_angle: f32,
    ) -> Vec<(EntityId, f32)> {
        let forward = self.forward();
        let origin = self.pos;
        let in_cone = |pos: Vec2| {
            let to = pos - origin;
            to == Vec2::ZERO || forward.angle_to(to).abs() <= half_angle + 1e-4
        };
        enemies
            .query_radius(origin, range, &|e: &Enemy| !e.is_dead() && in_cone(e.pos))
            .into_iter()
            .map(|id| (id, self.current_damage))
            .collect()
    }

    pub fn placed(&self, kind: PlacementKind) -> usize {
        match kind {
            PlacementKind::Trap => self.traps.len(),
            PlacementKind::Explosive => self.explosives.len(),
        }
    }

    pub fn track_placement(&mut self, kind: PlacementKind, id: EntityId) {
        match kind {
            PlacementKind::Trap => self.traps.push(id),
            PlacementKind::Explosive => self.explosives.push(id),
        }
    }

    /// Forget a destroyed hazard
    pub fn forget_placement(&mut self, id: EntityId) {
        self.traps.retain(|t| *t != id);
        self.explosives.retain(|e| *e != id);
    }
}

/// Shot timings and fan angles for a ranged burst.
///
/// Each shot waits for its muzzle flash, and consecutive shots are further
/// separated by the burst delay.
pub fn burst_pattern(kit: &RangedKit) -> Vec<BurstShot> {
    let count = kit.burst_count;
    let spread = kit.burst_spread_deg.to_radians();
    (0..count)
        .map(|i| {
            let offset = if count > 1 {
                (i as f32 / (count - 1) as f32 - 0.5) * 2.0 * spread
            } else {
                0.0
            };
            BurstShot {
                delay: (i + 1) as f32 * kit.muzzle_delay + i as f32 * kit.burst_delay,
                spread: offset,
            }
        })
        .collect()
}
