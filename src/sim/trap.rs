//! Spike traps placed by the trapper
//!
//! An enemy entering the footprint takes the full hit at once, then a
//! fraction of it every interval while it stays inside. "Inside" is always
//! decided by [`Trap::contains`]; the world polls it every logic tick and
//! again whenever a tick timer fires, so a fast enemy cannot slip out
//! unnoticed.

use std::collections::BTreeMap;

use glam::Vec2;

use super::scheduler::TimerHandle;
use super::state::EntityId;
use crate::config::TrapConfig;

/// Placement parameters produced by an ability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrapSpec {
    pub pos: Vec2,
    pub damage: f32,
    pub duration: f32,
    pub interval: f32,
}

#[derive(Debug, Clone)]
pub struct Trap {
    pub id: EntityId,
    pub owner: EntityId,
    pub pos: Vec2,
    pub half_extents: Vec2,
    pub damage: f32,
    pub interval: f32,
    tick_fraction: f32,
    expires_at: f32,
    /// Enemies inside and their pending tick timer
    occupants: BTreeMap<EntityId, TimerHandle>,
}

impl Trap {
    pub fn new(
        id: EntityId,
        owner: EntityId,
        spec: &TrapSpec,
        config: &TrapConfig,
        now: f32,
    ) -> Self {
        Self {
            id,
            owner,
            pos: spec.pos,
            half_extents: config.half_extents,
            damage: spec.damage,
            interval: spec.interval,
            tick_fraction: config.tick_damage_fraction,
            expires_at: now + spec.duration,
            occupants: BTreeMap::new(),
        }
    }

    pub fn expires_at(&self) -> f32 {
        self.expires_at
    }

    /// Axis-aligned footprint test
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.pos).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y
    }

    /// Damage dealt every interval after the entry hit
    pub fn tick_damage(&self) -> f32 {
        self.damage * self.tick_fraction
    }

    pub fn is_tracking(&self, enemy: EntityId) -> bool {
        self.occupants.contains_key(&enemy)
    }

    /// Start tracking an enemy with its next tick timer
    pub fn track(&mut self, enemy: EntityId, timer: TimerHandle) {
        self.occupants.insert(enemy, timer);
    }

    /// Stop tracking; returns the timer to cancel
    pub fn untrack(&mut self, enemy: EntityId) -> Option<TimerHandle> {
        self.occupants.remove(&enemy)
    }

    pub fn occupants(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.occupants.keys().copied()
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }
}
