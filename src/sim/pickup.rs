//! Loot dropped by dying enemies

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Raises the player's current damage
    DamageBoost,
    /// Heals the player
    HealthRestore,
}

impl PickupKind {
    pub const ALL: [PickupKind; 2] = [PickupKind::DamageBoost, PickupKind::HealthRestore];

    /// Uniform choice
    pub fn roll(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub id: EntityId,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub expires_at: f32,
}

impl Pickup {
    pub fn new(id: EntityId, kind: PickupKind, pos: Vec2, now: f32, lifetime: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            expires_at: now + lifetime,
        }
    }

    pub fn in_reach(&self, point: Vec2, radius: f32) -> bool {
        self.pos.distance(point) <= radius
    }
}
