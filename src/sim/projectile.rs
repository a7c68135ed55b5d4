//! Projectiles fired by the ranged character

use glam::Vec2;

use super::state::EntityId;
use crate::config::ProjectileConfig;

/// Something a projectile touched this step.
///
/// Only enemies and terrain are swept. The shooter, other projectiles,
/// placed hazards and pickups never produce a contact. Walls order before
/// enemies met at the same point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Contact {
    /// Wall or terrain edge
    Obstacle,
    Enemy(EntityId),
}

/// What the projectile does about a contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactResponse {
    Ignore,
    /// Deal `damage` to `enemy`
    HitEnemy { enemy: EntityId, damage: f32 },
    /// Stopped by terrain
    Blocked,
}

/// Launch parameters produced by an ability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotSpec {
    pub origin: Vec2,
    pub dir: Vec2,
    pub speed: f32,
    pub lifetime: f32,
    pub damage: f32,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub owner: EntityId,
    pub pos: Vec2,
    /// Unit direction
    pub dir: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub damage: f32,
    pub destroy_on_hit: bool,
    spent: bool,
    /// Enemies already damaged (piercing shots hit each enemy once)
    hits: Vec<EntityId>,
}

impl Projectile {
    pub fn new(id: EntityId, owner: EntityId, shot: &ShotSpec, config: &ProjectileConfig) -> Self {
        Self {
            id,
            owner,
            pos: shot.origin,
            dir: shot.dir.normalize_or(Vec2::X),
            speed: shot.speed,
            radius: config.radius,
            damage: shot.damage,
            destroy_on_hit: config.destroy_on_hit,
            spent: false,
            hits: Vec::new(),
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.dir * self.speed
    }

    /// Move along the fixed direction; returns the swept segment
    pub fn advance(&mut self, dt: f32) -> (Vec2, Vec2) {
        let from = self.pos;
        self.pos += self.velocity() * dt;
        (from, self.pos)
    }

    /// A spent projectile is waiting to be removed
    pub fn is_spent(&self) -> bool {
        self.spent
    }

    pub fn has_hit(&self, enemy: EntityId) -> bool {
        self.hits.contains(&enemy)
    }

    pub fn on_contact(&mut self, contact: Contact) -> ContactResponse {
        if self.spent {
            return ContactResponse::Ignore;
        }
        match contact {
            Contact::Enemy(enemy) => {
                if self.has_hit(enemy) {
                    return ContactResponse::Ignore;
                }
                self.hits.push(enemy);
                if self.destroy_on_hit {
                    self.spent = true;
                }
                ContactResponse::HitEnemy {
                    enemy,
                    damage: self.damage,
                }
            }
            Contact::Obstacle => {
                self.spent = true;
                ContactResponse::Blocked
            }
        }
    }
}

/// First parameter in [0, 1] along `from -> to` that comes within `reach`
/// of `point`, or `None` if the segment stays clear
pub fn sweep_entry(from: Vec2, to: Vec2, point: Vec2, reach: f32) -> Option<f32> {
    let seg = to - from;
    let rel = from - point;
    let c = rel.length_squared() - reach * reach;
    if c <= 0.0 {
        return Some(0.0);
    }
    let a = seg.length_squared();
    if a <= 0.0 {
        return None;
    }
    let b = 2.0 * rel.dot(seg);
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / (2.0 * a);
    (0.0..=1.0).contains(&t).then_some(t)
}
