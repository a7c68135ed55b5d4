//! Fused explosives placed by the trapper

use glam::Vec2;

use super::enemy::{Enemy, EnemyRoster};
use super::health::area_damage;
use super::services::SpatialQuery;
use super::state::EntityId;
use crate::config::ExplosiveConfig;

/// Placement parameters produced by an ability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosiveSpec {
    pub pos: Vec2,
    pub damage: f32,
    pub radius: f32,
    pub fuse: f32,
}

#[derive(Debug, Clone)]
pub struct Explosive {
    pub id: EntityId,
    pub owner: EntityId,
    pub pos: Vec2,
    pub damage: f32,
    pub radius: f32,
    pub detonate_on_contact: bool,
    pub trigger_radius: f32,
    fuse_at: f32,
    exploded: bool,
}

impl Explosive {
    pub fn new(
        id: EntityId,
        owner: EntityId,
        spec: &ExplosiveSpec,
        config: &ExplosiveConfig,
        now: f32,
    ) -> Self {
        Self {
            id,
            owner,
            pos: spec.pos,
            damage: spec.damage,
            radius: spec.radius,
            detonate_on_contact: config.detonate_on_contact,
            trigger_radius: config.trigger_radius,
            fuse_at: now + spec.fuse,
            exploded: false,
        }
    }

    /// Simulation time when the fuse runs out
    pub fn fuse_at(&self) -> f32 {
        self.fuse_at
    }

    pub fn has_exploded(&self) -> bool {
        self.exploded
    }

    /// Would a body at `point` with `radius` set this off?
    pub fn touched_by(&self, point: Vec2, radius: f32) -> bool {
        self.detonate_on_contact
            && !self.exploded
            && point.distance(self.pos) <= self.trigger_radius + radius
    }

    /// One area pulse against every live enemy in range.
    ///
    /// Returns `None` if this explosive already went off. Enemies right on
    /// the rim take no damage and are left out.
    pub fn detonate(&mut self, enemies: &EnemyRoster) -> Option<Vec<(EntityId, f32)>> {
        if self.exploded {
            return None;
        }
        self.exploded = true;

        let hits = enemies
            .query_radius(self.pos, self.radius, &|e: &Enemy| !e.is_dead())
            .into_iter()
            .filter_map(|id| {
                let enemy = enemies.get(id)?;
                let damage = area_damage(self.damage, enemy.pos.distance(self.pos), self.radius);
                (damage > 0.0).then_some((id, damage))
            })
            .collect();
        Some(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnemyConfig;
    use crate::sim::enemy::{Difficulty, Enemy};

    fn roster(positions: &[Vec2]) -> EnemyRoster {
        let mut roster = EnemyRoster::new();
        for (i, pos) in positions.iter().enumerate() {
            roster.insert(Enemy::spawn(
                EntityId(i as u32 + 10),
                *pos,
                &EnemyConfig::default(),
                Difficulty::default(),
            ));
        }
        roster
    }

    fn bomb() -> Explosive {
        let spec = ExplosiveSpec {
            pos: Vec2::ZERO,
            damage: 50.0,
            radius: 4.0,
            fuse: 3.0,
        };
        Explosive::new(EntityId(2), EntityId(1), &spec, &ExplosiveConfig::default(), 0.0)
    }

    #[test]
    fn test_falloff_by_distance() {
        let enemies = roster(&[Vec2::new(2.0, 0.0), Vec2::new(0.0, 4.0), Vec2::new(9.0, 0.0)]);
        let mut e = bomb();
        let hits = e.detonate(&enemies).unwrap();
        assert_eq!(hits, vec![(EntityId(10), 25.0)]);
    }

    #[test]
    fn test_detonation_is_idempotent() {
        let enemies = roster(&[Vec2::new(1.0, 0.0)]);
        let mut e = bomb();
        assert_eq!(e.detonate(&enemies).unwrap().len(), 1);
        assert!(e.has_exploded());
        assert!(e.detonate(&enemies).is_none());
    }

    #[test]
    fn test_contact_trigger_only_when_enabled() {
        let mut e = bomb();
        assert!(!e.touched_by(Vec2::ZERO, 0.5));
        e.detonate_on_contact = true;
        assert!(e.touched_by(Vec2::new(0.9, 0.0), 0.5));
        assert!(!e.touched_by(Vec2::new(1.1, 0.0), 0.5));
    }

    #[test]
    fn test_dead_enemies_not_hit() {
        let mut enemies = roster(&[Vec2::new(1.0, 0.0)]);
        enemies.get_mut(EntityId(10)).unwrap().take_damage(100.0);
        let mut e = bomb();
        assert!(e.detonate(&enemies).unwrap().is_empty());
    }
}
