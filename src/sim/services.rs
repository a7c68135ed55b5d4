//! Collaborators the simulation consumes but does not own
//!
//! Pathfinding, terrain and visual effects belong to the host. The
//! simulation only asks questions through these traits, so a test can
//! swap in a scripted terrain and a recording effect sink.

use glam::Vec2;

use super::enemy::Enemy;
use super::state::EntityId;

/// Terrain and pathfinding queries
pub trait Navigation {
    /// Is `point` on walkable ground (not a wall or outside the map)?
    fn is_navigable(&self, point: Vec2) -> bool;

    /// Nearest walkable point within `max_distance` of `point`
    fn sample_position(&self, point: Vec2, max_distance: f32) -> Option<Vec2>;

    /// Next point to steer toward on the way from `from` to `to`, or `None`
    /// when `to` cannot be reached
    fn find_path(&self, from: Vec2, to: Vec2) -> Option<Vec2>;

    /// Parameter in [0, 1] of the first unwalkable point on `from -> to`.
    ///
    /// The default walks the segment in steps of [`SEGMENT_SAMPLE_STEP`].
    /// Hosts with a real raycast should override it.
    fn first_blocked(&self, from: Vec2, to: Vec2) -> Option<f32> {
        let steps = (from.distance(to) / SEGMENT_SAMPLE_STEP).ceil().max(1.0) as u32;
        (0..=steps)
            .map(|i| i as f32 / steps as f32)
            .find(|t| !self.is_navigable(from.lerp(to, *t)))
    }
}

/// Spacing of the default segment test in [`Navigation::first_blocked`]
pub const SEGMENT_SAMPLE_STEP: f32 = 0.05;

/// Radius queries over live entities
pub trait SpatialQuery {
    fn query_radius(
        &self,
        center: Vec2,
        radius: f32,
        filter: &dyn Fn(&Enemy) -> bool,
    ) -> Vec<EntityId>;
}

/// Cosmetic effects the host may render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    MuzzleFlash,
    ProjectileHit,
    Slash,
    Spin,
    TrapPlaced,
    ExplosivePlaced,
    Explosion,
    EnemyHit,
    EnemyDeath,
    LootDropped,
    PickupCollected,
}

/// Fire-and-forget effect playback
pub trait EffectSink {
    fn play_effect(&mut self, kind: EffectKind, position: Vec2, facing: f32);
}

/// Discards every effect
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn play_effect(&mut self, _kind: EffectKind, _position: Vec2, _facing: f32) {}
}

/// Logs effects at debug level (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEffects;

impl EffectSink for LogEffects {
    fn play_effect(&mut self, kind: EffectKind, position: Vec2, _facing: f32) {
        log::debug!("effect {:?} at ({:.1}, {:.1})", kind, position.x, position.y);
    }
}

/// A circular wall or pillar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Vec2,
    pub radius: f32,
}

/// Flat square arena centered on the origin, optionally dotted with round
/// obstacles. Paths are straight lines.
#[derive(Debug, Clone)]
pub struct OpenGround {
    pub half_extent: f32,
    pub obstacles: Vec<Obstacle>,
}

/// Rings tried by [`OpenGround::sample_position`]
const SAMPLE_RINGS: u32 = 4;
/// Directions tried per ring
const SAMPLE_DIRECTIONS: u32 = 12;

impl OpenGround {
    pub fn new(half_extent: f32) -> Self {
        Self {
            half_extent,
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacle(mut self, center: Vec2, radius: f32) -> Self {
        self.obstacles.push(Obstacle { center, radius });
        self
    }
}

impl Navigation for OpenGround {
    fn is_navigable(&self, point: Vec2) -> bool {
        point.x.abs() <= self.half_extent
            && point.y.abs() <= self.half_extent
            && self
                .obstacles
                .iter()
                .all(|o| point.distance(o.center) > o.radius)
    }

    fn sample_position(&self, point: Vec2, max_distance: f32) -> Option<Vec2> {
        if self.is_navigable(point) {
            return Some(point);
        }
        if max_distance <= 0.0 {
            return None;
        }
        // Search outward ring by ring, nearest ring first
        for ring in 1..=SAMPLE_RINGS {
            let r = max_distance * ring as f32 / SAMPLE_RINGS as f32;
            let best = (0..SAMPLE_DIRECTIONS)
                .map(|i| {
                    let theta = i as f32 / SAMPLE_DIRECTIONS as f32 * std::f32::consts::TAU;
                    point + crate::direction_from_angle(theta) * r
                })
                .filter(|p| self.is_navigable(*p))
                .min_by(|a, b| a.distance(point).total_cmp(&b.distance(point)));
            if best.is_some() {
                return best;
            }
        }
        None
    }

    fn find_path(&self, _from: Vec2, to: Vec2) -> Option<Vec2> {
        self.sample_position(to, 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_ground_bounds_and_obstacles() {
        let ground = OpenGround::new(10.0).with_obstacle(Vec2::new(3.0, 0.0), 1.0);
        assert!(ground.is_navigable(Vec2::ZERO));
        assert!(!ground.is_navigable(Vec2::new(11.0, 0.0)));
        assert!(!ground.is_navigable(Vec2::new(3.5, 0.0)));
    }

    #[test]
    fn test_sample_position_finds_nearby_ground() {
        let ground = OpenGround::new(10.0);
        let p = ground.sample_position(Vec2::new(12.0, 0.0), 4.0).unwrap();
        assert!(ground.is_navigable(p));
        assert!(p.distance(Vec2::new(12.0, 0.0)) <= 4.0 + 1e-4);

        assert!(ground.sample_position(Vec2::new(30.0, 0.0), 4.0).is_none());
    }

    #[test]
    fn test_first_blocked_finds_thin_wall() {
        let ground = OpenGround::new(10.0).with_obstacle(Vec2::new(4.7, 0.0), 0.1);
        let t = ground
            .first_blocked(Vec2::new(4.5, 0.0), Vec2::new(4.9, 0.0))
            .unwrap();
        let hit = 4.5 + 0.4 * t;
        assert!((4.6..=4.8).contains(&hit), "hit at {hit}");
        assert_eq!(ground.first_blocked(Vec2::ZERO, Vec2::new(4.0, 0.0)), None);
    }
}
