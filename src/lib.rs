//! Siege Arena - combat and encounter simulation for a top-down arena game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (abilities, hazards, enemy AI, spawning, progression)
//! - `config`: Data-driven game balance
//! - `error`: Error types surfaced by config loading and player actions
//!
//! The ground plane is 2D: `x` points east, `y` points north. Angles are in
//! radians, measured counter-clockwise from east.

pub mod config;
pub mod error;
pub mod sim;

pub use config::GameConfig;
pub use error::{AbilityError, ConfigError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the clock will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Collision radius of the player body
    pub const PLAYER_RADIUS: f32 = 0.5;
    /// Aim points closer than this to the player do not turn it
    pub const AIM_DEADZONE: f32 = 0.5;
    /// Enemies stop this far from their destination
    pub const ENEMY_STOPPING_DISTANCE: f32 = 1.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Shortest signed angular difference from `from` to `to`
#[inline]
pub fn angle_delta(from: f32, to: f32) -> f32 {
    normalize_angle(normalize_angle(to) - normalize_angle(from))
}

/// Unit vector pointing along `theta`
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Heading angle of a direction vector
#[inline]
pub fn angle_of(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

/// Move `current` toward `target` by at most `max_delta`
#[inline]
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_delta || dist == 0.0 {
        target
    } else {
        current + delta / dist * max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_delta_takes_short_way() {
        let d = angle_delta(PI - 0.1, -PI + 0.1);
        assert!((d - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_move_towards_stops_at_target() {
        let p = move_towards(Vec2::ZERO, Vec2::new(1.0, 0.0), 5.0);
        assert_eq!(p, Vec2::new(1.0, 0.0));
        let p = move_towards(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0);
        assert!((p.x - 2.0).abs() < 1e-6);
    }
}
