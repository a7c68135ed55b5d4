//! Health and damage primitives
//!
//! Shared by the player's progression state and every enemy. Health is
//! clamped to `[0, max]` at the point of mutation and death is latched:
//! once dead, further damage and healing are ignored.

use serde::{Deserialize, Serialize};

/// Result of applying damage to a [`Health`] pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target was already dead, nothing changed
    Ignored,
    /// Health went down but the target survived
    Wounded,
    /// This hit killed the target (reported exactly once)
    Killed,
}

/// A clamped health pool with a one-way death latch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
    dead: bool,
}

impl Health {
    /// Full health pool
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Current health as a fraction of max (0 when max is 0)
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// Subtract `amount` (negative amounts count as 0)
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::Ignored;
        }
        self.current = (self.current - amount.max(0.0)).clamp(0.0, self.max);
        if self.current <= 0.0 {
            self.dead = true;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    /// Add `amount`, capped at max. Returns the new health.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.dead {
            self.current = (self.current + amount.max(0.0)).min(self.max);
        }
        self.current
    }

    /// Bring the pool back to full and clear the death latch
    pub fn revive(&mut self) {
        self.current = self.max;
        self.dead = false;
    }
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Linear falloff from full strength at the center to zero at `radius`
#[inline]
pub fn falloff_multiplier(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    clamp01(1.0 - distance / radius)
}

/// Area damage dealt to a target `distance` away from the effect center
#[inline]
pub fn area_damage(base_damage: f32, distance: f32, radius: f32) -> f32 {
    base_damage * falloff_multiplier(distance, radius)
}

/// Scale a value up by a percentage (`20.0` means +20%)
#[inline]
pub fn scale_percent(value: f32, percent: f32) -> f32 {
    value * (1.0 + percent / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_damage_then_kill_once() {
        let mut hp = Health::new(30.0);
        assert_eq!(hp.apply_damage(10.0), DamageOutcome::Wounded);
        assert_eq!(hp.current(), 20.0);
        assert_eq!(hp.apply_damage(50.0), DamageOutcome::Killed);
        assert_eq!(hp.current(), 0.0);
        assert!(hp.is_dead());

        // Repeated zero-health reports do not re-trigger death
        assert_eq!(hp.apply_damage(5.0), DamageOutcome::Ignored);
        assert_eq!(hp.apply_damage(0.0), DamageOutcome::Ignored);
    }

    #[test]
    fn test_dead_pool_ignores_heal() {
        let mut hp = Health::new(10.0);
        hp.apply_damage(10.0);
        assert_eq!(hp.heal(5.0), 0.0);
        hp.revive();
        assert!(!hp.is_dead());
        assert_eq!(hp.current(), 10.0);
    }

    #[test]
    fn test_negative_damage_does_not_heal() {
        let mut hp = Health::new(10.0);
        hp.apply_damage(4.0);
        hp.apply_damage(-100.0);
        assert_eq!(hp.current(), 6.0);
    }

    #[test]
    fn test_area_damage_falloff() {
        assert_eq!(area_damage(50.0, 2.0, 4.0), 25.0);
        assert_eq!(area_damage(50.0, 0.0, 4.0), 50.0);
        assert_eq!(area_damage(50.0, 4.0, 4.0), 0.0);
        assert_eq!(area_damage(50.0, 9.0, 4.0), 0.0);
        assert_eq!(area_damage(50.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_scale_percent() {
        assert!((scale_percent(10.0, 20.0) - 12.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_bounds(
            max in 1.0f32..500.0,
            ops in proptest::collection::vec((any::<bool>(), -50.0f32..300.0), 0..64),
        ) {
            let mut hp = Health::new(max);
            for (is_damage, amount) in ops {
                if is_damage {
                    hp.apply_damage(amount);
                } else {
                    hp.heal(amount);
                }
                prop_assert!(hp.current() >= 0.0);
                prop_assert!(hp.current() <= hp.max());
            }
        }
    }
}
