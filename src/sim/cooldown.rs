//! Timer-based ability gating
//!
//! One gate per ability per actor. A gate that has never fired is open.

use serde::{Deserialize, Serialize};

/// Snapshot of a gate for HUD cooldown fills
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CooldownReading {
    /// Remaining / cooldown, 1.0 right after firing and 0.0 when ready
    pub fill: f32,
    /// Seconds until the gate opens
    pub remaining: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooldownGate {
    cooldown: f32,
    last_fired: Option<f32>,
}

impl CooldownGate {
    pub fn new(cooldown: f32) -> Self {
        Self {
            cooldown: cooldown.max(0.0),
            last_fired: None,
        }
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn last_fired(&self) -> Option<f32> {
        self.last_fired
    }

    /// True when `now >= last + cooldown` (always true for a zero cooldown)
    pub fn can_fire(&self, now: f32) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now >= last + self.cooldown,
        }
    }

    /// Record `now` as the last firing time
    pub fn fire(&mut self, now: f32) {
        self.last_fired = Some(now);
    }

    /// Fire if the gate is open
    pub fn try_fire(&mut self, now: f32) -> bool {
        if self.can_fire(now) {
            self.fire(now);
            true
        } else {
            false
        }
    }

    pub fn remaining(&self, now: f32) -> f32 {
        match self.last_fired {
            None => 0.0,
            Some(last) => (last + self.cooldown - now).max(0.0),
        }
    }

    pub fn reading(&self, now: f32) -> CooldownReading {
        let remaining = self.remaining(now);
        let fill = if self.cooldown > 0.0 {
            remaining / self.cooldown
        } else {
            0.0
        };
        CooldownReading { fill, remaining }
    }

    /// Forget the last firing time
    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}
