//! Session progression: score, level, lives, player health and pause
//!
//! This is the single writer for session state. Everything else reports to
//! it through the operations below and listens for [`ProgressionEvent`]s.

use serde::{Deserialize, Serialize};

use super::health::{DamageOutcome, Health};
use super::observer::{Observers, SubscriptionId};
use crate::config::ProgressionConfig;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation clock frozen
    Paused,
    /// Run ended, waits for an explicit restart
    GameOver,
}

/// Change notifications for HUD and other listeners
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressionEvent {
    ScoreChanged(u32),
    HealthChanged { current: f32, max: f32 },
    LivesChanged(u32),
    LevelChanged(u32),
    PauseChanged(bool),
    GameOver,
}

#[derive(Debug)]
pub struct Progression {
    config: ProgressionConfig,
    score: u32,
    level: u32,
    lives: u32,
    health: Health,
    phase: GamePhase,
    observers: Observers<ProgressionEvent>,
}

impl Progression {
    pub fn new(config: ProgressionConfig) -> Self {
        Self {
            score: 0,
            level: 1,
            lives: config.starting_lives,
            health: Health::new(config.max_health),
            phase: GamePhase::Playing,
            observers: Observers::default(),
            config,
        }
    }

    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&ProgressionEvent) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn health(&self) -> f32 {
        self.health.current()
    }

    pub fn max_health(&self) -> f32 {
        self.health.max()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Reset every counter and return to `Playing`; observers get every value
    pub fn initialize(&mut self) {
        self.score = 0;
        self.level = 1;
        self.lives = self.config.starting_lives;
        self.health = Health::new(self.config.max_health);
        self.phase = GamePhase::Playing;

        self.observers.emit(&ProgressionEvent::ScoreChanged(self.score));
        self.emit_health();
        self.observers.emit(&ProgressionEvent::LivesChanged(self.lives));
        self.observers.emit(&ProgressionEvent::LevelChanged(self.level));
    }

    pub fn restart(&mut self) {
        log::info!("Restarting session");
        self.initialize();
    }

    /// Add points and level up once the level threshold is reached
    pub fn add_score(&mut self, points: u32) {
        if self.is_game_over() {
            return;
        }
        self.score = self.score.saturating_add(points);
        self.observers.emit(&ProgressionEvent::ScoreChanged(self.score));

        if self.score >= self.level_threshold() {
            self.level_up();
        }
    }

    /// Score needed to leave the current level
    pub fn level_threshold(&self) -> u32 {
        self.level.saturating_mul(self.config.points_per_level)
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.observers.emit(&ProgressionEvent::LevelChanged(self.level));
        log::info!("Level up! Now level {}", self.level);

        self.health.revive();
        self.emit_health();
    }

    /// Damage the player; reaching zero health costs a life
    pub fn take_damage(&mut self, amount: f32) {
        if self.is_game_over() {
            return;
        }
        let outcome = self.health.apply_damage(amount);
        if outcome == DamageOutcome::Ignored {
            return;
        }
        self.emit_health();
        if outcome == DamageOutcome::Killed {
            self.lose_life();
        }
    }

    pub fn heal(&mut self, amount: f32) {
        if self.is_game_over() {
            return;
        }
        self.health.heal(amount);
        self.emit_health();
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.observers.emit(&ProgressionEvent::LivesChanged(self.lives));

        if self.lives == 0 {
            self.game_over();
        } else {
            self.health.revive();
            self.emit_health();
            log::info!("Life lost! {} remaining", self.lives);
        }
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.observers.emit(&ProgressionEvent::GameOver);
        log::info!(
            "Game over at level {} with score {}",
            self.level,
            self.score
        );
    }

    /// Flip between `Playing` and `Paused`. Ignored after game over.
    pub fn toggle_pause(&mut self) -> GamePhase {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::GameOver => return GamePhase::GameOver,
        };
        self.observers
            .emit(&ProgressionEvent::PauseChanged(self.is_paused()));
        self.phase
    }

    /// Enemy damage scaling: +20% per level above 1
    pub fn enemy_damage_multiplier(&self) -> f32 {
        1.0 + (self.level - 1) as f32 * 0.2
    }

    /// Two more enemies per wave for each level above 1
    pub fn enemy_spawn_count(&self, base_count: u32) -> u32 {
        base_count + (self.level - 1) * 2
    }

    /// Waves come 10% faster per level, never more often than once a second
    pub fn spawn_interval(&self, base_interval: f32) -> f32 {
        let interval = base_interval * 0.9f32.powi(self.level as i32 - 1);
        interval.max(1.0)
    }

    fn emit_health(&mut self) {
        self.observers.emit(&ProgressionEvent::HealthChanged {
            current: self.health.current(),
            max: self.health.max(),
        });
    }
}
