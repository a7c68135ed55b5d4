//! Shared test doubles for driving a `World` headlessly

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use siege_arena::GameConfig;
use siege_arena::sim::{CharacterKind, EffectKind, EffectSink, OpenGround, World};

/// Effect sink that keeps every request for later inspection
#[derive(Clone, Default)]
pub struct RecordingEffects {
    pub log: Rc<RefCell<Vec<(EffectKind, Vec2)>>>,
}

impl RecordingEffects {
    pub fn count(&self, kind: EffectKind) -> usize {
        self.log.borrow().iter().filter(|(k, _)| *k == kind).count()
    }
}

impl EffectSink for RecordingEffects {
    fn play_effect(&mut self, kind: EffectKind, position: Vec2, _facing: f32) {
        self.log.borrow_mut().push((kind, position));
    }
}

/// No waves, no loot: the test places every enemy itself
pub fn quiet_config(kind: CharacterKind) -> GameConfig {
    let mut config = GameConfig::default();
    config.spawn.auto_start = false;
    config.enemy.drop_chance = 0.0;
    config.player.kind = kind;
    config
}

pub fn world_with(config: GameConfig, ground: OpenGround) -> (World, RecordingEffects) {
    let effects = RecordingEffects::default();
    let world = World::new(config, 1234)
        .with_navigation(ground)
        .with_effects(effects.clone());
    (world, effects)
}
