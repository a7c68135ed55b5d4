//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulation time only advances through the tick functions
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies (those sit behind `services`)

pub mod clock;
pub mod cooldown;
pub mod enemy;
pub mod explosive;
pub mod health;
pub mod observer;
pub mod pickup;
pub mod player;
pub mod progression;
pub mod projectile;
pub mod scheduler;
pub mod services;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod trap;

pub use clock::Clock;
pub use cooldown::{CooldownGate, CooldownReading};
pub use enemy::{AiState, Difficulty, Enemy, EnemyIntent, EnemyRoster, TargetInfo};
pub use explosive::{Explosive, ExplosiveSpec};
pub use health::{DamageOutcome, Health, area_damage, falloff_multiplier};
pub use observer::{Observers, SubscriptionId};
pub use pickup::{Pickup, PickupKind};
pub use player::{
    AbilityOutcome, AbilitySlot, BurstShot, CharacterKind, CooldownState, Kit, PlacementKind,
    Player,
};
pub use progression::{GamePhase, Progression, ProgressionEvent};
pub use projectile::{Contact, ContactResponse, Projectile, ShotSpec};
pub use scheduler::{Scheduler, TimerHandle};
pub use services::{
    EffectKind, EffectSink, LogEffects, Navigation, NullEffects, OpenGround, SpatialQuery,
};
pub use spawner::{SpawnDirection, SpawnDirector, WavePlan};
pub use state::{EntityId, Scheduled, World};
pub use tick::{TickInput, fixed_tick, frame, resolve_input, tick};
pub use trap::{Trap, TrapSpec};
