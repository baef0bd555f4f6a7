//! Frame-stepped simulation module
//!
//! All gameplay logic lives here:
//! - One `update` pass per frame, no background work
//! - Timers are polled against the frame's wall-clock sample
//! - Seeded RNG only
//! - Entities are marked during a pass and removed afterwards
//! - No rendering or platform dependencies (drawing goes through `Canvas`)

pub mod ai;
pub mod base;
pub mod bonus;
pub mod collision;
pub mod effects;
pub mod field;
pub mod geometry;
pub mod grid;
pub mod projectile;
pub mod state;
pub mod tank;
pub mod tick;
pub mod timer;

/// Identity of an actor (tank, projectile, bonus) within one session
pub type ActorId = u32;

/// Occupancy claimant reserved for the player's base
pub const BASE_ID: ActorId = 0;

pub use ai::{AiIntent, Enemy, EnemyFleet, SpawnPoint, TankAi};
pub use base::{Base, FieldProtector, ProtectionState};
pub use bonus::{Bonus, BonusEffect, BonusKind};
pub use effects::{Explosion, ScorePopup};
pub use field::{Cell, Field};
pub use geometry::{Direction, Rect};
pub use grid::{CellSpan, DiscreteMap, OccupancyMap};
pub use projectile::{Power, Projectile};
pub use state::Game;
pub use tank::{Fraction, Tank, TankColor, TankType};
pub use tick::TickInput;
pub use timer::{Animator, Timer};
