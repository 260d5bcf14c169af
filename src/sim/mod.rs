//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame motion, `dt` only drives clocks
//! - Seeded RNG only
//! - Stable iteration order (insertion order, mark-and-compact removal)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod grid;
pub mod kinematics;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Rect, circle_overlaps_rect, rects_overlap};
pub use entities::{
    EnemyProjectile, Particle, ParticleColor, Player, PowerUp, PowerUpKind, Projectile,
    TimedEffect,
};
pub use grid::{Enemy, EnemyGrid};
pub use kinematics::Kinematic;
pub use snapshot::{Snapshot, Sprite, SpriteKind};
pub use state::{GameEvent, GamePhase, GameSession};
pub use tick::{FrameResult, TickInput, tick};
