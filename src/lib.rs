//! Grid Defender - simulation core for a grid-invader arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game session)
//! - `hooks`: Notification hooks for audio/UI collaborators
//! - `highscores`: Injected high score storage
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod hooks;
pub mod sim;
pub mod tuning;

pub use highscores::{HIGH_SCORE_KEY, HighScoreStore, JsonFileStore, MemoryStore};
pub use hooks::{GameHooks, LogHooks, NoHooks};
pub use sim::{FrameResult, GameEvent, GameSession, TickInput, tick};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical world width (independent of display scaling)
    pub const WORLD_WIDTH: f32 = 1024.0;
    /// Logical world height
    pub const WORLD_HEIGHT: f32 = 576.0;

    /// Reference cadence: one simulation step at 60 Hz, in milliseconds
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Player ship sprite dimensions
    pub const PLAYER_WIDTH: f32 = 64.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    /// Gap between the ship's bottom edge and the bottom of the world
    pub const PLAYER_BOTTOM_MARGIN: f32 = 40.0;

    /// Enemy sprite dimensions (scale 1.0)
    pub const ENEMY_WIDTH: f32 = 30.0;
    pub const ENEMY_HEIGHT: f32 = 30.0;
    /// Grid cell pitch, both axes
    pub const GRID_CELL: f32 = 30.0;

    /// Player shots are circles
    pub const PROJECTILE_RADIUS: f32 = 4.0;

    /// Enemy shots are boxes
    pub const ENEMY_PROJECTILE_WIDTH: f32 = 5.0;
    pub const ENEMY_PROJECTILE_HEIGHT: f32 = 17.0;

    /// Power-up pickup dimensions
    pub const POWER_UP_SIZE: f32 = 30.0;

    /// Opacity at or below which a fading particle is culled
    pub const PARTICLE_VISIBILITY_THRESHOLD: f32 = 0.1;
}
