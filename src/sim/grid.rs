//! Enemy formations
//!
//! A grid owns its enemies outright: removing an enemy from `enemies` is how
//! it dies. The grid moves as a unit, bouncing between the side walls and
//! stepping down one row-height on every reversal.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::entities::EnemyProjectile;
use crate::consts::*;

/// Column count range for new grids (inclusive)
pub const MIN_COLUMNS: u32 = 5;
pub const MAX_COLUMNS: u32 = 10;

/// Most rows a grid may have: `min(4, floor(H / 150))`, at least 1
pub fn max_rows() -> u32 {
    ((WORLD_HEIGHT / 150.0).floor() as u32).clamp(1, 4)
}

/// A single enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Enemy {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            width: ENEMY_WIDTH,
            height: ENEMY_HEIGHT,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(self.width, self.height))
    }

    /// Shoot straight down from the lower-center point
    pub fn shoot(&self, speed: f32) -> EnemyProjectile {
        EnemyProjectile::new(
            Vec2::new(self.pos.x + self.width / 2.0, self.pos.y + self.height),
            Vec2::new(0.0, speed),
        )
    }
}

/// A rectangular formation of enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyGrid {
    /// Left edge of the formation's live extent
    pub pos: Vec2,
    pub vel: Vec2,
    pub enemies: Vec<Enemy>,
    /// Horizontal extent used for wall bounces
    pub width: f32,
}

impl EnemyGrid {
    /// Build a `columns` x `rows` formation at the origin. Counts outside the
    /// allowed ranges are clamped.
    pub fn with_layout(columns: u32, rows: u32, speed: f32) -> Self {
        let columns = columns.clamp(MIN_COLUMNS, MAX_COLUMNS);
        let rows = rows.clamp(1, max_rows());

        let mut enemies = Vec::with_capacity((columns * rows) as usize);
        for x in 0..columns {
            for y in 0..rows {
                enemies.push(Enemy::new(Vec2::new(
                    x as f32 * GRID_CELL,
                    y as f32 * GRID_CELL,
                )));
            }
        }

        Self {
            pos: Vec2::ZERO,
            vel: Vec2::new(speed, 0.0),
            enemies,
            width: columns as f32 * GRID_CELL,
        }
    }

    /// Build a formation with a random layout
    pub fn random<R: Rng + ?Sized>(rng: &mut R, speed: f32) -> Self {
        let columns = rng.random_range(MIN_COLUMNS..=MAX_COLUMNS);
        let rows = rng.random_range(1..=max_rows());
        Self::with_layout(columns, rows, speed)
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Move the formation origin one frame. The vertical component is a
    /// one-frame impulse; hitting a wall reverses direction and sets the step
    /// down. Returns the updated velocity, which is what the enemies move by.
    pub fn step(&mut self, step_down: f32) -> Vec2 {
        self.pos += self.vel;
        self.vel.y = 0.0;

        if self.pos.x + self.width >= WORLD_WIDTH || self.pos.x < 0.0 {
            self.vel.x = -self.vel.x;
            self.vel.y = step_down;
        }
        self.vel
    }

    /// Move every enemy by `displacement`
    pub fn shift_enemies(&mut self, displacement: Vec2) {
        for enemy in &mut self.enemies {
            enemy.pos += displacement;
        }
    }

    /// Pick a uniformly random enemy to fire
    pub fn pick_shooter<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Enemy> {
        if self.enemies.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.enemies.len());
        self.enemies.get(index)
    }

    /// Remove the enemies whose indices are flagged, then refit the extent.
    /// Returns the removed enemies in their original order.
    pub fn remove_flagged(&mut self, flagged: &[bool]) -> Vec<Enemy> {
        let mut removed = Vec::new();
        let mut index = 0;
        self.enemies.retain(|enemy| {
            let kill = flagged.get(index).copied().unwrap_or(false);
            index += 1;
            if kill {
                removed.push(enemy.clone());
            }
            !kill
        });
        if !removed.is_empty() {
            self.refit();
        }
        removed
    }

    /// Recompute left edge and width from the leftmost and rightmost survivors
    pub fn refit(&mut self) {
        let Some(first) = self.enemies.first() else {
            return;
        };
        let mut left = first.pos.x;
        let mut right = first.pos.x + first.width;
        for enemy in &self.enemies[1..] {
            left = left.min(enemy.pos.x);
            right = right.max(enemy.pos.x + enemy.width);
        }
        self.pos.x = left;
        self.width = right - left;
    }
}
