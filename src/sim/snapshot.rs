//! Read-only view of a session for renderers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::entities::{ParticleColor, PowerUpKind};
use super::state::GameSession;

/// What to draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpriteKind {
    Player { shielded: bool, double_fire: bool },
    Projectile,
    EnemyProjectile,
    Enemy,
    PowerUp(PowerUpKind),
    Particle(ParticleColor),
}

/// One drawable entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub rect: Rect,
    pub opacity: f32,
    pub rotation: f32,
}

/// Everything a frame needs to be drawn, back to front
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u64,
    pub lives: u8,
    pub over: bool,
    pub active: bool,
    pub sprites: Vec<Sprite>,
}

impl GameSession {
    pub fn snapshot(&self) -> Snapshot {
        let mut sprites = Vec::with_capacity(
            self.particles.len()
                + self.projectiles.len()
                + self.enemy_projectiles.len()
                + self.power_ups.len()
                + self.grids.iter().map(|g| g.enemies.len()).sum::<usize>()
                + 1,
        );

        for particle in &self.particles {
            let r = particle.radius;
            sprites.push(Sprite {
                kind: SpriteKind::Particle(particle.color),
                rect: Rect::new(particle.pos - Vec2::splat(r), Vec2::splat(r * 2.0)),
                opacity: particle.opacity,
                rotation: 0.0,
            });
        }

        sprites.push(Sprite {
            kind: SpriteKind::Player {
                shielded: self.player.shield.is_active(),
                double_fire: self.player.double_fire.is_active(),
            },
            rect: self.player.rect(),
            opacity: self.player.opacity,
            rotation: self.player.rotation,
        });

        for shot in &self.projectiles {
            let r = shot.radius;
            sprites.push(Sprite {
                kind: SpriteKind::Projectile,
                rect: Rect::new(shot.pos - Vec2::splat(r), Vec2::splat(r * 2.0)),
                opacity: 1.0,
                rotation: 0.0,
            });
        }

        for enemy in self.grids.iter().flat_map(|g| g.enemies.iter()) {
            sprites.push(Sprite {
                kind: SpriteKind::Enemy,
                rect: enemy.rect(),
                opacity: 1.0,
                rotation: 0.0,
            });
        }

        for shot in &self.enemy_projectiles {
            sprites.push(Sprite {
                kind: SpriteKind::EnemyProjectile,
                rect: shot.rect(),
                opacity: 1.0,
                rotation: 0.0,
            });
        }

        for power_up in &self.power_ups {
            sprites.push(Sprite {
                kind: SpriteKind::PowerUp(power_up.kind),
                rect: power_up.rect(),
                opacity: 1.0,
                rotation: 0.0,
            });
        }

        Snapshot {
            score: self.score,
            lives: self.lives,
            over: self.over(),
            active: self.active(),
            sprites,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts_every_entity() {
        let session = GameSession::new(Some(11));
        let snapshot = session.snapshot();
        let enemies: usize = session.grids.iter().map(|g| g.enemies.len()).sum();
        assert_eq!(snapshot.sprites.len(), session.particles.len() + enemies + 1);
        assert_eq!(
            snapshot
                .sprites
                .iter()
                .filter(|s| matches!(s.kind, SpriteKind::Player { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let session = GameSession::new(Some(12));
        let json = serde_json::to_string(&session.snapshot()).unwrap();
        assert!(json.contains("\"lives\":3"));
    }
}
