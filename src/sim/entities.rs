//! Player, shots, particles and pickups

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::kinematics::impl_kinematic;
use crate::consts::*;

/// A timed power-up effect (shield or double-fire)
///
/// Active while an expiry is recorded. The session clears the expiry once the
/// clock reaches it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedEffect {
    expires_at_ms: Option<f64>,
}

impl TimedEffect {
    pub fn is_active(&self) -> bool {
        self.expires_at_ms.is_some()
    }

    pub fn expires_at_ms(&self) -> Option<f64> {
        self.expires_at_ms
    }

    /// Grant `duration_ms` of effect. A still-running effect is extended by the
    /// full duration instead of being reset.
    pub fn grant(&mut self, now_ms: f64, duration_ms: f64) {
        let expiry = match self.expires_at_ms {
            Some(current) if now_ms < current => current + duration_ms,
            _ => now_ms + duration_ms,
        };
        self.expires_at_ms = Some(expiry);
    }

    /// Clear the effect if it has run out. Returns true when it just expired.
    pub fn expire(&mut self, now_ms: f64) -> bool {
        match self.expires_at_ms {
            Some(expiry) if now_ms >= expiry => {
                self.expires_at_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Remaining time, zero when inactive
    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        self.expires_at_ms
            .map(|expiry| (expiry - now_ms).max(0.0))
            .unwrap_or(0.0)
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Visual bank angle (radians), no effect on motion
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    /// 1.0 while alive, 0.0 once destroyed
    pub opacity: f32,
    pub shield: TimedEffect,
    pub double_fire: TimedEffect,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                WORLD_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                WORLD_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
            ),
            vel: Vec2::ZERO,
            rotation: 0.0,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            opacity: 1.0,
            shield: TimedEffect::default(),
            double_fire: TimedEffect::default(),
        }
    }
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(self.width, self.height))
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Rightmost x the ship may occupy
    pub fn max_x(&self) -> f32 {
        (WORLD_WIDTH - self.width).max(0.0)
    }

    /// Set velocity and bank from the movement intents
    pub fn steer(&mut self, move_left: bool, move_right: bool, speed: f32, bank: f32) {
        if move_left && self.pos.x > 0.0 {
            self.vel.x = -speed;
            self.rotation = -bank;
        } else if move_right && self.pos.x + self.width < WORLD_WIDTH {
            self.vel.x = speed;
            self.rotation = bank;
        } else {
            self.vel.x = 0.0;
            self.rotation = 0.0;
        }
    }

    /// Keep the ship inside the world horizontally
    pub fn clamp_to_world(&mut self) {
        self.pos.x = self.pos.x.clamp(0.0, self.max_x());
    }

    /// Spawn points for one fire action
    pub fn muzzles(&self, double_offset: f32) -> Vec<Vec2> {
        let x = self.pos.x + self.width / 2.0;
        if self.double_fire.is_active() {
            vec![
                Vec2::new(x - double_offset, self.pos.y),
                Vec2::new(x + double_offset, self.pos.y),
            ]
        } else {
            vec![Vec2::new(x, self.pos.y)]
        }
    }
}

/// A player shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: PROJECTILE_RADIUS,
        }
    }

    /// Fully above the top edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.y + self.radius <= 0.0
    }
}

/// An enemy shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyProjectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
}

impl EnemyProjectile {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            width: ENEMY_PROJECTILE_WIDTH,
            height: ENEMY_PROJECTILE_HEIGHT,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(self.width, self.height))
    }

    /// Past the bottom edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.y > WORLD_HEIGHT
    }
}

/// Color tag for particle rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    /// Starfield and player impact sparks
    White,
    /// Enemy explosion
    Purple,
}

/// A decorative particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: ParticleColor,
    /// Fading particles die out; non-fading ones are the ambient starfield
    pub fades: bool,
    pub opacity: f32,
}

impl Particle {
    /// Still worth keeping around
    pub fn is_visible(&self) -> bool {
        !self.fades || self.opacity > PARTICLE_VISIBILITY_THRESHOLD
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    ExtraLife,
    Shield,
    DoubleFire,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::ExtraLife,
        PowerUpKind::Shield,
        PowerUpKind::DoubleFire,
    ];
}

/// A falling collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2, fall_speed: f32) -> Self {
        Self {
            kind,
            pos,
            vel: Vec2::new(0.0, fall_speed),
            width: POWER_UP_SIZE,
            height: POWER_UP_SIZE,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(self.width, self.height))
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.y > WORLD_HEIGHT
    }
}

impl_kinematic!(Player, Projectile, EnemyProjectile, Particle, PowerUp);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::kinematics::Kinematic;

    #[test]
    fn test_timed_effect_fresh_grant() {
        let mut effect = TimedEffect::default();
        assert!(!effect.is_active());
        effect.grant(1000.0, 7000.0);
        assert_eq!(effect.expires_at_ms(), Some(8000.0));
    }

    #[test]
    fn test_timed_effect_stacks_full_duration() {
        let mut effect = TimedEffect::default();
        effect.grant(0.0, 7000.0);
        effect.grant(5000.0, 7000.0);
        // 2000 ms left plus a fresh 7000
        assert_eq!(effect.expires_at_ms(), Some(14000.0));
        assert_eq!(effect.remaining_ms(5000.0), 9000.0);
    }

    #[test]
    fn test_timed_effect_expires_at_boundary() {
        let mut effect = TimedEffect::default();
        effect.grant(0.0, 100.0);
        assert!(!effect.expire(99.9));
        assert!(effect.is_active());
        assert!(effect.expire(100.0));
        assert!(!effect.is_active());
    }

    #[test]
    fn test_player_steer_stops_at_walls() {
        let mut player = Player::default();
        player.pos.x = 0.0;
        player.steer(true, false, 10.0, 0.15);
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.rotation, 0.0);

        player.pos.x = player.max_x();
        player.steer(false, true, 10.0, 0.15);
        assert_eq!(player.vel.x, 0.0);

        player.steer(true, false, 10.0, 0.15);
        assert_eq!(player.vel.x, -10.0);
        assert_eq!(player.rotation, -0.15);
    }

    #[test]
    fn test_player_muzzles() {
        let mut player = Player::default();
        let center = player.pos.x + player.width / 2.0;
        assert_eq!(player.muzzles(10.0), vec![Vec2::new(center, player.pos.y)]);

        player.double_fire.grant(0.0, 10000.0);
        let muzzles = player.muzzles(10.0);
        assert_eq!(muzzles.len(), 2);
        assert_eq!(muzzles[0].x, center - 10.0);
        assert_eq!(muzzles[1].x, center + 10.0);
    }

    #[test]
    fn test_advance_applies_velocity() {
        let mut shot = Projectile::new(Vec2::new(10.0, 20.0), Vec2::new(0.0, -10.0));
        shot.advance();
        assert_eq!(shot.position(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_fading_particle_visibility() {
        let mut particle = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: 1.0,
            color: ParticleColor::Purple,
            fades: true,
            opacity: 0.11,
        };
        assert!(particle.is_visible());
        particle.opacity = 0.1;
        assert!(!particle.is_visible());
        particle.fades = false;
        assert!(particle.is_visible());
    }
}
