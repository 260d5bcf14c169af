//! Per-frame simulation step
//!
//! Entities move in fixed per-frame steps; only clocks (effects, spawn timers,
//! autofire, the terminal delay) consume the tick's `dt`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{circle_overlaps_rect, rects_overlap};
use super::entities::PowerUpKind;
use super::kinematics::Kinematic;
use super::state::{GameEvent, GamePhase, GameSession};
use crate::consts::*;

/// Normalized player intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Single shot (edge-triggered by the driver)
    pub fire: bool,
    /// Continuous fire while held
    pub fire_held: bool,
}

/// Outcome of one tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameResult {
    pub events: Vec<GameEvent>,
    pub score: u64,
    pub lives: u8,
    pub over: bool,
    pub active: bool,
}

impl GameSession {
    /// Advance one frame, see [`tick`]
    pub fn tick(&mut self, input: &TickInput, dt_ms: f32) -> FrameResult {
        tick(self, input, dt_ms)
    }

    fn frame_result(&mut self) -> FrameResult {
        FrameResult {
            events: std::mem::take(&mut self.pending),
            score: self.score,
            lives: self.lives,
            over: self.over(),
            active: self.active(),
        }
    }
}

/// Advance the session by one frame. Does nothing once the session is no
/// longer active.
pub fn tick(session: &mut GameSession, input: &TickInput, dt_ms: f32) -> FrameResult {
    if !session.active() {
        return session.frame_result();
    }

    let dt = if dt_ms.is_finite() {
        dt_ms.max(0.0) as f64
    } else {
        0.0
    };
    session.now_ms += dt;

    if let GamePhase::Dying { since_ms } = session.phase {
        if session.now_ms - since_ms >= session.tuning.game_over_delay_ms as f64 {
            session.finish();
            return session.frame_result();
        }
    }

    update_player(session, input, dt);
    expire_effects(session);
    update_power_ups(session);
    update_particles(session);
    update_enemy_projectiles(session);
    update_projectiles(session);
    update_grids(session);
    schedule_grids(session);
    schedule_power_ups(session, dt);

    session.frame_result()
}

fn update_player(session: &mut GameSession, input: &TickInput, dt: f64) {
    if session.over() {
        session.player.vel.x = 0.0;
        session.player.rotation = 0.0;
        session.autofire_ms = 0.0;
        session.fire_was_held = false;
        return;
    }

    let speed = session.tuning.player_speed;
    let bank = session.tuning.player_bank;
    let player = &mut session.player;
    player.steer(input.move_left, input.move_right, speed, bank);
    player.advance();
    player.clamp_to_world();

    if input.fire {
        session.fire();
    }

    if input.fire_held {
        if !session.fire_was_held {
            // Pressing fire shoots right away; the repeat starts from here
            if !input.fire {
                session.fire();
            }
            session.autofire_ms = 0.0;
        } else {
            let interval = session.tuning.autofire_interval_ms as f64;
            session.autofire_ms += dt;
            if session.autofire_ms >= interval {
                session.fire();
                session.autofire_ms = (session.autofire_ms - interval) % interval;
            }
        }
    } else {
        session.autofire_ms = 0.0;
    }
    session.fire_was_held = input.fire_held;
}

fn expire_effects(session: &mut GameSession) {
    let now = session.now_ms;
    if session.player.shield.expire(now) {
        session.emit(GameEvent::EffectExpired {
            kind: PowerUpKind::Shield,
        });
    }
    if session.player.double_fire.expire(now) {
        session.emit(GameEvent::EffectExpired {
            kind: PowerUpKind::DoubleFire,
        });
    }
}

fn update_power_ups(session: &mut GameSession) {
    let player_rect = session.player.rect();
    let can_collect = !session.over();

    let mut collected = Vec::new();
    session.power_ups.retain_mut(|power_up| {
        power_up.advance();
        if power_up.is_off_screen() {
            return false;
        }
        if can_collect && rects_overlap(&power_up.rect(), &player_rect) {
            collected.push(power_up.kind);
            return false;
        }
        true
    });

    for kind in collected {
        session.apply_power_up(kind);
    }
}

fn update_particles(session: &mut GameSession) {
    let fade_step = session.tuning.particle_fade_step;
    let rng = &mut session.rng;

    session.particles.retain_mut(|particle| {
        particle.advance();
        if particle.fades {
            particle.opacity -= fade_step;
            return particle.is_visible();
        }
        // Ambient stars wrap back to the top
        if particle.pos.y - particle.radius >= WORLD_HEIGHT {
            particle.pos.x = rng.random_range(0.0..WORLD_WIDTH);
            particle.pos.y = -particle.radius;
        }
        true
    });
}

fn update_enemy_projectiles(session: &mut GameSession) {
    let player_rect = session.player.rect();
    let shielded = session.player.shield.is_active();
    let mut lives_left = if session.over() { 0 } else { session.lives };
    let mut hits = 0;
    let mut absorbed = 0;

    session.enemy_projectiles.retain_mut(|shot| {
        shot.advance();
        if shot.is_off_screen() {
            return false;
        }
        if lives_left == 0 || !rects_overlap(&shot.rect(), &player_rect) {
            return true;
        }
        if shielded {
            absorbed += 1;
        } else {
            hits += 1;
            lives_left -= 1;
        }
        false
    });

    for _ in 0..absorbed {
        session.emit(GameEvent::ShieldAbsorbed);
    }
    for _ in 0..hits {
        session.damage_player();
    }
}

fn update_projectiles(session: &mut GameSession) {
    session.projectiles.retain_mut(|shot| {
        shot.advance();
        !shot.is_off_screen()
    });
}

fn update_grids(session: &mut GameSession) {
    let fire_now = session.frame % session.tuning.enemy_fire_every == 0;
    let step_down = session.tuning.grid_step_down;
    let shot_speed = session.tuning.enemy_projectile_speed;

    // Mark-and-compact: a shot can only be spent once per frame
    let mut spent = vec![false; session.projectiles.len()];
    let mut kills = Vec::new();

    for grid in session.grids.iter_mut() {
        let displacement = grid.step(step_down);

        if fire_now {
            if let Some(shooter) = grid.pick_shooter(&mut session.rng) {
                session.enemy_projectiles.push(shooter.shoot(shot_speed));
            }
        }
        grid.shift_enemies(displacement);

        let mut flagged = vec![false; grid.enemies.len()];
        for (i, enemy) in grid.enemies.iter().enumerate() {
            let rect = enemy.rect();
            let hit = (0..session.projectiles.len()).find(|&j| {
                let shot = &session.projectiles[j];
                !spent[j] && circle_overlaps_rect(shot.pos, shot.radius, &rect)
            });
            if let Some(j) = hit {
                spent[j] = true;
                flagged[i] = true;
            }
        }

        for enemy in grid.remove_flagged(&flagged) {
            kills.push(enemy.rect().center());
        }
    }

    let mut index = 0;
    session.projectiles.retain(|_| {
        let keep = !spent[index];
        index += 1;
        keep
    });
    session.grids.retain(|grid| !grid.is_empty());

    for pos in kills {
        session.record_kill(pos);
    }
}

fn schedule_grids(session: &mut GameSession) {
    session.frame += 1;
    if session.frame >= session.grid_spawn_interval {
        session.spawn_grid();
        session.grid_spawn_interval = session.roll_grid_interval();
        session.frame = 0;
    }
}

fn schedule_power_ups(session: &mut GameSession, dt: f64) {
    session.power_up_timer_ms += dt;
    if session.power_up_timer_ms >= session.power_up_interval_ms {
        session.spawn_power_up();
        session.power_up_timer_ms = 0.0;
        session.power_up_interval_ms = session.roll_power_up_interval();
    }
}
