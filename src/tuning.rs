//! Game balance values
//!
//! Every gameplay number the simulation uses that is not sprite geometry.
//! Loaded from JSON when a tuning file is supplied, otherwise defaults.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Lateral speed (units per frame)
    pub player_speed: f32,
    /// Visual bank angle while moving (radians)
    pub player_bank: f32,
    /// Lives at session start
    pub starting_lives: u8,
    /// Extra-life pickups never raise lives above this
    pub max_lives: u8,

    // === Shooting ===
    /// Player shot speed (units per frame, upward)
    pub projectile_speed: f32,
    /// Horizontal offset of each shot from center in double-fire mode
    pub double_fire_offset: f32,
    /// Repeat cadence while fire is held (ms)
    pub autofire_interval_ms: f32,

    // === Enemies ===
    /// Grid lateral speed (units per frame)
    pub grid_speed: f32,
    /// One-frame vertical impulse applied after each reversal
    pub grid_step_down: f32,
    /// A random enemy of each grid fires every N frames
    pub enemy_fire_every: u32,
    /// Enemy shot speed (units per frame, downward)
    pub enemy_projectile_speed: f32,
    /// Points per kill
    pub kill_score: u64,
    /// Grid spawn interval range in frames, `[min, max)`
    pub grid_spawn_min_frames: u32,
    pub grid_spawn_max_frames: u32,

    // === Power-ups ===
    /// Pickup fall speed (units per frame)
    pub power_up_speed: f32,
    /// Power-up spawn interval range in ms, `[min, max)`
    pub power_up_spawn_min_ms: f32,
    pub power_up_spawn_max_ms: f32,
    pub shield_duration_ms: f32,
    pub double_fire_duration_ms: f32,

    // === Particles ===
    /// Ambient stars created at session start
    pub star_count: usize,
    /// Particles per impact burst
    pub burst_count: usize,
    /// Opacity lost per frame by fading particles
    pub particle_fade_step: f32,

    // === Game over ===
    /// Delay between losing the last life and the session ending (ms)
    pub game_over_delay_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 10.0,
            player_bank: 0.15,
            starting_lives: 3,
            max_lives: 3,

            projectile_speed: 10.0,
            double_fire_offset: 10.0,
            autofire_interval_ms: 200.0,

            grid_speed: 10.0,
            grid_step_down: 30.0,
            enemy_fire_every: 50,
            enemy_projectile_speed: 5.0,
            kill_score: 100,
            grid_spawn_min_frames: 300,
            grid_spawn_max_frames: 800,

            power_up_speed: 2.0,
            power_up_spawn_min_ms: 8000.0,
            power_up_spawn_max_ms: 12000.0,
            shield_duration_ms: 7000.0,
            double_fire_duration_ms: 10000.0,

            star_count: 100,
            burst_count: 15,
            particle_fade_step: 0.01,

            game_over_delay_ms: 1000.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("invalid tuning JSON")?;
        Ok(tuning.sanitized())
    }

    /// Read tuning from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Read tuning from a JSON file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning: {:#}", e);
                Self::default()
            }
        }
    }

    /// Clamp inconsistent values into something the simulation can run with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for (name, value, fallback) in [
            ("player_speed", &mut self.player_speed, defaults.player_speed),
            ("player_bank", &mut self.player_bank, defaults.player_bank),
            ("projectile_speed", &mut self.projectile_speed, defaults.projectile_speed),
            ("double_fire_offset", &mut self.double_fire_offset, defaults.double_fire_offset),
            ("autofire_interval_ms", &mut self.autofire_interval_ms, defaults.autofire_interval_ms),
            ("grid_speed", &mut self.grid_speed, defaults.grid_speed),
            ("grid_step_down", &mut self.grid_step_down, defaults.grid_step_down),
            (
                "enemy_projectile_speed",
                &mut self.enemy_projectile_speed,
                defaults.enemy_projectile_speed,
            ),
            ("power_up_speed", &mut self.power_up_speed, defaults.power_up_speed),
            (
                "power_up_spawn_min_ms",
                &mut self.power_up_spawn_min_ms,
                defaults.power_up_spawn_min_ms,
            ),
            (
                "power_up_spawn_max_ms",
                &mut self.power_up_spawn_max_ms,
                defaults.power_up_spawn_max_ms,
            ),
            ("shield_duration_ms", &mut self.shield_duration_ms, defaults.shield_duration_ms),
            (
                "double_fire_duration_ms",
                &mut self.double_fire_duration_ms,
                defaults.double_fire_duration_ms,
            ),
            ("particle_fade_step", &mut self.particle_fade_step, defaults.particle_fade_step),
            ("game_over_delay_ms", &mut self.game_over_delay_ms, defaults.game_over_delay_ms),
        ] {
            if !value.is_finite() {
                log::warn!("Tuning {} is not finite, using {}", name, fallback);
                *value = fallback;
            }
        }

        self.max_lives = self.max_lives.max(1);
        self.starting_lives = self.starting_lives.clamp(1, self.max_lives);
        self.enemy_fire_every = self.enemy_fire_every.max(1);
        self.autofire_interval_ms = self.autofire_interval_ms.max(1.0);

        self.grid_spawn_min_frames = self.grid_spawn_min_frames.clamp(1, u32::MAX - 1);
        if self.grid_spawn_max_frames <= self.grid_spawn_min_frames {
            self.grid_spawn_max_frames = self.grid_spawn_min_frames.saturating_add(1);
        }

        self.power_up_spawn_min_ms = self.power_up_spawn_min_ms.max(1.0);
        if self.power_up_spawn_max_ms <= self.power_up_spawn_min_ms {
            self.power_up_spawn_max_ms = self.power_up_spawn_min_ms + 1.0;
        }

        self.particle_fade_step = self.particle_fade_step.max(f32::EPSILON);
        self.game_over_delay_ms = self.game_over_delay_ms.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_survive_sanitize() {
        assert_eq!(Tuning::default().sanitized(), Tuning::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "grid_speed": 4.0, "starting_lives": 2 }"#).unwrap();
        assert_eq!(tuning.grid_speed, 4.0);
        assert_eq!(tuning.starting_lives, 2);
        assert_eq!(tuning.shield_duration_ms, 7000.0);
    }

    #[test]
    fn test_sanitize_repairs_ranges() {
        let tuning = Tuning {
            grid_spawn_min_frames: 500,
            grid_spawn_max_frames: 100,
            enemy_fire_every: 0,
            starting_lives: 9,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.grid_spawn_max_frames, 501);
        assert_eq!(tuning.enemy_fire_every, 1);
        assert_eq!(tuning.starting_lives, tuning.max_lives);
    }

    #[test]
    fn test_sanitize_handles_extreme_spawn_frames() {
        let tuning = Tuning::from_json(r#"{ "grid_spawn_min_frames": 4294967295 }"#).unwrap();
        assert_eq!(tuning.grid_spawn_min_frames, u32::MAX - 1);
        assert_eq!(tuning.grid_spawn_max_frames, u32::MAX);
    }

    #[test]
    fn test_sanitize_replaces_non_finite_values() {
        // 1e39 overflows f32 to infinity
        let tuning =
            Tuning::from_json(r#"{ "power_up_spawn_max_ms": 1e39, "grid_speed": -1e39 }"#).unwrap();
        assert_eq!(tuning.power_up_spawn_max_ms, 12000.0);
        assert_eq!(tuning.grid_speed, 10.0);

        let tuning = Tuning {
            particle_fade_step: f32::NAN,
            game_over_delay_ms: f32::INFINITY,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.particle_fade_step, 0.01);
        assert_eq!(tuning.game_over_delay_ms, 1000.0);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default(Path::new("/definitely/not/here.json"));
        assert_eq!(tuning, Tuning::default());
    }
}
