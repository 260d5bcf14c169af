//! Game session state
//!
//! `GameSession` is the single owner of everything the simulation mutates.
//! Only `tick` (and the helpers it calls) changes it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{
    EnemyProjectile, Particle, ParticleColor, Player, PowerUp, PowerUpKind, Projectile,
};
use super::grid::EnemyGrid;
use crate::consts::*;
use crate::highscores::{HIGH_SCORE_KEY, HighScoreStore, MemoryStore, record_if_higher};
use crate::hooks::{GameHooks, NoHooks};
use crate::tuning::Tuning;

/// Life cycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal play
    Active,
    /// Last life lost; waiting out the terminal delay
    Dying { since_ms: f64 },
    /// Session finished, ticks are ignored
    Over,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fire action spawned `shots` projectiles
    Shot { shots: usize },
    /// Unshielded hit
    Damaged { lives_left: u8 },
    /// Enemy shot stopped by the shield
    ShieldAbsorbed,
    EnemyKilled { pos: Vec2 },
    PowerUpCollected { kind: PowerUpKind },
    EffectExpired { kind: PowerUpKind },
    GridSpawned { enemies: usize },
    PowerUpSpawned { kind: PowerUpKind },
    /// Last life lost
    GameOver { score: u64 },
    /// Terminal delay elapsed
    SessionEnded {
        final_score: u64,
        high_score: u64,
        new_record: bool,
    },
}

/// Complete game session
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Sanitized once at construction
    pub(crate) tuning: Tuning,
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
    /// Session clock, advanced by each tick's dt
    pub now_ms: f64,
    /// Frames since the last grid spawn
    pub frame: u32,
    /// Frames between the last grid spawn and the next
    pub grid_spawn_interval: u32,
    pub power_up_timer_ms: f64,
    pub power_up_interval_ms: f64,
    /// Time accumulated toward the next held-fire shot
    pub autofire_ms: f64,
    pub(crate) fire_was_held: bool,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<EnemyProjectile>,
    /// Live grids, never empty ones
    pub grids: Vec<EnemyGrid>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    /// Events not yet handed out in a `FrameResult`
    pub(crate) pending: Vec<GameEvent>,
    hooks: Box<dyn GameHooks>,
    store: Box<dyn HighScoreStore>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("seed", &self.seed)
            .field("score", &self.score)
            .field("lives", &self.lives)
            .field("phase", &self.phase)
            .field("now_ms", &self.now_ms)
            .field("grids", &self.grids.len())
            .field("projectiles", &self.projectiles.len())
            .field("enemy_projectiles", &self.enemy_projectiles.len())
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Start a session with default tuning. Without a seed one is drawn at random.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: Option<u64>, tuning: Tuning) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        let mut session = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning: tuning.sanitized(),
            score: 0,
            lives: 0,
            phase: GamePhase::Active,
            now_ms: 0.0,
            frame: 0,
            grid_spawn_interval: 0,
            power_up_timer_ms: 0.0,
            power_up_interval_ms: 0.0,
            autofire_ms: 0.0,
            fire_was_held: false,
            player: Player::default(),
            projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            grids: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            pending: Vec::new(),
            hooks: Box::new(NoHooks),
            store: Box::new(MemoryStore::new()),
        };
        session.reset();
        session
    }

    /// Attach audio/UI notification hooks
    pub fn with_hooks(mut self, hooks: impl GameHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Attach the high score store consulted at game over
    pub fn with_store(mut self, store: impl HighScoreStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Throw away the current run and start over, keeping hooks, store and tuning
    pub fn restart(&mut self, seed: Option<u64>) {
        self.seed = seed.unwrap_or_else(rand::random);
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.reset();
    }

    fn reset(&mut self) {
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.phase = GamePhase::Active;
        self.now_ms = 0.0;
        self.frame = 0;
        self.power_up_timer_ms = 0.0;
        self.autofire_ms = 0.0;
        self.fire_was_held = false;
        self.player = Player::default();
        self.projectiles.clear();
        self.enemy_projectiles.clear();
        self.grids.clear();
        self.power_ups.clear();
        self.particles.clear();
        self.pending.clear();

        for _ in 0..self.tuning.star_count {
            let star = Particle {
                pos: Vec2::new(
                    self.rng.random_range(0.0..WORLD_WIDTH),
                    self.rng.random_range(0.0..WORLD_HEIGHT),
                ),
                vel: Vec2::new(0.0, 1.0),
                radius: self.rng.random::<f32>() * 3.0,
                color: ParticleColor::White,
                fades: false,
                opacity: 1.0,
            };
            self.particles.push(star);
        }

        // The first formation arrives immediately
        self.spawn_grid();
        self.grid_spawn_interval = self.roll_grid_interval();
        self.power_up_interval_ms = self.roll_power_up_interval();

        log::info!("Session started (seed {})", self.seed);
    }

    /// Lives have run out (stays true through the terminal delay)
    pub fn over(&self) -> bool {
        self.phase != GamePhase::Active
    }

    /// Ticks still advance the simulation
    pub fn active(&self) -> bool {
        self.phase != GamePhase::Over
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Best score recorded in the attached store
    pub fn high_score(&self) -> u64 {
        self.store.read(HIGH_SCORE_KEY).unwrap_or(0)
    }

    /// Record an event and notify the hooks
    pub(crate) fn emit(&mut self, event: GameEvent) {
        match &event {
            GameEvent::Shot { .. } => self.hooks.on_shoot(),
            GameEvent::Damaged { .. } => self.hooks.on_damage(),
            GameEvent::EnemyKilled { .. } => self.hooks.on_kill(),
            GameEvent::GameOver { .. } => self.hooks.on_game_over(),
            GameEvent::SessionEnded {
                final_score,
                high_score,
                ..
            } => self.hooks.on_session_end(*final_score, *high_score),
            _ => {}
        }
        self.pending.push(event);
    }

    /// Fire from the player's ship. Returns the number of shots spawned
    /// (zero once the game is over).
    pub fn fire(&mut self) -> usize {
        if self.over() {
            return 0;
        }
        let vel = Vec2::new(0.0, -self.tuning.projectile_speed);
        let muzzles = self.player.muzzles(self.tuning.double_fire_offset);
        let shots = muzzles.len();
        self.projectiles
            .extend(muzzles.into_iter().map(|pos| Projectile::new(pos, vel)));
        self.emit(GameEvent::Shot { shots });
        shots
    }

    /// Apply a collected power-up
    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::ExtraLife => {
                self.lives = self.lives.saturating_add(1).min(self.tuning.max_lives);
            }
            PowerUpKind::Shield => {
                self.player
                    .shield
                    .grant(self.now_ms, self.tuning.shield_duration_ms as f64);
            }
            PowerUpKind::DoubleFire => {
                self.player
                    .double_fire
                    .grant(self.now_ms, self.tuning.double_fire_duration_ms as f64);
            }
        }
        log::debug!("Collected {:?}, lives {}", kind, self.lives);
        self.emit(GameEvent::PowerUpCollected { kind });
    }

    /// Take one unshielded hit
    pub(crate) fn damage_player(&mut self) {
        if self.over() || self.lives == 0 {
            return;
        }
        self.lives -= 1;
        self.burst(self.player.center(), ParticleColor::White);
        log::debug!("Player hit, {} lives left", self.lives);
        self.emit(GameEvent::Damaged {
            lives_left: self.lives,
        });

        if self.lives == 0 {
            self.phase = GamePhase::Dying {
                since_ms: self.now_ms,
            };
            self.player.opacity = 0.0;
            log::info!("Game over, score {}", self.score);
            self.emit(GameEvent::GameOver { score: self.score });
        }
    }

    /// Credit one enemy kill
    pub(crate) fn record_kill(&mut self, pos: Vec2) {
        self.score = self.score.saturating_add(self.tuning.kill_score);
        self.burst(pos, ParticleColor::Purple);
        log::debug!("Enemy destroyed at {:?}, score {}", pos, self.score);
        self.emit(GameEvent::EnemyKilled { pos });
    }

    /// End the run: latch `Over` and settle the high score
    pub(crate) fn finish(&mut self) {
        self.phase = GamePhase::Over;
        self.autofire_ms = 0.0;
        self.fire_was_held = false;
        let new_record = record_if_higher(self.store.as_mut(), HIGH_SCORE_KEY, self.score);
        let high_score = self.high_score();
        log::info!(
            "Session ended: score {}, high score {}",
            self.score,
            high_score
        );
        self.emit(GameEvent::SessionEnded {
            final_score: self.score,
            high_score,
            new_record,
        });
    }

    /// Emit a burst of fading particles centred on `pos`
    pub fn burst(&mut self, pos: Vec2, color: ParticleColor) {
        for _ in 0..self.tuning.burst_count {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 2.0,
                (self.rng.random::<f32>() - 0.5) * 2.0,
            );
            let radius = self.rng.random::<f32>() * 3.0;
            self.particles.push(Particle {
                pos,
                vel,
                radius,
                color,
                fades: true,
                opacity: 1.0,
            });
        }
    }

    /// Add a new random formation
    pub fn spawn_grid(&mut self) {
        let grid = EnemyGrid::random(&mut self.rng, self.tuning.grid_speed);
        let enemies = grid.enemies.len();
        self.grids.push(grid);
        log::info!("Grid spawned with {} enemies", enemies);
        self.emit(GameEvent::GridSpawned { enemies });
    }

    /// Drop a random power-up just above the visible area
    pub fn spawn_power_up(&mut self) {
        let index = self.rng.random_range(0..PowerUpKind::ALL.len());
        let kind = PowerUpKind::ALL[index];
        let x = self.rng.random_range(0.0..=(WORLD_WIDTH - POWER_UP_SIZE));
        self.power_ups.push(PowerUp::new(
            kind,
            Vec2::new(x, -POWER_UP_SIZE),
            self.tuning.power_up_speed,
        ));
        log::info!("Power-up {:?} spawned at x={:.0}", kind, x);
        self.emit(GameEvent::PowerUpSpawned { kind });
    }

    pub(crate) fn roll_grid_interval(&mut self) -> u32 {
        let (min, max) = (
            self.tuning.grid_spawn_min_frames,
            self.tuning.grid_spawn_max_frames,
        );
        if min >= max {
            return min;
        }
        self.rng.random_range(min..max)
    }

    pub(crate) fn roll_power_up_interval(&mut self) -> f64 {
        let min = self.tuning.power_up_spawn_min_ms as f64;
        let max = self.tuning.power_up_spawn_max_ms as f64;
        // Huge bounds can collapse to an empty range after the +1 repair
        if min >= max {
            return min;
        }
        self.rng.random_range(min..max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = GameSession::new(Some(1));
        assert_eq!(session.lives, 3);
        assert_eq!(session.score, 0);
        assert!(session.active());
        assert!(!session.over());
        assert_eq!(session.particles.len(), 100);
        assert!(session.particles.iter().all(|p| !p.fades));
        assert_eq!(session.grids.len(), 1);
        assert!((300..800).contains(&session.grid_spawn_interval));
        assert!((8000.0..12000.0).contains(&session.power_up_interval_ms));
        assert_eq!(session.player.pos, Vec2::new(480.0, 476.0));
    }

    #[test]
    fn test_same_seed_same_setup() {
        let a = GameSession::new(Some(77));
        let b = GameSession::new(Some(77));
        assert_eq!(a.grid_spawn_interval, b.grid_spawn_interval);
        assert_eq!(a.grids[0].enemies.len(), b.grids[0].enemies.len());
        assert_eq!(a.particles[10].pos, b.particles[10].pos);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut session = GameSession::new(Some(3));
        session.score = 900;
        session.lives = 1;
        session.projectiles.push(Projectile::new(Vec2::ZERO, Vec2::ZERO));
        session.phase = GamePhase::Over;

        session.restart(Some(4));
        assert_eq!(session.seed, 4);
        assert_eq!(session.score, 0);
        assert_eq!(session.lives, 3);
        assert!(session.projectiles.is_empty());
        assert!(session.active());
    }

    #[test]
    fn test_extra_life_is_capped() {
        let mut session = GameSession::new(Some(5));
        session.apply_power_up(PowerUpKind::ExtraLife);
        assert_eq!(session.lives, 3);
        session.lives = 2;
        session.apply_power_up(PowerUpKind::ExtraLife);
        assert_eq!(session.lives, 3);
    }

    #[test]
    fn test_extra_life_at_type_limit() {
        let tuning = Tuning {
            starting_lives: u8::MAX,
            max_lives: u8::MAX,
            ..Default::default()
        };
        let mut session = GameSession::with_tuning(Some(5), tuning);
        session.apply_power_up(PowerUpKind::ExtraLife);
        assert_eq!(session.lives, u8::MAX);
    }

    #[test]
    fn test_extreme_spawn_ranges_do_not_panic() {
        let tuning = Tuning::from_json(
            r#"{ "grid_spawn_min_frames": 4294967295, "power_up_spawn_min_ms": 3e38,
                 "power_up_spawn_max_ms": 1e39 }"#,
        )
        .unwrap();
        let mut session = GameSession::with_tuning(Some(12), tuning);
        assert_eq!(session.grid_spawn_interval, u32::MAX - 1);
        assert_eq!(
            session.power_up_interval_ms,
            session.tuning().power_up_spawn_min_ms as f64
        );
        session.tick(&crate::sim::TickInput::default(), FRAME_MS);
        assert!(session.active());
    }

    #[test]
    fn test_tuning_is_sanitized_at_construction() {
        let tuning = Tuning {
            enemy_fire_every: 0,
            ..Default::default()
        };
        let mut session = GameSession::with_tuning(Some(13), tuning);
        assert_eq!(session.tuning().enemy_fire_every, 1);
        session.tick(&crate::sim::TickInput::default(), FRAME_MS);
        assert!(session.active());
    }

    #[test]
    fn test_damage_never_goes_negative() {
        let mut session = GameSession::new(Some(6));
        session.lives = 1;
        session.damage_player();
        session.damage_player();
        assert_eq!(session.lives, 0);
        assert!(session.over());
        assert!(session.active());
        assert_eq!(session.player.opacity, 0.0);
    }

    #[test]
    fn test_fire_blocked_after_game_over() {
        let mut session = GameSession::new(Some(8));
        session.phase = GamePhase::Dying { since_ms: 0.0 };
        assert_eq!(session.fire(), 0);
        assert!(session.projectiles.is_empty());
    }

    #[test]
    fn test_power_up_spawns_above_view() {
        let mut session = GameSession::new(Some(9));
        for _ in 0..50 {
            session.spawn_power_up();
        }
        for power_up in &session.power_ups {
            assert_eq!(power_up.pos.y, -POWER_UP_SIZE);
            assert!(power_up.pos.x >= 0.0 && power_up.pos.x <= WORLD_WIDTH - POWER_UP_SIZE);
        }
    }
}
