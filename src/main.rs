//! Grid Defender headless driver
//!
//! Runs the simulation at the 60 Hz reference cadence with a scripted
//! autopilot and prints a JSON summary. Rendering and input belong to the
//! embedding frontend; this binary exists to exercise the core end to end.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use grid_defender::consts::*;
use grid_defender::sim::{GameEvent, GameSession, TickInput};
use grid_defender::{JsonFileStore, LogHooks, MemoryStore, Tuning};

#[derive(Parser, Debug)]
#[command(name = "grid-defender", about = "Run a headless Grid Defender session")]
struct Cli {
    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames even if the session is still running
    #[arg(long, default_value_t = 60 * 60 * 5)]
    frames: u32,

    /// JSON file holding the persisted high score
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// JSON tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    frames: u32,
    score: u64,
    lives: u8,
    kills: u32,
    shots: u32,
    hits_taken: u32,
    power_ups: u32,
    ended: bool,
    high_score: u64,
}

/// Sweep across the screen, holding fire the whole time
fn autopilot(session: &GameSession, heading_right: &mut bool) -> TickInput {
    let x = session.player.pos.x;
    if x <= 0.0 {
        *heading_right = true;
    } else if x >= WORLD_WIDTH - session.player.width {
        *heading_right = false;
    }
    TickInput {
        move_left: !*heading_right,
        move_right: *heading_right,
        fire: false,
        fire_held: true,
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let tuning = match &cli.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let session = GameSession::with_tuning(cli.seed, tuning).with_hooks(LogHooks);
    let mut session = match &cli.high_score_file {
        Some(path) => session.with_store(JsonFileStore::open(path.clone())),
        None => session.with_store(MemoryStore::new()),
    };
    log::info!("Grid Defender (headless) starting, seed {}", session.seed);

    let mut summary = Summary {
        seed: session.seed,
        ..Default::default()
    };
    let mut heading_right = true;

    while summary.frames < cli.frames {
        let input = autopilot(&session, &mut heading_right);
        let result = session.tick(&input, FRAME_MS);
        summary.frames += 1;

        for event in &result.events {
            match event {
                GameEvent::Shot { .. } => summary.shots += 1,
                GameEvent::Damaged { .. } => summary.hits_taken += 1,
                GameEvent::EnemyKilled { .. } => summary.kills += 1,
                GameEvent::PowerUpCollected { .. } => summary.power_ups += 1,
                _ => {}
            }
        }

        if !result.active {
            summary.ended = true;
            break;
        }
    }

    summary.score = session.score;
    summary.lives = session.lives;
    summary.high_score = session.high_score();

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
