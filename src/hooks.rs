//! Notification hooks for audio and UI collaborators
//!
//! The simulation calls these as things happen. They carry nothing back
//! into the game state.

/// Feedback callbacks invoked from inside `tick`
pub trait GameHooks {
    /// Player lost a life
    fn on_damage(&mut self) {}
    /// An enemy was destroyed
    fn on_kill(&mut self) {}
    /// Last life lost; the terminal delay has started
    fn on_game_over(&mut self) {}
    /// A fire action produced shots
    fn on_shoot(&mut self) {}
    /// Terminal delay elapsed and the session stopped
    fn on_session_end(&mut self, _final_score: u64, _high_score: u64) {}
}

/// Ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl GameHooks for NoHooks {}

/// Routes every notification to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHooks;

impl GameHooks for LogHooks {
    fn on_damage(&mut self) {
        log::debug!("hook: damage");
    }

    fn on_kill(&mut self) {
        log::debug!("hook: kill");
    }

    fn on_game_over(&mut self) {
        log::info!("hook: game over");
    }

    fn on_shoot(&mut self) {
        log::trace!("hook: shoot");
    }

    fn on_session_end(&mut self, final_score: u64, high_score: u64) {
        log::info!("hook: session end, score {} (best {})", final_score, high_score);
    }
}
