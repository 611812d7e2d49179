//! Application screen state management
//!
//! Handles transitions between the application screens:
//! - Pre-game prompt before the countdown starts (or resumes)
//! - Playing today's puzzle
//! - Leaderboard for the day
//! - Error message display
//!
//! The coordinator also owns storage: it saves the puzzle after every change
//! and hands the final score to the score service when the round ends.

use crate::game::dictionary::Dictionary;
use crate::game::puzzle::{DailyPuzzle, Phase, ScoreSubmission};
use crate::game::rng::{date_key, today};
use crate::stats::{Leaderboard, PlayerStats, DEFAULT_TOP_N};
use crate::storage::{Storage, StorageError};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

use super::state::App;

/// The current application screen
pub enum Screen {
    /// Waiting for the player. `resume` is set when a round is in progress.
    PreGame { resume: bool },
    Playing,
    Leaderboard { board: Leaderboard },
    Error { message: String },
}

/// Main application coordinator
pub struct AppCoordinator {
    /// Current screen
    pub screen: Screen,
    /// The puzzle session
    pub app: App,
    /// Whether the application should quit
    pub should_quit: bool,
    storage: Storage,
    player_id: Option<i64>,
    stats: PlayerStats,
    dictionary: Arc<dyn Dictionary>,
    round_seconds: u32,
}

impl AppCoordinator {
    /// Load or create today's puzzle. The countdown waits for [`Self::play`].
    pub fn new(
        mut storage: Storage,
        dictionary: Arc<dyn Dictionary>,
        round_seconds: u32,
        date: NaiveDate,
    ) -> Self {
        let player_id = match storage.ensure_local_player() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "could not register local player");
                None
            }
        };
        let stats = storage.local_stats().unwrap_or_else(|e| {
            warn!(error = %e, "could not read local stats");
            PlayerStats::default()
        });

        let puzzle = load_puzzle(&storage, date, round_seconds, Arc::clone(&dictionary));
        let mut coordinator = Self {
            screen: Screen::Playing,
            app: App::new(puzzle),
            should_quit: false,
            storage,
            player_id,
            stats,
            dictionary,
            round_seconds,
        };
        coordinator.greet();
        coordinator
    }

    pub fn player_id(&self) -> Option<i64> {
        self.player_id
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Pick the first screen for the loaded puzzle.
    fn greet(&mut self) {
        self.screen = match self.app.puzzle().phase() {
            Phase::Uninitialized => Screen::PreGame { resume: false },
            Phase::Active => Screen::PreGame { resume: true },
            Phase::Over => {
                self.app.feedback = format!(
                    "Today's puzzle is done. Final score {}",
                    self.app.puzzle().score().final_score
                );
                Screen::Playing
            }
        };
    }

    /// Enter on the pre-game screen: start or resume the countdown.
    pub fn play(&mut self) {
        let resume = match self.screen {
            Screen::PreGame { resume } => resume,
            _ => return,
        };
        let date = self.app.puzzle().date_key();
        if self.app.start() {
            info!(date = %date, "round started");
        } else if resume {
            info!(date = %date, time_left = self.app.puzzle().time_left(), "round resumed");
        }
        self.screen = Screen::Playing;
        self.save();
    }

    /// Save the puzzle. Failures are logged and shown, never fatal.
    pub fn save(&mut self) {
        let puzzle = self.app.puzzle();
        let result = puzzle
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.storage
                    .save_puzzle(&puzzle.date_key(), &json)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            warn!(error = %e, "could not save puzzle");
            self.app.feedback = format!("Could not save: {}", e);
        }
    }

    /// Run a puzzle action and save when it changed anything.
    pub fn apply(&mut self, action: impl FnOnce(&mut App) -> bool) {
        if action(&mut self.app) {
            self.save();
        }
    }

    /// One second passed. Rolls over to a new puzzle at midnight.
    pub fn tick(&mut self) {
        self.tick_on(today());
    }

    fn tick_on(&mut self, date: NaiveDate) {
        if date != self.app.puzzle().date() {
            info!(date = %date_key(date), "new day, loading new puzzle");
            let puzzle = load_puzzle(&self.storage, date, self.round_seconds, Arc::clone(&self.dictionary));
            self.app.replace_puzzle(puzzle);
            self.greet();
            return;
        }
        if matches!(self.screen, Screen::PreGame { .. }) || self.app.puzzle().phase() != Phase::Active {
            return;
        }
        let submission = self.app.tick();
        self.save();
        if let Some(submission) = submission {
            self.submit(submission);
        }
    }

    /// End the round early.
    pub fn finish(&mut self) {
        if let Some(submission) = self.app.finish() {
            self.save();
            self.submit(submission);
        }
    }

    /// Hand the final score to storage, then show the leaderboard.
    /// A failed submission never touches the score on screen.
    fn submit(&mut self, mut submission: ScoreSubmission) {
        submission.player_id = self.player_id;
        match self.record(&submission) {
            Ok(new_high) => {
                if new_high {
                    self.app.feedback.push_str("  New high score!");
                }
            }
            Err(e) => {
                warn!(error = %e, "score submission failed");
                self.app.feedback = format!("Score not submitted: {}", e);
            }
        }
        self.show_leaderboard();
    }

    fn record(&mut self, submission: &ScoreSubmission) -> Result<bool, StorageError> {
        let date = date_key(submission.date);
        self.stats.record_game(&date, submission.score);
        self.storage.record_last_game(&date, submission.score)?;

        let Some(player_id) = submission.player_id else {
            return Ok(false);
        };
        self.storage
            .submit_daily_score(player_id, &date, submission.score, submission.time_taken)?;
        let new_high = self.storage.update_high_score(player_id, submission.score)?;
        Ok(new_high)
    }

    /// Show today's leaderboard.
    pub fn show_leaderboard(&mut self) {
        let date = self.app.puzzle().date_key();
        self.screen = match self.storage.leaderboard(&date, self.player_id, DEFAULT_TOP_N) {
            Ok(board) => Screen::Leaderboard { board },
            Err(e) => {
                warn!(error = %e, "could not load leaderboard");
                Screen::Error {
                    message: e.to_string(),
                }
            }
        };
    }

    /// `l`: toggle between the puzzle and the leaderboard
    pub fn toggle_leaderboard(&mut self) {
        match self.screen {
            Screen::Playing => self.show_leaderboard(),
            Screen::PreGame { .. } => {}
            _ => self.screen = Screen::Playing,
        }
    }

    /// Esc: leave an overlay screen, drop a held tile, or quit.
    pub fn back(&mut self) {
        match self.screen {
            Screen::PreGame { .. } => self.quit(),
            Screen::Playing => {
                if !self.app.cancel() {
                    self.quit();
                }
            }
            _ => self.screen = Screen::Playing,
        }
    }
}

/// Today's saved state if usable, otherwise a fresh puzzle.
fn load_puzzle(
    storage: &Storage,
    date: NaiveDate,
    round_seconds: u32,
    dictionary: Arc<dyn Dictionary>,
) -> DailyPuzzle {
    let saved = storage.load_puzzle(&date_key(date)).unwrap_or_else(|e| {
        warn!(error = %e, "could not read saved puzzle");
        None
    });
    DailyPuzzle::load_or_generate(saved.as_deref(), date, round_seconds, dictionary)
}
