//! The day's puzzle: tiles, rules, countdown and score in one session
//!
//! Lifecycle is `Uninitialized -> Active -> Over`. Moves are only accepted
//! while active and every accepted move rescans the whole grid. Once over,
//! the countdown is stopped and the score is locked for the rest of the day.

use super::board::{Bag, Grid, Hand, MoveError, GRID_HEIGHT, GRID_WIDTH, HAND_SLOTS};
use super::dictionary::Dictionary;
use super::rng::{date_key, DailyRng};
use super::rules::{resolve_rules, select_daily_rules, Rule, CATALOG};
use super::scoring::{score_grid, ScoreBreakdown};
use super::{deal, letter_value, total_tiles, TileId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default round length in seconds
pub const DEFAULT_ROUND_SECONDS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Uninitialized,
    Active,
    Over,
}

/// One-second countdown. Once stopped it never moves again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    total: u32,
    remaining: u32,
    running: bool,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            total: seconds,
            remaining: seconds,
            running: false,
        }
    }

    pub fn start(&mut self) {
        if self.remaining > 0 {
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Seconds used so far.
    pub fn elapsed(&self) -> u32 {
        self.total.saturating_sub(self.remaining)
    }

    /// Advance one second. Returns true on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.running = false;
            return true;
        }
        false
    }
}

/// Emitted once when a puzzle ends, for the score service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSubmission {
    pub player_id: Option<i64>,
    pub date: NaiveDate,
    pub score: u32,
    /// Seconds between start and finish
    pub time_taken: u32,
}

/// Why saved state could not be used for today.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("saved puzzle is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("saved puzzle is for {saved}, today is {today}")]
    Stale { saved: String, today: String },
    #[error("saved puzzle names unknown rule '{0}'")]
    UnknownRule(String),
    #[error("saved puzzle has the wrong board or hand size")]
    Dimensions,
    #[error("saved puzzle tiles do not match a full bag")]
    Tiles,
    #[error("saved puzzle countdown is inconsistent ({remaining}s left of {total}s)")]
    Countdown { remaining: u32, total: u32 },
}

/// Persisted form of a puzzle. Rules are stored by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSnapshot {
    pub date: String,
    pub phase: Phase,
    pub countdown: Countdown,
    pub grid: Grid,
    pub hand: Hand,
    pub bag: Bag,
    pub rule_ids: Vec<String>,
    pub score: ScoreBreakdown,
    /// Whether the final score has already been handed out
    pub submitted: bool,
}

pub struct DailyPuzzle {
    date: NaiveDate,
    phase: Phase,
    countdown: Countdown,
    grid: Grid,
    hand: Hand,
    bag: Bag,
    rules: Vec<Rule>,
    score: ScoreBreakdown,
    submitted: bool,
    dictionary: Arc<dyn Dictionary>,
}

impl DailyPuzzle {
    /// Build the day's puzzle. The bag is shuffled before the rules are
    /// drawn, both from the same date-seeded stream.
    pub fn generate(date: NaiveDate, round_seconds: u32, dictionary: Arc<dyn Dictionary>) -> Self {
        let mut rng = DailyRng::for_date(date);
        let (hand, bag) = deal(&mut rng, HAND_SLOTS);
        let rules = select_daily_rules(&mut rng, CATALOG);
        debug!(
            date = %date_key(date),
            rules = ?rules.iter().map(|r| r.id).collect::<Vec<_>>(),
            "generated puzzle"
        );

        Self {
            date,
            phase: Phase::Uninitialized,
            countdown: Countdown::new(round_seconds),
            grid: Grid::default(),
            hand,
            bag,
            rules,
            score: ScoreBreakdown::default(),
            submitted: false,
            dictionary,
        }
    }

    /// Rehydrate saved state for `today`, or build a fresh puzzle when
    /// there is none or it cannot be used.
    pub fn load_or_generate(
        saved: Option<&str>,
        today: NaiveDate,
        round_seconds: u32,
        dictionary: Arc<dyn Dictionary>,
    ) -> Self {
        match saved.map(|text| Self::restore(text, today, Arc::clone(&dictionary))) {
            Some(Ok(puzzle)) => {
                info!(date = %date_key(today), phase = ?puzzle.phase, "resumed saved puzzle");
                puzzle
            }
            Some(Err(e)) => {
                warn!(error = %e, "discarding saved puzzle");
                Self::generate(today, round_seconds, dictionary)
            }
            None => {
                info!(date = %date_key(today), "starting fresh puzzle");
                Self::generate(today, round_seconds, dictionary)
            }
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn date_key(&self) -> String {
        date_key(self.date)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn time_left(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn bag(&self) -> &Bag {
        &self.bag
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn score(&self) -> &ScoreBreakdown {
        &self.score
    }

    /// Start the countdown. Only has an effect on a fresh puzzle.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Uninitialized {
            return false;
        }
        self.phase = Phase::Active;
        self.countdown.start();
        true
    }

    /// One second of play. Yields the submission when time runs out.
    pub fn tick(&mut self) -> Option<ScoreSubmission> {
        if self.phase != Phase::Active {
            return None;
        }
        // a zero-length round never starts running and ends on its first tick
        if self.countdown.remaining() == 0 || self.countdown.tick() {
            info!(score = self.score.final_score, "time is up");
            return self.end();
        }
        None
    }

    /// End the round early with a final rescan.
    pub fn finish(&mut self) -> Option<ScoreSubmission> {
        if self.phase != Phase::Active {
            return None;
        }
        self.rescan();
        info!(score = self.score.final_score, "puzzle finished by player");
        self.end()
    }

    fn end(&mut self) -> Option<ScoreSubmission> {
        self.phase = Phase::Over;
        self.countdown.stop();
        if self.submitted {
            return None;
        }
        self.submitted = true;
        Some(ScoreSubmission {
            player_id: None,
            date: self.date,
            score: self.score.final_score,
            time_taken: self.countdown.elapsed(),
        })
    }

    fn ensure_active(&self) -> Result<(), MoveError> {
        if self.phase == Phase::Active {
            Ok(())
        } else {
            Err(MoveError::NotActive)
        }
    }

    /// Put a hand tile on an empty cell.
    pub fn place_from_hand(&mut self, slot: usize, x: usize, y: usize) -> Result<(), MoveError> {
        self.ensure_active()?;
        let tile = self.hand.take(slot)?;
        if let Err(e) = self.grid.place(tile, x, y) {
            self.hand.restore(slot, tile);
            return Err(e);
        }
        self.rescan();
        Ok(())
    }

    /// Move a grid tile. Dropping onto another tile swaps them.
    pub fn move_on_grid(&mut self, from: (usize, usize), to: (usize, usize)) -> Result<(), MoveError> {
        self.ensure_active()?;
        self.grid.move_tile(from, to)?;
        self.rescan();
        Ok(())
    }

    /// Lift a grid tile back into the first free hand slot.
    pub fn return_to_hand(&mut self, x: usize, y: usize) -> Result<usize, MoveError> {
        self.ensure_active()?;
        if self.hand.first_empty().is_none() {
            return Err(MoveError::HandFull);
        }
        let tile = self.grid.remove(x, y)?;
        let slot = self.hand.insert(tile)?;
        self.rescan();
        Ok(slot)
    }

    /// Top the hand up from the bag. Returns how many tiles were drawn.
    pub fn refill_hand(&mut self) -> Result<usize, MoveError> {
        self.ensure_active()?;
        let drawn = self.hand.fill_from(&mut self.bag);
        debug!(drawn, left = self.bag.len(), "refilled hand");
        Ok(drawn)
    }

    /// Recompute score and annotations from the whole grid.
    /// A finished puzzle keeps its locked score.
    pub fn rescan(&mut self) {
        if self.phase == Phase::Over {
            return;
        }
        self.score = score_grid(&mut self.grid, self.dictionary.as_ref(), &self.rules);
    }

    pub fn snapshot(&self) -> PuzzleSnapshot {
        PuzzleSnapshot {
            date: self.date_key(),
            phase: self.phase,
            countdown: self.countdown,
            grid: self.grid.clone(),
            hand: self.hand.clone(),
            bag: self.bag.clone(),
            rule_ids: self.rules.iter().map(|r| r.id.to_string()).collect(),
            score: self.score.clone(),
            submitted: self.submitted,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }

    /// Rebuild a puzzle from saved JSON. Only state saved for `today` that
    /// still holds exactly one full bag of tiles is accepted.
    pub fn restore(
        text: &str,
        today: NaiveDate,
        dictionary: Arc<dyn Dictionary>,
    ) -> Result<Self, SnapshotError> {
        let snapshot: PuzzleSnapshot = serde_json::from_str(text)?;

        let today_key = date_key(today);
        if snapshot.date != today_key {
            return Err(SnapshotError::Stale {
                saved: snapshot.date,
                today: today_key,
            });
        }

        let rules = resolve_rules(&snapshot.rule_ids).map_err(SnapshotError::UnknownRule)?;

        if snapshot.grid.width() != GRID_WIDTH
            || snapshot.grid.height() != GRID_HEIGHT
            || !snapshot.grid.is_consistent()
            || snapshot.hand.slot_count() != HAND_SLOTS
        {
            return Err(SnapshotError::Dimensions);
        }
        check_tiles(&snapshot)?;
        let countdown = check_countdown(snapshot.phase, snapshot.countdown)?;

        let mut puzzle = Self {
            date: today,
            phase: snapshot.phase,
            countdown,
            grid: snapshot.grid,
            hand: snapshot.hand,
            bag: snapshot.bag,
            rules,
            score: snapshot.score,
            submitted: snapshot.submitted,
            dictionary,
        };
        puzzle.rescan();
        Ok(puzzle)
    }
}

/// The countdown can never hold more time than the round had, and a fresh
/// puzzle has used none of it. The running flag is not trusted: an active
/// round with time left runs, anything else is stopped.
fn check_countdown(phase: Phase, mut countdown: Countdown) -> Result<Countdown, SnapshotError> {
    let inconsistent = countdown.remaining > countdown.total
        || (phase == Phase::Uninitialized && countdown.remaining != countdown.total);
    if inconsistent {
        return Err(SnapshotError::Countdown {
            remaining: countdown.remaining,
            total: countdown.total,
        });
    }
    match phase {
        Phase::Active => countdown.start(),
        Phase::Uninitialized | Phase::Over => countdown.stop(),
    }
    Ok(countdown)
}

/// Every tile id from the bag appears exactly once across grid, hand and
/// bag, with the letter value the table gives it.
fn check_tiles(snapshot: &PuzzleSnapshot) -> Result<(), SnapshotError> {
    let tiles = snapshot
        .grid
        .tiles()
        .map(|placed| &placed.tile)
        .chain(snapshot.hand.tiles())
        .chain(snapshot.bag.tiles());

    let mut ids: Vec<TileId> = Vec::with_capacity(total_tiles());
    for tile in tiles {
        if letter_value(tile.letter) != Some(tile.value) {
            return Err(SnapshotError::Tiles);
        }
        ids.push(tile.id);
    }
    ids.sort_unstable();
    let expected = (0..total_tiles() as TileId).collect::<Vec<_>>();
    if ids != expected {
        return Err(SnapshotError::Tiles);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dictionary::WordList;

    /// Accepts any run, so hand tiles always score once laid in a row.
    struct AnyWord;

    impl Dictionary for AnyWord {
        fn has_word(&self, _word: &str) -> bool {
            true
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 19).unwrap()
    }

    fn active_puzzle() -> DailyPuzzle {
        let mut puzzle = DailyPuzzle::generate(day(), DEFAULT_ROUND_SECONDS, Arc::new(AnyWord));
        assert!(puzzle.start());
        puzzle
    }

    /// Lay the first three hand tiles across the top row.
    fn lay_three(puzzle: &mut DailyPuzzle) {
        for i in 0..3 {
            puzzle.place_from_hand(i, i, 0).unwrap();
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = DailyPuzzle::generate(day(), 300, Arc::new(WordList::empty()));
        let b = DailyPuzzle::generate(day(), 300, Arc::new(WordList::empty()));
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.phase(), Phase::Uninitialized);
        assert_eq!(a.hand().tiles().count(), HAND_SLOTS);
        assert_eq!(a.bag().len(), total_tiles() - HAND_SLOTS);
        assert_eq!(a.rules().len(), 3);
        assert_eq!(a.date_key(), "2025-10-19");
    }

    #[test]
    fn test_different_days_differ() {
        let next = day().succ_opt().unwrap();
        let a = DailyPuzzle::generate(day(), 300, Arc::new(AnyWord));
        let b = DailyPuzzle::generate(next, 300, Arc::new(AnyWord));
        assert_ne!(a.hand(), b.hand());
    }

    #[test]
    fn test_moves_rejected_before_start() {
        let mut puzzle = DailyPuzzle::generate(day(), 300, Arc::new(AnyWord));
        assert_eq!(puzzle.place_from_hand(0, 0, 0), Err(MoveError::NotActive));
        assert_eq!(puzzle.refill_hand(), Err(MoveError::NotActive));
        assert_eq!(puzzle.grid().tile_count(), 0);
    }

    #[test]
    fn test_start_only_once() {
        let mut puzzle = active_puzzle();
        assert!(!puzzle.start());
        assert!(puzzle.countdown().is_running());
    }

    #[test]
    fn test_place_from_hand_rescans() {
        let mut puzzle = active_puzzle();
        let values: u32 = (0..3).map(|i| puzzle.hand().get(i).unwrap().value).sum();
        lay_three(&mut puzzle);

        assert!(puzzle.hand().get(0).is_none());
        assert_eq!(puzzle.grid().tile_count(), 3);
        assert!(puzzle.grid().tiles().all(|t| t.is_found));
        assert_eq!(puzzle.score().base_points, values);
        assert_eq!(puzzle.score().total_lengths, 3);
        assert_eq!(
            puzzle.score().final_score,
            values * 3 + puzzle.score().bonus_points
        );
    }

    #[test]
    fn test_place_on_occupied_cell_keeps_hand() {
        let mut puzzle = active_puzzle();
        puzzle.place_from_hand(0, 5, 5).unwrap();
        let held = *puzzle.hand().get(1).unwrap();

        assert_eq!(
            puzzle.place_from_hand(1, 5, 5),
            Err(MoveError::Occupied { x: 5, y: 5 })
        );
        assert_eq!(puzzle.hand().get(1), Some(&held));
        assert_eq!(puzzle.grid().tile_count(), 1);
    }

    #[test]
    fn test_move_on_grid_swaps_and_rescans() {
        let mut puzzle = active_puzzle();
        lay_three(&mut puzzle);
        let first = puzzle.grid().get(0, 0).unwrap().id();
        let last = puzzle.grid().get(2, 0).unwrap().id();

        puzzle.move_on_grid((0, 0), (2, 0)).unwrap();
        assert_eq!(puzzle.grid().get(0, 0).unwrap().id(), last);
        assert_eq!(puzzle.grid().get(2, 0).unwrap().id(), first);
        assert!(puzzle.grid().tiles().all(|t| t.is_found));

        // breaking the run drops the word
        puzzle.move_on_grid((1, 0), (1, 4)).unwrap();
        assert_eq!(puzzle.score().final_score, 0);
        assert!(puzzle.grid().tiles().all(|t| !t.is_found));
    }

    #[test]
    fn test_return_to_hand_uses_first_empty_slot() {
        let mut puzzle = active_puzzle();
        lay_three(&mut puzzle);
        let id = puzzle.grid().get(1, 0).unwrap().id();

        assert_eq!(puzzle.return_to_hand(1, 0), Ok(0));
        assert_eq!(puzzle.hand().get(0).unwrap().id, id);
        assert_eq!(puzzle.score().final_score, 0);
        assert_eq!(
            puzzle.return_to_hand(1, 0),
            Err(MoveError::EmptyCell { x: 1, y: 0 })
        );
    }

    #[test]
    fn test_return_to_full_hand_rejected() {
        let mut puzzle = active_puzzle();
        puzzle.place_from_hand(0, 0, 0).unwrap();
        puzzle.refill_hand().unwrap();
        assert_eq!(puzzle.return_to_hand(0, 0), Err(MoveError::HandFull));
        assert_eq!(puzzle.grid().tile_count(), 1);
    }

    #[test]
    fn test_refill_hand_draws_from_bag() {
        let mut puzzle = active_puzzle();
        lay_three(&mut puzzle);
        let before = puzzle.bag().len();

        assert_eq!(puzzle.refill_hand(), Ok(3));
        assert_eq!(puzzle.bag().len(), before - 3);
        assert_eq!(puzzle.hand().tiles().count(), HAND_SLOTS);
        assert_eq!(puzzle.refill_hand(), Ok(0));
    }

    #[test]
    fn test_countdown_ends_game_once() {
        let mut puzzle = DailyPuzzle::generate(day(), 3, Arc::new(AnyWord));
        puzzle.start();
        lay_three(&mut puzzle);
        let score = puzzle.score().final_score;

        assert_eq!(puzzle.tick(), None);
        assert_eq!(puzzle.tick(), None);
        let submission = puzzle.tick().unwrap();
        assert_eq!(submission.score, score);
        assert_eq!(submission.time_taken, 3);
        assert_eq!(submission.player_id, None);
        assert!(puzzle.is_over());
        assert!(!puzzle.countdown().is_running());

        assert_eq!(puzzle.tick(), None);
        assert_eq!(puzzle.finish(), None);
        assert_eq!(puzzle.time_left(), 0);
    }

    #[test]
    fn test_no_score_change_after_over() {
        let mut puzzle = active_puzzle();
        lay_three(&mut puzzle);
        puzzle.finish().unwrap();
        let locked = puzzle.score().clone();
        let grid = puzzle.grid().clone();

        assert_eq!(puzzle.place_from_hand(5, 6, 6), Err(MoveError::NotActive));
        assert_eq!(puzzle.move_on_grid((0, 0), (0, 5)), Err(MoveError::NotActive));
        assert_eq!(puzzle.return_to_hand(0, 0), Err(MoveError::NotActive));
        puzzle.rescan();

        assert_eq!(puzzle.score(), &locked);
        assert_eq!(puzzle.grid(), &grid);
    }

    #[test]
    fn test_finish_reports_time_taken() {
        let mut puzzle = active_puzzle();
        for _ in 0..42 {
            puzzle.tick();
        }
        let submission = puzzle.finish().unwrap();
        assert_eq!(submission.time_taken, 42);
        assert_eq!(submission.date, day());
    }

    #[test]
    fn test_zero_length_round_ends_on_first_tick() {
        let mut puzzle = DailyPuzzle::generate(day(), 0, Arc::new(AnyWord));
        puzzle.start();
        assert_eq!(puzzle.phase(), Phase::Active);
        let submission = puzzle.tick().unwrap();
        assert_eq!(submission.time_taken, 0);
        assert!(puzzle.is_over());
        assert_eq!(puzzle.tick(), None);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut puzzle = active_puzzle();
        lay_three(&mut puzzle);
        puzzle.tick();
        let json = puzzle.to_json().unwrap();

        let restored = DailyPuzzle::restore(&json, day(), Arc::new(AnyWord)).unwrap();
        assert_eq!(restored.snapshot(), puzzle.snapshot());
        assert_eq!(restored.rules(), puzzle.rules());
    }

    #[test]
    fn test_restore_rejects_other_day() {
        let puzzle = active_puzzle();
        let json = puzzle.to_json().unwrap();
        let tomorrow = day().succ_opt().unwrap();
        let result = DailyPuzzle::restore(&json, tomorrow, Arc::new(AnyWord));
        assert!(matches!(result, Err(SnapshotError::Stale { .. })));
    }

    #[test]
    fn test_restore_rejects_corrupt_json() {
        let result = DailyPuzzle::restore("{not json", day(), Arc::new(AnyWord));
        assert!(matches!(result, Err(SnapshotError::Corrupt(_))));
    }

    #[test]
    fn test_restore_rejects_unknown_rule() {
        let mut snapshot = active_puzzle().snapshot();
        snapshot.rule_ids[0] = "double_everything".to_string();
        let json = serde_json::to_string(&snapshot).unwrap();
        let result = DailyPuzzle::restore(&json, day(), Arc::new(AnyWord));
        assert!(matches!(result, Err(SnapshotError::UnknownRule(id)) if id == "double_everything"));
    }

    #[test]
    fn test_restore_rejects_missing_tiles() {
        let mut puzzle = active_puzzle();
        puzzle.bag.draw();
        let json = puzzle.to_json().unwrap();
        let result = DailyPuzzle::restore(&json, day(), Arc::new(AnyWord));
        assert!(matches!(result, Err(SnapshotError::Tiles)));
    }

    #[test]
    fn test_restore_rejects_wrong_hand_size() {
        let mut snapshot = active_puzzle().snapshot();
        snapshot.hand = Hand::new(3);
        let json = serde_json::to_string(&snapshot).unwrap();
        let result = DailyPuzzle::restore(&json, day(), Arc::new(AnyWord));
        assert!(matches!(result, Err(SnapshotError::Dimensions)));
    }

    #[test]
    fn test_restore_rejects_more_time_than_the_round() {
        let json = active_puzzle()
            .to_json()
            .unwrap()
            .replace("\"remaining\":300", "\"remaining\":400");
        let result = DailyPuzzle::restore(&json, day(), Arc::new(AnyWord));
        assert!(matches!(
            result,
            Err(SnapshotError::Countdown {
                remaining: 400,
                total: 300
            })
        ));

        // falls back to a fresh puzzle that can still be finished
        let mut puzzle = DailyPuzzle::load_or_generate(Some(json.as_str()), day(), 300, Arc::new(AnyWord));
        assert_eq!(puzzle.phase(), Phase::Uninitialized);
        puzzle.start();
        assert_eq!(puzzle.finish().unwrap().time_taken, 0);
    }

    #[test]
    fn test_restore_rejects_used_time_before_start() {
        let mut snapshot = DailyPuzzle::generate(day(), 300, Arc::new(AnyWord)).snapshot();
        snapshot.countdown.remaining = 120;
        let json = serde_json::to_string(&snapshot).unwrap();
        let result = DailyPuzzle::restore(&json, day(), Arc::new(AnyWord));
        assert!(matches!(result, Err(SnapshotError::Countdown { .. })));
    }

    #[test]
    fn test_restored_active_round_keeps_running() {
        let mut puzzle = DailyPuzzle::generate(day(), 3, Arc::new(AnyWord));
        puzzle.start();
        let mut snapshot = puzzle.snapshot();
        snapshot.countdown.stop();
        let json = serde_json::to_string(&snapshot).unwrap();

        let mut restored = DailyPuzzle::restore(&json, day(), Arc::new(AnyWord)).unwrap();
        assert!(restored.countdown().is_running());
        assert_eq!(restored.tick(), None);
        assert_eq!(restored.tick(), None);
        assert!(restored.tick().is_some());
        assert!(restored.is_over());
    }

    #[test]
    fn test_restored_over_round_stays_stopped() {
        let mut puzzle = active_puzzle();
        puzzle.finish();
        let mut snapshot = puzzle.snapshot();
        snapshot.countdown.start();
        let json = serde_json::to_string(&snapshot).unwrap();

        let restored = DailyPuzzle::restore(&json, day(), Arc::new(AnyWord)).unwrap();
        assert!(!restored.countdown().is_running());
    }

    #[test]
    fn test_elapsed_never_underflows() {
        let countdown = Countdown {
            total: 10,
            remaining: 20,
            running: false,
        };
        assert_eq!(countdown.elapsed(), 0);
    }

    #[test]
    fn test_restore_over_does_not_resubmit() {
        let mut puzzle = active_puzzle();
        lay_three(&mut puzzle);
        assert!(puzzle.finish().is_some());
        let json = puzzle.to_json().unwrap();

        let mut restored = DailyPuzzle::restore(&json, day(), Arc::new(AnyWord)).unwrap();
        assert!(restored.is_over());
        assert_eq!(restored.score(), puzzle.score());
        assert_eq!(restored.tick(), None);
        assert_eq!(restored.finish(), None);
    }

    #[test]
    fn test_load_or_generate_falls_back() {
        let fresh = DailyPuzzle::generate(day(), 300, Arc::new(AnyWord)).snapshot();

        let from_none = DailyPuzzle::load_or_generate(None, day(), 300, Arc::new(AnyWord));
        assert_eq!(from_none.snapshot(), fresh);

        let from_garbage =
            DailyPuzzle::load_or_generate(Some("garbage"), day(), 300, Arc::new(AnyWord));
        assert_eq!(from_garbage.snapshot(), fresh);

        let mut played = active_puzzle();
        lay_three(&mut played);
        let json = played.to_json().unwrap();
        let resumed = DailyPuzzle::load_or_generate(Some(json.as_str()), day(), 300, Arc::new(AnyWord));
        assert_eq!(resumed.grid().tile_count(), 3);
        assert_eq!(resumed.phase(), Phase::Active);
    }

    #[test]
    fn test_countdown_basics() {
        let mut countdown = Countdown::new(2);
        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), 2);

        countdown.start();
        assert!(!countdown.tick());
        countdown.stop();
        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), 1);
        assert_eq!(countdown.elapsed(), 1);

        countdown.start();
        assert!(countdown.tick());
        assert!(!countdown.is_running());
        assert_eq!(countdown.total(), 2);
    }
}
