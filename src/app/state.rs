//! Application state management
//!
//! Wraps the day's puzzle with what the keyboard front-end needs: a cursor
//! on the grid and in the hand, the tile currently picked up, and a
//! feedback line.

use crate::game::board::{MoveError, GRID_HEIGHT, GRID_WIDTH, HAND_SLOTS};
use crate::game::puzzle::{DailyPuzzle, ScoreSubmission};

/// Hand slots shown per row
pub const HAND_ROW_LEN: usize = 12;

/// Which area the cursor keys move in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Hand,
    Grid,
}

/// A picked-up tile, waiting to be dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Held {
    Hand(usize),
    Grid(usize, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Main application state
pub struct App {
    /// Feedback message from the last action
    pub feedback: String,
    puzzle: DailyPuzzle,
    focus: Focus,
    /// Grid cursor (x, y)
    cursor: (usize, usize),
    hand_cursor: usize,
    held: Option<Held>,
}

impl App {
    pub fn new(puzzle: DailyPuzzle) -> Self {
        Self {
            feedback: String::new(),
            puzzle,
            focus: Focus::Hand,
            cursor: (GRID_WIDTH / 2, GRID_HEIGHT / 2),
            hand_cursor: 0,
            held: None,
        }
    }

    pub fn puzzle(&self) -> &DailyPuzzle {
        &self.puzzle
    }

    /// Swap in a new day's puzzle, resetting the cursors.
    pub fn replace_puzzle(&mut self, puzzle: DailyPuzzle) {
        *self = Self::new(puzzle);
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn hand_cursor(&self) -> usize {
        self.hand_cursor
    }

    pub fn held(&self) -> Option<Held> {
        self.held
    }

    /// Check if the round is over
    pub fn is_round_over(&self) -> bool {
        self.puzzle.is_over()
    }

    /// Start the countdown if the puzzle has not started yet
    pub fn start(&mut self) -> bool {
        self.puzzle.start()
    }

    /// Advance the timer one second
    pub fn tick(&mut self) -> Option<ScoreSubmission> {
        let submission = self.puzzle.tick();
        if submission.is_some() {
            self.end_round("TIME'S UP!");
        }
        submission
    }

    /// Finish early
    pub fn finish(&mut self) -> Option<ScoreSubmission> {
        let submission = self.puzzle.finish();
        if submission.is_some() {
            self.end_round("FINISHED!");
        }
        submission
    }

    fn end_round(&mut self, message: &str) {
        self.held = None;
        self.feedback = format!("{} Final score {}", message, self.puzzle.score().final_score);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Hand => Focus::Grid,
            Focus::Grid => Focus::Hand,
        };
    }

    /// Move the cursor in the focused area, stopping at the edges.
    pub fn move_cursor(&mut self, direction: Direction) {
        match self.focus {
            Focus::Grid => {
                let (x, y) = &mut self.cursor;
                match direction {
                    Direction::Up => *y = y.saturating_sub(1),
                    Direction::Down => *y = (*y + 1).min(GRID_HEIGHT - 1),
                    Direction::Left => *x = x.saturating_sub(1),
                    Direction::Right => *x = (*x + 1).min(GRID_WIDTH - 1),
                }
            }
            Focus::Hand => {
                let slot = &mut self.hand_cursor;
                *slot = match direction {
                    Direction::Up => slot.checked_sub(HAND_ROW_LEN).unwrap_or(*slot),
                    Direction::Down if *slot + HAND_ROW_LEN < HAND_SLOTS => *slot + HAND_ROW_LEN,
                    Direction::Down => *slot,
                    Direction::Left => slot.saturating_sub(1),
                    Direction::Right => (*slot + 1).min(HAND_SLOTS - 1),
                };
            }
        }
    }

    /// Enter/Space: pick up the tile under the cursor, or drop the held one.
    /// Returns true when the puzzle changed.
    pub fn on_select(&mut self) -> bool {
        if self.is_round_over() {
            return false;
        }
        match self.held.take() {
            None => {
                self.pick_up();
                false
            }
            Some(held) => self.drop_held(held),
        }
    }

    fn pick_up(&mut self) {
        let (held, letter) = match self.focus {
            Focus::Hand => (
                Held::Hand(self.hand_cursor),
                self.puzzle.hand().get(self.hand_cursor).map(|t| t.letter),
            ),
            Focus::Grid => {
                let (x, y) = self.cursor;
                (Held::Grid(x, y), self.puzzle.grid().get(x, y).map(|t| t.letter()))
            }
        };
        match letter {
            Some(letter) => {
                self.held = Some(held);
                self.feedback = format!("Holding {}", letter);
            }
            None => self.feedback = "Nothing to pick up".to_string(),
        }
    }

    fn drop_held(&mut self, held: Held) -> bool {
        let (x, y) = self.cursor;
        let result = match (held, self.focus) {
            (Held::Hand(slot), Focus::Grid) => self.puzzle.place_from_hand(slot, x, y),
            (Held::Hand(slot), Focus::Hand) if slot == self.hand_cursor => {
                self.feedback.clear();
                return false;
            }
            (Held::Hand(_), Focus::Hand) => {
                // pick the other slot instead
                self.pick_up();
                return false;
            }
            (Held::Grid(fx, fy), Focus::Grid) if (fx, fy) == (x, y) => {
                self.feedback.clear();
                return false;
            }
            (Held::Grid(fx, fy), Focus::Grid) => self.puzzle.move_on_grid((fx, fy), (x, y)),
            (Held::Grid(fx, fy), Focus::Hand) => self.puzzle.return_to_hand(fx, fy).map(|_| ()),
        };
        self.report(result)
    }

    /// Backspace: send the grid tile under the cursor back to the hand.
    pub fn on_return(&mut self) -> bool {
        if self.focus != Focus::Grid || self.is_round_over() {
            return false;
        }
        let (x, y) = self.cursor;
        self.held = None;
        let result = self.puzzle.return_to_hand(x, y).map(|_| ());
        self.report(result)
    }

    /// Refill empty hand slots from the bag.
    pub fn on_refill(&mut self) -> bool {
        if self.is_round_over() {
            return false;
        }
        self.held = None;
        match self.puzzle.refill_hand() {
            Ok(0) if self.puzzle.bag().is_empty() => {
                self.feedback = "The bag is empty".to_string();
                false
            }
            Ok(0) => {
                self.feedback = "Hand is already full".to_string();
                false
            }
            Ok(drawn) => {
                self.feedback = format!("Drew {} tiles, {} left in the bag", drawn, self.puzzle.bag().len());
                true
            }
            Err(e) => {
                self.feedback = format_move_error(&e);
                false
            }
        }
    }

    /// Drop whatever is held. Returns false when nothing was.
    pub fn cancel(&mut self) -> bool {
        if self.held.take().is_some() {
            self.feedback.clear();
            true
        } else {
            false
        }
    }

    fn report(&mut self, result: Result<(), MoveError>) -> bool {
        match result {
            Ok(()) => {
                let score = self.puzzle.score();
                self.feedback = format!("Score {}", score.final_score);
                true
            }
            Err(e) => {
                self.feedback = format_move_error(&e);
                false
            }
        }
    }
}

fn format_move_error(error: &MoveError) -> String {
    match error {
        MoveError::Occupied { .. } => "CLANK! That cell is taken".to_string(),
        MoveError::HandFull => "No room in the hand".to_string(),
        MoveError::NotActive => "The round is over".to_string(),
        other => other.to_string(),
    }
}
