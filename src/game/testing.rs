//! Helpers shared by the game tests

use super::board::Grid;
use super::dictionary::WordList;
use super::scanner::{Axis, ScanContext, WordScanner};
use super::{letter_value, Tile};

/// Lay `word` on the grid from (x, y) along `axis`, ids counting up from `first_id`.
pub fn lay(grid: &mut Grid, word: &str, x: usize, y: usize, axis: Axis, first_id: u32) {
    for (i, letter) in word.chars().enumerate() {
        let tile = Tile {
            id: first_id + i as u32,
            letter,
            value: letter_value(letter).unwrap(),
        };
        let (tx, ty) = match axis {
            Axis::Horizontal => (x + i, y),
            Axis::Vertical => (x, y + i),
        };
        grid.place(tile, tx, ty).unwrap();
    }
}

/// Lay each word on its own row (ids spaced by 100) and scan with a
/// dictionary holding exactly those words.
pub fn context_for(words: &[&str]) -> ScanContext {
    let dict = WordList::from_words(words.iter().copied());
    let mut grid = Grid::default();
    for (row, word) in words.iter().enumerate() {
        lay(&mut grid, word, 0, row * 2, Axis::Horizontal, row as u32 * 100);
    }
    WordScanner::new(&dict).scan(&grid)
}
