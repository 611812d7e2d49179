//! Word scanner
//!
//! Walks every row left to right and every column top to bottom, collecting
//! maximal runs of adjacent tiles. A run of at least [`MIN_WORD_LENGTH`]
//! letters that the dictionary accepts becomes a found word. A tile is read
//! once per axis, so it can sit in one horizontal and one vertical word.

use super::board::{Grid, PlacedTile};
use super::dictionary::Dictionary;
use super::{Tile, TileId};
use std::collections::BTreeMap;

/// Shortest run that can score, whatever the dictionary says.
pub const MIN_WORD_LENGTH: usize = 3;

const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

/// Direction a word was read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// One valid word on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundWord {
    /// Uppercase, as spelled by the tiles
    pub text: String,
    /// Tiles in reading order
    pub tiles: Vec<Tile>,
    pub axis: Axis,
}

impl FoundWord {
    pub fn letter_count(&self) -> usize {
        self.tiles.len()
    }

    /// Sum of the tile values in this word.
    pub fn value(&self) -> u32 {
        self.tiles.iter().map(|t| t.value).sum()
    }

    pub fn has_vowel(&self) -> bool {
        self.text.chars().any(|c| VOWELS.contains(&c))
    }
}

/// Everything the rules get to look at. Rebuilt from scratch on every scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanContext {
    words: Vec<FoundWord>,
    valid_tiles: BTreeMap<TileId, Tile>,
    base_points: u32,
    total_lengths: u32,
}

impl ScanContext {
    /// Found words: rows top to bottom, then columns left to right.
    /// The same text found in two places appears twice.
    pub fn words(&self) -> &[FoundWord] {
        &self.words
    }

    /// Text of each found word, in discovery order.
    pub fn word_texts(&self) -> Vec<&str> {
        self.words.iter().map(|w| w.text.as_str()).collect()
    }

    /// Every tile in at least one found word, keyed by id.
    pub fn valid_tiles(&self) -> &BTreeMap<TileId, Tile> {
        &self.valid_tiles
    }

    pub fn is_valid_tile(&self, id: TileId) -> bool {
        self.valid_tiles.contains_key(&id)
    }

    /// Sum of values of the valid tiles, each tile counted once.
    pub fn base_points(&self) -> u32 {
        self.base_points
    }

    /// Sum of the lengths of all found words.
    pub fn total_lengths(&self) -> u32 {
        self.total_lengths
    }

    fn record(&mut self, text: String, tiles: Vec<Tile>, axis: Axis) {
        self.total_lengths += tiles.len() as u32;
        for tile in &tiles {
            self.valid_tiles.insert(tile.id, *tile);
        }
        self.words.push(FoundWord { text, tiles, axis });
    }
}

/// Reads a grid against an injected dictionary.
pub struct WordScanner<'d> {
    dictionary: &'d dyn Dictionary,
}

impl<'d> WordScanner<'d> {
    pub fn new(dictionary: &'d dyn Dictionary) -> Self {
        Self { dictionary }
    }

    /// Scan the whole grid.
    pub fn scan(&self, grid: &Grid) -> ScanContext {
        let mut ctx = ScanContext::default();
        for y in 0..grid.height() {
            self.scan_line(grid.row(y), Axis::Horizontal, &mut ctx);
        }
        for x in 0..grid.width() {
            self.scan_line(grid.column(x), Axis::Vertical, &mut ctx);
        }
        ctx.base_points = ctx.valid_tiles.values().map(|t| t.value).sum();
        ctx
    }

    fn scan_line<'g>(
        &self,
        line: impl Iterator<Item = Option<&'g PlacedTile>>,
        axis: Axis,
        ctx: &mut ScanContext,
    ) {
        let mut text = String::new();
        let mut tiles: Vec<Tile> = Vec::new();

        for cell in line {
            match cell {
                Some(placed) => {
                    text.push(placed.letter());
                    tiles.push(placed.tile);
                }
                None => self.flush(&mut text, &mut tiles, axis, ctx),
            }
        }
        self.flush(&mut text, &mut tiles, axis, ctx);
    }

    fn flush(&self, text: &mut String, tiles: &mut Vec<Tile>, axis: Axis, ctx: &mut ScanContext) {
        let run = std::mem::take(text);
        let run_tiles = std::mem::take(tiles);
        if run_tiles.len() < MIN_WORD_LENGTH {
            return;
        }
        if self.dictionary.has_word(&run.to_lowercase()) {
            ctx.record(run, run_tiles, axis);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::GRID_WIDTH;
    use crate::game::dictionary::WordList;
    use crate::game::letter_value;
    use crate::game::testing::lay;

    #[test]
    fn test_finds_horizontal_word() {
        let dict = WordList::from_words(["cat"]);
        let mut grid = Grid::default();
        lay(&mut grid, "CAT", 0, 0, Axis::Horizontal, 0);

        let ctx = WordScanner::new(&dict).scan(&grid);
        assert_eq!(ctx.word_texts(), vec!["CAT"]);
        assert_eq!(ctx.words()[0].axis, Axis::Horizontal);
        assert_eq!(ctx.base_points(), 5);
        assert_eq!(ctx.total_lengths(), 3);
    }

    #[test]
    fn test_finds_vertical_word() {
        let dict = WordList::from_words(["dog"]);
        let mut grid = Grid::default();
        lay(&mut grid, "DOG", 4, 2, Axis::Vertical, 0);

        let ctx = WordScanner::new(&dict).scan(&grid);
        assert_eq!(ctx.word_texts(), vec!["DOG"]);
        assert_eq!(ctx.words()[0].axis, Axis::Vertical);
        assert_eq!(ctx.base_points(), 5);
    }

    #[test]
    fn test_unknown_word_scores_nothing() {
        let dict = WordList::from_words(["cat"]);
        let mut grid = Grid::default();
        lay(&mut grid, "TAC", 0, 0, Axis::Horizontal, 0);

        let ctx = WordScanner::new(&dict).scan(&grid);
        assert!(ctx.words().is_empty());
        assert_eq!(ctx.base_points(), 0);
        assert!(!ctx.is_valid_tile(0));
    }

    #[test]
    fn test_two_letter_words_never_score() {
        let dict = WordList::from_words(["at", "it"]);
        let mut grid = Grid::default();
        lay(&mut grid, "AT", 0, 0, Axis::Horizontal, 0);

        let ctx = WordScanner::new(&dict).scan(&grid);
        assert!(ctx.words().is_empty());
        assert_eq!(ctx.total_lengths(), 0);
    }

    #[test]
    fn test_full_row_word() {
        let word = "DICTIONARIES";
        assert_eq!(word.len(), GRID_WIDTH);
        let dict = WordList::from_words(["dictionaries"]);
        let mut grid = Grid::default();
        lay(&mut grid, word, 0, 6, Axis::Horizontal, 0);

        let ctx = WordScanner::new(&dict).scan(&grid);
        assert_eq!(ctx.total_lengths(), 12);
        assert_eq!(ctx.valid_tiles().len(), 12);
        let expected: u32 = word.chars().map(|c| letter_value(c).unwrap()).sum();
        assert_eq!(ctx.base_points(), expected);
    }

    #[test]
    fn test_run_must_be_maximal() {
        // "CATS" is one run; "CAT" inside it is not read separately
        let dict = WordList::from_words(["cat"]);
        let mut grid = Grid::default();
        lay(&mut grid, "CATS", 0, 0, Axis::Horizontal, 0);

        let ctx = WordScanner::new(&dict).scan(&grid);
        assert!(ctx.words().is_empty());
    }

    #[test]
    fn test_gap_splits_runs() {
        let dict = WordList::from_words(["cat", "dog"]);
        let mut grid = Grid::default();
        lay(&mut grid, "CAT", 0, 0, Axis::Horizontal, 0);
        lay(&mut grid, "DOG", 4, 0, Axis::Horizontal, 10);

        let ctx = WordScanner::new(&dict).scan(&grid);
        assert_eq!(ctx.word_texts(), vec!["CAT", "DOG"]);
        assert_eq!(ctx.total_lengths(), 6);
    }

    #[test]
    fn test_word_touching_line_end() {
        let dict = WordList::from_words(["dog"]);
        let mut grid = Grid::default();
        lay(&mut grid, "DOG", GRID_WIDTH - 3, 0, Axis::Horizontal, 0);

        let ctx = WordScanner::new(&dict).scan(&grid);
        assert_eq!(ctx.word_texts(), vec!["DOG"]);
    }

    #[test]
    fn test_crossing_words_share_tile_once() {
        // CAT across, ARE down through the A
        let dict = WordList::from_words(["cat", "are"]);
        let mut grid = Grid::default();
        lay(&mut grid, "CAT", 0, 0, Axis::Horizontal, 0);
        lay(&mut grid, "RE", 1, 1, Axis::Vertical, 10);

        let ctx = WordScanner::new(&dict).scan(&grid);
        assert_eq!(ctx.word_texts(), vec!["CAT", "ARE"]);
        assert_eq!(ctx.total_lengths(), 6);
        assert_eq!(ctx.valid_tiles().len(), 5);
        // C3 A1 T1 R1 E1, the shared A counted once
        assert_eq!(ctx.base_points(), 7);
    }

    #[test]
    fn test_repeated_word_counted_per_occurrence() {
        let dict = WordList::from_words(["cat"]);
        let mut grid = Grid::default();
        lay(&mut grid, "CAT", 0, 0, Axis::Horizontal, 0);
        lay(&mut grid, "CAT", 0, 2, Axis::Horizontal, 10);

        let ctx = WordScanner::new(&dict).scan(&grid);
        assert_eq!(ctx.words().len(), 2);
        assert_eq!(ctx.total_lengths(), 6);
        assert_eq!(ctx.base_points(), 10);
        assert_eq!(ctx.words()[0].tiles[0].id, 0);
        assert_eq!(ctx.words()[1].tiles[0].id, 10);
    }

    #[test]
    fn test_empty_dictionary_and_grid() {
        let dict = WordList::empty();
        let mut grid = Grid::default();
        let ctx = WordScanner::new(&dict).scan(&grid);
        assert_eq!(ctx, ScanContext::default());

        lay(&mut grid, "CAT", 0, 0, Axis::Horizontal, 0);
        let ctx = WordScanner::new(&dict).scan(&grid);
        assert!(ctx.words().is_empty());
    }

    #[test]
    fn test_found_word_helpers() {
        let dict = WordList::from_words(["zag", "shh"]);
        let mut grid = Grid::default();
        lay(&mut grid, "ZAG", 0, 0, Axis::Horizontal, 0);
        lay(&mut grid, "SHH", 0, 2, Axis::Horizontal, 10);

        let ctx = WordScanner::new(&dict).scan(&grid);
        let zag = &ctx.words()[0];
        assert_eq!(zag.value(), 13);
        assert!(zag.has_vowel());
        assert!(!ctx.words()[1].has_vowel());
    }
}
