//! Grid, hand and bag: where the day's tiles live
//!
//! A tile is in exactly one of the three places at any time. The grid keeps
//! each tile's coordinates in step with its cell; the found/rule annotations
//! are written only by the scoring pass.

use super::Tile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Grid columns
pub const GRID_WIDTH: usize = 12;
/// Grid rows
pub const GRID_HEIGHT: usize = 12;
/// Slots in the player's hand
pub const HAND_SLOTS: usize = 24;

/// Why a move was refused. A refused move never changes any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the puzzle is not accepting moves")]
    NotActive,
    #[error("cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: usize, y: usize },
    #[error("cell ({x}, {y}) is already occupied")]
    Occupied { x: usize, y: usize },
    #[error("cell ({x}, {y}) is empty")]
    EmptyCell { x: usize, y: usize },
    #[error("hand slot {0} does not exist")]
    NoSuchSlot(usize),
    #[error("hand slot {0} is empty")]
    EmptySlot(usize),
    #[error("no free slot in the hand")]
    HandFull,
    #[error("a tile cannot be moved onto itself")]
    SameCell,
}

/// A tile sitting on the grid, with the annotations from the last scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTile {
    #[serde(flatten)]
    pub tile: Tile,
    pub grid_x: usize,
    pub grid_y: usize,
    /// Part of at least one valid word
    pub is_found: bool,
    /// Rules whose bonus this tile contributed to
    pub applied_rule_ids: BTreeSet<String>,
}

impl PlacedTile {
    fn new(tile: Tile, x: usize, y: usize) -> Self {
        Self {
            tile,
            grid_x: x,
            grid_y: y,
            is_found: false,
            applied_rule_ids: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.tile.id
    }

    pub fn letter(&self) -> char {
        self.tile.letter
    }

}

/// Row-major board of optional tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<PlacedTile>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}

impl Grid {
    /// Create an empty grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, MoveError> {
        if x < self.width && y < self.height {
            Ok(y * self.width + x)
        } else {
            Err(MoveError::OutOfBounds { x, y })
        }
    }

    /// Tile at a cell, `None` for empty or out-of-bounds cells.
    pub fn get(&self, x: usize, y: usize) -> Option<&PlacedTile> {
        self.index(x, y).ok().and_then(|i| self.cells[i].as_ref())
    }

    /// Put a tile on an empty cell.
    pub fn place(&mut self, tile: Tile, x: usize, y: usize) -> Result<(), MoveError> {
        let i = self.index(x, y)?;
        if self.cells[i].is_some() {
            return Err(MoveError::Occupied { x, y });
        }
        self.cells[i] = Some(PlacedTile::new(tile, x, y));
        Ok(())
    }

    /// Lift a tile off the grid.
    pub fn remove(&mut self, x: usize, y: usize) -> Result<Tile, MoveError> {
        let i = self.index(x, y)?;
        self.cells[i]
            .take()
            .map(|placed| placed.tile)
            .ok_or(MoveError::EmptyCell { x, y })
    }

    /// Move a tile to another cell. An occupied destination swaps the two tiles.
    pub fn move_tile(&mut self, from: (usize, usize), to: (usize, usize)) -> Result<(), MoveError> {
        let src = self.index(from.0, from.1)?;
        let dst = self.index(to.0, to.1)?;
        if src == dst {
            return Err(MoveError::SameCell);
        }
        if self.cells[src].is_none() {
            return Err(MoveError::EmptyCell { x: from.0, y: from.1 });
        }

        self.cells.swap(src, dst);
        for (i, (x, y)) in [(src, from), (dst, to)] {
            if let Some(placed) = self.cells[i].take() {
                self.cells[i] = Some(PlacedTile::new(placed.tile, x, y));
            }
        }
        Ok(())
    }

    /// One row, left to right.
    pub fn row(&self, y: usize) -> impl Iterator<Item = Option<&PlacedTile>> + '_ {
        let start = y * self.width;
        self.cells[start..start + self.width].iter().map(Option::as_ref)
    }

    /// One column, top to bottom.
    pub fn column(&self, x: usize) -> impl Iterator<Item = Option<&PlacedTile>> + '_ {
        (0..self.height).map(move |y| self.cells[y * self.width + x].as_ref())
    }

    /// Every placed tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &PlacedTile> {
        self.cells.iter().flatten()
    }

    pub(crate) fn tiles_mut(&mut self) -> impl Iterator<Item = &mut PlacedTile> {
        self.cells.iter_mut().flatten()
    }

    /// Number of placed tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// True when the cell vector matches the dimensions and every tile's
    /// coordinates match its cell.
    pub fn is_consistent(&self) -> bool {
        self.cells.len() == self.width * self.height
            && self.cells.iter().enumerate().all(|(i, cell)| match cell {
                Some(placed) => placed.grid_x == i % self.width && placed.grid_y == i / self.width,
                None => true,
            })
    }
}

/// Fixed number of slots holding tiles not yet on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    slots: Vec<Option<Tile>>,
}

impl Default for Hand {
    fn default() -> Self {
        Self::new(HAND_SLOTS)
    }
}

impl Hand {
    /// Create an empty hand.
    pub fn new(slots: usize) -> Self {
        Self {
            slots: vec![None; slots],
        }
    }

    pub fn slots(&self) -> &[Option<Tile>] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, slot: usize) -> Option<&Tile> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Take the tile out of a slot.
    pub fn take(&mut self, slot: usize) -> Result<Tile, MoveError> {
        self.slots
            .get_mut(slot)
            .ok_or(MoveError::NoSuchSlot(slot))?
            .take()
            .ok_or(MoveError::EmptySlot(slot))
    }

    /// Put a tile back into a slot it was taken from.
    pub(crate) fn restore(&mut self, slot: usize, tile: Tile) {
        if let Some(cell) = self.slots.get_mut(slot) {
            *cell = Some(tile);
        }
    }

    /// Put a tile into the first empty slot, returning the slot used.
    pub fn insert(&mut self, tile: Tile) -> Result<usize, MoveError> {
        let slot = self.first_empty().ok_or(MoveError::HandFull)?;
        self.slots[slot] = Some(tile);
        Ok(slot)
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Tiles currently held.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.slots.iter().flatten()
    }

    /// Fill empty slots from the bag, in slot order. Returns how many tiles were drawn.
    pub fn fill_from(&mut self, bag: &mut Bag) -> usize {
        let mut drawn = 0;
        for slot in self.slots.iter_mut().filter(|s| s.is_none()) {
            match bag.draw() {
                Some(tile) => {
                    *slot = Some(tile);
                    drawn += 1;
                }
                None => break,
            }
        }
        drawn
    }
}

/// Undealt tiles. Drawn from the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bag {
    tiles: Vec<Tile>,
}

impl Bag {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    /// Take the next tile.
    pub fn draw(&mut self) -> Option<Tile> {
        self.tiles.pop()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(id: u32, letter: char) -> Tile {
        Tile { id, letter, value: 1 }
    }

    #[test]
    fn test_place_sets_coordinates() {
        let mut grid = Grid::default();
        grid.place(tile(1, 'A'), 3, 5).unwrap();

        let placed = grid.get(3, 5).unwrap();
        assert_eq!((placed.grid_x, placed.grid_y), (3, 5));
        assert!(!placed.is_found);
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_place_on_occupied_cell_rejected() {
        let mut grid = Grid::default();
        grid.place(tile(1, 'A'), 0, 0).unwrap();
        assert_eq!(
            grid.place(tile(2, 'B'), 0, 0),
            Err(MoveError::Occupied { x: 0, y: 0 })
        );
        assert_eq!(grid.get(0, 0).unwrap().id(), 1);
    }

    #[test]
    fn test_place_out_of_bounds_rejected() {
        let mut grid = Grid::default();
        assert_eq!(
            grid.place(tile(1, 'A'), GRID_WIDTH, 0),
            Err(MoveError::OutOfBounds { x: GRID_WIDTH, y: 0 })
        );
        assert_eq!(grid.tile_count(), 0);
    }

    #[test]
    fn test_move_to_empty_cell() {
        let mut grid = Grid::default();
        grid.place(tile(1, 'A'), 0, 0).unwrap();
        grid.move_tile((0, 0), (4, 2)).unwrap();

        assert!(grid.get(0, 0).is_none());
        let placed = grid.get(4, 2).unwrap();
        assert_eq!(placed.id(), 1);
        assert_eq!((placed.grid_x, placed.grid_y), (4, 2));
    }

    #[test]
    fn test_move_onto_occupied_cell_swaps() {
        let mut grid = Grid::default();
        grid.place(tile(1, 'A'), 0, 0).unwrap();
        grid.place(tile(2, 'B'), 1, 0).unwrap();
        grid.move_tile((0, 0), (1, 0)).unwrap();

        assert_eq!(grid.get(0, 0).unwrap().letter(), 'B');
        assert_eq!(grid.get(1, 0).unwrap().letter(), 'A');
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_move_clears_annotations() {
        let mut grid = Grid::default();
        grid.place(tile(1, 'A'), 0, 0).unwrap();
        for placed in grid.tiles_mut() {
            placed.is_found = true;
            placed.applied_rule_ids.insert("len_3".to_string());
        }
        grid.move_tile((0, 0), (0, 1)).unwrap();

        let placed = grid.get(0, 1).unwrap();
        assert!(!placed.is_found);
        assert!(placed.applied_rule_ids.is_empty());
    }

    #[test]
    fn test_move_errors() {
        let mut grid = Grid::default();
        grid.place(tile(1, 'A'), 0, 0).unwrap();
        assert_eq!(grid.move_tile((0, 0), (0, 0)), Err(MoveError::SameCell));
        assert_eq!(
            grid.move_tile((5, 5), (0, 0)),
            Err(MoveError::EmptyCell { x: 5, y: 5 })
        );
        assert_eq!(
            grid.move_tile((0, 0), (0, 99)),
            Err(MoveError::OutOfBounds { x: 0, y: 99 })
        );
    }

    #[test]
    fn test_row_and_column_views() {
        let mut grid = Grid::default();
        grid.place(tile(1, 'A'), 2, 1).unwrap();

        let row: Vec<_> = grid.row(1).collect();
        assert_eq!(row.len(), GRID_WIDTH);
        assert_eq!(row[2].unwrap().id(), 1);

        let column: Vec<_> = grid.column(2).collect();
        assert_eq!(column.len(), GRID_HEIGHT);
        assert_eq!(column[1].unwrap().id(), 1);
    }

    #[test]
    fn test_hand_take_and_insert() {
        let mut hand = Hand::new(3);
        assert_eq!(hand.insert(tile(1, 'A')), Ok(0));
        assert_eq!(hand.insert(tile(2, 'B')), Ok(1));
        assert_eq!(hand.take(0).unwrap().id, 1);
        assert_eq!(hand.take(0), Err(MoveError::EmptySlot(0)));
        assert_eq!(hand.take(7), Err(MoveError::NoSuchSlot(7)));
        assert_eq!(hand.first_empty(), Some(0));
    }

    #[test]
    fn test_hand_full() {
        let mut hand = Hand::new(1);
        hand.insert(tile(1, 'A')).unwrap();
        assert_eq!(hand.insert(tile(2, 'B')), Err(MoveError::HandFull));
    }

    #[test]
    fn test_fill_from_bag_pops_from_end() {
        let mut bag = Bag::new(vec![tile(1, 'A'), tile(2, 'B'), tile(3, 'C')]);
        let mut hand = Hand::new(2);
        assert_eq!(hand.fill_from(&mut bag), 2);
        assert_eq!(hand.get(0).unwrap().id, 3);
        assert_eq!(hand.get(1).unwrap().id, 2);
        assert_eq!(bag.len(), 1);

        hand.take(1).unwrap();
        assert_eq!(hand.fill_from(&mut bag), 1);
        assert_eq!(hand.get(1).unwrap().id, 1);
        assert!(bag.is_empty());
        hand.take(0).unwrap();
        assert_eq!(hand.fill_from(&mut bag), 0);
    }
}
