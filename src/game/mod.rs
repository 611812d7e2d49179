//! Game logic: tiles, the daily bag, word scanning, rules and scoring

pub mod board;
pub mod dictionary;
pub mod puzzle;
pub mod rng;
pub mod rules;
pub mod scanner;
pub mod scoring;
#[cfg(test)]
mod testing;

use board::{Bag, Hand};
use rng::DailyRng;
use serde::{Deserialize, Serialize};

/// Unique tile identity, assigned when the bag is built.
pub type TileId = u32;

/// Letter, copies in the bag, point value.
/// Common letters are cheap, rare ones (J, Q, X, Z) are worth 8-10.
pub const LETTER_TABLE: [(char, u32, u32); 26] = [
    ('A', 13, 1),
    ('B', 3, 3),
    ('C', 3, 3),
    ('D', 6, 2),
    ('E', 18, 1),
    ('F', 3, 4),
    ('G', 4, 2),
    ('H', 3, 4),
    ('I', 12, 1),
    ('J', 2, 8),
    ('K', 2, 5),
    ('L', 5, 1),
    ('M', 3, 3),
    ('N', 8, 1),
    ('O', 11, 1),
    ('P', 3, 3),
    ('Q', 2, 10),
    ('R', 9, 1),
    ('S', 6, 1),
    ('T', 9, 1),
    ('U', 6, 1),
    ('V', 3, 4),
    ('W', 3, 4),
    ('X', 2, 8),
    ('Y', 3, 4),
    ('Z', 2, 10),
];

/// A lettered piece. Never changes once built; its id follows it between
/// bag, hand and grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub letter: char,
    pub value: u32,
}

/// Point value of a letter (case-insensitive).
pub fn letter_value(letter: char) -> Option<u32> {
    let upper = letter.to_ascii_uppercase();
    LETTER_TABLE
        .iter()
        .find(|(c, _, _)| *c == upper)
        .map(|(_, _, value)| *value)
}

/// Total number of tiles in a full bag.
pub fn total_tiles() -> usize {
    LETTER_TABLE.iter().map(|(_, count, _)| *count as usize).sum()
}

/// Expand the letter table into tiles with sequential ids, then shuffle.
pub fn build_bag(rng: &mut DailyRng) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(total_tiles());
    let mut next_id: TileId = 0;
    for &(letter, count, value) in &LETTER_TABLE {
        for _ in 0..count {
            tiles.push(Tile {
                id: next_id,
                letter,
                value,
            });
            next_id += 1;
        }
    }
    rng.shuffle(&mut tiles);
    tiles
}

/// Build the day's bag and deal the opening hand from its end.
pub fn deal(rng: &mut DailyRng, hand_slots: usize) -> (Hand, Bag) {
    let mut bag = Bag::new(build_bag(rng));
    let mut hand = Hand::new(hand_slots);
    hand.fill_from(&mut bag);
    (hand, bag)
}
