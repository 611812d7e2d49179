//! Date-seeded randomness for the daily puzzle
//!
//! A mulberry32 generator: a 32-bit state advanced by a fixed increment and
//! mixed through multiply/xor-shift steps on every draw. The seed is local
//! midnight of the calendar day in epoch milliseconds, so everyone playing on
//! the same day sees the same bag and the same rules.

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use rand::RngCore;

/// Added to the state before every draw.
const STATE_INCREMENT: u32 = 0x6D2B_79F5;

/// Divisor mapping a `u32` draw onto [0, 1).
const U32_RANGE: f64 = 4_294_967_296.0;

/// Deterministic generator for one day's puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRng {
    state: u32,
}

impl DailyRng {
    /// Create a generator from an integer seed. Only the low 32 bits matter.
    pub fn new(seed: u64) -> Self {
        Self { state: seed as u32 }
    }

    /// Create the generator for a calendar day.
    pub fn for_date(date: NaiveDate) -> Self {
        Self::new(daily_seed(date))
    }

    /// Next float in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / U32_RANGE
    }

    /// Uniform index in `0..len`, computed as `floor(next_f64() * len)`.
    ///
    /// `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index drawn from an empty range");
        let i = (self.next_f64() * len as f64) as usize;
        i.min(len - 1)
    }

    /// In-place Fisher-Yates shuffle, one draw per swap.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

impl RngCore for DailyRng {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(STATE_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_u32());
        let hi = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Seed for a calendar day: local midnight as epoch milliseconds.
///
/// Falls back to UTC midnight when local midnight does not exist
/// (a DST jump over 00:00).
pub fn daily_seed(date: NaiveDate) -> u64 {
    let midnight = date.and_time(NaiveTime::MIN);
    let millis = Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis());
    millis as u64
}

/// Today's local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `YYYY-MM-DD` key used for persistence and score submission.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
