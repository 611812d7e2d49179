//! Daily leaderboard ranking and player statistics
//!
//! Scores for a day are ranked by score, highest first. Equal scores go to
//! whoever finished faster, then to the earlier registered player so the
//! order is total.

use std::cmp::Reverse;

/// Entries shown at the top of a leaderboard
pub const DEFAULT_TOP_N: usize = 10;

/// One player's submitted result for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyScore {
    pub player_id: i64,
    pub score: u32,
    /// Seconds the player used
    pub time_taken: u32,
}

/// A ranked line of the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based
    pub rank: usize,
    pub player_id: i64,
    pub score: u32,
    pub time_taken: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub date: String,
    pub top: Vec<LeaderboardEntry>,
    /// The asking player's own line, only when it is not already in `top`
    pub player_rank: Option<LeaderboardEntry>,
    /// Number of players who submitted that day
    pub total_players: usize,
}

impl Leaderboard {
    /// The player's line wherever it appears.
    pub fn entry_for(&self, player_id: i64) -> Option<&LeaderboardEntry> {
        self.top
            .iter()
            .chain(self.player_rank.iter())
            .find(|e| e.player_id == player_id)
    }
}

/// Rank a day's scores and cut the top `limit`.
pub fn rank_scores(
    date: &str,
    mut scores: Vec<DailyScore>,
    player_id: Option<i64>,
    limit: usize,
) -> Leaderboard {
    scores.sort_by_key(|s| (Reverse(s.score), s.time_taken, s.player_id));

    let ranked = scores
        .iter()
        .enumerate()
        .map(|(i, s)| LeaderboardEntry {
            rank: i + 1,
            player_id: s.player_id,
            score: s.score,
            time_taken: s.time_taken,
        });

    let mut top = Vec::with_capacity(limit.min(scores.len()));
    let mut player_rank = None;
    for entry in ranked {
        if entry.rank <= limit {
            top.push(entry);
        } else if Some(entry.player_id) == player_id {
            player_rank = Some(entry);
            break;
        }
    }

    Leaderboard {
        date: date.to_string(),
        top,
        player_rank,
        total_players: scores.len(),
    }
}

/// The last finished game on this device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastGame {
    pub date: String,
    pub score: u32,
}

/// What the local player knows about themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub player_id: Option<i64>,
    pub high_score: u32,
    pub last_game: Option<LastGame>,
}

impl PlayerStats {
    /// Record a finished game. Returns true when it beats the high score.
    pub fn record_game(&mut self, date: &str, score: u32) -> bool {
        self.last_game = Some(LastGame {
            date: date.to_string(),
            score,
        });
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }

    /// Whether a game has already been finished on `date`.
    pub fn played_on(&self, date: &str) -> bool {
        self.last_game.as_ref().is_some_and(|g| g.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(player_id: i64, score: u32, time_taken: u32) -> DailyScore {
        DailyScore {
            player_id,
            score,
            time_taken,
        }
    }

    #[test]
    fn test_orders_by_score_then_time() {
        let scores = vec![score(1, 50, 100), score(2, 80, 200), score(3, 80, 150)];
        let board = rank_scores("2025-10-19", scores, None, DEFAULT_TOP_N);

        let order: Vec<i64> = board.top.iter().map(|e| e.player_id).collect();
        assert_eq!(order, vec![3, 2, 1]);
        assert_eq!(board.top[0].rank, 1);
        assert_eq!(board.top[2].rank, 3);
        assert_eq!(board.total_players, 3);
        assert!(board.player_rank.is_none());
    }

    #[test]
    fn test_full_tie_is_stable() {
        let scores = vec![score(9, 10, 60), score(4, 10, 60)];
        let board = rank_scores("d", scores, None, DEFAULT_TOP_N);
        assert_eq!(board.top[0].player_id, 4);
        assert_eq!(board.top[1].player_id, 9);
    }

    #[test]
    fn test_player_outside_top_gets_rank() {
        let scores: Vec<DailyScore> = (1..=15).map(|id| score(id, 100 - id as u32, 30)).collect();
        let board = rank_scores("d", scores, Some(13), DEFAULT_TOP_N);

        assert_eq!(board.top.len(), 10);
        let own = board.player_rank.unwrap();
        assert_eq!(own.player_id, 13);
        assert_eq!(own.rank, 13);
        assert_eq!(board.entry_for(13), Some(&own));
    }

    #[test]
    fn test_player_inside_top_has_no_extra_rank() {
        let scores: Vec<DailyScore> = (1..=15).map(|id| score(id, 100 - id as u32, 30)).collect();
        let board = rank_scores("d", scores, Some(2), DEFAULT_TOP_N);

        assert!(board.player_rank.is_none());
        assert_eq!(board.entry_for(2).unwrap().rank, 2);
    }

    #[test]
    fn test_player_without_score() {
        let board = rank_scores("d", vec![score(1, 5, 5)], Some(99), DEFAULT_TOP_N);
        assert!(board.player_rank.is_none());
        assert!(board.entry_for(99).is_none());
    }

    #[test]
    fn test_empty_day() {
        let board = rank_scores("d", Vec::new(), Some(1), DEFAULT_TOP_N);
        assert!(board.top.is_empty());
        assert_eq!(board.total_players, 0);
    }

    #[test]
    fn test_record_game() {
        let mut stats = PlayerStats::default();
        assert!(stats.record_game("2025-10-18", 40));
        assert!(!stats.record_game("2025-10-19", 30));
        assert_eq!(stats.high_score, 40);
        assert!(stats.played_on("2025-10-19"));
        assert!(!stats.played_on("2025-10-18"));
        assert!(stats.record_game("2025-10-20", 41));
    }
}
