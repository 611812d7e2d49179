//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - Player registration with sequential numeric ids
//! - Daily score submission (first of the day wins) and high scores
//! - Leaderboard queries
//! - The saved state of today's puzzle

use crate::stats::{rank_scores, DailyScore, LastGame, Leaderboard, PlayerStats};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: players, counters, daily scores and saved puzzles
const SCHEMA_VERSION: u32 = 1;

/// Name of the counter that hands out player ids
const PLAYER_ID_COUNTER: &str = "player_id";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("could not determine data directory")]
    NoDataDirectory,
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(#[source] std::io::Error),
    #[error("player {0} is not registered")]
    UnknownPlayer(i64),
}

/// The storage handle for players, scores and saved puzzles.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the database at `path`, creating its directory.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(StorageError::CreateDirFailed)?;
        }
        let conn = Connection::open(path)?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        debug!(path = %path.display(), "opened storage");
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory.
    ///
    /// - Linux: `$XDG_DATA_HOME/scrabdle/` or `~/.local/share/scrabdle/`
    /// - macOS: `~/Library/Application Support/scrabdle/`
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "scrabdle")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    // === Players ===

    /// Hand out the next player id and create the player with a zero high score.
    pub fn register_player(&mut self) -> Result<i64, StorageError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO counters (name, value) VALUES (?1, 1)
             ON CONFLICT(name) DO UPDATE SET value = value + 1",
            params![PLAYER_ID_COUNTER],
        )?;
        let id: i64 = tx.query_row(
            "SELECT value FROM counters WHERE name = ?1",
            params![PLAYER_ID_COUNTER],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO players (id, high_score, created_at) VALUES (?1, 0, ?2)",
            params![id, now_millis()],
        )?;
        tx.commit()?;

        info!(player_id = id, "registered player");
        Ok(id)
    }

    pub fn player_exists(&self, player_id: i64) -> Result<bool, StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM players WHERE id = ?1",
            params![player_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// The player registered on this device, if any.
    pub fn local_player_id(&self) -> Result<Option<i64>, StorageError> {
        let id = self
            .conn
            .query_row("SELECT local_player_id FROM meta LIMIT 1", [], |row| {
                row.get::<_, Option<i64>>(0)
            })
            .optional()?
            .flatten();
        Ok(id)
    }

    /// Return the local player id, registering one on first use.
    pub fn ensure_local_player(&mut self) -> Result<i64, StorageError> {
        if let Some(id) = self.local_player_id()? {
            return Ok(id);
        }
        let id = self.register_player()?;
        self.conn
            .execute("UPDATE meta SET local_player_id = ?1", params![id])?;
        Ok(id)
    }

    /// Remember the last finished game on this device.
    pub fn record_last_game(&self, date: &str, score: u32) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE meta SET last_game_date = ?1, last_game_score = ?2",
            params![date, score],
        )?;
        Ok(())
    }

    /// Local player id, high score and last game.
    pub fn local_stats(&self) -> Result<PlayerStats, StorageError> {
        let (player_id, date, score) = self.conn.query_row(
            "SELECT local_player_id, last_game_date, last_game_score FROM meta LIMIT 1",
            [],
            |row| {
                Ok((
                    row.get::<_, Option<i64>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<u32>>(2)?,
                ))
            },
        )?;

        let high_score = match player_id {
            Some(id) => self.high_score(id)?.unwrap_or(0),
            None => 0,
        };
        let last_game = date.zip(score).map(|(date, score)| LastGame { date, score });

        Ok(PlayerStats {
            player_id,
            high_score,
            last_game,
        })
    }

    // === Scores ===

    /// Record a player's score for a date. Only the first submission of a
    /// day counts; returns whether this one was recorded.
    pub fn submit_daily_score(
        &self,
        player_id: i64,
        date: &str,
        score: u32,
        time_taken: u32,
    ) -> Result<bool, StorageError> {
        if !self.player_exists(player_id)? {
            return Err(StorageError::UnknownPlayer(player_id));
        }
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO daily_scores (player_id, date, score, time_taken, submitted_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![player_id, date, score, time_taken, now_millis()],
        )?;
        if inserted > 0 {
            info!(player_id, date, score, time_taken, "daily score submitted");
        } else {
            debug!(player_id, date, "daily score already submitted");
        }
        Ok(inserted > 0)
    }

    /// Raise a player's high score. Returns whether it changed.
    pub fn update_high_score(&self, player_id: i64, score: u32) -> Result<bool, StorageError> {
        let current = self
            .high_score(player_id)?
            .ok_or(StorageError::UnknownPlayer(player_id))?;
        if score <= current {
            return Ok(false);
        }
        self.conn.execute(
            "UPDATE players SET high_score = ?2 WHERE id = ?1",
            params![player_id, score],
        )?;
        info!(player_id, score, previous = current, "new high score");
        Ok(true)
    }

    pub fn high_score(&self, player_id: i64) -> Result<Option<u32>, StorageError> {
        let score = self
            .conn
            .query_row(
                "SELECT high_score FROM players WHERE id = ?1",
                params![player_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(score)
    }

    /// All scores submitted for a date.
    pub fn daily_scores(&self, date: &str) -> Result<Vec<DailyScore>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT player_id, score, time_taken FROM daily_scores
             WHERE date = ?1 ORDER BY score DESC, time_taken ASC",
        )?;
        let rows = stmt.query_map(params![date], |row| {
            Ok(DailyScore {
                player_id: row.get(0)?,
                score: row.get(1)?,
                time_taken: row.get(2)?,
            })
        })?;

        let mut scores = Vec::new();
        for row in rows {
            scores.push(row?);
        }
        Ok(scores)
    }

    /// Top `limit` scores for a date, plus the player's own rank below them.
    pub fn leaderboard(
        &self,
        date: &str,
        player_id: Option<i64>,
        limit: usize,
    ) -> Result<Leaderboard, StorageError> {
        let scores = self.daily_scores(date)?;
        Ok(rank_scores(date, scores, player_id, limit))
    }

    // === Saved puzzle ===

    /// Save the puzzle state for a date, dropping saves for earlier dates.
    pub fn save_puzzle(&mut self, date: &str, state: &str) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO saved_puzzles (date, state, saved_at) VALUES (?1, ?2, ?3)",
            params![date, state, now_millis()],
        )?;
        tx.execute("DELETE FROM saved_puzzles WHERE date < ?1", params![date])?;
        tx.commit()?;
        Ok(())
    }

    pub fn load_puzzle(&self, date: &str) -> Result<Option<String>, StorageError> {
        let state = self
            .conn
            .query_row(
                "SELECT state FROM saved_puzzles WHERE date = ?1",
                params![date],
                |row| row.get(0),
            )
            .optional()?;
        Ok(state)
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: schema version and this device's player
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                local_player_id INTEGER,
                last_game_date TEXT,
                last_game_score INTEGER,
                created_at INTEGER NOT NULL
            );

            -- Named counters, incremented atomically
            CREATE TABLE counters (
                name TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            );

            CREATE TABLE players (
                id INTEGER PRIMARY KEY,
                high_score INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            );

            -- One row per player per day; the first submission wins
            CREATE TABLE daily_scores (
                player_id INTEGER NOT NULL REFERENCES players (id),
                date TEXT NOT NULL,
                score INTEGER NOT NULL,
                time_taken INTEGER NOT NULL,
                submitted_at INTEGER NOT NULL,
                PRIMARY KEY (player_id, date)
            );

            CREATE INDEX idx_daily_scores_rank ON daily_scores (date, score DESC, time_taken);

            -- In-progress puzzle state, keyed by YYYY-MM-DD
            CREATE TABLE saved_puzzles (
                date TEXT PRIMARY KEY,
                state TEXT NOT NULL,
                saved_at INTEGER NOT NULL
            );
            "#,
        )?;

        self.conn.execute(
            "INSERT INTO meta (schema_version, local_player_id, created_at) VALUES (?1, NULL, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
