//! SCRABDLE - a daily word-placement puzzle for the terminal
//!
//! Same tiles and rules for everyone, every day. Build words, beat the clock.

mod app;
mod config;
mod game;
mod stats;
mod storage;
mod tui;

use anyhow::Context;
use app::{AppCoordinator, Direction, Screen};
use clap::Parser;
use config::{Cli, Command, Options, Paths};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use game::dictionary::WordList;
use game::rng::{date_key, today};
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use storage::Storage;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tui::Tui;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let data_dir = Storage::data_dir().context("could not determine data directory")?;
    let paths = Paths::resolve(&cli.options, &data_dir);
    init_logging(&paths.log_file, cli.options.log_level.as_deref())?;

    match cli.command() {
        Command::Play => play(&cli.options, &paths),
        Command::Leaderboard { date, limit } => {
            print_leaderboard(&paths, date.unwrap_or_else(today), limit)
        }
        Command::Register => register(&paths),
    }
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(log_file: &Path, level: Option<&str>) -> anyhow::Result<()> {
    if let Some(dir) = log_file.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("opening log file {}", log_file.display()))?;

    let filter = match level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_storage(paths: &Paths) -> anyhow::Result<Storage> {
    Storage::open(&paths.database)
        .with_context(|| format!("opening database {}", paths.database.display()))
}

/// No configured word list means every word is rejected.
fn load_dictionary(path: Option<&Path>) -> anyhow::Result<WordList> {
    match path {
        Some(path) => {
            let words = WordList::load(path)
                .with_context(|| format!("reading dictionary {}", path.display()))?;
            info!(path = %path.display(), words = words.len(), "dictionary loaded");
            Ok(words)
        }
        None => {
            warn!("no dictionary found, no word will score");
            Ok(WordList::empty())
        }
    }
}

/// Warning shown in the feedback line when nothing can score.
fn dictionary_notice(words: &WordList) -> Option<&'static str> {
    words
        .is_empty()
        .then_some("No dictionary loaded, words will not score (see --dictionary)")
}

fn play(options: &Options, paths: &Paths) -> anyhow::Result<()> {
    let storage = open_storage(paths)?;
    let words = load_dictionary(paths.dictionary.as_deref())?;
    let notice = dictionary_notice(&words);
    let mut coordinator = AppCoordinator::new(storage, Arc::new(words), options.round_seconds, today());
    if let Some(notice) = notice {
        if coordinator.app.feedback.is_empty() {
            coordinator.app.feedback = notice.to_string();
        } else {
            coordinator.app.feedback = format!("{}  {}", notice, coordinator.app.feedback);
        }
    }

    let mut terminal = Tui::new().context("creating terminal")?;
    terminal.enter().context("entering raw mode")?;

    // Main event loop
    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| tui::render(frame, &coordinator))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut coordinator, key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            coordinator.tick();
            last_tick = Instant::now();
        }

        if coordinator.should_quit {
            break;
        }
    }

    info!("quit");
    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}

fn handle_key(coordinator: &mut AppCoordinator, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        coordinator.quit();
        return;
    }

    if matches!(coordinator.screen, Screen::PreGame { .. }) {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => coordinator.play(),
            KeyCode::Esc | KeyCode::Char('q') => coordinator.quit(),
            _ => {}
        }
        return;
    }

    if !matches!(coordinator.screen, Screen::Playing) {
        match key.code {
            KeyCode::Esc => coordinator.back(),
            KeyCode::Char('l') => coordinator.toggle_leaderboard(),
            KeyCode::Char('q') => coordinator.quit(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => coordinator.back(),
        KeyCode::Up => coordinator.app.move_cursor(Direction::Up),
        KeyCode::Down => coordinator.app.move_cursor(Direction::Down),
        KeyCode::Left => coordinator.app.move_cursor(Direction::Left),
        KeyCode::Right => coordinator.app.move_cursor(Direction::Right),
        KeyCode::Tab => coordinator.app.toggle_focus(),
        KeyCode::Enter | KeyCode::Char(' ') => coordinator.apply(|app| app.on_select()),
        KeyCode::Backspace | KeyCode::Delete => coordinator.apply(|app| app.on_return()),
        KeyCode::Char('r') => coordinator.apply(|app| app.on_refill()),
        KeyCode::Char('f') => coordinator.finish(),
        KeyCode::Char('l') => coordinator.toggle_leaderboard(),
        _ => {}
    }
}

fn print_leaderboard(paths: &Paths, date: chrono::NaiveDate, limit: usize) -> anyhow::Result<()> {
    let storage = open_storage(paths)?;
    let player_id = storage.local_player_id()?;
    let board = storage.leaderboard(&date_key(date), player_id, limit)?;

    println!("Leaderboard for {} ({} players)", board.date, board.total_players);
    if board.top.is_empty() {
        println!("No scores yet.");
        return Ok(());
    }
    for entry in &board.top {
        let marker = if Some(entry.player_id) == player_id { " <- you" } else { "" };
        println!("{}{}", tui::format_entry(entry), marker);
    }
    if let Some(own) = &board.player_rank {
        println!("...");
        println!("{} <- you", tui::format_entry(own));
    }
    Ok(())
}

fn register(paths: &Paths) -> anyhow::Result<()> {
    let mut storage = open_storage(paths)?;
    let existing = storage.local_player_id()?;
    let id = storage.ensure_local_player()?;
    if existing.is_some() {
        println!("Already registered as player {}", id);
    } else {
        println!("Registered as player {}", id);
    }

    let stats = storage.local_stats()?;
    println!("High score: {}", stats.high_score);
    if stats.played_on(&date_key(today())) {
        println!("Today's puzzle is already played.");
    }
    if let Some(last) = stats.last_game {
        println!("Last game: {} scored {}", last.date, last.score);
    }
    Ok(())
}
