//! UI rendering using ratatui
//!
//! Screens:
//! - PreGame: today's rules and a prompt to start or continue
//! - Playing: grid, hand, rules, score formula and timer
//! - Leaderboard: today's top scores and the player's own rank
//! - Error: error message display

use crate::app::state::HAND_ROW_LEN;
use crate::app::{App, AppCoordinator, Focus, Held, Screen};
use crate::game::board::PlacedTile;
use crate::game::puzzle::DailyPuzzle;
use crate::game::rules::{category_of, Rule};
use crate::game::scoring::ScoreBreakdown;
use crate::stats::{Leaderboard, LeaderboardEntry};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

/// Highlight colour for each of the day's rules, by position
const RULE_COLORS: [Color; 3] = [Color::Magenta, Color::Blue, Color::LightRed];

/// Check marks drawn before switching to a count
const MAX_MARKS: u32 = 5;

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) {
    match &coordinator.screen {
        Screen::PreGame { resume } => render_pregame(frame, coordinator, *resume),
        Screen::Playing => render_game(frame, &coordinator.app, coordinator.stats().high_score),
        Screen::Leaderboard { board } => {
            render_leaderboard(frame, board, coordinator.player_id());
        }
        Screen::Error { message } => {
            render_error(frame, message);
        }
    }
}

/// Render the prompt shown before the countdown runs
fn render_pregame(frame: &mut Frame, coordinator: &AppCoordinator, resume: bool) {
    let area = frame.area();
    let puzzle = coordinator.app.puzzle();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Greeting
            Constraint::Min(8),    // Rules
            Constraint::Length(1), // Feedback
            Constraint::Length(1), // Footer
        ])
        .margin(1)
        .split(area);

    let player = match coordinator.player_id() {
        Some(id) => format!("Player {}", id),
        None => "Guest".to_string(),
    };
    let greeting = vec![
        Line::from(Span::styled(
            format!("SCRABDLE  {}", puzzle.date_key()),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(format!("Welcome, {}", player)),
        Line::from(Span::styled(
            pregame_prompt(puzzle, resume),
            Style::default().fg(Color::Cyan),
        )),
    ];
    frame.render_widget(
        Paragraph::new(greeting).alignment(Alignment::Center),
        layout[0],
    );

    let items: Vec<ListItem> = puzzle
        .rules()
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let color = RULE_COLORS[i % RULE_COLORS.len()];
            let category = category_of(rule.id).map(|c| c.name).unwrap_or("Bonus");
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!("■ {}", category),
                    Style::default().fg(color).bold(),
                )),
                Line::from(format!("  {}", rule.description)),
            ])
        })
        .collect();
    let rules = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Today's Rules"),
    );
    frame.render_widget(rules, layout[1]);

    let (feedback, color) = format_feedback(&coordinator.app.feedback);
    frame.render_widget(
        Paragraph::new(feedback).style(Style::default().fg(color)),
        layout[2],
    );

    let footer_text = if resume {
        "Enter Continue  Esc Quit"
    } else {
        "Enter Play  Esc Quit"
    };
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[3]);
}

/// First-time or welcome-back line with the clock
fn pregame_prompt(puzzle: &DailyPuzzle, resume: bool) -> String {
    let countdown = puzzle.countdown();
    if resume {
        format!(
            "Welcome back! Your game is in progress, {} of {} left",
            format_timer(countdown.remaining()),
            format_timer(countdown.total())
        )
    } else {
        format!(
            "Ready for today's puzzle? You have {}",
            format_timer(countdown.total())
        )
    }
}

/// Render the in-game screen
fn render_game(frame: &mut Frame, app: &App, high_score: u32) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with date, timer
            Constraint::Min(0),    // Board and side panel
            Constraint::Length(1), // Feedback
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, layout[0], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(38), // 12 cells of 3 chars + borders
            Constraint::Min(30),    // Rules and score
        ])
        .split(layout[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(14), // Grid
            Constraint::Length(4),  // Hand, two rows
            Constraint::Min(0),
        ])
        .split(columns[0]);

    render_grid(frame, left[0], app);
    render_hand(frame, left[1], app);
    render_side_panel(frame, columns[1], app, high_score);

    let (feedback, color) = format_feedback(&app.feedback);
    frame.render_widget(
        Paragraph::new(feedback).style(Style::default().fg(color)),
        layout[2],
    );

    let footer_text = if app.is_round_over() {
        "l Leaderboard  Esc Quit"
    } else {
        "←↑↓→ Move  Tab Hand/Grid  Enter Pick/Drop  ⌫ Return  r Refill  f Finish  l Leaderboard  Esc Quit"
    };
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[3]);
}

/// Render the header: title, date, timer
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Title
            Constraint::Min(20),    // Date
            Constraint::Length(10), // Timer
        ])
        .split(inner);

    let title = Paragraph::new("SCRABDLE")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(title, header_layout[0]);

    let puzzle = app.puzzle();
    let date = Paragraph::new(format!("Puzzle for {}", puzzle.date_key()))
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(date, header_layout[1]);

    let time_left = puzzle.time_left();
    let timer_color = if !puzzle.countdown().is_running() {
        Color::DarkGray
    } else if time_left <= 10 {
        Color::Red
    } else if time_left <= 30 {
        Color::Yellow
    } else {
        Color::Green
    };
    let timer = Paragraph::new(format_timer(time_left))
        .style(Style::default().fg(timer_color).bold())
        .alignment(Alignment::Right);
    frame.render_widget(timer, header_layout[2]);
}

fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

/// Render the board, one three-character cell per tile
fn render_grid(frame: &mut Frame, area: Rect, app: &App) {
    let puzzle = app.puzzle();
    let grid = puzzle.grid();
    let focused = app.focus() == Focus::Grid;

    let lines: Vec<Line> = (0..grid.height())
        .map(|y| {
            let spans: Vec<Span> = (0..grid.width())
                .map(|x| {
                    let placed = grid.get(x, y);
                    let mut style = placed
                        .map(|t| tile_style(t, puzzle.rules()))
                        .unwrap_or_else(|| Style::default().fg(Color::DarkGray));
                    if app.held() == Some(Held::Grid(x, y)) {
                        style = style.bg(Color::Yellow).fg(Color::Black);
                    }
                    if focused && app.cursor() == (x, y) {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Span::styled(cell_text(placed.map(|t| t.letter())), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let title = format!("Grid ({} placed)", grid.tile_count());
    let grid_widget = Paragraph::new(lines).block(focus_block(&title, focused));
    frame.render_widget(grid_widget, area);
}

/// Found tiles are green; a tile carrying a rule takes that rule's colour
fn tile_style(tile: &PlacedTile, rules: &[Rule]) -> Style {
    let rule_color = rules
        .iter()
        .position(|r| tile.applied_rule_ids.contains(r.id))
        .map(|i| RULE_COLORS[i % RULE_COLORS.len()]);

    match (rule_color, tile.is_found) {
        (Some(color), _) => Style::default().fg(Color::White).bg(color).bold(),
        (None, true) => Style::default().fg(Color::Green).bold(),
        (None, false) => Style::default().fg(Color::White),
    }
}

/// Render the hand as two rows of slots
fn render_hand(frame: &mut Frame, area: Rect, app: &App) {
    let hand = app.puzzle().hand();
    let focused = app.focus() == Focus::Hand;

    let lines: Vec<Line> = hand
        .slots()
        .chunks(HAND_ROW_LEN)
        .enumerate()
        .map(|(row, slots)| {
            let spans: Vec<Span> = slots
                .iter()
                .enumerate()
                .map(|(col, slot)| {
                    let index = row * HAND_ROW_LEN + col;
                    let mut style = match slot {
                        Some(_) => Style::default().fg(Color::Cyan).bold(),
                        None => Style::default().fg(Color::DarkGray),
                    };
                    if app.held() == Some(Held::Hand(index)) {
                        style = style.bg(Color::Yellow).fg(Color::Black);
                    }
                    if focused && app.hand_cursor() == index {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Span::styled(cell_text(slot.map(|t| t.letter)), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let title = format!("Hand ({} in bag)", app.puzzle().bag().len());
    let hand_widget = Paragraph::new(lines).block(focus_block(&title, focused));
    frame.render_widget(hand_widget, area);
}

/// Render the day's rules, the score formula and the high score
fn render_side_panel(frame: &mut Frame, area: Rect, app: &App, high_score: u32) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Rules
            Constraint::Length(5), // Score
            Constraint::Length(4), // Words
        ])
        .split(area);

    let puzzle = app.puzzle();
    let score = puzzle.score();

    let items: Vec<ListItem> = puzzle
        .rules()
        .iter()
        .enumerate()
        .map(|(i, rule)| {
            let color = RULE_COLORS[i % RULE_COLORS.len()];
            let marks = format_achievements(score.achievement_count(rule.id));
            let category = category_of(rule.id).map(|c| c.name).unwrap_or("Bonus");
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!("■ {} {}", category, marks),
                    Style::default().fg(color).bold(),
                )),
                Line::from(format!("  {}", rule.description)),
            ])
        })
        .collect();

    let rules = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Today's Rules"),
    );
    frame.render_widget(rules, layout[0]);

    let score_lines = vec![
        Line::from(Span::styled(
            format_score(score),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(format!("High score: {}", high_score)),
    ];
    let score_widget = Paragraph::new(score_lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title("Score"),
        );
    frame.render_widget(score_widget, layout[1]);

    let words = Paragraph::new(score.words.join(" "))
        .style(Style::default().fg(Color::Green))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!("Words ({})", score.words.len())),
        );
    frame.render_widget(words, layout[2]);
}

/// Render the day's leaderboard
fn render_leaderboard(frame: &mut Frame, board: &Leaderboard, player_id: Option<i64>) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Entries
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    let mut title = format!("Leaderboard {}  ({} players)", board.date, board.total_players);
    if let Some(rank) = player_id.and_then(|id| format_own_rank(board, id)) {
        title.push_str("  ");
        title.push_str(&rank);
    }
    let header = Paragraph::new(title)
    .style(Style::default().fg(Color::Cyan).bold())
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, layout[0]);

    if board.top.is_empty() {
        let empty = Paragraph::new("No scores yet today")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, layout[1]);
    } else {
        let style_for = |entry: &LeaderboardEntry| {
            if Some(entry.player_id) == player_id {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            }
        };
        let mut items: Vec<ListItem> = board
            .top
            .iter()
            .map(|e| ListItem::new(format_entry(e)).style(style_for(e)))
            .collect();
        if let Some(own) = &board.player_rank {
            items.push(ListItem::new("  ...").style(Style::default().fg(Color::DarkGray)));
            items.push(ListItem::new(format_entry(own)).style(style_for(own)));
        }

        let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Top Scores"));
        frame.render_widget(list, layout[1]);
    }

    let footer = Paragraph::new("l/Esc Back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);
}

/// Render error screen
fn render_error(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Percentage(40),
        ])
        .margin(2)
        .split(area);

    let error = Paragraph::new(format!("Error: {}", message))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center);
    frame.render_widget(error, layout[1]);

    let hint = Paragraph::new("Press Esc to go back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hint, layout[2]);
}

/// Three characters per cell so the grid reads as a square
fn cell_text(letter: Option<char>) -> String {
    match letter {
        Some(c) => format!(" {} ", c),
        None => " · ".to_string(),
    }
}

/// Format the timer display
pub fn format_timer(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}

/// `Points (b) x Lengths (l) + Bonus (k) = score`
pub fn format_score(score: &ScoreBreakdown) -> String {
    format!(
        "Points ({}) x Lengths ({}) + Bonus ({}) = {}",
        score.base_points, score.total_lengths, score.bonus_points, score.final_score
    )
}

/// One check per time a rule was met, a count past a handful
fn format_achievements(count: u32) -> String {
    match count {
        0 => String::new(),
        n if n <= MAX_MARKS => "✓".repeat(n as usize),
        n => format!("✓ x{}", n),
    }
}

/// One leaderboard line: rank, player, score, time
pub fn format_entry(entry: &LeaderboardEntry) -> String {
    format!(
        "#{:<3} Player {:<6} {:>6}  {}",
        entry.rank,
        entry.player_id,
        entry.score,
        format_timer(entry.time_taken)
    )
}

/// `You are #3 of 12`, when the player has a score that day
fn format_own_rank(board: &Leaderboard, player_id: i64) -> Option<String> {
    board
        .entry_for(player_id)
        .map(|e| format!("You are #{} of {}", e.rank, board.total_players))
}

/// Format feedback with appropriate color
fn format_feedback(feedback: &str) -> (String, Color) {
    if feedback.is_empty() {
        return (String::new(), Color::White);
    }

    let color = if feedback.starts_with("CLANK")
        || feedback.starts_with("Could not")
        || feedback.starts_with("Score not")
        || feedback.starts_with("No room")
        || feedback.starts_with("No dictionary")
    {
        Color::Red
    } else if feedback.starts_with("Score") || feedback.starts_with("Drew") {
        Color::Green
    } else if feedback.starts_with("TIME'S UP") || feedback.starts_with("FINISHED") {
        Color::Magenta
    } else {
        Color::Yellow
    };

    (feedback.to_string(), color)
}
