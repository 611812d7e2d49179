//! Terminal UI components using ratatui

mod terminal;
mod ui;

pub use terminal::Tui;
pub use ui::{format_entry, render};
