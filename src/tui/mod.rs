//! Interactive terminal client.
//!
//! A full-screen surface with three mutually exclusive views driven by
//! the session state: acquisition (file browser plus typed-path entry),
//! a processing indicator, and the settled result or error. Input that
//! would start a second submission is rejected while one is in flight.

mod app;
mod view;

use std::io::stdout;
use std::path::PathBuf;

use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;

use crate::config::Settings;

pub use app::App;

/// Run the interactive client until the user quits.
pub async fn run(settings: &Settings, start_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let start_dir = match start_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let mut app = App::new(settings.client(), start_dir)?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}
