//! Application state and event handling for the interactive client.

use std::fs;
use std::io::Stdout;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use crate::candidate::UploadCandidate;
use crate::classify::{ExchangeFailure, Failure};
use crate::client::AnalysisClient;
use crate::models::AnalysisResult;
use crate::session::AnalysisSession;

use super::view;

/// Outcome delivered from the background submission task.
type SubmissionOutcome = Result<AnalysisResult, ExchangeFailure>;

/// Which acquisition input currently has focus.
///
/// `PathEntry` is the visually-active analog of a drop-ready surface; it
/// is presentation-only and never part of the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum InputMode {
    Browse,
    PathEntry,
}

/// One row of the directory listing.
pub(super) struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub accepted: bool,
}

pub struct App {
    client: Arc<AnalysisClient>,
    pub(super) session: AnalysisSession,
    pub(super) dir: PathBuf,
    pub(super) entries: Vec<DirEntry>,
    pub(super) selection: usize,
    pub(super) input_mode: InputMode,
    pub(super) path_input: String,
    pub(super) message: Option<String>,
    pub(super) spinner_frame: usize,
    pub(super) submitted_name: Option<String>,
    pending: Option<mpsc::Receiver<SubmissionOutcome>>,
}

impl App {
    pub fn new(client: AnalysisClient, start_dir: PathBuf) -> Result<Self> {
        let mut app = Self {
            client: Arc::new(client),
            session: AnalysisSession::new(),
            dir: start_dir,
            entries: Vec::new(),
            selection: 0,
            input_mode: InputMode::Browse,
            path_input: String::new(),
            message: None,
            spinner_frame: 0,
            submitted_name: None,
            pending: None,
        };
        app.refresh_entries()?;
        Ok(app)
    }

    pub(super) fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Main event loop: draw, apply any settle, then poll input.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| view::draw(frame, self))?;

            // The settle for an outstanding submission is applied before
            // any further input is processed.
            if self.poll_settle() {
                continue;
            }

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key) {
                        return Ok(());
                    }
                }
            } else if self.session.is_processing() {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
            }
        }
    }

    /// Drain the background task's outcome, if one arrived. Returns true
    /// when a settle was applied.
    fn poll_settle(&mut self) -> bool {
        use tokio::sync::mpsc::error::TryRecvError;

        let Some(rx) = self.pending.as_mut() else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(ExchangeFailure::Transport {
                message: "submission task stopped unexpectedly".to_string(),
            }),
        };

        self.pending = None;
        let settled = match outcome {
            Ok(result) => self.session.settle_success(result),
            Err(failure) => self.session.settle_failure(Failure::classify(&failure)),
        };
        if let Err(e) = settled {
            // Single-writer invariant makes this unreachable; log, not panic.
            tracing::warn!(error = %e, "dropped settle event");
        }
        true
    }

    /// Handle one key press. Returns true to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Quit is always available; it ends the UI, not the exchange.
        if key.code == KeyCode::Char('q')
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            return true;
        }

        // While processing, the acquisition surface rejects all input.
        if self.session.is_processing() {
            return false;
        }

        if self.session.accepts_input() {
            match self.input_mode {
                InputMode::Browse => self.handle_browse_key(key),
                InputMode::PathEntry => self.handle_path_entry_key(key),
            }
        } else {
            self.handle_settled_key(key);
        }
        false
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('p') | KeyCode::Char('/') => {
                self.input_mode = InputMode::PathEntry;
                self.path_input.clear();
            }
            KeyCode::Char('r') => {
                if let Err(e) = self.refresh_entries() {
                    self.message = Some(e.to_string());
                }
            }
            _ => {}
        }
    }

    fn handle_path_entry_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Browse;
                self.path_input.clear();
            }
            KeyCode::Enter => {
                let typed = self.path_input.trim().to_string();
                if typed.is_empty() {
                    return;
                }
                let expanded = shellexpand::tilde(&typed).into_owned();
                self.input_mode = InputMode::Browse;
                self.path_input.clear();
                self.select_candidate(PathBuf::from(expanded));
            }
            KeyCode::Backspace => {
                self.path_input.pop();
            }
            KeyCode::Char(c) => self.path_input.push(c),
            _ => {}
        }
    }

    fn handle_settled_key(&mut self, key: KeyEvent) {
        // "analyze another" after a result, "try again" after a failure.
        if matches!(key.code, KeyCode::Char('a') | KeyCode::Char('r')) {
            if self.session.reset().is_ok() {
                self.submitted_name = None;
                self.message = None;
                if let Err(e) = self.refresh_entries() {
                    self.message = Some(e.to_string());
                }
            }
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.entries.is_empty() {
            self.selection = 0;
            return;
        }
        let max = self.entries.len() as isize - 1;
        let next = (self.selection as isize + delta).clamp(0, max);
        self.selection = next as usize;
    }

    /// Enter the selected directory, or hand the selected file to the
    /// submission path. Exactly one submission per accepted selection.
    fn open_selected(&mut self) {
        let Some(entry) = self.entries.get(self.selection) else {
            return;
        };

        if entry.is_dir {
            let next = if entry.name == ".." {
                self.dir.parent().map(Path::to_path_buf)
            } else {
                Some(self.dir.join(&entry.name))
            };
            if let Some(next) = next {
                self.dir = next;
                self.selection = 0;
                if let Err(e) = self.refresh_entries() {
                    self.message = Some(e.to_string());
                }
            }
            return;
        }

        let path = self.dir.join(&entry.name);
        self.select_candidate(path);
    }

    /// The single "candidate selected" event both input paths feed into.
    fn select_candidate(&mut self, path: PathBuf) {
        // Guarded by the views, but never trust the UI alone.
        if !self.session.accepts_input() {
            return;
        }

        let candidate = match UploadCandidate::from_path(&path) {
            Ok(candidate) => candidate,
            Err(e) => {
                self.message = Some(e.to_string());
                return;
            }
        };

        // Advisory only: warn, then submit; the backend enforces limits.
        if !candidate.is_accepted_type() {
            self.message = Some(format!(
                "{} is not a PDF or image; the service may reject it",
                candidate.file_name
            ));
        } else if candidate.exceeds_advisory_limit() {
            self.message = Some(format!(
                "{} is over 10 MB; the service may reject it",
                candidate.file_name
            ));
        } else {
            self.message = None;
        }

        self.submit(candidate);
    }

    /// Start the background exchange for one candidate.
    fn submit(&mut self, candidate: UploadCandidate) {
        if self.session.begin().is_err() {
            return;
        }
        self.submitted_name = Some(candidate.file_name.clone());
        self.spinner_frame = 0;

        let (tx, rx) = mpsc::channel(1);
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let outcome = client.analyze(&candidate).await;
            let _ = tx.send(outcome).await;
        });
        self.pending = Some(rx);
    }

    fn refresh_entries(&mut self) -> Result<()> {
        let mut entries = Vec::new();
        if self.dir.parent().is_some() {
            entries.push(DirEntry {
                name: "..".to_string(),
                is_dir: true,
                accepted: false,
            });
        }

        let mut listed: Vec<DirEntry> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.starts_with('.') {
                    return None;
                }
                let is_dir = entry.file_type().ok()?.is_dir();
                let accepted = !is_dir && has_accepted_extension(&name);
                Some(DirEntry {
                    name,
                    is_dir,
                    accepted,
                })
            })
            .collect();

        listed.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then(a.name.cmp(&b.name)));
        entries.extend(listed);

        self.entries = entries;
        if self.selection >= self.entries.len() {
            self.selection = self.entries.len().saturating_sub(1);
        }
        Ok(())
    }
}

/// Quick extension check used to highlight likely-accepted files.
fn has_accepted_extension(name: &str) -> bool {
    let lower = name.to_lowercase();
    ["pdf", "jpg", "jpeg", "png", "tif", "tiff", "bmp"]
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}
