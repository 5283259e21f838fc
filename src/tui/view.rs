//! View layer: renders exactly one of the acquisition surface, the
//! processing indicator, the result view, or the error view.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::render::NOT_FOUND_PLACEHOLDER;
use crate::session::{ProcessingState, SettledOutcome};

use super::app::{App, InputMode};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub(super) fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(5),    // Body
            Constraint::Length(3), // Footer
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);

    match app.session.state() {
        ProcessingState::Idle => draw_acquisition(frame, app, chunks[1]),
        ProcessingState::Processing => draw_processing(frame, app, chunks[1]),
        ProcessingState::Settled(SettledOutcome::Result(result)) => {
            draw_result(frame, result, chunks[1])
        }
        ProcessingState::Settled(SettledOutcome::Failure(failure)) => {
            draw_failure(frame, failure, chunks[1])
        }
    }

    draw_footer(frame, app, chunks[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled("titlescan", Style::default().bold()),
        Span::raw("  "),
        Span::styled(app.base_url().to_string(), Style::default().dim()),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

/// The acquisition surface: directory browser plus typed-path entry.
fn draw_acquisition(frame: &mut Frame, app: &App, area: Rect) {
    let entry_height = if app.input_mode == InputMode::PathEntry {
        3
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(entry_height),
        ])
        .split(area);

    let hint = Paragraph::new(Line::from(Span::styled(
        "Select a PDF or image document (up to 10 MB)",
        Style::default().dim(),
    )));
    frame.render_widget(hint, chunks[0]);

    // Directory listing with a window kept around the selection.
    let list_area = chunks[1];
    let visible = list_area.height.saturating_sub(2).max(1) as usize;
    let offset = app.selection.saturating_sub(visible.saturating_sub(1));

    let dimmed = app.input_mode == InputMode::PathEntry;
    let lines: Vec<Line> = app
        .entries
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(idx, entry)| {
            let marker = if entry.is_dir { "/" } else { "" };
            let text = format!(" {}{}", entry.name, marker);
            let mut style = if entry.is_dir {
                Style::default().fg(Color::Blue)
            } else if entry.accepted {
                Style::default()
            } else {
                Style::default().dim()
            };
            if idx == app.selection && !dimmed {
                style = style.reversed();
            }
            if dimmed {
                style = style.dim();
            }
            Line::from(Span::styled(text, style))
        })
        .collect();

    let listing = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", app.dir.display())),
    );
    frame.render_widget(listing, list_area);

    // Typed-path entry: the highlighted border is the drop-ready cue.
    if app.input_mode == InputMode::PathEntry {
        let input = Paragraph::new(format!("{}▏", app.path_input)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" FILE PATH "),
        );
        frame.render_widget(input, chunks[2]);
    }
}

fn draw_processing(frame: &mut Frame, app: &App, area: Rect) {
    let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
    let name = app.submitted_name.as_deref().unwrap_or("document");

    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            format!("  {} Analyzing {}...", spinner, name),
            Style::default().fg(Color::Cyan),
        )),
        Line::default(),
        Line::from(Span::styled(
            "  Extracting fields with OCR and language analysis; this can take up to a minute.",
            Style::default().dim(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_result(frame: &mut Frame, result: &crate::models::AnalysisResult, area: Rect) {
    let mut lines = vec![Line::default()];

    for (label, value) in result.fields() {
        let label_span = Span::styled(
            format!("  {:<20}", format!("{}:", label)),
            Style::default().fg(Color::Cyan),
        );
        let value_span = match value {
            Some(value) => Span::raw(value.to_string()),
            None => Span::styled(NOT_FOUND_PLACEHOLDER, Style::default().dim().italic()),
        };
        lines.push(Line::from(vec![label_span, value_span]));
    }

    if result.has_compliance_notes() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "  COMPLIANCE NOTES",
            Style::default().fg(Color::Cyan).bold(),
        )));
        for note in &result.compliance_notes {
            lines.push(Line::from(format!("    - {}", note)));
        }
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title(" ANALYSIS RESULT ")
                .title_style(Style::default().fg(Color::Green).bold()),
        );
    frame.render_widget(body, area);
}

fn draw_failure(frame: &mut Frame, failure: &crate::classify::Failure, area: Rect) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            format!("  {}", failure.message),
            Style::default().fg(Color::Red),
        )),
    ];
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title(" ANALYSIS FAILED ")
                .title_style(Style::default().fg(Color::Red).bold()),
        );
    frame.render_widget(body, area);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.session.state() {
        ProcessingState::Idle => {
            if app.input_mode == InputMode::PathEntry {
                "Enter submit · Esc cancel · q quit"
            } else {
                "↑/↓ select · Enter analyze · p type a path · r refresh · q quit"
            }
        }
        ProcessingState::Processing => "waiting for the analysis service · q quit",
        ProcessingState::Settled(SettledOutcome::Result(_)) => "a analyze another · q quit",
        ProcessingState::Settled(SettledOutcome::Failure(_)) => "r try again · q quit",
    };

    let mut lines = vec![Line::from(Span::styled(hints, Style::default().dim()))];
    if let Some(message) = &app.message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::TOP)),
        area,
    );
}
