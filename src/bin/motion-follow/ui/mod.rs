//! TUI for motion-follow
//!
//! Loudness scope on top, pipeline status below, key help at the bottom.

mod scope;
mod status;

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};

use crate::app::App;

use scope::render_scope;
use status::render_status;

/// Run the UI event loop until the user quits.
pub fn run(terminal: &mut DefaultTerminal, mut app: App) -> EyreResult<()> {
    while !app.should_quit() {
        app.pump();

        terminal.draw(|frame| render(frame, &app))?;

        // Handle keyboard input (non-blocking, ~60fps)
        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
    }

    Ok(())
}

fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Scope
            Constraint::Length(9), // Status
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_scope(frame, chunks[0], app);
    render_status(frame, chunks[1], app);

    let help = Paragraph::new(
        " [Q] Quit  [Space] Play/Pause  [M] Mode  [R] Reset  [+/-] Gain  [T] Targets  [S] Smoothing",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}
