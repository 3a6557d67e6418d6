//! Status panel - mode, tempo, position and output counters

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the status panel
pub fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" motion-follow ").borders(Borders::ALL);

    let session = app.session();
    let config = session.config();
    let last = session.last_frame();

    let play_state = if app.is_playing() { "▶ Playing" } else { "⏸ Paused" };
    let position = app
        .last_update()
        .map(|update| update.position)
        .unwrap_or_else(|| session.position().current());
    let command = app
        .last_command()
        .map(|command| command.to_string())
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" {play_state}  "), Style::default().fg(Color::Green)),
            Span::raw(format!("{}  ", format_clock(app.elapsed().as_secs_f64()))),
            Span::styled(format!("Mode: {}", config.mode), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(format!(
            " Loudness: {:.3} raw  {:.3} smoothed  Gain: {:.1}x",
            last.loudness.raw, last.loudness.smoothed, config.amplification
        )),
        Line::from(format!(
            " Tempo: {:.2} Hz  Skew: {:.1}  Oscillator: {:+.3}",
            last.tempo_hz, last.skew, last.oscillator
        )),
        Line::from(format!(
            " Targets: {}  Smoothing: {:?}",
            config.quantizer, config.smoothing
        )),
        Line::from(vec![
            Span::styled(format!(" Position: {position:04}  "), Style::default().fg(Color::Yellow)),
            Span::raw(format!("Last command: {command}")),
        ]),
        Line::from(format!(
            " Sent: {}  Dropped: {}  Frames: {}  Rate: {:.1}kHz",
            app.gate().sent(),
            app.gate().dropped(),
            session.frames_processed(),
            f64::from(app.sample_rate()) / 1000.0
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Format seconds as `HH:MM:SS`; NaN and negative values read as zero.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
