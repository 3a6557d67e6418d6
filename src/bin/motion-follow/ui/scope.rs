//! Loudness scope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use crate::app::{App, SCOPE_HISTORY_LEN};

/// Render raw loudness history alongside the smoothed level and oscillator.
pub fn render_scope(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" Loudness ").borders(Borders::ALL);

    let raw: Vec<(f64, f64)> = app
        .scope()
        .iter()
        .enumerate()
        .map(|(i, &value)| (i as f64, value))
        .collect();

    // Latest smoothed values drawn as flat reference lines
    let last = app.session().last_frame();
    let width = SCOPE_HISTORY_LEN as f64;
    let smoothed = [(0.0, last.loudness.smoothed), (width, last.loudness.smoothed)];
    let oscillator_level = (last.oscillator + 1.0) / 2.0;
    let oscillator = [(0.0, oscillator_level), (width, oscillator_level)];

    let datasets = vec![
        Dataset::default()
            .name("raw")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&raw),
        Dataset::default()
            .name("smoothed")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightGreen))
            .data(&smoothed),
        Dataset::default()
            .name("oscillator")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightMagenta))
            .data(&oscillator),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, width])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .labels(vec!["0", "0.5", "1"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
