use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use timbre_core::model::AudioFeature;

use super::App;

const BAR_WIDTH: usize = 20;

/// Target controls and the selected song's audio profile side by side.
pub fn render(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Target controls
            Constraint::Min(4),    // Selected song
        ])
        .split(area);

    render_target(frame, app, chunks[0]);
    render_selected(frame, app, chunks[1]);
}

fn render_target(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let lines: Vec<Line<'_>> = app
        .target
        .iter()
        .map(|(feature, value)| {
            let selected = feature == app.feature();
            let marker = if selected { "\u{25b6} " } else { "  " };
            let style = if selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{}{:<18}", marker, feature.label()), style),
                Span::raw(format!("{:>7}", format_value(feature, value))),
            ])
        })
        .collect();

    let target = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Target"));
    frame.render_widget(target, area);
}

/// Bars for the selected song's five unit-range features, with the target
/// marked on each. Tempo is listed as a number.
fn render_selected(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let Some(rec) = app.selected() else {
        let msg = Paragraph::new("  No song selected")
            .block(Block::default().borders(Borders::ALL).title("Profile"));
        frame.render_widget(msg, area);
        return;
    };

    let mut lines: Vec<Line<'_>> = rec
        .features
        .profile()
        .iter()
        .map(|&(feature, value)| {
            Line::from(vec![
                Span::styled(
                    format!("  {:<18}", feature.label()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(bar(value, app.target.get(feature))),
                Span::styled(
                    format!(" {:.2}", value),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {:<18}", AudioFeature::Tempo.label()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!(
            "{:.0} (target {:.0})",
            rec.features.get(AudioFeature::Tempo),
            app.target.get(AudioFeature::Tempo)
        )),
    ]));
    lines.push(Line::from(Span::styled(
        format!("  {}", rec.uri.embed_url()),
        Style::default().fg(Color::DarkGray),
    )));

    let title = rec.title.as_deref().unwrap_or("Profile");
    let profile = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(profile, area);
}

fn format_value(feature: AudioFeature, value: f64) -> String {
    if feature == AudioFeature::Tempo {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// A fixed-width bar for a unit value with `|` at the target position.
fn bar(value: f64, target: f64) -> String {
    let cells = |v: f64| {
        let scaled = (v.clamp(0.0, 1.0) * BAR_WIDTH as f64).round();
        // Clamped to [0, BAR_WIDTH] above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = scaled as usize;
        n.min(BAR_WIDTH)
    };
    let filled = cells(value);
    let marker = cells(target).min(BAR_WIDTH - 1);

    (0..BAR_WIDTH)
        .map(|i| {
            if i == marker {
                '|'
            } else if i < filled {
                '\u{2588}'
            } else {
                '\u{00b7}'
            }
        })
        .collect()
}
