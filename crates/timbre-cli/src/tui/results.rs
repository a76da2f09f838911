use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use super::App;

/// Query bar: genre, years and how far into the result the user has paged.
pub fn render_title(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let genre = app.genre().map_or("?", |g| g.name());
    let total = app.results.len();
    let position = if total == 0 {
        "no matches".to_string()
    } else {
        let first = (app.session.start() + 1).min(total);
        let last = (app.session.start() + app.page().len()).min(total);
        if app.page().is_empty() {
            format!("all {} shown", total)
        } else {
            format!("{}-{} of {}", first, last, total)
        }
    };

    let title = Paragraph::new(format!(
        "{}  {}    {}",
        genre, app.years, position
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .block(Block::default().borders(Borders::ALL).title("timbre"));
    frame.render_widget(title, area);
}

/// The current page of recommendations.
pub fn render_page(frame: &mut Frame, app: &App<'_>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Recommendations");

    if let Some(error) = &app.error {
        let msg = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .block(block);
        frame.render_widget(msg, area);
        return;
    }

    if app.page().is_empty() {
        let text = if app.results.is_empty() {
            "  No songs match this genre and year range."
        } else {
            "  No songs left to recommend"
        };
        let msg = Paragraph::new(text)
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(msg, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("#").style(Style::default().fg(Color::DarkGray)),
        Cell::from("Title").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Artist"),
        Cell::from("Year"),
        Cell::from("Pop"),
        Cell::from("Dist"),
    ])
    .height(1);

    let offset = app.session.start();
    let rows: Vec<Row> = app
        .page()
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let style = if i == app.selected_track {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}", offset + i + 1)),
                Cell::from(rec.title.clone().unwrap_or_else(|| rec.uri.to_string())),
                Cell::from(rec.artist.clone().unwrap_or_default()),
                Cell::from(format!("{}", rec.release_year)),
                Cell::from(format!("{:.0}", rec.popularity)),
                Cell::from(format!("{:.2}", rec.distance)),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Length(5),
            Constraint::Length(4),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

pub fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(
        "  n More  g/G Genre  Tab Feature  +/- Adjust  [ ] Start year  { } End year  \u{2191}/k \u{2193}/j Song  q Quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
