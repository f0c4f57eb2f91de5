//! Header bar

use chrono::{Local, Locale};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::UiState;

pub fn render_header(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Brand + tagline
            Constraint::Length(28), // Date
        ])
        .split(area);

    let mut spans = vec![
        Span::styled(
            "Podcastr",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("O melhor para você ouvir, sempre", Style::default().fg(Color::Gray)),
    ];
    if ui_state.catalog_loading {
        spans.push(Span::styled("  Carregando...", Style::default().fg(Color::Yellow)));
    }

    let brand = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(brand, chunks[0]);

    let today = Local::now()
        .format_localized("%a, %-d %B", Locale::pt_BR)
        .to_string();
    let date = Paragraph::new(today)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).padding(Padding::horizontal(1)));
    frame.render_widget(date, chunks[1]);
}
