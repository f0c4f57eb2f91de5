//! Episode listing: latest releases on top, every other episode below

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{ActiveSection, Catalog, EpisodeSummary, UiState};
use super::utils::{calculate_num_width, render_scrollable_list, truncate_string};

pub fn render_listing(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    catalog: &Catalog,
    current_episode_id: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Two latest episodes, two lines each
            Constraint::Min(0),    // All episodes
        ])
        .split(area);

    if catalog.is_empty() {
        let message = if ui_state.catalog_loading {
            "Carregando episódios..."
        } else {
            "Nenhum episódio encontrado. Pressione r para tentar novamente."
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(section_block(ActiveSection::Latest, ui_state));
        frame.render_widget(empty, chunks[0]);
        frame.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", ActiveSection::AllEpisodes.title())),
            chunks[1],
        );
        return;
    }

    render_latest(frame, chunks[0], ui_state, catalog, current_episode_id);
    render_all_episodes(frame, chunks[1], ui_state, catalog, current_episode_id);
}

fn section_block(section: ActiveSection, ui_state: &UiState) -> Block<'static> {
    let border_style = if ui_state.active_section == section {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", section.title()))
        .padding(Padding::horizontal(1))
        .border_style(border_style)
}

fn row_style(is_selected: bool, is_focused: bool, is_playing: bool) -> Style {
    if is_selected && is_focused {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if is_playing {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else if is_selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn render_latest(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    catalog: &Catalog,
    current_episode_id: Option<&str>,
) {
    let is_focused = ui_state.active_section == ActiveSection::Latest;
    let content_width = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = catalog
        .latest
        .iter()
        .enumerate()
        .map(|(i, summary)| {
            let is_playing = current_episode_id == Some(summary.id());
            let style = row_style(i == ui_state.latest_selected, is_focused, is_playing);
            let marker = if is_playing { "▶ " } else { "  " };

            let details = format!(
                "{} · {} · {}",
                summary.episode.members, summary.published_at, summary.duration_as_string
            );
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!("{}{}", marker, truncate_string(&summary.episode.title, content_width)),
                    style,
                )),
                Line::from(Span::styled(
                    format!("  {}", truncate_string(&details, content_width)),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    render_scrollable_list(
        frame,
        area,
        items,
        Some(ui_state.latest_selected),
        section_block(ActiveSection::Latest, ui_state),
    );
}

fn render_all_episodes(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    catalog: &Catalog,
    current_episode_id: Option<&str>,
) {
    let is_focused = ui_state.active_section == ActiveSection::AllEpisodes;
    let block = section_block(ActiveSection::AllEpisodes, ui_state);

    if catalog.all.is_empty() {
        let empty = Paragraph::new("  Nada por aqui ainda")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let (num_width, title_width, members_width) = column_widths(content_width, catalog.all.len());

    // Header row, so the list selection is shifted by one
    let mut items = vec![
        ListItem::new(format!(
            " {:<num_width$}   {:<title_width$}   {:<members_width$}   {:<9}   {}",
            "#", "Podcast", "Integrantes", "Data", "Duração",
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    ];

    items.extend(catalog.all.iter().enumerate().map(|(i, summary)| {
        all_episodes_row(
            summary,
            i,
            ui_state.all_selected == i,
            is_focused,
            current_episode_id == Some(summary.id()),
            (num_width, title_width, members_width),
        )
    }));

    render_scrollable_list(frame, area, items, Some(ui_state.all_selected + 1), block);
}

fn all_episodes_row(
    summary: &EpisodeSummary,
    position: usize,
    is_selected: bool,
    is_focused: bool,
    is_playing: bool,
    (num_width, title_width, members_width): (usize, usize, usize),
) -> ListItem<'static> {
    let playing_indicator = if is_playing { "▶" } else { " " };
    ListItem::new(format!(
        "{}{:<num_width$}   {}   {}   {:<9}   {}",
        playing_indicator,
        position + 1,
        truncate_string(&summary.episode.title, title_width),
        truncate_string(&summary.episode.members, members_width),
        summary.published_at,
        summary.duration_as_string,
    ))
    .style(row_style(is_selected, is_focused, is_playing))
}

/// Returns (num_width, title_width, members_width)
fn column_widths(content_width: usize, item_count: usize) -> (usize, usize, usize) {
    // " {num}   {title}   {members}   {date:9}   {duration:8}"
    let num_width = calculate_num_width(item_count);
    let fixed_width = 1 + num_width + 3 + 3 + 3 + 9 + 3 + 8;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let title_width = (remaining_width * 60) / 100;
    let members_width = remaining_width.saturating_sub(title_width);
    (num_width, title_width, members_width)
}
