//! Player panel: current episode, progress and controls

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{duration_to_time_string, PlaybackInfo};

pub fn render_player(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tocando agora ")
        .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Episode
            Constraint::Length(1), // Time labels
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Controls
        ])
        .split(inner);

    render_episode(frame, chunks[0], playback);
    render_progress(frame, chunks[1], chunks[2], playback);
    render_controls(frame, chunks[4], playback);
}

fn render_episode(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let lines = match &playback.episode {
        Some(episode) => vec![
            Line::from(""),
            Line::from(Span::styled(
                episode.title.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(episode.members.clone(), Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} de {}", playback.current_index + 1, playback.queue_len),
                Style::default().fg(Color::DarkGray),
            )),
        ],
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Selecione um podcast para ouvir",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
            )),
        ],
    };

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_progress(frame: &mut Frame, labels_area: Rect, gauge_area: Rect, playback: &PlaybackInfo) {
    let (elapsed, total) = match playback.episode {
        Some(_) => (
            duration_to_time_string(playback.progress),
            duration_to_time_string(playback.duration()),
        ),
        None => ("00:00".to_string(), "00:00".to_string()),
    };

    let width = labels_area.width as usize;
    let gap = width.saturating_sub(elapsed.chars().count() + total.chars().count());
    let labels = Paragraph::new(format!("{}{}{}", elapsed, " ".repeat(gap), total))
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(labels, labels_area);

    let duration = playback.duration();
    let progress_ratio = if duration > 0 {
        (playback.progress as f64 / duration as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let gauge_color = if playback.episode.is_some() { Color::Green } else { Color::DarkGray };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(gauge_color).bg(Color::Black))
        .ratio(progress_ratio)
        .label("");
    frame.render_widget(gauge, gauge_area);
}

fn control_span(label: &str, enabled: bool, active: bool) -> Span<'static> {
    let style = if !enabled {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    } else if active {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Span::styled(format!(" {} ", label), style)
}

fn render_controls(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let controls = playback.controls;
    let play_label = if playback.is_playing { "⏸ " } else { "▶ " };

    let line = Line::from(vec![
        control_span("s 🔀", controls.shuffle, playback.is_shuffle),
        control_span("p ⏮", controls.previous, false),
        control_span(play_label, controls.play_pause, playback.is_playing),
        control_span("n ⏭", controls.next, false),
        control_span("l 🔁", controls.looping, playback.is_looping),
    ]);

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
