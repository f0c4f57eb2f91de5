//! Overlay rendering (error notification, episode details, help popup)

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{Catalog, UiState};
use super::utils::{centered_popup, html_to_text};

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref error_msg) = ui_state.error_message {
        let area = frame.area();

        let popup_width = 52.min(area.width.saturating_sub(4));
        let inner_width = popup_width.saturating_sub(4).max(1) as usize; // account for borders

        // Calculate how many lines the error message will take when wrapped
        let error_line_count = error_msg.chars().count().div_ceil(inner_width) as u16;

        // Height: top border (1) + error lines + bottom border (1)
        let popup_area = centered_popup(area, popup_width, 2 + error_line_count.max(1));

        // Clear the area behind the popup first
        frame.render_widget(Clear, popup_area);

        let error_widget = Paragraph::new(error_msg.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Erro (Esc para fechar) ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(Color::Black)),
            );

        frame.render_widget(error_widget, popup_area);
    }
}

pub fn render_episode_details(frame: &mut Frame, catalog: &Catalog, index: usize) {
    let Some(summary) = catalog.latest.iter().chain(catalog.all.iter()).nth(index) else {
        return;
    };

    let area = frame.area();
    let popup_area = centered_popup(area, 80, area.height.saturating_sub(6).max(12));
    frame.render_widget(Clear, popup_area);

    let label = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(
            summary.episode.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Integrantes  ", label),
            Span::raw(summary.episode.members.clone()),
        ]),
        Line::from(vec![
            Span::styled("Publicado    ", label),
            Span::raw(summary.published_at.clone()),
        ]),
        Line::from(vec![
            Span::styled("Duração      ", label),
            Span::raw(summary.duration_as_string.clone()),
        ]),
        Line::from(""),
    ];
    lines.extend(
        html_to_text(&summary.description)
            .lines()
            .map(|line| Line::from(line.to_string())),
    );

    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .title(" Episódio (Enter tocar, Esc fechar) ")
                .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
                .padding(Padding::horizontal(1))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(details, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    let keybindings = [
        ("", "── Navegação ──"),
        ("Tab", "Alternar seção"),
        ("↑ / ↓", "Mover seleção"),
        ("Enter", "Tocar a partir da seleção"),
        ("D", "Detalhes do episódio"),
        ("R", "Recarregar episódios"),
        ("", ""),
        ("", "── Player ──"),
        ("Space", "Tocar / Pausar"),
        ("N", "Próximo episódio"),
        ("P", "Episódio anterior"),
        ("L", "Repetir episódio"),
        ("S", "Embaralhar"),
        ("← / →", "Voltar / avançar 10s"),
        ("", ""),
        ("", "── Geral ──"),
        ("H", "Mostrar / esconder ajuda"),
        ("Esc", "Fechar janela"),
        ("Q", "Sair"),
    ];

    let popup_area = centered_popup(area, 56, keybindings.len() as u16 + 2);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^50}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>14}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Ajuda (H ou Esc para fechar) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
