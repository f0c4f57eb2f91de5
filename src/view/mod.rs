//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (truncation, popups, scrollable lists)
//! - `layout`: Header bar
//! - `content`: Episode listing (latest releases and all episodes)
//! - `player`: Player panel with progress and controls
//! - `overlays`: Modal overlays (error, episode details, help)

mod utils;
mod layout;
mod content;
mod player;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{Catalog, PlaybackInfo, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, playback: &PlaybackInfo, ui_state: &UiState, catalog: &Catalog) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Listing + player
            ])
            .split(frame.area());

        layout::render_header(frame, chunks[0], ui_state);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(65), // Listing
                Constraint::Percentage(35), // Player
            ])
            .split(chunks[1]);

        let current_episode_id = playback.episode.as_ref().map(|e| e.id.as_str());
        content::render_listing(frame, main_chunks[0], ui_state, catalog, current_episode_id);

        player::render_player(frame, main_chunks[1], playback);

        if let Some(index) = ui_state.detail_index {
            overlays::render_episode_details(frame, catalog, index);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }

        // Errors draw last so nothing covers them
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }
    }
}
