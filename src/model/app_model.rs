//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use super::catalog::{Catalog, CatalogClient};
use super::episode::{Episode, EpisodeSummary};
use super::playback::PlaybackInfo;
use super::player_state::PlayerState;
use super::types::{ActiveSection, UiState};

const ERROR_DISPLAY_SECS: u64 = 5;

/// Main application model containing all state
pub struct AppModel {
    pub catalog_client: Option<CatalogClient>,
    player: Arc<Mutex<PlayerState>>,
    progress: Arc<Mutex<u64>>,
    catalog: Arc<Mutex<Catalog>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self::with_player(PlayerState::new())
    }

    pub fn with_player(player: PlayerState) -> Self {
        Self {
            catalog_client: None,
            player: Arc::new(Mutex::new(player)),
            progress: Arc::new(Mutex::new(0)),
            catalog: Arc::new(Mutex::new(Catalog::empty())),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_catalog_client(&mut self, client: CatalogClient) {
        self.catalog_client = Some(client);
    }

    pub async fn get_catalog_client(&self) -> Option<CatalogClient> {
        self.catalog_client.clone()
    }

    // ========================================================================
    // Playback store
    // ========================================================================

    pub async fn play(&self, episode: Episode) {
        self.player.lock().await.play(episode);
    }

    pub async fn play_list(&self, list: Vec<Episode>, index: usize) {
        self.player.lock().await.play_list(list, index);
    }

    pub async fn toggle_play(&self) {
        self.player.lock().await.toggle_play();
    }

    pub async fn set_playing_state(&self, state: bool) {
        self.player.lock().await.set_playing_state(state);
    }

    pub async fn toggle_looping(&self) {
        self.player.lock().await.toggle_looping();
    }

    pub async fn toggle_shuffle(&self) {
        self.player.lock().await.toggle_shuffle();
    }

    pub async fn play_next(&self) {
        self.player.lock().await.play_next();
    }

    pub async fn play_previous(&self) {
        self.player.lock().await.play_previous();
    }

    pub async fn clear_player_state(&self) {
        self.player.lock().await.clear_player_state();
    }

    pub async fn has_next(&self) -> bool {
        self.player.lock().await.has_next()
    }

    pub async fn current_episode(&self) -> Option<Episode> {
        self.player.lock().await.current_episode().cloned()
    }

    pub async fn is_playing(&self) -> bool {
        self.player.lock().await.is_playing()
    }

    pub async fn is_looping(&self) -> bool {
        self.player.lock().await.is_looping()
    }

    pub async fn set_progress(&self, seconds: u64) {
        *self.progress.lock().await = seconds;
    }

    pub async fn get_progress(&self) -> u64 {
        *self.progress.lock().await
    }

    pub async fn get_playback_info(&self) -> PlaybackInfo {
        let progress = *self.progress.lock().await;
        let player = self.player.lock().await;
        PlaybackInfo::from_state(&player, progress)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub async fn set_catalog(&self, catalog: Catalog) {
        let (latest_len, all_len) = (catalog.latest.len(), catalog.all.len());
        *self.catalog.lock().await = catalog;

        let mut state = self.ui_state.lock().await;
        state.catalog_loading = false;
        state.latest_selected = state.latest_selected.min(latest_len.saturating_sub(1));
        state.all_selected = state.all_selected.min(all_len.saturating_sub(1));
        if state.detail_index.is_some_and(|i| i >= latest_len + all_len) {
            state.detail_index = None;
        }
    }

    /// Restart the revalidation period without replacing the listing
    pub async fn mark_catalog_checked(&self) {
        self.catalog.lock().await.fetched_at = Instant::now();
    }

    pub async fn get_catalog(&self) -> Catalog {
        self.catalog.lock().await.clone()
    }

    pub async fn set_catalog_loading(&self, loading: bool) {
        self.ui_state.lock().await.catalog_loading = loading;
    }

    pub async fn is_catalog_loading(&self) -> bool {
        self.ui_state.lock().await.catalog_loading
    }

    // ========================================================================
    // Listing navigation
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn cycle_section(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::Latest => {
                state.latest_selected = state.latest_selected.saturating_sub(1);
            }
            ActiveSection::AllEpisodes => {
                state.all_selected = state.all_selected.saturating_sub(1);
            }
        }
    }

    pub async fn move_selection_down(&self) {
        let catalog = self.catalog.lock().await;
        let mut state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::Latest => {
                if state.latest_selected + 1 < catalog.latest.len() {
                    state.latest_selected += 1;
                }
            }
            ActiveSection::AllEpisodes => {
                if state.all_selected + 1 < catalog.all.len() {
                    state.all_selected += 1;
                }
            }
        }
    }

    /// Queue position of the highlighted row, if the section has rows
    pub async fn get_selected_list_index(&self) -> Option<usize> {
        let catalog = self.catalog.lock().await;
        let state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::Latest => {
                (state.latest_selected < catalog.latest.len()).then_some(state.latest_selected)
            }
            ActiveSection::AllEpisodes => (state.all_selected < catalog.all.len())
                .then_some(state.all_selected + catalog.all_episodes_offset()),
        }
    }

    // ========================================================================
    // Episode details
    // ========================================================================

    pub async fn show_details(&self, index: usize) {
        self.ui_state.lock().await.detail_index = Some(index);
    }

    pub async fn hide_details(&self) {
        self.ui_state.lock().await.detail_index = None;
    }

    pub async fn is_details_open(&self) -> bool {
        self.ui_state.lock().await.detail_index.is_some()
    }

    pub async fn get_detail_episode(&self) -> Option<EpisodeSummary> {
        let index = self.ui_state.lock().await.detail_index?;
        let catalog = self.catalog.lock().await;
        catalog.latest.iter().chain(catalog.all.iter()).nth(index).cloned()
    }

    // ========================================================================
    // Errors & overlays
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > ERROR_DISPLAY_SECS {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::parse_episode_list;

    const BODY: &str = r#"[
        {"id": "a", "title": "A", "members": "M", "published_at": "2021-01-22 07:34:00",
         "thumbnail": "t", "description": "d", "file": {"url": "https://example.com/a.m4a", "duration": 10}},
        {"id": "b", "title": "B", "members": "M", "published_at": "2021-01-21 07:34:00",
         "thumbnail": "t", "description": "d", "file": {"url": "https://example.com/b.m4a", "duration": 20}},
        {"id": "c", "title": "C", "members": "M", "published_at": "2021-01-20 07:34:00",
         "thumbnail": "t", "description": "d", "file": {"url": "https://example.com/c.m4a", "duration": 30}},
        {"id": "d", "title": "D", "members": "M", "published_at": "2021-01-19 07:34:00",
         "thumbnail": "t", "description": "d", "file": {"url": "https://example.com/d.m4a", "duration": 40}}
    ]"#;

    async fn loaded_model() -> AppModel {
        let model = AppModel::with_player(PlayerState::with_seed(1));
        model.set_catalog(parse_episode_list(BODY).unwrap()).await;
        model
    }

    #[tokio::test]
    async fn selection_in_all_episodes_is_offset_by_latest() {
        let model = loaded_model().await;
        assert_eq!(model.get_selected_list_index().await, Some(0));

        model.cycle_section().await;
        model.move_selection_down().await;
        model.move_selection_down().await;
        model.move_selection_down().await;
        assert_eq!(model.get_selected_list_index().await, Some(3));

        model.move_selection_up().await;
        assert_eq!(model.get_selected_list_index().await, Some(2));
    }

    #[tokio::test]
    async fn empty_catalog_has_no_selection() {
        let model = AppModel::with_player(PlayerState::with_seed(1));
        assert_eq!(model.get_selected_list_index().await, None);
    }

    #[tokio::test]
    async fn details_resolve_across_sections() {
        let model = loaded_model().await;
        model.show_details(3).await;
        assert_eq!(model.get_detail_episode().await.map(|e| e.episode.id), Some("d".to_string()));

        model.set_catalog(Catalog::empty()).await;
        assert!(!model.is_details_open().await);
    }

    #[tokio::test]
    async fn errors_can_be_set_and_cleared() {
        let model = loaded_model().await;
        model.set_error("boom".to_string()).await;
        assert!(model.has_error().await);
        model.auto_clear_old_errors().await;
        assert!(model.has_error().await);
        model.clear_error().await;
        assert!(!model.has_error().await);
    }

    #[tokio::test]
    async fn store_operations_pass_through() {
        let model = loaded_model().await;
        let list = model.get_catalog().await.episode_list();
        model.play_list(list, 2).await;
        model.set_progress(7).await;

        let info = model.get_playback_info().await;
        assert_eq!(info.current_index, 2);
        assert_eq!(info.progress, 7);
        assert!(info.is_playing);

        model.play_next().await;
        model.play_next().await;
        assert_eq!(model.current_episode().await.map(|e| e.id), Some("d".to_string()));
        assert!(!model.has_next().await);
    }
}
