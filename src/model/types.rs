//! Core type definitions for the application

use std::time::Instant;

/// Which listing section is focused
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActiveSection {
    #[default]
    Latest,
    AllEpisodes,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Latest => ActiveSection::AllEpisodes,
            ActiveSection::AllEpisodes => ActiveSection::Latest,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ActiveSection::Latest => "Últimos lançamentos",
            ActiveSection::AllEpisodes => "Todos os episódios",
        }
    }
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub latest_selected: usize,
    pub all_selected: usize,
    /// Listing position (latest then all) of the episode whose details are open
    pub detail_index: Option<usize>,
    pub catalog_loading: bool,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Latest,
            latest_selected: 0,
            all_selected: 0,
            detail_index: None,
            catalog_loading: false,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }
}
