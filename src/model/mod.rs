//! Model module - Application state and data types
//!
//! - `episode`: Episode value types
//! - `player_state`: The playback store (queue, position, flags)
//! - `playback`: Render snapshots of the store and control enablement
//! - `catalog`: Content API client and the home listing
//! - `types`: UI state
//! - `app_model`: Main application model shared by view and controller

mod types;
mod episode;
mod player_state;
mod playback;
mod catalog;
mod app_model;

pub use types::{ActiveSection, UiState};

pub use episode::{duration_to_time_string, Episode, EpisodeSummary};

pub use player_state::PlayerState;

pub use playback::PlaybackInfo;

pub use catalog::{Catalog, CatalogClient};

pub use app_model::AppModel;
