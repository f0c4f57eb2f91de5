//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and drives the media backend.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Player controls and the store-to-media binding
//! - `navigation`: Listing selection, episode details, catalog loading
//! - `player_events`: Media event listener

mod input;
mod playback;
mod navigation;
mod player_events;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::audio::MediaElement;
use crate::model::AppModel;

/// Shared handle to whichever media element is in use
pub type SharedMedia = Arc<Mutex<Box<dyn MediaElement>>>;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) media: SharedMedia,
    revalidate_every: Duration,
    event_listener_started: Arc<Mutex<bool>>,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, media: SharedMedia, revalidate_every: Duration) -> Self {
        Self {
            model,
            media,
            revalidate_every,
            event_listener_started: Arc::new(Mutex::new(false)),
        }
    }

    /// Start the media event listener once
    pub async fn start(&self) {
        let mut started = self.event_listener_started.lock().await;
        if *started {
            return;
        }
        *started = true;
        drop(started);

        self.start_player_event_listener();
        self.start_revalidation_task();
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        let error_str = format!("{:#}", error);

        if error_str.contains("404") {
            "Episode list not found. Check PODCASTR_API_URL.".to_string()
        } else if error_str.contains("500") || error_str.contains("502") || error_str.contains("503") {
            "The content API is unavailable. Try again later (r).".to_string()
        } else if error_str.contains("timed out") {
            "The content API took too long to answer.".to_string()
        } else if error_str.contains("error sending request") || error_str.contains("Connection refused") {
            "Cannot reach the content API. Is it running?".to_string()
        } else if error_str.contains("malformed episode list") {
            "The content API returned an unexpected episode list.".to_string()
        } else {
            format!("Error: {}", error_str)
        }
    }
}
