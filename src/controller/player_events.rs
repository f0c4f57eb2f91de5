//! Media event listener: feeds element events back into the playback store

use std::time::Duration;

use crate::audio::MediaEvent;
use super::AppController;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Handling one event can make the element queue more (a load queues a play)
const MAX_DRAIN_ROUNDS: usize = 8;

impl AppController {
    pub fn start_player_event_listener(&self) {
        let controller = self.clone();
        tracing::info!("Starting media event listener");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(POLL_INTERVAL);
            loop {
                ticker.tick().await;
                if controller.model.lock().await.should_quit().await {
                    tracing::debug!("Media event listener shutting down");
                    break;
                }
                controller.pump_media_events().await;
            }
        });
    }

    /// Dispatch everything the element has queued, including events caused
    /// by handling earlier ones
    pub async fn pump_media_events(&self) {
        for _ in 0..MAX_DRAIN_ROUNDS {
            let events = self.media.lock().await.poll_events();
            if events.is_empty() {
                return;
            }
            for event in events {
                self.handle_media_event(event).await;
            }
        }
    }

    pub async fn handle_media_event(&self, event: MediaEvent) {
        match event {
            MediaEvent::LoadedMetadata { duration } => {
                tracing::debug!(duration, "MediaEvent::LoadedMetadata");
                self.model.lock().await.set_progress(0).await;
            }
            MediaEvent::Play => {
                tracing::debug!("MediaEvent::Play");
                self.model.lock().await.set_playing_state(true).await;
            }
            MediaEvent::Pause => {
                tracing::debug!("MediaEvent::Pause");
                self.model.lock().await.set_playing_state(false).await;
            }
            MediaEvent::TimeUpdate { load_id, seconds } => {
                if !self.is_current_load(load_id).await {
                    return;
                }
                tracing::trace!(seconds, "MediaEvent::TimeUpdate");
                self.model.lock().await.set_progress(seconds.floor() as u64).await;
            }
            MediaEvent::Ended { load_id } => {
                self.handle_episode_ended(load_id).await;
            }
            MediaEvent::Error(message) => {
                tracing::error!(error = %message, "MediaEvent::Error");
                let model = self.model.lock().await;
                // A player that never started sends no Pause
                model.set_playing_state(false).await;
                model.set_error(message).await;
            }
        }
    }

    /// Events are dispatched after the batch was taken, so a key handler may
    /// have loaded another source in between
    async fn is_current_load(&self, load_id: u64) -> bool {
        self.media.lock().await.load_id() == load_id
    }

    async fn handle_episode_ended(&self, load_id: u64) {
        let model = self.model.lock().await;

        // The store may already point at a new pick that is not loaded yet
        let current_url = model.current_episode().await.map(|e| e.url);
        {
            let media = self.media.lock().await;
            if media.load_id() != load_id || media.source() != current_url.as_deref() {
                tracing::debug!(load_id, "Dropping Ended for a replaced source");
                return;
            }
        }

        if model.has_next().await {
            tracing::info!("Episode ended, playing next");
            model.play_next().await;
        } else {
            tracing::info!("Episode ended, queue finished");
            model.clear_player_state().await;
        }
        drop(model);
        // Shuffle may pick the episode that just ended
        self.sync_media(true).await;
    }
}
