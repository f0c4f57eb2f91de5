//! Player controls and the binding between the playback store and the media
//! element

use super::AppController;

/// How far one seek key press moves, in seconds
pub const SEEK_STEP_SECS: u64 = 10;

impl AppController {
    pub async fn toggle_playback(&self) {
        let model = self.model.lock().await;
        if !model.get_playback_info().await.controls.play_pause {
            return;
        }
        model.toggle_play().await;
        tracing::debug!(is_playing = model.is_playing().await, "Toggled playback");
        drop(model);
        self.sync_media(false).await;
    }

    pub async fn next_episode(&self) {
        let model = self.model.lock().await;
        if !model.get_playback_info().await.controls.next {
            return;
        }
        model.play_next().await;
        drop(model);
        tracing::info!("Skipped to next episode");
        self.sync_media(false).await;
    }

    pub async fn previous_episode(&self) {
        let model = self.model.lock().await;
        if !model.get_playback_info().await.controls.previous {
            return;
        }
        model.play_previous().await;
        drop(model);
        tracing::info!("Went back to previous episode");
        self.sync_media(false).await;
    }

    pub async fn toggle_looping(&self) {
        let model = self.model.lock().await;
        if !model.get_playback_info().await.controls.looping {
            return;
        }
        model.toggle_looping().await;
        tracing::debug!(looping = model.is_looping().await, "Toggled looping");
        drop(model);
        self.sync_media(false).await;
    }

    pub async fn toggle_shuffle(&self) {
        let model = self.model.lock().await;
        if !model.get_playback_info().await.controls.shuffle {
            return;
        }
        model.toggle_shuffle().await;
        drop(model);
        self.sync_media(false).await;
    }

    /// Move the playhead by `delta` seconds from where the element is,
    /// clamped to the episode
    pub async fn seek_by(&self, delta: i64) {
        let model = self.model.lock().await;
        if model.current_episode().await.is_none() {
            return;
        }

        let mut media = self.media.lock().await;
        if media.source().is_none() {
            return;
        }
        let target = media.current_time() + delta as f64;
        let target = match media.duration() {
            0 => target.max(0.0),
            duration => target.clamp(0.0, duration as f64),
        };
        media.seek(target);
        drop(media);

        model.set_progress(target.floor() as u64).await;
        tracing::debug!(seconds = target, "Seeked");
    }

    /// Bring the media element in line with the store.
    ///
    /// A new current episode is loaded and autoplayed; the store learns it is
    /// playing from the element's play event. Otherwise `is_playing` is
    /// applied as play/pause. `force_reload` restarts the current episode even
    /// when its URL did not change.
    pub async fn sync_media(&self, force_reload: bool) {
        let model = self.model.lock().await;
        let episode = model.current_episode().await;
        let is_playing = model.is_playing().await;
        let is_looping = model.is_looping().await;

        let mut media = self.media.lock().await;
        match episode {
            None => {
                if media.source().is_some() {
                    media.unload();
                    drop(media);
                    model.set_progress(0).await;
                }
            }
            Some(episode) => {
                if force_reload || media.source() != Some(episode.url.as_str()) {
                    tracing::info!(episode_id = %episode.id, title = %episode.title, "Loading episode");
                    media.load(&episode.url, episode.duration);
                    media.set_looping(is_looping);
                    media.play();
                    drop(media);
                    model.set_progress(0).await;
                    return;
                }

                media.set_looping(is_looping);
                if is_playing && media.is_paused() {
                    media.play();
                } else if !is_playing && !media.is_paused() {
                    media.pause();
                }
            }
        }
    }
}
