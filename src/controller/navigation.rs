//! Listing navigation, episode details and catalog loading

use std::time::Duration;

use super::AppController;

/// How often the revalidation task checks the catalog age
const REVALIDATE_CHECK_INTERVAL: Duration = Duration::from_secs(60);

impl AppController {
    /// Start the highlighted row's episode with the whole listing as queue
    pub async fn play_selected(&self) {
        let model = self.model.lock().await;
        let Some(index) = model.get_selected_list_index().await else {
            return;
        };
        let list = model.get_catalog().await.episode_list();
        tracing::info!(index, queue_len = list.len(), "Playing from listing");
        model.play_list(list, index).await;
        drop(model);
        self.sync_media(false).await;
    }

    pub async fn open_selected_details(&self) {
        let model = self.model.lock().await;
        if let Some(index) = model.get_selected_list_index().await {
            model.show_details(index).await;
        }
    }

    /// Play only the episode shown in the details overlay
    pub async fn play_detail_episode(&self) {
        let model = self.model.lock().await;
        let Some(summary) = model.get_detail_episode().await else {
            return;
        };
        tracing::info!(episode_id = %summary.episode.id, "Playing single episode from details");
        model.play(summary.episode).await;
        model.hide_details().await;
        drop(model);
        self.sync_media(false).await;
    }

    /// Fetch the catalog and replace the listing. Failures keep the old
    /// listing and show an error.
    pub async fn load_catalog(&self) {
        self.fetch_catalog(true).await;
    }

    /// Background refetch. Failures only go to the log and the next attempt
    /// waits a full revalidation period.
    pub(crate) async fn revalidate_catalog(&self) {
        self.fetch_catalog(false).await;
    }

    async fn fetch_catalog(&self, report_errors: bool) {
        let model = self.model.lock().await;
        let Some(client) = model.get_catalog_client().await else {
            return;
        };
        model.set_catalog_loading(true).await;
        drop(model);

        let result = client.fetch_latest().await;

        let model = self.model.lock().await;
        match result {
            Ok(catalog) => model.set_catalog(catalog).await,
            Err(e) if report_errors => {
                model.set_catalog_loading(false).await;
                let error_msg = Self::format_error(&e);
                model.set_error(error_msg).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Catalog revalidation failed, keeping current listing");
                model.set_catalog_loading(false).await;
                model.mark_catalog_checked().await;
            }
        }
    }

    /// Refresh in the background so the UI keeps drawing
    pub fn refresh_catalog(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            if controller.model.lock().await.is_catalog_loading().await {
                return;
            }
            controller.load_catalog().await;
        });
    }

    pub(crate) fn start_revalidation_task(&self) {
        let controller = self.clone();
        let revalidate_every = self.revalidate_every;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(REVALIDATE_CHECK_INTERVAL);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let model = controller.model.lock().await;
                if model.should_quit().await {
                    break;
                }
                let stale = model.get_catalog().await.is_stale(revalidate_every);
                let loading = model.is_catalog_loading().await;
                drop(model);

                if stale && !loading {
                    tracing::info!("Catalog is stale, revalidating");
                    controller.revalidate_catalog().await;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::controller::test_support::{controller, episode, take_calls};
    use crate::model::{Catalog, CatalogClient, EpisodeSummary};

    fn summary(id: &str) -> EpisodeSummary {
        EpisodeSummary {
            episode: episode(id),
            published_at: "22 jan 21".to_string(),
            duration_as_string: "00:01:40".to_string(),
            description: String::new(),
        }
    }

    async fn with_catalog() -> (crate::controller::AppController, std::sync::Arc<std::sync::Mutex<Vec<String>>>) {
        let (ctrl, calls) = controller();
        let catalog = Catalog::from_summaries(vec![summary("a"), summary("b"), summary("c"), summary("d")]);
        ctrl.model.lock().await.set_catalog(catalog).await;
        (ctrl, calls)
    }

    #[tokio::test]
    async fn playing_a_row_queues_the_whole_listing() {
        let (ctrl, calls) = with_catalog().await;
        {
            let model = ctrl.model.lock().await;
            model.cycle_section().await;
            model.move_selection_down().await;
        }
        ctrl.play_selected().await;

        let info = ctrl.model.lock().await.get_playback_info().await;
        assert_eq!(info.queue_len, 4);
        assert_eq!(info.current_index, 3);
        assert!(info.is_playing);
        assert_eq!(take_calls(&calls), vec!["load https://example.com/d.m4a", "play"]);
    }

    #[tokio::test]
    async fn details_play_replaces_queue_with_one_episode() {
        let (ctrl, _calls) = with_catalog().await;
        ctrl.play_selected().await;
        ctrl.model.lock().await.move_selection_down().await;
        ctrl.open_selected_details().await;
        assert!(ctrl.model.lock().await.is_details_open().await);

        ctrl.play_detail_episode().await;

        let model = ctrl.model.lock().await;
        let info = model.get_playback_info().await;
        assert_eq!(info.queue_len, 1);
        assert_eq!(info.episode.map(|e| e.id), Some("b".to_string()));
        assert!(!model.is_details_open().await);
    }

    #[tokio::test]
    async fn nothing_happens_on_empty_listing() {
        let (ctrl, calls) = controller();
        ctrl.play_selected().await;
        ctrl.open_selected_details().await;
        ctrl.load_catalog().await;
        assert!(take_calls(&calls).is_empty());
        assert!(!ctrl.model.lock().await.is_details_open().await);
    }

    /// A client for a port nothing listens on
    fn unreachable_client() -> CatalogClient {
        CatalogClient::new("http://127.0.0.1:9", 12).unwrap()
    }

    #[tokio::test]
    async fn failed_revalidation_keeps_controls_usable() {
        let (ctrl, calls) = with_catalog().await;
        ctrl.model.lock().await.set_catalog_client(unreachable_client());
        let checked_before = ctrl.model.lock().await.get_catalog().await.fetched_at;
        ctrl.play_selected().await;
        take_calls(&calls);

        ctrl.revalidate_catalog().await;

        {
            let model = ctrl.model.lock().await;
            assert!(!model.has_error().await);
            assert!(!model.is_catalog_loading().await);
            let catalog = model.get_catalog().await;
            assert_eq!(catalog.len(), 4);
            // The next attempt waits a full period
            assert!(catalog.fetched_at > checked_before);
        }

        ctrl.handle_key_event(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE))
            .await
            .unwrap();
        assert_eq!(take_calls(&calls), vec!["pause"]);
    }

    #[tokio::test]
    async fn failed_user_refresh_shows_the_error() {
        let (ctrl, _calls) = with_catalog().await;
        ctrl.model.lock().await.set_catalog_client(unreachable_client());

        ctrl.load_catalog().await;

        let model = ctrl.model.lock().await;
        assert!(model.has_error().await);
        assert_eq!(model.get_catalog().await.len(), 4);
    }
}
