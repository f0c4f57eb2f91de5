//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use super::AppController;
use super::playback::SEEK_STEP_SECS;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Errors block all other interaction until dismissed
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return Ok(());
        }

        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        if model.is_details_open().await {
            match key.code {
                KeyCode::Esc | KeyCode::Char('d') | KeyCode::Char('D') => {
                    model.hide_details().await;
                    return Ok(());
                }
                KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P') => {
                    drop(model);
                    self.play_detail_episode().await;
                    return Ok(());
                }
                KeyCode::Char('q') | KeyCode::Char('Q') => {
                    model.set_should_quit(true).await;
                    return Ok(());
                }
                // Player keys keep working under the overlay
                _ => {}
            }
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                model.cycle_section().await;
            }
            KeyCode::Up => {
                model.move_selection_up().await;
            }
            KeyCode::Down => {
                model.move_selection_down().await;
            }
            KeyCode::Enter => {
                drop(model);
                self.play_selected().await;
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                drop(model);
                self.open_selected_details().await;
            }
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                drop(model);
                self.next_episode().await;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                drop(model);
                self.previous_episode().await;
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                drop(model);
                self.toggle_looping().await;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                drop(model);
                self.toggle_shuffle().await;
            }
            KeyCode::Left => {
                drop(model);
                self.seek_by(-(SEEK_STEP_SECS as i64)).await;
            }
            KeyCode::Right => {
                drop(model);
                self.seek_by(SEEK_STEP_SECS as i64).await;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                self.refresh_catalog();
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    use crate::controller::test_support::{controller, episode, take_calls};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn loop_then_shuffle_keys_stay_exclusive() {
        let (ctrl, _calls) = controller();
        ctrl.model
            .lock()
            .await
            .play_list(vec![episode("a"), episode("b")], 0)
            .await;

        ctrl.handle_key_event(press(KeyCode::Char('s'))).await.unwrap();
        ctrl.handle_key_event(press(KeyCode::Char('l'))).await.unwrap();

        let info = ctrl.model.lock().await.get_playback_info().await;
        assert!(info.is_looping);
        assert!(!info.is_shuffle);
    }

    #[tokio::test]
    async fn error_overlay_swallows_keys_until_dismissed() {
        let (ctrl, calls) = controller();
        ctrl.model.lock().await.play(episode("a")).await;
        ctrl.model.lock().await.set_error("boom".to_string()).await;

        ctrl.handle_key_event(press(KeyCode::Char(' '))).await.unwrap();
        assert!(take_calls(&calls).is_empty());

        ctrl.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        assert!(!ctrl.model.lock().await.has_error().await);
    }

    #[tokio::test]
    async fn releases_are_ignored() {
        let (ctrl, _calls) = controller();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        ctrl.handle_key_event(key).await.unwrap();
        assert!(!ctrl.model.lock().await.should_quit().await);

        ctrl.handle_key_event(press(KeyCode::Char('q'))).await.unwrap();
        assert!(ctrl.model.lock().await.should_quit().await);
    }

    #[tokio::test]
    async fn help_toggles_with_h() {
        let (ctrl, _calls) = controller();
        ctrl.handle_key_event(press(KeyCode::Char('h'))).await.unwrap();
        assert!(ctrl.model.lock().await.is_help_popup_open().await);
        ctrl.handle_key_event(press(KeyCode::Char('h'))).await.unwrap();
        assert!(!ctrl.model.lock().await.is_help_popup_open().await);
    }
}
