//! Render-side view of the playback store

use super::episode::Episode;
use super::player_state::{PlaybackMode, PlayerState};

/// Which player buttons accept input right now
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerControls {
    pub shuffle: bool,
    pub previous: bool,
    pub play_pause: bool,
    pub next: bool,
    pub looping: bool,
}

impl PlayerControls {
    pub fn from_state(state: &PlayerState) -> Self {
        let has_episode = state.current_episode().is_some();
        Self {
            shuffle: has_episode && state.queue().len() != 1,
            previous: has_episode && state.has_previous(),
            play_pause: has_episode,
            next: has_episode && state.has_next(),
            looping: has_episode,
        }
    }
}

/// Everything the player panel needs for one frame
#[derive(Clone, Debug, Default)]
pub struct PlaybackInfo {
    pub episode: Option<Episode>,
    pub queue_len: usize,
    pub current_index: usize,
    pub progress: u64,
    pub is_playing: bool,
    pub is_looping: bool,
    pub is_shuffle: bool,
    pub controls: PlayerControls,
}

impl PlaybackInfo {
    pub fn from_state(state: &PlayerState, progress: u64) -> Self {
        let mode = state.mode();
        Self {
            episode: state.current_episode().cloned(),
            queue_len: state.queue().len(),
            current_index: state.current_index(),
            progress,
            is_playing: state.is_playing(),
            is_looping: mode == PlaybackMode::Looping,
            is_shuffle: mode == PlaybackMode::Shuffle,
            controls: PlayerControls::from_state(state),
        }
    }

    pub fn duration(&self) -> u64 {
        self.episode.as_ref().map(|e| e.duration).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(id: &str) -> Episode {
        Episode {
            id: id.to_string(),
            title: id.to_uppercase(),
            members: String::new(),
            thumbnail: String::new(),
            url: format!("https://example.com/{}.m4a", id),
            duration: 60,
        }
    }

    #[test]
    fn everything_disabled_without_episode() {
        let state = PlayerState::with_seed(1);
        assert_eq!(PlayerControls::from_state(&state), PlayerControls::default());
    }

    #[test]
    fn single_episode_disables_shuffle_and_navigation() {
        let mut state = PlayerState::with_seed(1);
        state.play(episode("a"));
        let controls = PlayerControls::from_state(&state);
        assert!(!controls.shuffle);
        assert!(!controls.previous);
        assert!(!controls.next);
        assert!(controls.play_pause);
        assert!(controls.looping);
    }

    #[test]
    fn middle_of_queue_enables_both_directions() {
        let mut state = PlayerState::with_seed(1);
        state.play_list(vec![episode("a"), episode("b"), episode("c")], 1);
        let controls = PlayerControls::from_state(&state);
        assert!(controls.shuffle);
        assert!(controls.previous);
        assert!(controls.next);
    }

    #[test]
    fn shuffle_keeps_next_enabled_at_the_end() {
        let mut state = PlayerState::with_seed(1);
        state.play_list(vec![episode("a"), episode("b")], 1);
        assert!(!PlayerControls::from_state(&state).next);
        state.toggle_shuffle();
        assert!(PlayerControls::from_state(&state).next);
    }

    #[test]
    fn info_snapshot_reflects_state() {
        let mut state = PlayerState::with_seed(1);
        state.play_list(vec![episode("a"), episode("b")], 1);
        state.toggle_looping();
        let info = PlaybackInfo::from_state(&state, 12);
        assert_eq!(info.episode.as_ref().map(|e| e.id.as_str()), Some("b"));
        assert_eq!(info.queue_len, 2);
        assert_eq!(info.progress, 12);
        assert_eq!(info.duration(), 60);
        assert!(info.is_looping);
        assert!(!info.is_shuffle);
    }
}
