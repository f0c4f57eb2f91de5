//! Playback state store: the episode queue, the current position and the
//! playback flags, with the navigation and toggle operations the views use.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::episode::Episode;

/// Loop and shuffle are mutually exclusive, so they share one field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackMode {
    #[default]
    Sequential,
    Looping,
    Shuffle,
}

pub struct PlayerState {
    queue: Vec<Episode>,
    current_index: usize,
    is_playing: bool,
    mode: PlaybackMode,
    rng: StdRng,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Build a store whose shuffle picks are reproducible
    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            queue: Vec::new(),
            current_index: 0,
            is_playing: false,
            mode: PlaybackMode::Sequential,
            rng,
        }
    }

    // ========================================================================
    // Queue replacement
    // ========================================================================

    pub fn play(&mut self, episode: Episode) {
        tracing::debug!(episode_id = %episode.id, "Playing single episode");
        self.queue = vec![episode];
        self.current_index = 0;
        self.is_playing = true;
    }

    /// `index` must be within `list`; the caller guarantees it.
    pub fn play_list(&mut self, list: Vec<Episode>, index: usize) {
        tracing::debug!(len = list.len(), index, "Playing episode list");
        self.queue = list;
        self.current_index = index;
        self.is_playing = true;
    }

    pub fn clear_player_state(&mut self) {
        tracing::debug!("Clearing player queue");
        self.queue.clear();
        self.current_index = 0;
    }

    // ========================================================================
    // Flags
    // ========================================================================

    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
    }

    pub fn set_playing_state(&mut self, state: bool) {
        self.is_playing = state;
    }

    pub fn toggle_looping(&mut self) {
        self.mode = match self.mode {
            PlaybackMode::Looping => PlaybackMode::Sequential,
            PlaybackMode::Sequential | PlaybackMode::Shuffle => PlaybackMode::Looping,
        };
    }

    pub fn toggle_shuffle(&mut self) {
        self.mode = match self.mode {
            PlaybackMode::Shuffle => PlaybackMode::Sequential,
            PlaybackMode::Sequential | PlaybackMode::Looping => PlaybackMode::Shuffle,
        };
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn has_previous(&self) -> bool {
        self.current_index > 0
    }

    /// Always true under shuffle, even at the last position.
    pub fn has_next(&self) -> bool {
        self.is_shuffle() || self.current_index + 1 < self.queue.len()
    }

    pub fn play_next(&mut self) {
        if self.is_shuffle() {
            // Repeats of the current episode are allowed
            self.current_index = if self.queue.is_empty() {
                0
            } else {
                self.rng.random_range(0..self.queue.len())
            };
        } else if self.has_next() {
            self.current_index += 1;
        }
    }

    pub fn play_previous(&mut self) {
        if self.has_previous() {
            self.current_index -= 1;
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn queue(&self) -> &[Episode] {
        &self.queue
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.queue.get(self.current_index)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_looping(&self) -> bool {
        self.mode == PlaybackMode::Looping
    }

    pub fn is_shuffle(&self) -> bool {
        self.mode == PlaybackMode::Shuffle
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerState")
            .field("queue_len", &self.queue.len())
            .field("current_index", &self.current_index)
            .field("is_playing", &self.is_playing)
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(id: &str) -> Episode {
        Episode {
            id: id.to_string(),
            title: format!("Episode {}", id),
            members: "Diego e Richard".to_string(),
            thumbnail: format!("https://example.com/{}.jpg", id),
            url: format!("https://example.com/{}.m4a", id),
            duration: 3600,
        }
    }

    fn abc() -> Vec<Episode> {
        vec![episode("a"), episode("b"), episode("c")]
    }

    #[test]
    fn starts_empty_and_paused() {
        let state = PlayerState::with_seed(1);
        assert!(state.queue().is_empty());
        assert_eq!(state.current_index(), 0);
        assert!(!state.is_playing());
        assert_eq!(state.mode(), PlaybackMode::Sequential);
        assert!(state.current_episode().is_none());
        assert!(!state.has_next());
        assert!(!state.has_previous());
    }

    #[test]
    fn play_list_replaces_queue_and_starts_playing() {
        let mut state = PlayerState::with_seed(1);
        state.play_list(abc(), 1);

        assert_eq!(state.queue(), abc().as_slice());
        assert_eq!(state.current_index(), 1);
        assert!(state.is_playing());
        assert_eq!(state.current_episode().map(|e| e.id.as_str()), Some("b"));
    }

    #[test]
    fn play_replaces_existing_queue_with_single_episode() {
        let mut state = PlayerState::with_seed(1);
        state.play_list(abc(), 2);
        state.set_playing_state(false);

        state.play(episode("e"));

        assert_eq!(state.queue(), &[episode("e")]);
        assert_eq!(state.current_index(), 0);
        assert!(state.is_playing());
    }

    #[test]
    fn next_walks_forward_and_stops_at_end() {
        let mut state = PlayerState::with_seed(1);
        state.play_list(abc(), 0);

        state.play_next();
        assert_eq!(state.current_index(), 1);
        state.play_next();
        assert_eq!(state.current_index(), 2);
        assert!(!state.has_next());

        state.play_next();
        assert_eq!(state.current_index(), 2);
        assert!(state.is_playing());
        assert_eq!(state.queue().len(), 3);
    }

    #[test]
    fn previous_at_start_is_noop() {
        let mut state = PlayerState::with_seed(1);
        state.play_list(abc(), 0);
        state.play_previous();
        assert_eq!(state.current_index(), 0);

        state.play_list(abc(), 2);
        state.play_previous();
        assert_eq!(state.current_index(), 1);
        assert!(state.has_previous());
    }

    #[test]
    fn looping_and_shuffle_exclude_each_other() {
        let mut state = PlayerState::with_seed(1);

        state.toggle_shuffle();
        assert!(state.is_shuffle());
        state.toggle_looping();
        assert!(state.is_looping());
        assert!(!state.is_shuffle());

        state.toggle_shuffle();
        assert!(state.is_shuffle());
        assert!(!state.is_looping());

        state.toggle_shuffle();
        assert!(!state.is_shuffle());
        assert!(!state.is_looping());

        state.toggle_looping();
        state.toggle_looping();
        assert_eq!(state.mode(), PlaybackMode::Sequential);
    }

    #[test]
    fn flags_never_both_set_over_any_toggle_sequence() {
        let mut state = PlayerState::with_seed(7);
        for step in 0..64u32 {
            if step % 3 == 0 {
                state.toggle_looping();
            } else {
                state.toggle_shuffle();
            }
            assert!(!(state.is_looping() && state.is_shuffle()));
        }
    }

    #[test]
    fn shuffle_always_has_next_and_stays_in_range() {
        let mut state = PlayerState::with_seed(42);
        state.play_list(abc(), 2);
        state.toggle_shuffle();

        assert!(state.has_next());
        let mut seen = [false; 3];
        for _ in 0..200 {
            state.play_next();
            assert!(state.current_index() < 3);
            seen[state.current_index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn shuffle_on_empty_queue_stays_at_zero() {
        let mut state = PlayerState::with_seed(3);
        state.toggle_shuffle();
        state.play_next();
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn clear_resets_queue_but_keeps_flags() {
        let mut state = PlayerState::with_seed(1);
        state.play_list(abc(), 2);
        state.toggle_looping();

        state.clear_player_state();

        assert!(state.queue().is_empty());
        assert_eq!(state.current_index(), 0);
        assert!(state.is_playing());
        assert!(state.is_looping());
    }

    #[test]
    fn playing_state_sync_leaves_queue_alone() {
        let mut state = PlayerState::with_seed(1);
        state.play_list(abc(), 1);

        state.set_playing_state(false);
        state.set_playing_state(false);
        assert!(!state.is_playing());
        state.toggle_play();
        assert!(state.is_playing());

        assert_eq!(state.current_index(), 1);
        assert_eq!(state.queue().len(), 3);
    }
}
