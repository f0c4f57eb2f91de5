//! Episode value types shared by the catalog, the store and the views

/// A playable episode. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub members: String,
    pub thumbnail: String,
    pub url: String,
    /// Total length in seconds
    pub duration: u64,
}

/// A catalog row: the episode plus the fields only the listing shows
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EpisodeSummary {
    pub episode: Episode,
    pub published_at: String,
    pub duration_as_string: String,
    pub description: String,
}

impl EpisodeSummary {
    pub fn id(&self) -> &str {
        &self.episode.id
    }
}

/// Render seconds as `HH:MM:SS`
pub fn duration_to_time_string(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::duration_to_time_string;

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(duration_to_time_string(0), "00:00:00");
        assert_eq!(duration_to_time_string(59), "00:00:59");
        assert_eq!(duration_to_time_string(3_661), "01:01:01");
        assert_eq!(duration_to_time_string(5_025), "01:23:45");
    }
}
