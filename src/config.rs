//! Runtime configuration read from `PODCASTR_*` environment variables

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3333";
pub const DEFAULT_EPISODE_LIMIT: usize = 12;
/// The listing is rebuilt every eight hours
pub const DEFAULT_REVALIDATE_SECS: u64 = 60 * 60 * 8;
/// `{start}` and `{url}` are filled in per spawn; a missing `{url}` is appended.
pub const DEFAULT_PLAYER_COMMAND: &str = "ffplay -nodisp -autoexit -loglevel quiet -ss {start} {url}";
pub const DEFAULT_LOG_DIR: &str = ".logs";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub episode_limit: usize,
    pub revalidate_every: Duration,
    /// Program followed by its arguments. Empty means headless playback.
    pub player_command: Vec<String>,
    pub log_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            episode_limit: DEFAULT_EPISODE_LIMIT,
            revalidate_every: Duration::from_secs(DEFAULT_REVALIDATE_SECS),
            player_command: split_command(DEFAULT_PLAYER_COMMAND),
            log_dir: DEFAULT_LOG_DIR.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("PODCASTR_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_url);

        let episode_limit = parse_or_default(
            "PODCASTR_EPISODE_LIMIT",
            lookup("PODCASTR_EPISODE_LIMIT"),
            defaults.episode_limit,
        );

        let revalidate_every = Duration::from_secs(parse_or_default(
            "PODCASTR_REVALIDATE_SECS",
            lookup("PODCASTR_REVALIDATE_SECS"),
            DEFAULT_REVALIDATE_SECS,
        ));

        let player_command = lookup("PODCASTR_PLAYER")
            .map(|cmd| split_command(&cmd))
            .unwrap_or(defaults.player_command);

        let log_dir = lookup("PODCASTR_LOG_DIR")
            .filter(|dir| !dir.is_empty())
            .unwrap_or(defaults.log_dir);

        Self {
            api_url,
            episode_limit,
            revalidate_every,
            player_command,
            log_dir,
        }
    }

    pub fn is_headless(&self) -> bool {
        self.player_command.is_empty()
    }
}

fn parse_or_default<T>(key: &str, value: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match value {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(key, value = %raw, default = %default, "Invalid config value, using default");
                default
            }
        },
        None => default,
    }
}

fn split_command(cmd: &str) -> Vec<String> {
    cmd.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = config_from(&[]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.episode_limit, 12);
        assert_eq!(config.revalidate_every, Duration::from_secs(28_800));
        assert_eq!(config.player_command[0], "ffplay");
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("PODCASTR_API_URL", "https://api.example.com/"),
            ("PODCASTR_EPISODE_LIMIT", "20"),
            ("PODCASTR_REVALIDATE_SECS", "60"),
            ("PODCASTR_PLAYER", "mpv --no-video"),
        ]);
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.episode_limit, 20);
        assert_eq!(config.revalidate_every, Duration::from_secs(60));
        assert_eq!(config.player_command, vec!["mpv", "--no-video"]);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = config_from(&[("PODCASTR_EPISODE_LIMIT", "lots")]);
        assert_eq!(config.episode_limit, DEFAULT_EPISODE_LIMIT);
    }

    #[test]
    fn empty_player_means_headless() {
        let config = config_from(&[("PODCASTR_PLAYER", "")]);
        assert!(config.is_headless());
    }
}
