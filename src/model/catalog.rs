//! Episode catalog: fetching the latest episodes from the content API and
//! shaping them for the home listing.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Locale, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::{log_api_request, log_api_result};
use super::episode::{duration_to_time_string, Episode, EpisodeSummary};

/// How many episodes go into the "latest releases" section
pub const LATEST_COUNT: usize = 2;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const PUBLISHED_AT_FORMAT: &str = "%-d %b %y";

// ============================================================================
// API records
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiEpisode {
    pub id: String,
    pub title: String,
    pub members: String,
    pub published_at: String,
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
    pub file: ApiFile,
}

#[derive(Debug, Deserialize)]
pub struct ApiFile {
    pub url: String,
    pub duration: ApiDuration,
}

/// The API is not consistent about whether durations are numbers or strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiDuration {
    Seconds(u64),
    Fractional(f64),
    Text(String),
}

impl ApiDuration {
    fn as_seconds(&self) -> u64 {
        match self {
            ApiDuration::Seconds(secs) => *secs,
            ApiDuration::Fractional(secs) => secs.max(0.0).floor() as u64,
            ApiDuration::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map(|secs| secs.max(0.0).floor() as u64)
                .unwrap_or_else(|_| {
                    tracing::warn!(value = %raw, "Unparseable episode duration, using 0");
                    0
                }),
        }
    }
}

impl ApiEpisode {
    pub fn into_summary(self) -> EpisodeSummary {
        let duration = self.file.duration.as_seconds();
        let published_at = format_published_at(&self.published_at);

        EpisodeSummary {
            episode: Episode {
                id: self.id,
                title: self.title,
                members: self.members,
                thumbnail: self.thumbnail,
                url: self.file.url,
                duration,
            },
            published_at,
            duration_as_string: duration_to_time_string(duration),
            description: self.description,
        }
    }
}

/// Format an API timestamp as a short pt-BR date, e.g. `22 jan 21`.
/// Values that do not parse are shown as they came.
pub fn format_published_at(raw: &str) -> String {
    match parse_published_at(raw) {
        Some(date) => date
            .format_localized(PUBLISHED_AT_FORMAT, Locale::pt_BR)
            .to_string(),
        None => {
            tracing::warn!(value = %raw, "Unparseable published_at");
            raw.to_string()
        }
    }
}

fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
}

// ============================================================================
// Catalog
// ============================================================================

/// The home listing, split into the latest releases and everything else
#[derive(Clone, Debug)]
pub struct Catalog {
    pub latest: Vec<EpisodeSummary>,
    pub all: Vec<EpisodeSummary>,
    pub fetched_at: Instant,
}

impl Catalog {
    pub fn from_summaries(mut episodes: Vec<EpisodeSummary>) -> Self {
        let split = LATEST_COUNT.min(episodes.len());
        let all = episodes.split_off(split);
        Self {
            latest: episodes,
            all,
            fetched_at: Instant::now(),
        }
    }

    pub fn empty() -> Self {
        Self::from_summaries(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.latest.len() + self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every episode in listing order; this is the queue a row starts.
    pub fn episode_list(&self) -> Vec<Episode> {
        self.latest
            .iter()
            .chain(self.all.iter())
            .map(|summary| summary.episode.clone())
            .collect()
    }

    /// Queue position of a row in the "all episodes" table
    pub fn all_episodes_offset(&self) -> usize {
        self.latest.len()
    }

    pub fn is_stale(&self, revalidate_every: Duration) -> bool {
        self.fetched_at.elapsed() >= revalidate_every
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}

// ============================================================================
// Client
// ============================================================================

/// Read-only client for the content API
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    limit: usize,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, limit: usize) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("cannot build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            limit,
        })
    }

    pub fn episodes_url(&self) -> String {
        format!("{}/episodes", self.base_url)
    }

    pub async fn fetch_latest(&self) -> Result<Catalog> {
        let url = self.episodes_url();
        log_api_request!("fetch_episodes", url = %url, limit = self.limit);

        let result = self.request_episodes(&url).await;
        log_api_result!("fetch_episodes", result);

        let records = result?;
        let summaries: Vec<EpisodeSummary> =
            records.into_iter().map(ApiEpisode::into_summary).collect();

        tracing::info!(count = summaries.len(), "Episode catalog fetched");
        Ok(Catalog::from_summaries(summaries))
    }

    async fn request_episodes(&self, url: &str) -> Result<Vec<ApiEpisode>> {
        let limit = self.limit.to_string();
        let response = self
            .http
            .get(url)
            .query(&[
                ("_limit", limit.as_str()),
                ("_sort", "published_at"),
                ("_order", "desc"),
            ])
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?
            .error_for_status()?;

        let records = response
            .json::<Vec<ApiEpisode>>()
            .await
            .context("malformed episode list")?;
        Ok(records)
    }
}

/// Parse a raw API body
#[cfg(test)]
pub fn parse_episode_list(body: &str) -> Result<Catalog> {
    let records: Vec<ApiEpisode> = serde_json::from_str(body).context("malformed episode list")?;
    Ok(Catalog::from_summaries(
        records.into_iter().map(ApiEpisode::into_summary).collect(),
    ))
}
