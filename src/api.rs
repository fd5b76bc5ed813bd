//! News search API integration
//!
//! Talks to the external `/api/search` collaborator: `name` is required,
//! `timeframe` is appended only when it narrows the default "all time"
//! window. Uses the global HTTP client for connection pooling and reuse.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::globals::get_http_client;

/// Time window applied to a search, mirroring the service's `timeframe`
/// query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    #[default]
    All,
    Day,
    Week,
    Month,
    Year,
}

impl Timeframe {
    /// Wire value for the `timeframe` parameter. `All` maps to `None` and is
    /// omitted from the request entirely, keeping the default request shape
    /// unparameterized.
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            Timeframe::All => None,
            Timeframe::Day => Some("day"),
            Timeframe::Week => Some("week"),
            Timeframe::Month => Some("month"),
            Timeframe::Year => Some("year"),
        }
    }

    /// Human label for the filter line.
    pub fn label(self) -> &'static str {
        match self {
            Timeframe::All => "All Time",
            Timeframe::Day => "Past 24 Hours",
            Timeframe::Week => "Past Week",
            Timeframe::Month => "Past Month",
            Timeframe::Year => "Past Year",
        }
    }

    /// Next filter in display order, wrapping back to `All`.
    pub fn next(self) -> Timeframe {
        match self {
            Timeframe::All => Timeframe::Day,
            Timeframe::Day => Timeframe::Week,
            Timeframe::Week => Timeframe::Month,
            Timeframe::Month => Timeframe::Year,
            Timeframe::Year => Timeframe::All,
        }
    }
}

/// One news article as returned by the search service.
///
/// Only `title`, `link`, and `snippet` are guaranteed; the rest depend on
/// what the upstream news index knows about the story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub snippet: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Why a search failed. All variants surface as a single error panel; only
/// the message text differs.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network unreachable, DNS, transport timeout, or body read failure.
    #[error("Failed to reach the news search service: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("Search failed: HTTP {0}")]
    Status(reqwest::StatusCode),
    /// The body did not parse as a JSON array of articles.
    #[error("Search returned an unexpected response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Base URL of the search service, without a trailing slash.
///
/// Read from `NEWSSEARCH_API_URL`; defaults to the local development server.
pub fn api_base_url() -> String {
    let base = std::env::var("NEWSSEARCH_API_URL")
        .unwrap_or_else(|_| String::from("http://localhost:8000"));
    base.trim_end_matches('/').to_string()
}

/// Build the request URL for a (name, timeframe) pair.
fn build_search_url(base_url: &str, name: &str, timeframe: Timeframe) -> String {
    let mut url = format!(
        "{}/api/search?name={}",
        base_url,
        urlencoding::encode(name)
    );
    if let Some(param) = timeframe.as_param() {
        url.push_str("&timeframe=");
        url.push_str(param);
    }
    url
}

/// Parse a response body into articles.
///
/// Kept separate from the request path so malformed bodies are classified
/// apart from transport failures.
fn parse_articles(body: &str) -> Result<Vec<Article>, serde_json::Error> {
    serde_json::from_str(body)
}

/// Fetch news articles about `name` within `timeframe`.
///
/// An empty array is a valid outcome, distinct from any error.
pub async fn search_news(
    base_url: &str,
    name: &str,
    timeframe: Timeframe,
) -> Result<Vec<Article>, SearchError> {
    let client = get_http_client();
    let url = build_search_url(base_url, name, timeframe);

    tracing::debug!(%url, "dispatching search request");

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!(%status, "search request rejected");
        return Err(SearchError::Status(status));
    }

    let body = response.text().await?;
    let articles = parse_articles(&body)?;

    tracing::debug!(count = articles.len(), "search request completed");
    Ok(articles)
}
