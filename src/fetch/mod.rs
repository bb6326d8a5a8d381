//! Remote release-note fetch.
//!
//! Maps a recognized release-page URL onto the hosting provider's structured
//! release API and pulls the `body` field of the JSON response. GitHub is the
//! only supported host. One GET per invocation; no retries, no caching of
//! failures (the next observation of the entity re-attempts).

use crate::types::{Error, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

const GITHUB_API_BASE: &str = "https://api.github.com";

/// Release-page URL pattern: `https://github.com/<owner>/<repo>/releases/(tag/)?<tag>`.
/// Tag capture stops at `/`, `?`, `#`, or space, so query strings and
/// fragments are not swallowed into the tag.
#[allow(clippy::unwrap_used)] // pattern is a compile-time constant
fn github_release_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https://github\.com/([^/]+)/([^/]+)/releases/(?:tag/)?([^/?# ]+)")
            .unwrap()
    })
}

/// Translate a GitHub release-page URL into the matching API endpoint path
/// under `api_base`, or `None` for unrecognized URLs.
///
/// The literal tag `latest` maps to `/releases/latest`; anything else maps
/// to `/releases/tags/<tag>`.
pub fn parse_github_release_url(api_base: &str, url: &str) -> Option<String> {
    let captures = github_release_re().captures(url)?;
    let (owner, repo, tag) = (&captures[1], &captures[2], &captures[3]);

    if tag == "latest" {
        Some(format!("{api_base}/repos/{owner}/{repo}/releases/latest"))
    } else {
        Some(format!("{api_base}/repos/{owner}/{repo}/releases/tags/{tag}"))
    }
}

/// Outbound release-note retrieval.
#[async_trait]
pub trait ReleaseNotesFetcher: Send + Sync {
    /// Fetch release-note text for the given release-page URL.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Shape of a GitHub release API response (only the field we read).
#[derive(Debug, Deserialize)]
struct GitHubRelease {
    #[serde(default)]
    body: Option<String>,
}

/// Fetches release notes through the GitHub releases API.
#[derive(Debug, Clone)]
pub struct GitHubReleaseFetcher {
    client: reqwest::Client,
    api_base: String,
}

impl GitHubReleaseFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_api_base(client, GITHUB_API_BASE)
    }

    /// Point the fetcher at an alternate API base (tests).
    pub fn with_api_base(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }
}

#[async_trait]
impl ReleaseNotesFetcher for GitHubReleaseFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let api_url = parse_github_release_url(&self.api_base, url)
            .ok_or_else(|| Error::unsupported_url(url))?;

        let response = self
            .client
            .get(&api_url)
            .header(reqwest::header::USER_AGENT, "update-translator")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let release: GitHubRelease = response.json().await?;
        match release.body {
            Some(body) if !body.is_empty() => {
                tracing::debug!("Fetched release notes from GitHub API: {} chars", body.len());
                Ok(body)
            }
            _ => Err(Error::EmptyBody),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_url() {
        assert_eq!(
            parse_github_release_url(
                GITHUB_API_BASE,
                "https://github.com/acme/widget/releases/tag/v2.0"
            ),
            Some("https://api.github.com/repos/acme/widget/releases/tags/v2.0".to_string())
        );
    }

    #[test]
    fn test_bare_tag_url() {
        // Some integrations link without the /tag/ segment
        assert_eq!(
            parse_github_release_url(
                GITHUB_API_BASE,
                "https://github.com/acme/widget/releases/v2.0"
            ),
            Some("https://api.github.com/repos/acme/widget/releases/tags/v2.0".to_string())
        );
    }

    #[test]
    fn test_latest_url() {
        assert_eq!(
            parse_github_release_url(
                GITHUB_API_BASE,
                "https://github.com/acme/widget/releases/latest"
            ),
            Some("https://api.github.com/repos/acme/widget/releases/latest".to_string())
        );
    }

    #[test]
    fn test_tag_stops_at_query_and_fragment() {
        assert_eq!(
            parse_github_release_url(
                GITHUB_API_BASE,
                "https://github.com/acme/widget/releases/tag/v2.0?tab=notes#top"
            ),
            Some("https://api.github.com/repos/acme/widget/releases/tags/v2.0".to_string())
        );
    }

    #[test]
    fn test_non_github_host_rejected() {
        assert_eq!(
            parse_github_release_url(GITHUB_API_BASE, "https://gitlab.com/acme/widget/releases/tag/v2.0"),
            None
        );
        assert_eq!(
            parse_github_release_url(GITHUB_API_BASE, "https://github.com/acme/widget"),
            None
        );
    }

    #[tokio::test]
    async fn test_fetcher_rejects_unrecognized_url() {
        let fetcher = GitHubReleaseFetcher::new(reqwest::Client::new());
        let result = fetcher.fetch("https://example.com/changelog").await;
        assert!(matches!(result, Err(Error::UnsupportedUrl(_))));
    }
}
