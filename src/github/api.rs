// src/github/api.rs
// =============================================================================
// This module talks to GitHub over HTTP.
//
// Two kinds of requests are made:
//   - Directory listings via the contents API:
//       GET https://api.github.com/repos/{owner}/{repo}/contents/{path}
//   - File bodies, preferably via the entry's download_url
//     (raw.githubusercontent.com, plain text, no API quota), falling back
//     to the contents API which returns base64-encoded content.
//
// The ContentsApi trait is the seam between the navigation engine and the
// network. GithubClient is the real implementation; tests plug in a fake.
//
// Status codes map onto the engine's error taxonomy:
//   404 -> NotFound, 401/403 -> Unauthorized, other non-2xx -> NetworkFailure
// =============================================================================

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::locator::RepoId;
use crate::error::{ExplorerError, ExplorerResult};

/// Public GitHub REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("repo-explorer/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

/// One item of a contents API response, exactly as GitHub sends it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentItem {
    pub name: String,
    pub path: String,
    /// "file", "dir", "symlink" or "submodule"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub sha: Option<String>,
}

/// The contents API answers with an array for directories and a single
/// object when the path names a file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingBody {
    Many(Vec<ContentItem>),
    One(ContentItem),
}

impl ListingBody {
    fn into_items(self) -> Vec<ContentItem> {
        match self {
            ListingBody::Many(items) => items,
            ListingBody::One(item) => vec![item],
        }
    }
}

/// File metadata from the contents API, including the encoded body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileContents {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Where a file body should be fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// A direct download URL serving the raw text.
    Download(String),
    /// The metadata endpoint, which returns base64 content.
    ContentsApi,
}

/// The operations the explorer needs from a hosting service.
#[async_trait]
pub trait ContentsApi: Send + Sync {
    /// List a directory (or describe a single file) at `path`.
    async fn list_directory(&self, id: &RepoId, path: &str) -> ExplorerResult<Vec<ContentItem>>;

    /// Fetch a plain-text body from a direct download URL.
    async fn download(&self, url: &str) -> ExplorerResult<String>;

    /// Fetch file metadata, with the body still encoded.
    async fn file_contents(&self, id: &RepoId, path: &str) -> ExplorerResult<FileContents>;
}

// Fetches the text of one file using the cheapest source available
//
// Download URLs are tried when present; otherwise the contents API is used
// and its base64 payload decoded.
pub async fn fetch_file_text(
    api: &dyn ContentsApi,
    id: &RepoId,
    path: &str,
    source: &FileSource,
) -> ExplorerResult<String> {
    match source {
        FileSource::Download(url) => api.download(url).await,
        FileSource::ContentsApi => decode_contents(api.file_contents(id, path).await?),
    }
}

// Decodes a contents API payload into text
//
// GitHub wraps base64 output at 60 columns, so newlines are stripped before
// decoding. Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn decode_contents(contents: FileContents) -> ExplorerResult<String> {
    match (contents.content, contents.encoding.as_deref()) {
        (Some(content), Some("base64")) => {
            let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = BASE64
                .decode(compact)
                .map_err(|_| ExplorerError::UnsupportedEncoding(Some("base64".to_string())))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        (_, encoding) => Err(ExplorerError::UnsupportedEncoding(
            encoding.map(str::to_string),
        )),
    }
}

/// reqwest-backed client for the GitHub contents API.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    api_base: Url,
}

impl GithubClient {
    // Builds a client with a bounded per-request timeout
    //
    // The reqwest Client is reused for every request (connection pooling).
    pub fn new(api_base: &str, timeout: Duration) -> anyhow::Result<Self> {
        let api_base = Url::parse(api_base)
            .map_err(|e| anyhow::anyhow!("Invalid API base URL '{}': {}", api_base, e))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(GithubClient { client, api_base })
    }

    fn contents_url(&self, id: &RepoId, path: &str) -> ExplorerResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| ExplorerError::transport("API base URL cannot have a path"))?
            .pop_if_empty()
            .extend(["repos", id.owner.as_str(), id.repo.as_str(), "contents"])
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    async fn get_json(&self, url: Url, path: &str) -> ExplorerResult<Response> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, GITHUB_JSON)
            .send()
            .await
            .map_err(categorize_error)?;
        check_status(response, path)
    }
}

#[async_trait]
impl ContentsApi for GithubClient {
    async fn list_directory(&self, id: &RepoId, path: &str) -> ExplorerResult<Vec<ContentItem>> {
        let url = self.contents_url(id, path)?;
        let body: ListingBody = self
            .get_json(url, path)
            .await?
            .json()
            .await
            .map_err(categorize_error)?;
        Ok(body.into_items())
    }

    async fn download(&self, url: &str) -> ExplorerResult<String> {
        debug!(%url, "GET (raw)");
        let response = self.client.get(url).send().await.map_err(categorize_error)?;
        check_status(response, url)?
            .text()
            .await
            .map_err(categorize_error)
    }

    async fn file_contents(&self, id: &RepoId, path: &str) -> ExplorerResult<FileContents> {
        let url = self.contents_url(id, path)?;
        self.get_json(url, path)
            .await?
            .json()
            .await
            .map_err(categorize_error)
    }
}

// Turns a non-2xx response into the matching error
//
// HTTP status codes:
// - 2xx: pass the response through
// - 404: the path does not exist
// - 401/403: GitHub refuses (private repo or rate limit)
// - anything else: generic network failure carrying the code
fn check_status(response: Response, what: &str) -> ExplorerResult<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    Err(match status {
        StatusCode::NOT_FOUND => ExplorerError::NotFound(what.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ExplorerError::Unauthorized(status.as_u16())
        }
        _ => ExplorerError::NetworkFailure {
            code: Some(status.as_u16()),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        },
    })
}

// Categorizes transport errors from reqwest
//
// None of these carry a status code; the message is what the user sees.
fn categorize_error(error: reqwest::Error) -> ExplorerError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else if error.is_decode() {
        format!("unexpected response body: {}", error)
    } else {
        error.to_string()
    };

    ExplorerError::transport(message)
}
