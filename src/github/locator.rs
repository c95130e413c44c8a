// src/github/locator.rs
// =============================================================================
// This module turns a GitHub URL into a repository identity.
//
// Supported formats:
//   - https://github.com/owner/repo
//   - https://github.com/owner/repo.git
//   - https://github.com/owner/repo/some/sub/path
//
// Everything after owner/repo is kept verbatim as the initial sub-path.
// Branch-qualified URLs (.../tree/main/src) are NOT rewritten: the path
// comes back as "tree/main/src". Browsing a non-default branch is out of
// scope for the explorer.
//
// Parsing never fails loudly: bad input simply yields None and the caller
// decides how to tell the user.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::ExplorerError;

/// The only host we know how to browse.
pub const GITHUB_HOST: &str = "github.com";

/// The (owner, repo) pair that identifies a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoId {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// The URL written into shareable links, e.g. "https://github.com/rust-lang/rust".
    pub fn canonical_url(&self) -> String {
        format!("https://{}/{}/{}", GITHUB_HOST, self.owner, self.repo)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A parsed repository URL: who, which repo, and where inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    pub id: RepoId,
    /// Slash-joined segments after owner/repo, empty for the root.
    pub path: String,
}

// Parses a GitHub URL into a RepoLocation
//
// Returns None when:
//   - the input is not a syntactically valid URL
//   - the host is not github.com
//   - there are fewer than two non-empty path segments
//
// Example:
//   "https://github.com/rust-lang/rust.git" -> rust-lang/rust, path ""
pub fn parse_repo_url(input: &str) -> Option<RepoLocation> {
    let url = Url::parse(input.trim()).ok()?;

    if url.host_str()? != GITHUB_HOST {
        return None;
    }

    let segments: Vec<&str> = url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.len() < 2 {
        return None;
    }

    let owner = segments[0];
    let repo = segments[1].strip_suffix(".git").unwrap_or(segments[1]);
    if repo.is_empty() {
        return None;
    }

    Some(RepoLocation {
        id: RepoId::new(owner, repo),
        path: segments[2..].join("/"),
    })
}

/// Same as [`parse_repo_url`] but with an error that tells the user what a
/// valid URL looks like.
pub fn parse_repo_url_or_err(input: &str) -> Result<RepoLocation, ExplorerError> {
    parse_repo_url(input).ok_or_else(|| ExplorerError::InvalidUrl(input.trim().to_string()))
}
