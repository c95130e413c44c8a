// src/github/mod.rs
// =============================================================================
// This module handles everything GitHub-specific.
//
// Currently implements:
// - Parsing GitHub URLs into an owner/repo identity plus sub-path
// - Listing directories through the contents API
// - Fetching file bodies, via download_url or base64 from the API
//
// Not handled (on purpose):
// - Authentication tokens
// - Rate-limit backoff; a 403 is simply reported
// =============================================================================

pub(crate) mod api;
mod locator;

pub use api::{
    fetch_file_text, ContentItem, ContentsApi, FileSource, GithubClient,
    DEFAULT_API_BASE, DEFAULT_TIMEOUT,
};
pub use locator::{parse_repo_url_or_err, RepoId};
