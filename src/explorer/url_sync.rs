// src/explorer/url_sync.rs
// =============================================================================
// Shareable links.
//
// A NavigationSnapshot is the part of the navigation state that fits in a
// URL query string:
//
//   ?repo=https://github.com/owner/repo&path=src/app&file=src/app/main.go
//
// - repo: canonical repository URL (always present when a repo is open)
// - path: slash-joined directory path, omitted at the root
// - file: full path of the selected file, omitted when nothing is selected
//
// Content and cache are not part of the snapshot; they are refetched when
// a link is opened.
//
// AddressBar models the page URL. Writing a snapshot replaces the query
// parameters in place, like history.replaceState: no new history entry.
// =============================================================================

use serde::Serialize;
use url::{form_urlencoded, Url};

pub const REPO_PARAM: &str = "repo";
pub const PATH_PARAM: &str = "path";
pub const FILE_PARAM: &str = "file";

const OWNED_PARAMS: [&str; 3] = [REPO_PARAM, PATH_PARAM, FILE_PARAM];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationSnapshot {
    pub repo_url: String,
    /// Empty at the repository root.
    pub path: String,
    pub file: Option<String>,
}

impl NavigationSnapshot {
    /// The `(name, value)` pairs this snapshot writes, in a stable order.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![(REPO_PARAM, self.repo_url.as_str())];
        if !self.path.is_empty() {
            params.push((PATH_PARAM, self.path.as_str()));
        }
        if let Some(file) = self.file.as_deref().filter(|file| !file.is_empty()) {
            params.push((FILE_PARAM, file));
        }
        params
    }

    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params())
            .finish()
    }

    /// Reads a snapshot back from a query string (with or without the
    /// leading '?'). Returns None when there is no `repo` parameter.
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut repo_url = None;
        let mut path = String::new();
        let mut file = None;

        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            match name.as_ref() {
                REPO_PARAM => repo_url = Some(value.into_owned()),
                PATH_PARAM => path = value.into_owned(),
                FILE_PARAM if !value.is_empty() => file = Some(value.into_owned()),
                _ => {}
            }
        }

        let repo_url = repo_url.filter(|repo| !repo.is_empty())?;
        Some(NavigationSnapshot {
            repo_url,
            path: path.trim_matches('/').to_string(),
            file,
        })
    }

    pub fn from_url(url: &Url) -> Option<Self> {
        Self::from_query(url.query().unwrap_or(""))
    }
}

/// The page URL that mirrors the navigation state.
#[derive(Debug, Clone)]
pub struct AddressBar {
    url: Url,
}

impl AddressBar {
    pub fn new(url: Url) -> Self {
        AddressBar { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn snapshot(&self) -> Option<NavigationSnapshot> {
        NavigationSnapshot::from_url(&self.url)
    }

    // Rewrites repo/path/file in place
    //
    // Query parameters we don't own are kept, in their original order.
    // Passing None removes all three (no repository open).
    pub fn replace(&mut self, snapshot: Option<&NavigationSnapshot>) {
        let foreign: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(name, _)| !OWNED_PARAMS.contains(&name.as_ref()))
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        let mut pairs: Vec<(&str, &str)> = foreign
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        if let Some(snapshot) = snapshot {
            pairs.extend(snapshot.params());
        }

        if pairs.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.query_pairs_mut().clear().extend_pairs(pairs);
        }
    }
}
