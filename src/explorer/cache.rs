// src/explorer/cache.rs
// =============================================================================
// Session-scoped store of file bodies that were already fetched.
//
// Keys are "{owner}/{repo}/{path}": a bare path is not unique across
// repositories. There is no eviction; the cache grows for as long as one
// repository stays open and is dropped wholesale when another is opened.
// Browsing a huge repository file by file will therefore keep every body
// in memory until the repository is closed.
// =============================================================================

use std::collections::HashMap;

use crate::github::RepoId;

#[derive(Debug, Default)]
pub struct ContentCache {
    entries: HashMap<String, String>,
}

impl ContentCache {
    fn key(id: &RepoId, path: &str) -> String {
        format!("{}/{}/{}", id.owner, id.repo, path)
    }

    pub fn get(&self, id: &RepoId, path: &str) -> Option<&str> {
        self.entries.get(&Self::key(id, path)).map(String::as_str)
    }

    /// Stores `text`, replacing whatever was cached for the same key.
    pub fn put(&mut self, id: &RepoId, path: &str, text: String) {
        self.entries.insert(Self::key(id, path), text);
    }

    pub fn clear(&mut self) {
        self.entries = HashMap::new();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
