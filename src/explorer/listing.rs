// src/explorer/listing.rs
// =============================================================================
// Directory entries and the order they are shown in.
//
// The order is part of the contract: directories first, then files (and
// other entry kinds), each group sorted by name. Names compare
// case-insensitively first so "apple" sits next to "Apple"; on a tie the
// lowercase spelling comes first ("a" before "A").
// =============================================================================

use serde::Serialize;
use std::cmp::Ordering;

use crate::error::ExplorerError;
use crate::github::ContentItem;

/// What a listing entry points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, submodules and anything else GitHub reports. Never opened.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    /// Full path from the repository root.
    pub path: String,
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Stable key within a listing: the blob sha, or the path if missing.
    pub id: String,
}

impl DirectoryEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

impl From<ContentItem> for DirectoryEntry {
    fn from(item: ContentItem) -> Self {
        let kind = match item.kind.as_str() {
            "file" => EntryKind::File,
            "dir" => EntryKind::Dir,
            _ => EntryKind::Other(item.kind),
        };
        let id = item.sha.unwrap_or_else(|| item.path.clone());

        DirectoryEntry {
            name: item.name,
            path: item.path,
            kind,
            download_url: item.download_url,
            id,
        }
    }
}

/// Directories before everything else, then by name.
pub fn compare_entries(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| compare_names(&a.name, &b.name))
}

// Lowercase sorts before uppercase in the tie-break, hence b.cmp(a)
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

pub fn sort_entries(entries: &mut [DirectoryEntry]) {
    entries.sort_by(compare_entries);
}

/// What the directory pane currently shows.
///
/// Every identity or path change moves the pane to `Loading` before the
/// new response arrives, so an old listing is never presented as current.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Listing {
    #[default]
    Idle,
    Loading {
        path: String,
    },
    Loaded {
        path: String,
        entries: Vec<DirectoryEntry>,
    },
    Failed {
        path: String,
        error: ExplorerError,
    },
}

impl Listing {
    /// Entries of a successfully loaded listing, empty otherwise.
    pub fn entries(&self) -> &[DirectoryEntry] {
        match self {
            Listing::Loaded { entries, .. } => entries,
            _ => &[],
        }
    }

    pub fn find(&self, name: &str) -> Option<&DirectoryEntry> {
        self.entries().iter().find(|entry| entry.name == name)
    }

    pub fn find_by_path(&self, path: &str) -> Option<&DirectoryEntry> {
        self.entries().iter().find(|entry| entry.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: EntryKind, name: &str) -> DirectoryEntry {
        DirectoryEntry {
            name: name.to_string(),
            path: name.to_string(),
            kind,
            download_url: None,
            id: format!("{name}-id"),
        }
    }

    #[test]
    fn test_directories_sort_first() {
        let mut entries = vec![
            entry(EntryKind::File, "b"),
            entry(EntryKind::Dir, "a"),
            entry(EntryKind::File, "a"),
        ];
        sort_entries(&mut entries);

        let order: Vec<(bool, &str)> = entries
            .iter()
            .map(|e| (e.is_dir(), e.name.as_str()))
            .collect();
        assert_eq!(order, vec![(true, "a"), (false, "a"), (false, "b")]);
    }

    #[test]
    fn test_names_compare_case_insensitively() {
        let mut entries = vec![
            entry(EntryKind::File, "zeta.rs"),
            entry(EntryKind::File, "Beta.rs"),
            entry(EntryKind::File, "alpha.rs"),
        ];
        sort_entries(&mut entries);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha.rs", "Beta.rs", "zeta.rs"]);
    }

    #[test]
    fn test_lowercase_wins_case_only_ties() {
        let mut entries = vec![
            entry(EntryKind::File, "A"),
            entry(EntryKind::File, "a"),
            entry(EntryKind::File, "B"),
            entry(EntryKind::File, "b"),
        ];
        sort_entries(&mut entries);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "A", "b", "B"]);
    }

    #[test]
    fn test_other_kinds_sort_with_files() {
        let mut entries = vec![
            entry(EntryKind::Other("submodule".to_string()), "vendor"),
            entry(EntryKind::File, "Cargo.toml"),
            entry(EntryKind::Dir, "src"),
        ];
        sort_entries(&mut entries);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["src", "Cargo.toml", "vendor"]);
    }

    #[test]
    fn test_from_content_item() {
        let item = ContentItem {
            name: "lib.rs".to_string(),
            path: "src/lib.rs".to_string(),
            kind: "file".to_string(),
            download_url: Some("https://raw.example/lib.rs".to_string()),
            sha: None,
        };
        let entry = DirectoryEntry::from(item);
        assert!(entry.is_file());
        assert_eq!(entry.id, "src/lib.rs");

        let link = DirectoryEntry::from(ContentItem {
            name: "link".to_string(),
            path: "link".to_string(),
            kind: "symlink".to_string(),
            download_url: None,
            sha: Some("abc".to_string()),
        });
        assert_eq!(link.kind, EntryKind::Other("symlink".to_string()));
        assert_eq!(link.id, "abc");
    }

    #[test]
    fn test_only_loaded_listing_has_entries() {
        let failed = Listing::Failed {
            path: String::new(),
            error: ExplorerError::NotFound("x".to_string()),
        };
        assert!(failed.entries().is_empty());

        let loaded = Listing::Loaded {
            path: String::new(),
            entries: vec![entry(EntryKind::Dir, "docs")],
        };
        assert!(loaded.find("docs").is_some());
        assert!(loaded.find("src").is_none());
    }
}
