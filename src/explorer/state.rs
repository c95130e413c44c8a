// src/explorer/state.rs
// =============================================================================
// The navigation state machine.
//
// NavigationState owns everything the explorer knows about the open
// repository: identity, path stack (breadcrumb), directory listing,
// selected file, language choice and the content cache.
//
// No I/O happens here. Every operation mutates the state and returns the
// side effects it wants performed, as a list of Effect values:
//
//   open_repository ──> [Cancel*, FetchListing, WriteUrl]
//   enter_directory ──> [CancelListing?, FetchListing, WriteUrl]
//   open_file       ──> [WriteUrl]                 (cache hit)
//                   ──> [CancelFile?, FetchFile]   (cache miss)
//
// The Session (session.rs) runs those effects and feeds results back
// through complete_listing / complete_file.
//
// Race-free commits: every request gets a fresh Ticket. Only the latest
// ticket of each slot (listing, file) may commit; anything older is a
// superseded request and its result is dropped.
// =============================================================================

use tracing::{debug, trace, warn};

use super::cache::ContentCache;
use super::language::detect_language;
use super::listing::{sort_entries, DirectoryEntry, Listing};
use super::url_sync::NavigationSnapshot;
use crate::error::{ExplorerError, ExplorerResult};
use crate::github::{parse_repo_url_or_err, FileSource, RepoId};

/// Identifies one issued request. Increases monotonically per state.
pub type Ticket = u64;

/// A side effect requested by a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the listing of `path` and report back with `ticket`.
    FetchListing {
        ticket: Ticket,
        id: RepoId,
        path: String,
    },
    /// Abort the listing request issued with `ticket`.
    CancelListing { ticket: Ticket },
    /// Fetch the body of the file at `path`.
    FetchFile {
        ticket: Ticket,
        id: RepoId,
        path: String,
        source: FileSource,
    },
    /// Abort the file request issued with `ticket`.
    CancelFile { ticket: Ticket },
    /// Rewrite the shareable URL; None removes the explorer parameters.
    WriteUrl(Option<NavigationSnapshot>),
}

/// Which language the selected file is shown in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LanguageChoice {
    /// Re-detected from the file name every time the file changes.
    #[default]
    Auto,
    /// Chosen by the user; survives file changes until reset to Auto.
    Pinned(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FileRequest {
    ticket: Ticket,
    path: String,
}

#[derive(Debug, Default)]
pub struct NavigationState {
    repo: Option<RepoId>,
    path_stack: Vec<String>,
    listing: Listing,
    selected: Option<SelectedFile>,
    language: LanguageChoice,
    /// File to open as soon as it shows up in a listing (from a shared link).
    pending_selection: Option<String>,
    cache: ContentCache,
    error: Option<String>,
    last_ticket: Ticket,
    listing_request: Option<Ticket>,
    file_request: Option<FileRequest>,
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn repo(&self) -> Option<&RepoId> {
        self.repo.as_ref()
    }

    pub fn path_stack(&self) -> &[String] {
        &self.path_stack
    }

    /// The path stack joined with '/'. Empty at the repository root.
    pub fn current_path(&self) -> String {
        self.path_stack.join("/")
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn language(&self) -> &LanguageChoice {
        &self.language
    }

    /// The language to render the selected file with, if one is selected.
    pub fn effective_language(&self) -> Option<&str> {
        let file = self.selected.as_ref()?;
        Some(match &self.language {
            LanguageChoice::Pinned(tag) => tag.as_str(),
            LanguageChoice::Auto => detect_language(&file.path),
        })
    }

    pub fn pending_selection(&self) -> Option<&str> {
        self.pending_selection.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[cfg(test)]
    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// True while any request is outstanding. Presentation only.
    pub fn loading(&self) -> bool {
        self.listing_request.is_some() || self.file_request.is_some()
    }

    /// The shareable projection of the current state.
    pub fn snapshot(&self) -> Option<NavigationSnapshot> {
        let repo = self.repo.as_ref()?;
        let file = self
            .pending_selection
            .clone()
            .or_else(|| self.selected.as_ref().map(|file| file.path.clone()));

        Some(NavigationSnapshot {
            repo_url: repo.canonical_url(),
            path: self.current_path(),
            file,
        })
    }

    // -------------------------------------------------------------------------
    // Repository lifecycle
    // -------------------------------------------------------------------------

    /// Opens `id` at `initial_path`, dropping everything tied to the
    /// previous repository, cache included.
    pub fn open_repository(&mut self, id: RepoId, initial_path: &str) -> Vec<Effect> {
        let mut effects = self.reset_repository(Some(id), initial_path);
        effects.extend(self.request_listing());
        effects.push(self.write_url());
        effects
    }

    /// Restores the state from a shared link.
    ///
    /// The listing is refetched; `file` becomes the pending selection and is
    /// opened once it appears in the listing.
    ///
    /// An unusable `repo_url` closes whatever was open and records the error.
    /// Requests that were in flight lose their tickets, so their results are
    /// dropped; the caller aborts them.
    pub fn restore(&mut self, snapshot: &NavigationSnapshot) -> ExplorerResult<Vec<Effect>> {
        let location = match parse_repo_url_or_err(&snapshot.repo_url) {
            Ok(location) => location,
            Err(error) => {
                self.reset_repository(None, "");
                self.error = Some(error.to_string());
                return Err(error);
            }
        };

        let path = if snapshot.path.is_empty() {
            location.path
        } else {
            snapshot.path.clone()
        };

        let mut effects = self.reset_repository(Some(location.id), &path);
        self.pending_selection = snapshot.file.clone().filter(|file| !file.is_empty());
        effects.extend(self.request_listing());
        effects.push(self.write_url());
        Ok(effects)
    }

    /// "New repository": forget everything and clear the shareable URL.
    pub fn close_repository(&mut self) -> Vec<Effect> {
        let mut effects = self.reset_repository(None, "");
        effects.push(Effect::WriteUrl(None));
        effects
    }

    fn reset_repository(&mut self, id: Option<RepoId>, path: &str) -> Vec<Effect> {
        let effects = self.cancel_requests();

        if let Some(id) = &id {
            debug!(repo = %id, path = %path, "opening repository");
        }

        self.repo = id;
        self.path_stack = split_path(path);
        self.listing = Listing::Idle;
        self.selected = None;
        self.pending_selection = None;
        if !self.cache.is_empty() {
            debug!(files = self.cache.len(), "dropping cached files");
            self.cache.clear();
        }
        self.error = None;
        effects
    }

    fn cancel_requests(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(ticket) = self.listing_request.take() {
            effects.push(Effect::CancelListing { ticket });
        }
        if let Some(request) = self.file_request.take() {
            effects.push(Effect::CancelFile {
                ticket: request.ticket,
            });
        }
        effects
    }

    // -------------------------------------------------------------------------
    // Directory navigation
    // -------------------------------------------------------------------------

    /// (Re)loads the listing for the current path.
    pub fn load_directory(&mut self) -> Vec<Effect> {
        self.request_listing()
    }

    /// Retries after a failure by reloading the current location.
    pub fn retry(&mut self) -> Vec<Effect> {
        self.error = None;
        self.load_directory()
    }

    /// Descends into the child directory `name`.
    pub fn enter_directory(&mut self, name: &str) -> Vec<Effect> {
        let name = name.trim_matches('/');
        if self.repo.is_none() || name.is_empty() {
            return Vec::new();
        }

        self.path_stack.extend(split_path(name));
        self.navigated()
    }

    /// Jumps to the breadcrumb at `index`; -1 (or any negative) is the root.
    pub fn go_to_ancestor(&mut self, index: isize) -> Vec<Effect> {
        if self.repo.is_none() {
            return Vec::new();
        }

        match usize::try_from(index) {
            Ok(index) => self.path_stack.truncate(index + 1),
            Err(_) => self.path_stack.clear(),
        }
        self.navigated()
    }

    /// Replaces the whole path stack, e.g. `cd src/app`.
    pub fn go_to_path(&mut self, path: &str) -> Vec<Effect> {
        if self.repo.is_none() {
            return Vec::new();
        }

        self.path_stack = split_path(path);
        self.navigated()
    }

    fn navigated(&mut self) -> Vec<Effect> {
        let mut effects = self.request_listing();
        effects.push(self.write_url());
        effects
    }

    fn request_listing(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(ticket) = self.listing_request.take() {
            effects.push(Effect::CancelListing { ticket });
        }

        let Some(id) = self.repo.clone() else {
            return effects;
        };

        let ticket = self.issue_ticket();
        let path = self.current_path();
        self.listing_request = Some(ticket);
        self.listing = Listing::Loading { path: path.clone() };
        self.error = None;

        effects.push(Effect::FetchListing { ticket, id, path });
        effects
    }

    /// Commits a listing response. Responses for superseded tickets are
    /// dropped without touching the state.
    pub fn complete_listing(
        &mut self,
        ticket: Ticket,
        result: ExplorerResult<Vec<DirectoryEntry>>,
    ) -> Vec<Effect> {
        if self.listing_request != Some(ticket) {
            trace!(ticket, "discarding stale listing response");
            return Vec::new();
        }
        self.listing_request = None;

        let path = self.current_path();
        match result {
            Ok(mut entries) => {
                sort_entries(&mut entries);
                debug!(path = %path, count = entries.len(), "listing loaded");
                self.listing = Listing::Loaded { path, entries };
            }
            Err(ExplorerError::Cancelled) => {
                self.listing = Listing::Idle;
                return Vec::new();
            }
            Err(error) => {
                warn!(path = %path, %error, "listing failed");
                self.error = Some(error.to_string());
                self.listing = Listing::Failed { path, error };
            }
        }

        self.restore_pending_selection()
    }

    // Opens the file named by a shared link once it is listed
    //
    // Runs after every listing commit. Does nothing if the file is already
    // selected or a request for it is in flight, so reloads never reopen it.
    fn restore_pending_selection(&mut self) -> Vec<Effect> {
        let Some(pending) = self.pending_selection.clone() else {
            return Vec::new();
        };

        if self.selected.as_ref().is_some_and(|file| file.path == pending) {
            self.pending_selection = None;
            return Vec::new();
        }
        if self
            .file_request
            .as_ref()
            .is_some_and(|request| request.path == pending)
        {
            return Vec::new();
        }

        let entry = self
            .listing
            .find_by_path(&pending)
            .filter(|entry| entry.is_file())
            .cloned();
        match entry {
            Some(entry) => {
                debug!(path = %entry.path, "reopening file from link");
                self.open_file(&entry)
            }
            None => Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Files
    // -------------------------------------------------------------------------

    /// Opens a file entry. Directories and other kinds are ignored.
    ///
    /// Cached bodies are selected immediately; otherwise a fetch is issued,
    /// preferring the entry's download URL over the contents API.
    pub fn open_file(&mut self, entry: &DirectoryEntry) -> Vec<Effect> {
        if !entry.is_file() {
            return Vec::new();
        }
        let Some(id) = self.repo.clone() else {
            return Vec::new();
        };

        if self.pending_selection.as_deref() != Some(entry.path.as_str()) {
            self.pending_selection = None;
        }

        let mut effects = Vec::new();
        if let Some(request) = self.file_request.take() {
            effects.push(Effect::CancelFile {
                ticket: request.ticket,
            });
        }

        if let Some(content) = self.cache.get(&id, &entry.path) {
            debug!(path = %entry.path, "cache hit");
            self.selected = Some(SelectedFile {
                path: entry.path.clone(),
                content: content.to_string(),
            });
            if self.pending_selection.as_deref() == Some(entry.path.as_str()) {
                self.pending_selection = None;
            }
            effects.push(self.write_url());
            return effects;
        }

        let ticket = self.issue_ticket();
        let source = match &entry.download_url {
            Some(url) => FileSource::Download(url.clone()),
            None => FileSource::ContentsApi,
        };
        self.file_request = Some(FileRequest {
            ticket,
            path: entry.path.clone(),
        });
        self.error = None;

        effects.push(Effect::FetchFile {
            ticket,
            id,
            path: entry.path.clone(),
            source,
        });
        effects
    }

    /// Commits a file response. On failure the previous selection stays.
    pub fn complete_file(
        &mut self,
        ticket: Ticket,
        result: ExplorerResult<String>,
    ) -> Vec<Effect> {
        let request = match self.file_request.take() {
            Some(request) if request.ticket == ticket => request,
            other => {
                self.file_request = other;
                trace!(ticket, "discarding stale file response");
                return Vec::new();
            }
        };

        // A link's file is attempted once, success or not.
        if self.pending_selection.as_deref() == Some(request.path.as_str()) {
            self.pending_selection = None;
        }

        match result {
            Ok(content) => {
                if let Some(id) = &self.repo {
                    self.cache.put(id, &request.path, content.clone());
                }
                debug!(
                    path = %request.path,
                    bytes = content.len(),
                    cached = self.cache.len(),
                    "file loaded"
                );
                self.selected = Some(SelectedFile {
                    path: request.path,
                    content,
                });
                vec![self.write_url()]
            }
            Err(ExplorerError::Cancelled) => Vec::new(),
            Err(error) => {
                warn!(path = %request.path, %error, "file fetch failed");
                self.error = Some(error.to_string());
                vec![self.write_url()]
            }
        }
    }

    /// Pins a language or goes back to auto-detection.
    pub fn set_language(&mut self, choice: LanguageChoice) {
        self.language = choice;
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn issue_ticket(&mut self) -> Ticket {
        self.last_ticket += 1;
        self.last_ticket
    }

    fn write_url(&self) -> Effect {
        Effect::WriteUrl(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::listing::EntryKind;

    fn repo() -> RepoId {
        RepoId::new("octo", "demo")
    }

    fn file(path: &str) -> DirectoryEntry {
        DirectoryEntry {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            kind: EntryKind::File,
            download_url: Some(format!("https://raw.example/{path}")),
            id: format!("sha-{path}"),
        }
    }

    fn dir(path: &str) -> DirectoryEntry {
        DirectoryEntry {
            kind: EntryKind::Dir,
            download_url: None,
            ..file(path)
        }
    }

    fn listing_ticket(effects: &[Effect]) -> Ticket {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::FetchListing { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .expect("no FetchListing effect")
    }

    fn file_ticket(effects: &[Effect]) -> Option<Ticket> {
        effects.iter().find_map(|effect| match effect {
            Effect::FetchFile { ticket, .. } => Some(*ticket),
            _ => None,
        })
    }

    fn open_and_load(state: &mut NavigationState, entries: Vec<DirectoryEntry>) {
        let effects = state.open_repository(repo(), "");
        state.complete_listing(listing_ticket(&effects), Ok(entries));
    }

    fn select(state: &mut NavigationState, path: &str, content: &str) {
        let effects = state.open_file(&file(path));
        let ticket = file_ticket(&effects).expect("expected a fetch");
        state.complete_file(ticket, Ok(content.to_string()));
    }

    #[test]
    fn test_open_repository_requests_root_listing() {
        let mut state = NavigationState::new();
        let effects = state.open_repository(repo(), "");

        assert!(matches!(
            &effects[0],
            Effect::FetchListing { id, path, .. } if *id == repo() && path.is_empty()
        ));
        assert_eq!(state.listing(), &Listing::Loading { path: String::new() });
        assert!(state.loading());
        assert!(matches!(effects.last(), Some(Effect::WriteUrl(Some(_)))));
    }

    #[test]
    fn test_listing_is_sorted_on_commit() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![file("b"), dir("a"), file("a")]);

        let names: Vec<(bool, &str)> = state
            .listing()
            .entries()
            .iter()
            .map(|e| (e.is_dir(), e.name.as_str()))
            .collect();
        assert_eq!(names, vec![(true, "a"), (false, "a"), (false, "b")]);
        assert!(!state.loading());
    }

    #[test]
    fn test_enter_and_go_to_ancestor() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![dir("src")]);

        state.enter_directory("src");
        state.enter_directory("app");
        assert_eq!(state.current_path(), "src/app");

        let effects = state.go_to_ancestor(0);
        assert_eq!(state.current_path(), "src");
        assert!(matches!(
            &effects[..],
            [Effect::CancelListing { .. }, Effect::FetchListing { path, .. }, Effect::WriteUrl(_)]
                if path == "src"
        ));

        state.go_to_ancestor(-1);
        assert!(state.path_stack().is_empty());
        assert_eq!(state.current_path(), "");
    }

    #[test]
    fn test_latest_listing_wins_regardless_of_arrival_order() {
        for y_first in [true, false] {
            let mut state = NavigationState::new();
            open_and_load(&mut state, vec![]);

            let x = listing_ticket(&state.go_to_path("x"));
            let y_effects = state.go_to_path("y");
            assert!(y_effects.contains(&Effect::CancelListing { ticket: x }));
            let y = listing_ticket(&y_effects);

            if y_first {
                state.complete_listing(y, Ok(vec![file("y/from-y")]));
                state.complete_listing(x, Ok(vec![file("x/from-x")]));
            } else {
                state.complete_listing(x, Ok(vec![file("x/from-x")]));
                state.complete_listing(y, Ok(vec![file("y/from-y")]));
            }

            match state.listing() {
                Listing::Loaded { path, entries } => {
                    assert_eq!(path, "y");
                    assert_eq!(entries.len(), 1);
                    assert_eq!(entries[0].name, "from-y");
                }
                other => panic!("unexpected listing {other:?}"),
            }
        }
    }

    #[test]
    fn test_failed_listing_is_marked_failed() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![dir("docs")]);

        let ticket = listing_ticket(&state.enter_directory("docs"));
        state.complete_listing(
            ticket,
            Err(ExplorerError::NetworkFailure {
                code: Some(500),
                message: "Internal Server Error".to_string(),
            }),
        );

        assert!(matches!(state.listing(), Listing::Failed { path, .. } if path == "docs"));
        assert!(state.listing().entries().is_empty());
        assert!(state.error().unwrap().contains("500"));

        // Retrying clears the message and reloads the same place.
        let effects = state.retry();
        assert!(state.error().is_none());
        assert!(matches!(&effects[0], Effect::FetchListing { path, .. } if path == "docs"));
    }

    #[test]
    fn test_open_file_prefers_download_url() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![file("README.md")]);

        let effects = state.open_file(&file("README.md"));
        assert!(matches!(
            &effects[..],
            [Effect::FetchFile { source: FileSource::Download(url), .. }]
                if url == "https://raw.example/README.md"
        ));

        let mut no_url = file("LICENSE");
        no_url.download_url = None;
        let effects = state.open_file(&no_url);
        assert!(matches!(
            effects.last(),
            Some(Effect::FetchFile { source: FileSource::ContentsApi, .. })
        ));
    }

    #[test]
    fn test_open_file_ignores_directories() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![dir("src")]);
        assert!(state.open_file(&dir("src")).is_empty());
        assert!(state.selected().is_none());
    }

    #[test]
    fn test_second_open_hits_cache() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![file("a.rs"), file("b.rs")]);

        select(&mut state, "a.rs", "fn a() {}");
        select(&mut state, "b.rs", "fn b() {}");

        let effects = state.open_file(&file("a.rs"));
        assert_eq!(file_ticket(&effects), None);
        assert_eq!(state.selected().unwrap().content, "fn a() {}");
    }

    #[test]
    fn test_repository_change_clears_cache() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![file("a.rs")]);
        select(&mut state, "a.rs", "fn a() {}");
        assert_eq!(state.cache().len(), 1);

        open_and_load(&mut state, vec![file("a.rs")]);
        assert!(state.cache().is_empty());
        assert!(state.selected().is_none());
        assert!(file_ticket(&state.open_file(&file("a.rs"))).is_some());
    }

    #[test]
    fn test_file_failure_keeps_previous_selection() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![file("a.rs"), file("b.rs")]);
        select(&mut state, "a.rs", "fn a() {}");

        let ticket = file_ticket(&state.open_file(&file("b.rs"))).unwrap();
        state.complete_file(ticket, Err(ExplorerError::NotFound("b.rs".to_string())));

        assert_eq!(state.selected().unwrap().path, "a.rs");
        assert!(state.error().is_some());
        assert!(state.cache().get(&repo(), "b.rs").is_none());
    }

    #[test]
    fn test_superseded_file_response_is_dropped() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![file("a.rs"), file("b.rs")]);

        let first = file_ticket(&state.open_file(&file("a.rs"))).unwrap();
        let second_effects = state.open_file(&file("b.rs"));
        assert!(second_effects.contains(&Effect::CancelFile { ticket: first }));
        let second = file_ticket(&second_effects).unwrap();

        assert!(state.complete_file(first, Ok("late".to_string())).is_empty());
        assert!(state.selected().is_none());

        state.complete_file(second, Ok("fn b() {}".to_string()));
        assert_eq!(state.selected().unwrap().path, "b.rs");
        assert!(state.cache().get(&repo(), "a.rs").is_none());
    }

    #[test]
    fn test_cancelled_file_is_silent() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![file("a.rs")]);
        let ticket = file_ticket(&state.open_file(&file("a.rs"))).unwrap();
        assert!(state.complete_file(ticket, Err(ExplorerError::Cancelled)).is_empty());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_auto_language_tracks_file() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![file("a.py"), file("b.rs"), file("c.go")]);

        select(&mut state, "a.py", "print()");
        assert_eq!(state.effective_language(), Some("python"));

        select(&mut state, "b.rs", "fn main() {}");
        assert_eq!(state.effective_language(), Some("rust"));

        state.set_language(LanguageChoice::Pinned("markdown".to_string()));
        select(&mut state, "c.go", "package main");
        assert_eq!(state.effective_language(), Some("markdown"));

        state.set_language(LanguageChoice::Auto);
        assert_eq!(state.effective_language(), Some("go"));
    }

    #[test]
    fn test_snapshot_reflects_path_and_file() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![]);
        let ticket = listing_ticket(&state.go_to_path("src/app"));
        state.complete_listing(ticket, Ok(vec![file("src/app/main.go")]));
        select(&mut state, "src/app/main.go", "package main");

        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.repo_url, "https://github.com/octo/demo");
        assert_eq!(snapshot.path, "src/app");
        assert_eq!(snapshot.file.as_deref(), Some("src/app/main.go"));
    }

    #[test]
    fn test_restore_reopens_pending_file_once() {
        let snapshot = NavigationSnapshot {
            repo_url: "https://github.com/octo/demo".to_string(),
            path: "src/app".to_string(),
            file: Some("src/app/main.go".to_string()),
        };

        let mut state = NavigationState::new();
        let effects = state.restore(&snapshot).unwrap();
        assert_eq!(state.repo(), Some(&repo()));
        assert_eq!(state.path_stack(), ["src", "app"]);
        assert_eq!(state.pending_selection(), Some("src/app/main.go"));
        assert_eq!(effects.last(), Some(&Effect::WriteUrl(Some(snapshot.clone()))));

        let listing = vec![file("src/app/main.go"), file("src/app/util.go")];
        let opened = state.complete_listing(listing_ticket(&effects), Ok(listing.clone()));
        let ticket = file_ticket(&opened).expect("pending file should be fetched");

        // A reload while the fetch is in flight must not issue a second one.
        let reload = listing_ticket(&state.load_directory());
        assert!(file_ticket(&state.complete_listing(reload, Ok(listing.clone()))).is_none());

        state.complete_file(ticket, Ok("package main".to_string()));
        assert_eq!(state.selected().unwrap().path, "src/app/main.go");
        assert_eq!(state.pending_selection(), None);

        // And once selected, further reloads leave it alone.
        let reload = listing_ticket(&state.load_directory());
        assert!(state.complete_listing(reload, Ok(listing)).is_empty());
        assert_eq!(state.snapshot(), Some(snapshot));
    }

    #[test]
    fn test_restore_falls_back_to_url_sub_path() {
        let snapshot = NavigationSnapshot {
            repo_url: "https://github.com/octo/demo/docs".to_string(),
            path: String::new(),
            file: None,
        };
        let mut state = NavigationState::new();
        state.restore(&snapshot).unwrap();
        assert_eq!(state.current_path(), "docs");
    }

    #[test]
    fn test_restore_rejects_foreign_host() {
        let snapshot = NavigationSnapshot {
            repo_url: "https://gitlab.com/octo/demo".to_string(),
            path: String::new(),
            file: None,
        };
        let mut state = NavigationState::new();
        assert!(matches!(
            state.restore(&snapshot),
            Err(ExplorerError::InvalidUrl(_))
        ));
        assert!(state.repo().is_none());
        assert!(state.error().is_some());
    }

    #[test]
    fn test_bad_link_closes_open_repository() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![file("a.rs")]);
        select(&mut state, "a.rs", "fn a() {}");
        let in_flight = listing_ticket(&state.enter_directory("src"));

        let snapshot = NavigationSnapshot {
            repo_url: "not a url".to_string(),
            path: "src".to_string(),
            file: None,
        };
        assert!(matches!(
            state.restore(&snapshot),
            Err(ExplorerError::InvalidUrl(_))
        ));
        assert!(state.repo().is_none());
        assert!(state.path_stack().is_empty());
        assert!(state.selected().is_none());
        assert!(state.cache().is_empty());
        assert_eq!(state.listing(), &Listing::Idle);
        assert!(state.error().unwrap().contains("not a url"));
        assert!(!state.loading());

        // The old listing request no longer commits.
        assert!(state.complete_listing(in_flight, Ok(vec![file("src/b.rs")])).is_empty());
        assert_eq!(state.listing(), &Listing::Idle);
    }

    #[test]
    fn test_close_repository_clears_everything() {
        let mut state = NavigationState::new();
        open_and_load(&mut state, vec![file("a.rs")]);
        select(&mut state, "a.rs", "fn a() {}");
        state.enter_directory("src");

        let effects = state.close_repository();
        assert!(matches!(effects.first(), Some(Effect::CancelListing { .. })));
        assert_eq!(effects.last(), Some(&Effect::WriteUrl(None)));
        assert!(state.repo().is_none());
        assert!(state.path_stack().is_empty());
        assert!(state.selected().is_none());
        assert!(state.cache().is_empty());
        assert_eq!(state.listing(), &Listing::Idle);
        assert_eq!(state.snapshot(), None);
    }

    #[test]
    fn test_navigation_without_repository_is_a_no_op() {
        let mut state = NavigationState::new();
        assert!(state.enter_directory("src").is_empty());
        assert!(state.go_to_ancestor(-1).is_empty());
        assert!(state.load_directory().is_empty());
        assert!(state.open_file(&file("a.rs")).is_empty());
    }
}
