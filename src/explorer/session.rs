// src/explorer/session.rs
// =============================================================================
// The runtime around NavigationState.
//
// A Session owns:
//   - the NavigationState (and through it the content cache)
//   - the ContentsApi used for network requests
//   - the AddressBar mirroring the state as a shareable URL
//   - the set of requests currently in flight
//
// Every user action goes: Session method -> NavigationState transition ->
// list of Effects -> dispatch(). Fetch effects become futures pushed into a
// FuturesUnordered; settle() drives them to completion and commits each
// result back into the state, which may in turn ask for more work (for
// example reopening the file named in a shared link).
//
// Cancellation: each fetch is wrapped in futures::future::Abortable. A
// Cancel effect aborts it, so it resolves as ExplorerError::Cancelled and
// the state drops it. Every fetch is also bounded by a timeout.
//
// One session = one logical thread of control. Nothing here is shared
// across tasks, so the cache needs no locking.
// =============================================================================

use futures::future::{AbortHandle, Abortable, BoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::listing::DirectoryEntry;
use super::state::{Effect, LanguageChoice, NavigationState, Ticket};
use super::url_sync::{AddressBar, NavigationSnapshot};
use crate::error::{ExplorerError, ExplorerResult};
use crate::github::{fetch_file_text, parse_repo_url_or_err, ContentsApi, FileSource, RepoId};

/// A finished request, tagged with the ticket it was issued under.
enum Completion {
    Listing {
        ticket: Ticket,
        result: ExplorerResult<Vec<DirectoryEntry>>,
    },
    File {
        ticket: Ticket,
        result: ExplorerResult<String>,
    },
}

pub struct Session {
    state: NavigationState,
    api: Arc<dyn ContentsApi>,
    address_bar: AddressBar,
    timeout: Duration,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
    listing_abort: Option<(Ticket, AbortHandle)>,
    file_abort: Option<(Ticket, AbortHandle)>,
}

impl Session {
    pub fn new(api: Arc<dyn ContentsApi>, page_url: Url, timeout: Duration) -> Self {
        Session {
            state: NavigationState::new(),
            api,
            address_bar: AddressBar::new(page_url),
            timeout,
            in_flight: FuturesUnordered::new(),
            listing_abort: None,
            file_abort: None,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// The current shareable link.
    pub fn share_link(&self) -> &Url {
        self.address_bar.url()
    }

    // -------------------------------------------------------------------------
    // User actions. Each one only issues work; call settle() to run it.
    // -------------------------------------------------------------------------

    /// Opens a repository from user input such as "https://github.com/o/r".
    pub fn open_url(&mut self, input: &str) -> ExplorerResult<()> {
        let location = parse_repo_url_or_err(input)?;
        let effects = self.state.open_repository(location.id, &location.path);
        self.dispatch(effects);
        Ok(())
    }

    /// Restores from the address bar's query parameters, if any.
    ///
    /// Returns false when the page URL carries no repository.
    pub fn restore_from_address_bar(&mut self) -> ExplorerResult<bool> {
        match self.address_bar.snapshot() {
            Some(snapshot) => self.restore(&snapshot).map(|_| true),
            None => Ok(false),
        }
    }

    /// On an invalid link the state is closed and any request still in
    /// flight is aborted.
    pub fn restore(&mut self, snapshot: &NavigationSnapshot) -> ExplorerResult<()> {
        match self.state.restore(snapshot) {
            Ok(effects) => {
                self.dispatch(effects);
                Ok(())
            }
            Err(error) => {
                self.abort_all();
                Err(error)
            }
        }
    }

    pub fn close_repository(&mut self) {
        let effects = self.state.close_repository();
        self.dispatch(effects);
    }

    pub fn enter_directory(&mut self, name: &str) {
        let effects = self.state.enter_directory(name);
        self.dispatch(effects);
    }

    pub fn go_to_ancestor(&mut self, index: isize) {
        let effects = self.state.go_to_ancestor(index);
        self.dispatch(effects);
    }

    pub fn go_to_path(&mut self, path: &str) {
        let effects = self.state.go_to_path(path);
        self.dispatch(effects);
    }

    pub fn retry(&mut self) {
        let effects = self.state.retry();
        self.dispatch(effects);
    }

    pub fn open_entry(&mut self, entry: &DirectoryEntry) {
        let effects = self.state.open_file(entry);
        self.dispatch(effects);
    }

    /// Opens the file called `name` in the current listing.
    pub fn open_file_named(&mut self, name: &str) -> ExplorerResult<()> {
        let entry = self
            .state
            .listing()
            .find(name)
            .filter(|entry| entry.is_file())
            .cloned()
            .ok_or_else(|| ExplorerError::NotFound(name.to_string()))?;
        self.open_entry(&entry);
        Ok(())
    }

    pub fn set_language(&mut self, choice: LanguageChoice) {
        self.state.set_language(choice);
    }

    // -------------------------------------------------------------------------
    // Effect execution
    // -------------------------------------------------------------------------

    /// Runs every in-flight request to completion, committing results (and
    /// any follow-up requests they trigger) as they arrive.
    pub async fn settle(&mut self) {
        while let Some(completion) = self.in_flight.next().await {
            let effects = match completion {
                Completion::Listing { ticket, result } => {
                    self.clear_abort_handle(ticket, true);
                    self.state.complete_listing(ticket, result)
                }
                Completion::File { ticket, result } => {
                    self.clear_abort_handle(ticket, false);
                    self.state.complete_file(ticket, result)
                }
            };
            self.dispatch(effects);
        }
    }

    fn dispatch(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchListing { ticket, id, path } => {
                    debug!(ticket, repo = %id, path = %path, "fetching listing");
                    let request = load_listing(Arc::clone(&self.api), id, path);
                    let handle = self.spawn(request, move |result| Completion::Listing {
                        ticket,
                        result,
                    });
                    self.listing_abort = Some((ticket, handle));
                }
                Effect::FetchFile {
                    ticket,
                    id,
                    path,
                    source,
                } => {
                    debug!(ticket, repo = %id, path = %path, "fetching file");
                    let request = load_file(Arc::clone(&self.api), id, path, source);
                    let handle = self.spawn(request, move |result| Completion::File {
                        ticket,
                        result,
                    });
                    self.file_abort = Some((ticket, handle));
                }
                Effect::CancelListing { ticket } => {
                    if let Some(handle) = take_handle(&mut self.listing_abort, ticket) {
                        debug!(ticket, "cancelling listing request");
                        handle.abort();
                    }
                }
                Effect::CancelFile { ticket } => {
                    if let Some(handle) = take_handle(&mut self.file_abort, ticket) {
                        debug!(ticket, "cancelling file request");
                        handle.abort();
                    }
                }
                Effect::WriteUrl(snapshot) => {
                    self.address_bar.replace(snapshot.as_ref());
                }
            }
        }
    }

    // Queues a request with a timeout and an abort handle
    //
    // Aborted requests resolve to Cancelled; expired ones to a network
    // failure, same as a transport timeout.
    fn spawn<T, F, C>(&mut self, request: F, complete: C) -> AbortHandle
    where
        T: Send + 'static,
        F: Future<Output = ExplorerResult<T>> + Send + 'static,
        C: FnOnce(ExplorerResult<T>) -> Completion + Send + 'static,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let timeout = self.timeout;
        let bounded = async move {
            tokio::time::timeout(timeout, request)
                .await
                .unwrap_or_else(|_| Err(ExplorerError::transport("request timed out")))
        };

        let future = Abortable::new(bounded, registration)
            .map(move |outcome| complete(outcome.unwrap_or(Err(ExplorerError::Cancelled))))
            .boxed();
        self.in_flight.push(future);
        handle
    }

    fn abort_all(&mut self) {
        for (ticket, handle) in [self.listing_abort.take(), self.file_abort.take()]
            .into_iter()
            .flatten()
        {
            debug!(ticket, "aborting request");
            handle.abort();
        }
    }

    fn clear_abort_handle(&mut self, ticket: Ticket, listing: bool) {
        let slot = if listing {
            &mut self.listing_abort
        } else {
            &mut self.file_abort
        };
        take_handle(slot, ticket);
    }
}

/// Empties `slot` if it holds the handle for `ticket`.
fn take_handle(slot: &mut Option<(Ticket, AbortHandle)>, ticket: Ticket) -> Option<AbortHandle> {
    match slot.take() {
        Some((current, handle)) if current == ticket => Some(handle),
        other => {
            *slot = other;
            None
        }
    }
}

async fn load_listing(
    api: Arc<dyn ContentsApi>,
    id: RepoId,
    path: String,
) -> ExplorerResult<Vec<DirectoryEntry>> {
    let items = api.list_directory(&id, &path).await?;
    Ok(items.into_iter().map(DirectoryEntry::from).collect())
}

async fn load_file(
    api: Arc<dyn ContentsApi>,
    id: RepoId,
    path: String,
    source: FileSource,
) -> ExplorerResult<String> {
    fetch_file_text(api.as_ref(), &id, &path, &source).await
}
