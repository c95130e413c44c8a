// src/explorer/mod.rs
// =============================================================================
// The repository navigation engine.
//
// Submodules:
// - language: filename -> language tag
// - cache: fetched file bodies, keyed by repository + path
// - listing: directory entries and their display order
// - url_sync: shareable link <-> navigation snapshot
// - state: the pure navigation state machine
// - session: runs the state machine's effects against a ContentsApi
// =============================================================================

mod cache;
mod language;
mod listing;
mod session;
mod state;
mod url_sync;

pub use language::{is_known_language, LANGUAGES};
pub use listing::{DirectoryEntry, EntryKind, Listing};
pub use session::Session;
pub use state::{LanguageChoice, NavigationState, SelectedFile};
