// src/render.rs
// =============================================================================
// Terminal output.
//
// The explorer core never prints anything itself; these helpers read the
// navigation state and draw it. File bodies are handed over as a
// (text, language tag, code theme) triple and printed as plain text under a
// header; colouring is left to whatever the terminal user pipes them into.
// =============================================================================

use crate::explorer::{DirectoryEntry, EntryKind, Listing, NavigationState, SelectedFile};
use crate::github::RepoId;

// Formats the breadcrumb with the index `up <n>` expects for each segment
//
// Example:
//   octo/demo [-1] / src [0] / app [1]
pub fn format_breadcrumb(repo: &RepoId, stack: &[String]) -> String {
    let mut crumb = format!("{} [-1]", repo);
    for (index, segment) in stack.iter().enumerate() {
        crumb.push_str(&format!(" / {} [{}]", segment, index));
    }
    crumb
}

pub fn print_location(state: &NavigationState) {
    if let Some(repo) = state.repo() {
        let busy = if state.loading() { " ⏳" } else { "" };
        println!("📂 {}{}", format_breadcrumb(repo, state.path_stack()), busy);
    }
}

pub fn print_listing(state: &NavigationState) {
    match state.listing() {
        Listing::Idle => println!("(no directory loaded)"),
        Listing::Loading { path } => println!("Loading /{}...", path),
        Listing::Loaded { entries, .. } if entries.is_empty() => println!("(empty directory)"),
        Listing::Loaded { entries, .. } => print_entries(entries),
        Listing::Failed { path, error } => {
            println!("❌ Could not list /{}: {}", path, error);
            if error.is_retryable() {
                println!("   (type `retry` to try again)");
            }
        }
    }
}

pub fn print_entries(entries: &[DirectoryEntry]) {
    for entry in entries {
        println!("  {} {}", entry_marker(&entry.kind), entry.name);
    }
}

fn entry_marker(kind: &EntryKind) -> &'static str {
    match kind {
        EntryKind::Dir => "📁",
        EntryKind::File => "📄",
        EntryKind::Other(_) => "🔗",
    }
}

/// Prints a file body under a header naming its language and code theme.
pub fn print_file(file: &SelectedFile, language: &str, code_theme: &str) {
    println!("{}", file_header(&file.path, language, code_theme));
    println!("{}", file.content);
    if !file.content.ends_with('\n') {
        println!();
    }
}

pub fn file_header(path: &str, language: &str, code_theme: &str) -> String {
    format!("── {} ── [{} · {}]", path, language, code_theme)
}

pub fn print_error(state: &NavigationState) {
    if let Some(error) = state.error() {
        eprintln!("⚠️  {}", error);
    }
}
