// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, to stderr)
// 3. Build a Session around the GitHub client
// 4. Dispatch to the appropriate subcommand handler
// 5. Exit with proper code (0 = success, 1 = fetch failed, 2 = error)
// =============================================================================

mod browse;
mod cli;
mod error;
mod explorer;
mod github;
mod preferences;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

use cli::{Cli, Commands, GlobalOpts, ThemeAction};
use explorer::{LanguageChoice, Listing, Session, LANGUAGES};
use github::GithubClient;
use preferences::{Preferences, Theme};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so they never mix with listings and file bodies.
// RUST_LOG wins over -v when set.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "repo_explorer=debug",
        _ => "repo_explorer=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Returns:
//   Ok(0) = everything was fetched
//   Ok(1) = a listing or file could not be fetched
//   Err   = bad input or unexpected error
async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Browse { repo_url } => {
            let mut session = new_session(&cli.global)?;
            session.open_url(&repo_url)?;
            browse::run(&mut session, &preferences::load()).await?;
            Ok(0)
        }
        Commands::Ls { repo_url, json } => handle_ls(&cli.global, &repo_url, json).await,
        Commands::Cat {
            repo_url,
            file,
            language,
        } => handle_cat(&cli.global, &repo_url, &file, language).await,
        Commands::Restore { link, interactive } => {
            handle_restore(&cli.global, &link, interactive).await
        }
        Commands::Theme { action } => handle_theme(action),
        Commands::Languages => {
            for (tag, label) in LANGUAGES {
                println!("{:<18} {}", tag, label);
            }
            Ok(0)
        }
    }
}

fn new_session(global: &GlobalOpts) -> Result<Session> {
    let page = Url::parse(&global.link_base)
        .with_context(|| format!("Invalid link base '{}'", global.link_base))?;
    session_at(global, page)
}

// A session whose address bar starts out at `page`
fn session_at(global: &GlobalOpts, page: Url) -> Result<Session> {
    let timeout = Duration::from_secs(global.timeout);
    let client = GithubClient::new(&global.api_base, timeout)?;
    Ok(Session::new(Arc::new(client), page, timeout))
}

// Handles the 'ls' subcommand
async fn handle_ls(global: &GlobalOpts, repo_url: &str, json: bool) -> Result<i32> {
    let mut session = new_session(global)?;
    session.open_url(repo_url)?;
    session.settle().await;

    let state = session.state();
    match state.listing() {
        Listing::Loaded { path, entries } if json => {
            let output = serde_json::json!({
                "repo": state.repo(),
                "path": path,
                "entries": entries,
                "link": session.share_link().as_str(),
                "query": state.snapshot().map(|snapshot| snapshot.to_query()),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(0)
        }
        Listing::Loaded { .. } => {
            render::print_location(state);
            render::print_listing(state);
            Ok(0)
        }
        _ => {
            render::print_listing(state);
            Ok(1)
        }
    }
}

// Handles the 'cat' subcommand
//
// The file's directory is listed first so the entry (and its download URL)
// is known, exactly as if the user had navigated there.
async fn handle_cat(
    global: &GlobalOpts,
    repo_url: &str,
    file: &str,
    language: Option<String>,
) -> Result<i32> {
    let mut session = new_session(global)?;
    session.open_url(repo_url)?;

    let file = file.trim_matches('/');
    let (dir, name) = file.rsplit_once('/').unwrap_or(("", file));
    session.go_to_path(dir);
    session.settle().await;

    if let Some(tag) = language {
        let tag = tag.to_lowercase();
        if !explorer::is_known_language(&tag) {
            anyhow::bail!("Unknown language '{}' (see: repo-explorer languages)", tag);
        }
        session.set_language(LanguageChoice::Pinned(tag));
    }

    if let Err(e) = session.open_file_named(name) {
        render::print_error(session.state());
        eprintln!("❌ {}", e);
        return Ok(1);
    }
    session.settle().await;

    print_selected(&session, &preferences::load())
}

// Handles the 'restore' subcommand
//
// The link becomes the session's address bar, so restoring reads the
// repo/path/file parameters straight from it and rewrites them in place.
async fn handle_restore(global: &GlobalOpts, link: &str, interactive: bool) -> Result<i32> {
    let link = Url::parse(link).with_context(|| format!("Invalid link '{}'", link))?;

    let mut session = session_at(global, link)?;
    if !session.restore_from_address_bar()? {
        anyhow::bail!("The link does not name a repository (missing 'repo' parameter)");
    }
    let wants_file = session.state().pending_selection().is_some();
    session.settle().await;

    let prefs = preferences::load();
    if interactive {
        browse::run(&mut session, &prefs).await?;
        return Ok(0);
    }

    let state = session.state();
    render::print_location(state);
    render::print_listing(state);
    if wants_file {
        return print_selected(&session, &prefs);
    }

    render::print_error(state);
    Ok(if state.error().is_some() { 1 } else { 0 })
}

fn print_selected(session: &Session, prefs: &Preferences) -> Result<i32> {
    let state = session.state();
    match (state.selected(), state.effective_language()) {
        (Some(file), Some(language)) => {
            render::print_file(file, language, &prefs.code_theme);
            Ok(0)
        }
        _ => {
            render::print_error(state);
            Ok(1)
        }
    }
}

// Handles the 'theme' subcommand
fn handle_theme(action: Option<ThemeAction>) -> Result<i32> {
    let mut prefs = preferences::load();

    match action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => {
            print_preferences(&prefs);
            return Ok(0);
        }
        ThemeAction::Toggle => prefs.set_theme(prefs.theme.toggled()),
        ThemeAction::Set { theme } => prefs.set_theme(theme.parse::<Theme>()?),
        ThemeAction::Code { code_theme } => prefs.set_code_theme(&code_theme)?,
    }

    let path = preferences::save(&prefs)?;
    tracing::debug!(path = %path.display(), "preferences saved");
    print_preferences(&prefs);
    Ok(0)
}

fn print_preferences(prefs: &Preferences) {
    println!("Theme:      {}", prefs.theme);
    println!("Code theme: {}", prefs.code_theme);
    println!();
    println!("Code themes for {} mode:", prefs.theme);
    for (value, label) in prefs.theme.code_themes() {
        let marker = if *value == prefs.code_theme { "*" } else { " " };
        println!(" {} {:<14} {}", marker, value, label);
    }
}
