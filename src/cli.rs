// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
//   browse   - interactive explorer (ls / cd / cat / link ...)
//   ls       - print one directory listing
//   cat      - print one file with its language tag
//   restore  - open a shared explorer link
//   theme    - show or change the saved display preferences
//   languages - list language tags that can be pinned
//
// Global flags apply to every subcommand and configure the HTTP client and
// the base of the shareable links.
// =============================================================================

use clap::{Args, Parser, Subcommand};

use crate::github::{DEFAULT_API_BASE, DEFAULT_TIMEOUT};

/// Page the shareable links point at when none is given.
pub const DEFAULT_LINK_BASE: &str = "http://localhost:5173/";

#[derive(Parser, Debug)]
#[command(
    name = "repo-explorer",
    version,
    about = "Browse GitHub repositories from the terminal",
    long_about = "repo-explorer lists directories and prints files of public GitHub repositories. \
                  Every location can be turned into a shareable link and reopened later."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Seconds before a single request is abandoned
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Root of the GitHub REST API
    #[arg(long, global = true, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Page URL that shareable links are built on
    #[arg(long, global = true, default_value = DEFAULT_LINK_BASE)]
    pub link_base: String,

    /// Log requests and state changes to stderr (-vv for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Explore a repository interactively
    ///
    /// Example: repo-explorer browse https://github.com/rust-lang/rust
    Browse {
        /// GitHub repository URL, optionally pointing into a sub-directory
        repo_url: String,
    },

    /// List a directory
    ///
    /// Example: repo-explorer ls https://github.com/tokio-rs/tokio/tokio
    Ls {
        /// GitHub repository URL, optionally pointing into a sub-directory
        repo_url: String,

        /// Output the listing as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print a file
    ///
    /// Example: repo-explorer cat https://github.com/serde-rs/serde README.md
    Cat {
        /// GitHub repository URL
        repo_url: String,

        /// Path of the file from the repository root
        file: String,

        /// Language tag to report instead of the detected one
        #[arg(long)]
        language: Option<String>,
    },

    /// Reopen a shareable explorer link
    ///
    /// Example: repo-explorer restore "http://localhost:5173/?repo=https%3A%2F%2Fgithub.com%2Fo%2Fr"
    Restore {
        /// A link printed by `browse` (the `link` command)
        link: String,

        /// Continue interactively after restoring
        #[arg(long)]
        interactive: bool,
    },

    /// Show or change display preferences
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// List the language tags accepted by `--language` and `lang`
    Languages,
}

#[derive(Subcommand, Debug)]
pub enum ThemeAction {
    /// Print the saved preferences and the code themes available
    Show,
    /// Switch between dark and light
    Toggle,
    /// Set the display theme (dark or light)
    Set { theme: String },
    /// Set the code-highlight theme
    Code { code_theme: String },
}
