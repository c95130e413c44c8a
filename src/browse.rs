// src/browse.rs
// =============================================================================
// The interactive explorer loop.
//
// Reads one command per line from stdin, applies it to the Session, waits
// for the requests it issued to settle, then prints the new state.
//
//   ls                 show the current directory again
//   cd <dir>           enter a directory ("..", "/" and "/a/b" work too)
//   up [index]         jump to a breadcrumb (-1 or nothing = root)
//   cat <file>         open a file from the current directory
//   lang <tag|auto>    pin a language, or go back to auto-detection
//   lang list          list the language tags
//   link               print the shareable link for this location
//   retry              reload the current directory
//   new <url>          open another repository
//   close              close the repository and clear the link
//   quit               leave
// =============================================================================

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::explorer::{is_known_language, LanguageChoice, Session, LANGUAGES};
use crate::preferences::Preferences;
use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    List,
    Cd(String),
    Up(isize),
    Cat(String),
    Lang(LanguageChoice),
    LangList,
    Link,
    Retry,
    New(String),
    Close,
    Help,
    Quit,
}

// Parses one input line
//
// Returns Ok(None) for blank lines and Err with a message for anything we
// don't understand.
pub fn parse_command(line: &str) -> Result<Option<ReplCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb {
        "ls" => ReplCommand::List,
        "cd" if rest.is_empty() => ReplCommand::Up(-1),
        "cd" => ReplCommand::Cd(rest.to_string()),
        "root" => ReplCommand::Up(-1),
        "up" if rest.is_empty() => ReplCommand::Up(-1),
        "up" => ReplCommand::Up(
            rest.parse()
                .map_err(|_| format!("'{}' is not a breadcrumb index", rest))?,
        ),
        "cat" | "open" if rest.is_empty() => return Err("usage: cat <file>".to_string()),
        "cat" | "open" => ReplCommand::Cat(rest.to_string()),
        "lang" if rest.is_empty() || rest == "auto" => ReplCommand::Lang(LanguageChoice::Auto),
        "lang" if rest == "list" => ReplCommand::LangList,
        "lang" => {
            let tag = rest.to_lowercase();
            if !is_known_language(&tag) {
                return Err(format!("unknown language '{}' (try: lang list)", rest));
            }
            ReplCommand::Lang(LanguageChoice::Pinned(tag))
        }
        "link" | "share" => ReplCommand::Link,
        "retry" | "reload" => ReplCommand::Retry,
        "new" if rest.is_empty() => return Err("usage: new <repository url>".to_string()),
        "new" => ReplCommand::New(rest.to_string()),
        "close" => ReplCommand::Close,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => return Err(format!("unknown command '{}' (try: help)", other)),
    };

    Ok(Some(command))
}

/// Runs the loop until `quit` or end of input.
pub async fn run(session: &mut Session, prefs: &Preferences) -> Result<()> {
    session.settle().await;
    show(session, prefs, false);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("⚠️  {}", message);
                continue;
            }
        };

        let mut show_file = false;
        match command {
            ReplCommand::Quit => break,
            ReplCommand::Help => {
                print_help();
                continue;
            }
            ReplCommand::LangList => {
                for (tag, label) in LANGUAGES {
                    println!("  {:<18} {}", tag, label);
                }
                continue;
            }
            ReplCommand::Link => {
                println!("🔗 {}", session.share_link());
                continue;
            }
            ReplCommand::List => {}
            ReplCommand::Cd(target) => change_directory(session, &target),
            ReplCommand::Up(index) => session.go_to_ancestor(index),
            ReplCommand::Cat(name) => {
                if let Err(e) = session.open_file_named(&name) {
                    eprintln!("⚠️  {}", e);
                    continue;
                }
                show_file = true;
            }
            ReplCommand::Lang(choice) => {
                session.set_language(choice);
                if session.state().selected().is_none() {
                    println!("Language: {}", describe_language(session.state().language()));
                    continue;
                }
                show_file = true;
            }
            ReplCommand::Retry => session.retry(),
            ReplCommand::Close => {
                session.close_repository();
                println!("Repository closed. Open another with: new <url>");
                continue;
            }
            ReplCommand::New(url) => {
                if let Err(e) = session.open_url(&url) {
                    eprintln!("⚠️  {}", e);
                    continue;
                }
            }
        }

        session.settle().await;
        show(session, prefs, show_file);
    }

    Ok(())
}

// cd accepts a child name, "..", "/" or an absolute "/a/b" path
fn change_directory(session: &mut Session, target: &str) {
    let depth = session.state().path_stack().len() as isize;
    match target {
        ".." => session.go_to_ancestor(depth - 2),
        "/" => session.go_to_ancestor(-1),
        absolute if absolute.starts_with('/') => session.go_to_path(absolute),
        nested if nested.contains('/') => session.enter_directory(nested),
        name => {
            let is_dir = session
                .state()
                .listing()
                .find(name)
                .is_some_and(|entry| entry.is_dir());
            if is_dir {
                session.enter_directory(name);
            } else {
                eprintln!("⚠️  no directory named '{}' here", name);
            }
        }
    }
}

fn describe_language(choice: &LanguageChoice) -> &str {
    match choice {
        LanguageChoice::Auto => "auto",
        LanguageChoice::Pinned(tag) => tag,
    }
}

fn show(session: &Session, prefs: &Preferences, show_file: bool) {
    let state = session.state();
    render::print_error(state);

    if show_file {
        if let (Some(file), Some(language)) = (state.selected(), state.effective_language()) {
            render::print_file(file, language, &prefs.code_theme);
            return;
        }
    }

    render::print_location(state);
    render::print_listing(state);
    if let Some(file) = state.selected() {
        println!("   selected: {}", file.path);
    }
}

fn print_help() {
    println!(
        "Commands: ls, cd <dir>, up [index], cat <file>, lang <tag|auto|list>, link, retry, new <url>, close, quit"
    );
}
