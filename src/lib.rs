//! BeatSaver playlist sync library
//!
//! This library keeps a BeatSaver playlist in sync with the results of a catalog
//! search. A sync run empties the target playlist and then walks the search result
//! pages, adding every map it finds. Authentication is a session cookie obtained by
//! logging in with stored credentials and refreshed once it expires.
//!
//! # Modules
//!
//! - `beatsaver` - HTTP transport and the BeatSaver endpoints (auth, playlist, search)
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - The crate error type
//! - `management` - Persisted credentials and session cookie
//! - `sync` - The drain-then-fill playlist workflow
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod beatsaver;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod sync;
pub mod types;
pub mod utils;

pub use error::{Result, SyncError};

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Removing {} songs from playlist {}", count, playlist_id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used for fatal errors where the run cannot continue. Code after the
/// macro does not execute.
///
/// # Example
///
/// ```
/// error!("Could not parse a playlist ID from {}", input);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues such as a single failed playlist toggle or an
/// unparsable cookie expiry.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
