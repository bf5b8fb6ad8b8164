//! Titled: sample playlists for Spotify albums.
//!
//! Given an album, Titled looks up for every track the song it samples or
//! draws inspiration from, finds that song on Spotify, and creates a
//! playlist that interleaves each album track with its source.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the web front end
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loaded from the environment and `.env`
//! - `error` - Error type shared by all layers
//! - `logging` - `tracing` subscriber setup
//! - `management` - File-backed user store and album track cache
//! - `pipeline` - Concurrent track resolution and playlist assembly
//! - `server` - Router and listener
//! - `service` - Facade used by the front ends
//! - `sources` - Sample sources (Genius annotations, OpenAI inference)
//! - `spotify` - Spotify Web API and accounts clients
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE helpers, album link parsing, response checks
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use titled::{config::{self, Config}, server, service::TitledService};
//!
//! #[tokio::main]
//! async fn main() -> titled::Result<()> {
//!     config::load_env().await?;
//!     let service = TitledService::new(Config::from_env()?)?;
//!     server::start_api_server(Arc::new(service)).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod management;
pub mod pipeline;
pub mod server;
pub mod service;
pub mod sources;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Result};

/// Prints an informational message with a blue "o" prefix.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message to stderr and exits with status 1.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning with a yellow "!" prefix.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
