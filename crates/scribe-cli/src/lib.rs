//! Scribe CLI library.
//!
//! Configuration, derivative actions, command execution and output
//! formatting for the `scribe` command-line interface.

pub mod actions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod output;

pub use actions::{ActionCatalog, ActionError, CatalogAction};
pub use cli::{Cli, Command};
pub use config::Config;
pub use console::{ConsoleMessenger, ConsoleProgress};
pub use error::{CliError, Result};
pub use output::Formatter;
