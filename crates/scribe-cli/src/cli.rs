//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scribe CLI - Queue OCR text extraction for the pages of a collection.
#[derive(Debug, Parser)]
#[command(name = "scribe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Repository database path
    #[arg(short, long, global = true, env = "SCRIBE_DATABASE")]
    pub database: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find collections to submit
    Collections(CollectionsArgs),

    /// Show how the fixed vocabulary resolves locally
    Terms,

    /// Preview the containers and pages a submission would cover
    Plan(PlanArgs),

    /// Queue text extraction for every pending page of a collection
    Submit(SubmitArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the collections command.
#[derive(Debug, Parser)]
pub struct CollectionsArgs {
    /// Title fragment to search for
    #[arg(short, long)]
    pub search: Option<String>,

    /// Include every repository object, not only container models
    #[arg(long)]
    pub all: bool,

    /// Maximum number of results
    #[arg(short, long, default_value = "25")]
    pub limit: usize,
}

/// Arguments for the plan command.
#[derive(Debug, Parser)]
pub struct PlanArgs {
    /// Collection node (`123` or `Some Title (123)`)
    pub collection: String,
}

/// Arguments for the submit command.
#[derive(Debug, Parser)]
pub struct SubmitArgs {
    /// Collection node (`123` or `Some Title (123)`)
    pub collection: String,

    /// Log what would be queued instead of posting events
    #[arg(long)]
    pub dry_run: bool,

    /// Operations per tick (overrides config)
    #[arg(long)]
    pub ops_per_tick: Option<usize>,

    /// Batch pacing preset (overrides config)
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,
}

/// Batch pacing presets.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PresetArg {
    /// One unit per tick
    Interactive,
    /// Large ticks, short pauses
    Background,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<PresetArg> for scribe_batch::BatchConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Interactive => scribe_batch::BatchConfig::interactive(),
            PresetArg::Background => scribe_batch::BatchConfig::background(),
        }
    }
}
