//! Scribe CLI - Queue OCR text extraction for the pages of a collection.

use anyhow::Context;
use clap::Parser;
use scribe_cli::commands;
use scribe_cli::{Cli, Command, Config, Formatter};
use scribe_store::SqliteStore;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    init_tracing(&cli);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-q`/`-v`.
fn init_tracing(cli: &Cli) {
    let default_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(Some(&config_path))
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let database = cli.database.unwrap_or_else(|| config.database.path.clone());
    let open_store = || {
        tracing::debug!("Opening repository at {}", database);
        SqliteStore::new(&database).with_context(|| format!("Failed to open repository at {}", database))
    };

    match cli.command {
        Command::Collections(args) => commands::execute_collections(args, &open_store()?, &formatter)?,
        Command::Terms => commands::execute_terms(&open_store()?, &formatter)?,
        Command::Plan(args) => commands::execute_plan(args, &config, open_store()?, &formatter)?,
        Command::Submit(args) => {
            commands::execute_submit(args, &config, open_store()?, &formatter)?;
        }
        Command::Config(args) => commands::execute_config(args, &config, &config_path, &formatter)?,
    }

    Ok(())
}
