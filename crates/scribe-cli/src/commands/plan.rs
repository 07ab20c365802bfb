//! Plan command implementation.

use crate::actions::ActionCatalog;
use crate::cli::PlanArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use scribe_planner::Submission;
use scribe_store::SqliteStore;
use std::sync::{Arc, Mutex};

/// Execute the plan command.
///
/// Runs discovery only; nothing is queued and no action is loaded.
pub fn execute_plan(args: PlanArgs, config: &Config, store: SqliteStore, formatter: &Formatter) -> Result<()> {
    let root = super::parse_collection(&args.collection)?;

    let mut submission = Submission::new(
        Arc::new(Mutex::new(store)),
        ActionCatalog::new(),
        config.planner.clone(),
    );
    let plan = submission.plan(root)?;

    println!("{}", formatter.format_plan(&plan)?);

    Ok(())
}
