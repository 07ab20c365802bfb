//! Submit command implementation.

use crate::actions::ActionCatalog;
use crate::cli::SubmitArgs;
use crate::config::Config;
use crate::console::{ConsoleMessenger, ConsoleProgress};
use crate::error::Result;
use crate::output::Formatter;
use scribe_batch::{BatchConfig, BatchReport, BatchRunner, BatchWorker};
use scribe_planner::{Submission, SubmissionState};
use scribe_store::SqliteStore;
use std::sync::{Arc, Mutex};

/// How a submit run ended
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// Final batch report
    pub report: BatchReport,
    /// Submission state after the run
    pub state: SubmissionState,
}

/// Pacing for this run: the configured batch settings, then the preset,
/// then an explicit `--ops-per-tick`.
pub fn batch_config(args: &SubmitArgs, config: &Config) -> Result<BatchConfig> {
    let mut batch = match args.preset {
        Some(preset) => preset.into(),
        None => config.batch.clone(),
    };
    if let Some(ops) = args.ops_per_tick {
        batch.ops_per_tick = ops;
    }
    batch.validate()?;
    Ok(batch)
}

/// Execute the submit command.
pub fn execute_submit(
    args: SubmitArgs,
    config: &Config,
    store: SqliteStore,
    formatter: &Formatter,
) -> Result<SubmitOutcome> {
    config.validate()?;
    let root = super::parse_collection(&args.collection)?;
    let pacing = batch_config(&args, config)?;

    // The blocking HTTP client is built here, outside the runtime.
    let catalog = ActionCatalog::from_config(&config.action, args.dry_run)?;

    let mut submission = Submission::new(Arc::new(Mutex::new(store)), catalog, config.planner.clone());
    let batch = submission.submit(root, &ConsoleMessenger::new(formatter.clone()))?;

    let runner = BatchRunner::new(batch, pacing.clone())?
        .with_progress_sink(ConsoleProgress::new(formatter.clone()));
    submission.start_processing()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let runner = runtime.block_on(BatchWorker::new(&pacing).run(runner))?;

    let report = runner.report().clone();
    let state = submission.finish(&report)?.clone();

    println!("{}", formatter.format_report(&report)?);
    if let SubmissionState::Aborted(reason) = &state {
        eprintln!("{}", formatter.warning(reason));
    }

    Ok(SubmitOutcome { report, state })
}
