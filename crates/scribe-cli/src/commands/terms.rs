//! Terms command implementation.

use crate::error::Result;
use crate::output::Formatter;
use scribe_planner::lookup_vocabulary;
use scribe_store::SqliteStore;

/// Execute the terms command.
pub fn execute_terms(store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let lookups = lookup_vocabulary(store)?;

    println!("{}", formatter.format_terms(&lookups)?);

    let blocking = lookups.iter().filter(|l| l.blocks_submission()).count();
    if blocking > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!("{} concept(s) have no local term; submissions will abort", blocking))
        );
    } else if lookups.iter().any(|l| l.term.is_none()) {
        eprintln!(
            "{}",
            formatter.warning("Service File has no local term; every unit will fail to find its source")
        );
    }

    Ok(())
}
