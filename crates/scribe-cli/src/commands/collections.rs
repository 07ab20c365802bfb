//! Collections command implementation.

use crate::cli::CollectionsArgs;
use crate::error::Result;
use crate::output::Formatter;
use scribe_domain::Node;
use scribe_planner::lookup_vocabulary;
use scribe_store::{NodeSearch, SqliteStore, DEFAULT_BUNDLE};

/// Run the collection search.
///
/// Returns `None` when container models are required but none is mapped.
pub fn find_collections(args: CollectionsArgs, store: &SqliteStore) -> Result<Option<Vec<Node>>> {
    let models = if args.all {
        Vec::new()
    } else {
        let containers: Vec<_> = lookup_vocabulary(store)?
            .into_iter()
            .filter(|l| l.vocabulary.is_container())
            .filter_map(|l| l.term)
            .collect();

        if containers.is_empty() {
            return Ok(None);
        }
        containers
    };

    let search = NodeSearch {
        title_contains: args.search,
        bundle: Some(DEFAULT_BUNDLE.to_string()),
        models,
        limit: Some(args.limit),
    };

    Ok(Some(store.find_nodes(&search)?))
}

/// Execute the collections command.
pub fn execute_collections(args: CollectionsArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    match find_collections(args, store)? {
        Some(nodes) => println!("{}", formatter.format_nodes(&nodes)?),
        None => eprintln!(
            "{}",
            formatter.warning("No container models are mapped; use --all to list every object")
        ),
    }

    Ok(())
}
