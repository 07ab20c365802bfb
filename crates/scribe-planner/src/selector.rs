//! Selection of pages still waiting for extracted text

use crate::PlannerError;
use scribe_domain::traits::{HierarchyQueries, PendingQuery};
use scribe_domain::{NodeId, TermId};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Anti-join over containers, Part model and media use
pub struct Selector<'a, Q> {
    queries: &'a Q,
}

impl<'a, Q> Selector<'a, Q>
where
    Q: HierarchyQueries,
    Q::Error: Display,
{
    /// Create a selector over a query executor
    pub fn new(queries: &'a Q) -> Self {
        Self { queries }
    }

    /// Part nodes directly under `containers` with no `extracted_text_term` media
    ///
    /// Ids come back unique and in ascending order. No containers means no
    /// query and an empty result.
    pub fn select(
        &self,
        containers: &BTreeSet<NodeId>,
        part_term: TermId,
        extracted_text_term: TermId,
    ) -> Result<Vec<NodeId>, PlannerError> {
        if containers.is_empty() {
            return Ok(Vec::new());
        }

        let query = PendingQuery {
            containers: containers.iter().copied().collect(),
            part_model: part_term,
            excluded_use: extracted_text_term,
        };

        let mut selected: Vec<NodeId> = self
            .queries
            .pending_parts(&query)
            .map_err(|e| PlannerError::Query(e.to_string()))?
            .into_iter()
            .map(|row| row.nid)
            .collect();
        selected.sort_unstable();
        selected.dedup();

        tracing::debug!(
            "Selected {} pending parts under {} containers",
            selected.len(),
            containers.len()
        );

        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FakeRepository;
    use scribe_domain::Vocabulary;

    fn select(repo: &FakeRepository, containers: &[u64]) -> Vec<NodeId> {
        let containers = containers.iter().copied().map(NodeId::new).collect();
        Selector::new(repo)
            .select(
                &containers,
                repo.term(Vocabulary::Part),
                repo.term(Vocabulary::ExtractedText),
            )
            .unwrap()
    }

    fn ids(values: &[u64]) -> Vec<NodeId> {
        values.iter().copied().map(NodeId::new).collect()
    }

    #[test]
    fn test_excludes_pages_with_text() {
        let mut repo = FakeRepository::with_vocabulary();
        repo.add_node(1, Vocabulary::Book, &[]);
        repo.add_node(2, Vocabulary::Part, &[1]);
        repo.add_node(3, Vocabulary::Part, &[1]);
        repo.add_node(4, Vocabulary::Part, &[1]);
        repo.add_media(3, Vocabulary::ExtractedText);
        repo.add_media(4, Vocabulary::ServiceFile);

        assert_eq!(select(&repo, &[1]), ids(&[2, 4]));
    }

    #[test]
    fn test_ignores_non_parts_and_outsiders() {
        let mut repo = FakeRepository::with_vocabulary();
        repo.add_node(1, Vocabulary::Book, &[]);
        repo.add_node(2, Vocabulary::Book, &[1]);
        repo.add_node(3, Vocabulary::Part, &[2]);
        repo.add_node(9, Vocabulary::Part, &[]);

        // 3 is under 2, which is not in the container set
        assert!(select(&repo, &[1]).is_empty());
        assert_eq!(select(&repo, &[1, 2]), ids(&[3]));
    }

    #[test]
    fn test_page_in_two_containers_selected_once() {
        let mut repo = FakeRepository::with_vocabulary();
        repo.add_node(1, Vocabulary::Collection, &[]);
        repo.add_node(2, Vocabulary::Book, &[]);
        repo.add_node(3, Vocabulary::Part, &[1, 2]);

        assert_eq!(select(&repo, &[1, 2]), ids(&[3]));
    }

    #[test]
    fn test_empty_containers_skip_query() {
        let repo = FakeRepository::with_vocabulary();
        assert!(select(&repo, &[]).is_empty());
        assert_eq!(repo.query_count(), 0);
    }

    #[test]
    fn test_idempotent_and_ordered() {
        let mut repo = FakeRepository::with_vocabulary();
        repo.add_node(1, Vocabulary::Book, &[]);
        for id in [7, 3, 5] {
            repo.add_node(id, Vocabulary::Part, &[1]);
        }

        let first = select(&repo, &[1]);
        let second = select(&repo, &[1]);
        assert_eq!(first, ids(&[3, 5, 7]));
        assert_eq!(first, second);
    }
}
