//! Recursive discovery of container nodes below a root

use crate::PlannerError;
use scribe_domain::traits::{HierarchyQueries, MemberQuery};
use scribe_domain::{NodeId, TermId};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Result of expanding a root into its container descendants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// The root plus every container found below it
    pub containers: BTreeSet<NodeId>,

    /// Member queries issued
    pub iterations: usize,
}

/// Fixed-point walk over `member_of` links
///
/// Each iteration queries the direct members of the current frontier whose
/// model is a container, keeps only ids not seen before, and makes those the
/// next frontier. The walk stops at the first empty frontier, so a tree of
/// container depth D costs D+1 queries. Revisited ids are dropped, which makes
/// cyclic membership terminate.
///
/// # Examples
///
/// ```ignore
/// let walker = HierarchyWalker::new(&store, 64);
/// let expansion = walker.expand(root, &terms.containers)?;
/// assert!(expansion.containers.contains(&root));
/// ```
pub struct HierarchyWalker<'a, Q> {
    queries: &'a Q,
    max_depth: usize,
}

impl<'a, Q> HierarchyWalker<'a, Q>
where
    Q: HierarchyQueries,
    Q::Error: Display,
{
    /// Create a walker bounded to `max_depth` iterations
    pub fn new(queries: &'a Q, max_depth: usize) -> Self {
        Self { queries, max_depth }
    }

    /// Expand `root` into the set of containers below it (root included)
    pub fn expand(&self, root: NodeId, container_terms: &[TermId]) -> Result<Expansion, PlannerError> {
        if container_terms.is_empty() {
            return Err(PlannerError::Query(
                "No container terms to expand with".to_string(),
            ));
        }

        let mut containers = BTreeSet::from([root]);
        let mut frontier = vec![root];
        let mut iterations = 0;

        while !frontier.is_empty() {
            if iterations >= self.max_depth {
                return Err(PlannerError::HierarchyTooDeep {
                    max_depth: self.max_depth,
                });
            }
            iterations += 1;

            let query = MemberQuery {
                parents: frontier,
                models: container_terms.to_vec(),
            };
            let members = self
                .queries
                .member_nodes(&query)
                .map_err(|e| PlannerError::Query(e.to_string()))?;

            frontier = members
                .into_iter()
                .filter(|id| containers.insert(*id))
                .collect();

            tracing::debug!(
                "Walk iteration {}: {} new containers",
                iterations,
                frontier.len()
            );
        }

        Ok(Expansion {
            containers,
            iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FakeRepository;
    use proptest::prelude::*;
    use scribe_domain::Vocabulary;

    fn container_terms(repo: &FakeRepository) -> Vec<TermId> {
        Vocabulary::CONTAINERS.iter().map(|v| repo.term(*v)).collect()
    }

    fn ids(values: &[u64]) -> BTreeSet<NodeId> {
        values.iter().copied().map(NodeId::new).collect()
    }

    #[test]
    fn test_root_without_descendants() {
        let mut repo = FakeRepository::with_vocabulary();
        let root = repo.add_node(1, Vocabulary::Collection, &[]);

        let walker = HierarchyWalker::new(&repo, 64);
        let expansion = walker.expand(root, &container_terms(&repo)).unwrap();

        assert_eq!(expansion.containers, ids(&[1]));
        assert_eq!(expansion.iterations, 1);
    }

    #[test]
    fn test_mixed_container_models() {
        let mut repo = FakeRepository::with_vocabulary();
        let root = repo.add_node(1, Vocabulary::Collection, &[]);
        repo.add_node(2, Vocabulary::Newspaper, &[1]);
        repo.add_node(3, Vocabulary::PublicationIssue, &[2]);
        repo.add_node(4, Vocabulary::Book, &[1]);
        repo.add_node(5, Vocabulary::CompoundObject, &[4]);
        repo.add_node(6, Vocabulary::Part, &[3]);
        repo.add_node(7, Vocabulary::Part, &[5]);

        let walker = HierarchyWalker::new(&repo, 64);
        let expansion = walker.expand(root, &container_terms(&repo)).unwrap();

        assert_eq!(expansion.containers, ids(&[1, 2, 3, 4, 5]));
        assert_eq!(expansion.iterations, 3);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut repo = FakeRepository::with_vocabulary();
        let root = repo.add_node(1, Vocabulary::Collection, &[3]);
        repo.add_node(2, Vocabulary::Collection, &[1]);
        repo.add_node(3, Vocabulary::Collection, &[2]);

        let walker = HierarchyWalker::new(&repo, 64);
        let expansion = walker.expand(root, &container_terms(&repo)).unwrap();

        assert_eq!(expansion.containers, ids(&[1, 2, 3]));
        assert_eq!(expansion.iterations, 3);
    }

    #[test]
    fn test_shared_child_visited_once() {
        let mut repo = FakeRepository::with_vocabulary();
        let root = repo.add_node(1, Vocabulary::Collection, &[]);
        repo.add_node(2, Vocabulary::Collection, &[1]);
        repo.add_node(3, Vocabulary::Collection, &[1]);
        repo.add_node(4, Vocabulary::Book, &[2, 3]);

        let walker = HierarchyWalker::new(&repo, 64);
        let expansion = walker.expand(root, &container_terms(&repo)).unwrap();

        assert_eq!(expansion.containers, ids(&[1, 2, 3, 4]));
        assert_eq!(expansion.iterations, 3);
    }

    #[test]
    fn test_depth_bound() {
        let mut repo = FakeRepository::with_vocabulary();
        let root = repo.add_node(1, Vocabulary::Collection, &[]);
        repo.add_node(2, Vocabulary::Collection, &[1]);
        repo.add_node(3, Vocabulary::Collection, &[2]);

        // Depth 2 needs three iterations
        let walker = HierarchyWalker::new(&repo, 2);
        assert!(matches!(
            walker.expand(root, &container_terms(&repo)),
            Err(PlannerError::HierarchyTooDeep { max_depth: 2 })
        ));

        let walker = HierarchyWalker::new(&repo, 3);
        assert!(walker.expand(root, &container_terms(&repo)).is_ok());
    }

    #[test]
    fn test_empty_container_terms_rejected() {
        let mut repo = FakeRepository::with_vocabulary();
        let root = repo.add_node(1, Vocabulary::Collection, &[]);

        let walker = HierarchyWalker::new(&repo, 64);
        assert!(matches!(walker.expand(root, &[]), Err(PlannerError::Query(_))));
        assert_eq!(repo.query_count(), 0);
    }

    // Node i > 0 hangs off parent_choice[i-1] % i, so the input is always a tree
    fn build_tree(parent_choices: &[usize], container_flags: &[bool]) -> (FakeRepository, BTreeSet<NodeId>, usize) {
        let mut repo = FakeRepository::with_vocabulary();
        repo.add_node(1, Vocabulary::Collection, &[]);

        let mut depth = vec![0usize];
        let mut is_container = vec![true];
        let mut expected = ids(&[1]);
        let mut max_depth = 0;

        for (i, choice) in parent_choices.iter().enumerate() {
            let index = i + 1;
            // Only containers can have members worth walking
            let candidates: Vec<usize> = (0..index).filter(|p| is_container[*p]).collect();
            let parent = candidates[choice % candidates.len()];
            let container = container_flags[i];
            let model = if container { Vocabulary::Book } else { Vocabulary::Part };

            repo.add_node(index as u64 + 1, model, &[parent as u64 + 1]);
            depth.push(depth[parent] + 1);
            is_container.push(container);

            if container {
                expected.insert(NodeId::new(index as u64 + 1));
                max_depth = max_depth.max(depth[index]);
            }
        }

        (repo, expected, max_depth)
    }

    proptest! {
        #[test]
        fn prop_tree_depth_and_union(
            shape in (0usize..40).prop_flat_map(|n| (
                prop::collection::vec(any::<usize>(), n),
                prop::collection::vec(any::<bool>(), n),
            ))
        ) {
            let (parent_choices, container_flags) = shape;
            let (repo, expected, depth) = build_tree(&parent_choices, &container_flags);

            let walker = HierarchyWalker::new(&repo, 64);
            let expansion = walker.expand(NodeId::new(1), &container_terms(&repo)).unwrap();

            prop_assert_eq!(expansion.containers, expected);
            prop_assert_eq!(expansion.iterations, depth + 1);
        }
    }
}
