//! Resolution of the fixed vocabulary into local term ids

use crate::PlannerError;
use scribe_domain::traits::TermResolver;
use scribe_domain::{ResolvedTerms, TermId, Vocabulary};
use std::fmt::Display;

/// How one vocabulary entry resolves locally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermLookup {
    /// The vocabulary entry
    pub vocabulary: Vocabulary,

    /// Its local term, if any
    pub term: Option<TermId>,
}

impl TermLookup {
    /// Whether this entry being unmapped makes `resolve_terms` fail
    ///
    /// Service File is only read when a unit runs, so it never blocks a
    /// submission.
    pub fn blocks_submission(&self) -> bool {
        self.term.is_none()
            && (self.vocabulary.is_container()
                || matches!(self.vocabulary, Vocabulary::Part | Vocabulary::ExtractedText))
    }
}

/// Resolve a single vocabulary entry, failing when it is unmapped
pub fn resolve_term<R>(resolver: &R, vocabulary: Vocabulary) -> Result<TermId, PlannerError>
where
    R: TermResolver,
    R::Error: Display,
{
    let uri = vocabulary.uri();
    resolver
        .term_for_uri(uri)
        .map_err(|e| PlannerError::TermResolution {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?
        .ok_or_else(|| PlannerError::TermNotFound {
            uri: uri.to_string(),
        })
}

/// Resolve every term a submission needs
///
/// The five container models resolve first, in `Vocabulary::CONTAINERS`
/// order, then Part and Extracted Text. The first unmapped URI aborts.
pub fn resolve_terms<R>(resolver: &R) -> Result<ResolvedTerms, PlannerError>
where
    R: TermResolver,
    R::Error: Display,
{
    let containers = Vocabulary::CONTAINERS
        .iter()
        .map(|vocabulary| resolve_term(resolver, *vocabulary))
        .collect::<Result<Vec<_>, _>>()?;

    let part = resolve_term(resolver, Vocabulary::Part)?;
    let extracted_text = resolve_term(resolver, Vocabulary::ExtractedText)?;

    tracing::debug!(
        "Resolved terms: containers {:?}, part {}, extracted text {}",
        containers,
        part,
        extracted_text
    );

    Ok(ResolvedTerms {
        containers,
        part,
        extracted_text,
    })
}

/// Look up every vocabulary entry without failing on unmapped ones
pub fn lookup_vocabulary<R>(resolver: &R) -> Result<Vec<TermLookup>, PlannerError>
where
    R: TermResolver,
    R::Error: Display,
{
    Vocabulary::ALL
        .iter()
        .map(|vocabulary| {
            let term = resolver
                .term_for_uri(vocabulary.uri())
                .map_err(|e| PlannerError::TermResolution {
                    uri: vocabulary.uri().to_string(),
                    reason: e.to_string(),
                })?;
            Ok(TermLookup {
                vocabulary: *vocabulary,
                term,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FakeRepository;

    #[test]
    fn test_resolve_all_terms() {
        let repo = FakeRepository::with_vocabulary();
        let terms = resolve_terms(&repo).unwrap();

        assert_eq!(terms.containers.len(), 5);
        assert_eq!(terms.containers[0], repo.term(Vocabulary::Collection));
        assert_eq!(terms.containers[4], repo.term(Vocabulary::PublicationIssue));
        assert_eq!(terms.part, repo.term(Vocabulary::Part));
        assert_eq!(terms.extracted_text, repo.term(Vocabulary::ExtractedText));
    }

    #[test]
    fn test_unmapped_container_aborts() {
        let repo = FakeRepository::with_vocabulary().without_term(Vocabulary::Newspaper);

        match resolve_terms(&repo) {
            Err(PlannerError::TermNotFound { uri }) => {
                assert_eq!(uri, "https://schema.org/Newspaper");
            }
            other => panic!("Expected TermNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_unmapped_extracted_text_aborts() {
        let repo = FakeRepository::with_vocabulary().without_term(Vocabulary::ExtractedText);
        assert!(matches!(
            resolve_terms(&repo),
            Err(PlannerError::TermNotFound { .. })
        ));
    }

    #[test]
    fn test_resolver_failure() {
        let repo = FakeRepository::with_vocabulary().failing_lookups();
        assert!(matches!(
            resolve_terms(&repo),
            Err(PlannerError::TermResolution { .. })
        ));
    }

    #[test]
    fn test_lookup_reports_missing_terms() {
        let repo = FakeRepository::with_vocabulary().without_term(Vocabulary::Book);
        let lookups = lookup_vocabulary(&repo).unwrap();

        assert_eq!(lookups.len(), Vocabulary::ALL.len());
        let book = lookups
            .iter()
            .find(|l| l.vocabulary == Vocabulary::Book)
            .unwrap();
        assert_eq!(book.term, None);
        assert!(lookups
            .iter()
            .filter(|l| l.vocabulary != Vocabulary::Book)
            .all(|l| l.term.is_some()));
    }

    #[test]
    fn test_unmapped_service_file_does_not_block() {
        let repo = FakeRepository::with_vocabulary().without_term(Vocabulary::ServiceFile);
        assert!(resolve_terms(&repo).is_ok());

        let lookups = lookup_vocabulary(&repo).unwrap();
        let service_file = lookups
            .iter()
            .find(|l| l.vocabulary == Vocabulary::ServiceFile)
            .unwrap();
        assert_eq!(service_file.term, None);
        assert!(!lookups.iter().any(TermLookup::blocks_submission));
    }

    #[test]
    fn test_unmapped_part_blocks() {
        let repo = FakeRepository::with_vocabulary().without_term(Vocabulary::Part);
        assert!(resolve_terms(&repo).is_err());

        let blocking: Vec<Vocabulary> = lookup_vocabulary(&repo)
            .unwrap()
            .into_iter()
            .filter(TermLookup::blocks_submission)
            .map(|l| l.vocabulary)
            .collect();
        assert_eq!(blocking, vec![Vocabulary::Part]);
    }
}
