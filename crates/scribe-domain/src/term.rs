//! Term module - local taxonomy ids and the per-submission term mapping

use std::fmt;

/// Identifier of a local taxonomy term (the host's `tid`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(u64);

impl TermId {
    /// Wrap a raw term id
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Term ids resolved for one submission
///
/// Built at the start of a submission and dropped with it. Term ids belong to
/// the host system, so this mapping is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTerms {
    /// Ids of the container models, in `Vocabulary::CONTAINERS` order
    pub containers: Vec<TermId>,

    /// Id of the Part model
    pub part: TermId,

    /// Id of the Extracted Text media use
    pub extracted_text: TermId,
}
