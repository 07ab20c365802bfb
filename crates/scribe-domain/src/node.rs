//! Node module - repository items and the rows queries return for them

use crate::TermId;
use std::fmt;

/// Identifier of a repository node (the host's `nid`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw node id
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Parse a node id from operator input
    ///
    /// Accepts a bare id (`"42"`) or the autocomplete label form
    /// (`"Harbor Photographs (42)"`), where the id is the trailing
    /// parenthesised number.
    ///
    /// # Examples
    ///
    /// ```
    /// use scribe_domain::NodeId;
    ///
    /// assert_eq!(NodeId::parse("42").unwrap().value(), 42);
    /// assert_eq!(NodeId::parse("Harbor Photographs (42)").unwrap().value(), 42);
    /// assert!(NodeId::parse("Harbor Photographs").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();

        let digits = match trimmed.strip_suffix(')') {
            Some(rest) => match rest.rfind('(') {
                Some(open) => &rest[open + 1..],
                None => return Err(format!("Invalid node reference: {}", input)),
            },
            None => trimmed,
        };

        digits
            .trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| format!("Invalid node reference: {}", input))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A typed result row from a node query
///
/// Queries that return full rows hand these back instead of untyped maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeRow {
    /// Node identifier
    pub nid: NodeId,
}

/// The service-level file attached to a node
///
/// This is the source image that text extraction reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFile {
    /// Media entity id carrying the file
    pub media_id: u64,

    /// File location (e.g. `fedora://2024-03/page-001.jp2`)
    pub uri: String,

    /// MIME type of the file
    pub mime_type: String,
}

/// A fully loaded repository node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node identifier
    pub id: NodeId,

    /// Stable UUID of the node
    pub uuid: String,

    /// Content type (bundle), e.g. `islandora_object`
    pub bundle: String,

    /// Human-readable title
    pub title: String,

    /// Model classification term, if tagged
    pub model: Option<TermId>,

    /// Parent containers (`field_member_of`)
    pub member_of: Vec<NodeId>,

    /// Service file media, if one is attached
    pub service_file: Option<ServiceFile>,
}

impl Node {
    /// Format as the autocomplete label `Title (nid)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.title, self.id)
    }
}
