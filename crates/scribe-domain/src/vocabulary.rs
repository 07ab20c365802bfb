//! Vocabulary module - the fixed external URIs Scribe classifies nodes by

/// A well-known vocabulary concept
///
/// Each concept is identified by a stable external URI. Local term ids for
/// these URIs are resolved per submission, never hard-coded.
///
/// - Containers: Collection, CompoundObject, Newspaper, Book, PublicationIssue
/// - Part: the page model eligible for extraction
/// - ExtractedText / ServiceFile: media use classifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Vocabulary {
    /// DCMI Collection
    Collection,

    /// Getty AAT compound object
    CompoundObject,

    /// schema.org Newspaper
    Newspaper,

    /// schema.org Book
    Book,

    /// schema.org PublicationIssue
    PublicationIssue,

    /// BIBFRAME part (a page)
    Part,

    /// PCDM use: extracted text (OCR output)
    ExtractedText,

    /// PCDM use: service file (extraction source)
    ServiceFile,
}

impl Vocabulary {
    /// The closed set of container models walked during expansion
    pub const CONTAINERS: [Vocabulary; 5] = [
        Vocabulary::Collection,
        Vocabulary::CompoundObject,
        Vocabulary::Newspaper,
        Vocabulary::Book,
        Vocabulary::PublicationIssue,
    ];

    /// Every concept, in resolution order
    pub const ALL: [Vocabulary; 8] = [
        Vocabulary::Collection,
        Vocabulary::CompoundObject,
        Vocabulary::Newspaper,
        Vocabulary::Book,
        Vocabulary::PublicationIssue,
        Vocabulary::Part,
        Vocabulary::ExtractedText,
        Vocabulary::ServiceFile,
    ];

    /// Get the external URI for this concept
    pub fn uri(&self) -> &'static str {
        match self {
            Vocabulary::Collection => "http://purl.org/dc/dcmitype/Collection",
            Vocabulary::CompoundObject => "http://vocab.getty.edu/aat/300242735",
            Vocabulary::Newspaper => "https://schema.org/Newspaper",
            Vocabulary::Book => "https://schema.org/Book",
            Vocabulary::PublicationIssue => "https://schema.org/PublicationIssue",
            Vocabulary::Part => "http://id.loc.gov/ontologies/bibframe/part",
            Vocabulary::ExtractedText => "http://pcdm.org/use#ExtractedText",
            Vocabulary::ServiceFile => "http://pcdm.org/use#ServiceFile",
        }
    }

    /// Get a short display label
    pub fn label(&self) -> &'static str {
        match self {
            Vocabulary::Collection => "Collection",
            Vocabulary::CompoundObject => "Compound Object",
            Vocabulary::Newspaper => "Newspaper",
            Vocabulary::Book => "Book",
            Vocabulary::PublicationIssue => "Publication Issue",
            Vocabulary::Part => "Page",
            Vocabulary::ExtractedText => "Extracted Text",
            Vocabulary::ServiceFile => "Service File",
        }
    }

    /// Whether nodes with this model can have members walked
    pub fn is_container(&self) -> bool {
        Self::CONTAINERS.contains(self)
    }
}
