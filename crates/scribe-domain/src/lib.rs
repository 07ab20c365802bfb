//! Scribe Domain Layer
//!
//! This crate contains the core model shared by every Scribe crate. It has
//! ZERO external dependencies and defines the fundamental concepts, value
//! objects, and trait interfaces that the storage, batch, and planner layers
//! depend upon.
//!
//! ## Key Concepts
//!
//! - **Node**: An addressable repository item with a model tag and parents
//! - **Container**: A node whose model is collection-like (Collection, Book, ...)
//! - **Part**: A leaf node (a page) eligible for text extraction
//! - **Term**: A local taxonomy id resolved from a stable vocabulary URI
//! - **Extracted text derivative**: A media link marking OCR output as present
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Infrastructure implementations live in other crates
//! - Trait definitions for every external collaborator (term lookup, queries,
//!   entity loading, actions, operator messages)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod node;
pub mod term;
pub mod traits;
pub mod vocabulary;

// Re-exports for convenience
pub use node::{Node, NodeId, NodeRow, ServiceFile};
pub use term::{ResolvedTerms, TermId};
pub use vocabulary::Vocabulary;
