//! # Bibendum
//!
//! Citation handling for documents: finds citations written in LaTeX/natbib
//! commands or author-year prose, describes them, and stores their properties
//! in field names a host document can carry.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (StyledText, Citation, Author, Entry)
//! - [`finders`]: Citation finders with an extensible trait-based architecture
//! - [`fields`]: Field-name encoding of citation properties
//! - [`config`]: Configuration management

pub mod config;
pub mod fields;
pub mod finders;
pub mod models;

// Re-export commonly used types
pub use fields::{FieldCodec, FieldError, Properties};
pub use finders::{CitationFinder, FinderRegistry, PlainTextSource, TextSource};
pub use models::{Citation, CitationStyle, CiteKind, SearchSpec, StyledText};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
