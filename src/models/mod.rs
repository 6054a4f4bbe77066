//! Core data models: styled text, citations, authors and entries.

mod author;
mod citation;
mod entry;
mod style;
mod text;

pub use author::{Author, AuthorList};
pub use citation::{Citation, CitationError, CitationStyle, CiteKind, SearchSpec};
pub use entry::{Entry, EntryError};
pub use style::{Color, Style, TextCase};
pub use text::{Run, StyledText, TextError, TextInput};
