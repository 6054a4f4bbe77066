//! Citation finders: notation-specific recognizers built on a common trait.
//!
//! A [`CitationFinder`] looks for citations, reference-list markers and
//! bibliography style markers in a document exposed through a
//! [`TextSource`]. Finders may also implement the reverse operations that
//! turn recognized items back into their textual notation.
//!
//! Each finder declares what it implements through
//! [`FinderCapabilities`]; the other operations return
//! [`FinderError::NotImplemented`].
//!
//! # Built-in finders
//!
//! - `natbib` - LaTeX/natbib commands (`\citet{jon90}`, `\bibliography`, ...)
//! - `plaintext` - author-year citations written as prose ("Jones et al. (1990)")
//!
//! # Example
//!
//! ```rust
//! use bibendum::finders::{CitationFinder, NatbibFinder, PlainTextSource};
//!
//! let finder = NatbibFinder::new();
//! let source = PlainTextSource::new(r"As shown by \citet{jon90}.");
//! let found = finder.find_citations(&source).unwrap();
//! assert_eq!(found[0].item.cite_ref(), &["jon90".to_string()]);
//! ```

pub mod mock;
mod natbib;
mod plaintext;
mod registry;
mod text_source;

pub use mock::MockTextSource;
pub use natbib::NatbibFinder;
pub use plaintext::PlainTextFinder;
pub use registry::{FinderCapabilities, FinderRegistry};
pub use text_source::{PlainTextSource, TextMatch, TextSource};

use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;

use crate::models::Citation;

/// Options attached to a reference-list marker; a bare option has no value
pub type ReflistOptions = BTreeMap<String, Option<String>>;

/// An item found in the text together with the character range it spans
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Located<T> {
    pub item: T,
    pub range: Range<usize>,
}

impl<T> Located<T> {
    pub fn new(item: T, range: Range<usize>) -> Self {
        Self { item, range }
    }
}

/// The CitationFinder trait defines the interface of every citation notation.
///
/// # Implementing a New Notation
///
/// 1. Create a struct holding its compiled patterns
/// 2. Implement `id`, `name` and `capabilities`
/// 3. Implement the operations listed in `capabilities`
/// 4. Add it to `FinderRegistry::new()` or register it dynamically
pub trait CitationFinder: Send + Sync + std::fmt::Debug {
    /// Unique identifier of the notation (e.g. "natbib")
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Operations this finder implements
    fn capabilities(&self) -> FinderCapabilities {
        FinderCapabilities::FIND_CITATIONS
    }

    fn supports(&self, capability: FinderCapabilities) -> bool {
        self.capabilities().contains(capability)
    }

    // ========== FIND METHODS ==========

    /// Citations in the text, last one first
    fn find_citations(
        &self,
        _source: &dyn TextSource,
    ) -> Result<Vec<Located<Citation>>, FinderError> {
        Err(FinderError::NotImplemented("find_citations"))
    }

    /// Reference-list markers with their options
    fn find_reflist(
        &self,
        _source: &dyn TextSource,
    ) -> Result<Vec<Located<ReflistOptions>>, FinderError> {
        Err(FinderError::NotImplemented("find_reflist"))
    }

    /// Bibliography style markers. Every marker is returned; which one wins
    /// is up to the caller.
    fn find_style_definition(
        &self,
        _source: &dyn TextSource,
    ) -> Result<Vec<Located<String>>, FinderError> {
        Err(FinderError::NotImplemented("find_style_definition"))
    }

    // ========== REVERT METHODS ==========

    /// Write a citation back in this notation
    fn revert_citation(&self, _citation: &Citation) -> Result<String, FinderError> {
        Err(FinderError::NotImplemented("revert_citation"))
    }

    fn revert_reflist(&self, _options: &ReflistOptions) -> Result<String, FinderError> {
        Err(FinderError::NotImplemented("revert_reflist"))
    }

    fn revert_style_definition(&self, _style: &str) -> Result<String, FinderError> {
        Err(FinderError::NotImplemented("revert_style_definition"))
    }
}

/// Errors that can occur when using a finder
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// The requested operation is not implemented by this finder
    #[error("Operation not implemented for this finder: {0}")]
    NotImplemented(&'static str),

    /// No finder with this id
    #[error("Not found: {0}")]
    NotFound(String),

    /// The citation cannot be written in this notation
    #[error("Invalid citation: {0}")]
    InvalidCitation(String),
}

/// Everything a finder recognized in one document
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub citations: Vec<Located<Citation>>,
    pub reflists: Vec<Located<ReflistOptions>>,
    pub styles: Vec<Located<String>>,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.citations.is_empty() && self.reflists.is_empty() && self.styles.is_empty()
    }
}

/// Run every find operation `finder` supports over `source`
pub fn scan_document(
    finder: &dyn CitationFinder,
    source: &dyn TextSource,
) -> Result<ScanReport, FinderError> {
    let mut report = ScanReport::default();

    if finder.supports(FinderCapabilities::FIND_CITATIONS) {
        report.citations = finder.find_citations(source)?;
    }
    if finder.supports(FinderCapabilities::FIND_REFLIST) {
        report.reflists = finder.find_reflist(source)?;
    }
    if finder.supports(FinderCapabilities::FIND_STYLE) {
        report.styles = finder.find_style_definition(source)?;
    }

    tracing::debug!(
        finder = finder.id(),
        citations = report.citations.len(),
        reflists = report.reflists.len(),
        styles = report.styles.len(),
        "Scanned document"
    );

    Ok(report)
}

/// Order found items last-first, the order edits must be applied in
fn sort_descending<T>(items: &mut [Located<T>]) {
    items.sort_by(|a, b| b.range.start.cmp(&a.range.start));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finder_capabilities() {
        let caps = FinderCapabilities::FIND_CITATIONS | FinderCapabilities::FIND_REFLIST;

        assert!(caps.contains(FinderCapabilities::FIND_CITATIONS));
        assert!(caps.contains(FinderCapabilities::FIND_REFLIST));
        assert!(!caps.contains(FinderCapabilities::REVERT_CITATIONS));
    }

    #[test]
    fn test_scan_skips_unsupported_operations() {
        let finder = PlainTextFinder::new();
        let source = PlainTextSource::new(r"Jones (1990) and \bibliography{a}");

        let report = scan_document(&finder, &source).unwrap();
        assert_eq!(report.citations.len(), 1);
        assert!(report.reflists.is_empty());
        assert!(report.styles.is_empty());
    }

    #[test]
    fn test_scan_natbib() {
        let finder = NatbibFinder::new();
        let source = PlainTextSource::new(
            "\\bibliographystyle{apa}\nSee \\citep{a} and \\citet{b}.\n\\bibliography",
        );

        let report = scan_document(&finder, &source).unwrap();
        assert_eq!(report.citations.len(), 2);
        assert_eq!(report.reflists.len(), 1);
        assert_eq!(report.styles[0].item, "apa");
        assert!(!report.is_empty());
    }

    #[test]
    fn test_sort_descending() {
        let mut items = vec![
            Located::new("a", 0..1),
            Located::new("c", 10..12),
            Located::new("b", 4..5),
        ];
        sort_descending(&mut items);
        let order: Vec<&str> = items.iter().map(|l| l.item).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }
}
