//! Integration tests for Bibendum
//!
//! These tests drive the public API the way an editor add-on does: scan a
//! document, describe the citations, store them as fields and read them back.

use bibendum::fields::{FieldCodec, FieldError};
use bibendum::finders::{
    scan_document, CitationFinder, FinderCapabilities, FinderRegistry, PlainTextSource,
};
use bibendum::models::{
    Author, AuthorList, Citation, CiteKind, Entry, SearchSpec, Style, StyledText,
};

const LATEX_DOCUMENT: &str = r"\documentclass{article}
\bibliographystyle{apalike}
\begin{document}
As \Citet*{vandegeek:2001} showed, results vary \citep{jon90, smith:2005}.
This was known since \citeyear{jon90} (see \citealp{smith:2005}).
\citeauthor{jon90} disagreed.
\bibliography{sort=year, compact}
\end{document}
";

const PROSE_DOCUMENT: &str = "Earlier work (Jones et al., 1990) was extended by \
Jones and Smith (1992), then by Van Geek, Baker, and Williams (2001a).";

#[test]
fn test_registry_lists_builtin_finders() {
    let registry = FinderRegistry::new();
    assert_eq!(registry.ids(), vec!["natbib", "plaintext"]);

    for finder in registry.all() {
        assert!(finder.supports(FinderCapabilities::FIND_CITATIONS));
        assert!(!finder.name().is_empty());
    }
}

#[test]
fn test_scan_latex_document() {
    let registry = FinderRegistry::new();
    let finder = registry.get_required("natbib").unwrap();
    let report = scan_document(finder.as_ref(), &PlainTextSource::new(LATEX_DOCUMENT)).unwrap();

    let codes: Vec<String> = report
        .citations
        .iter()
        .map(|c| c.item.style().to_string())
        .collect();
    assert_eq!(codes, vec!["a", "i", "y", "p", "T*"]);

    let starts: Vec<usize> = report.citations.iter().map(|c| c.range.start).collect();
    assert!(starts.windows(2).all(|w| w[0] > w[1]));

    let citep = &report.citations[3].item;
    assert_eq!(citep.cite_ref(), &["jon90".to_string(), "smith:2005".to_string()]);
    assert!(report
        .citations
        .iter()
        .all(|c| c.item.search() == Some(&SearchSpec::Ref)));

    assert_eq!(report.reflists.len(), 1);
    assert_eq!(report.reflists[0].item.get("sort"), Some(&Some("year".to_string())));
    assert_eq!(report.reflists[0].item.get("compact"), Some(&None));

    assert_eq!(report.styles.len(), 1);
    assert_eq!(report.styles[0].item, "apalike");
}

#[test]
fn test_ranges_select_citation_text() {
    let finder = FinderRegistry::new();
    let finder = finder.get_required("natbib").unwrap();
    let found = finder
        .find_citations(&PlainTextSource::new(LATEX_DOCUMENT))
        .unwrap();

    let chars: Vec<char> = LATEX_DOCUMENT.chars().collect();
    for citation in &found {
        let text: String = chars[citation.range.clone()].iter().collect();
        assert_eq!(finder.revert_citation(&citation.item).unwrap(), text);
    }
}

#[test]
fn test_replace_citations_back_to_front() {
    let registry = FinderRegistry::new();
    let finder = registry.get_required("natbib").unwrap();
    let codec = FieldCodec::default();

    let found = finder
        .find_citations(&PlainTextSource::new(LATEX_DOCUMENT))
        .unwrap();

    // Ranges are in characters; the document is ASCII so they match bytes
    let mut document = LATEX_DOCUMENT.to_string();
    for (index, citation) in found.iter().enumerate() {
        let name = codec.encode_citation(index, &citation.item).unwrap();
        document.replace_range(citation.range.clone(), &format!("[{}]", name));
    }

    assert!(!document.contains(r"\cite"));
    assert!(!document.contains(r"\Cite"));

    let names: Vec<&str> = document
        .split(|c: char| c == '[' || c == ']')
        .filter(|part| codec.is_field(part))
        .collect();
    assert_eq!(names.len(), found.len());

    for name in names {
        let (index, citation) = codec.decode_citation(name).unwrap().unwrap();
        assert_eq!(citation, found[index].item);
    }
}

#[test]
fn test_scan_prose_document() {
    let registry = FinderRegistry::new();
    let finder = registry.get_required("plaintext").unwrap();
    let report = scan_document(finder.as_ref(), &PlainTextSource::new(PROSE_DOCUMENT)).unwrap();

    assert!(report.reflists.is_empty());
    assert_eq!(report.citations.len(), 3);

    let searches: Vec<(CiteKind, &str)> = report
        .citations
        .iter()
        .map(|c| (c.item.style().kind(), c.item.search().and_then(SearchSpec::query).unwrap()))
        .collect();
    assert_eq!(
        searches,
        vec![
            (CiteKind::Textual, "Van Geek, Baker, Williams, 2001"),
            (CiteKind::Textual, "Jones, Smith, 1992"),
            (CiteKind::Parenthetical, "Jones, 1990"),
        ]
    );

    let van_geek = report.citations[0].item.style();
    assert!(van_geek.capitalize());
    assert!(van_geek.expand_authors());
}

#[test]
fn test_resolve_prose_citation_and_store_it() {
    let finder = FinderRegistry::new();
    let finder = finder.get_required("plaintext").unwrap();
    let found = finder
        .find_citations(&PlainTextSource::new("As argued by Jones (1990)."))
        .unwrap();
    assert_eq!(found.len(), 1);

    let mut citation: Citation = found[0].item.clone();
    assert!(citation.cite_ref().is_empty());

    // The store resolves the search to an entry, whose key is then recorded
    let authors = AuthorList::from_db_string("Peter | P | Jones | ");
    let entry = Entry::new(authors, 1990);
    let key = entry.make_cite_ref(None).unwrap();
    assert_eq!(key, "jones:1990");
    citation
        .set("cite_ref", serde_json::json!([key]))
        .unwrap();

    let mut rendered = StyledText::from_styled("Jones", Style::new().italics(true));
    rendered.append("(1990)", None, " ");
    citation.set_text(Some(rendered.reduced()));
    citation.set_entries(vec![entry.clone()]);

    let codec = FieldCodec::new("REF");
    let name = codec.encode_citation(0, &citation).unwrap();
    let (_, decoded) = codec.decode_citation(&name).unwrap().unwrap();

    assert_eq!(decoded.cite_ref(), &["jones:1990".to_string()]);
    assert_eq!(
        decoded.text().map(StyledText::plain_text),
        Some("Jones (1990)".to_string())
    );
    assert_eq!(decoded.search().and_then(SearchSpec::query), Some("Jones, 1990"));
    assert_eq!(decoded.entries(), &[entry]);
}

#[test]
fn test_field_errors_are_distinct() {
    let codec = FieldCodec::default();
    assert!(codec.decode_citation("Figure_1").unwrap().is_none());
    assert!(matches!(
        codec.decode_citation("bibendum_4_%%%"),
        Err(FieldError::Corrupted { .. })
    ));
}

#[test]
fn test_cite_ref_collisions() {
    let authors: AuthorList = vec![Author::new("Hans", "H", "Geek", "van de")].into();
    let entry = Entry::new(authors, 2001);

    let first = entry.make_cite_ref(None).unwrap();
    let second = entry.make_cite_ref(Some(&first)).unwrap();
    let third = entry.make_cite_ref(Some(&second)).unwrap();

    assert_eq!(first, "vandegeek:2001");
    assert_eq!(second, "vandegeek:2001a");
    assert_eq!(third, "vandegeek:2001b");
}
