//! Author-year citations written as prose.
//!
//! Recognizes "Jones (1990)", "(Jones et al., 1990)", "Jones, Baker and
//! Williams 1990a" and the like. The citation kind is guessed from the
//! parentheses and commas, and each candidate gets a free-text search
//! ("Jones, Baker, Williams, 1990") to resolve it against the store.

use regex::Regex;

use super::text_source::{TextMatch, TextSource};
use super::{sort_descending, CitationFinder, FinderCapabilities, FinderError, Located};
use crate::models::{Citation, CitationStyle, CiteKind, SearchSpec, StyledText};

/// Accented letters accepted in surnames
pub const LOWERCASE: &str = "çéáíóúýèàìòùỳêâîôûŷëäïöüÿẽãĩõũỹñøɨħåů";
pub const UPPERCASE: &str = "ÇÉÁÍÓÚÝÈÀÌÒÙỲÊÂÎÔÛŶËÄÏÖÜŸẼÃĨÕŨỸÑØƗĦÅŮ";

const PARTICLES: [&str; 5] = ["Van ", "De ", "Von ", "Del ", "Della "];

/// Finder for prose citations. Only finds citations; it cannot write them back.
#[derive(Debug, Clone)]
pub struct PlainTextFinder {
    citation: Regex,
    year: Regex,
    date: Regex,
    commas: Regex,
}

impl PlainTextFinder {
    pub fn new() -> Self {
        let author = format!(
            "(?:[vV]an |[vV]on |[dD]e |[dD]e la |[dD]el |[dD]ella )?(?:Mc)?[A-Z{}][a-z{}-]+",
            UPPERCASE, LOWERCASE
        );
        let author_block = format!(
            r"{a}(?:,? +(?:et al\.?)?|(?:, +{a})?,? +(?:&|and) +{a})?",
            a = author
        );
        let date = "[1-3][0-9]{3}[a-z]?";
        let date_list = format!("{d}(?:, +{d})*", d = date);
        let date_block = format!(r"(?:{dl}|\({dl}\))", dl = date_list);
        let citation = format!(r"\(?{},? {}\)?", author_block, date_block);

        Self {
            citation: compile(&citation),
            year: compile(r"([1-3][0-9]{3})[a-z]?"),
            date: compile(date),
            commas: compile(r"\s*,[\s,]*"),
        }
    }

    /// Build the citation for one candidate, or `None` when no year can be read
    fn parse_candidate(&self, m: &TextMatch) -> Option<Citation> {
        let text = m.text.trim();
        let style = classify(text);

        let body = text.trim_matches(|c: char| c == '(' || c == ')');
        let Some(year) = self.year.captures(body).and_then(|c| c.get(1)) else {
            tracing::debug!(text = %m.text, "Dropping citation candidate without year");
            return None;
        };
        let year = year.as_str();

        let mut authors = match self.date.find(body) {
            Some(date) => body.replacen(date.as_str(), "", 1),
            None => body.to_string(),
        };
        authors.retain(|c| c != '(' && c != ')');

        let mut authors = authors.trim_matches(&[',', '.', ' '][..]).to_string();
        let et_al = authors.ends_with("et al");
        if et_al {
            authors.truncate(authors.len() - "et al".len());
        }
        let authors = authors
            .trim_matches(&[',', '.', ' '][..])
            .replace(" and ", ", ")
            .replace(" & ", ", ");
        let authors = self.commas.replace_all(&authors, ", ");

        let search = SearchSpec::Text {
            search_string: format!("{}, {}", authors, year),
            et_al,
        };

        Some(
            Citation::new(style)
                .with_text(StyledText::from_text(text))
                .with_search(search),
        )
    }
}

impl Default for PlainTextFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl CitationFinder for PlainTextFinder {
    fn id(&self) -> &str {
        "plaintext"
    }

    fn name(&self) -> &str {
        "author-year prose"
    }

    fn capabilities(&self) -> FinderCapabilities {
        FinderCapabilities::FIND_CITATIONS
    }

    /// The citations have no reference key; they carry a free-text search
    /// instead.
    fn find_citations(
        &self,
        source: &dyn TextSource,
    ) -> Result<Vec<Located<Citation>>, FinderError> {
        let mut citations: Vec<_> = source
            .find_regex(&self.citation)
            .into_iter()
            .filter_map(|m| {
                let citation = self.parse_candidate(&m)?;
                Some(Located::new(citation, m.range))
            })
            .collect();
        sort_descending(&mut citations);

        tracing::debug!(count = citations.len(), "prose citations found");
        Ok(citations)
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("prose citation patterns are valid")
}

/// Guess the citation kind from its parentheses and commas
fn classify(text: &str) -> CitationStyle {
    let commas = text.matches(',').count();

    let (kind, expand) = if text.starts_with('(') && text.ends_with(')') {
        (CiteKind::Parenthetical, commas > 1)
    } else if let (Some(open), true) = (text.find('('), text.contains(')')) {
        (CiteKind::Textual, text[..open].contains(','))
    } else {
        (CiteKind::Inline, commas > 1)
    };

    let body = text.trim_start_matches('(');
    let capitalize = PARTICLES.iter().any(|p| body.starts_with(p));

    CitationStyle::new(kind, capitalize, expand)
}
