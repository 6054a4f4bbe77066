//! natbib-style LaTeX citation commands.
//!
//! Recognized commands:
//!
//! | Command                | Kind          |
//! |------------------------|---------------|
//! | `\citet{..}`           | textual       |
//! | `\citep{..}`           | parenthetical |
//! | `\citealt{..}`         | inline        |
//! | `\citealp{..}`         | inline        |
//! | `\citeauthor{..}`      | author only   |
//! | `\citeyear{..}`        | year only     |
//!
//! A capital `C` (`\Citet`) capitalizes the first letter, a star (`\citep*`)
//! lists all authors. Both are ignored for `\citeyear`.
//!
//! Optional arguments (`\citep[e.g.]{smith:2005}`), bare `\cite` and the
//! `*alias` commands are not recognized; such commands are left alone.
//!
//! The reference list is marked by `\bibliography`, which may carry options:
//! `\bibliography{option1=value1, option2}`. The style is set by
//! `\bibliographystyle{name}`.

use regex::Regex;

use super::text_source::{TextMatch, TextSource};
use super::{
    sort_descending, CitationFinder, FinderCapabilities, FinderError, Located, ReflistOptions,
};
use crate::models::{Citation, CitationStyle, CiteKind, SearchSpec};

const CITE: &str = r"\\([cC])ite((?:al)?)([tp])(\*?)\{([^}]*)\}";
const CITE_AUTHOR: &str = r"\\([cC])iteauthor(\*?)\{([^}]*)\}";
const CITE_YEAR: &str = r"\\[cC]iteyear\{([^}]*)\}";
const REFLIST: &str = r"\\bibliography(?:\{([^}]*)\}|\b)";
const STYLE: &str = r"\\bibliographystyle\{([^}]*)\}";

/// Finder for natbib commands
#[derive(Debug, Clone)]
pub struct NatbibFinder {
    cite: Regex,
    cite_author: Regex,
    cite_year: Regex,
    reflist: Regex,
    style: Regex,
}

impl NatbibFinder {
    pub fn new() -> Self {
        Self {
            cite: compile(CITE),
            cite_author: compile(CITE_AUTHOR),
            cite_year: compile(CITE_YEAR),
            reflist: compile(REFLIST),
            style: compile(STYLE),
        }
    }

    /// `\cite{t,p}` and `\citeal{t,p}`
    fn cite_commands(&self, source: &dyn TextSource) -> Vec<Located<Citation>> {
        source
            .find_regex(&self.cite)
            .into_iter()
            .filter_map(|m| {
                let capitalize = m.group(1) == Some("C");
                // group 3 is always `t` or `p`
                let kind = if m.group(2) == Some("al") {
                    CiteKind::Inline
                } else if m.group(3) == Some("t") {
                    CiteKind::Textual
                } else {
                    CiteKind::Parenthetical
                };
                let expand = m.group(4) == Some("*");
                ref_citation(&m, 5, CitationStyle::new(kind, capitalize, expand))
            })
            .collect()
    }

    fn author_commands(&self, source: &dyn TextSource) -> Vec<Located<Citation>> {
        source
            .find_regex(&self.cite_author)
            .into_iter()
            .filter_map(|m| {
                let style = CitationStyle::new(
                    CiteKind::AuthorOnly,
                    m.group(1) == Some("C"),
                    m.group(2) == Some("*"),
                );
                ref_citation(&m, 3, style)
            })
            .collect()
    }

    fn year_commands(&self, source: &dyn TextSource) -> Vec<Located<Citation>> {
        source
            .find_regex(&self.cite_year)
            .into_iter()
            .filter_map(|m| ref_citation(&m, 1, CitationStyle::plain(CiteKind::YearOnly)))
            .collect()
    }
}

impl Default for NatbibFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl CitationFinder for NatbibFinder {
    fn id(&self) -> &str {
        "natbib"
    }

    fn name(&self) -> &str {
        "natbib commands"
    }

    fn capabilities(&self) -> FinderCapabilities {
        FinderCapabilities::all()
    }

    /// `\citealt` and `\citealp` both map to [`CiteKind::Inline`].
    fn find_citations(
        &self,
        source: &dyn TextSource,
    ) -> Result<Vec<Located<Citation>>, FinderError> {
        let mut citations = self.cite_commands(source);
        citations.extend(self.author_commands(source));
        citations.extend(self.year_commands(source));
        sort_descending(&mut citations);

        tracing::debug!(count = citations.len(), "natbib citations found");
        Ok(citations)
    }

    fn find_reflist(
        &self,
        source: &dyn TextSource,
    ) -> Result<Vec<Located<ReflistOptions>>, FinderError> {
        let reflists: Vec<_> = source
            .find_regex(&self.reflist)
            .into_iter()
            .map(|m| {
                let options = m.group(1).map(parse_options).unwrap_or_default();
                Located::new(options, m.range)
            })
            .collect();

        tracing::debug!(count = reflists.len(), "natbib reference lists found");
        Ok(reflists)
    }

    fn find_style_definition(
        &self,
        source: &dyn TextSource,
    ) -> Result<Vec<Located<String>>, FinderError> {
        Ok(source
            .find_regex(&self.style)
            .into_iter()
            .filter_map(|m| {
                let name = m.group(1)?.trim().to_string();
                Some(Located::new(name, m.range))
            })
            .collect())
    }

    fn revert_citation(&self, citation: &Citation) -> Result<String, FinderError> {
        if citation.cite_ref().is_empty() {
            return Err(FinderError::InvalidCitation(
                "citation has no reference key".to_string(),
            ));
        }

        let style = citation.style();
        let command = match style.kind() {
            CiteKind::Textual => "itet",
            CiteKind::Parenthetical => "itep",
            CiteKind::Inline => "itealp",
            CiteKind::AuthorOnly => "iteauthor",
            CiteKind::YearOnly => "iteyear",
        };
        let c = if style.capitalize() { 'C' } else { 'c' };
        let star = if style.expand_authors() { "*" } else { "" };

        Ok(format!(
            "\\{}{}{}{{{}}}",
            c,
            command,
            star,
            citation.cite_ref().join(", ")
        ))
    }

    fn revert_reflist(&self, options: &ReflistOptions) -> Result<String, FinderError> {
        if options.is_empty() {
            return Ok("\\bibliography".to_string());
        }

        let rendered: Vec<String> = options
            .iter()
            .map(|(key, value)| match value {
                Some(value) => format!("{}={}", key, value),
                None => key.clone(),
            })
            .collect();

        Ok(format!("\\bibliography{{{}}}", rendered.join(", ")))
    }

    fn revert_style_definition(&self, style: &str) -> Result<String, FinderError> {
        Ok(format!("\\bibliographystyle{{{}}}", style.trim()))
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("natbib patterns are valid")
}

/// Citation looked up by the comma-separated keys in group `keys_group`.
/// Commands with no key are skipped.
fn ref_citation(
    m: &TextMatch,
    keys_group: usize,
    style: CitationStyle,
) -> Option<Located<Citation>> {
    let citation = Citation::new(style)
        .with_refs(m.group(keys_group)?.split(','))
        .with_search(SearchSpec::Ref);

    if citation.cite_ref().is_empty() {
        tracing::debug!(text = %m.text, "Skipping citation command without key");
        return None;
    }
    Some(Located::new(citation, m.range.clone()))
}

/// `a=1, b` -> `{a: "1", b: None}`; keys and values are trimmed
fn parse_options(body: &str) -> ReflistOptions {
    body.split(',')
        .filter_map(|option| {
            let mut parts = option.splitn(2, '=');
            let key = parts.next()?.trim();
            if key.is_empty() {
                return None;
            }
            let value = parts.next().map(|v| v.trim().to_string());
            Some((key.to_string(), value))
        })
        .collect()
}
