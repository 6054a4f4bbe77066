//! Citation descriptors produced by the citation finders.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::entry::Entry;
use super::text::StyledText;

/// Errors raised when reading or overwriting citation properties
#[derive(Debug, thiserror::Error)]
pub enum CitationError {
    /// Only the properties a citation is created with can be set
    #[error("Unknown citation property: {0}")]
    UnknownField(String),

    /// A property value has the wrong shape
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// How a citation is rendered.
///
/// | Kind            | Author-year                  | Numerical              |
/// |-----------------|------------------------------|------------------------|
/// | `Textual`       | van de Geek et al. (2001)    | van de Geek et al. [1] |
/// | `Parenthetical` | (van de Geek et al., 2001)   | [1]                    |
/// | `Inline`        | van de Geek et al., 2001     | 1                      |
/// | `YearOnly`      | 2001                         | 2001                   |
/// | `AuthorOnly`    | van de Geek et al.           | van de Geek et al.     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CiteKind {
    Textual,
    Parenthetical,
    Inline,
    YearOnly,
    AuthorOnly,
}

impl CiteKind {
    /// Single-letter code used in stored citation types
    pub fn code(&self) -> char {
        match self {
            CiteKind::Textual => 't',
            CiteKind::Parenthetical => 'p',
            CiteKind::Inline => 'i',
            CiteKind::YearOnly => 'y',
            CiteKind::AuthorOnly => 'a',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            't' => Some(CiteKind::Textual),
            'p' => Some(CiteKind::Parenthetical),
            'i' => Some(CiteKind::Inline),
            'y' => Some(CiteKind::YearOnly),
            'a' => Some(CiteKind::AuthorOnly),
            _ => None,
        }
    }
}

/// A citation kind plus its two rendering modifiers.
///
/// `capitalize` forces an upper-case first letter ("Van de Geek et al.
/// (2001)"), `expand_authors` lists every author instead of "et al.". Both
/// are always false for [`CiteKind::YearOnly`].
///
/// The stored form is the historic one-token code: the kind letter,
/// upper-cased when capitalized, followed by `*` when expanded (`t`, `P*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CitationStyle {
    kind: CiteKind,
    capitalize: bool,
    expand_authors: bool,
}

impl CitationStyle {
    pub fn new(kind: CiteKind, capitalize: bool, expand_authors: bool) -> Self {
        if kind == CiteKind::YearOnly {
            return Self::plain(kind);
        }
        Self {
            kind,
            capitalize,
            expand_authors,
        }
    }

    /// Kind with no modifier
    pub fn plain(kind: CiteKind) -> Self {
        Self {
            kind,
            capitalize: false,
            expand_authors: false,
        }
    }

    pub fn kind(&self) -> CiteKind {
        self.kind
    }

    pub fn capitalize(&self) -> bool {
        self.capitalize
    }

    pub fn expand_authors(&self) -> bool {
        self.expand_authors
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.kind.code();
        if self.capitalize {
            write!(f, "{}", code.to_ascii_uppercase())?;
        } else {
            write!(f, "{}", code)?;
        }
        if self.expand_authors {
            f.write_str("*")?;
        }
        Ok(())
    }
}

impl FromStr for CitationStyle {
    type Err = CitationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CitationError::InvalidValue {
            field: "type".to_string(),
            message: format!("'{}' is not a citation type", s),
        };

        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let kind = CiteKind::from_code(letter).ok_or_else(invalid)?;
        let expand_authors = match chars.as_str() {
            "" => false,
            "*" => true,
            _ => return Err(invalid()),
        };

        Ok(Self::new(kind, letter.is_ascii_uppercase(), expand_authors))
    }
}

impl TryFrom<String> for CitationStyle {
    type Error = CitationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CitationStyle> for String {
    fn from(style: CitationStyle) -> Self {
        style.to_string()
    }
}

/// How the bibliographic store should be searched for a citation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "search_type")]
pub enum SearchSpec {
    /// Exact lookup by reference key
    #[serde(rename = "ref")]
    Ref,

    /// Free-text search, e.g. "Jones, Smith, 1990"
    #[serde(rename = "string")]
    Text {
        search_string: String,

        /// "et al" was dropped from the author list
        #[serde(default)]
        et_al: bool,
    },
}

impl SearchSpec {
    pub fn text(query: impl Into<String>) -> Self {
        SearchSpec::Text {
            search_string: query.into(),
            et_al: false,
        }
    }

    /// The free-text query, if any
    pub fn query(&self) -> Option<&str> {
        match self {
            SearchSpec::Ref => None,
            SearchSpec::Text { search_string, .. } => Some(search_string),
        }
    }
}

/// One citation found in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Reference keys into the bibliographic store, e.g. `["vangeek:2001"]`.
    /// Empty until resolved for citations recognized from prose.
    #[serde(default)]
    cite_ref: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<StyledText>,

    #[serde(rename = "type")]
    style: CitationStyle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    search: Option<SearchSpec>,

    /// Resolved entries, one per key once looked up
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    entries: Vec<Entry>,
}

impl Citation {
    /// Known property names, in stored order
    pub const FIELDS: [&'static str; 5] = ["cite_ref", "text", "type", "search", "entries"];

    pub fn new(style: CitationStyle) -> Self {
        Self {
            cite_ref: Vec::new(),
            text: None,
            style,
            search: None,
            entries: Vec::new(),
        }
    }

    /// Set the reference keys, trimming each and dropping blanks
    pub fn with_refs<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_refs(refs);
        self
    }

    pub fn with_text(mut self, text: StyledText) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_search(mut self, search: SearchSpec) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_entries(mut self, entries: Vec<Entry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn cite_ref(&self) -> &[String] {
        &self.cite_ref
    }

    pub fn text(&self) -> Option<&StyledText> {
        self.text.as_ref()
    }

    pub fn style(&self) -> CitationStyle {
        self.style
    }

    pub fn search(&self) -> Option<&SearchSpec> {
        self.search.as_ref()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn set_refs<I, S>(&mut self, refs: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cite_ref = refs
            .into_iter()
            .map(|r| r.as_ref().trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
    }

    pub fn set_text(&mut self, text: Option<StyledText>) {
        self.text = text;
    }

    pub fn set_style(&mut self, style: CitationStyle) {
        self.style = style;
    }

    pub fn set_search(&mut self, search: Option<SearchSpec>) {
        self.search = search;
    }

    pub fn set_entries(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
    }

    /// Overwrite one property by name. Only [`Citation::FIELDS`] are accepted.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), CitationError> {
        match key {
            "cite_ref" => {
                let refs: Vec<String> = parse_value(key, value)?;
                self.set_refs(refs);
            }
            "text" => self.text = parse_value(key, value)?,
            "type" => self.style = parse_value(key, value)?,
            "search" => self.search = parse_value(key, value)?,
            "entries" => self.entries = parse_value(key, value)?,
            other => return Err(CitationError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Property map, as stored in document fields
    pub fn to_properties(&self) -> BTreeMap<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        }
    }

    /// Rebuild from a property map. Unrelated properties are ignored.
    pub fn from_properties(properties: &BTreeMap<String, Value>) -> Result<Self, CitationError> {
        let object: serde_json::Map<String, Value> = properties
            .iter()
            .filter(|(k, _)| Self::FIELDS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        serde_json::from_value(Value::Object(object)).map_err(|e| CitationError::InvalidValue {
            field: "citation".to_string(),
            message: e.to_string(),
        })
    }
}

fn parse_value<T: serde::de::DeserializeOwned>(
    field: &str,
    value: Value,
) -> Result<T, CitationError> {
    serde_json::from_value(value).map_err(|e| CitationError::InvalidValue {
        field: field.to_string(),
        message: e.to_string(),
    })
}
