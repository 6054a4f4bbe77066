//! Bibliographic entries and reference key generation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use unicode_normalization::UnicodeNormalization;

use super::author::AuthorList;

const SUFFIXES: &str = "abcdefghijklmnopqrstuvwxyz";

/// Errors raised while deriving a reference key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("Entry has no author")]
    NoAuthor,

    #[error("Entry has no year")]
    NoYear,

    #[error("No disambiguation letter left after '{0}'")]
    SuffixExhausted(String),
}

/// An entry of the bibliographic store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// BibTeX entry type, e.g. "article"
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, rename = "author")]
    pub authors: AuthorList,

    #[serde(default)]
    pub year: Option<i32>,

    /// Remaining BibTeX fields
    #[serde(default)]
    pub fields: BTreeMap<String, String>,

    #[serde(default)]
    pub cite_ref: Option<String>,
}

impl Entry {
    pub fn new(authors: AuthorList, year: i32) -> Self {
        Self {
            authors,
            year: Some(year),
            ..Default::default()
        }
    }

    /// Derive a reference key from the first author and the year, e.g.
    /// `vangeek:2001`.
    ///
    /// When `previous` is a key this one collides with, the next
    /// disambiguation letter is appended: `a` after a key without letter,
    /// `c` after one ending in `b`.
    pub fn make_cite_ref(&self, previous: Option<&str>) -> Result<String, EntryError> {
        let author = self.authors.first().ok_or(EntryError::NoAuthor)?;
        let year = self.year.ok_or(EntryError::NoYear)?;

        let base = ascii_key(&format!("{}{}", author.prefix, author.surname));
        let key = format!("{}:{}", base, year);

        let Some(previous) = previous else {
            return Ok(key);
        };

        let next = match previous.chars().last().and_then(|c| SUFFIXES.find(c)) {
            Some(pos) => pos + 1,
            None => 0,
        };
        let suffix = SUFFIXES
            .chars()
            .nth(next)
            .ok_or_else(|| EntryError::SuffixExhausted(previous.to_string()))?;

        Ok(format!("{}{}", key, suffix))
    }
}

/// Lowercase ASCII with accents folded away and whitespace removed
fn ascii_key(name: &str) -> String {
    name.nfkd()
        .filter(|c| c.is_ascii() && !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}
