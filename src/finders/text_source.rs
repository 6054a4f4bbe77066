//! Text sources the finders run their patterns against.

use regex::Regex;
use std::ops::Range;

/// One pattern match reported by a [`TextSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    /// The matched text
    pub text: String,

    /// Half-open range in characters (not bytes) from the start of the text
    pub range: Range<usize>,

    /// Capture groups, group 1 first; `None` for groups that did not take part
    pub groups: Vec<Option<String>>,
}

impl TextMatch {
    /// Capture group `index` (1-based, as in the pattern)
    pub fn group(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.groups.get(i))
            .and_then(|g| g.as_deref())
    }
}

/// Something a document's text can be searched in.
///
/// Implementations return every non-overlapping match, **last match first**
/// (descending start offset), so callers can edit the document back to front
/// without invalidating the ranges they have not processed yet.
pub trait TextSource {
    fn find_regex(&self, pattern: &Regex) -> Vec<TextMatch>;
}

/// A text source over an in-memory string
#[derive(Debug, Clone, Default)]
pub struct PlainTextSource {
    text: String,
}

impl PlainTextSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<&str> for PlainTextSource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for PlainTextSource {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl TextSource for PlainTextSource {
    fn find_regex(&self, pattern: &Regex) -> Vec<TextMatch> {
        let mut matches = Vec::new();
        // Byte offsets are converted to char offsets incrementally
        let mut byte_pos = 0;
        let mut char_pos = 0;

        for caps in pattern.captures_iter(&self.text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            char_pos += self.text[byte_pos..whole.start()].chars().count();
            byte_pos = whole.start();

            let start = char_pos;
            let end = start + whole.as_str().chars().count();

            matches.push(TextMatch {
                text: whole.as_str().to_string(),
                range: start..end,
                groups: caps
                    .iter()
                    .skip(1)
                    .map(|g| g.map(|m| m.as_str().to_string()))
                    .collect(),
            });
        }

        matches.reverse();
        matches
    }
}
