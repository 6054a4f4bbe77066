//! Mock text source for testing purposes.

use regex::Regex;
use std::collections::HashMap;

use super::text_source::{TextMatch, TextSource};

/// A text source that returns predefined matches for each pattern,
/// standing in for an editor that runs searches itself.
#[derive(Debug, Default)]
pub struct MockTextSource {
    responses: HashMap<String, Vec<TextMatch>>,
}

impl MockTextSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the matches returned for the pattern whose source is `pattern`.
    /// They are returned exactly as given.
    pub fn set_matches(&mut self, pattern: &str, matches: Vec<TextMatch>) {
        self.responses.insert(pattern.to_string(), matches);
    }

    /// Forget every configured response
    pub fn clear(&mut self) {
        self.responses.clear();
    }
}

impl TextSource for MockTextSource {
    fn find_regex(&self, pattern: &Regex) -> Vec<TextMatch> {
        self.responses
            .get(pattern.as_str())
            .cloned()
            .unwrap_or_default()
    }
}

/// Helper to build a match with all groups present
pub fn make_match(text: &str, start: usize, groups: &[&str]) -> TextMatch {
    TextMatch {
        text: text.to_string(),
        range: start..start + text.chars().count(),
        groups: groups.iter().map(|g| Some(g.to_string())).collect(),
    }
}
