//! Formatted text as an ordered list of styled runs.
//!
//! A [`StyledText`] is a sequence of [`Run`]s, each pairing a fragment of
//! text with the [`Style`] it is rendered in:
//!
//! ```text
//! [("The big ", {}), ("bold", {bold}), (" text.", {})]
//! ```
//!
//! Concatenating the fragments in order always yields the plain text. Editors
//! that cannot vary formatting inside a field render the runs one by one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul};

use super::style::Style;

/// Errors raised while building or editing styled text
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TextError {
    /// Malformed constructor input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation needs at least one run
    #[error("Styled text is empty")]
    Empty,
}

/// One fragment of text with its style
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,

    #[serde(default, skip_serializing_if = "Style::is_empty")]
    pub style: Style,
}

impl Run {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// A run with the inherited style
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::default())
    }
}

/// The shapes styled text can be built from
#[derive(Debug, Clone)]
pub enum TextInput {
    /// A single unstyled string
    Text(String),
    /// A single string with one style
    Styled(String, Style),
    /// Strings and styles paired up by position
    Parallel(Vec<String>, Vec<Style>),
    /// Runs built by the caller
    Runs(Vec<Run>),
}

/// Formatted text made of styled runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyledText {
    runs: Vec<Run>,
}

impl StyledText {
    /// Empty text with no runs
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any of the supported input shapes
    pub fn build(input: TextInput) -> Result<Self, TextError> {
        match input {
            TextInput::Text(text) => Ok(Self::from_text(text)),
            TextInput::Styled(text, style) => Ok(Self::from_styled(text, style)),
            TextInput::Parallel(texts, styles) => Self::from_parallel(texts, styles),
            TextInput::Runs(runs) => Ok(Self::from_runs(runs)),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_styled(text, Style::default())
    }

    pub fn from_styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            runs: vec![Run::new(text, style)],
        }
    }

    /// Pair `texts[i]` with `styles[i]`; both lists must have the same length
    pub fn from_parallel(texts: Vec<String>, styles: Vec<Style>) -> Result<Self, TextError> {
        if texts.len() != styles.len() {
            return Err(TextError::InvalidArgument(format!(
                "{} text fragments but {} styles",
                texts.len(),
                styles.len()
            )));
        }
        Ok(Self {
            runs: texts
                .into_iter()
                .zip(styles)
                .map(|(text, style)| Run::new(text, style))
                .collect(),
        })
    }

    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Concatenation of every run's text
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn into_runs(self) -> Vec<Run> {
        self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Run> {
        self.runs.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Run> {
        self.runs.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Run> {
        self.runs.get(index)
    }

    /// Add a run at the end.
    ///
    /// `sep` is appended to the previous run first, so the separator takes
    /// the previous run's style rather than the new one.
    pub fn append(&mut self, text: impl Into<String>, style: Option<Style>, sep: &str) {
        self.push_separator(sep);
        self.runs.push(Run::new(text, style.unwrap_or_default()));
    }

    /// Splice in the runs of `other`, with the same separator rule as [`append`](Self::append)
    pub fn extend<I>(&mut self, other: I, sep: &str)
    where
        I: IntoIterator<Item = Run>,
    {
        self.push_separator(sep);
        self.runs.extend(other);
    }

    fn push_separator(&mut self, sep: &str) {
        if let Some(last) = self.runs.last_mut() {
            last.text.push_str(sep);
        }
    }

    /// Merge consecutive runs that have equal styles
    pub fn reduce(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.style == run.style => prev.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }

    /// Consuming form of [`reduce`](Self::reduce)
    pub fn reduced(mut self) -> Self {
        self.reduce();
        self
    }

    /// Trim both ends. `chars` of `None` trims whitespace.
    pub fn strip(&mut self, chars: Option<&str>) -> Result<(), TextError> {
        self.lstrip(chars)?;
        self.rstrip(chars)
    }

    /// Trim the start of the first run only
    pub fn lstrip(&mut self, chars: Option<&str>) -> Result<(), TextError> {
        let first = self.runs.first_mut().ok_or(TextError::Empty)?;
        let trimmed = match chars {
            Some(set) => first.text.trim_start_matches(|c: char| set.contains(c)),
            None => first.text.trim_start(),
        };
        first.text = trimmed.to_string();
        Ok(())
    }

    /// Trim the end of the last run only
    pub fn rstrip(&mut self, chars: Option<&str>) -> Result<(), TextError> {
        let last = self.runs.last_mut().ok_or(TextError::Empty)?;
        let trimmed = match chars {
            Some(set) => last.text.trim_end_matches(|c: char| set.contains(c)),
            None => last.text.trim_end(),
        };
        last.text = trimmed.to_string();
        Ok(())
    }

    /// New text holding the runs of `a` followed by the runs of `b`
    pub fn concat(a: &StyledText, b: &StyledText) -> StyledText {
        let mut runs = Vec::with_capacity(a.len() + b.len());
        runs.extend_from_slice(&a.runs);
        runs.extend_from_slice(&b.runs);
        Self { runs }
    }

    /// The run list repeated `n` times. Runs are not merged.
    pub fn repeat(&self, n: usize) -> StyledText {
        std::iter::repeat(self.runs.iter().cloned())
            .take(n)
            .flatten()
            .collect()
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        Self::from_text(text)
    }
}

impl From<Vec<Run>> for StyledText {
    fn from(runs: Vec<Run>) -> Self {
        Self::from_runs(runs)
    }
}

impl TryFrom<TextInput> for StyledText {
    type Error = TextError;

    fn try_from(input: TextInput) -> Result<Self, Self::Error> {
        Self::build(input)
    }
}

impl Index<usize> for StyledText {
    type Output = Run;

    fn index(&self, index: usize) -> &Run {
        &self.runs[index]
    }
}

impl IndexMut<usize> for StyledText {
    fn index_mut(&mut self, index: usize) -> &mut Run {
        &mut self.runs[index]
    }
}

impl Add for StyledText {
    type Output = StyledText;

    fn add(mut self, rhs: StyledText) -> StyledText {
        self.runs.extend(rhs.runs);
        self
    }
}

impl Mul<usize> for &StyledText {
    type Output = StyledText;

    fn mul(self, n: usize) -> StyledText {
        self.repeat(n)
    }
}

impl IntoIterator for StyledText {
    type Item = Run;
    type IntoIter = std::vec::IntoIter<Run>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.into_iter()
    }
}

impl<'a> IntoIterator for &'a StyledText {
    type Item = &'a Run;
    type IntoIter = std::slice::Iter<'a, Run>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.iter()
    }
}

impl FromIterator<Run> for StyledText {
    fn from_iter<I: IntoIterator<Item = Run>>(iter: I) -> Self {
        Self {
            runs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bold() -> Style {
        Style::new().bold(true)
    }

    #[test]
    fn test_construction_variants() {
        let text = StyledText::from_text("This is text");
        assert_eq!(text.len(), 1);
        assert!(text[0].style.is_empty());

        let text = StyledText::from_styled("This is text", bold());
        assert_eq!(text[0].style, bold());

        let text = StyledText::build(TextInput::Parallel(
            vec!["This is text ".into(), "in bold".into()],
            vec![Style::new(), bold()],
        ))
        .unwrap();
        assert_eq!(text.plain_text(), "This is text in bold");
        assert_eq!(text[1].style, bold());

        let text = StyledText::build(TextInput::Runs(vec![
            Run::plain("The big "),
            Run::new("bold", bold()),
            Run::plain(" text."),
        ]))
        .unwrap();
        assert_eq!(text.to_string(), "The big bold text.");
    }

    #[test]
    fn test_parallel_length_mismatch() {
        let result = StyledText::from_parallel(vec!["a".into(), "b".into()], vec![Style::new()]);
        assert!(matches!(result, Err(TextError::InvalidArgument(_))));
    }

    #[test]
    fn test_append_separator_takes_previous_style() {
        let s = Style::new().italics(true);
        let mut text = StyledText::from_styled("a", s.clone());
        text.append("b", Some(bold()), "-");

        assert_eq!(
            text.runs(),
            &[Run::new("a-", s), Run::new("b", bold())]
        );
    }

    #[test]
    fn test_append_to_empty_ignores_separator() {
        let mut text = StyledText::new();
        text.append("first", None, ", ");
        assert_eq!(text.runs(), &[Run::plain("first")]);
    }

    #[test]
    fn test_extend() {
        let mut text = StyledText::from_text("This is text");
        text.append("in bold", Some(bold()), " ");
        text.extend(
            StyledText::from_styled("More text.", Style::new().italics(true)),
            ". ",
        );

        assert_eq!(text.len(), 3);
        assert_eq!(text[1].text, "in bold. ");
        assert_eq!(text.plain_text(), "This is text in bold. More text.");

        text.extend(vec![Run::plain("!")], "");
        assert_eq!(text.len(), 4);
    }

    #[test]
    fn test_reduce_merges_equal_neighbours() {
        let mut text = StyledText::from_text("Not bold.");
        text.append("Bold.", Some(bold()), " ");
        text.append("Bold.", Some(bold()), " ");
        text.append("Not bold.", None, " ");
        text.reduce();

        assert_eq!(
            text.runs(),
            &[
                Run::plain("Not bold. "),
                Run::new("Bold. Bold. ", bold()),
                Run::plain("Not bold."),
            ]
        );
    }

    #[test]
    fn test_reduce_empty() {
        let mut text = StyledText::new();
        text.reduce();
        assert!(text.is_empty());
    }

    #[test]
    fn test_strip_only_touches_ends() {
        let mut text = StyledText::from_parallel(
            vec!["   This is text ".into(), " in bold   ".into()],
            vec![Style::new(), bold()],
        )
        .unwrap();
        text.strip(None).unwrap();

        assert_eq!(text[0].text, "This is text ");
        assert_eq!(text[1].text, " in bold");
    }

    #[test]
    fn test_strip_with_charset() {
        let mut text = StyledText::from_text("(Jones, 1990)");
        text.strip(Some("()")).unwrap();
        assert_eq!(text.plain_text(), "Jones, 1990");

        let mut text = StyledText::from_text("..x..");
        text.lstrip(Some(".")).unwrap();
        assert_eq!(text.plain_text(), "x..");
        text.rstrip(Some(".")).unwrap();
        assert_eq!(text.plain_text(), "x");
    }

    #[test]
    fn test_strip_empty_fails() {
        let mut text = StyledText::new();
        assert_eq!(text.strip(None), Err(TextError::Empty));
        assert_eq!(text.lstrip(None), Err(TextError::Empty));
        assert_eq!(text.rstrip(Some(" ")), Err(TextError::Empty));
    }

    #[test]
    fn test_concat_and_add() {
        let a = StyledText::from_text("a");
        let b = StyledText::from_styled("b", bold());

        let c = StyledText::concat(&a, &b);
        assert_eq!(c.len(), 2);
        assert_eq!(c, a.clone() + b.clone());
        // Inputs untouched
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_repeat_keeps_runs_separate() {
        let text = StyledText::from_styled("ab", bold());
        let tripled = &text * 3;

        assert_eq!(tripled.len(), 3);
        assert_eq!(tripled.plain_text(), "ababab");
        assert_eq!(tripled.reduced().len(), 1);
        assert!(text.repeat(0).is_empty());

        let mut mixed = StyledText::from_styled("x", bold());
        mixed.append("y", None, "");
        let doubled = mixed.repeat(2);
        assert_eq!(doubled.len(), 4);
        assert_eq!(doubled[2], mixed[0]);
        assert_eq!(doubled[3], mixed[1]);
        assert_eq!(doubled.plain_text(), "xyxy");
    }

    #[test]
    fn test_index_mut_and_iteration() {
        let mut text = StyledText::from_parallel(
            vec!["x".into(), "y".into()],
            vec![Style::new(), bold()],
        )
        .unwrap();
        text[0].text = "z".into();

        let collected: Vec<&str> = text.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(collected, vec!["z", "y"]);

        let rebuilt: StyledText = text.clone().into_iter().collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_serde_shape() {
        let text = StyledText::from_runs(vec![Run::plain("a "), Run::new("b", bold())]);
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"text": "a "}, {"text": "b", "style": {"bold": true}}])
        );
        let back: StyledText = serde_json::from_value(json).unwrap();
        assert_eq!(back, text);
    }

    fn arb_style() -> impl Strategy<Value = Style> {
        (proptest::option::of(any::<bool>()), proptest::option::of(any::<bool>()))
            .prop_map(|(bold, italics)| Style {
                bold,
                italics,
                ..Style::default()
            })
    }

    fn arb_runs() -> impl Strategy<Value = Vec<Run>> {
        proptest::collection::vec(
            ("[a-z ]{0,6}", arb_style()).prop_map(|(t, s)| Run::new(t, s)),
            0..8,
        )
    }

    proptest! {
        #[test]
        fn prop_plain_text_is_concatenation(runs in arb_runs()) {
            let expected: String = runs.iter().map(|r| r.text.clone()).collect();
            let text = StyledText::from_runs(runs);
            prop_assert_eq!(text.plain_text(), expected);
        }

        #[test]
        fn prop_reduce_idempotent_and_text_preserving(runs in arb_runs()) {
            let text = StyledText::from_runs(runs);
            let once = text.clone().reduced();
            let twice = once.clone().reduced();
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(once.plain_text(), text.plain_text());
        }
    }
}
