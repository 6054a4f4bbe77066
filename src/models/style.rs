//! Character and paragraph style attributes attached to a text run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::text::TextError;

/// Letter case applied to a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    Normal,
    Upper,
    Lower,
    Title,
    SmallCaps,
}

impl TextCase {
    /// Returns the attribute value used in stored styles
    pub fn as_str(&self) -> &'static str {
        match self {
            TextCase::Normal => "normal",
            TextCase::Upper => "upper",
            TextCase::Lower => "lower",
            TextCase::Title => "title",
            TextCase::SmallCaps => "smallcaps",
        }
    }
}

impl FromStr for TextCase {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(TextCase::Normal),
            "upper" => Ok(TextCase::Upper),
            "lower" => Ok(TextCase::Lower),
            "title" => Ok(TextCase::Title),
            "smallcaps" => Ok(TextCase::SmallCaps),
            other => Err(TextError::InvalidArgument(format!(
                "unknown case '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for TextCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RGB color stored as six lowercase hex digits, e.g. `ff0000`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Parse a hex color, with or without a leading `#`
    pub fn parse(hex: &str) -> Result<Self, TextError> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TextError::InvalidArgument(format!(
                "'{}' is not an RGB hex color",
                hex
            )));
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    /// The hex digits without prefix
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Packed `0x00RRGGBB` value, the form most editors take
    pub fn to_rgb(&self) -> u32 {
        // Validated as six hex digits on construction
        u32::from_str_radix(&self.0, 16).unwrap_or(0)
    }
}

impl TryFrom<String> for Color {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

/// Style attributes of a run.
///
/// Every attribute is optional; a style with no attribute set means
/// "inherit the surrounding style". Equality is by value, which is what
/// [`StyledText::reduce`](super::StyledText::reduce) relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italics: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<TextCase>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,

    /// (top, right, bottom, left) in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<[f64; 4]>,

    /// First-line indent in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<f64>,

    /// Character style name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_style: Option<String>,

    /// Paragraph style name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub para_style: Option<String>,
}

impl Style {
    /// The empty (inherited) style
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no attribute is set
    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }

    pub fn bold(mut self, on: bool) -> Self {
        self.bold = Some(on);
        self
    }

    pub fn italics(mut self, on: bool) -> Self {
        self.italics = Some(on);
        self
    }

    pub fn underline(mut self, on: bool) -> Self {
        self.underline = Some(on);
        self
    }

    pub fn case(mut self, case: TextCase) -> Self {
        self.case = Some(case);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn margin(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.margin = Some([top, right, bottom, left]);
        self
    }

    pub fn indent(mut self, cm: f64) -> Self {
        self.indent = Some(cm);
        self
    }

    pub fn char_style(mut self, name: impl Into<String>) -> Self {
        self.char_style = Some(name.into());
        self
    }

    pub fn para_style(mut self, name: impl Into<String>) -> Self {
        self.para_style = Some(name.into());
        self
    }
}
