use base64::prelude::*;

use super::{FieldError, Properties};
use crate::models::Citation;

/// Namespace prefix used when none is configured
pub const DEFAULT_PREFIX: &str = "bibendum_";

/// Characters that never appear unescaped in a payload
pub const PROTECTED_CHARS: &str = r"_=+-/\?![]{}()@#<>,.:;|%&*";

/// Encoder/decoder for field names.
///
/// The payload is the JSON form of the properties, base64 encoded, with every
/// protected character replaced by `_x<ddd>x_` (its 3-digit code point).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCodec {
    prefix: String,
}

impl FieldCodec {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `name` is in this codec's namespace
    pub fn is_field(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
    }

    /// `<prefix><index>_<escaped payload>`
    pub fn encode(&self, index: usize, properties: &Properties) -> Result<String, FieldError> {
        let json =
            serde_json::to_vec(properties).map_err(|e| FieldError::Serialize(e.to_string()))?;
        let payload = escape(&BASE64_STANDARD.encode(json));

        Ok(format!("{}{}_{}", self.prefix, index, payload))
    }

    /// Read a field name back.
    ///
    /// Returns `Ok(None)` for names outside the namespace, and
    /// [`FieldError::Corrupted`] when the name is in the namespace but its
    /// payload does not decode.
    pub fn decode(&self, name: &str) -> Result<Option<(usize, Properties)>, FieldError> {
        let Some(rest) = name.strip_prefix(&self.prefix) else {
            return Ok(None);
        };

        let corrupted = |reason: String| {
            tracing::warn!(field = name, %reason, "Corrupted field");
            FieldError::Corrupted {
                name: name.to_string(),
                reason,
            }
        };

        let (index, payload) = rest
            .split_once('_')
            .ok_or_else(|| corrupted("missing index separator".to_string()))?;
        let index: usize = Some(index)
            .filter(|i| !i.is_empty() && i.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|i| i.parse().ok())
            .ok_or_else(|| corrupted(format!("invalid index '{}'", index)))?;

        let encoded = unescape(payload).map_err(corrupted)?;
        let json = BASE64_STANDARD
            .decode(encoded)
            .map_err(|e| corrupted(format!("invalid base64: {}", e)))?;
        let properties: Properties =
            serde_json::from_slice(&json).map_err(|e| corrupted(format!("invalid JSON: {}", e)))?;

        Ok(Some((index, properties)))
    }

    pub fn encode_citation(&self, index: usize, citation: &Citation) -> Result<String, FieldError> {
        self.encode(index, &citation.to_properties())
    }

    /// Decode a field written by [`FieldCodec::encode_citation`]
    pub fn decode_citation(&self, name: &str) -> Result<Option<(usize, Citation)>, FieldError> {
        match self.decode(name)? {
            Some((index, properties)) => Ok(Some((index, Citation::from_properties(&properties)?))),
            None => Ok(None),
        }
    }
}

impl Default for FieldCodec {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

fn escape(payload: &str) -> String {
    let mut escaped = String::with_capacity(payload.len());
    for c in payload.chars() {
        if PROTECTED_CHARS.contains(c) {
            escaped.push_str(&format!("_x{:03}x_", c as u32));
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Inverse of [`escape`]; every `_` must open a well-formed token
fn unescape(payload: &str) -> Result<String, String> {
    let mut unescaped = String::with_capacity(payload.len());
    let mut rest = payload;

    while let Some(pos) = rest.find('_') {
        unescaped.push_str(&rest[..pos]);
        let token = rest
            .get(pos..pos + 7)
            .ok_or_else(|| format!("truncated escape at '{}'", &rest[pos..]))?;

        let code = token
            .strip_prefix("_x")
            .and_then(|t| t.strip_suffix("x_"))
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u32>().ok())
            .and_then(char::from_u32)
            .ok_or_else(|| format!("invalid escape '{}'", token))?;

        unescaped.push(code);
        rest = &rest[pos + 7..];
    }
    unescaped.push_str(rest);

    Ok(unescaped)
}
