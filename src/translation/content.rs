//! Leaf units of translatable text and their realized translations.

use crate::error::{invalid, ValidationError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length of the content-derived hash used as the deduplication key.
pub const MAX_LENGTH_FOR_CONTENT_HASH: usize = 12;

/// Separator used when hashing a list of strings.
const LIST_SEPARATOR: char = '\u{1f}';

/// Format tag of a piece of translatable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFormat {
    Html,
    Unicode,
    SetOfNormalizedString,
    SetOfUnicodeString,
    Object,
}

impl ContentFormat {
    pub const ALL: [ContentFormat; 5] = [
        ContentFormat::Html,
        ContentFormat::Unicode,
        ContentFormat::SetOfNormalizedString,
        ContentFormat::SetOfUnicodeString,
        ContentFormat::Object,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFormat::Html => "html",
            ContentFormat::Unicode => "unicode",
            ContentFormat::SetOfNormalizedString => "set_of_normalized_string",
            ContentFormat::SetOfUnicodeString => "set_of_unicode_string",
            ContentFormat::Object => "object",
        }
    }

    /// Whether values of this format are a single string.
    pub fn expects_text(&self) -> bool {
        matches!(self, ContentFormat::Html | ContentFormat::Unicode)
    }

    /// Whether values of this format are a list of strings.
    pub fn expects_string_list(&self) -> bool {
        matches!(
            self,
            ContentFormat::SetOfNormalizedString | ContentFormat::SetOfUnicodeString
        )
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| ValidationError::new(format!("Invalid content format: {}", s)))
    }
}

/// Raw value of a translatable field.
///
/// Serialized untagged: a JSON string is `Text`, an array of strings is
/// `StringList`, anything else is `Object`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Text(String),
    StringList(Vec<String>),
    Object(serde_json::Value),
}

impl ContentValue {
    pub fn text(value: impl Into<String>) -> Self {
        ContentValue::Text(value.into())
    }

    pub fn string_list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ContentValue::StringList(values.into_iter().map(Into::into).collect())
    }

    /// Empty values are never registered for translation.
    pub fn is_empty(&self) -> bool {
        match self {
            ContentValue::Text(text) => text.is_empty(),
            ContentValue::StringList(items) => items.is_empty(),
            ContentValue::Object(value) => value.is_null(),
        }
    }

    /// Short name of the runtime shape, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            ContentValue::Text(_) => "string",
            ContentValue::StringList(_) => "list of strings",
            ContentValue::Object(_) => "object",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Stable string form fed to the hash.
    fn canonical_string(&self) -> String {
        match self {
            ContentValue::Text(text) => text.clone(),
            ContentValue::StringList(items) => items.join(&LIST_SEPARATOR.to_string()),
            ContentValue::Object(value) => value.to_string(),
        }
    }

    /// Content-derived hash of this value.
    pub fn hash(&self) -> String {
        convert_to_hash(&self.canonical_string(), MAX_LENGTH_FOR_CONTENT_HASH)
    }
}

impl fmt::Display for ContentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentValue::Text(text) => f.write_str(text),
            ContentValue::StringList(items) => write!(f, "{:?}", items),
            ContentValue::Object(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for ContentValue {
    fn from(value: &str) -> Self {
        ContentValue::Text(value.to_string())
    }
}

impl From<String> for ContentValue {
    fn from(value: String) -> Self {
        ContentValue::Text(value)
    }
}

/// Hex SHA-256 of `input`, truncated to `max_length` characters.
pub fn convert_to_hash(input: &str, max_length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let mut encoded = hex::encode(hasher.finalize());
    encoded.truncate(max_length);
    encoded
}

/// Check that a value's runtime shape matches what its format declares.
pub fn require_value_matches_format(
    format: ContentFormat,
    value: &ContentValue,
) -> Result<(), ValidationError> {
    if format.expects_text() && !matches!(value, ContentValue::Text(_)) {
        invalid!(
            "Expected {} content to be a string, received {}",
            format,
            value.shape()
        );
    }
    if format.expects_string_list() {
        let ContentValue::StringList(items) = value else {
            invalid!(
                "Expected {} content to be a list of strings, received {}",
                format,
                value.shape()
            );
        };
        let mut seen = std::collections::HashSet::new();
        if let Some(duplicate) = items.iter().find(|item| !seen.insert(item.as_str())) {
            invalid!(
                "Expected {} content to contain unique strings, found duplicate {:?}",
                format,
                duplicate
            );
        }
    }
    Ok(())
}

/// A leaf unit of translatable text owned by a domain object.
///
/// Instances are transient: the owning object rebuilds them on every
/// traversal and they are never persisted directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatableContent {
    pub content_id: String,
    pub content_format: ContentFormat,
    pub content_value: ContentValue,
    pub content_hash: String,
}

impl TranslatableContent {
    /// Build a content, checking its shape and computing its hash.
    pub fn create_new(
        content_id: impl Into<String>,
        content_format: ContentFormat,
        content_value: ContentValue,
    ) -> Result<Self, ValidationError> {
        require_value_matches_format(content_format, &content_value)?;
        let content_hash = content_value.hash();
        Ok(Self {
            content_id: content_id.into(),
            content_format,
            content_value,
            content_hash,
        })
    }

    /// A placeholder with an empty value and hash.
    pub fn create_default(content_id: impl Into<String>, content_format: ContentFormat) -> Self {
        let content_value = if content_format.expects_string_list() {
            ContentValue::StringList(Vec::new())
        } else if content_format.expects_text() {
            ContentValue::Text(String::new())
        } else {
            ContentValue::Object(serde_json::Value::Null)
        };
        Self {
            content_id: content_id.into(),
            content_format,
            content_value,
            content_hash: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content_id.trim().is_empty() {
            invalid!("Expected content_id to be a non-empty string");
        }
        require_value_matches_format(self.content_format, &self.content_value)?;
        if !self.content_value.is_empty() && self.content_hash != self.content_value.hash() {
            invalid!(
                "Content hash {} does not match content {}",
                self.content_hash,
                self.content_id
            );
        }
        Ok(())
    }
}

impl fmt::Display for TranslatableContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.content_id, self.content_format, self.content_value, self.content_hash
        )
    }
}

/// The translation of one [`TranslatableContent`] into a target language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedContent {
    pub content_format: ContentFormat,
    pub content_value: ContentValue,
    /// Hash of the source content this translates.
    pub content_hash: String,
    #[serde(default)]
    pub needs_update: bool,
}

impl TranslatedContent {
    pub fn new(
        content_format: ContentFormat,
        content_value: ContentValue,
        content_hash: impl Into<String>,
    ) -> Self {
        Self {
            content_format,
            content_value,
            content_hash: content_hash.into(),
            needs_update: false,
        }
    }

    /// Translate `source` with `content_value`.
    pub fn for_source(source: &TranslatableContent, content_value: ContentValue) -> Self {
        Self::new(
            source.content_format,
            content_value,
            source.content_hash.clone(),
        )
    }

    pub fn mark_needs_update(&mut self) {
        self.needs_update = true;
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content_hash.is_empty() {
            invalid!("Expected content_hash to be a non-empty string");
        }
        require_value_matches_format(self.content_format, &self.content_value)
    }
}
