//! Machine translation of a single piece of source text.

use crate::error::{invalid, ValidationError};
use crate::i18n::LanguageRegistry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineTranslation {
    pub source_language_code: String,
    pub target_language_code: String,
    pub source_text: String,
    pub translated_text: String,
}

impl MachineTranslation {
    pub fn new(
        source_language_code: impl Into<String>,
        target_language_code: impl Into<String>,
        source_text: impl Into<String>,
        translated_text: impl Into<String>,
    ) -> Self {
        Self {
            source_language_code: source_language_code.into(),
            target_language_code: target_language_code.into(),
            source_text: source_text.into(),
            translated_text: translated_text.into(),
        }
    }

    /// Both codes must be known (content or audio languages) and distinct.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let registry = LanguageRegistry::get();
        if !registry.is_known(&self.source_language_code) {
            invalid!("Invalid source language code: {}", self.source_language_code);
        }
        if !registry.is_known(&self.target_language_code) {
            invalid!("Invalid target language code: {}", self.target_language_code);
        }
        if self.source_language_code == self.target_language_code {
            invalid!(
                "Expected source_language_code to be different from \
                 target_language_code: \"{}\" = \"{}\"",
                self.source_language_code,
                self.target_language_code
            );
        }
        Ok(())
    }
}
