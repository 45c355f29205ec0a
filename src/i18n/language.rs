//! Language type: a language code validated against the registry.

use crate::error::ValidationError;
use crate::i18n::{LanguageConfig, LanguageRegistry};

/// What a language code is going to be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageUse {
    Content,
    Audio,
    /// Either content or audio (machine translation accepts both).
    Any,
}

/// A validated language.
///
/// Only codes present in the [`LanguageRegistry`] for the requested use can be
/// turned into a `Language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    code: &'static str,
}

impl Language {
    /// Create a Language from a code, checking it is usable for `usage`.
    ///
    /// # Example
    /// ```ignore
    /// let hindi = Language::from_code("hi", LanguageUse::Content)?;
    /// ```
    pub fn from_code(code: &str, usage: LanguageUse) -> Result<Language, ValidationError> {
        let registry = LanguageRegistry::get();
        let config = registry
            .get_by_code(code)
            .ok_or_else(|| ValidationError::new(format!("Invalid language code: {}", code)))?;

        let usable = match usage {
            LanguageUse::Content => config.supports_content,
            LanguageUse::Audio => config.supports_audio,
            LanguageUse::Any => config.supports_content || config.supports_audio,
        };
        if !usable {
            return Err(ValidationError::new(format!(
                "Language '{}' is not supported for {:?}",
                code, usage
            )));
        }

        Ok(Language { code: config.code })
    }

    /// The canonical (source) language.
    pub fn canonical() -> Language {
        Language {
            code: LanguageRegistry::get().canonical().code,
        }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Full configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for a `Language` built through `from_code` or `canonical`.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_content_language() {
        let language = Language::from_code("hi", LanguageUse::Content).expect("Should succeed");
        assert_eq!(language.code(), "hi");
        assert_eq!(language.name(), "Hindi");
        assert!(!language.is_canonical());
    }

    #[test]
    fn test_from_code_unknown() {
        let err = Language::from_code("ABC", LanguageUse::Any).unwrap_err();
        assert_eq!(err.to_string(), "Invalid language code: ABC");
    }

    #[test]
    fn test_from_code_empty() {
        assert!(Language::from_code("", LanguageUse::Any).is_err());
    }

    #[test]
    fn test_from_code_wrong_use() {
        let err = Language::from_code("hi-en", LanguageUse::Content).unwrap_err();
        assert!(err.to_string().contains("not supported"));
        assert!(Language::from_code("hi-en", LanguageUse::Audio).is_ok());
        assert!(Language::from_code("hi-en", LanguageUse::Any).is_ok());
    }

    #[test]
    fn test_canonical_returns_english() {
        let canonical = Language::canonical();
        assert_eq!(canonical.code(), "en");
        assert!(canonical.is_canonical());
    }

    #[test]
    fn test_language_equality() {
        let lang1 = Language::canonical();
        let lang2 = Language::from_code("en", LanguageUse::Content).unwrap();
        assert_eq!(lang1, lang2);
    }
}
