//! Translatable-field registry and translation-gap detection.
//!
//! Any domain object owning translatable text implements [`Translatable`] and
//! registers each field with a [`TranslatableContentsCollection`]. Nested
//! translatable objects are merged in through
//! [`TranslatableContentsCollection::add_fields_from_translatable_object`].

use crate::error::TranslationError;
use crate::translation::content::{
    require_value_matches_format, ContentFormat, ContentValue, TranslatableContent,
};
use crate::translation::entity::EntityTranslations;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Working set of translatable contents gathered during one traversal.
#[derive(Debug, Clone, Default)]
pub struct TranslatableContentsCollection {
    /// Registration order across all formats.
    contents: Vec<TranslatableContent>,
    seen_hashes: HashSet<String>,
    /// content id -> hash of the content registered under it
    content_ids: HashMap<String, String>,
}

impl TranslatableContentsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one field by value.
    ///
    /// Empty values and values whose hash was already registered are skipped.
    /// A value whose shape disagrees with `format` is rejected, as is a content
    /// id already registered for different content.
    pub fn add_translatable_field(
        &mut self,
        content_id: &str,
        format: ContentFormat,
        value: impl Into<ContentValue>,
    ) -> Result<(), TranslationError> {
        let value = value.into();
        require_value_matches_format(format, &value)?;
        if value.is_empty() {
            return Ok(());
        }
        let content = TranslatableContent::create_new(content_id, format, value)?;
        self.insert(content)
    }

    /// Register an already-built content under a declared format.
    pub fn add_translatable_content(
        &mut self,
        format: ContentFormat,
        content: TranslatableContent,
    ) -> Result<(), TranslationError> {
        if content.content_format != format {
            return Err(TranslationError::FormatMismatch {
                expected: format.to_string(),
                found: content.content_format.to_string(),
            });
        }
        require_value_matches_format(format, &content.content_value)?;
        if content.content_value.is_empty() {
            return Ok(());
        }
        self.insert(content)
    }

    /// Merge every field of a nested translatable object into this collection.
    pub fn add_fields_from_translatable_object<T>(
        &mut self,
        object: &T,
    ) -> Result<(), TranslationError>
    where
        T: Translatable + ?Sized,
    {
        let nested = object.get_translatable_fields()?;
        for content in nested.contents {
            self.insert(content)?;
        }
        Ok(())
    }

    fn insert(&mut self, content: TranslatableContent) -> Result<(), TranslationError> {
        if self.seen_hashes.contains(&content.content_hash) {
            return Ok(());
        }
        if self.content_ids.contains_key(&content.content_id) {
            return Err(TranslationError::AlreadyRegistered {
                content_id: content.content_id,
            });
        }
        self.seen_hashes.insert(content.content_hash.clone());
        self.content_ids
            .insert(content.content_id.clone(), content.content_hash.clone());
        self.contents.push(content);
        Ok(())
    }

    /// All registered contents in registration order.
    pub fn contents(&self) -> &[TranslatableContent] {
        &self.contents
    }

    pub fn into_contents(self) -> Vec<TranslatableContent> {
        self.contents
    }

    /// Registered contents grouped by format, each group in registration order.
    pub fn by_format(&self) -> BTreeMap<ContentFormat, Vec<&TranslatableContent>> {
        let mut grouped: BTreeMap<ContentFormat, Vec<&TranslatableContent>> = BTreeMap::new();
        for content in &self.contents {
            grouped.entry(content.content_format).or_default().push(content);
        }
        grouped
    }

    pub fn get(&self, content_id: &str) -> Option<&TranslatableContent> {
        self.contents.iter().find(|c| c.content_id == content_id)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// Capability of a domain object that owns translatable fields.
pub trait Translatable {
    /// Register every translatable field this object owns.
    ///
    /// The default reports [`TranslationError::NotImplemented`]: an object
    /// that does not declare its fields has nothing to translate.
    fn register_all_translatable_fields(
        &self,
        _contents: &mut TranslatableContentsCollection,
    ) -> Result<(), TranslationError> {
        Err(TranslationError::NotImplemented)
    }

    /// Run a fresh traversal and return everything it registered.
    fn get_translatable_fields(&self) -> Result<TranslatableContentsCollection, TranslationError> {
        let mut contents = TranslatableContentsCollection::new();
        self.register_all_translatable_fields(&mut contents)?;
        Ok(contents)
    }

    /// Contents lacking an up-to-date translation in `translations`.
    fn get_all_contents_which_need_translations(
        &self,
        translations: &EntityTranslations,
    ) -> Result<Vec<TranslatableContent>, TranslationError> {
        let contents = self.get_translatable_fields()?;
        Ok(contents_which_need_translations(contents.contents(), translations))
    }

    /// Number of distinct translatable contents.
    fn get_content_count(&self) -> Result<usize, TranslationError> {
        Ok(self.get_translatable_fields()?.len())
    }
}

/// Contents whose hash is absent from `translations`, or present but flagged
/// as needing an update. Order follows `contents`.
pub fn contents_which_need_translations(
    contents: &[TranslatableContent],
    translations: &EntityTranslations,
) -> Vec<TranslatableContent> {
    contents
        .iter()
        .filter(|content| {
            translations
                .translations
                .get(&content.content_hash)
                .map_or(true, |translated| translated.needs_update)
        })
        .cloned()
        .collect()
}
