//! Blog posts and the field rules their changes must satisfy.

use crate::error::{invalid, TranslationError, ValidationError};
use crate::translation::{ContentFormat, ContentValue, Translatable, TranslatableContentsCollection};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

pub const MAX_CHARS_IN_BLOG_POST_TITLE: usize = 65;
pub const ACCEPTED_THUMBNAIL_EXTENSIONS: &[&str] = &["svg", "png", "jpeg", "jpg"];

static TITLE_REGEX: OnceLock<Regex> = OnceLock::new();

fn title_regex() -> &'static Regex {
    TITLE_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]+( [A-Za-z0-9]+)*$").expect("Invalid title regex")
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub thumbnail_filename: Option<String>,
    pub tags: Vec<String>,
}

impl BlogPost {
    /// With `strict`, the title must also be non-empty (drafts may be blank).
    pub fn require_valid_title(title: &str, strict: bool) -> Result<(), ValidationError> {
        if title.chars().count() > MAX_CHARS_IN_BLOG_POST_TITLE {
            invalid!(
                "Blog Post title should be at most {} characters, received {}.",
                MAX_CHARS_IN_BLOG_POST_TITLE,
                title
            );
        }
        if title.is_empty() {
            if strict {
                invalid!("Title should not be empty");
            }
            return Ok(());
        }
        if !title_regex().is_match(title) {
            invalid!(
                "Title field contains invalid characters. Only words (a-zA-Z0-9) \
                 separated by spaces are allowed. Received {}",
                title
            );
        }
        Ok(())
    }

    pub fn require_valid_thumbnail_filename(filename: &str) -> Result<(), ValidationError> {
        if filename.starts_with('.') {
            invalid!("Thumbnail filename should not start with a dot.");
        }
        if filename.contains('/') || filename.contains("..") {
            invalid!("Thumbnail filename should not include slashes or consecutive dot characters.");
        }
        let Some((_, extension)) = filename.rsplit_once('.') else {
            invalid!("Thumbnail filename should include an extension.");
        };
        if !ACCEPTED_THUMBNAIL_EXTENSIONS.contains(&extension) {
            invalid!(
                "Expected a filename ending in one of {}, received {}",
                ACCEPTED_THUMBNAIL_EXTENSIONS.join(", "),
                filename
            );
        }
        Ok(())
    }

    /// With `strict`, every tag must be non-empty.
    pub fn require_valid_tags(tags: &[String], strict: bool) -> Result<(), ValidationError> {
        for tag in tags {
            if tag.is_empty() {
                if strict {
                    invalid!("Tags should not be empty.");
                }
                continue;
            }
            if tag.trim() != tag {
                invalid!("Tags should not start or end with whitespace, received '{}'.", tag);
            }
            if tag.contains("  ") {
                invalid!("Adjacent whitespace in tags should be collapsed, received '{}'.", tag);
            }
        }

        let mut seen = HashSet::new();
        if tags.iter().any(|tag| !seen.insert(tag.as_str())) {
            invalid!("Some tags duplicate each other");
        }
        Ok(())
    }

    pub fn validate(&self, strict: bool) -> Result<(), ValidationError> {
        Self::require_valid_title(&self.title, strict)?;
        if let Some(filename) = &self.thumbnail_filename {
            Self::require_valid_thumbnail_filename(filename)?;
        } else if strict {
            invalid!("Expected thumbnail filename to be a string, received None");
        }
        Self::require_valid_tags(&self.tags, strict)
    }
}

impl Translatable for BlogPost {
    fn register_all_translatable_fields(
        &self,
        contents: &mut TranslatableContentsCollection,
    ) -> Result<(), TranslationError> {
        contents.add_translatable_field("title", ContentFormat::Unicode, self.title.as_str())?;
        contents.add_translatable_field("content", ContentFormat::Html, self.content.as_str())?;
        contents.add_translatable_field(
            "tags",
            ContentFormat::SetOfUnicodeString,
            ContentValue::string_list(self.tags.iter().cloned()),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::{EntityTranslations, EntityType, TranslatedContent};

    fn post() -> BlogPost {
        BlogPost {
            id: "blog_1".to_string(),
            title: "Learning Fractions".to_string(),
            content: "<p>Fractions are parts of a whole.</p>".to_string(),
            thumbnail_filename: Some("thumb.svg".to_string()),
            tags: vec!["News".to_string(), "Math".to_string()],
        }
    }

    // ==================== Title Tests ====================

    #[test]
    fn test_valid_title() {
        assert!(BlogPost::require_valid_title("Sample Title 2", true).is_ok());
    }

    #[test]
    fn test_empty_title() {
        assert!(BlogPost::require_valid_title("", false).is_ok());
        assert_eq!(
            BlogPost::require_valid_title("", true).unwrap_err().to_string(),
            "Title should not be empty"
        );
    }

    #[test]
    fn test_long_title() {
        let title = "a".repeat(MAX_CHARS_IN_BLOG_POST_TITLE + 1);
        let err = BlogPost::require_valid_title(&title, true).unwrap_err();
        assert!(err.to_string().contains("at most 65 characters"));
    }

    #[test]
    fn test_title_invalid_characters() {
        for title in ["Title!", "Two  spaces", " Leading"] {
            let err = BlogPost::require_valid_title(title, true).unwrap_err();
            assert!(err.to_string().contains("invalid characters"), "{}", title);
        }
    }

    // ==================== Thumbnail Tests ====================

    #[test]
    fn test_thumbnail_filename() {
        assert!(BlogPost::require_valid_thumbnail_filename("image.png").is_ok());

        let cases = [
            (".image.png", "start with a dot"),
            ("dir/image.png", "slashes"),
            ("image..png", "consecutive dot"),
            ("image", "include an extension"),
            ("image.gif", "Expected a filename ending in one of"),
        ];
        for (filename, expected) in cases {
            let err = BlogPost::require_valid_thumbnail_filename(filename).unwrap_err();
            assert!(err.to_string().contains(expected), "{}: {}", filename, err);
        }
    }

    // ==================== Tag Tests ====================

    #[test]
    fn test_tags() {
        let tags = |values: &[&str]| values.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        assert!(BlogPost::require_valid_tags(&tags(&["News", "Math"]), true).is_ok());
        assert!(BlogPost::require_valid_tags(&tags(&[""]), false).is_ok());
        assert!(BlogPost::require_valid_tags(&tags(&[""]), true).is_err());
        assert!(BlogPost::require_valid_tags(&tags(&[" News"]), true).is_err());
        assert!(BlogPost::require_valid_tags(&tags(&["Big  News"]), true).is_err());
        assert_eq!(
            BlogPost::require_valid_tags(&tags(&["News", "News"]), true)
                .unwrap_err()
                .to_string(),
            "Some tags duplicate each other"
        );
    }

    #[test]
    fn test_validate_strict_requires_thumbnail() {
        let mut draft = post();
        draft.thumbnail_filename = None;
        assert!(draft.validate(false).is_ok());
        assert!(draft.validate(true).is_err());
    }

    // ==================== Translatable Tests ====================

    #[test]
    fn test_translatable_fields() {
        let contents = post().get_translatable_fields().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(
            contents.get("tags").unwrap().content_format,
            ContentFormat::SetOfUnicodeString
        );
    }

    #[test]
    fn test_empty_fields_not_registered() {
        let mut draft = post();
        draft.content = String::new();
        draft.tags.clear();
        assert_eq!(draft.get_content_count().unwrap(), 1);
    }

    #[test]
    fn test_contents_needing_translation() {
        let post = post();
        let contents = post.get_translatable_fields().unwrap();
        let title = contents.get("title").unwrap();

        let mut translations = EntityTranslations::create_empty(EntityType::BlogPost, "blog_1", 1, "es");
        translations.add_translation(TranslatedContent::for_source(
            title,
            ContentValue::text("Aprendiendo fracciones"),
        ));

        let pending = post.get_all_contents_which_need_translations(&translations).unwrap();
        let ids: Vec<&str> = pending.iter().map(|c| c.content_id.as_str()).collect();
        assert_eq!(ids, vec!["content", "tags"]);
    }
}
