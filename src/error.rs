//! Error types shared by the domain modules.
//!
//! Two families exist: [`ValidationError`] describes a malformed field value
//! and is surfaced to callers as a 400 response, while the remaining
//! [`TranslationError`] variants are programming errors that tests are meant
//! to catch.

use thiserror::Error;

/// A domain object failed one of its field constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Shorthand for returning a [`ValidationError`] from a function.
macro_rules! invalid {
    ($($arg:tt)*) => {
        return Err($crate::error::ValidationError::new(format!($($arg)*)).into())
    };
}
pub(crate) use invalid;

/// Errors raised while collecting translatable fields or editing translation
/// containers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error(
        "Translatable object is not registered, by using \
         `register_all_translatable_fields` method."
    )]
    NotImplemented,

    #[error("Already registered as a translatable content: {content_id}")]
    AlreadyRegistered { content_id: String },

    #[error("Expected field type to be {expected} but found {found}")]
    FormatMismatch { expected: String, found: String },

    #[error("Invalid content id: {0}")]
    InvalidContentId(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
