use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while validating, encoding or persisting an invoice.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoicError {
    /// The invoice record violated a validation rule. Nothing was encoded.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// An internal encoding invariant was violated (unreachable for
    /// validated input and a well-formed syntax configuration).
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Invoice totals do not fit the decimal range.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// The destination already exists and overwriting was not requested.
    #[error("output file {} already exists (set overwrite to replace it)", .0.display())]
    OutputExists(PathBuf),

    /// The message contains a character the requested text encoding cannot represent.
    #[error("character {ch:?} at byte {offset} cannot be written as {encoding}")]
    Charset {
        ch: char,
        offset: usize,
        encoding: &'static str,
    },

    /// Writing the destination failed.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or decoding the JSON input document failed.
    #[error("JSON input error: {0}")]
    Json(String),
}

/// What kind of rule a [`ValidationError`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// A required value is absent or blank.
    Missing,
    /// A date or number does not parse.
    Format,
    /// The value contains characters outside the allowed set.
    Charset,
    /// The value exceeds its maximum length.
    Length,
    /// A number is negative.
    Negative,
    /// A code is not part of its closed code list.
    UnknownCode,
    /// The party list lacks a mandatory qualifier (buyer or supplier).
    MissingParty,
}

/// A single validation failure with field path and message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dot/index path to the invalid field (e.g. "items[0].quantity").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Rule category.
    pub kind: ValidationKind,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, kind: ValidationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
        }
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("missing required field {field}");
        Self::new(field, ValidationKind::Missing, message)
    }
}
