//! Error types for MARC parsing

use thiserror::Error;

/// Errors raised while parsing MARC binary data.
///
/// Classification rejections are not errors; they surface as `Ok(None)`
/// from [`crate::read_edition`]. These variants cover structural
/// corruption only.
#[derive(Error, Debug)]
pub enum MarcError {
    /// The stream does not carry a readable 5-digit record length prefix.
    /// Framing cannot be trusted past this point.
    #[error("invalid MARC file: record framing is unreadable")]
    InvalidMarcFile,

    /// The record directory is not a whole number of 12-byte entries,
    /// even after the UTF-8 re-measure recovery attempt.
    #[error("bad record directory")]
    BadDictionary,

    /// Continuation lines of a wrapped field do not all share one tag.
    #[error("wrapped field continuation mixes tags {expected} and {found}")]
    WrappedFieldMismatch { expected: String, found: String },

    /// A wrapped field run reached the end of the record without a
    /// closing line.
    #[error("wrapped field {tag} has no closing line")]
    UnterminatedWrappedField { tag: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for MARC parsing operations
pub type MarcResult<T> = Result<T, MarcError>;
