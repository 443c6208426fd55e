//! Error types for wikify.

use thiserror::Error;

/// Result type for wikify operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for wikify operations.
///
/// Per-item misses (a noun without a sense, a title without a page) are not
/// errors; they simply leave no tag or link behind. This type covers the
/// infrastructure failures that must abort the run: unreadable lexicon
/// files, a tagger that cannot be spawned, a reference service that is
/// unreachable, I/O during output.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Lexical database loading/parsing error.
    #[error("Lexicon error: {0}")]
    Lexicon(String),

    /// Entity tagger invocation failed.
    #[error("Tagger error: {0}")]
    Tagger(String),

    /// Reference service infrastructure failure.
    #[error("Reference service error: {0}")]
    Reference(String),
}

impl Error {
    /// Create a lexicon error.
    pub fn lexicon(msg: impl Into<String>) -> Self {
        Error::Lexicon(msg.into())
    }

    /// Create a tagger error.
    pub fn tagger(msg: impl Into<String>) -> Self {
        Error::Tagger(msg.into())
    }

    /// Create a reference service error.
    pub fn reference(msg: impl Into<String>) -> Self {
        Error::Reference(msg.into())
    }
}
