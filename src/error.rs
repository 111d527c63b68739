//! Error type for the safe slice API and the known-answer self test.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VectorError {
    /// Fewer than 16 bytes are available at `offset`.
    #[error("need 16 bytes at offset {offset}, buffer holds {len}")]
    BufferTooShort { offset: usize, len: usize },

    /// A known-answer check produced the wrong result.
    #[error("known-answer check `{check}` failed: expected {expected}, got {actual}")]
    KnownAnswerMismatch {
        check: &'static str,
        expected: String,
        actual: String,
    },

    /// The requested primitive needs a tier that was not enabled at build time.
    #[error("tier `{0}` is not enabled in this build")]
    TierUnavailable(crate::capability::Tier),
}

pub type Result<T> = std::result::Result<T, VectorError>;
