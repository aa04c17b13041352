//! Error kinds surfaced by the trie core.

use thiserror::Error;

/// Errors produced by [`crate::Trie`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrieError {
    /// The operation requires a root but the trie is empty.
    #[error("trie has no root")]
    Uninitialized,
    /// An empty key was passed where a non-empty key is required.
    #[error("empty key")]
    MissingKey,
}

/// Convenience alias for results returned by the trie core.
pub type Result<T> = std::result::Result<T, TrieError>;
