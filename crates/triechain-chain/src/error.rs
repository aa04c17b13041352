//! Error kinds surfaced by the chain layer.

use thiserror::Error;
use triechain_trie::TrieError;

/// Errors produced by [`crate::Chain`] and [`crate::SyncedChain`] operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// A block with the same hash already exists at the target height.
    #[error("duplicate block hash at this height")]
    Duplicate,
    /// A chain insert was attempted with a negative height.
    #[error("height out of range")]
    HeightOutOfRange,
    /// A highest-block query was made against an empty chain.
    #[error("chain is empty")]
    Empty,
    /// Malformed JSON on chain/block decode.
    #[error("failed to decode JSON: {0}")]
    DecodeFailure(#[from] serde_json::Error),
    /// Propagated from the MPT snapshot backing a block.
    #[error(transparent)]
    Trie(#[from] TrieError),
}

/// Convenience alias for results returned by the chain layer.
pub type Result<T> = std::result::Result<T, ChainError>;
