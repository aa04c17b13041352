//! A persistent, hash-addressed, radix-16 Merkle Patricia Trie.
//!
//! Every structural mutation produces a new root digest that authenticates
//! the entire contained key/value set. See [`Trie`] for the public surface.

pub mod codec;
pub mod error;
pub mod nibble;
pub mod node;
pub mod store;
#[allow(clippy::module_inception)]
mod trie;

pub use error::{Result, TrieError};
pub use node::Node;
pub use store::NodeStore;
pub use trie::Trie;
