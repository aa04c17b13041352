//! Block and chain layers built atop [`triechain_trie::Trie`]: an immutable
//! (Header, MPT snapshot) pair, a height-indexed multimap of blocks with
//! fork-tolerant insert, and a mutex-serialized facade over it (§4.2, §4.3).

pub mod block;
pub mod chain;
pub mod error;
pub mod sync;

pub use block::{Block, Header};
pub use chain::Chain;
pub use error::{ChainError, Result};
pub use sync::SyncedChain;
