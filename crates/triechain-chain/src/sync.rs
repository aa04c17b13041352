//! A mutual-exclusion wrapper around [`Chain`] (§4.3, §5). Every public
//! method acquires the lock for its full duration and releases on all exit
//! paths, giving sequential consistency over the chain for concurrent
//! callers — grounded on `original_source/p3/data/SyncBlockChain.go`'s
//! `sync.Mutex`-wrapped methods.

use parking_lot::Mutex;
use triechain_trie::Trie;

use crate::block::Block;
use crate::chain::Chain;
use crate::error::Result;

/// Coarse-grained, mutex-serialized facade over [`Chain`].
#[derive(Debug, Default)]
pub struct SyncedChain {
    inner: Mutex<Chain>,
}

impl SyncedChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(&self) -> i32 {
        self.inner.lock().length()
    }

    pub fn insert(&self, block: Block) -> Result<()> {
        self.inner.lock().insert(block)
    }

    pub fn get(&self, height: i32) -> Vec<Block> {
        self.inner.lock().get(height).to_vec()
    }

    pub fn get_highest(&self) -> Result<Vec<Block>> {
        self.inner.lock().get_highest().map(|blocks| blocks.to_vec())
    }

    pub fn check_parent_hash(&self, block: Block) -> Result<bool> {
        self.inner.lock().check_parent_hash(block)
    }

    pub fn gen_block(&self, mpt: Trie) -> Result<()> {
        self.inner.lock().gen_block(mpt)
    }

    pub fn encode_json(&self) -> Result<String> {
        self.inner.lock().encode_json()
    }

    /// Replace the wrapped chain with one decoded from JSON.
    pub fn decode_json(&self, s: &str) -> Result<()> {
        let decoded = Chain::decode_json(s)?;
        *self.inner.lock() = decoded;
        Ok(())
    }

    pub fn show(&self) -> String {
        self.inner.lock().show()
    }
}
