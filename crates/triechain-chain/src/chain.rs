//! Height-indexed multimap of blocks (§4.3).

use std::collections::HashMap;

use tracing::debug;
use triechain_trie::Trie;

use crate::block::Block;
use crate::error::{ChainError, Result};

/// A height-indexed multimap of blocks. Forks are represented naturally by
/// multiple blocks at the same height. Heights are 1-based externally
/// (§9 Open Questions); the internal map key is an implementation detail.
#[derive(Debug, Default)]
pub struct Chain {
    blocks: HashMap<i32, Vec<Block>>,
    length: i32,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The highest populated height, or 0 if the chain is empty.
    pub fn length(&self) -> i32 {
        self.length
    }

    /// Insert `block`. Fails with [`ChainError::Duplicate`] if a block with
    /// the same hash already exists at that height.
    pub fn insert(&mut self, block: Block) -> Result<()> {
        if block.header.height < 0 {
            return Err(ChainError::HeightOutOfRange);
        }
        let at_height = self.blocks.entry(block.header.height).or_default();
        if at_height.iter().any(|b| b.header.hash == block.header.hash) {
            return Err(ChainError::Duplicate);
        }
        debug!(height = block.header.height, hash = %block.header.hash, "chain insert");
        if block.header.height > self.length {
            self.length = block.header.height;
        }
        at_height.push(block);
        Ok(())
    }

    /// The list of blocks at `height` (possibly empty).
    pub fn get(&self, height: i32) -> &[Block] {
        self.blocks.get(&height).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The blocks at the current tip. Fails with [`ChainError::Empty`] if
    /// the chain has no blocks.
    pub fn get_highest(&self) -> Result<&[Block]> {
        if self.length == 0 {
            return Err(ChainError::Empty);
        }
        Ok(self.get(self.length))
    }

    /// Accept `block` iff some block at `height-1` has a hash equal to
    /// `block`'s parent hash, then insert. Returns `Ok(false)` (not an
    /// error) when no matching parent exists; propagates `Insert`'s own
    /// errors (e.g. `Duplicate`) when a match is found but the insert
    /// itself fails.
    pub fn check_parent_hash(&mut self, block: Block) -> Result<bool> {
        let parent_height = block.header.height - 1;
        let has_parent = self
            .get(parent_height)
            .iter()
            .any(|b| b.header.hash == block.header.parent_hash);
        if !has_parent {
            return Ok(false);
        }
        self.insert(block)?;
        Ok(true)
    }

    /// Create a new block at `length+1` whose parent is the hash of the
    /// first block at the current tip, and insert it.
    pub fn gen_block(&mut self, mpt: Trie) -> Result<()> {
        let tip = self.get_highest()?;
        let parent_hash = tip[0].header.hash.clone();
        let new_height = self.length + 1;
        let block = Block::new(parent_hash, new_height, mpt);
        self.insert(block)
    }

    /// Encode the whole chain as a JSON array of block objects.
    pub fn encode_json(&self) -> Result<String> {
        let mut all: Vec<&Block> = self.blocks.values().flatten().collect();
        all.sort_by(|a, b| a.header.height.cmp(&b.header.height).then(a.header.hash.cmp(&b.header.hash)));
        let parts: Result<Vec<String>> = all.iter().map(|b| b.to_json()).collect();
        Ok(format!("[{}]", parts?.join(",")))
    }

    /// Decode a chain encoded by [`Chain::encode_json`]. Each element is
    /// inserted individually, so duplicate-hash checks apply exactly as
    /// they would for a sequence of [`Chain::insert`] calls.
    pub fn decode_json(s: &str) -> Result<Chain> {
        let values: Vec<serde_json::Value> = serde_json::from_str(s)?;
        let mut chain = Chain::new();
        for value in values {
            let block = Block::from_json(&value.to_string())?;
            chain.insert(block)?;
        }
        Ok(chain)
    }

    /// A sorted, digested textual dump of the whole chain: one line per
    /// populated height (hashes sorted), plus a self-digest header line.
    /// Carried over from the original source's `Show` as a debugging and
    /// test-oracle tool (§2).
    pub fn show(&self) -> String {
        let mut heights: Vec<&i32> = self.blocks.keys().collect();
        heights.sort();
        let mut body = String::new();
        for height in heights {
            let mut hashes: Vec<&str> = self.blocks[height]
                .iter()
                .map(|b| b.header.hash.as_str())
                .collect();
            hashes.sort();
            body.push_str(&format!("height={height}: {}\n", hashes.join(", ")));
        }
        let digest = triechain_crypto::render_hex(&triechain_crypto::sha3_256(body.as_bytes()));
        format!("digest={digest}\n{body}")
    }
}
