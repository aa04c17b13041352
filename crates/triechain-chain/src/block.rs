//! An immutable snapshot pairing a [`Header`] with an MPT snapshot (§4.2).

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use triechain_crypto::{render_hex, render_token, sha3_256};
use triechain_trie::Trie;

use crate::error::{ChainError, Result};

/// Block header: binds height, parent digest, timestamp, payload size, and
/// a self-digest derived from the other fields plus the trie root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub hash: String,
    #[serde(rename = "timeStamp")]
    pub timestamp: i64,
    pub height: i32,
    #[serde(rename = "parentHash")]
    pub parent_hash: String,
    pub size: i32,
}

/// A Block bundles a [`Header`] with the MPT it snapshots.
#[derive(Debug, Clone)]
pub struct Block {
    pub header: Header,
    pub mpt: Trie,
}

impl Block {
    /// Build a block using the current wall-clock time as its timestamp.
    pub fn new(parent_hash: impl Into<String>, height: i32, mpt: Trie) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before the Unix epoch")
            .as_secs() as i64;
        Self::with_timestamp(parent_hash, height, timestamp, mpt)
    }

    /// Build a block with an explicit timestamp, for deterministic tests.
    pub fn with_timestamp(
        parent_hash: impl Into<String>,
        height: i32,
        timestamp: i64,
        mpt: Trie,
    ) -> Self {
        let parent_hash = parent_hash.into();
        let size = mpt.dump().len() as i32;
        let hash = Self::compute_hash(height, timestamp, &parent_hash, &mpt, size);
        Block {
            header: Header {
                hash,
                timestamp,
                height,
                parent_hash,
                size,
            },
            mpt,
        }
    }

    fn compute_hash(height: i32, timestamp: i64, parent_hash: &str, mpt: &Trie, size: i32) -> String {
        let root_text = mpt.root().map(|r| render_token(&r)).unwrap_or_default();
        let concatenated = format!("{height}{timestamp}{parent_hash}{root_text}{size}");
        render_hex(&sha3_256(concatenated.as_bytes()))
    }

    /// Serialize to the flat JSON shape `{hash, timeStamp, height,
    /// parentHash, size, mpt:{k:v,...}}`. Keys and values are hex-encoded
    /// since the trie's keys/values are arbitrary bytes, not necessarily
    /// valid UTF-8 text.
    pub fn to_json(&self) -> Result<String> {
        let mut mpt = BTreeMap::new();
        for (k, v) in self.mpt.entries() {
            mpt.insert(hex::encode(k), hex::encode(v));
        }
        let dto = BlockJson {
            hash: self.header.hash.clone(),
            time_stamp: self.header.timestamp,
            height: self.header.height,
            parent_hash: self.header.parent_hash.clone(),
            size: self.header.size,
            mpt,
        };
        Ok(serde_json::to_string(&dto)?)
    }

    /// Decode a block previously produced by [`Block::to_json`]. Reinserts
    /// every `(key, value)` pair into a fresh trie; root is independent of
    /// the (unspecified) map iteration order used during insertion (P3).
    pub fn from_json(s: &str) -> Result<Block> {
        let dto: BlockJson = serde_json::from_str(s)?;
        let mut mpt = Trie::new();
        for (k, v) in &dto.mpt {
            let key = hex::decode(k).map_err(|_| {
                ChainError::DecodeFailure(serde::de::Error::custom("invalid hex key in mpt map"))
            })?;
            let value = hex::decode(v).map_err(|_| {
                ChainError::DecodeFailure(serde::de::Error::custom("invalid hex value in mpt map"))
            })?;
            mpt.insert(&key, &value);
        }
        Ok(Block {
            header: Header {
                hash: dto.hash,
                timestamp: dto.time_stamp,
                height: dto.height,
                parent_hash: dto.parent_hash,
                size: dto.size,
            },
            mpt,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct BlockJson {
    hash: String,
    #[serde(rename = "timeStamp")]
    time_stamp: i64,
    height: i32,
    #[serde(rename = "parentHash")]
    parent_hash: String,
    size: i32,
    mpt: BTreeMap<String, String>,
}
