//! Hashing primitives shared by the trie and chain layers.
//!
//! A single SHA3-256 digest type is used throughout triechain to
//! content-address trie nodes and to derive block header hashes. This
//! mirrors `luxtensor-crypto`'s `keccak256`/`sha256` helpers, swapped for
//! SHA3-256 to match the source algorithm being reproduced.

use sha3::{Digest as _, Sha3_256};

/// A 256-bit cryptographic digest.
pub type Digest = [u8; 32];

/// Digest of the empty byte string. This is the canonical digest of the
/// `Empty` trie node.
pub fn empty_digest() -> Digest {
    sha3_256(b"")
}

/// Hash arbitrary bytes with SHA3-256.
pub fn sha3_256(data: &[u8]) -> Digest {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    let out = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&out);
    digest
}

/// Opening sentinel that brackets a digest in a textual dump.
pub const TOKEN_PREFIX: &str = "HashStart_";
/// Closing sentinel that brackets a digest in a textual dump.
pub const TOKEN_SUFFIX: &str = "_HashEnd";

/// Render a digest as the delimited hex token used in textual dumps:
/// `HashStart_<64 lowercase hex chars>_HashEnd`.
pub fn render_token(digest: &Digest) -> String {
    format!("{TOKEN_PREFIX}{}{TOKEN_SUFFIX}", hex::encode(digest))
}

/// Parse a token previously produced by [`render_token`]. Returns `None`
/// if `s` is not exactly a well-formed token.
pub fn parse_token(s: &str) -> Option<Digest> {
    let inner = s.strip_prefix(TOKEN_PREFIX)?.strip_suffix(TOKEN_SUFFIX)?;
    if inner.len() != 64 {
        return None;
    }
    let bytes = hex::decode(inner).ok()?;
    bytes.try_into().ok()
}

/// Render a digest as bare lowercase hex with no delimiters (used by block
/// header hashes, which are not stored in the node-digest token format).
pub fn render_hex(digest: &Digest) -> String {
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_digest_is_stable() {
        assert_eq!(empty_digest(), sha3_256(b""));
    }

    #[test]
    fn token_round_trips() {
        let d = sha3_256(b"hello world");
        let token = render_token(&d);
        assert!(token.starts_with(TOKEN_PREFIX));
        assert!(token.ends_with(TOKEN_SUFFIX));
        assert_eq!(parse_token(&token), Some(d));
    }

    #[test]
    fn parse_token_rejects_garbage() {
        assert_eq!(parse_token("not a token"), None);
        assert_eq!(parse_token("HashStart__HashEnd"), None);
    }

    #[test]
    fn distinct_inputs_hash_differently() {
        assert_ne!(sha3_256(b"a"), sha3_256(b"b"));
    }
}
