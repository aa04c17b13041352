//! The tagged node variant that replaces the source's numeric-discriminant
//! struct (§9 design note). A flat `digest -> Node` map is the entire store;
//! no back-pointers or cycles are possible.

use triechain_crypto::{render_token, sha3_256, Digest};

/// Number of addressable slots in a Branch, excluding the inline value.
pub const BRANCH_WIDTH: usize = 16;

/// One node in the trie. Paths are stored decoded (plain nibbles, no
/// terminator) rather than compact-encoded; the compact byte layout in
/// [`crate::codec`] is an external contract, not this type's storage format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Absent node. Never stored; only ever a transient return value.
    Empty,
    /// 17-slot branch: 16 child links plus an inline terminal value.
    Branch {
        children: Box<[Option<Digest>; BRANCH_WIDTH]>,
        value: Option<Vec<u8>>,
    },
    /// Shared-prefix node whose child is always a Branch (invariant I3).
    Extension { path: Vec<u8>, child: Digest },
    /// Terminal node holding a value at the end of its path.
    Leaf { path: Vec<u8>, value: Vec<u8> },
}

impl Node {
    /// Build an empty Branch (no children, no value).
    pub fn empty_branch() -> Self {
        Node::Branch {
            children: Box::new([None; BRANCH_WIDTH]),
            value: None,
        }
    }

    /// Digest over this node's canonical content (§4.1). Extension and Leaf
    /// digests deliberately omit the encoded path from their input; this is
    /// an idiosyncrasy of the algorithm being reproduced, not an oversight.
    pub fn hash(&self) -> Digest {
        match self {
            Node::Empty => triechain_crypto::empty_digest(),
            Node::Branch { children, value } => {
                let mut buf = Vec::with_capacity(7 + BRANCH_WIDTH * 74);
                buf.extend_from_slice(b"branch_");
                for child in children.iter() {
                    if let Some(digest) = child {
                        buf.extend_from_slice(render_token(digest).as_bytes());
                    }
                }
                if let Some(v) = value {
                    buf.extend_from_slice(v);
                }
                sha3_256(&buf)
            }
            Node::Leaf { value, .. } => sha3_256(value),
            Node::Extension { child, .. } => sha3_256(render_token(child).as_bytes()),
        }
    }

    /// Render in the node text form used by dumps and tests (§6).
    pub fn to_text(&self) -> String {
        match self {
            Node::Empty => "Empty".to_string(),
            Node::Leaf { path, value } => format!(
                "Leaf<{:?}, value=\"{}\">",
                path,
                String::from_utf8_lossy(value)
            ),
            Node::Extension { path, child } => {
                format!("Ext<{:?}, value=\"{}\">", path, render_token(child))
            }
            Node::Branch { children, value } => {
                let mut parts = Vec::with_capacity(BRANCH_WIDTH);
                for (i, child) in children.iter().enumerate() {
                    let rendered = child.map(|d| render_token(&d)).unwrap_or_default();
                    parts.push(format!("{i}=\"{rendered}\""));
                }
                let value_text = value
                    .as_ref()
                    .map(|v| String::from_utf8_lossy(v).into_owned())
                    .unwrap_or_default();
                format!("Branch[{}, value={}]", parts.join(", "), value_text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_digest_matches_crypto_empty() {
        assert_eq!(Node::Empty.hash(), triechain_crypto::empty_digest());
    }

    #[test]
    fn leaf_digest_ignores_path() {
        let a = Node::Leaf {
            path: vec![1, 2, 3],
            value: b"x".to_vec(),
        };
        let b = Node::Leaf {
            path: vec![9],
            value: b"x".to_vec(),
        };
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn leaf_digest_depends_on_value() {
        let a = Node::Leaf {
            path: vec![1],
            value: b"x".to_vec(),
        };
        let b = Node::Leaf {
            path: vec![1],
            value: b"y".to_vec(),
        };
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn branch_digest_depends_on_children_and_value() {
        let mut a = Node::empty_branch();
        let mut b = Node::empty_branch();
        if let Node::Branch { children, .. } = &mut a {
            children[3] = Some(triechain_crypto::sha3_256(b"child"));
        }
        assert_ne!(a.hash(), b.hash());
        if let Node::Branch { value, .. } = &mut b {
            *value = Some(b"v".to_vec());
        }
        assert_ne!(a.hash(), b.hash());
    }
}
