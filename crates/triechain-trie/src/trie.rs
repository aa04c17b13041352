//! The Merkle Patricia Trie itself: `Get`/`Insert`/`Delete` over the node
//! store, plus the shadow map, `Clone`, and the textual dump helpers.

use std::collections::{HashMap, VecDeque};

use tracing::trace;
use triechain_crypto::{render_token, Digest};

use crate::error::{Result, TrieError};
use crate::nibble::{bytes_to_nibbles, common_prefix_len};
use crate::node::Node;

use crate::store::NodeStore;

/// Outcome of a recursive delete: `Miss` if the key was not found in this
/// subtree (the subtree is returned untouched by the caller); `Found`
/// carries the removed value and the subtree's replacement digest, where
/// `None` means the subtree has collapsed entirely to nothing.
enum DeleteOutcome {
    Miss,
    Found(Vec<u8>, Option<Digest>),
}

/// A persistent, hash-addressed radix-16 trie mapping byte keys to byte
/// values (§3). Not thread-safe: callers needing concurrent access must
/// provide their own synchronization (§5), as `triechain-chain` does at the
/// block-chain layer.
#[derive(Debug, Default)]
pub struct Trie {
    root: Option<Digest>,
    store: NodeStore,
    shadow: HashMap<Vec<u8>, Vec<u8>>,
}

impl Trie {
    /// An empty trie: no root, no stored nodes.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current root digest, or `None` if the trie is empty.
    pub fn root(&self) -> Option<Digest> {
        self.root
    }

    /// Number of nodes physically present in the store.
    pub fn store_len(&self) -> usize {
        self.store.len()
    }

    /// Number of distinct keys tracked by the shadow map.
    pub fn len(&self) -> usize {
        self.shadow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shadow.is_empty()
    }

    /// Shared view of the shadow map, e.g. for JSON encoding.
    pub fn entries(&self) -> impl Iterator<Item = (&Vec<u8>, &Vec<u8>)> {
        self.shadow.iter()
    }

    /// Look up a node directly by digest, bypassing key traversal. Used by
    /// test oracles (e.g. checking for orphaned store entries) and by
    /// debugging tools; not part of the key/value API.
    pub fn node_at(&self, digest: &Digest) -> Option<&Node> {
        self.store.get(digest)
    }

    fn put(&mut self, node: Node) -> Digest {
        let digest = node.hash();
        self.store.insert(digest, node);
        digest
    }

    fn refresh(&mut self, old: Digest, node: Node) -> Digest {
        self.store.remove(&old);
        self.put(node)
    }

    // ---------------------------------------------------------------
    // Get
    // ---------------------------------------------------------------

    /// Look up `key`. Returns the empty byte string if the key is absent.
    /// Fails with [`TrieError::Uninitialized`] if the trie has no root.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let root = self.root.ok_or(TrieError::Uninitialized)?;
        let nibbles = bytes_to_nibbles(key);
        Ok(self.recurse_get(root, &nibbles))
    }

    fn recurse_get(&self, hash: Digest, key: &[u8]) -> Vec<u8> {
        match self.store.get(&hash) {
            None | Some(Node::Empty) => Vec::new(),
            Some(Node::Branch { children, value }) => {
                if key.is_empty() {
                    value.clone().unwrap_or_default()
                } else {
                    match children[key[0] as usize] {
                        None => Vec::new(),
                        Some(child) => self.recurse_get(child, &key[1..]),
                    }
                }
            }
            Some(Node::Leaf { path, value }) => {
                if path.as_slice() == key {
                    value.clone()
                } else {
                    Vec::new()
                }
            }
            Some(Node::Extension { path, child }) => {
                if key.starts_with(path.as_slice()) {
                    self.recurse_get(*child, &key[path.len()..])
                } else {
                    Vec::new()
                }
            }
        }
    }

    // ---------------------------------------------------------------
    // Insert
    // ---------------------------------------------------------------

    /// Insert `(key, value)`. A no-op if either is empty (§4.1).
    pub fn insert(&mut self, key: &[u8], value: &[u8]) {
        if key.is_empty() || value.is_empty() {
            return;
        }
        let nibbles = bytes_to_nibbles(key);
        let new_root = match self.root {
            None => self.put(Node::Leaf {
                path: nibbles,
                value: value.to_vec(),
            }),
            Some(root) => self.recurse_insert(root, &nibbles, value),
        };
        self.root = Some(new_root);
        self.shadow.insert(key.to_vec(), value.to_vec());
        trace!(root = %render_token(&new_root), "trie insert");
    }

    fn recurse_insert(&mut self, hash: Digest, key: &[u8], value: &[u8]) -> Digest {
        let node = self
            .store
            .get(&hash)
            .cloned()
            .expect("digest reachable from root must be present in store (I1/I2)");
        match node {
            Node::Empty => unreachable!("Empty is never stored"),
            Node::Branch { mut children, value: bvalue } => {
                if key.is_empty() {
                    self.refresh(
                        hash,
                        Node::Branch {
                            children,
                            value: Some(value.to_vec()),
                        },
                    )
                } else {
                    let idx = key[0] as usize;
                    let new_child = match children[idx] {
                        None => self.put(Node::Leaf {
                            path: key[1..].to_vec(),
                            value: value.to_vec(),
                        }),
                        Some(child) => self.recurse_insert(child, &key[1..], value),
                    };
                    children[idx] = Some(new_child);
                    self.refresh(hash, Node::Branch { children, value: bvalue })
                }
            }
            Node::Leaf { path, value: old_value } => {
                self.insert_into_leaf(hash, path, old_value, key, value)
            }
            Node::Extension { path, child } => {
                self.insert_into_extension(hash, path, child, key, value)
            }
        }
    }

    fn insert_into_leaf(
        &mut self,
        hash: Digest,
        path: Vec<u8>,
        old_value: Vec<u8>,
        key: &[u8],
        value: &[u8],
    ) -> Digest {
        let same = common_prefix_len(&path, key);

        // Leaf | paths equal -> overwrite value.
        if same == path.len() && same == key.len() {
            return self.refresh(
                hash,
                Node::Leaf {
                    path,
                    value: value.to_vec(),
                },
            );
        }

        self.store.remove(&hash);

        // Leaf | no common prefix, key empty -> split, no ext wrap (same==0
        // is forced here since key.is_empty() implies same==0).
        if key.is_empty() {
            let shrunk = self.put(Node::Leaf {
                path: path[1..].to_vec(),
                value: old_value,
            });
            let mut branch = Node::empty_branch();
            if let Node::Branch { children, value: bvalue } = &mut branch {
                children[path[0] as usize] = Some(shrunk);
                *bvalue = Some(value.to_vec());
            }
            return self.put(branch);
        }

        let mut branch = Node::empty_branch();

        // Leaf | same == len(leaf path): branch value = leaf value, key's
        // residual becomes a Leaf.
        if same == path.len() {
            let new_leaf = self.put(Node::Leaf {
                path: key[same + 1..].to_vec(),
                value: value.to_vec(),
            });
            if let Node::Branch { children, value: bvalue } = &mut branch {
                children[key[same] as usize] = Some(new_leaf);
                *bvalue = Some(old_value);
            }
        }
        // Leaf | same == len(key): branch value = new value, leaf's
        // residual becomes a shrunk Leaf.
        else if same == key.len() {
            let shrunk = self.put(Node::Leaf {
                path: path[same + 1..].to_vec(),
                value: old_value,
            });
            if let Node::Branch { children, value: bvalue } = &mut branch {
                children[path[same] as usize] = Some(shrunk);
                *bvalue = Some(value.to_vec());
            }
        }
        // Leaf | partial overlap, both residuals non-empty.
        else {
            let new_leaf = self.put(Node::Leaf {
                path: key[same + 1..].to_vec(),
                value: value.to_vec(),
            });
            let shrunk = self.put(Node::Leaf {
                path: path[same + 1..].to_vec(),
                value: old_value,
            });
            if let Node::Branch { children, .. } = &mut branch {
                children[key[same] as usize] = Some(new_leaf);
                children[path[same] as usize] = Some(shrunk);
            }
        }

        let branch_hash = self.put(branch);
        if same == 0 {
            branch_hash
        } else {
            self.put(Node::Extension {
                path: path[..same].to_vec(),
                child: branch_hash,
            })
        }
    }

    fn insert_into_extension(
        &mut self,
        hash: Digest,
        path: Vec<u8>,
        child: Digest,
        key: &[u8],
        value: &[u8],
    ) -> Digest {
        let same = common_prefix_len(&path, key);

        if same == path.len() {
            // Extension fully consumed; recurse into the (always-Branch)
            // child with the remainder.
            let new_child = self.recurse_insert(child, &key[same..], value);
            return self.refresh(hash, Node::Extension { path, child: new_child });
        }

        self.store.remove(&hash);

        if same == 0 {
            let mut branch = Node::empty_branch();
            if key.is_empty() {
                if let Node::Branch { value: bvalue, .. } = &mut branch {
                    *bvalue = Some(value.to_vec());
                }
            } else {
                let new_leaf = self.put(Node::Leaf {
                    path: key[1..].to_vec(),
                    value: value.to_vec(),
                });
                if let Node::Branch { children, .. } = &mut branch {
                    children[key[0] as usize] = Some(new_leaf);
                }
            }
            let branch_pos = path[0] as usize;
            if path.len() <= 1 {
                if let Node::Branch { children, .. } = &mut branch {
                    children[branch_pos] = Some(child);
                }
            } else {
                let shrunk = self.put(Node::Extension {
                    path: path[1..].to_vec(),
                    child,
                });
                if let Node::Branch { children, .. } = &mut branch {
                    children[branch_pos] = Some(shrunk);
                }
            }
            return self.put(branch);
        }

        // 0 < same < path.len(): the old child is reached either directly
        // (if the split leaves exactly one nibble of the old extension) or
        // via a new Extension wrapping the remaining old nibbles. Key
        // exhaustion is checked uniformly regardless of which applies —
        // the original algorithm checked it only in the general branch,
        // which could index one past the end of an exhausted key when the
        // split also landed on the extension's second-to-last nibble; this
        // rewrite folds both paths through the same exhaustion check.
        let old_target = if same == path.len() - 1 {
            child
        } else {
            self.put(Node::Extension {
                path: path[same + 1..].to_vec(),
                child,
            })
        };

        let mut branch = Node::empty_branch();
        if key.len() == same {
            if let Node::Branch { children, value: bvalue } = &mut branch {
                children[path[same] as usize] = Some(old_target);
                *bvalue = Some(value.to_vec());
            }
        } else {
            let new_leaf = self.put(Node::Leaf {
                path: key[same + 1..].to_vec(),
                value: value.to_vec(),
            });
            if let Node::Branch { children, .. } = &mut branch {
                children[key[same] as usize] = Some(new_leaf);
                children[path[same] as usize] = Some(old_target);
            }
        }
        let branch_hash = self.put(branch);
        self.put(Node::Extension {
            path: path[..same].to_vec(),
            child: branch_hash,
        })
    }

    // ---------------------------------------------------------------
    // Delete
    // ---------------------------------------------------------------

    /// Delete `key`. Returns the removed value, or the empty byte string on
    /// a miss (no error). Fails with [`TrieError::MissingKey`] on an empty
    /// key and [`TrieError::Uninitialized`] on an empty trie.
    pub fn delete(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        if key.is_empty() {
            return Err(TrieError::MissingKey);
        }
        let root = self.root.ok_or(TrieError::Uninitialized)?;
        let nibbles = bytes_to_nibbles(key);
        match self.recurse_delete(root, &nibbles) {
            DeleteOutcome::Miss => Ok(Vec::new()),
            DeleteOutcome::Found(value, new_root) => {
                self.root = new_root;
                if new_root.is_none() {
                    self.store.clear();
                }
                self.shadow.remove(key);
                Ok(value)
            }
        }
    }

    fn recurse_delete(&mut self, hash: Digest, key: &[u8]) -> DeleteOutcome {
        let node = self
            .store
            .get(&hash)
            .cloned()
            .expect("digest reachable from root must be present in store (I1/I2)");
        match node {
            Node::Empty => unreachable!("Empty is never stored"),
            Node::Leaf { path, value } => {
                if path.as_slice() == key {
                    self.store.remove(&hash);
                    DeleteOutcome::Found(value, None)
                } else {
                    DeleteOutcome::Miss
                }
            }
            Node::Extension { path, child } => {
                if !key.starts_with(path.as_slice()) {
                    return DeleteOutcome::Miss;
                }
                match self.recurse_delete(child, &key[path.len()..]) {
                    DeleteOutcome::Miss => DeleteOutcome::Miss,
                    DeleteOutcome::Found(value, child_result) => {
                        self.store.remove(&hash);
                        match child_result {
                            None => DeleteOutcome::Found(value, None),
                            Some(new_child) => {
                                let replacement = self.absorb_extension_child(path, new_child);
                                DeleteOutcome::Found(value, Some(replacement))
                            }
                        }
                    }
                }
            }
            Node::Branch { children, value } => {
                if key.is_empty() {
                    self.delete_branch_value(hash, children, value)
                } else {
                    let idx = key[0] as usize;
                    match children[idx] {
                        None => DeleteOutcome::Miss,
                        Some(child_digest) => {
                            self.delete_via_branch_child(hash, children, value, idx, child_digest, &key[1..])
                        }
                    }
                }
            }
        }
    }

    /// After a child's recursive delete came back as `Some(new_child)`,
    /// fold the child into `path` if it collapsed to an Extension or Leaf,
    /// or just rewire if it's still a Branch.
    fn absorb_extension_child(&mut self, path: Vec<u8>, new_child: Digest) -> Digest {
        let child_node = self
            .store
            .get(&new_child)
            .cloned()
            .expect("newly produced child digest must be present in store");
        match child_node {
            Node::Extension { path: child_path, child: grandchild } => {
                self.store.remove(&new_child);
                let merged_path = [path, child_path].concat();
                self.put(Node::Extension { path: merged_path, child: grandchild })
            }
            Node::Leaf { path: child_path, value } => {
                self.store.remove(&new_child);
                let merged_path = [path, child_path].concat();
                self.put(Node::Leaf { path: merged_path, value })
            }
            Node::Branch { .. } => self.put(Node::Extension { path, child: new_child }),
            Node::Empty => unreachable!("Empty is never stored"),
        }
    }

    /// Branch, key exhausted: clear slot[16]; collapse if exactly one child
    /// remains.
    fn delete_branch_value(
        &mut self,
        hash: Digest,
        children: Box<[Option<Digest>; 16]>,
        value: Option<Vec<u8>>,
    ) -> DeleteOutcome {
        let value = match value {
            Some(v) => v,
            None => return DeleteOutcome::Miss,
        };
        self.store.remove(&hash);
        let live: Vec<(usize, Digest)> = children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|d| (i, d)))
            .collect();
        match live.len() {
            0 => DeleteOutcome::Found(value, None),
            1 => {
                let (idx, child) = live[0];
                let promoted = self.promote_child(idx, child);
                DeleteOutcome::Found(value, Some(promoted))
            }
            _ => {
                let new_branch = self.put(Node::Branch { children, value: None });
                DeleteOutcome::Found(value, Some(new_branch))
            }
        }
    }

    /// Branch, recurse: descend into `children[idx]`, then re-canonicalize
    /// according to the surviving population if that child vanished
    /// entirely.
    #[allow(clippy::too_many_arguments)]
    fn delete_via_branch_child(
        &mut self,
        hash: Digest,
        mut children: Box<[Option<Digest>; 16]>,
        value: Option<Vec<u8>>,
        idx: usize,
        child_digest: Digest,
        rest: &[u8],
    ) -> DeleteOutcome {
        match self.recurse_delete(child_digest, rest) {
            DeleteOutcome::Miss => DeleteOutcome::Miss,
            DeleteOutcome::Found(removed_value, child_result) => {
                self.store.remove(&hash);
                match child_result {
                    Some(new_child) => {
                        children[idx] = Some(new_child);
                        let new_branch = self.put(Node::Branch { children, value });
                        DeleteOutcome::Found(removed_value, Some(new_branch))
                    }
                    None => {
                        children[idx] = None;
                        let remaining: Vec<(usize, Digest)> = children
                            .iter()
                            .enumerate()
                            .filter_map(|(i, c)| c.map(|d| (i, d)))
                            .collect();
                        let new_root = match remaining.len() {
                            0 => match value {
                                Some(v) => self.put(Node::Leaf { path: Vec::new(), value: v }),
                                None => {
                                    return DeleteOutcome::Found(removed_value, None);
                                }
                            },
                            1 if value.is_none() => {
                                let (ci, cd) = remaining[0];
                                self.promote_child(ci, cd)
                            }
                            _ => self.put(Node::Branch { children, value }),
                        };
                        DeleteOutcome::Found(removed_value, Some(new_root))
                    }
                }
            }
        }
    }

    /// Promote the sole surviving child of a collapsing Branch, prepending
    /// `idx` to its path. Leaf/Extension digests are unaffected by path
    /// changes (§4.1), so promotion rewrites the stored node in place for
    /// those kinds; a Branch child must be wrapped in a length-1 Extension
    /// since it has no path field of its own.
    fn promote_child(&mut self, idx: usize, child: Digest) -> Digest {
        let node = self
            .store
            .get(&child)
            .cloned()
            .expect("sole surviving child digest must be present in store");
        match node {
            Node::Leaf { path, value } => {
                let mut new_path = Vec::with_capacity(path.len() + 1);
                new_path.push(idx as u8);
                new_path.extend_from_slice(&path);
                self.store.insert(child, Node::Leaf { path: new_path, value });
                child
            }
            Node::Extension { path, child: grandchild } => {
                let mut new_path = Vec::with_capacity(path.len() + 1);
                new_path.push(idx as u8);
                new_path.extend_from_slice(&path);
                self.store.insert(
                    child,
                    Node::Extension { path: new_path, child: grandchild },
                );
                child
            }
            Node::Branch { .. } => self.put(Node::Extension { path: vec![idx as u8], child }),
            Node::Empty => unreachable!("Empty is never stored"),
        }
    }

    // ---------------------------------------------------------------
    // Shadow map / Clone / dumps
    // ---------------------------------------------------------------

    /// Textual dump: one `ROOT=` line followed by one line per stored node,
    /// in the store's (unspecified) iteration order. Primarily useful for
    /// inspection; use [`Trie::ordered_dump`] when comparing two tries.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        out.push_str("ROOT=");
        if let Some(root) = self.root {
            out.push_str(&render_token(&root));
        }
        out.push('\n');
        for (digest, node) in self.store.iter() {
            out.push_str(&render_token(digest));
            out.push_str(": ");
            out.push_str(&node.to_text());
            out.push('\n');
        }
        out
    }

    /// A BFS-from-root dump with position-stable `HashN:` labels instead of
    /// the store's nondeterministic iteration order — a test oracle for
    /// comparing two tries structurally.
    pub fn ordered_dump(&self) -> String {
        let mut out = String::new();
        let mut queue = VecDeque::new();
        if let Some(root) = self.root {
            queue.push_back(root);
        }
        let mut seen = std::collections::HashSet::new();
        let mut label = 0usize;
        while let Some(digest) = queue.pop_front() {
            if !seen.insert(digest) {
                continue;
            }
            let Some(node) = self.store.get(&digest) else {
                continue;
            };
            out.push_str(&format!("Hash{label}: {}\n", node.to_text()));
            label += 1;
            match node {
                Node::Branch { children, .. } => {
                    for child in children.iter().flatten() {
                        queue.push_back(*child);
                    }
                }
                Node::Extension { child, .. } => queue.push_back(*child),
                Node::Leaf { .. } | Node::Empty => {}
            }
        }
        out
    }
}

impl Clone for Trie {
    /// Replays the shadow map into a fresh trie. There is no structural
    /// sharing between the original and the clone (§4.1).
    fn clone(&self) -> Self {
        let mut new_trie = Trie::new();
        for (k, v) in &self.shadow {
            new_trie.insert(k, v);
        }
        new_trie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_on_empty_trie_is_uninitialized() {
        let trie = Trie::new();
        assert_eq!(trie.get(b"x"), Err(TrieError::Uninitialized));
    }

    #[test]
    fn delete_on_empty_trie_is_uninitialized() {
        let mut trie = Trie::new();
        assert_eq!(trie.delete(b"x"), Err(TrieError::Uninitialized));
    }

    #[test]
    fn delete_empty_key_is_missing_key() {
        let mut trie = Trie::new();
        trie.insert(b"a", b"1");
        assert_eq!(trie.delete(b""), Err(TrieError::MissingKey));
    }

    #[test]
    fn insert_and_get_round_trip() {
        let mut trie = Trie::new();
        trie.insert(b"do", b"verb");
        trie.insert(b"dog", b"puppy");
        trie.insert(b"doge", b"coin");
        trie.insert(b"horse", b"stallion");

        assert_eq!(trie.get(b"do").unwrap(), b"verb");
        assert_eq!(trie.get(b"dog").unwrap(), b"puppy");
        assert_eq!(trie.get(b"doge").unwrap(), b"coin");
        assert_eq!(trie.get(b"horse").unwrap(), b"stallion");
        assert_eq!(trie.get(b"cat").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn scenario_one_delete_preserves_siblings() {
        let mut trie = Trie::new();
        trie.insert(b"do", b"verb");
        trie.insert(b"dog", b"puppy");
        trie.insert(b"doge", b"coin");
        trie.insert(b"horse", b"stallion");

        let removed = trie.delete(b"doge").unwrap();
        assert_eq!(removed, b"coin");
        assert_eq!(trie.get(b"do").unwrap(), b"verb");
        assert_eq!(trie.get(b"dog").unwrap(), b"puppy");
        assert_eq!(trie.get(b"horse").unwrap(), b"stallion");
        assert_eq!(trie.get(b"doge").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn delete_miss_returns_empty_without_error() {
        let mut trie = Trie::new();
        trie.insert(b"a", b"1");
        assert_eq!(trie.delete(b"nope").unwrap(), Vec::<u8>::new());
        assert_eq!(trie.get(b"a").unwrap(), b"1");
    }

    // A Branch holding both an inline value (at "do") and a single child
    // (at "dog") collapses on deleting the child: the surviving value must
    // become a bare Leaf with an *empty* path, since the inline value was
    // already a terminal match for the full key at the branch, not a
    // promoted child. Regression for a bug that prepended a spurious nibble
    // here and dropped "do" from the trie.
    #[test]
    fn delete_child_preserves_sibling_inline_value() {
        let mut trie = Trie::new();
        trie.insert(b"do", b"verb");
        trie.insert(b"dog", b"puppy");

        let removed = trie.delete(b"dog").unwrap();
        assert_eq!(removed, b"puppy");
        assert_eq!(trie.get(b"do").unwrap(), b"verb");
        assert_eq!(trie.get(b"dog").unwrap(), Vec::<u8>::new());
    }

    // Symmetric case: deleting the inline value must preserve the lone
    // surviving child.
    #[test]
    fn delete_inline_value_preserves_sole_child() {
        let mut trie = Trie::new();
        trie.insert(b"do", b"verb");
        trie.insert(b"dog", b"puppy");

        let removed = trie.delete(b"do").unwrap();
        assert_eq!(removed, b"verb");
        assert_eq!(trie.get(b"dog").unwrap(), b"puppy");
        assert_eq!(trie.get(b"do").unwrap(), Vec::<u8>::new());
    }

    // P1: round-trip.
    #[test]
    fn property_round_trip() {
        let mut trie = Trie::new();
        let pairs = [("k1", "v1"), ("k2", "v2"), ("k1", "v3")];
        for (k, v) in pairs {
            trie.insert(k.as_bytes(), v.as_bytes());
        }
        assert_eq!(trie.get(b"k1").unwrap(), b"v3");
        assert_eq!(trie.get(b"k2").unwrap(), b"v2");
        assert_eq!(trie.get(b"missing").unwrap(), Vec::<u8>::new());
    }

    // P2: insert idempotence.
    #[test]
    fn property_insert_idempotence() {
        let mut once = Trie::new();
        once.insert(b"key", b"value");

        let mut twice = Trie::new();
        twice.insert(b"key", b"value");
        twice.insert(b"key", b"value");

        assert_eq!(once.root(), twice.root());
        assert_eq!(once.store_len(), twice.store_len());
    }

    // P3 / scenario 3: order independence of root.
    #[test]
    fn property_order_independence() {
        let pairs = [("a", "1"), ("ab", "2"), ("abc", "3")];
        let mut roots = Vec::new();
        let mut perm = pairs.to_vec();
        let permutations = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        for order in permutations {
            let mut trie = Trie::new();
            for &i in &order {
                let (k, v) = perm[i];
                trie.insert(k.as_bytes(), v.as_bytes());
            }
            roots.push(trie.root());
        }
        perm.clear();
        assert!(roots.iter().all(|r| *r == roots[0]));
    }

    // P4: delete inverse.
    #[test]
    fn property_delete_inverse() {
        let mut trie = Trie::new();
        trie.insert(b"do", b"verb");
        trie.insert(b"dog", b"puppy");
        let root_before = trie.root();
        let store_before = trie.store_len();

        trie.insert(b"doge", b"coin");
        trie.delete(b"doge").unwrap();

        assert_eq!(trie.root(), root_before);
        assert_eq!(trie.store_len(), store_before);
    }

    // P5: empty after full deletion.
    #[test]
    fn property_empty_after_full_deletion() {
        let mut trie = Trie::new();
        trie.insert(b"do", b"verb");
        trie.insert(b"dog", b"puppy");
        trie.insert(b"doge", b"coin");

        trie.delete(b"do").unwrap();
        trie.delete(b"dog").unwrap();
        trie.delete(b"doge").unwrap();

        assert_eq!(trie.root(), None);
        assert_eq!(trie.store_len(), 0);
    }

    // Scenario 4: delete collapse.
    #[test]
    fn scenario_four_delete_collapse() {
        let mut trie = Trie::new();
        trie.insert(b"ab", b"x");
        trie.insert(b"ac", b"y");

        trie.delete(b"ab").unwrap();

        assert_eq!(trie.store_len(), 1);
        let root = trie.root().unwrap();
        match trie.store.get(&root).unwrap() {
            Node::Leaf { path, value } => {
                assert_eq!(path, &bytes_to_nibbles(b"ac"));
                assert_eq!(value, b"y");
            }
            other => panic!("expected a bare Leaf at the root, got {other:?}"),
        }
    }

    // P7: no orphans.
    #[test]
    fn property_no_orphans() {
        let mut trie = Trie::new();
        for (k, v) in [("do", "verb"), ("dog", "puppy"), ("doge", "coin"), ("horse", "stallion")] {
            trie.insert(k.as_bytes(), v.as_bytes());
            assert_no_orphans(&trie);
        }
        trie.delete(b"doge").unwrap();
        assert_no_orphans(&trie);
        trie.delete(b"do").unwrap();
        assert_no_orphans(&trie);
    }

    fn assert_no_orphans(trie: &Trie) {
        let mut reachable = std::collections::HashSet::new();
        let mut queue = VecDeque::new();
        if let Some(root) = trie.root() {
            queue.push_back(root);
        }
        while let Some(d) = queue.pop_front() {
            if !reachable.insert(d) {
                continue;
            }
            let node = trie.store.get(&d).expect("every referenced digest must be stored (I1/I2)");
            match node {
                Node::Branch { children, .. } => {
                    for c in children.iter().flatten() {
                        queue.push_back(*c);
                    }
                }
                Node::Extension { child, .. } => queue.push_back(*child),
                Node::Leaf { .. } | Node::Empty => {}
            }
        }
        assert_eq!(
            reachable.len(),
            trie.store_len(),
            "store contains nodes unreachable from the root"
        );
    }

    #[test]
    fn clone_is_structurally_independent() {
        let mut trie = Trie::new();
        trie.insert(b"a", b"1");
        trie.insert(b"ab", b"2");

        let cloned = trie.clone();
        assert_eq!(cloned.root(), trie.root());
        assert_eq!(cloned.get(b"a").unwrap(), b"1");
        assert_eq!(cloned.get(b"ab").unwrap(), b"2");

        trie.insert(b"abc", b"3");
        assert_ne!(trie.root(), cloned.root());
    }

    #[test]
    fn ordered_dump_is_stable_across_insertion_order() {
        let mut a = Trie::new();
        a.insert(b"a", b"1");
        a.insert(b"ab", b"2");
        a.insert(b"abc", b"3");

        let mut b = Trie::new();
        b.insert(b"abc", b"3");
        b.insert(b"a", b"1");
        b.insert(b"ab", b"2");

        assert_eq!(a.ordered_dump(), b.ordered_dump());
    }
}
