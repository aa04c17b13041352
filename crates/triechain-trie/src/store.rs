//! Content-addressed node store: a flat `digest -> Node` map. The map is the
//! sole owner of every node (§5); dropping it releases all nodes.

use std::collections::HashMap;

use triechain_crypto::Digest;

use crate::node::Node;

/// Owns every reachable (and, only transiently during a mutation, every
/// about-to-be-superseded) node in a trie.
#[derive(Debug, Default, Clone)]
pub struct NodeStore {
    nodes: HashMap<Digest, Node>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, digest: &Digest) -> Option<&Node> {
        self.nodes.get(digest)
    }

    pub fn insert(&mut self, digest: Digest, node: Node) {
        self.nodes.insert(digest, node);
    }

    pub fn remove(&mut self, digest: &Digest) -> Option<Node> {
        self.nodes.remove(digest)
    }

    pub fn contains(&self, digest: &Digest) -> bool {
        self.nodes.contains_key(digest)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Digest, &Node)> {
        self.nodes.iter()
    }
}
