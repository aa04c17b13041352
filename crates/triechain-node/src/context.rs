//! Explicit application context, replacing the process-global maps of the
//! original handlers/Application.go (§9). HTTP routing, identity/key
//! persistence, and the cache contents themselves are out of scope (§1); the
//! types here exist only so the cache-flush task has something concrete to
//! depend on.

use std::sync::Arc;

use parking_lot::RwLock;
use triechain_chain::SyncedChain;

/// Stand-in for the original source's validator/miner identity map. Only the
/// entry count is modeled, since the cache-flush task triggers on size.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    entries: RwLock<usize>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        *self.entries.read()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn register(&self) {
        *self.entries.write() += 1;
    }
}

/// Stand-in for a cache of accepted-but-not-yet-finalized work, whose growth
/// is one of the two cache-flush triggers (§9).
#[derive(Debug, Default)]
pub struct AcceptanceCache {
    entries: RwLock<usize>,
}

impl AcceptanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        *self.entries.read()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&self) {
        *self.entries.write() += 1;
    }

    pub fn clear(&self) {
        *self.entries.write() = 0;
    }
}

/// Stand-in for an application-level results cache, flushed alongside the
/// acceptance cache.
#[derive(Debug, Default)]
pub struct ApplicationCache {
    entries: RwLock<usize>,
}

impl ApplicationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        *self.entries.read()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        *self.entries.write() = 0;
    }
}

/// Everything a running node needs, held behind `Arc` so it can be shared
/// with the cache-flush background task without any process-global state.
#[derive(Debug, Default)]
pub struct AppContext {
    pub chain: Arc<SyncedChain>,
    pub identities: Arc<IdentityRegistry>,
    pub acceptance_cache: Arc<AcceptanceCache>,
    pub application_cache: Arc<ApplicationCache>,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }
}
