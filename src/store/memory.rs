//! In-memory store adapters
//!
//! HashMap-backed block and tip stores guarded by `parking_lot::RwLock`.
//! They stand in for the external storage layer in tests, benchmarks and
//! the CLI, and play the writer's role through `put_block` / `set_tip`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::{Mutex, RwLock};

use crate::block::{Block, BlockHead, BlockId, Tip};
use crate::index::Key;
use crate::options::ReadOptions;

use super::{BlockStore, StoreResult, TipStore};

/// Number of store calls served so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchStats {
    pub blocks: usize,
    pub heads: usize,
    pub tips: usize,
}

impl FetchStats {
    pub fn total(&self) -> usize {
        self.blocks + self.heads + self.tips
    }
}

// =============================================================================
// Block Store
// =============================================================================

/// Revisioned in-memory block store
///
/// Each `put_block` adds a revision. Unpinned reads see the newest revision;
/// a version pin selects the newest revision whose version does not exceed
/// the pin (unversioned revisions count as version 0).
pub struct MemoryBlockStore<I> {
    blocks: RwLock<HashMap<BlockId, Vec<Block<I>>>>,
    block_fetches: AtomicUsize,
    head_fetches: AtomicUsize,
    options: Mutex<Vec<ReadOptions>>,
}

impl<I: Clone> MemoryBlockStore<I> {
    pub fn new() -> Self {
        Self {
            blocks: RwLock::new(HashMap::new()),
            block_fetches: AtomicUsize::new(0),
            head_fetches: AtomicUsize::new(0),
            options: Mutex::new(Vec::new()),
        }
    }

    /// Store a new revision of a block
    pub fn put_block(&self, block: Block<I>) {
        self.blocks
            .write()
            .entry(block.id())
            .or_default()
            .push(block);
    }

    /// Drop every revision of a block
    pub fn remove_block(&self, id: BlockId) -> bool {
        self.blocks.write().remove(&id).is_some()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.read().len()
    }

    /// All stored revisions, ordered by block id then insertion
    pub fn revisions(&self) -> Vec<Block<I>> {
        let blocks = self.blocks.read();
        let mut ids: Vec<BlockId> = blocks.keys().copied().collect();
        ids.sort_unstable();
        ids.iter()
            .flat_map(|id| blocks[id].iter().cloned())
            .collect()
    }

    pub fn stats(&self) -> FetchStats {
        FetchStats {
            blocks: self.block_fetches.load(Ordering::SeqCst),
            heads: self.head_fetches.load(Ordering::SeqCst),
            tips: 0,
        }
    }

    /// Hints received by every fetch, in call order
    pub fn recorded_options(&self) -> Vec<ReadOptions> {
        self.options.lock().clone()
    }

    pub fn reset_stats(&self) {
        self.block_fetches.store(0, Ordering::SeqCst);
        self.head_fetches.store(0, Ordering::SeqCst);
        self.options.lock().clear();
    }

    fn lookup(&self, id: BlockId, options: ReadOptions) -> Option<Block<I>> {
        self.options.lock().push(options);
        let blocks = self.blocks.read();
        let revisions = blocks.get(&id)?;
        match options.version {
            Some(pin) => revisions
                .iter()
                .rev()
                .find(|b| b.version.unwrap_or(0) <= pin)
                .cloned(),
            None => revisions.last().cloned(),
        }
    }
}

impl<I: Clone> Default for MemoryBlockStore<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Clone + Send + Sync + 'static> BlockStore<I> for MemoryBlockStore<I> {
    fn fetch_block(
        &self,
        id: BlockId,
        options: ReadOptions,
    ) -> BoxFuture<'_, StoreResult<Option<Block<I>>>> {
        self.block_fetches.fetch_add(1, Ordering::SeqCst);
        future::ready(Ok(self.lookup(id, options))).boxed()
    }

    fn fetch_head(
        &self,
        id: BlockId,
        options: ReadOptions,
    ) -> BoxFuture<'_, StoreResult<Option<BlockHead<I>>>> {
        self.head_fetches.fetch_add(1, Ordering::SeqCst);
        let head = self.lookup(id, options).map(|block| block.head());
        future::ready(Ok(head)).boxed()
    }
}

// =============================================================================
// Tip Store
// =============================================================================

type TipKey = (String, String, Key);

/// In-memory tip store
pub struct MemoryTipStore {
    tips: RwLock<HashMap<TipKey, Tip>>,
    fetches: AtomicUsize,
    options: Mutex<Vec<ReadOptions>>,
}

impl MemoryTipStore {
    pub fn new() -> Self {
        Self {
            tips: RwLock::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
            options: Mutex::new(Vec::new()),
        }
    }

    /// Publish (or replace) the tip of a chain
    pub fn set_tip(&self, tip: Tip) {
        let key = (
            tip.database.clone(),
            tip.index_name.clone(),
            tip.index_value.clone(),
        );
        self.tips.write().insert(key, tip);
    }

    pub fn remove_tip(&self, database: &str, index_name: &str, index_value: &Key) -> Option<Tip> {
        let key = (
            database.to_string(),
            index_name.to_string(),
            index_value.clone(),
        );
        self.tips.write().remove(&key)
    }

    /// All tips, ordered by (database, index name, index value)
    pub fn tips(&self) -> Vec<Tip> {
        let mut tips: Vec<Tip> = self.tips.read().values().cloned().collect();
        tips.sort_by(|a, b| {
            (&a.database, &a.index_name, &a.index_value)
                .cmp(&(&b.database, &b.index_name, &b.index_value))
        });
        tips
    }

    pub fn stats(&self) -> FetchStats {
        FetchStats {
            tips: self.fetches.load(Ordering::SeqCst),
            ..FetchStats::default()
        }
    }

    pub fn recorded_options(&self) -> Vec<ReadOptions> {
        self.options.lock().clone()
    }

    pub fn reset_stats(&self) {
        self.fetches.store(0, Ordering::SeqCst);
        self.options.lock().clear();
    }
}

impl Default for MemoryTipStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TipStore for MemoryTipStore {
    fn fetch_tip<'a>(
        &'a self,
        database: &'a str,
        index_name: &'a str,
        index_value: &'a Key,
        options: ReadOptions,
    ) -> BoxFuture<'a, StoreResult<Option<Tip>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.options.lock().push(options);
        let key = (
            database.to_string(),
            index_name.to_string(),
            index_value.clone(),
        );
        let tip = self.tips.read().get(&key).cloned();
        future::ready(Ok(tip)).boxed()
    }
}
