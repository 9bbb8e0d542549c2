//! Shared fixtures for chain tests
//!
//! Chains are described tip first: `blocks[0]` is the tip and each later
//! entry is one step older. A block's level-k pointer targets the nearest
//! older block whose height exceeds k, which gives classic skip pointers.

#![allow(dead_code)]

use std::sync::Arc;

use skipchain::store::{MemoryBlockStore, MemoryTipStore};
use skipchain::{Block, BlockHeader, BlockId, Bounds, ChainDb, Config, Index, Key, Tip};

pub const DB: &str = "testdb";
pub const INDEX: &str = "by_n";

// =============================================================================
// Stores
// =============================================================================

pub struct Stores {
    pub blocks: Arc<MemoryBlockStore<i64>>,
    pub tips: Arc<MemoryTipStore>,
}

impl Stores {
    pub fn new() -> Self {
        Self {
            blocks: Arc::new(MemoryBlockStore::<i64>::new()),
            tips: Arc::new(MemoryTipStore::new()),
        }
    }

    pub fn index(&self, name: &str) -> Index<i64> {
        Index::new(name, |n: &i64| Key::Int(*n), self.blocks.clone(), self.tips.clone())
    }

    pub fn db(&self, config: Config) -> ChainDb<i64> {
        ChainDb::new(DB, vec![self.index(INDEX)], config).unwrap()
    }

    /// Total store calls across both stores
    pub fn calls(&self) -> usize {
        self.blocks.stats().total() + self.tips.stats().total()
    }

    pub fn reset(&self) {
        self.blocks.reset_stats();
        self.tips.reset_stats();
    }

    pub fn set_tip(&self, value: &Key, block_id: BlockId) {
        self.tips.set_tip(Tip {
            id: 1,
            database: DB.to_string(),
            index_name: INDEX.to_string(),
            index_value: value.clone(),
            block_id,
            version: None,
        });
    }
}

// =============================================================================
// Blocks
// =============================================================================

pub fn header(id: BlockId, value: &Key, next: Vec<Option<BlockId>>, item_count: usize) -> BlockHeader {
    BlockHeader {
        id,
        database: DB.to_string(),
        index_name: INDEX.to_string(),
        index_value: value.clone(),
        data_type: "i64".to_string(),
        data_sort: "asc".to_string(),
        next,
        item_count: item_count as u32,
    }
}

pub fn block(id: BlockId, value: &Key, next: Vec<Option<BlockId>>, items: Vec<i64>) -> Block<i64> {
    let count = items.len();
    Block::new(header(id, value, next, count), items)
}

/// Level pointers for each block of a tip-first chain
pub fn skip_pointers(heights: &[usize]) -> Vec<Vec<usize>> {
    (0..heights.len())
        .map(|i| {
            let mut pointers = Vec::new();
            for level in 0..heights[i] {
                match (i + 1..heights.len()).find(|&j| heights[j] > level) {
                    Some(j) => pointers.push(j),
                    None => break,
                }
            }
            pointers
        })
        .collect()
}

/// Store a tip-first chain and publish its tip
///
/// With `with_bounds`, every pointer to a non-empty block carries its bounds.
/// Block ids are `first_id + position`. Returns the ids, tip first.
pub fn build_chain(
    stores: &Stores,
    value: &Key,
    blocks: &[(Vec<i64>, usize)],
    first_id: BlockId,
    with_bounds: bool,
) -> Vec<BlockId> {
    let heights: Vec<usize> = blocks.iter().map(|(_, h)| *h).collect();
    let pointers = skip_pointers(&heights);
    let ids: Vec<BlockId> = (0..blocks.len()).map(|i| first_id + i as BlockId).collect();

    for (i, (items, _)) in blocks.iter().enumerate() {
        let next = pointers[i].iter().map(|&j| Some(ids[j])).collect();
        let mut stored = block(ids[i], value, next, items.clone());
        if with_bounds {
            let bounds = pointers[i]
                .iter()
                .map(|&j| {
                    let target = &blocks[j].0;
                    Some(Bounds {
                        first: *target.iter().min()?,
                        last: *target.iter().max()?,
                    })
                })
                .collect();
            stored = stored.with_next_bounds(bounds);
        }
        stores.blocks.put_block(stored);
    }

    if let Some(&tip) = ids.first() {
        stores.set_tip(value, tip);
    }
    ids
}

/// Deterministic skip chain of `n` single-item blocks; block i holds `2 * i`
/// and has height `1 + trailing_zeros(i + 1)`
pub fn ladder(n: usize) -> Vec<(Vec<i64>, usize)> {
    (0..n)
        .map(|i| (vec![2 * i as i64], 1 + (i + 1).trailing_zeros() as usize))
        .collect()
}
