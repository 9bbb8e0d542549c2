//! Property tests for chain search
//!
//! Chains are generated with irregular per-block heights and occasional empty
//! blocks. Items ascend along the pointers (the tip holds the smallest) and
//! are even, so odd probes are guaranteed misses.

mod common;

use common::{build_chain, Stores, INDEX};
use proptest::prelude::*;
use skipchain::{ChainDb, Config, Key, ReadOptions};

// =============================================================================
// Helper Functions
// =============================================================================

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

/// Block sizes and heights, tip first; a size of zero is an empty block
fn chain_shape() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0usize..6, 1usize..5), 1..30)
}

/// Nearest non-empty block newer than `position`, or the tip
fn newer_non_empty(chain: &[(Vec<i64>, usize)], position: usize) -> usize {
    (0..position).rev().find(|&j| !chain[j].0.is_empty()).unwrap_or(0)
}

/// Lay out ascending even items over the shape
fn layout(shape: &[(usize, usize)]) -> Vec<(Vec<i64>, usize)> {
    let mut next = 0i64;
    shape
        .iter()
        .map(|&(size, height)| {
            let items = (0..size)
                .map(|_| {
                    let item = next;
                    next += 2;
                    item
                })
                .collect();
            (items, height)
        })
        .collect()
}

fn setup(shape: &[(usize, usize)], with_bounds: bool, config: Config) -> (Stores, ChainDb<i64>, Vec<(Vec<i64>, usize)>, Vec<u64>) {
    let stores = Stores::new();
    let chain = layout(shape);
    let ids = build_chain(&stores, &Key::Int(0), &chain, 1, with_bounds);
    let db = stores.db(config);
    (stores, db, chain, ids)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Every stored item is found, except the first item of an older block,
    /// which the >= tie-break resolves to the nearest non-empty newer block
    #[test]
    fn prop_skip_coverage(shape in chain_shape(), with_bounds in any::<bool>(), sorted in any::<bool>()) {
        let (_stores, db, chain, ids) = setup(&shape, with_bounds, Config::builder().sorted(sorted).build());
        let value = Key::Int(0);

        runtime().block_on(async {
            for (position, (items, _)) in chain.iter().enumerate() {
                for (offset, item) in items.iter().enumerate() {
                    let bounding = db.index_block_for(INDEX, &value, item, ReadOptions::new()).await.unwrap().unwrap();
                    let found = db.index_item(INDEX, &value, item, ReadOptions::new()).await.unwrap();

                    if position > 0 && offset == 0 {
                        prop_assert_eq!(bounding.id(), ids[newer_non_empty(&chain, position)]);
                    } else {
                        prop_assert_eq!(bounding.id(), ids[position]);
                        prop_assert!(bounding.items().contains(item));
                        prop_assert_eq!(found, Some(*item));
                    }
                }
            }
            Ok(())
        })?;
    }

    /// Misses return no item but still a bounding block
    #[test]
    fn prop_miss_correctness(shape in chain_shape()) {
        let (_stores, db, chain, _ids) = setup(&shape, false, Config::default());
        let value = Key::Int(0);
        let largest = chain.iter().flat_map(|(items, _)| items.iter()).max().copied().unwrap_or(0);

        runtime().block_on(async {
            for probe in (-1..=largest + 1).filter(|n| n % 2 != 0) {
                prop_assert!(db.index_item(INDEX, &value, &probe, ReadOptions::new()).await.unwrap().is_none());
                prop_assert!(db.index_block_for(INDEX, &value, &probe, ReadOptions::new()).await.unwrap().is_some());
            }
            Ok(())
        })?;
    }

    /// Unsorted storage is always normalized on read
    #[test]
    fn prop_blocks_ordered(shape in chain_shape(), seed in any::<u64>()) {
        let stores = Stores::new();
        let mut chain = layout(&shape);
        // Deterministic shuffle of each block's stored order
        for (i, (items, _)) in chain.iter_mut().enumerate() {
            let len = items.len();
            if len == 0 {
                continue;
            }
            items.rotate_left((seed as usize).wrapping_add(i) % len);
            if (seed >> (i % 64)) & 1 == 1 {
                items.reverse();
            }
        }
        build_chain(&stores, &Key::Int(0), &chain, 1, false);
        let db = stores.db(Config::default());

        let blocks = runtime().block_on(db.walk(INDEX, &Key::Int(0), ReadOptions::new())).unwrap();

        prop_assert_eq!(blocks.len(), chain.len());
        for block in &blocks {
            prop_assert!(block.items().windows(2).all(|w| w[0] <= w[1]));
        }
    }

    /// Identical queries on an unchanged chain agree
    #[test]
    fn prop_idempotent(shape in chain_shape(), probe in -2i64..300) {
        let (stores, db, _chain, _ids) = setup(&shape, false, Config::default());
        let value = Key::Int(0);

        runtime().block_on(async {
            let first = db.index_block_for(INDEX, &value, &probe, ReadOptions::new()).await.unwrap();
            let fetched = stores.calls();
            let second = db.index_block_for(INDEX, &value, &probe, ReadOptions::new()).await.unwrap();
            prop_assert_eq!(stores.calls(), 2 * fetched);
            prop_assert_eq!(first, second);
            Ok(())
        })?;
    }
}
