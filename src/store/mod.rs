//! Store Module
//!
//! Capability interfaces for the external block and tip stores, plus an
//! in-memory reference adapter and its snapshot file format.
//!
//! ## Responsibilities
//! - `BlockStore`: fetch a block, or just its header and first item, by id
//! - `TipStore`: fetch the tip record of a (database, index, value) chain
//!
//! Every call is an independent asynchronous operation. An absent record is
//! `Ok(None)`; `Err` is reserved for the store's own failures, which the
//! search core hands back to its caller untouched.

mod memory;
pub mod snapshot;

pub use memory::{FetchStats, MemoryBlockStore, MemoryTipStore};
pub use snapshot::Snapshot;

use futures::future::BoxFuture;

use crate::block::{Block, BlockHead, BlockId, Tip};
use crate::error::StoreError;
use crate::index::Key;
use crate::options::ReadOptions;

/// Result type for store adapters
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Block storage
pub trait BlockStore<I>: Send + Sync {
    /// Fetch a full block by id
    ///
    /// Honours the write-intent, reverse-read and version-pin hints.
    fn fetch_block(&self, id: BlockId, options: ReadOptions)
        -> BoxFuture<'_, StoreResult<Option<Block<I>>>>;

    /// Fetch a block's header and first stored item
    fn fetch_head(&self, id: BlockId, options: ReadOptions)
        -> BoxFuture<'_, StoreResult<Option<BlockHead<I>>>>;
}

/// Tip pointer storage
pub trait TipStore: Send + Sync {
    /// Fetch the tip of one chain
    ///
    /// Honours the insert-intent and compaction-intent hints.
    fn fetch_tip<'a>(
        &'a self,
        database: &'a str,
        index_name: &'a str,
        index_value: &'a Key,
        options: ReadOptions,
    ) -> BoxFuture<'a, StoreResult<Option<Tip>>>;
}
