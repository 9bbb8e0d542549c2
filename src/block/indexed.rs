//! Indexed blocks
//!
//! A fetched block bound to the index and index value whose chain it was
//! reached through.

use std::fmt;
use std::sync::Arc;

use crate::index::{Index, Key};

use super::{Block, BlockHeader, BlockId, Bounds, Version};

/// A block enriched with its owning index and index value
///
/// The chain context is inherited from the block the navigator came from,
/// never read back from the block's own stored header.
pub struct IndexedBlock<I> {
    index: Arc<Index<I>>,
    index_value: Key,
    block: Block<I>,
}

impl<I> IndexedBlock<I> {
    pub(crate) fn new(index: Arc<Index<I>>, index_value: Key, block: Block<I>) -> Self {
        Self {
            index,
            index_value,
            block,
        }
    }

    pub fn index(&self) -> &Arc<Index<I>> {
        &self.index
    }

    pub fn index_value(&self) -> &Key {
        &self.index_value
    }

    pub fn id(&self) -> BlockId {
        self.block.header.id
    }

    pub fn header(&self) -> &BlockHeader {
        &self.block.header
    }

    pub fn items(&self) -> &[I] {
        &self.block.items
    }

    pub fn version(&self) -> Option<Version> {
        self.block.version
    }

    pub fn top_level(&self) -> Option<usize> {
        self.block.header.top_level()
    }

    pub fn next_id(&self, level: usize) -> Option<BlockId> {
        self.block.header.next_id(level)
    }

    pub fn next_bounds(&self, level: usize) -> Option<&Bounds<I>> {
        self.block.next_bounds(level)
    }

    pub fn block(&self) -> &Block<I> {
        &self.block
    }

    pub fn into_block(self) -> Block<I> {
        self.block
    }
}

impl<I: fmt::Debug> fmt::Debug for IndexedBlock<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedBlock")
            .field("index", &self.index.name())
            .field("index_value", &self.index_value)
            .field("block", &self.block)
            .finish()
    }
}

impl<I: Clone> Clone for IndexedBlock<I> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            index_value: self.index_value.clone(),
            block: self.block.clone(),
        }
    }
}

impl<I: PartialEq> PartialEq for IndexedBlock<I> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.index, &other.index)
            && self.index_value == other.index_value
            && self.block == other.block
    }
}
