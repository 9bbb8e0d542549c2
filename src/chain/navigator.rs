//! Chain Navigator
//!
//! Fetches tip and next blocks for a chain and normalizes item order.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::block::{Block, IndexedBlock};
use crate::config::Config;
use crate::error::{ChainError, Result};
use crate::index::{Index, Key};
use crate::options::{Intent, ReadOptions};

/// First item of a next block, plus the block itself when peeking had to
/// fetch it in full
pub(crate) struct NextPeek<I> {
    pub(crate) first: Option<I>,
    pub(crate) block: Option<IndexedBlock<I>>,
}

/// Navigation over the chains of one database
pub(crate) struct Navigator<'a> {
    database: &'a str,
    config: &'a Config,
}

impl<'a> Navigator<'a> {
    pub(crate) fn new(database: &'a str, config: &'a Config) -> Self {
        Self { database, config }
    }

    /// Fetch the block a chain's tip points at
    ///
    /// Returns `Ok(None)` when the chain has no tip or the tip dangles.
    pub(crate) async fn tip_block<I>(
        &self,
        index: &Arc<Index<I>>,
        index_value: &Key,
        options: ReadOptions,
    ) -> Result<Option<IndexedBlock<I>>>
    where
        I: Clone + Send + Sync + 'static,
    {
        let tip = index
            .tips()
            .fetch_tip(self.database, index.name(), index_value, options)
            .await?;

        let Some(tip) = tip else {
            debug!(index = index.name(), value = %index_value, "no tip, chain is empty");
            return Ok(None);
        };

        let Some(block) = index.blocks().fetch_block(tip.block_id, options).await? else {
            debug!(
                index = index.name(),
                value = %index_value,
                block = tip.block_id,
                "tip points at a missing block"
            );
            return Ok(None);
        };

        Ok(Some(self.normalize(Arc::clone(index), index_value.clone(), block)))
    }

    /// Same as [`tip_block`](Self::tip_block) but without the read-time
    /// sort; only valid when storage is declared sorted
    pub(crate) async fn find_tip_block<I>(
        &self,
        index: &Arc<Index<I>>,
        index_value: &Key,
        options: ReadOptions,
    ) -> Result<Option<IndexedBlock<I>>>
    where
        I: Clone + Send + Sync + 'static,
    {
        if !self.config.sorted {
            return Err(ChainError::NotSorted("find_tip_block"));
        }

        let options = match options.intent {
            Intent::Read => options.with_intent(Intent::Insert),
            _ => options,
        };
        self.tip_block(index, index_value, options).await
    }

    /// Follow the `level` pointer of `block`
    ///
    /// The returned block inherits `block`'s index and index value.
    pub(crate) async fn next_block<I>(
        &self,
        block: &IndexedBlock<I>,
        level: usize,
        options: ReadOptions,
    ) -> Result<Option<IndexedBlock<I>>>
    where
        I: Clone + Send + Sync + 'static,
    {
        let Some(next_id) = block.next_id(level) else {
            return Ok(None);
        };

        let index = block.index();
        let Some(next) = index.blocks().fetch_block(next_id, options).await? else {
            debug!(
                index = index.name(),
                from = block.id(),
                to = next_id,
                level,
                "next pointer targets a missing block"
            );
            return Ok(None);
        };

        Ok(Some(self.normalize(
            Arc::clone(index),
            block.index_value().clone(),
            next,
        )))
    }

    /// First item of the block behind the `level` pointer
    ///
    /// Uses the writer's bounds hint when present. Otherwise sorted storage
    /// only needs the header and first item; unsorted storage needs the
    /// whole block to find its smallest item, which is handed back so the
    /// caller can adopt it without a second fetch.
    pub(crate) async fn peek_next<I>(
        &self,
        block: &IndexedBlock<I>,
        level: usize,
        options: ReadOptions,
    ) -> Result<Option<NextPeek<I>>>
    where
        I: Clone + Send + Sync + 'static,
    {
        let Some(next_id) = block.next_id(level) else {
            return Ok(None);
        };

        if let Some(bounds) = block.next_bounds(level) {
            return Ok(Some(NextPeek {
                first: Some(bounds.first.clone()),
                block: None,
            }));
        }

        if self.config.sorted {
            let head = block.index().blocks().fetch_head(next_id, options).await?;
            return Ok(head.map(|head| NextPeek {
                first: head.first,
                block: None,
            }));
        }

        let next = self.next_block(block, level, options).await?;
        Ok(next.map(|next| NextPeek {
            first: next.items().first().cloned(),
            block: Some(next),
        }))
    }

    /// Resolve the lower bound of an empty block behind the `level` pointer
    ///
    /// An empty block has no first item of its own, so its bound is the first
    /// item of the nearest non-empty block after it at level 0. `empty` is the
    /// block when peeking already fetched it. The returned peek carries the
    /// empty block for adoption; `first` is `None` when nothing non-empty
    /// follows it.
    pub(crate) async fn look_through_empty<I>(
        &self,
        block: &IndexedBlock<I>,
        level: usize,
        empty: Option<IndexedBlock<I>>,
        options: ReadOptions,
    ) -> Result<Option<NextPeek<I>>>
    where
        I: Clone + Send + Sync + 'static,
    {
        let empty = match empty {
            Some(empty) => Some(empty),
            None => self.next_block(block, level, options).await?,
        };
        let Some(empty) = empty else {
            return Ok(None);
        };

        if let Some(first) = empty.items().first().cloned() {
            return Ok(Some(NextPeek {
                first: Some(first),
                block: Some(empty),
            }));
        }

        let mut seen = HashSet::from([block.id(), empty.id()]);
        let mut cursor = self.next_block(&empty, 0, options).await?;

        while let Some(next) = cursor {
            if !seen.insert(next.id()) {
                warn!(block = next.id(), "level-0 cycle behind empty block");
                break;
            }
            if let Some(first) = next.items().first().cloned() {
                return Ok(Some(NextPeek {
                    first: Some(first),
                    block: Some(empty),
                }));
            }
            cursor = self.next_block(&next, 0, options).await?;
        }

        Ok(Some(NextPeek {
            first: None,
            block: Some(empty),
        }))
    }

    /// Every block of a chain in level-0 order, starting at the tip
    pub(crate) async fn walk<I>(
        &self,
        index: &Arc<Index<I>>,
        index_value: &Key,
        options: ReadOptions,
    ) -> Result<Vec<IndexedBlock<I>>>
    where
        I: Clone + Send + Sync + 'static,
    {
        let mut blocks = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.tip_block(index, index_value, options).await?;

        while let Some(block) = current {
            if !seen.insert(block.id()) {
                warn!(index = index.name(), block = block.id(), "level-0 cycle, stopping walk");
                break;
            }
            current = self.next_block(&block, 0, options).await?;
            blocks.push(block);
        }

        Ok(blocks)
    }

    fn normalize<I>(&self, index: Arc<Index<I>>, index_value: Key, mut block: Block<I>) -> IndexedBlock<I> {
        if !self.config.sorted {
            block.items.sort_by(|a, b| index.compare(a, b));
        }
        IndexedBlock::new(index, index_value, block)
    }
}
