//! Chain Database
//!
//! Binds a database name, its index registry and configuration, and exposes
//! the read operations over the chains of those indices.
//!
//! ## Operations
//! - `get_tip_block` / `get_next_block` / `find_tip_block`: navigation
//! - `index_block_for` / `find_block_for`: skip search for a bounding block
//! - `index_item` / `find_item`: point lookup
//! - `walk`: every block of a chain at level 0
//!
//! Index-bearing operations take an [`IndexRef`]: either an index handle or
//! a registered name. An unknown name fails before any store is touched.

use std::sync::Arc;

use tracing::debug;

use crate::block::IndexedBlock;
use crate::chain::{self, Navigator};
use crate::config::Config;
use crate::error::Result;
use crate::index::{Index, IndexRef, IndexRegistry, Key};
use crate::options::ReadOptions;

/// Read-side binding over the chains of one database
///
/// ## Concurrency
/// - Holds no mutable state; every method takes `&self`
/// - Searches share nothing but the store handles, so any number may run
///   in parallel. Consistency is whatever the stores provide.
pub struct ChainDb<I> {
    database: String,
    registry: IndexRegistry<I>,
    config: Config,
}

impl<I> ChainDb<I>
where
    I: Clone + Send + Sync + 'static,
{
    /// Bind `indices` to `database`
    ///
    /// Fails with a configuration error on duplicate index names.
    pub fn new(database: impl Into<String>, indices: Vec<Index<I>>, config: Config) -> Result<Self> {
        let database = database.into();
        let registry = IndexRegistry::new(indices)?;
        debug!(database = %database, indices = registry.len(), sorted = config.sorted, "chain db bound");
        Ok(Self {
            database,
            registry,
            config,
        })
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Fetch the tip block of a chain, items normalized unless storage is
    /// declared sorted
    pub async fn get_tip_block<'a>(
        &self,
        index: impl Into<IndexRef<'a, I>>,
        index_value: &Key,
        options: ReadOptions,
    ) -> Result<Option<IndexedBlock<I>>> {
        let index = self.registry.resolve(index.into())?;
        self.navigator().tip_block(&index, index_value, options).await
    }

    /// Follow the `level` pointer of `block`
    pub async fn get_next_block(
        &self,
        block: &IndexedBlock<I>,
        level: usize,
        options: ReadOptions,
    ) -> Result<Option<IndexedBlock<I>>> {
        self.navigator().next_block(block, level, options).await
    }

    /// Fetch the tip block without normalization
    ///
    /// Requires `Config::sorted`; otherwise fails with `NotSorted` before
    /// any store call.
    pub async fn find_tip_block<'a>(
        &self,
        index: impl Into<IndexRef<'a, I>>,
        index_value: &Key,
        options: ReadOptions,
    ) -> Result<Option<IndexedBlock<I>>> {
        let index = self.registry.resolve(index.into())?;
        self.navigator().find_tip_block(&index, index_value, options).await
    }

    /// Every block of a chain in level-0 order, tip first
    pub async fn walk<'a>(
        &self,
        index: impl Into<IndexRef<'a, I>>,
        index_value: &Key,
        options: ReadOptions,
    ) -> Result<Vec<IndexedBlock<I>>> {
        let index = self.registry.resolve(index.into())?;
        self.navigator().walk(&index, index_value, options).await
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// The block that contains, or would contain, `item`
    ///
    /// `options` reach every fetch of the search; the tip is read with the
    /// reverse hint set.
    pub async fn index_block_for<'a>(
        &self,
        index: impl Into<IndexRef<'a, I>>,
        index_value: &Key,
        item: &I,
        options: ReadOptions,
    ) -> Result<Option<IndexedBlock<I>>> {
        let index = self.registry.resolve(index.into())?;
        chain::index_block_for(&self.navigator(), &index, index_value, item, options).await
    }

    /// [`index_block_for`](Self::index_block_for) by registered index name
    pub async fn find_block_for(
        &self,
        index_name: &str,
        index_value: &Key,
        item: &I,
        options: ReadOptions,
    ) -> Result<Option<IndexedBlock<I>>> {
        self.index_block_for(index_name, index_value, item, options).await
    }

    /// The stored item whose key equals `item`'s key
    pub async fn index_item<'a>(
        &self,
        index: impl Into<IndexRef<'a, I>>,
        index_value: &Key,
        item: &I,
        options: ReadOptions,
    ) -> Result<Option<I>> {
        let index = self.registry.resolve(index.into())?;
        chain::index_item(&self.navigator(), &index, index_value, item, options).await
    }

    /// [`index_item`](Self::index_item) by registered index name
    pub async fn find_item(
        &self,
        index_name: &str,
        index_value: &Key,
        item: &I,
        options: ReadOptions,
    ) -> Result<Option<I>> {
        self.index_item(index_name, index_value, item, options).await
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Look up a registered index
    pub fn index(&self, name: &str) -> Result<&Arc<Index<I>>> {
        self.registry.get(name)
    }

    pub fn registry(&self) -> &IndexRegistry<I> {
        &self.registry
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Release the binding, running the teardown hook
    pub fn close(self) {
        drop(self);
    }

    fn navigator(&self) -> Navigator<'_> {
        Navigator::new(&self.database, &self.config)
    }
}

impl<I> Drop for ChainDb<I> {
    fn drop(&mut self) {
        if let Some(hook) = self.config.on_close.take() {
            debug!(database = %self.database, "running teardown hook");
            hook();
        }
    }
}
