//! Configuration for skipchain
//!
//! Centralized configuration with sensible defaults.

use std::fmt;
use std::sync::Arc;

/// Callback invoked once when a [`ChainDb`](crate::ChainDb) is torn down
pub type TeardownHook = Arc<dyn Fn() + Send + Sync>;

/// Configuration for one chain-database binding
#[derive(Clone, Default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Read Normalization
    // -------------------------------------------------------------------------
    /// Storage guarantees every block's items are already ordered by the
    /// index comparator. When set, fetched blocks are returned as stored
    /// (no read-time sort) and `find_tip_block` becomes available.
    pub sorted: bool,

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------
    /// Runs once on close/drop of the binding
    pub on_close: Option<TeardownHook>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("sorted", &self.sorted)
            .field("on_close", &self.on_close.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Declare storage as already sorted
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.config.sorted = sorted;
        self
    }

    /// Set the teardown hook
    pub fn on_close(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.config.on_close = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
