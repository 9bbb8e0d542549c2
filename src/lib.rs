//! # skipchain
//!
//! Ordered secondary-index search over append-only, multi-level linked
//! block chains:
//! - Pluggable block and tip stores (async capability traits)
//! - Read-time normalization of block item order
//! - Skip-pointer descent from a chain's tip to the bounding block
//! - Point lookups by index key
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         ChainDb                              │
//! │            (database name + index registry)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │          Point Lookup  ──▶  Skip Search Engine               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Chain Navigator                            │
//! │          (tip block, next block, sort normalization)         │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │    TipStore     │                │   BlockStore    │
//!   │   (external)    │                │   (external)    │
//!   └─────────────────┘                └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod options;

pub mod block;
pub mod index;
pub mod store;
pub mod database;

mod chain;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ChainError, Result, StoreError};
pub use config::Config;
pub use options::{Intent, ReadOptions};
pub use block::{Block, BlockHead, BlockHeader, BlockId, Bounds, IndexedBlock, Tip, Version};
pub use index::{Index, IndexRef, IndexRegistry, Key};
pub use store::{BlockStore, StoreResult, TipStore};
pub use database::ChainDb;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of skipchain
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
