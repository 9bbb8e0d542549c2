//! Block Module
//!
//! Data shapes for chain blocks and tip records as produced by the storage
//! layer.
//!
//! ## Chain Layout
//! ```text
//!   tip ──▶ ┌──────────┐ next[1] ─────────────────────▶ ┌──────────┐
//!           │ block 42 │ next[0] ──▶ ┌──────────┐       │ block 40 │ ──▶ ...
//!           └──────────┘             │ block 41 │ ────▶ └──────────┘
//!                                    └──────────┘  next[0]
//! ```
//!
//! A header's `next` sequence is indexed by level; its length is the number
//! of skip levels the block exposes. A level-k pointer must target a block
//! that itself exposes level k (or is the end of that level's run).

mod indexed;

pub use indexed::IndexedBlock;

use serde::{Deserialize, Serialize};

use crate::index::Key;

/// Identifier of a stored block
pub type BlockId = u64;

/// Storage version token, forwarded to the stores as-is
pub type Version = u64;

/// Block header describing the block's place in its chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub id: BlockId,

    /// Owning database name
    pub database: String,

    pub index_name: String,
    pub index_value: Key,

    /// Data type tag of the stored items
    pub data_type: String,

    /// Sort tag of the stored items
    pub data_sort: String,

    /// Next-block pointers by level (slot k = level k)
    pub next: Vec<Option<BlockId>>,

    /// Number of items held by the block
    pub item_count: u32,
}

impl BlockHeader {
    /// Number of level slots in the header
    pub fn level_count(&self) -> usize {
        self.next.len()
    }

    /// Highest level with a populated pointer
    pub fn top_level(&self) -> Option<usize> {
        self.next.iter().rposition(Option::is_some)
    }

    /// Pointer at `level`, if both the level and the pointer exist
    pub fn next_id(&self, level: usize) -> Option<BlockId> {
        self.next.get(level).copied().flatten()
    }
}

/// First and last item of a block, precomputed by the writer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds<I> {
    pub first: I,
    pub last: I,
}

/// A stored block: header plus items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block<I> {
    pub header: BlockHeader,
    pub items: Vec<I>,
    pub version: Option<Version>,

    /// Optional per-level bounds of the blocks `header.next` points at
    #[serde(default = "Vec::new")]
    pub next_bounds: Vec<Option<Bounds<I>>>,
}

impl<I> Block<I> {
    pub fn new(header: BlockHeader, items: Vec<I>) -> Self {
        Self {
            header,
            items,
            version: None,
            next_bounds: Vec::new(),
        }
    }

    pub fn id(&self) -> BlockId {
        self.header.id
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_next_bounds(mut self, bounds: Vec<Option<Bounds<I>>>) -> Self {
        self.next_bounds = bounds;
        self
    }

    /// Bounds hint for the block at `level`, if the writer stored one
    pub fn next_bounds(&self, level: usize) -> Option<&Bounds<I>> {
        self.next_bounds.get(level).and_then(Option::as_ref)
    }
}

impl<I: Clone> Block<I> {
    /// Header plus first stored item
    pub fn head(&self) -> BlockHead<I> {
        BlockHead {
            header: self.header.clone(),
            first: self.items.first().cloned(),
            version: self.version,
        }
    }
}

/// Header plus the first stored item, without the rest of the items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHead<I> {
    pub header: BlockHeader,
    pub first: Option<I>,
    pub version: Option<Version>,
}

/// Entry point of one chain, keyed by (database, index name, index value)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    pub id: u64,
    pub database: String,
    pub index_name: String,
    pub index_value: Key,
    pub block_id: BlockId,
    pub version: Option<Version>,
}
