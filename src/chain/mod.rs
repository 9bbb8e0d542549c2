//! Chain Module
//!
//! Read-side traversal of block chains.
//!
//! ## Responsibilities
//! - Resolve a chain's tip and follow next-block pointers (navigator)
//! - Multi-level backward skip search for a bounding block (search)
//! - Equality search inside the bounding block (lookup)
//!
//! Fetched blocks are snapshots: nothing here caches, locks or retries, and
//! a chain appended to mid-search is only seen on the next fetch.

mod lookup;
mod navigator;
mod search;

pub(crate) use lookup::index_item;
pub(crate) use navigator::Navigator;
pub(crate) use search::index_block_for;
