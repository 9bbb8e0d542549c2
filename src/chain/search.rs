//! Skip Search
//!
//! Locates the block that holds, or would hold, an item by descending the
//! skip levels of a chain from its tip.
//!
//! ## Descent
//! ```text
//! level 2:  tip ───────────────────────▶ B ─────────────▶ (first >= item: drop)
//! level 1:                               B ──▶ C ──▶ (first >= item: drop)
//! level 0:                                     C ──▶ D ──▶ (first >= item: done, return D)
//! ```
//!
//! At each level the pointer is followed while the target's first item is
//! less than the queried item. After an advance the level is capped at the
//! adopted block's highest level and then raised by one if the adopted
//! block has a higher level available. A level drop never re-ascends.
//!
//! An empty block is bounded below by the first item of the nearest
//! non-empty block after it, so it is only entered when the item lies
//! past that bound.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::block::IndexedBlock;
use crate::error::Result;
use crate::index::{Index, Key};
use crate::options::ReadOptions;

use super::Navigator;

/// Find the bounding block for `item` in the (index, index value) chain
///
/// `Ok(None)` only when the chain is empty or its tip dangles.
pub(crate) async fn index_block_for<I>(
    navigator: &Navigator<'_>,
    index: &Arc<Index<I>>,
    index_value: &Key,
    item: &I,
    options: ReadOptions,
) -> Result<Option<IndexedBlock<I>>>
where
    I: Clone + Send + Sync + 'static,
{
    let Some(mut current) = navigator
        .tip_block(index, index_value, options.reversed())
        .await?
    else {
        return Ok(None);
    };

    let mut level = current.top_level();
    let mut hops = 0usize;

    while let Some(lvl) = level {
        let Some(mut peek) = navigator.peek_next(&current, lvl, options).await? else {
            trace!(block = current.id(), level = lvl, "no pointer, dropping level");
            level = lvl.checked_sub(1);
            continue;
        };

        if peek.first.is_none() {
            trace!(block = current.id(), level = lvl, "next block is empty, looking through");
            match navigator
                .look_through_empty(&current, lvl, peek.block.take(), options)
                .await?
            {
                Some(through) => peek = through,
                None => {
                    level = lvl.checked_sub(1);
                    continue;
                }
            }
        }

        // Nothing non-empty beyond an empty block: it cannot hold the item
        let advance = peek
            .first
            .as_ref()
            .is_some_and(|first| index.compare(first, item) == Ordering::Less);

        if !advance {
            trace!(block = current.id(), level = lvl, "next block starts at or past item");
            level = lvl.checked_sub(1);
            continue;
        }

        let next = match peek.block {
            Some(block) => Some(block),
            None => navigator.next_block(&current, lvl, options).await?,
        };
        let Some(next) = next else {
            level = lvl.checked_sub(1);
            continue;
        };

        trace!(from = current.id(), to = next.id(), level = lvl, "advancing");
        current = next;
        hops += 1;

        level = current.top_level().map(|top| {
            let capped = lvl.min(top);
            if capped < top {
                capped + 1
            } else {
                capped
            }
        });
    }

    debug!(
        index = index.name(),
        value = %index_value,
        block = current.id(),
        hops,
        "bounding block found"
    );
    Ok(Some(current))
}
