//! Point Lookup
//!
//! Equality search for one item inside its bounding block.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::Result;
use crate::index::{Index, Key};
use crate::options::ReadOptions;

use super::{index_block_for, Navigator};

/// Binary search `items` (ordered by the index comparator) for an item whose
/// key equals `item`'s key
pub(crate) fn find_in_block<'b, I>(index: &Index<I>, items: &'b [I], item: &I) -> Option<&'b I> {
    let start = items.partition_point(|probe| index.compare(probe, item) == Ordering::Less);
    let key = index.key_of(item);

    items[start..]
        .iter()
        .take_while(|probe| index.compare(probe, item) == Ordering::Equal)
        .find(|probe| index.key_of(probe) == key)
}

/// Look up the stored item matching `item` in the (index, index value) chain
pub(crate) async fn index_item<I>(
    navigator: &Navigator<'_>,
    index: &Arc<Index<I>>,
    index_value: &Key,
    item: &I,
    options: ReadOptions,
) -> Result<Option<I>>
where
    I: Clone + Send + Sync + 'static,
{
    let Some(block) = index_block_for(navigator, index, index_value, item, options).await? else {
        return Ok(None);
    };

    Ok(find_in_block(index, block.items(), item).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBlockStore, MemoryTipStore};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        rank: i64,
        name: &'static str,
    }

    fn by_rank() -> Index<Row> {
        Index::new(
            "by_rank",
            |row: &Row| Key::Int(row.rank),
            Arc::new(MemoryBlockStore::<Row>::new()),
            Arc::new(MemoryTipStore::new()),
        )
    }

    #[test]
    fn test_find_in_block_hit_and_miss() {
        let index = by_rank();
        let items = vec![
            Row { rank: 10, name: "a" },
            Row { rank: 20, name: "b" },
            Row { rank: 30, name: "c" },
        ];

        let probe = Row { rank: 20, name: "" };
        assert_eq!(find_in_block(&index, &items, &probe).map(|r| r.name), Some("b"));

        let probe = Row { rank: 25, name: "" };
        assert!(find_in_block(&index, &items, &probe).is_none());
    }

    #[test]
    fn test_find_in_block_empty() {
        let index = by_rank();
        let probe = Row { rank: 1, name: "" };
        assert!(find_in_block(&index, &[], &probe).is_none());
    }

    #[test]
    fn test_find_in_block_comparator_ties_checked_by_key() {
        // Comparator only looks at the tens digit; keys still differ.
        let index = by_rank().with_comparator(|a: &Row, b: &Row| (a.rank / 10).cmp(&(b.rank / 10)));
        let items = vec![
            Row { rank: 11, name: "x" },
            Row { rank: 12, name: "y" },
            Row { rank: 13, name: "z" },
        ];

        let probe = Row { rank: 13, name: "" };
        assert_eq!(find_in_block(&index, &items, &probe).map(|r| r.name), Some("z"));

        let probe = Row { rank: 14, name: "" };
        assert!(find_in_block(&index, &items, &probe).is_none());
    }
}
