//! Index Module
//!
//! Named orderings over an item type. Each index owns independent chains,
//! one per index value, reached through its own block and tip stores.

mod registry;

pub use registry::{IndexRef, IndexRegistry};

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::store::{BlockStore, TipStore};

/// Indexed key or index value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Key {
    Int(i64),
    Text(String),
    Bytes(Vec<u8>),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(v) => write!(f, "{}", v),
            Key::Text(v) => write!(f, "{}", v),
            Key::Bytes(v) => {
                write!(f, "0x")?;
                for b in v {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

/// Integers parse as `Int`, `0x`-prefixed hex as `Bytes`, anything else as `Text`
impl FromStr for Key {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Key::Int(v));
        }
        if let Some(hex) = s.strip_prefix("0x") {
            if hex.len() % 2 == 0 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
                let bytes = (0..hex.len())
                    .step_by(2)
                    .filter_map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
                    .collect();
                return Ok(Key::Bytes(bytes));
            }
        }
        Ok(Key::Text(s.to_string()))
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Int(v)
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::Text(v.to_string())
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::Text(v)
    }
}

impl From<Vec<u8>> for Key {
    fn from(v: Vec<u8>) -> Self {
        Key::Bytes(v)
    }
}

/// Projection from an item to its indexed key
pub type KeyFn<I> = Arc<dyn Fn(&I) -> Key + Send + Sync>;

/// Total order over items
pub type CompareFn<I> = Arc<dyn Fn(&I, &I) -> Ordering + Send + Sync>;

/// A named index: key extractor, comparator and the stores holding its chains
pub struct Index<I> {
    name: String,
    key_fn: KeyFn<I>,

    /// Custom order; `None` orders by extracted key
    compare: Option<CompareFn<I>>,
    blocks: Arc<dyn BlockStore<I>>,
    tips: Arc<dyn TipStore>,
}

impl<I> Index<I> {
    /// Create an index ordered by its extracted key
    pub fn new(
        name: impl Into<String>,
        key_fn: impl Fn(&I) -> Key + Send + Sync + 'static,
        blocks: Arc<dyn BlockStore<I>>,
        tips: Arc<dyn TipStore>,
    ) -> Self {
        Self {
            name: name.into(),
            key_fn: Arc::new(key_fn),
            compare: None,
            blocks,
            tips,
        }
    }

    /// Replace the key order with a custom comparator
    pub fn with_comparator(
        mut self,
        compare: impl Fn(&I, &I) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.compare = Some(Arc::new(compare));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_of(&self, item: &I) -> Key {
        (self.key_fn)(item)
    }

    pub fn compare(&self, a: &I, b: &I) -> Ordering {
        match &self.compare {
            Some(compare) => compare(a, b),
            None => self.key_of(a).cmp(&self.key_of(b)),
        }
    }

    pub fn same_key(&self, a: &I, b: &I) -> bool {
        self.key_of(a) == self.key_of(b)
    }

    pub fn blocks(&self) -> &dyn BlockStore<I> {
        self.blocks.as_ref()
    }

    pub fn tips(&self) -> &dyn TipStore {
        self.tips.as_ref()
    }
}

impl<I> fmt::Debug for Index<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index").field("name", &self.name).finish_non_exhaustive()
    }
}
