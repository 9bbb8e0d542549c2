//! Index Registry
//!
//! Fixed, construction-time set of indices for one database. Lookup by name
//! is a linear scan; there is no runtime registration or removal.

use std::sync::Arc;

use crate::error::{ChainError, Result};

use super::Index;

/// Either an index object or the name it is registered under
pub enum IndexRef<'a, I> {
    Index(&'a Arc<Index<I>>),
    Name(&'a str),
}

impl<'a, I> From<&'a Arc<Index<I>>> for IndexRef<'a, I> {
    fn from(index: &'a Arc<Index<I>>) -> Self {
        IndexRef::Index(index)
    }
}

impl<'a, I> From<&'a str> for IndexRef<'a, I> {
    fn from(name: &'a str) -> Self {
        IndexRef::Name(name)
    }
}

impl<'a, I> From<&'a String> for IndexRef<'a, I> {
    fn from(name: &'a String) -> Self {
        IndexRef::Name(name.as_str())
    }
}

/// Ordered, immutable set of named indices
#[derive(Debug)]
pub struct IndexRegistry<I> {
    indices: Vec<Arc<Index<I>>>,
}

impl<I> IndexRegistry<I> {
    /// Build a registry, rejecting duplicate names
    pub fn new(indices: Vec<Index<I>>) -> Result<Self> {
        let mut registered: Vec<Arc<Index<I>>> = Vec::with_capacity(indices.len());
        for index in indices {
            if registered.iter().any(|r| r.name() == index.name()) {
                return Err(ChainError::Config(format!(
                    "duplicate index name: {}",
                    index.name()
                )));
            }
            registered.push(Arc::new(index));
        }
        Ok(Self {
            indices: registered,
        })
    }

    /// Find an index by name
    pub fn get(&self, name: &str) -> Result<&Arc<Index<I>>> {
        self.indices
            .iter()
            .find(|index| index.name() == name)
            .ok_or_else(|| ChainError::UnknownIndex(name.to_string()))
    }

    /// Resolve an index reference to a shared index handle
    pub fn resolve(&self, index: IndexRef<'_, I>) -> Result<Arc<Index<I>>> {
        match index {
            IndexRef::Index(index) => Ok(Arc::clone(index)),
            IndexRef::Name(name) => self.get(name).map(Arc::clone),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Index<I>>> {
        self.indices.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.indices.iter().map(|index| index.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
