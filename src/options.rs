//! Per-call read hints
//!
//! Hints are opaque to the search core: it forwards them to the block and
//! tip stores exactly as supplied and never interprets them itself.

use crate::block::Version;

/// What the caller intends to do with the data it reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Intent {
    /// Plain read
    #[default]
    Read,

    /// Caller will rewrite the fetched block
    Write,

    /// Caller will append to the chain (tip store hint)
    Insert,

    /// Caller is compacting the chain (tip store hint)
    Compact,
}

/// Hints carried by a single store access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ReadOptions {
    pub intent: Intent,

    /// Read starting from the newest data
    pub reverse: bool,

    /// Pin reads to a storage version
    pub version: Option<Version>,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = intent;
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn at_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }
}
