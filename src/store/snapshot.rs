//! Snapshot files
//!
//! Persists the contents of the in-memory adapters so a chain can be
//! inspected later (see the `skipchain` binary).
//!
//! ## File Format
//! ```text
//! ┌──────────┬──────────┬────────────────┬──────────┬──────────────────┐
//! │Magic (4) │Version(2)│ Payload Len (8)│ CRC32 (4)│ bincode payload  │
//! └──────────┴──────────┴────────────────┴──────────┴──────────────────┘
//! ```

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::block::{Block, Tip};
use crate::error::{ChainError, Result};

use super::{MemoryBlockStore, MemoryTipStore};

/// Magic bytes identifying a snapshot file
pub const MAGIC: &[u8; 4] = b"SKCH";

/// Snapshot format version
pub const VERSION: u16 = 1;

/// Header size: magic (4) + version (2) + payload length (8) + crc (4)
pub const HEADER_SIZE: usize = 18;

/// Every block revision and tip held by a pair of memory stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot<I> {
    pub blocks: Vec<Block<I>>,
    pub tips: Vec<Tip>,
}

impl<I: Clone + Serialize + DeserializeOwned> Snapshot<I> {
    /// Copy the current contents of the stores
    pub fn capture(blocks: &MemoryBlockStore<I>, tips: &MemoryTipStore) -> Self {
        Self {
            blocks: blocks.revisions(),
            tips: tips.tips(),
        }
    }

    /// Rebuild stores holding this snapshot's contents
    pub fn restore(self) -> (MemoryBlockStore<I>, MemoryTipStore) {
        let blocks = MemoryBlockStore::new();
        for block in self.blocks {
            blocks.put_block(block);
        }
        let tips = MemoryTipStore::new();
        for tip in self.tips {
            tips.set_tip(tip);
        }
        (blocks, tips)
    }

    /// Write the snapshot to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let payload =
            bincode::serialize(self).map_err(|e| ChainError::Serialization(e.to_string()))?;
        let crc = crc32fast::hash(&payload);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&(payload.len() as u64).to_le_bytes())?;
        writer.write_all(&crc.to_le_bytes())?;
        writer.write_all(&payload)?;
        writer.flush()?;

        writer
            .into_inner()
            .map_err(|e| ChainError::Io(e.into_error()))?
            .sync_all()?;

        tracing::debug!(
            path = %path.display(),
            blocks = self.blocks.len(),
            tips = self.tips.len(),
            "snapshot saved"
        );
        Ok(())
    }

    /// Read and verify a snapshot from `path`
    ///
    /// The payload length in the header must match the file, and decoding is
    /// bounded by it.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let mut header = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                ChainError::Corruption("truncated snapshot header".to_string())
            }
            _ => ChainError::Io(e),
        })?;

        if &header[0..4] != MAGIC {
            return Err(ChainError::Corruption(format!(
                "Invalid snapshot magic: expected SKCH, got {:?}",
                &header[0..4]
            )));
        }

        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != VERSION {
            return Err(ChainError::Corruption(format!(
                "Unsupported snapshot version: {}",
                version
            )));
        }

        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&header[6..14]);
        let payload_len = u64::from_le_bytes(len_bytes);

        let mut crc_bytes = [0u8; 4];
        crc_bytes.copy_from_slice(&header[14..18]);
        let expected_crc = u32::from_le_bytes(crc_bytes);

        let available = file_len.saturating_sub(HEADER_SIZE as u64);
        if available != payload_len {
            return Err(ChainError::Corruption(format!(
                "payload length mismatch: header says {}, found {}",
                payload_len, available
            )));
        }

        let mut payload = Vec::with_capacity(available as usize);
        reader.take(payload_len).read_to_end(&mut payload)?;
        if payload.len() as u64 != payload_len {
            return Err(ChainError::Corruption(format!(
                "payload length mismatch: header says {}, read {}",
                payload_len,
                payload.len()
            )));
        }

        let actual_crc = crc32fast::hash(&payload);
        if actual_crc != expected_crc {
            return Err(ChainError::Corruption(format!(
                "CRC mismatch: expected {:08x}, got {:08x}",
                expected_crc, actual_crc
            )));
        }

        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .with_limit(payload_len)
            .deserialize(&payload)
            .map_err(|e| ChainError::Serialization(e.to_string()))
    }
}
