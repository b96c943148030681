use serde::Serialize;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod constants;
pub mod error;

pub use constants::{GENESIS_PREVIOUS_HASH, HASH_HEX_SIZE};
pub use error::ChainError;

/// Digest of a block: SHA-256 over the textual representations of the four
/// fields concatenated with no separator, in the fixed order
/// index -> timestamp -> data -> previous_hash, hex-encoded lowercase.
pub fn block_hash(index: i64, timestamp: &str, data: &str, previous_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string().as_bytes());
    hasher.update(timestamp.as_bytes());
    hasher.update(data.as_bytes());
    hasher.update(previous_hash.as_bytes());
    hex::encode(hasher.finalize())
}

/// An immutable block. Fields are private and only readable: nothing can
/// change `hash` (or the fields it commits to) after construction.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Block {
    index: i64,
    timestamp: String,
    data: String,
    previous_hash: String,
    hash: String,
}

impl Block {
    pub fn index(&self) -> i64 {
        self.index
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.previous_hash == GENESIS_PREVIOUS_HASH
    }
}

/// Construction parameters for a block. `timestamp` is optional and resolved
/// to "now" when the draft is sealed; everything else is taken verbatim.
/// No validation happens here: indexes may be negative, `previous_hash` is
/// not checked against any actual block.
#[derive(Clone, Debug, Default)]
pub struct BlockDraft {
    pub index: i64,
    pub timestamp: Option<String>,
    pub data: String,
    pub previous_hash: String,
}

impl BlockDraft {
    pub fn new(index: i64, data: impl Into<String>, previous_hash: impl Into<String>) -> Self {
        Self {
            index,
            timestamp: None,
            data: data.into(),
            previous_hash: previous_hash.into(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Resolve the timestamp and freeze the block. Given an explicit
    /// timestamp this is pure: the same draft always seals to the same hash.
    pub fn seal(self) -> Block {
        let timestamp = self.timestamp.unwrap_or_else(unix_now);
        let hash = block_hash(self.index, &timestamp, &self.data, &self.previous_hash);
        Block {
            index: self.index,
            timestamp,
            data: self.data,
            previous_hash: self.previous_hash,
            hash,
        }
    }
}

fn unix_now() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs()
        .to_string()
}

pub mod chain {
    use super::*;
    use crate::error::ChainError;
    use tracing::debug;

    /// An ordered sequence of blocks where each non-genesis block's
    /// `previous_hash` equals its predecessor's `hash`. `append` maintains
    /// that property by reading the tip internally; `verify`/`check` test it
    /// on any sequence, including one built elsewhere.
    #[derive(Clone, Debug, Default, Serialize)]
    pub struct Chain {
        blocks: Vec<Block>,
    }

    impl Chain {
        pub fn new() -> Self {
            Self::default()
        }

        /// Adopt an existing sequence as-is. No validation; run `check` to
        /// find out whether the linkage actually holds.
        pub fn from_blocks(blocks: Vec<Block>) -> Self {
            Self { blocks }
        }

        pub fn into_blocks(self) -> Vec<Block> {
            self.blocks
        }

        pub fn blocks(&self) -> &[Block] {
            &self.blocks
        }

        pub fn tip(&self) -> Option<&Block> {
            self.blocks.last()
        }

        pub fn len(&self) -> usize {
            self.blocks.len()
        }

        pub fn is_empty(&self) -> bool {
            self.blocks.is_empty()
        }

        /// Append a block carrying `data`, timestamped "now". The index and
        /// `previous_hash` come from the current tip (sentinel values for an
        /// empty chain), so call sites cannot mislink the chain.
        pub fn append(&mut self, data: &[u8]) -> Result<&Block, ChainError> {
            self.push(data, None)
        }

        /// `append` with an explicit timestamp, for deterministic chains.
        pub fn append_at(
            &mut self,
            data: &[u8],
            timestamp: impl Into<String>,
        ) -> Result<&Block, ChainError> {
            self.push(data, Some(timestamp.into()))
        }

        fn push(&mut self, data: &[u8], timestamp: Option<String>) -> Result<&Block, ChainError> {
            let data = std::str::from_utf8(data)
                .map_err(|e| ChainError::InvalidInput(format!("payload is not text: {e}")))?;
            let (index, previous_hash) = match self.tip() {
                Some(tip) => (tip.index() + 1, tip.hash().to_string()),
                None => (0, GENESIS_PREVIOUS_HASH.to_string()),
            };
            let mut draft = BlockDraft::new(index, data, previous_hash);
            draft.timestamp = timestamp;
            let block = draft.seal();
            debug!(index, hash = block.hash(), "appended block");
            self.blocks.push(block);
            Ok(self.blocks.last().expect("chain is non-empty after push"))
        }

        /// Walk the chain and report the first broken block: a stored hash
        /// that no longer matches the recomputed digest, a genesis block
        /// without the sentinel `previous_hash`, or a `previous_hash` that is
        /// not the predecessor's `hash`. An empty chain passes.
        pub fn check(&self) -> Result<(), ChainError> {
            for (pos, block) in self.blocks.iter().enumerate() {
                let recomputed = block_hash(
                    block.index(),
                    block.timestamp(),
                    block.data(),
                    block.previous_hash(),
                );
                if recomputed != block.hash() {
                    return Err(ChainError::ChainBroken {
                        index: block.index(),
                        reason: format!(
                            "stored hash {} does not match recomputed digest {recomputed}",
                            block.hash()
                        ),
                    });
                }
                if pos == 0 {
                    if !block.is_genesis() {
                        return Err(ChainError::ChainBroken {
                            index: block.index(),
                            reason: format!(
                                "first block carries previous_hash {:?} instead of the \
                                 genesis sentinel {GENESIS_PREVIOUS_HASH:?}",
                                block.previous_hash()
                            ),
                        });
                    }
                } else {
                    let prev = &self.blocks[pos - 1];
                    if block.previous_hash() != prev.hash() {
                        return Err(ChainError::ChainBroken {
                            index: block.index(),
                            reason: format!(
                                "previous_hash {} does not match predecessor hash {}",
                                block.previous_hash(),
                                prev.hash()
                            ),
                        });
                    }
                }
            }
            Ok(())
        }

        pub fn verify(&self) -> bool {
            self.check().is_ok()
        }
    }
}
