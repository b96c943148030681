use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    /// A payload could not be converted to the canonical textual form
    /// required for hashing.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A block fails verification against its predecessor or its own
    /// recomputed digest.
    #[error("chain broken at block {index}: {reason}")]
    ChainBroken { index: i64, reason: String },
}
