pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;

/// `previous_hash` of a genesis block. One character, so it can never
/// collide with a real digest (those are always `HASH_HEX_SIZE` chars).
pub const GENESIS_PREVIOUS_HASH: &str = "0";
