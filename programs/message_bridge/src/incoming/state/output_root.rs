use anchor_lang::prelude::*;

/// Checkpoint of the remote accumulator at a given remote block.
///
/// Incoming messages are proven against these roots. Each one is attested by the validator
/// set and block numbers only ever increase from one checkpoint to the next.
#[account]
#[derive(InitSpace)]
pub struct OutputRoot {
    /// Root of the remote message accumulator at `block_number`.
    pub root: [u8; 32],

    pub block_number: u64,

    /// Number of leaves in the remote accumulator when `root` was computed. Proofs are only
    /// accepted against this shape.
    pub total_leaf_count: u64,
}
