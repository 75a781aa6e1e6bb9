use anchor_lang::prelude::*;

/// Message hashes approved together by the validator set, stored at
/// `[ATTESTED_BATCH_SEED, start_sequence]`.
#[account]
#[derive(Debug)]
pub struct AttestedBatch {
    /// Sequence number of the first hash in the batch.
    pub start_sequence: u64,
    pub message_hashes: Vec<[u8; 32]>,
}

impl AttestedBatch {
    pub fn space(batch_len: usize) -> usize {
        8 + // start_sequence
        4 + 32 * batch_len // message_hashes
    }

    pub fn contains(&self, message_hash: &[u8; 32]) -> bool {
        self.message_hashes.iter().any(|h| h == message_hash)
    }
}
