use anchor_lang::prelude::*;

use crate::common::{hash_inner_message, hash_message, MessageType};

/// Body of a message sent to the remote chain, stored at `[OUTGOING_MESSAGE_SEED, nonce_le]`
/// so that relayers can rebuild its accumulator leaf.
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Leaf position of the message in the accumulator.
    pub nonce: u64,
    pub sender: Pubkey,
    pub ty: MessageType,
    pub gas_limit: u64,
    pub data: Vec<u8>,
}

impl OutgoingMessage {
    pub fn space(data_len: usize) -> usize {
        8 + // nonce
        32 + // sender
        1 + // ty
        8 + // gas_limit
        4 + data_len // data
    }

    pub fn inner_hash(&self) -> [u8; 32] {
        hash_inner_message(self.sender.as_ref(), self.ty, &self.data)
    }

    /// Accumulator leaf of the message.
    pub fn hash(&self) -> [u8; 32] {
        hash_message(self.nonce, &self.inner_hash())
    }
}
