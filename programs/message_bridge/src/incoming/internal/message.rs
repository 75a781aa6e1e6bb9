use anchor_lang::prelude::*;

use crate::common::{hash_inner_message, hash_message, MessageType};

/// A message received from the remote chain.
///
/// `gas_limit` bounds the execution of the payload and is not part of the message hash.
#[derive(Debug, Clone, Eq, PartialEq, AnchorSerialize, AnchorDeserialize)]
pub struct Message {
    pub nonce: u64,
    /// EVM address of the remote sender.
    pub sender: [u8; 20],
    pub ty: MessageType,
    pub gas_limit: u64,
    /// Borsh-encoded `Vec<Ix>` executed with the sender's twin as signer.
    pub data: Vec<u8>,
}

impl Message {
    pub fn inner_hash(&self) -> [u8; 32] {
        hash_inner_message(&self.sender, self.ty, &self.data)
    }

    pub fn hash(&self) -> [u8; 32] {
        hash_message(self.nonce, &self.inner_hash())
    }
}
