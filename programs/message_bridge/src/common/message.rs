use anchor_lang::{prelude::*, solana_program::keccak};

/// Payload type tag committed to by every message hash.
#[derive(Debug, Copy, Clone, Eq, PartialEq, AnchorSerialize, AnchorDeserialize, InitSpace)]
#[repr(u8)]
pub enum MessageType {
    Call,
    Transfer,
    TransferAndCall,
}

/// inner_hash = keccak256(sender || ty || data)
///
/// The sender is hashed at its natural width (20 bytes for EVM origins, 32 bytes for Solana
/// origins). The inner hash does not commit to the nonce so that validators can attest to it
/// independently of the position it is later registered at.
pub fn hash_inner_message(sender: &[u8], ty: MessageType, data: &[u8]) -> [u8; 32] {
    keccak::hashv(&[sender, &[ty as u8], data]).0
}

/// message_hash = keccak256(nonce_be || inner_hash)
pub fn hash_message(nonce: u64, inner_hash: &[u8; 32]) -> [u8; 32] {
    keccak::hashv(&[&nonce.to_be_bytes(), inner_hash]).0
}
