use anchor_lang::{
    prelude::*,
    solana_program::{keccak, secp256k1_recover::secp256k1_recover},
};

/// Length of one (r, s, v) signature in a signature blob.
pub const SIGNATURE_LENGTH: usize = 65;

/// message = keccak256(output_root || block_number_be || total_leaf_count_be)
pub fn compute_output_root_message_hash(
    output_root: &[u8; 32],
    block_number: u64,
    total_leaf_count: u64,
) -> [u8; 32] {
    keccak::hashv(&[
        output_root,
        &block_number.to_be_bytes(),
        &total_leaf_count.to_be_bytes(),
    ])
    .0
}

/// Splits a blob of concatenated 65-byte signatures. There is no count prefix.
pub fn split_signatures(blob: &[u8]) -> Result<Vec<[u8; SIGNATURE_LENGTH]>> {
    require!(
        blob.len() % SIGNATURE_LENGTH == 0,
        SignatureError::InvalidSignatureLength
    );

    blob.chunks_exact(SIGNATURE_LENGTH)
        .map(|chunk| {
            <[u8; SIGNATURE_LENGTH]>::try_from(chunk)
                .map_err(|_| error!(SignatureError::InvalidSignatureLength))
        })
        .collect()
}

/// Recovers the Ethereum address from a 65-byte Secp256k1 signature over the given message hash.
/// Returns the 20-byte EVM address (keccak(pubkey)[12..32]).
///
/// The recovery byte may be given either raw (0/1) or Ethereum-offset (27/28).
pub fn recover_eth_address(signature: &[u8], message_hash: &[u8; 32]) -> Result<[u8; 20]> {
    if signature.len() != SIGNATURE_LENGTH {
        return err!(SignatureError::InvalidSignatureLength);
    }

    let recovery_id = match signature[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        _ => return err!(SignatureError::InvalidRecoveryId),
    };

    let recovered_pubkey = secp256k1_recover(message_hash, recovery_id, &signature[..64])
        .map_err(|_| error!(SignatureError::SignatureVerificationFailed))?;

    Ok(eth_address(&recovered_pubkey.to_bytes()))
}

/// keccak(uncompressed_pubkey_without_prefix)[12..32]
pub fn eth_address(pubkey: &[u8; 64]) -> [u8; 20] {
    let h = keccak::hash(pubkey).to_bytes();

    let mut address = [0u8; 20];
    address.copy_from_slice(&h[12..]);
    address
}

#[error_code]
pub enum SignatureError {
    #[msg("Invalid signature length")]
    InvalidSignatureLength,
    #[msg("Invalid recovery ID")]
    InvalidRecoveryId,
    #[msg("Signature verification failed")]
    SignatureVerificationFailed,
}
