use anchor_lang::prelude::*;

use crate::{
    common::{bridge::Bridge, BRIDGE_SEED, MAX_BATCH_SIZE},
    incoming::{constants::ATTESTED_BATCH_SEED, state::AttestedBatch},
};

#[derive(Accounts)]
#[instruction(inner_hashes: Vec<[u8; 32]>)]
pub struct RegisterMessages<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(mut, seeds = [BRIDGE_SEED], bump)]
    pub bridge: Account<'info, Bridge>,

    #[account(
        init,
        payer = payer,
        space = 8 + AttestedBatch::space(inner_hashes.len()),
        seeds = [
            ATTESTED_BATCH_SEED,
            bridge.verifier.next_sequence().to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub batch: Account<'info, AttestedBatch>,

    pub system_program: Program<'info, System>,
}

/// Registers a batch of inner message hashes approved by the validator set.
///
/// Each inner hash is bound to the next sequence number, so the stored hash of the i-th entry
/// is `hash_message(start_sequence + i, inner_hashes[i])`.
pub fn register_messages_handler(
    ctx: Context<RegisterMessages>,
    inner_hashes: Vec<[u8; 32]>,
    signatures: Vec<u8>,
) -> Result<()> {
    require!(
        inner_hashes.len() <= MAX_BATCH_SIZE,
        RegisterMessagesError::BatchTooLarge
    );

    let verifier = &mut ctx.accounts.bridge.verifier;
    let start_sequence = verifier.next_sequence();
    let message_hashes = verifier.register_batch(&inner_hashes, &signatures)?;

    emit!(MessagesRegistered {
        start_sequence,
        message_hashes: message_hashes.clone(),
    });

    *ctx.accounts.batch = AttestedBatch {
        start_sequence,
        message_hashes,
    };

    Ok(())
}

#[event]
pub struct MessagesRegistered {
    pub start_sequence: u64,
    pub message_hashes: Vec<[u8; 32]>,
}

#[error_code]
pub enum RegisterMessagesError {
    #[msg("Batch exceeds the maximum batch size")]
    BatchTooLarge,
}
