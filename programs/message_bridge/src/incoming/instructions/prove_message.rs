use anchor_lang::prelude::*;

use crate::{
    incoming::{
        constants::INCOMING_MESSAGE_SEED,
        state::{IncomingMessage, OutputRoot},
    },
    outgoing::internal::mmr::{self, Proof},
};

#[derive(Accounts)]
#[instruction(message_hash: [u8; 32])]
pub struct ProveMessage<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + IncomingMessage::INIT_SPACE,
        seeds = [INCOMING_MESSAGE_SEED, message_hash.as_ref()],
        bump
    )]
    pub message: Account<'info, IncomingMessage>,

    pub output_root: Account<'info, OutputRoot>,

    pub system_program: Program<'info, System>,
}

pub fn prove_message_handler(
    ctx: Context<ProveMessage>,
    message_hash: [u8; 32],
    proof: Proof,
) -> Result<()> {
    require!(
        !ctx.accounts.message.attested,
        ProveMessageError::AlreadyProven
    );

    let output_root = &ctx.accounts.output_root;
    require_eq!(
        proof.total_leaf_count,
        output_root.total_leaf_count,
        ProveMessageError::LeafCountMismatch
    );

    // Verify the MMR proof to ensure the message exists on the source chain
    mmr::verify_proof(&output_root.root, &message_hash, &proof)?;

    ctx.accounts.message.attested = true;

    emit!(MessageProven {
        message_hash,
        block_number: output_root.block_number,
    });

    Ok(())
}

#[event]
pub struct MessageProven {
    pub message_hash: [u8; 32],
    pub block_number: u64,
}

#[error_code]
pub enum ProveMessageError {
    #[msg("Message has already been proven")]
    AlreadyProven,
    #[msg("Proof leaf count does not match the output root")]
    LeafCountMismatch,
}
