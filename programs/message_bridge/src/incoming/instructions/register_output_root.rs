use anchor_lang::prelude::*;

use crate::{
    common::{bridge::Bridge, BRIDGE_SEED},
    incoming::{
        constants::OUTPUT_ROOT_SEED, internal::signatures::compute_output_root_message_hash,
        state::OutputRoot,
    },
};

#[derive(Accounts)]
#[instruction(_output_root: [u8; 32], block_number: u64)]
pub struct RegisterOutputRoot<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = 8 + OutputRoot::INIT_SPACE,
        seeds = [OUTPUT_ROOT_SEED, &block_number.to_le_bytes()],
        bump
    )]
    pub root: Account<'info, OutputRoot>,

    #[account(
        mut,
        seeds = [BRIDGE_SEED],
        bump,
    )]
    pub bridge: Account<'info, Bridge>,

    pub system_program: Program<'info, System>,
}

pub fn register_output_root_handler(
    ctx: Context<RegisterOutputRoot>,
    output_root: [u8; 32],
    block_number: u64,
    total_leaf_count: u64,
    signatures: Vec<u8>,
) -> Result<()> {
    let bridge = &mut ctx.accounts.bridge;

    require!(
        block_number > bridge.last_output_root_block,
        CheckpointError::StaleBlockNumber
    );
    require!(
        block_number % bridge.protocol_config.block_interval_requirement == 0,
        CheckpointError::InvalidBlockNumber
    );

    let digest = compute_output_root_message_hash(&output_root, block_number, total_leaf_count);
    bridge
        .verifier
        .validator_set
        .verify_signatures(&digest, &signatures)?;

    bridge.last_output_root_block = block_number;

    let root = &mut ctx.accounts.root;
    root.root = output_root;
    root.block_number = block_number;
    root.total_leaf_count = total_leaf_count;

    emit!(OutputRootRegistered {
        output_root,
        block_number,
        total_leaf_count,
    });

    Ok(())
}

#[event]
pub struct OutputRootRegistered {
    pub output_root: [u8; 32],
    pub block_number: u64,
    pub total_leaf_count: u64,
}

#[error_code]
pub enum CheckpointError {
    #[msg("Block number is not above the last registered output root")]
    StaleBlockNumber,
    #[msg("Block number is not a multiple of the block interval requirement")]
    InvalidBlockNumber,
}
