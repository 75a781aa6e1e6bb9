use anchor_lang::prelude::*;

use crate::{
    common::{bridge::Bridge, MessageType, BRIDGE_SEED},
    outgoing::{
        MessageAccumulator, OutgoingMessage, MESSAGE_ACCUMULATOR_SEED, OUTGOING_MESSAGE_SEED,
    },
};

#[derive(Accounts)]
#[instruction(ty: MessageType, data: Vec<u8>)]
pub struct SendMessage<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The sender of the message. Its key is the origin committed to by the message hash.
    pub from: Signer<'info>,

    #[account(mut, seeds = [BRIDGE_SEED], bump)]
    pub bridge: Account<'info, Bridge>,

    #[account(mut, seeds = [MESSAGE_ACCUMULATOR_SEED], bump)]
    pub accumulator: Account<'info, MessageAccumulator>,

    #[account(
        init,
        seeds = [
            OUTGOING_MESSAGE_SEED,
            bridge.outgoing_nonce.to_le_bytes().as_ref(),
        ],
        bump,
        payer = payer,
        space = 8 + OutgoingMessage::space(data.len()),
    )]
    pub outgoing_message: Account<'info, OutgoingMessage>,

    pub system_program: Program<'info, System>,
}

pub fn send_message_handler(
    ctx: Context<SendMessage>,
    ty: MessageType,
    data: Vec<u8>,
    gas_limit: u64,
) -> Result<()> {
    let nonce = ctx.accounts.bridge.outgoing_nonce;
    let sender = ctx.accounts.from.key();

    let message = OutgoingMessage {
        nonce,
        sender,
        ty,
        gas_limit,
        data,
    };
    let message_hash = message.hash();

    let peaks = &mut ctx.accounts.accumulator.peaks;
    let position = peaks.append(message_hash)?;
    require_eq!(position, nonce, SendMessageError::NonceMismatch);
    let root = peaks.root()?;

    *ctx.accounts.outgoing_message = message;
    ctx.accounts.bridge.outgoing_nonce = nonce
        .checked_add(1)
        .ok_or(error!(SendMessageError::NonceOverflow))?;

    emit!(MessageSent {
        nonce,
        sender,
        message_hash,
        root,
    });

    Ok(())
}

#[event]
pub struct MessageSent {
    pub nonce: u64,
    pub sender: Pubkey,
    pub message_hash: [u8; 32],
    /// Accumulator root after the append.
    pub root: [u8; 32],
}

#[error_code]
pub enum SendMessageError {
    #[msg("Accumulator position does not match the outgoing nonce")]
    NonceMismatch,
    #[msg("Nonce overflow")]
    NonceOverflow,
}
