use anchor_lang::{prelude::*, solana_program::compute_units::sol_remaining_compute_units};

use crate::{
    common::{bridge::Bridge, BRIDGE_SEED},
    incoming::{
        constants::{INCOMING_MESSAGE_SEED, TWIN_SEED},
        internal::{
            execution::{CpiDispatcher, TwinProvider},
            message::Message,
            relay::{self, Caller, FailureReason, RelayError, RelayOutcome, RelayRequest},
        },
        state::{AttestedBatch, IncomingMessage, Twin},
    },
};

#[derive(Accounts)]
#[instruction(message_hash: [u8; 32], message: Message)]
pub struct RelayMessage<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(mut, seeds = [BRIDGE_SEED], bump)]
    pub bridge: Account<'info, Bridge>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + IncomingMessage::INIT_SPACE,
        seeds = [INCOMING_MESSAGE_SEED, message_hash.as_ref()],
        bump
    )]
    pub incoming_message: Account<'info, IncomingMessage>,

    /// Batch containing the message hash when it was attested by the validator set instead of
    /// proven against an output root.
    pub attested_batch: Option<Account<'info, AttestedBatch>>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + Twin::INIT_SPACE,
        seeds = [TWIN_SEED, message.sender.as_ref()],
        bump
    )]
    pub twin: Account<'info, Twin>,

    pub system_program: Program<'info, System>,
}

pub fn relay_message_handler<'a, 'info>(
    ctx: Context<'a, '_, 'info, 'info, RelayMessage<'info>>,
    message_hash: [u8; 32],
    message: Message,
    is_estimation: bool,
) -> Result<()> {
    require!(
        message.hash() == message_hash,
        RelayError::MessageHashMismatch
    );

    let twin_bump = ctx.bumps.twin;
    let remaining_accounts = ctx.remaining_accounts;
    let RelayMessage {
        payer,
        bridge,
        incoming_message,
        attested_batch,
        twin,
        ..
    } = ctx.accounts;

    let caller = match payer.key() == bridge.trusted_relayer {
        true => Caller::TrustedRelayer,
        false => Caller::Permissionless,
    };

    // Permissionless retries only apply to Failed messages, which were authenticated on their
    // first attempt.
    if caller == Caller::TrustedRelayer {
        let authenticated = incoming_message.attested
            || attested_batch
                .as_ref()
                .is_some_and(|batch| batch.contains(&message_hash));
        require!(authenticated, RelayError::MessageNotAuthenticated);
    }

    let relay_config = bridge.relay_config;
    let twin_info = twin.to_account_info();

    let mut contexts = TwinProvider {
        twin,
        bump: twin_bump,
    };
    let mut dispatcher = CpiDispatcher {
        twin: twin_info,
        remaining_accounts,
    };

    let outcome = relay::relay_message(
        &mut bridge.relay,
        &relay_config,
        &mut incoming_message.status,
        &mut contexts,
        &mut dispatcher,
        &RelayRequest {
            message: &message,
            caller,
            remaining_budget: sol_remaining_compute_units(),
            is_estimation,
        },
    )?;

    match outcome {
        RelayOutcome::Succeeded => emit!(MessageRelayed {
            message_hash,
            nonce: message.nonce,
            sender: message.sender,
        }),
        RelayOutcome::Failed(reason) => emit!(MessageFailed {
            message_hash,
            nonce: message.nonce,
            sender: message.sender,
            reason,
        }),
    }

    Ok(())
}

#[event]
pub struct MessageRelayed {
    pub message_hash: [u8; 32],
    pub nonce: u64,
    pub sender: [u8; 20],
}

#[event]
pub struct MessageFailed {
    pub message_hash: [u8; 32],
    pub nonce: u64,
    pub sender: [u8; 20],
    pub reason: FailureReason,
}
