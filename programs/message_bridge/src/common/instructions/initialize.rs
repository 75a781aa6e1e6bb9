use anchor_lang::prelude::*;

use crate::{
    common::{
        bridge::{Bridge, ProtocolConfig},
        BRIDGE_SEED,
    },
    incoming::internal::{
        relay::{RelayConfig, RelayState},
        validators::{ThresholdVerifier, ValidatorSet},
    },
    outgoing::{internal::mmr::MmrPeaks, MessageAccumulator, MESSAGE_ACCUMULATOR_SEED},
};

/// Accounts struct for the initialize instruction that sets up the bridge program's initial state.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The account that pays for the transaction and account creation.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The bridge state account being initialized.
    #[account(
        init,
        payer = payer,
        seeds = [BRIDGE_SEED],
        bump,
        space = 8 + Bridge::INIT_SPACE
    )]
    pub bridge: Account<'info, Bridge>,

    /// The outgoing message accumulator, created empty.
    #[account(
        init,
        payer = payer,
        seeds = [MESSAGE_ACCUMULATOR_SEED],
        bump,
        space = 8 + MessageAccumulator::INIT_SPACE
    )]
    pub accumulator: Account<'info, MessageAccumulator>,

    /// The guardian account that will have administrative authority over the bridge.
    /// Must be a signer to ensure the initializer controls this account.
    pub guardian: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_handler(
    ctx: Context<Initialize>,
    trusted_relayer: Pubkey,
    validators: Vec<[u8; 20]>,
    threshold: u8,
    relay_config: RelayConfig,
    protocol_config: ProtocolConfig,
) -> Result<()> {
    protocol_config.validate()?;
    let validator_set = ValidatorSet::new(validators, threshold)?;

    *ctx.accounts.bridge = Bridge {
        guardian: ctx.accounts.guardian.key(),
        trusted_relayer,
        outgoing_nonce: 0,
        relay: RelayState::default(),
        relay_config,
        verifier: ThresholdVerifier::new(validator_set),
        last_output_root_block: 0,
        protocol_config,
    };

    ctx.accounts.accumulator.peaks = MmrPeaks::new();

    Ok(())
}
