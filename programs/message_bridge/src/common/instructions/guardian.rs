use anchor_lang::prelude::*;

use crate::common::{bridge::Bridge, BRIDGE_SEED};

#[derive(Accounts)]
pub struct TransferGuardian<'info> {
    #[account(
        mut,
        has_one = guardian @ GuardianError::UnauthorizedGuardianTransfer,
        seeds = [BRIDGE_SEED],
        bump
    )]
    pub bridge: Account<'info, Bridge>,

    /// Current guardian of the bridge. Governs the validator set and every configuration value.
    pub guardian: Signer<'info>,
}

/// Hands the bridge authority over to `new_guardian`. The default pubkey is rejected since
/// nobody can sign for it.
pub fn transfer_guardian_handler(
    ctx: Context<TransferGuardian>,
    new_guardian: Pubkey,
) -> Result<()> {
    require_keys_neq!(
        new_guardian,
        Pubkey::default(),
        GuardianError::InvalidGuardian
    );

    let bridge = &mut ctx.accounts.bridge;
    let previous_guardian = std::mem::replace(&mut bridge.guardian, new_guardian);

    emit!(GuardianTransferred {
        previous_guardian,
        new_guardian,
    });

    Ok(())
}

#[event]
pub struct GuardianTransferred {
    pub previous_guardian: Pubkey,
    pub new_guardian: Pubkey,
}

#[error_code]
pub enum GuardianError {
    #[msg("Only the guardian can transfer the bridge authority")]
    UnauthorizedGuardianTransfer = 7000,
    #[msg("New guardian must not be the default pubkey")]
    InvalidGuardian = 7001,
}
