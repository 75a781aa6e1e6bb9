use anchor_lang::prelude::*;

use crate::{
    common::{
        bridge::{Bridge, ProtocolConfig},
        BRIDGE_SEED,
    },
    incoming::internal::relay::RelayConfig,
};

/// Accounts struct for bridge configuration setter instructions
/// Only the guardian can update these parameters
#[derive(Accounts)]
pub struct SetBridgeConfig<'info> {
    /// The bridge account containing configuration
    #[account(
        mut,
        has_one = guardian @ ConfigError::UnauthorizedConfigUpdate,
        seeds = [BRIDGE_SEED],
        bump
    )]
    pub bridge: Account<'info, Bridge>,

    /// The guardian account authorized to update configuration
    pub guardian: Signer<'info>,
}

pub fn set_trusted_relayer_handler(
    ctx: Context<SetBridgeConfig>,
    new_trusted_relayer: Pubkey,
) -> Result<()> {
    let old_trusted_relayer = ctx.accounts.bridge.trusted_relayer;
    ctx.accounts.bridge.trusted_relayer = new_trusted_relayer;

    emit!(TrustedRelayerUpdated {
        old_trusted_relayer,
        new_trusted_relayer,
    });

    Ok(())
}

pub fn set_relay_config_handler(ctx: Context<SetBridgeConfig>, cfg: RelayConfig) -> Result<()> {
    ctx.accounts.bridge.relay_config = cfg;
    Ok(())
}

pub fn set_protocol_config_handler(
    ctx: Context<SetBridgeConfig>,
    cfg: ProtocolConfig,
) -> Result<()> {
    cfg.validate()?;
    ctx.accounts.bridge.protocol_config = cfg;
    Ok(())
}

#[event]
pub struct TrustedRelayerUpdated {
    pub old_trusted_relayer: Pubkey,
    pub new_trusted_relayer: Pubkey,
}

/// Error codes for configuration updates
#[error_code]
pub enum ConfigError {
    #[msg("Unauthorized to update configuration")]
    UnauthorizedConfigUpdate = 6000,
    #[msg("Block interval requirement must be between 1 and the maximum")]
    InvalidBlockIntervalRequirement = 6001,
}
