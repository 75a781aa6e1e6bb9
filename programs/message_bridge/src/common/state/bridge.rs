use anchor_lang::prelude::*;

use crate::{
    common::{ConfigError, DEFAULT_BLOCK_INTERVAL_REQUIREMENT, MAX_BLOCK_INTERVAL_REQUIREMENT},
    incoming::internal::{
        relay::{RelayConfig, RelayState},
        validators::ThresholdVerifier,
    },
};

/// Global state of the bridge, stored at `[BRIDGE_SEED]`.
#[account]
#[derive(Debug, PartialEq, Eq, InitSpace)]
pub struct Bridge {
    /// Authority allowed to update configuration and the validator set.
    pub guardian: Pubkey,

    /// Relayer allowed to relay never-attempted messages, in nonce order.
    pub trusted_relayer: Pubkey,

    /// Number of messages sent to the remote chain. Also the nonce of the next one.
    pub outgoing_nonce: u64,

    pub relay: RelayState,

    pub relay_config: RelayConfig,

    /// Validator set with the sequence counter of the attestation path.
    pub verifier: ThresholdVerifier,

    /// Remote block number of the latest registered output root.
    pub last_output_root_block: u64,

    pub protocol_config: ProtocolConfig,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct ProtocolConfig {
    /// Output roots may only be registered for block numbers that are a multiple of this.
    pub block_interval_requirement: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            block_interval_requirement: DEFAULT_BLOCK_INTERVAL_REQUIREMENT,
        }
    }
}

impl ProtocolConfig {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.block_interval_requirement > 0
                && self.block_interval_requirement <= MAX_BLOCK_INTERVAL_REQUIREMENT,
            ConfigError::InvalidBlockIntervalRequirement
        );
        Ok(())
    }
}
