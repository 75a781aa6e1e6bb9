use anchor_lang::prelude::*;

use crate::common::SetBridgeConfig;

/// Registers a new validator. Zero and already registered addresses are rejected.
pub fn add_validator_handler(ctx: Context<SetBridgeConfig>, validator: [u8; 20]) -> Result<()> {
    let validator_set = &mut ctx.accounts.bridge.verifier.validator_set;
    validator_set.add_validator(validator)?;

    emit!(ValidatorAdded {
        validator,
        validator_count: validator_set.len() as u8,
    });

    Ok(())
}

/// Removes a validator. Rejected if fewer validators than the threshold would remain.
pub fn remove_validator_handler(
    ctx: Context<SetBridgeConfig>,
    validator: [u8; 20],
) -> Result<()> {
    let validator_set = &mut ctx.accounts.bridge.verifier.validator_set;
    validator_set.remove_validator(&validator)?;

    emit!(ValidatorRemoved {
        validator,
        validator_count: validator_set.len() as u8,
    });

    Ok(())
}

pub fn set_threshold_handler(ctx: Context<SetBridgeConfig>, new_threshold: u8) -> Result<()> {
    let validator_set = &mut ctx.accounts.bridge.verifier.validator_set;
    let old_threshold = validator_set.threshold();
    validator_set.set_threshold(new_threshold)?;

    emit!(ThresholdUpdated {
        old_threshold,
        new_threshold,
    });

    Ok(())
}

#[event]
pub struct ValidatorAdded {
    pub validator: [u8; 20],
    pub validator_count: u8,
}

#[event]
pub struct ValidatorRemoved {
    pub validator: [u8; 20],
    pub validator_count: u8,
}

#[event]
pub struct ThresholdUpdated {
    pub old_threshold: u8,
    pub new_threshold: u8,
}
