use anchor_lang::prelude::*;

pub const BRIDGE_SEED: &[u8] = b"bridge";

#[constant]
/// Maximum number of registered validators. Keep in sync with the `max_len` of `ValidatorSet`.
pub const MAX_VALIDATOR_COUNT: usize = 16;

#[constant]
/// Maximum number of inner hashes accepted by a single `register_messages` call. Keeps a batch
/// and its signatures within the size of one transaction.
pub const MAX_BATCH_SIZE: usize = 16;

#[constant]
/// Compute units reserved for the relay bookkeeping that runs after the bounded execution.
pub const DEFAULT_RELAY_OVERHEAD: u64 = 40_000;

#[constant]
/// Compute units reserved for the execution between the budget check and the bounded
/// execution.
pub const DEFAULT_RELAY_GAS_CHECK_BUFFER: u64 = 5_000;

#[constant]
/// Output roots may only be registered for block numbers that are a multiple of this.
pub const DEFAULT_BLOCK_INTERVAL_REQUIREMENT: u64 = 300;

#[constant]
pub const MAX_BLOCK_INTERVAL_REQUIREMENT: u64 = 1_000;
