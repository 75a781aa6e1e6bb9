use anchor_lang::prelude::*;

use crate::outgoing::internal::mmr::MmrPeaks;

/// Peaks of the accumulator over the hashes of every message sent to the remote chain, stored
/// at `[MESSAGE_ACCUMULATOR_SEED]`.
///
/// The account has a fixed size. Proofs are served from an off-chain replica rebuilt from the
/// stored `OutgoingMessage` accounts.
#[account]
#[derive(Debug, InitSpace)]
pub struct MessageAccumulator {
    pub peaks: MmrPeaks,
}
