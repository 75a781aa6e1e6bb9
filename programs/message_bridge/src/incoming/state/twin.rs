use anchor_lang::prelude::*;

/// Execution context of a remote sender, stored at `[TWIN_SEED, origin]`.
///
/// The twin signs every instruction relayed on behalf of `origin`. It is created on the first
/// relay from that origin and never closed.
#[account]
#[derive(Debug, InitSpace)]
pub struct Twin {
    pub origin: [u8; 20],
    pub bump: u8,
    pub initialized: bool,
}
