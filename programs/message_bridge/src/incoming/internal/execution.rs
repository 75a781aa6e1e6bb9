use anchor_lang::{
    prelude::*,
    solana_program::{self, instruction::Instruction},
};

use crate::incoming::{constants::TWIN_SEED, ix::Ix, state::Twin};

use super::{
    message::Message,
    relay::{Dispatcher, ExecutionContextProvider, RelayError},
};

/// Resolved twin of a remote sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwinContext {
    pub address: Pubkey,
    pub origin: [u8; 20],
    pub bump: u8,
}

/// Provides the twin PDA of the message sender, writing its state the first time it is used.
pub struct TwinProvider<'a, 'info> {
    pub twin: &'a mut Account<'info, Twin>,
    pub bump: u8,
}

impl ExecutionContextProvider for TwinProvider<'_, '_> {
    type Context = TwinContext;

    fn get_or_create(&mut self, origin: &[u8; 20]) -> Result<TwinContext> {
        if !self.twin.initialized {
            self.twin.origin = *origin;
            self.twin.bump = self.bump;
            self.twin.initialized = true;
            msg!("Created twin {} for {}", self.twin.key(), hex::encode(origin));
        }

        require!(
            self.twin.origin == *origin,
            RelayError::TwinOriginMismatch
        );

        Ok(TwinContext {
            address: self.twin.key(),
            origin: *origin,
            bump: self.twin.bump,
        })
    }
}

/// Executes the payload instructions by CPI, with the twin prepended as signer.
///
/// CPIs draw from the transaction's compute meter. The ceiling was reserved by the budget
/// check before dispatch and is not tracked per instruction.
///
/// Only errors raised before a CPI runs, such as an undecodable payload, come back as `Err`
/// and are recorded as a failure. A reverting callee aborts the whole transaction and leaves
/// the message untouched. Since the gas limit is not part of the message hash, the trusted
/// relayer moves past a payload that always reverts by relaying it with a gas limit above the
/// available budget: the message is recorded as `Failed` and stays retryable by anyone.
pub struct CpiDispatcher<'a, 'info> {
    pub twin: AccountInfo<'info>,
    pub remaining_accounts: &'a [AccountInfo<'info>],
}

impl Dispatcher<TwinContext> for CpiDispatcher<'_, '_> {
    fn dispatch(
        &mut self,
        context: &TwinContext,
        message: &Message,
        _resource_ceiling: u64,
    ) -> Result<()> {
        let ixs = Vec::<Ix>::try_from_slice(&message.data)?;

        let bump = [context.bump];
        let twin_seeds: &[&[u8]] = &[TWIN_SEED, context.origin.as_ref(), &bump];

        let mut account_infos = vec![self.twin.clone()];
        account_infos.extend_from_slice(self.remaining_accounts);

        for ix in ixs {
            let mut ix: Instruction = ix.into();

            let mut accounts = vec![AccountMeta::new_readonly(context.address, true)];
            accounts.extend_from_slice(&ix.accounts);
            ix.accounts = accounts;

            solana_program::program::invoke_signed(&ix, &account_infos, &[twin_seeds])?;
        }

        Ok(())
    }
}
