use anchor_lang::prelude::*;

use crate::common::{DEFAULT_RELAY_GAS_CHECK_BUFFER, DEFAULT_RELAY_OVERHEAD};

use super::message::Message;

/// Outcome record of an incoming message, keyed by its hash.
///
/// `Failed` stays eligible for retry. `Succeeded` is terminal.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub enum MessageStatus {
    #[default]
    Unseen,
    Failed,
    Succeeded,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct RelayConfig {
    /// Budget reserved for the work that follows the bounded execution.
    pub relay_overhead: u64,
    /// Budget reserved for the work between the budget check and the bounded execution.
    pub gas_check_buffer: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            relay_overhead: DEFAULT_RELAY_OVERHEAD,
            gas_check_buffer: DEFAULT_RELAY_GAS_CHECK_BUFFER,
        }
    }
}

impl RelayConfig {
    /// Budget left for the bounded execution once the reserved amounts are set aside.
    pub fn available_budget(&self, remaining_budget: u64) -> u64 {
        remaining_budget
            .saturating_sub(self.relay_overhead)
            .saturating_sub(self.gas_check_buffer)
    }
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct RelayState {
    /// Nonce the trusted relayer must relay next.
    pub next_incoming_nonce: u64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Caller {
    TrustedRelayer,
    Permissionless,
}

pub struct RelayRequest<'a> {
    pub message: &'a Message,
    pub caller: Caller,
    /// Execution budget left to the relay call when it starts.
    pub remaining_budget: u64,
    pub is_estimation: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, AnchorSerialize, AnchorDeserialize)]
pub enum FailureReason {
    InsufficientBudget,
    ExecutionFailed,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RelayOutcome {
    Succeeded,
    Failed(FailureReason),
}

/// Supplies the execution scope of an origin, creating it the first time it is requested.
pub trait ExecutionContextProvider {
    type Context;

    fn get_or_create(&mut self, origin: &[u8; 20]) -> Result<Self::Context>;
}

/// Executes a message payload within a context, consuming at most `resource_ceiling`.
pub trait Dispatcher<C> {
    fn dispatch(&mut self, context: &C, message: &Message, resource_ceiling: u64) -> Result<()>;
}

/// Runs one relay attempt of `request.message` and records its outcome in `status`.
///
/// Only protocol preconditions return an error, and they do so before anything is mutated.
/// Insufficient budget and payload failures are recorded as `Failed` and reported through the
/// returned outcome. In estimation mode insufficient budget is an error instead, so callers can
/// tell an underfunded attempt apart from a failing payload.
pub fn relay_message<P, D>(
    state: &mut RelayState,
    config: &RelayConfig,
    status: &mut MessageStatus,
    contexts: &mut P,
    dispatcher: &mut D,
    request: &RelayRequest<'_>,
) -> Result<RelayOutcome>
where
    P: ExecutionContextProvider,
    D: Dispatcher<P::Context>,
{
    let message = request.message;

    require!(
        *status != MessageStatus::Succeeded,
        RelayError::AlreadySucceeded
    );

    let next_incoming_nonce = match request.caller {
        Caller::TrustedRelayer => {
            require_eq!(
                message.nonce,
                state.next_incoming_nonce,
                RelayError::NonceOutOfOrder
            );
            require!(*status != MessageStatus::Failed, RelayError::AlreadyFailed);
            Some(
                state
                    .next_incoming_nonce
                    .checked_add(1)
                    .ok_or(error!(RelayError::NonceOverflow))?,
            )
        }
        Caller::Permissionless => {
            require!(
                *status == MessageStatus::Failed,
                RelayError::OnlyFailedMessagesCanBeRetried
            );
            None
        }
    };

    if config.available_budget(request.remaining_budget) < message.gas_limit {
        require!(!request.is_estimation, RelayError::InsufficientBudget);

        msg!(
            "Insufficient budget to relay message {}: remaining {}, limit {}",
            message.nonce,
            request.remaining_budget,
            message.gas_limit
        );
        *status = MessageStatus::Failed;
        if let Some(next) = next_incoming_nonce {
            state.next_incoming_nonce = next;
        }
        return Ok(RelayOutcome::Failed(FailureReason::InsufficientBudget));
    }

    let context = contexts.get_or_create(&message.sender)?;

    let outcome = match dispatcher.dispatch(&context, message, message.gas_limit) {
        Ok(()) => {
            *status = MessageStatus::Succeeded;
            RelayOutcome::Succeeded
        }
        Err(err) => {
            msg!("Message {} failed: {}", message.nonce, err);
            *status = MessageStatus::Failed;
            RelayOutcome::Failed(FailureReason::ExecutionFailed)
        }
    };

    if let Some(next) = next_incoming_nonce {
        state.next_incoming_nonce = next;
    }

    Ok(outcome)
}

#[error_code]
pub enum RelayError {
    #[msg("Message has already been relayed successfully")]
    AlreadySucceeded,
    #[msg("Message has already failed and can only be retried")]
    AlreadyFailed,
    #[msg("Nonce does not match the next expected nonce")]
    NonceOutOfOrder,
    #[msg("Nonce overflow")]
    NonceOverflow,
    #[msg("Only failed messages can be retried")]
    OnlyFailedMessagesCanBeRetried,
    #[msg("Insufficient budget to relay the message")]
    InsufficientBudget,
    #[msg("Message hash does not match the message")]
    MessageHashMismatch,
    #[msg("Message has not been proven or attested")]
    MessageNotAuthenticated,
    #[msg("Twin account belongs to another origin")]
    TwinOriginMismatch,
}
