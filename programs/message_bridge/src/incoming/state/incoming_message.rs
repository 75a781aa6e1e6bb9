use anchor_lang::prelude::*;

use crate::incoming::internal::relay::MessageStatus;

/// Outcome record of an incoming message, stored at `[INCOMING_MESSAGE_SEED, message_hash]`.
#[account]
#[derive(Debug, InitSpace)]
pub struct IncomingMessage {
    /// Set once the message has been proven against a registered output root.
    pub attested: bool,
    pub status: MessageStatus,
}
