#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;

pub mod common;
pub mod incoming;
pub mod outgoing;

#[cfg(test)]
mod test_utils;

use common::*;
use incoming::*;
use outgoing::*;

use incoming::internal::{message::Message, relay::RelayConfig};
use outgoing::internal::mmr::Proof;

declare_id!("FaV1uYNkcybnf3TwCu3quqAPe9Tng8KMunr9weQLBazF");

#[program]
pub mod message_bridge {
    use super::*;

    // Common

    /// Initializes the bridge with its configuration and an empty outgoing accumulator.
    /// Must be called once during deployment. The signing `guardian` becomes the bridge
    /// authority.
    ///
    /// # Arguments
    /// * `ctx`             - The context containing all accounts needed for initialization
    /// * `trusted_relayer` - The relayer allowed to relay never-attempted messages in nonce order
    /// * `validators`      - EVM addresses of the initial validator set
    /// * `threshold`       - Number of distinct validator signatures required for approval
    /// * `relay_config`    - Budget reserved around the bounded execution of relayed messages
    /// * `protocol_config` - Output root registration parameters
    pub fn initialize(
        ctx: Context<Initialize>,
        trusted_relayer: Pubkey,
        validators: Vec<[u8; 20]>,
        threshold: u8,
        relay_config: RelayConfig,
        protocol_config: ProtocolConfig,
    ) -> Result<()> {
        initialize_handler(
            ctx,
            trusted_relayer,
            validators,
            threshold,
            relay_config,
            protocol_config,
        )
    }

    /// Transfers guardian authority to a new pubkey. Only the current guardian can call this.
    pub fn transfer_guardian(ctx: Context<TransferGuardian>, new_guardian: Pubkey) -> Result<()> {
        transfer_guardian_handler(ctx, new_guardian)
    }

    pub fn set_trusted_relayer(
        ctx: Context<SetBridgeConfig>,
        new_trusted_relayer: Pubkey,
    ) -> Result<()> {
        set_trusted_relayer_handler(ctx, new_trusted_relayer)
    }

    pub fn set_relay_config(ctx: Context<SetBridgeConfig>, cfg: RelayConfig) -> Result<()> {
        set_relay_config_handler(ctx, cfg)
    }

    pub fn set_protocol_config(ctx: Context<SetBridgeConfig>, cfg: ProtocolConfig) -> Result<()> {
        set_protocol_config_handler(ctx, cfg)
    }

    pub fn add_validator(ctx: Context<SetBridgeConfig>, validator: [u8; 20]) -> Result<()> {
        add_validator_handler(ctx, validator)
    }

    pub fn remove_validator(ctx: Context<SetBridgeConfig>, validator: [u8; 20]) -> Result<()> {
        remove_validator_handler(ctx, validator)
    }

    pub fn set_threshold(ctx: Context<SetBridgeConfig>, new_threshold: u8) -> Result<()> {
        set_threshold_handler(ctx, new_threshold)
    }

    // Outgoing

    /// Sends a message to the remote chain.
    /// The message is stored under its nonce and its hash is appended to the outgoing
    /// accumulator, whose new root is emitted in `MessageSent`.
    ///
    /// # Arguments
    /// * `ctx`       - The context containing the sender and the accumulator
    /// * `ty`        - The payload type
    /// * `data`      - The payload executed on the remote chain
    /// * `gas_limit` - Maximum gas to use for the execution on the remote chain
    pub fn send_message(
        ctx: Context<SendMessage>,
        ty: MessageType,
        data: Vec<u8>,
        gas_limit: u64,
    ) -> Result<()> {
        send_message_handler(ctx, ty, data, gas_limit)
    }

    // Incoming

    /// Registers a checkpoint of the remote accumulator.
    /// The checkpoint must be approved by the validator set and its block number must be above
    /// the previous one and a multiple of the configured interval.
    ///
    /// # Arguments
    /// * `ctx`              - The context containing accounts for storing the output root
    /// * `output_root`      - The 32-byte MMR root of remote messages for the given block
    /// * `block_number`     - The remote block number this output root corresponds to
    /// * `total_leaf_count` - Number of leaves in the remote accumulator at that block
    /// * `signatures`       - Concatenated 65-byte validator signatures, ascending by signer
    pub fn register_output_root(
        ctx: Context<RegisterOutputRoot>,
        output_root: [u8; 32],
        block_number: u64,
        total_leaf_count: u64,
        signatures: Vec<u8>,
    ) -> Result<()> {
        register_output_root_handler(
            ctx,
            output_root,
            block_number,
            total_leaf_count,
            signatures,
        )
    }

    /// Proves that a message is included in a registered output root and marks it attested.
    ///
    /// # Arguments
    /// * `ctx`          - The transaction context
    /// * `message_hash` - The 32-byte hash of the message
    /// * `proof`        - MMR proof demonstrating message inclusion in the output root
    pub fn prove_message(
        ctx: Context<ProveMessage>,
        message_hash: [u8; 32],
        proof: Proof,
    ) -> Result<()> {
        prove_message_handler(ctx, message_hash, proof)
    }

    /// Registers a batch of inner message hashes approved by the validator set, binding them to
    /// the next sequence numbers. This is the attestation path used before checkpoints are live.
    ///
    /// # Arguments
    /// * `ctx`          - The transaction context
    /// * `inner_hashes` - Inner hashes of the messages, in sequence order
    /// * `signatures`   - Concatenated 65-byte validator signatures over the batch digest
    pub fn register_messages(
        ctx: Context<RegisterMessages>,
        inner_hashes: Vec<[u8; 32]>,
        signatures: Vec<u8>,
    ) -> Result<()> {
        register_messages_handler(ctx, inner_hashes, signatures)
    }

    /// Relays a proven or attested message, executing its payload with the sender's twin as
    /// signer. Payload failures are recorded and can be retried by anyone.
    ///
    /// # Arguments
    /// * `ctx`           - The transaction context. Accounts needed by the payload go in the
    ///                     remaining accounts
    /// * `message_hash`  - The 32-byte hash of the message
    /// * `message`       - The message itself
    /// * `is_estimation` - Fail instead of recording a failure when the budget is insufficient
    pub fn relay_message<'a, 'info>(
        ctx: Context<'a, '_, 'info, 'info, RelayMessage<'info>>,
        message_hash: [u8; 32],
        message: Message,
        is_estimation: bool,
    ) -> Result<()> {
        relay_message_handler(ctx, message_hash, message, is_estimation)
    }
}
