use std::collections::{BTreeMap, BTreeSet};

use anchor_lang::{
    prelude::*,
    solana_program::{instruction::Instruction, native_token::LAMPORTS_PER_SOL},
    system_program, InstructionData,
};
use litesvm::{types::TransactionResult, LiteSVM};
use secp256k1::{Message as SecpMessage, PublicKey, Secp256k1, SecretKey};
use solana_keypair::Keypair;
use solana_message::Message as TransactionMessage;
use solana_signer::Signer;
use solana_transaction::Transaction;

use crate::{
    accounts,
    common::{bridge::ProtocolConfig, hash_message, BRIDGE_SEED},
    incoming::{
        constants::{ATTESTED_BATCH_SEED, INCOMING_MESSAGE_SEED, OUTPUT_ROOT_SEED, TWIN_SEED},
        internal::{
            message::Message,
            relay::{
                relay_message, Caller, Dispatcher, ExecutionContextProvider, MessageStatus,
                RelayConfig, RelayError, RelayOutcome, RelayRequest, RelayState,
            },
            signatures::{compute_output_root_message_hash, eth_address},
            validators::batch_digest,
        },
    },
    instruction,
    outgoing::{MESSAGE_ACCUMULATOR_SEED, OUTGOING_MESSAGE_SEED},
    ID,
};

/// A validator key usable to produce ECDSA signatures recoverable on-chain.
pub struct TestValidator {
    secret_key: SecretKey,
}

impl TestValidator {
    pub fn new(seed: u8) -> Self {
        let mut bytes = [0x11u8; 32];
        bytes[31] = seed;
        Self {
            secret_key: SecretKey::from_slice(&bytes).unwrap(),
        }
    }

    pub fn address(&self) -> [u8; 20] {
        let public_key = PublicKey::from_secret_key(&Secp256k1::new(), &self.secret_key);
        let serialized = public_key.serialize_uncompressed();

        let mut raw = [0u8; 64];
        raw.copy_from_slice(&serialized[1..]);
        eth_address(&raw)
    }

    /// Signs the digest and returns (r, s, v) with `v` in {27, 28}.
    pub fn sign(&self, digest: &[u8; 32]) -> [u8; 65] {
        let message = SecpMessage::from_digest_slice(digest).unwrap();
        let signature = Secp256k1::new().sign_ecdsa_recoverable(&message, &self.secret_key);
        let (recovery_id, compact) = signature.serialize_compact();

        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&compact);
        out[64] = recovery_id.to_i32() as u8 + 27;
        out
    }
}

/// Signature blob from every validator, ordered by ascending address.
pub fn sign_ascending(validators: &[TestValidator], digest: &[u8; 32]) -> Vec<u8> {
    let mut signers: Vec<&TestValidator> = validators.iter().collect();
    signers.sort_by_key(|v| v.address());
    signers.iter().flat_map(|v| v.sign(digest)).collect()
}

/// Context provider keeping one context per origin in memory.
#[derive(Debug, Default)]
pub struct MapContextProvider {
    pub contexts: BTreeMap<[u8; 20], usize>,
    /// Origins in the order their context was created.
    pub created: Vec<[u8; 20]>,
    fail: bool,
}

impl MapContextProvider {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl ExecutionContextProvider for MapContextProvider {
    type Context = usize;

    fn get_or_create(&mut self, origin: &[u8; 20]) -> Result<usize> {
        if self.fail {
            return err!(RelayError::TwinOriginMismatch);
        }

        let next_id = self.contexts.len();
        let id = *self.contexts.entry(*origin).or_insert_with(|| {
            self.created.push(*origin);
            next_id
        });
        Ok(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub origin: [u8; 20],
    pub nonce: u64,
    pub resource_ceiling: u64,
}

/// Dispatcher that records every call and fails on demand.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    pub calls: Vec<RecordedCall>,
    pub failing_nonces: BTreeSet<u64>,
    /// Resources each payload consumes. Exceeding the ceiling fails the payload.
    pub consumption: u64,
}

impl Dispatcher<usize> for RecordingDispatcher {
    fn dispatch(&mut self, _context: &usize, message: &Message, resource_ceiling: u64) -> Result<()> {
        self.calls.push(RecordedCall {
            origin: message.sender,
            nonce: message.nonce,
            resource_ceiling,
        });

        require!(
            self.consumption <= resource_ceiling,
            TestDispatchError::CeilingExceeded
        );
        require!(
            !self.failing_nonces.contains(&message.nonce),
            TestDispatchError::PayloadReverted
        );
        Ok(())
    }
}

#[error_code]
pub enum TestDispatchError {
    #[msg("Payload exceeded its resource ceiling")]
    CeilingExceeded,
    #[msg("Payload reverted")]
    PayloadReverted,
}

/// In-memory relay environment: outcome records keyed by message hash, a map-backed context
/// provider and a recording dispatcher.
pub struct RelayHarness {
    pub state: RelayState,
    pub config: RelayConfig,
    pub statuses: BTreeMap<[u8; 32], MessageStatus>,
    pub contexts: MapContextProvider,
    pub dispatcher: RecordingDispatcher,
    pub remaining_budget: u64,
}

impl RelayHarness {
    pub fn new() -> Self {
        Self {
            state: RelayState::default(),
            config: RelayConfig::default(),
            statuses: BTreeMap::new(),
            contexts: MapContextProvider::default(),
            dispatcher: RecordingDispatcher::default(),
            remaining_budget: 1_400_000,
        }
    }

    pub fn status(&self, message: &Message) -> MessageStatus {
        self.statuses
            .get(&message.hash())
            .copied()
            .unwrap_or_default()
    }

    pub fn relay(
        &mut self,
        message: &Message,
        caller: Caller,
        is_estimation: bool,
    ) -> Result<RelayOutcome> {
        let mut status = self.status(message);

        let result = relay_message(
            &mut self.state,
            &self.config,
            &mut status,
            &mut self.contexts,
            &mut self.dispatcher,
            &RelayRequest {
                message,
                caller,
                remaining_budget: self.remaining_budget,
                is_estimation,
            },
        );

        self.statuses.insert(message.hash(), status);
        result
    }
}

pub const TEST_THRESHOLD: u8 = 2;

/// Validators registered by `setup_bridge_and_svm`.
pub fn test_validators() -> Vec<TestValidator> {
    (1..=3).map(TestValidator::new).collect()
}

pub fn bridge_pda() -> Pubkey {
    Pubkey::find_program_address(&[BRIDGE_SEED], &ID).0
}

pub fn accumulator_pda() -> Pubkey {
    Pubkey::find_program_address(&[MESSAGE_ACCUMULATOR_SEED], &ID).0
}

pub fn outgoing_message_pda(nonce: u64) -> Pubkey {
    Pubkey::find_program_address(&[OUTGOING_MESSAGE_SEED, nonce.to_le_bytes().as_ref()], &ID).0
}

pub fn output_root_pda(block_number: u64) -> Pubkey {
    Pubkey::find_program_address(&[OUTPUT_ROOT_SEED, &block_number.to_le_bytes()], &ID).0
}

pub fn incoming_message_pda(message_hash: &[u8; 32]) -> Pubkey {
    Pubkey::find_program_address(&[INCOMING_MESSAGE_SEED, message_hash.as_ref()], &ID).0
}

pub fn attested_batch_pda(start_sequence: u64) -> Pubkey {
    Pubkey::find_program_address(
        &[ATTESTED_BATCH_SEED, start_sequence.to_le_bytes().as_ref()],
        &ID,
    )
    .0
}

pub fn twin_pda(origin: &[u8; 20]) -> Pubkey {
    Pubkey::find_program_address(&[TWIN_SEED, origin.as_ref()], &ID).0
}

pub fn initialize_ix(
    payer: &Keypair,
    guardian: &Keypair,
    validators: Vec<[u8; 20]>,
    threshold: u8,
) -> Instruction {
    let accounts = accounts::Initialize {
        payer: payer.pubkey(),
        bridge: bridge_pda(),
        accumulator: accumulator_pda(),
        guardian: guardian.pubkey(),
        system_program: system_program::ID,
    }
    .to_account_metas(None);

    Instruction {
        program_id: ID,
        accounts,
        data: instruction::Initialize {
            trusted_relayer: payer.pubkey(),
            validators,
            threshold,
            relay_config: RelayConfig::default(),
            protocol_config: ProtocolConfig::default(),
        }
        .data(),
    }
}

/// Fresh SVM with the program loaded and a funded payer.
pub fn setup_svm() -> (LiteSVM, Keypair) {
    let mut svm = LiteSVM::new();
    svm.add_program_from_file(ID, "../../target/deploy/message_bridge.so")
        .unwrap();

    let payer = Keypair::new();
    svm.airdrop(&payer.pubkey(), LAMPORTS_PER_SOL * 10).unwrap();

    (svm, payer)
}

/// Initialized bridge with the payer as trusted relayer and `test_validators()` as the
/// validator set. Returns the SVM, the payer and the guardian.
pub fn setup_bridge_and_svm() -> (LiteSVM, Keypair, Keypair) {
    let (mut svm, payer) = setup_svm();
    let guardian = Keypair::new();

    let validators = test_validators().iter().map(TestValidator::address).collect();
    let ix = initialize_ix(&payer, &guardian, validators, TEST_THRESHOLD);
    send_transaction(&mut svm, ix, &payer, &[&guardian]).expect("Failed to initialize bridge");

    (svm, payer, guardian)
}

/// Sends `ix` paid by `payer`. The blockhash is expired first so identical instructions can be
/// sent more than once.
pub fn send_transaction(
    svm: &mut LiteSVM,
    ix: Instruction,
    payer: &Keypair,
    signers: &[&Keypair],
) -> TransactionResult {
    svm.expire_blockhash();

    let mut all_signers = vec![payer];
    all_signers.extend_from_slice(signers);

    let tx = Transaction::new(
        &all_signers,
        TransactionMessage::new(&[ix], Some(&payer.pubkey())),
        svm.latest_blockhash(),
    );
    svm.send_transaction(tx)
}

pub fn assert_tx_error(result: TransactionResult, expected: &str) {
    assert!(result.is_err(), "Expected transaction to fail with {expected}");

    let error_string = format!("{:?}", result.unwrap_err());
    assert!(
        error_string.contains(expected),
        "Expected {expected} error, got: {error_string}"
    );
}

pub fn fetch_account<T: AccountDeserialize>(svm: &LiteSVM, address: &Pubkey) -> T {
    let account = svm.get_account(address).unwrap();
    assert_eq!(account.owner, ID);
    T::try_deserialize(&mut &account.data[..]).unwrap()
}

/// Funded keypair that is neither the guardian nor the trusted relayer.
pub fn funded_keypair(svm: &mut LiteSVM) -> Keypair {
    let keypair = Keypair::new();
    svm.airdrop(&keypair.pubkey(), LAMPORTS_PER_SOL).unwrap();
    keypair
}

pub fn register_output_root_ix(
    payer: &Keypair,
    output_root: [u8; 32],
    block_number: u64,
    total_leaf_count: u64,
    signatures: Vec<u8>,
) -> Instruction {
    Instruction {
        program_id: ID,
        accounts: accounts::RegisterOutputRoot {
            payer: payer.pubkey(),
            root: output_root_pda(block_number),
            bridge: bridge_pda(),
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: instruction::RegisterOutputRoot {
            output_root,
            block_number,
            total_leaf_count,
            signatures,
        }
        .data(),
    }
}

/// Registers an output root signed by every test validator.
pub fn register_output_root(
    svm: &mut LiteSVM,
    payer: &Keypair,
    output_root: [u8; 32],
    block_number: u64,
    total_leaf_count: u64,
) -> TransactionResult {
    let digest = compute_output_root_message_hash(&output_root, block_number, total_leaf_count);
    let signatures = sign_ascending(&test_validators(), &digest);
    let ix = register_output_root_ix(payer, output_root, block_number, total_leaf_count, signatures);
    send_transaction(svm, ix, payer, &[])
}

pub fn register_messages_ix(
    payer: &Keypair,
    start_sequence: u64,
    inner_hashes: Vec<[u8; 32]>,
    signatures: Vec<u8>,
) -> Instruction {
    Instruction {
        program_id: ID,
        accounts: accounts::RegisterMessages {
            payer: payer.pubkey(),
            bridge: bridge_pda(),
            batch: attested_batch_pda(start_sequence),
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: instruction::RegisterMessages {
            inner_hashes,
            signatures,
        }
        .data(),
    }
}

/// Registers inner hashes at `start_sequence`, signed by every test validator.
pub fn register_messages(
    svm: &mut LiteSVM,
    payer: &Keypair,
    start_sequence: u64,
    inner_hashes: Vec<[u8; 32]>,
) -> TransactionResult {
    let message_hashes: Vec<[u8; 32]> = inner_hashes
        .iter()
        .enumerate()
        .map(|(i, inner_hash)| hash_message(start_sequence + i as u64, inner_hash))
        .collect();
    let signatures = sign_ascending(&test_validators(), &batch_digest(&message_hashes));
    let ix = register_messages_ix(payer, start_sequence, inner_hashes, signatures);
    send_transaction(svm, ix, payer, &[])
}
