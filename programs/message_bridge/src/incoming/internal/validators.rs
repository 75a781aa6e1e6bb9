use anchor_lang::{prelude::*, solana_program::keccak};

use crate::common::{hash_message, MAX_VALIDATOR_COUNT};

use super::signatures::{recover_eth_address, split_signatures};

/// Registered validator addresses (20-byte EVM addresses) and the number of distinct
/// signatures required to approve a digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct ValidatorSet {
    threshold: u8,
    #[max_len(16)]
    validators: Vec<[u8; 20]>,
}

impl ValidatorSet {
    pub fn new(validators: Vec<[u8; 20]>, threshold: u8) -> Result<Self> {
        require!(
            validators.len() <= MAX_VALIDATOR_COUNT,
            ValidatorError::TooManyValidators
        );

        for (i, validator) in validators.iter().enumerate() {
            require!(*validator != [0u8; 20], ValidatorError::ZeroValidator);
            require!(
                !validators[..i].contains(validator),
                ValidatorError::DuplicateValidator
            );
        }

        let set = Self {
            threshold,
            validators,
        };
        set.check_threshold(threshold)?;

        Ok(set)
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn validators(&self) -> &[[u8; 20]] {
        &self.validators
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn contains(&self, validator: &[u8; 20]) -> bool {
        self.validators.iter().any(|v| v == validator)
    }

    pub fn add_validator(&mut self, validator: [u8; 20]) -> Result<()> {
        require!(validator != [0u8; 20], ValidatorError::ZeroValidator);
        require!(
            !self.contains(&validator),
            ValidatorError::DuplicateValidator
        );
        require!(
            self.validators.len() < MAX_VALIDATOR_COUNT,
            ValidatorError::TooManyValidators
        );

        self.validators.push(validator);
        Ok(())
    }

    pub fn remove_validator(&mut self, validator: &[u8; 20]) -> Result<()> {
        let index = self
            .validators
            .iter()
            .position(|v| v == validator)
            .ok_or(error!(ValidatorError::UnknownValidator))?;
        require!(
            self.validators.len() > usize::from(self.threshold),
            ValidatorError::RemovalBreaksThreshold
        );

        self.validators.remove(index);
        Ok(())
    }

    pub fn set_threshold(&mut self, threshold: u8) -> Result<()> {
        self.check_threshold(threshold)?;
        self.threshold = threshold;
        Ok(())
    }

    /// Checks that `signatures` (concatenated 65-byte chunks) approve `digest`.
    ///
    /// Recovered signers must be strictly ascending, registered, and at least `threshold`
    /// in number. A repeated signer is rejected even when the distinct signers alone would
    /// meet the threshold.
    pub fn verify_signatures(&self, digest: &[u8; 32], signatures: &[u8]) -> Result<()> {
        let signatures = split_signatures(signatures)?;

        let mut previous: Option<[u8; 20]> = None;
        for signature in signatures.iter() {
            let signer = recover_eth_address(signature, digest)?;

            if let Some(previous) = previous {
                require!(signer != previous, ValidatorError::DuplicateSigner);
                require!(signer > previous, ValidatorError::SignersNotAscending);
            }
            require!(self.contains(&signer), ValidatorError::UnknownSigner);

            previous = Some(signer);
        }

        require!(
            signatures.len() >= usize::from(self.threshold),
            ValidatorError::InsufficientSignatures
        );

        Ok(())
    }

    fn check_threshold(&self, threshold: u8) -> Result<()> {
        require!(
            threshold > 0 && usize::from(threshold) <= self.validators.len(),
            ValidatorError::InvalidThreshold
        );
        Ok(())
    }
}

/// Gates the validator attestation path: batches of inner hashes are bound to consecutive
/// sequence numbers and must be approved by the validator set.
#[derive(Debug, Clone, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, InitSpace)]
pub struct ThresholdVerifier {
    pub validator_set: ValidatorSet,
    next_sequence: u64,
}

impl ThresholdVerifier {
    pub fn new(validator_set: ValidatorSet) -> Self {
        Self {
            validator_set,
            next_sequence: 0,
        }
    }

    /// Sequence number the next registered inner hash is bound to.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// `hash_message(next_sequence + i, inner_hashes[i])` for every entry.
    pub fn derive_message_hashes(&self, inner_hashes: &[[u8; 32]]) -> Result<Vec<[u8; 32]>> {
        inner_hashes
            .iter()
            .enumerate()
            .map(|(i, inner_hash)| {
                let sequence = self
                    .next_sequence
                    .checked_add(i as u64)
                    .ok_or(error!(ValidatorError::SequenceOverflow))?;
                Ok(hash_message(sequence, inner_hash))
            })
            .collect()
    }

    /// Registers a batch of inner hashes approved by `signatures` over the batch digest.
    ///
    /// Either the whole batch is accepted and the sequence advances by its length, or nothing
    /// changes. Returns the derived message hashes.
    pub fn register_batch(
        &mut self,
        inner_hashes: &[[u8; 32]],
        signatures: &[u8],
    ) -> Result<Vec<[u8; 32]>> {
        require!(!inner_hashes.is_empty(), ValidatorError::EmptyBatch);

        let message_hashes = self.derive_message_hashes(inner_hashes)?;
        let next_sequence = self
            .next_sequence
            .checked_add(message_hashes.len() as u64)
            .ok_or(error!(ValidatorError::SequenceOverflow))?;

        self.validator_set
            .verify_signatures(&batch_digest(&message_hashes), signatures)?;

        self.next_sequence = next_sequence;
        Ok(message_hashes)
    }
}

/// keccak256 over the concatenated message hashes of a batch.
pub fn batch_digest(message_hashes: &[[u8; 32]]) -> [u8; 32] {
    let parts: Vec<&[u8]> = message_hashes.iter().map(|h| h.as_slice()).collect();
    keccak::hashv(&parts).0
}

#[error_code]
pub enum ValidatorError {
    #[msg("Threshold must be non-zero and at most the number of validators")]
    InvalidThreshold,
    #[msg("Too many validators")]
    TooManyValidators,
    #[msg("Validator address is zero")]
    ZeroValidator,
    #[msg("Validator is already registered")]
    DuplicateValidator,
    #[msg("Validator is not registered")]
    UnknownValidator,
    #[msg("Removing the validator would leave fewer validators than the threshold")]
    RemovalBreaksThreshold,
    #[msg("Signer appears more than once")]
    DuplicateSigner,
    #[msg("Signers must be in strictly ascending order")]
    SignersNotAscending,
    #[msg("Signer is not a registered validator")]
    UnknownSigner,
    #[msg("Not enough validator signatures")]
    InsufficientSignatures,
    #[msg("Batch is empty")]
    EmptyBatch,
    #[msg("Sequence overflow")]
    SequenceOverflow,
}
