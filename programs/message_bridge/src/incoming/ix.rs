use anchor_lang::{prelude::*, solana_program::instruction::Instruction};

/// One instruction of a relayed payload. Payloads are a Borsh-encoded `Vec<Ix>`.
#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct Ix {
    pub program_id: Pubkey,
    pub accounts: Vec<IxAccount>,
    pub data: Vec<u8>,
}

/// Account meta of a relayed instruction. The remote sender cannot always know an address up
/// front, so accounts may also be given as PDA seeds.
#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct IxAccount {
    pub pubkey_or_pda: PubkeyOrPda,
    pub is_writable: bool,
    pub is_signer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum PubkeyOrPda {
    Pubkey(Pubkey),
    PDA {
        seeds: Vec<Vec<u8>>,
        program_id: Pubkey,
    },
}

impl From<Ix> for Instruction {
    fn from(ix: Ix) -> Instruction {
        Instruction {
            program_id: ix.program_id,
            accounts: ix.accounts.into_iter().map(Into::into).collect(),
            data: ix.data,
        }
    }
}

impl From<IxAccount> for AccountMeta {
    fn from(account: IxAccount) -> AccountMeta {
        let pubkey = match account.pubkey_or_pda {
            PubkeyOrPda::Pubkey(pubkey) => pubkey,
            PubkeyOrPda::PDA { seeds, program_id } => {
                let seeds: Vec<&[u8]> = seeds.iter().map(|v| v.as_slice()).collect();
                Pubkey::find_program_address(&seeds, &program_id).0
            }
        };

        match account.is_writable {
            false => AccountMeta::new_readonly(pubkey, account.is_signer),
            true => AccountMeta::new(pubkey, account.is_signer),
        }
    }
}

impl From<Instruction> for Ix {
    fn from(ix: Instruction) -> Ix {
        Ix {
            program_id: ix.program_id,
            accounts: ix.accounts.into_iter().map(Into::into).collect(),
            data: ix.data,
        }
    }
}

impl From<AccountMeta> for IxAccount {
    fn from(account: AccountMeta) -> IxAccount {
        IxAccount {
            pubkey_or_pda: PubkeyOrPda::Pubkey(account.pubkey),
            is_writable: account.is_writable,
            is_signer: account.is_signer,
        }
    }
}
