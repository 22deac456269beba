use crate::advanced::instructions;
use crate::core::connection::LedgerConnection;
use crate::core::constants::NFT_TRANSFER_AMOUNT;
use crate::error::{DispatchError, Result};
use crate::types::TransferIntent;
use crate::utils;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use tracing::debug;

/// Ordered instructions for a single transaction.
///
/// Not `Clone`: a set is handed to the submitter by value and consumed once.
#[derive(Default)]
pub struct InstructionSet {
    instructions: Vec<Instruction>,
    /// Freshly generated accounts (e.g. a new mint) that must co-sign
    ephemeral_signers: Vec<Keypair>,
}

impl InstructionSet {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            ephemeral_signers: Vec::new(),
        }
    }

    pub fn push(&mut self, ix: Instruction) {
        self.instructions.push(ix);
    }

    pub fn extend(&mut self, ixs: impl IntoIterator<Item = Instruction>) {
        self.instructions.extend(ixs);
    }

    pub fn with_ephemeral_signer(mut self, keypair: Keypair) -> Self {
        self.ephemeral_signers.push(keypair);
        self
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn ephemeral_signers(&self) -> impl Iterator<Item = Pubkey> + '_ {
        self.ephemeral_signers.iter().map(|k| k.pubkey())
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<Instruction>, Vec<Keypair>) {
        (self.instructions, self.ephemeral_signers)
    }
}

impl std::fmt::Debug for InstructionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstructionSet")
            .field("instructions", &self.instructions)
            .field(
                "ephemeral_signers",
                &self.ephemeral_signers().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Turns a classified intent into the instructions that carry it out.
///
/// Native transfers are built locally. Token transfers look up both
/// associated token accounts and prepend creation for any that are missing.
pub struct InstructionBuilder<'a, C: LedgerConnection> {
    connection: &'a C,
}

impl<'a, C: LedgerConnection> InstructionBuilder<'a, C> {
    pub fn new(connection: &'a C) -> Self {
        Self { connection }
    }

    pub async fn build(&self, intent: &TransferIntent, owner: &Pubkey) -> Result<InstructionSet> {
        match intent {
            TransferIntent::NativeTransfer {
                recipient,
                lamports,
            } => {
                let recipient = parse_recipient(recipient)?;
                Ok(InstructionSet::new(vec![instructions::native_transfer(
                    owner, &recipient, *lamports,
                )]))
            },
            TransferIntent::TokenTransfer { recipient, mint } => {
                let recipient = parse_recipient(recipient)?;
                self.build_token_transfer(owner, &recipient, mint).await
            },
        }
    }

    async fn build_token_transfer(
        &self,
        owner: &Pubkey,
        recipient: &Pubkey,
        mint: &Pubkey,
    ) -> Result<InstructionSet> {
        let source = utils::resolve_associated_account(self.connection, owner, mint).await?;
        let destination =
            utils::resolve_associated_account(self.connection, recipient, mint).await?;

        let mut set = InstructionSet::default();
        set.extend(source.creation_instruction(owner));
        set.extend(destination.creation_instruction(owner));
        set.push(instructions::token_transfer(
            &source.address,
            &destination.address,
            owner,
            NFT_TRANSFER_AMOUNT,
        )?);

        debug!(
            %mint,
            source = %source.address,
            destination = %destination.address,
            created = set.len() - 1,
            "built token transfer"
        );
        Ok(set)
    }
}

fn parse_recipient(recipient: &str) -> Result<Pubkey> {
    utils::parse_address(recipient)
        .ok_or_else(|| DispatchError::InvalidRecipient(format!("{:?} is not an address", recipient)))
}
