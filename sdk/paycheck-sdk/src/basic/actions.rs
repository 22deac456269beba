use crate::advanced::instructions;
use crate::basic::builder::InstructionSet;
use crate::core::connection::LedgerConnection;
use crate::core::constants::MAX_MULTISIG_SIGNERS;
use crate::error::{DispatchError, Result};
use crate::utils;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use spl_token::state::{Mint, Multisig};

/// Builds the single transaction that mints a new NFT to the payer:
/// create the mint, create the payer's token account, mint one unit and
/// revoke the mint authority.
pub struct MintNftBuilder {
    payer: Option<Pubkey>,
    mint: Keypair,
}

impl MintNftBuilder {
    pub fn new() -> Self {
        Self {
            payer: None,
            mint: Keypair::new(),
        }
    }

    pub fn with_payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    pub fn with_mint_keypair(mut self, mint: Keypair) -> Self {
        self.mint = mint;
        self
    }

    pub fn mint_address(&self) -> Pubkey {
        self.mint.pubkey()
    }

    pub async fn build_instructions(
        self,
        connection: &impl LedgerConnection,
    ) -> Result<InstructionSet> {
        let payer = self
            .payer
            .ok_or_else(|| DispatchError::InvalidForm("payer required".into()))?;
        let mint = self.mint.pubkey();

        let rent = connection
            .get_minimum_balance_for_rent_exemption(Mint::LEN)
            .await
            .map_err(|e| DispatchError::Connection(e.to_string()))?;

        let token_account = utils::AssociatedAccount {
            address: utils::derive_associated_token_address(&payer, &mint),
            owner: payer,
            mint,
            exists: false,
        };

        let mut set = InstructionSet::default();
        set.extend(instructions::create_nft_mint(&payer, &mint, &payer, rent)?);
        set.extend(token_account.creation_instruction(&payer));
        set.push(instructions::mint_nft_to(&mint, &token_account.address, &payer)?);
        set.push(instructions::revoke_mint_authority(&mint, &payer)?);

        Ok(set.with_ephemeral_signer(self.mint))
    }
}

impl Default for MintNftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds an M-of-N token multisig account funded by the payer.
pub struct MultisigBuilder {
    payer: Option<Pubkey>,
    signers: Vec<Pubkey>,
    threshold: u8,
    multisig: Keypair,
}

impl MultisigBuilder {
    pub fn new() -> Self {
        Self {
            payer: None,
            signers: Vec::new(),
            threshold: 1,
            multisig: Keypair::new(),
        }
    }

    pub fn with_payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    pub fn add_signer(mut self, signer: Pubkey) -> Self {
        self.signers.push(signer);
        self
    }

    pub fn with_signers(mut self, signers: &[Pubkey]) -> Self {
        self.signers.extend_from_slice(signers);
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_multisig_keypair(mut self, multisig: Keypair) -> Self {
        self.multisig = multisig;
        self
    }

    pub fn multisig_address(&self) -> Pubkey {
        self.multisig.pubkey()
    }

    pub fn validate(&self) -> Result<()> {
        let n = self.signers.len();
        if n == 0 || n > MAX_MULTISIG_SIGNERS {
            return Err(DispatchError::InvalidForm(format!(
                "multisig needs between 1 and {} signers, got {}",
                MAX_MULTISIG_SIGNERS, n
            )));
        }
        if self.threshold == 0 || self.threshold as usize > n {
            return Err(DispatchError::InvalidForm(format!(
                "threshold {} is outside 1..={}",
                self.threshold, n
            )));
        }
        for (i, signer) in self.signers.iter().enumerate() {
            if self.signers[..i].contains(signer) {
                return Err(DispatchError::InvalidForm(format!(
                    "duplicate multisig signer {}",
                    signer
                )));
            }
        }
        Ok(())
    }

    pub async fn build_instructions(
        self,
        connection: &impl LedgerConnection,
    ) -> Result<InstructionSet> {
        let payer = self
            .payer
            .ok_or_else(|| DispatchError::InvalidForm("payer required".into()))?;
        self.validate()?;

        let rent = connection
            .get_minimum_balance_for_rent_exemption(Multisig::LEN)
            .await
            .map_err(|e| DispatchError::Connection(e.to_string()))?;

        let ixs = instructions::create_multisig(
            &payer,
            &self.multisig.pubkey(),
            rent,
            &self.signers,
            self.threshold,
        )?;

        Ok(InstructionSet::new(ixs).with_ephemeral_signer(self.multisig))
    }
}

impl Default for MultisigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
