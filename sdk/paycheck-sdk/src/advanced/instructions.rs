use crate::core::constants::{NFT_DECIMALS, NFT_TRANSFER_AMOUNT};
use crate::error::Result;
use solana_sdk::instruction::Instruction;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_system_interface::instruction as system_instruction;
use spl_token::instruction::AuthorityType;
use spl_token::state::{Mint, Multisig};

pub fn native_transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    system_instruction::transfer(from, to, lamports)
}

/// Move `amount` tokens between two token accounts, signed by `authority` alone.
pub fn token_transfer(
    source: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Result<Instruction> {
    Ok(spl_token::instruction::transfer(
        &spl_token::id(),
        source,
        destination,
        authority,
        &[],
        amount,
    )?)
}

/// Allocate and initialize a 0-decimal mint. `authority` is both mint and freeze authority.
pub fn create_nft_mint(
    payer: &Pubkey,
    mint: &Pubkey,
    authority: &Pubkey,
    rent_lamports: u64,
) -> Result<Vec<Instruction>> {
    Ok(vec![
        system_instruction::create_account(
            payer,
            mint,
            rent_lamports,
            Mint::LEN as u64,
            &spl_token::id(),
        ),
        spl_token::instruction::initialize_mint2(
            &spl_token::id(),
            mint,
            authority,
            Some(authority),
            NFT_DECIMALS,
        )?,
    ])
}

/// Mint the single NFT unit into `destination`.
pub fn mint_nft_to(mint: &Pubkey, destination: &Pubkey, authority: &Pubkey) -> Result<Instruction> {
    Ok(spl_token::instruction::mint_to(
        &spl_token::id(),
        mint,
        destination,
        authority,
        &[],
        NFT_TRANSFER_AMOUNT,
    )?)
}

/// Clear the mint authority so supply can never grow past what was minted.
pub fn revoke_mint_authority(mint: &Pubkey, authority: &Pubkey) -> Result<Instruction> {
    Ok(spl_token::instruction::set_authority(
        &spl_token::id(),
        mint,
        None,
        AuthorityType::MintTokens,
        authority,
        &[],
    )?)
}

/// Allocate and initialize an M-of-N token multisig account.
pub fn create_multisig(
    payer: &Pubkey,
    multisig: &Pubkey,
    rent_lamports: u64,
    signers: &[Pubkey],
    threshold: u8,
) -> Result<Vec<Instruction>> {
    let signer_refs: Vec<&Pubkey> = signers.iter().collect();
    Ok(vec![
        system_instruction::create_account(
            payer,
            multisig,
            rent_lamports,
            Multisig::LEN as u64,
            &spl_token::id(),
        ),
        spl_token::instruction::initialize_multisig2(
            &spl_token::id(),
            multisig,
            &signer_refs,
            threshold,
        )?,
    ])
}
