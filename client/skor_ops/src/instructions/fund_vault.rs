//! Token account setup and reward vault funding.
//!
//! These are plain SPL instructions rather than staking program calls: the
//! vault is the associated token account of the vault authority PDA, so
//! anyone holding stake tokens can top it up with a checked transfer.

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::Instruction;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use anchor_spl::token::spl_token;
use log::debug;

use crate::amount::to_base_units;
use crate::config::ProgramContext;
use crate::error::OpsError;

/// Creates `user`'s stake mint token account if it does not exist yet.
///
/// Needed before the first `stake_tokens` of a fresh wallet.
pub fn create_user_token_account(
    ctx: &ProgramContext,
    payer: &Pubkey,
    user: &Pubkey,
) -> Result<Instruction, OpsError> {
    // rejects off-curve users
    ctx.user_token_account(user)?;
    Ok(create_associated_token_account_idempotent(
        payer,
        user,
        &ctx.stake_mint,
        &spl_token::ID,
    ))
}

/// Creates the reward vault token account owned by the vault authority PDA.
pub fn create_vault_token_account(ctx: &ProgramContext, payer: &Pubkey) -> Result<Instruction, OpsError> {
    Ok(create_associated_token_account_idempotent(
        payer,
        &ctx.vault_authority()?,
        &ctx.stake_mint,
        &spl_token::ID,
    ))
}

/// Transfers `whole_amount` tokens from `funder`'s token account into the
/// reward vault.
///
/// `decimals` must be the mint's real decimals, see
/// [`crate::query::mint_decimals`]. The transfer is checked against them
/// on-chain.
pub fn transfer_to_vault(
    ctx: &ProgramContext,
    funder: &Pubkey,
    whole_amount: u64,
    decimals: u8,
) -> Result<Instruction, OpsError> {
    let amount = to_base_units(whole_amount, decimals)?;
    let source = ctx.user_token_account(funder)?;
    let destination = ctx.vault_token_account()?;
    debug!("Funding vault {} with {} base units from {}", destination, amount, source);
    spl_token::instruction::transfer_checked(
        &spl_token::ID,
        &source,
        &ctx.stake_mint,
        &destination,
        funder,
        &[],
        amount,
        decimals,
    )
    .map_err(|e| OpsError::InstructionEncoding(format!("transfer_checked: {}", e)))
}

/// Instructions to fund the reward vault: vault account creation followed by
/// the transfer. Safe to send when the vault already exists.
pub fn fund_vault(
    ctx: &ProgramContext,
    funder: &Pubkey,
    whole_amount: u64,
    decimals: u8,
) -> Result<Vec<Instruction>, OpsError> {
    Ok(vec![
        create_vault_token_account(ctx, funder)?,
        transfer_to_vault(ctx, funder, whole_amount, decimals)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_LOCKING_PROGRAM_ID;
    use std::str::FromStr;

    fn context() -> ProgramContext {
        ProgramContext::new(
            Pubkey::new_unique(),
            DEFAULT_LOCKING_PROGRAM_ID,
            Pubkey::new_unique(),
        )
    }

    fn wallet() -> Pubkey {
        Pubkey::from_str("8MBg94RS4WTPbggpkAUbsxauqq5HfL5DEvRn8rGcQB7u").unwrap()
    }

    #[test]
    fn test_fund_vault() {
        use anchor_spl::associated_token;

        let ctx = context();
        let ixs = fund_vault(&ctx, &wallet(), 1_500, 6).unwrap();
        assert_eq!(ixs.len(), 2);

        let create = &ixs[0];
        assert_eq!(create.program_id, associated_token::ID);
        assert_eq!(create.accounts[0].pubkey, wallet());
        assert!(create.accounts[0].is_signer);
        assert_eq!(create.accounts[1].pubkey, ctx.vault_token_account().unwrap());
        assert_eq!(create.accounts[2].pubkey, ctx.vault_authority().unwrap());
        assert_eq!(create.accounts[3].pubkey, ctx.stake_mint);

        let transfer = &ixs[1];
        assert_eq!(transfer.program_id, spl_token::ID);
        assert_eq!(transfer.accounts.len(), 4);
        assert_eq!(transfer.accounts[0].pubkey, ctx.user_token_account(&wallet()).unwrap());
        assert_eq!(transfer.accounts[1].pubkey, ctx.stake_mint);
        assert_eq!(transfer.accounts[2].pubkey, ctx.vault_token_account().unwrap());
        assert_eq!(transfer.accounts[3].pubkey, wallet());
        assert!(transfer.accounts[3].is_signer);
        // TransferChecked: tag, amount, decimals
        assert_eq!(transfer.data[0], 12);
        assert_eq!(&transfer.data[1..9], &1_500_000_000u64.to_le_bytes());
        assert_eq!(transfer.data[9], 6);
    }

    #[test]
    fn test_fund_vault_overflow() {
        assert!(matches!(
            fund_vault(&context(), &wallet(), u64::MAX, 6),
            Err(OpsError::MathOverflow)
        ));
    }

    #[test]
    fn test_create_user_token_account() {
        let ctx = context();
        let payer = Pubkey::new_unique();
        let ix = create_user_token_account(&ctx, &payer, &wallet()).unwrap();
        assert_eq!(ix.accounts[0].pubkey, payer);
        assert_eq!(ix.accounts[1].pubkey, ctx.user_token_account(&wallet()).unwrap());
        assert_eq!(ix.accounts[2].pubkey, wallet());

        let authority = ctx.vault_authority().unwrap();
        assert!(matches!(
            create_user_token_account(&ctx, &payer, &authority),
            Err(OpsError::OwnerOffCurve { .. })
        ));
    }
}
