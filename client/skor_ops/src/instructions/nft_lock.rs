//! NFT locking instruction builders: `lock_nft`, `unlock_nft` and `admin_unlock`.

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::{system_program, sysvar};
use anchor_spl::token;
use log::debug;

use crate::classify::LockDuration;
use crate::config::ProgramContext;
use crate::error::OpsError;
use crate::pda::derive_associated_address;

use super::instruction_data;

/// Accounts shared by the lock and unlock instructions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NftLockAccounts {
    /// Signer: the owner for lock/unlock, the admin for `admin_unlock`.
    pub authority: Pubkey,

    /// Lock PDA `[owner, "nft_lock", nft_mint]`.
    pub lock_account: Pubkey,

    /// Owner's associated token account for the NFT.
    pub owner_nft_account: Pubkey,

    /// Vault's associated token account for the NFT.
    pub vault_nft_account: Pubkey,

    pub nft_mint: Pubkey,

    /// NFT vault authority PDA.
    pub vault_authority: Pubkey,
}

impl NftLockAccounts {
    /// Derives the accounts for the lock held by `owner` over `nft_mint`,
    /// signed by `authority`.
    pub fn derive(
        ctx: &ProgramContext,
        authority: &Pubkey,
        owner: &Pubkey,
        nft_mint: &Pubkey,
    ) -> Result<Self, OpsError> {
        let accounts = Self {
            authority: *authority,
            lock_account: ctx.lock_address(owner, nft_mint)?,
            owner_nft_account: derive_associated_address(owner, nft_mint, false)?,
            vault_nft_account: ctx.nft_vault_token_account(nft_mint)?,
            nft_mint: *nft_mint,
            vault_authority: ctx.nft_vault_authority()?,
        };
        debug!("Lock account for {} / {}: {}", owner, nft_mint, accounts.lock_account);
        Ok(accounts)
    }

    fn head(&self, authority_writable: bool) -> Vec<AccountMeta> {
        let authority = if authority_writable {
            AccountMeta::new(self.authority, true)
        } else {
            AccountMeta::new_readonly(self.authority, true)
        };
        vec![
            authority,
            AccountMeta::new(self.lock_account, false),
            AccountMeta::new(self.owner_nft_account, false),
            AccountMeta::new(self.vault_nft_account, false),
            AccountMeta::new_readonly(self.nft_mint, false),
            AccountMeta::new_readonly(self.vault_authority, false),
            AccountMeta::new_readonly(token::ID, false),
        ]
    }
}

/// Builds `lock_nft(duration)`; `user` moves `nft_mint` into the vault.
pub fn lock_nft(
    ctx: &ProgramContext,
    user: &Pubkey,
    nft_mint: &Pubkey,
    duration: LockDuration,
) -> Result<Instruction, OpsError> {
    let mut accounts = NftLockAccounts::derive(ctx, user, user, nft_mint)?.head(true);
    accounts.push(AccountMeta::new_readonly(system_program::ID, false));
    accounts.push(AccountMeta::new_readonly(sysvar::rent::ID, false));
    Ok(Instruction {
        program_id: ctx.locking_program_id,
        accounts,
        data: instruction_data("lock_nft", &duration)?,
    })
}

/// Builds `unlock_nft()`; the program rejects it before the lock ends.
pub fn unlock_nft(ctx: &ProgramContext, user: &Pubkey, nft_mint: &Pubkey) -> Result<Instruction, OpsError> {
    Ok(Instruction {
        program_id: ctx.locking_program_id,
        accounts: NftLockAccounts::derive(ctx, user, user, nft_mint)?.head(true),
        data: instruction_data("unlock_nft", &())?,
    })
}

/// Builds `admin_unlock()`, returning `owner`'s NFT regardless of the lock time.
pub fn admin_unlock(
    ctx: &ProgramContext,
    admin: &Pubkey,
    owner: &Pubkey,
    nft_mint: &Pubkey,
) -> Result<Instruction, OpsError> {
    Ok(Instruction {
        program_id: ctx.locking_program_id,
        accounts: NftLockAccounts::derive(ctx, admin, owner, nft_mint)?.head(false),
        data: instruction_data("admin_unlock", &())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_LOCKING_PROGRAM_ID;
    use crate::discriminator::instruction_discriminator;
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
    fn test_lock_nft() {
        let ctx = context();
        let mint = Pubkey::new_unique();
        let ix = lock_nft(&ctx, &wallet(), &mint, LockDuration::ThreeSixtyFive).unwrap();

        assert_eq!(ix.program_id, DEFAULT_LOCKING_PROGRAM_ID);
        assert_eq!(ix.accounts.len(), 9);
        assert_eq!(ix.accounts[1].pubkey, ctx.lock_address(&wallet(), &mint).unwrap());
        assert_eq!(ix.accounts[7].pubkey, system_program::ID);
        assert_eq!(&ix.data[..8], &instruction_discriminator("lock_nft"));
        assert_eq!(&ix.data[8..], &[3]);
    }

    #[test]
    fn test_admin_unlock_uses_owner_accounts() {
        let ctx = context();
        let admin = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ix = admin_unlock(&ctx, &admin, &wallet(), &mint).unwrap();
        let user_ix = unlock_nft(&ctx, &wallet(), &mint).unwrap();

        assert_eq!(ix.accounts.len(), 7);
        assert_eq!(ix.accounts[0].pubkey, admin);
        assert!(ix.accounts[0].is_signer && !ix.accounts[0].is_writable);
        assert_eq!(&ix.accounts[1..], &user_ix.accounts[1..]);
        assert_eq!(ix.data.len(), 8);
    }
}
