//! `stake_tokens` instruction builder.
//!
//! Creates a new stake account at the user's next stake index.

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::{system_program, sysvar};
use anchor_spl::token;
use borsh::BorshSerialize;

use crate::classify::LockDuration;
use crate::config::ProgramContext;
use crate::error::OpsError;

use super::instruction_data;

/// Accounts required for staking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakeTokensAccounts {
    /// The user staking tokens (signer, payer).
    pub user: Pubkey,

    /// User's stake counter PDA.
    pub stake_counter: Pubkey,

    /// Stake account PDA at the counter's current index.
    pub stake_account: Pubkey,

    /// User's associated token account for the stake mint.
    pub user_token_account: Pubkey,

    /// The stake mint.
    pub mint: Pubkey,

    /// Vault token account owned by the vault authority.
    pub vault_token_account: Pubkey,

    /// Rewards are paid from the same vault.
    pub rewards_token_account: Pubkey,

    /// Vault authority PDA.
    pub vault_authority: Pubkey,

    /// Staking config PDA.
    pub config: Pubkey,
}

impl StakeTokensAccounts {
    /// Derives every account for `user` staking at `index`.
    pub fn derive(ctx: &ProgramContext, user: &Pubkey, index: u64) -> Result<Self, OpsError> {
        let vault_token_account = ctx.vault_token_account()?;
        Ok(Self {
            user: *user,
            stake_counter: ctx.stake_counter_address(user)?,
            stake_account: ctx.stake_address(user, index)?,
            user_token_account: ctx.user_token_account(user)?,
            mint: ctx.stake_mint,
            vault_token_account,
            rewards_token_account: vault_token_account,
            vault_authority: ctx.vault_authority()?,
            config: ctx.config_address()?,
        })
    }

    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.user, true),
            AccountMeta::new(self.stake_counter, false),
            AccountMeta::new(self.stake_account, false),
            AccountMeta::new(self.user_token_account, false),
            AccountMeta::new_readonly(self.mint, false),
            AccountMeta::new(self.vault_token_account, false),
            AccountMeta::new(self.rewards_token_account, false),
            AccountMeta::new_readonly(self.vault_authority, false),
            AccountMeta::new(self.config, false),
            AccountMeta::new_readonly(token::ID, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
        ]
    }
}

#[derive(BorshSerialize)]
struct StakeTokensArgs {
    amount: u64,
    duration: LockDuration,
}

/// Builds `stake_tokens(amount, duration)`.
///
/// # Arguments
/// * `ctx` - Program context
/// * `user` - Staker wallet
/// * `index` - Next stake index, see [`crate::query::next_stake_index`]
/// * `amount` - Amount in base units, see [`crate::amount::to_base_units`]
/// * `duration` - Lock period
pub fn stake_tokens(
    ctx: &ProgramContext,
    user: &Pubkey,
    index: u64,
    amount: u64,
    duration: LockDuration,
) -> Result<Instruction, OpsError> {
    let accounts = StakeTokensAccounts::derive(ctx, user, index)?;
    Ok(Instruction {
        program_id: ctx.staking_program_id,
        accounts: accounts.to_account_metas(),
        data: instruction_data("stake_tokens", &StakeTokensArgs { amount, duration })?,
    })
}
