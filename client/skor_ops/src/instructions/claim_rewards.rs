//! `claim_rewards` instruction builder.

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_spl::token;

use crate::config::ProgramContext;
use crate::error::OpsError;

use super::instruction_data;

/// Accounts required for claiming the rewards of one stake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimRewardsAccounts {
    pub user: Pubkey,
    pub stake_account: Pubkey,
    pub user_token_account: Pubkey,
    pub mint: Pubkey,
    pub vault_token_account: Pubkey,
    pub rewards_token_account: Pubkey,
    pub vault_authority: Pubkey,
    pub config: Pubkey,
}

impl ClaimRewardsAccounts {
    pub fn derive(ctx: &ProgramContext, user: &Pubkey, index: u64) -> Result<Self, OpsError> {
        let vault_token_account = ctx.vault_token_account()?;
        Ok(Self {
            user: *user,
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
            AccountMeta::new(self.stake_account, false),
            AccountMeta::new(self.user_token_account, false),
            AccountMeta::new_readonly(self.mint, false),
            AccountMeta::new(self.vault_token_account, false),
            AccountMeta::new(self.rewards_token_account, false),
            AccountMeta::new_readonly(self.vault_authority, false),
            AccountMeta::new(self.config, false),
            AccountMeta::new_readonly(token::ID, false),
        ]
    }
}

/// Builds `claim_rewards()` for the stake at `index`.
pub fn claim_rewards(ctx: &ProgramContext, user: &Pubkey, index: u64) -> Result<Instruction, OpsError> {
    Ok(Instruction {
        program_id: ctx.staking_program_id,
        accounts: ClaimRewardsAccounts::derive(ctx, user, index)?.to_account_metas(),
        data: instruction_data("claim_rewards", &())?,
    })
}
