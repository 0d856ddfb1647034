//! Admin instruction builders.
//!
//! Both instructions take the config PDA (writable) and the admin signer;
//! the program rejects any signer other than `config.admin`.

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};

use crate::config::ProgramContext;
use crate::error::OpsError;

use super::instruction_data;

fn admin_accounts(ctx: &ProgramContext, admin: &Pubkey) -> Result<Vec<AccountMeta>, OpsError> {
    Ok(vec![
        AccountMeta::new(ctx.config_address()?, false),
        AccountMeta::new_readonly(*admin, true),
    ])
}

/// Builds `set_pause_staking(paused)`.
pub fn set_pause_staking(ctx: &ProgramContext, admin: &Pubkey, paused: bool) -> Result<Instruction, OpsError> {
    Ok(Instruction {
        program_id: ctx.staking_program_id,
        accounts: admin_accounts(ctx, admin)?,
        data: instruction_data("set_pause_staking", &paused)?,
    })
}

/// Builds `set_monthly_cap(new_monthly_cap)`; the cap is in base units.
pub fn set_monthly_cap(
    ctx: &ProgramContext,
    admin: &Pubkey,
    new_monthly_cap: u64,
) -> Result<Instruction, OpsError> {
    Ok(Instruction {
        program_id: ctx.staking_program_id,
        accounts: admin_accounts(ctx, admin)?,
        data: instruction_data("set_monthly_cap", &new_monthly_cap)?,
    })
}
