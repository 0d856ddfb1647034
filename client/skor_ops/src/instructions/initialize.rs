//! `initialize` instruction builder.
//!
//! Creates the staking config PDA with the stake mint and monthly reward cap.

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::system_program;
use borsh::BorshSerialize;

use crate::config::ProgramContext;
use crate::error::OpsError;

use super::instruction_data;

#[derive(BorshSerialize)]
struct InitializeArgs {
    stake_mint: [u8; 32],
    monthly_cap: u64,
}

/// Builds `initialize(stake_mint, monthly_cap)`; `admin` pays and signs.
pub fn initialize(ctx: &ProgramContext, admin: &Pubkey, monthly_cap: u64) -> Result<Instruction, OpsError> {
    Ok(Instruction {
        program_id: ctx.staking_program_id,
        accounts: vec![
            AccountMeta::new(ctx.config_address()?, false),
            AccountMeta::new(*admin, true),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: instruction_data(
            "initialize",
            &InitializeArgs {
                stake_mint: ctx.stake_mint.to_bytes(),
                monthly_cap,
            },
        )?,
    })
}
