//! Operator configuration.
//!
//! Configuration is loaded once into a [`ProgramContext`] that is passed
//! explicitly to every query and instruction builder.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anchor_lang::prelude::Pubkey;
use log::debug;
use serde::Deserialize;

use crate::constants::DEFAULT_LOCKING_PROGRAM_ID;
use crate::error::OpsError;
use crate::pda;

/// Raw configuration as written by the operator (base58 keys).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OpsConfig {
    pub staking_program_id: String,
    #[serde(default)]
    pub locking_program_id: Option<String>,
    pub stake_mint: String,
}

impl OpsConfig {
    pub fn from_json(json: &str) -> Result<Self, OpsError> {
        serde_json::from_str(json).map_err(|e| OpsError::InvalidConfig(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, OpsError> {
        let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let json = fs::read_to_string(path)
            .map_err(|e| OpsError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn resolve(&self) -> Result<ProgramContext, OpsError> {
        Ok(ProgramContext {
            staking_program_id: parse_key("staking_program_id", &self.staking_program_id)?,
            locking_program_id: match &self.locking_program_id {
                Some(key) => parse_key("locking_program_id", key)?,
                None => DEFAULT_LOCKING_PROGRAM_ID,
            },
            stake_mint: parse_key("stake_mint", &self.stake_mint)?,
        })
    }
}

fn parse_key(field: &str, value: &str) -> Result<Pubkey, OpsError> {
    Pubkey::from_str(value.trim())
        .map_err(|e| OpsError::InvalidConfig(format!("{}: {} ({})", field, e, value)))
}

/// Program ids and mint every operation works against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramContext {
    pub staking_program_id: Pubkey,
    pub locking_program_id: Pubkey,
    pub stake_mint: Pubkey,
}

impl ProgramContext {
    pub fn new(staking_program_id: Pubkey, locking_program_id: Pubkey, stake_mint: Pubkey) -> Self {
        Self {
            staking_program_id,
            locking_program_id,
            stake_mint,
        }
    }

    pub fn config_address(&self) -> Result<Pubkey, OpsError> {
        Ok(pda::config_address(&self.staking_program_id)?.0)
    }

    pub fn vault_authority(&self) -> Result<Pubkey, OpsError> {
        Ok(pda::vault_authority_address(&self.staking_program_id)?.0)
    }

    /// Stake vault token account, owned by the off-curve vault authority.
    pub fn vault_token_account(&self) -> Result<Pubkey, OpsError> {
        pda::derive_associated_address(&self.vault_authority()?, &self.stake_mint, true)
    }

    pub fn user_token_account(&self, user: &Pubkey) -> Result<Pubkey, OpsError> {
        pda::derive_associated_address(user, &self.stake_mint, false)
    }

    pub fn stake_counter_address(&self, user: &Pubkey) -> Result<Pubkey, OpsError> {
        Ok(pda::stake_counter_address(user, &self.staking_program_id)?.0)
    }

    pub fn stake_address(&self, user: &Pubkey, index: u64) -> Result<Pubkey, OpsError> {
        Ok(pda::stake_address(user, index, &self.staking_program_id)?.0)
    }

    pub fn global_stats_address(&self) -> Result<Pubkey, OpsError> {
        Ok(pda::global_stats_address(&self.staking_program_id)?.0)
    }

    pub fn user_stats_address(&self, user: &Pubkey) -> Result<Pubkey, OpsError> {
        Ok(pda::user_stats_address(user, &self.staking_program_id)?.0)
    }

    pub fn lock_address(&self, owner: &Pubkey, nft_mint: &Pubkey) -> Result<Pubkey, OpsError> {
        Ok(pda::lock_address(owner, nft_mint, &self.locking_program_id)?.0)
    }

    pub fn nft_vault_authority(&self) -> Result<Pubkey, OpsError> {
        Ok(pda::nft_vault_authority_address(&self.locking_program_id)?.0)
    }

    /// NFT vault token account, owned by the off-curve NFT vault authority.
    pub fn nft_vault_token_account(&self, nft_mint: &Pubkey) -> Result<Pubkey, OpsError> {
        pda::derive_associated_address(&self.nft_vault_authority()?, nft_mint, true)
    }
}
