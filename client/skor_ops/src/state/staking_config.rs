use anchor_lang::prelude::Pubkey;
use anchor_lang::Discriminator;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;

use crate::constants::STAKING_CONFIG_LEN;
use crate::error::OpsError;

use super::{pack_layout, unpack_layout};

/// Global staking configuration held in the `config` PDA.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StakingConfig {
    pub admin: Pubkey,
    pub stake_mint: Pubkey,
    pub monthly_cap: u64,
    pub paused_staking: bool,
    pub monthly_distributed: u64,
    pub last_epoch_start: i64,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct StakingConfigLayout {
    admin: [u8; 32],
    stake_mint: [u8; 32],
    monthly_cap: u64,
    paused_staking: bool,
    monthly_distributed: u64,
    last_epoch_start: i64,
}

impl Discriminator for StakingConfig {
    const DISCRIMINATOR: [u8; 8] = [155, 12, 170, 224, 30, 250, 204, 130];
}

impl StakingConfig {
    /// The program names this account `Config`.
    /// Anchor account name; the program calls it `Config`.
    pub const TYPE_NAME: &'static str = "Config";
    pub const LEN: usize = STAKING_CONFIG_LEN;

    /// Decodes the program config account.
    pub fn unpack(data: &[u8]) -> Result<Self, OpsError> {
        let layout: StakingConfigLayout = unpack_layout::<Self, _>(data, Self::TYPE_NAME, Self::LEN)?;
        Ok(Self {
            admin: Pubkey::new_from_array(layout.admin),
            stake_mint: Pubkey::new_from_array(layout.stake_mint),
            monthly_cap: layout.monthly_cap,
            paused_staking: layout.paused_staking,
            monthly_distributed: layout.monthly_distributed,
            last_epoch_start: layout.last_epoch_start,
        })
    }

    /// Encodes the config as the program stores it.
    pub fn pack(&self) -> Result<Vec<u8>, OpsError> {
        pack_layout::<Self, _>(
            &StakingConfigLayout {
                admin: self.admin.to_bytes(),
                stake_mint: self.stake_mint.to_bytes(),
                monthly_cap: self.monthly_cap,
                paused_staking: self.paused_staking,
                monthly_distributed: self.monthly_distributed,
                last_epoch_start: self.last_epoch_start,
            },
            Self::TYPE_NAME,
        )
    }

    /// Rewards that can still be paid out in the current epoch.
    pub fn remaining_monthly_cap(&self) -> u64 {
        self.monthly_cap.saturating_sub(self.monthly_distributed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_cap() {
        let mut config = StakingConfig {
            admin: Pubkey::new_unique(),
            stake_mint: Pubkey::new_unique(),
            monthly_cap: 1_000,
            paused_staking: false,
            monthly_distributed: 400,
            last_epoch_start: 0,
        };
        assert_eq!(config.remaining_monthly_cap(), 600);
        config.monthly_distributed = 1_500;
        assert_eq!(config.remaining_monthly_cap(), 0);

        let data = config.pack().unwrap();
        assert_eq!(data.len(), 97);
        assert_eq!(StakingConfig::unpack(&data).unwrap(), config);
    }
}
