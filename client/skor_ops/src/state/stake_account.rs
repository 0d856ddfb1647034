use anchor_lang::prelude::Pubkey;
use anchor_lang::Discriminator;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;

use crate::classify::{classify_duration, implied_apy_bps, DurationLabel, Tier};
use crate::constants::*;
use crate::error::OpsError;

use super::{pack_layout, unpack_layout};

/// One staking position created by `stake_tokens`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StakeAccount {
    pub staker: Pubkey,
    pub deposit_amount: u64,
    pub reward_amount: u64,
    pub start_time: i64,
    pub duration: i64,
    pub claimed: bool,
    pub tier: Tier,
    pub index: u64,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct StakeAccountLayout {
    staker: [u8; 32],
    deposit_amount: u64,
    reward_amount: u64,
    start_time: i64,
    duration: i64,
    claimed: bool,
    tier: Tier,
    index: u64,
}

impl Discriminator for StakeAccount {
    const DISCRIMINATOR: [u8; 8] = [80, 158, 67, 124, 50, 189, 192, 255];
}

impl StakeAccount {
    /// Anchor account name, the discriminator preimage.
    pub const TYPE_NAME: &'static str = "StakeAccount";
    /// Total account size, discriminator included.
    pub const LEN: usize = STAKE_ACCOUNT_LEN;

    /// Decodes a stake account, discriminator included.
    ///
    /// Fails with [`OpsError::MalformedRecord`] on a wrong length or
    /// discriminator, an unknown tier byte or a bool other than 0/1.
    pub fn unpack(data: &[u8]) -> Result<Self, OpsError> {
        let layout: StakeAccountLayout = unpack_layout::<Self, _>(data, Self::TYPE_NAME, Self::LEN)?;
        Ok(Self {
            staker: Pubkey::new_from_array(layout.staker),
            deposit_amount: layout.deposit_amount,
            reward_amount: layout.reward_amount,
            start_time: layout.start_time,
            duration: layout.duration,
            claimed: layout.claimed,
            tier: layout.tier,
            index: layout.index,
        })
    }

    /// Encodes the account as the program stores it.
    pub fn pack(&self) -> Result<Vec<u8>, OpsError> {
        pack_layout::<Self, _>(
            &StakeAccountLayout {
                staker: self.staker.to_bytes(),
                deposit_amount: self.deposit_amount,
                reward_amount: self.reward_amount,
                start_time: self.start_time,
                duration: self.duration,
                claimed: self.claimed,
                tier: self.tier,
                index: self.index,
            },
            Self::TYPE_NAME,
        )
    }

    /// Rewards not yet claimed keep the stake active.
    pub fn is_active(&self) -> bool {
        !self.claimed
    }

    pub fn unlock_time(&self) -> i64 {
        self.start_time.saturating_add(self.duration)
    }

    pub fn is_lock_ended(&self, now: i64) -> bool {
        now >= self.unlock_time()
    }

    pub fn duration_label(&self) -> DurationLabel {
        classify_duration(self.duration)
    }

    pub fn implied_apy_bps(&self) -> Option<u128> {
        implied_apy_bps(self.deposit_amount, self.reward_amount, self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StakeAccount {
        StakeAccount {
            staker: Pubkey::new_unique(),
            deposit_amount: 10_000_000,
            reward_amount: 250_000,
            start_time: 1_700_000_000,
            duration: 90 * SECONDS_PER_DAY,
            claimed: false,
            tier: Tier::Silver,
            index: 4,
        }
    }

    #[test]
    fn test_layout_offsets() {
        let stake = sample();
        let data = stake.pack().unwrap();
        assert_eq!(data.len(), StakeAccount::LEN);
        assert_eq!(data.len(), 82);
        assert_eq!(
            &data[STAKE_STAKER_OFFSET..STAKE_STAKER_OFFSET + 32],
            stake.staker.as_ref()
        );
        assert_eq!(&data[40..48], &10_000_000u64.to_le_bytes());
        assert_eq!(data[72], 0); // claimed
        assert_eq!(data[73], 1); // tier
        assert_eq!(&data[74..82], &4u64.to_le_bytes());
        assert_eq!(StakeAccount::unpack(&data).unwrap(), stake);
    }

    #[test]
    fn test_unpack_rejects_wrong_length() {
        let data = sample().pack().unwrap();
        let err = StakeAccount::unpack(&data[..data.len() - 1]).unwrap_err();
        assert!(matches!(err, OpsError::MalformedRecord { kind: "StakeAccount", .. }));
    }

    #[test]
    fn test_unpack_rejects_unknown_tier() {
        let mut data = sample().pack().unwrap();
        data[73] = 7;
        assert!(matches!(
            StakeAccount::unpack(&data),
            Err(OpsError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_unpack_rejects_bad_bool_and_discriminator() {
        let mut data = sample().pack().unwrap();
        data[72] = 2;
        assert!(StakeAccount::unpack(&data).is_err());

        let mut data = sample().pack().unwrap();
        data[0] ^= 0xff;
        assert_eq!(
            StakeAccount::unpack(&data),
            Err(OpsError::malformed("StakeAccount", "discriminator mismatch"))
        );
    }

    #[test]
    fn test_lock_end() {
        let stake = sample();
        assert!(!stake.is_lock_ended(stake.start_time + 89 * SECONDS_PER_DAY));
        assert!(stake.is_lock_ended(stake.unlock_time()));
        assert_eq!(stake.duration_label().to_string(), "Ninety");
        assert!(stake.is_active());
    }
}
