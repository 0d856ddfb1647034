use anchor_lang::prelude::Pubkey;
use anchor_lang::Discriminator;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;

use crate::constants::*;
use crate::error::OpsError;

use super::{pack_layout, unpack_layout};

/// One NFT held by the locking program's vault.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LockAccount {
    pub owner: Pubkey,
    pub nft_mint: Pubkey,
    pub start_time: i64,
    pub duration: i64,
    pub unlocked: bool,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct LockAccountLayout {
    owner: [u8; 32],
    nft_mint: [u8; 32],
    start_time: i64,
    duration: i64,
    unlocked: bool,
}

/// Lifecycle position of a lock at a given instant.
///
/// `Locked -> Expired` happens with the passage of time; `Expired -> Unlocked`
/// only through the program's unlock instructions. `Unlocked` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LockState {
    Locked,
    Expired,
    Unlocked,
}

impl LockState {
    /// Only expired locks may be unlocked by their owner.
    pub fn is_unlock_eligible(&self) -> bool {
        matches!(self, LockState::Expired)
    }
}

/// Remaining lock time split for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl Discriminator for LockAccount {
    const DISCRIMINATOR: [u8; 8] = [223, 64, 71, 124, 255, 86, 118, 192];
}

impl LockAccount {
    /// Anchor account name.
    pub const TYPE_NAME: &'static str = "LockAccount";
    /// Total account size.
    pub const LEN: usize = LOCK_ACCOUNT_LEN;

    /// Decodes a lock account, discriminator included.
    pub fn unpack(data: &[u8]) -> Result<Self, OpsError> {
        let layout: LockAccountLayout = unpack_layout::<Self, _>(data, Self::TYPE_NAME, Self::LEN)?;
        Ok(Self {
            owner: Pubkey::new_from_array(layout.owner),
            nft_mint: Pubkey::new_from_array(layout.nft_mint),
            start_time: layout.start_time,
            duration: layout.duration,
            unlocked: layout.unlocked,
        })
    }

    /// Encodes the account as the program stores it.
    pub fn pack(&self) -> Result<Vec<u8>, OpsError> {
        pack_layout::<Self, _>(
            &LockAccountLayout {
                owner: self.owner.to_bytes(),
                nft_mint: self.nft_mint.to_bytes(),
                start_time: self.start_time,
                duration: self.duration,
                unlocked: self.unlocked,
            },
            Self::TYPE_NAME,
        )
    }

    pub fn unlock_time(&self) -> i64 {
        self.start_time.saturating_add(self.duration)
    }

    /// Classifies the lock at `now`, recomputed from timestamps on every call.
    pub fn state(&self, now: i64) -> LockState {
        if self.unlocked {
            LockState::Unlocked
        } else if now < self.unlock_time() {
            LockState::Locked
        } else {
            LockState::Expired
        }
    }

    /// Seconds until the lock expires, zero once expired or unlocked.
    pub fn time_remaining(&self, now: i64) -> i64 {
        match self.state(now) {
            LockState::Locked => self.unlock_time().saturating_sub(now),
            _ => 0,
        }
    }

    pub fn countdown(&self, now: i64) -> Countdown {
        let remaining = self.time_remaining(now);
        Countdown {
            days: remaining / SECONDS_PER_DAY,
            hours: (remaining % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
            minutes: (remaining % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_700_000_000;

    fn lock(unlocked: bool) -> LockAccount {
        LockAccount {
            owner: Pubkey::new_unique(),
            nft_mint: Pubkey::new_unique(),
            start_time: T,
            duration: SECONDS_PER_DAY,
            unlocked,
        }
    }

    #[test]
    fn test_lock_state_transitions() {
        let locked = lock(false);
        assert_eq!(locked.state(T + 43_200), LockState::Locked);
        assert_eq!(locked.state(T + SECONDS_PER_DAY), LockState::Expired);
        assert_eq!(locked.state(T + 90_000), LockState::Expired);
        assert!(locked.state(T + 90_000).is_unlock_eligible());

        let unlocked = lock(true);
        for now in [T - 1, T, T + 43_200, T + 90_000, i64::MAX] {
            assert_eq!(unlocked.state(now), LockState::Unlocked);
        }
        assert!(!LockState::Unlocked.is_unlock_eligible());
    }

    #[test]
    fn test_countdown() {
        let mut account = lock(false);
        account.duration = 3 * SECONDS_PER_DAY;
        let now = T + SECONDS_PER_DAY + 30 * SECONDS_PER_MINUTE;
        assert_eq!(
            account.countdown(now),
            Countdown {
                days: 1,
                hours: 23,
                minutes: 30,
            }
        );
        assert_eq!(account.countdown(T + 4 * SECONDS_PER_DAY), Countdown::default());
    }

    #[test]
    fn test_layout() {
        let account = lock(false);
        let data = account.pack().unwrap();
        assert_eq!(data.len(), 89);
        assert_eq!(
            &data[LOCK_OWNER_OFFSET..LOCK_OWNER_OFFSET + 32],
            account.owner.as_ref()
        );
        assert_eq!(&data[40..72], account.nft_mint.as_ref());
        assert_eq!(LockAccount::unpack(&data).unwrap(), account);
        assert!(LockAccount::unpack(&data[..88]).is_err());
    }

    #[test]
    fn test_saturating_unlock_time() {
        let mut account = lock(false);
        account.start_time = i64::MAX - 10;
        assert_eq!(account.unlock_time(), i64::MAX);
        assert_eq!(account.state(0), LockState::Locked);
    }
}
