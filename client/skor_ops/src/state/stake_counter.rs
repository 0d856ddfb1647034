use anchor_lang::Discriminator;
use borsh::{BorshDeserialize, BorshSerialize};

use crate::constants::STAKE_COUNTER_LEN;
use crate::error::OpsError;

use super::{pack_layout, unpack_layout};

/// Per-user counter; `count` is the index the next stake will use.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StakeCounter {
    pub count: u64,
}

impl Discriminator for StakeCounter {
    const DISCRIMINATOR: [u8; 8] = [217, 225, 207, 35, 18, 32, 248, 142];
}

impl StakeCounter {
    pub const TYPE_NAME: &'static str = "StakeCounter";
    pub const LEN: usize = STAKE_COUNTER_LEN;

    /// Decodes a stake counter account.
    pub fn unpack(data: &[u8]) -> Result<Self, OpsError> {
        unpack_layout::<Self, _>(data, Self::TYPE_NAME, Self::LEN)
    }

    /// Encodes the counter as the program stores it.
    pub fn pack(&self) -> Result<Vec<u8>, OpsError> {
        pack_layout::<Self, _>(self, Self::TYPE_NAME)
    }
}
