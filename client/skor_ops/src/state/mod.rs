//! Account layouts of the staking and NFT locking programs.
//!
//! Every account is an 8-byte Anchor discriminator followed by a borsh-encoded
//! body of fixed size. Decoding checks the exact length, the discriminator and
//! every enum/bool byte; there are no partial decodes.

pub mod lock_account;
pub mod stake_account;
pub mod stake_counter;
pub mod staking_config;

pub use lock_account::*;
pub use stake_account::*;
pub use stake_counter::*;
pub use staking_config::*;

use anchor_lang::Discriminator;
use borsh::{BorshDeserialize, BorshSerialize};

use crate::constants::DISCRIMINATOR_LEN;
use crate::error::OpsError;

/// Decodes a fixed-layout account body after validating size and the
/// discriminator of account type `D`.
pub(crate) fn unpack_layout<D: Discriminator, T: BorshDeserialize>(
    data: &[u8],
    type_name: &'static str,
    expected_len: usize,
) -> Result<T, OpsError> {
    if data.len() != expected_len {
        return Err(OpsError::malformed(
            type_name,
            format!("expected {} bytes, got {}", expected_len, data.len()),
        ));
    }
    let (discriminator, body) = data.split_at(DISCRIMINATOR_LEN);
    if discriminator != D::DISCRIMINATOR {
        return Err(OpsError::malformed(type_name, "discriminator mismatch"));
    }
    borsh::from_slice(body).map_err(|e| OpsError::malformed(type_name, e.to_string()))
}

/// Encodes an account body behind the discriminator of account type `D`.
pub(crate) fn pack_layout<D: Discriminator, T: BorshSerialize>(
    layout: &T,
    type_name: &'static str,
) -> Result<Vec<u8>, OpsError> {
    let mut data = D::DISCRIMINATOR.to_vec();
    layout
        .serialize(&mut data)
        .map_err(|e| OpsError::malformed(type_name, e.to_string()))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discriminator::account_discriminator;

    #[test]
    fn test_discriminators_match_type_names() {
        assert_eq!(StakeAccount::DISCRIMINATOR, account_discriminator(StakeAccount::TYPE_NAME));
        assert_eq!(LockAccount::DISCRIMINATOR, account_discriminator(LockAccount::TYPE_NAME));
        assert_eq!(StakeCounter::DISCRIMINATOR, account_discriminator(StakeCounter::TYPE_NAME));
        assert_eq!(StakingConfig::DISCRIMINATOR, account_discriminator(StakingConfig::TYPE_NAME));
    }
}
