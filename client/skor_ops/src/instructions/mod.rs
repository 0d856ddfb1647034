//! Instruction builders for the staking and NFT locking programs, plus the
//! SPL token account setup and vault funding the operators send around them.
//!
//! Each program builder derives the accounts the program expects, in the program's
//! account order, and encodes `discriminator ++ borsh(args)`. Signing and
//! sending are left to the caller.

pub mod admin;
pub mod claim_rewards;
pub mod fund_vault;
pub mod initialize;
pub mod nft_lock;
pub mod stake;

pub use admin::*;
pub use claim_rewards::*;
pub use fund_vault::*;
pub use initialize::*;
pub use nft_lock::*;
pub use stake::*;

use borsh::BorshSerialize;

use crate::discriminator::instruction_discriminator;
use crate::error::OpsError;

/// Encodes instruction data as Anchor does.
pub(crate) fn instruction_data<T: BorshSerialize>(name: &str, args: &T) -> Result<Vec<u8>, OpsError> {
    let mut data = instruction_discriminator(name).to_vec();
    args.serialize(&mut data)
        .map_err(|e| OpsError::InstructionEncoding(format!("{}: {}", name, e)))?;
    Ok(data)
}
