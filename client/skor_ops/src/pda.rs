//! Program derived address derivation.
//!
//! Addresses are recomputed on every call and never cached; a stale derived
//! address points reads and writes at the wrong record.

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::pubkey::PubkeyError;
use anchor_spl::{associated_token, token};

use crate::constants::*;
use crate::error::OpsError;

/// Derives a program address and its bump seed.
///
/// Bump candidates are tried from 255 downwards; the first candidate whose
/// hash of `seeds ++ [bump] ++ program_id` lies off the ed25519 curve wins.
///
/// # Errors
/// - [`OpsError::SeedTooLong`] if a component exceeds [`MAX_SEED_LEN`]
/// - [`OpsError::TooManySeeds`] if the seeds plus bump exceed [`MAX_SEEDS`]
/// - [`OpsError::NoValidBumpFound`] if every candidate is on-curve
/// - [`OpsError::DerivationFailed`] for any other runtime rejection, such as
///   `PubkeyError::IllegalOwner`
pub fn derive_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8), OpsError> {
    if seeds.len() >= MAX_SEEDS {
        return Err(OpsError::TooManySeeds { count: seeds.len() });
    }
    if let Some((index, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(OpsError::SeedTooLong {
            index,
            len: seed.len(),
        });
    }

    for candidate in (0..=u8::MAX).rev() {
        let bump = [candidate];
        let mut candidate_seeds = seeds.to_vec();
        candidate_seeds.push(&bump);
        match Pubkey::create_program_address(&candidate_seeds, program_id) {
            Ok(address) => return Ok((address, candidate)),
            Err(PubkeyError::InvalidSeeds) => continue,
            // seed count and lengths were validated above
            Err(e) => return Err(OpsError::DerivationFailed(e.to_string())),
        }
    }
    Err(OpsError::NoValidBumpFound)
}

/// Derives the associated token account of `owner` for `mint`.
///
/// Seeds are `[owner, token_program, mint]` under the associated token
/// program. `allow_owner_off_curve` must be `true` when `owner` is itself a
/// PDA (vault authorities, config accounts) and `false` for wallets. With
/// `false` an off-curve owner is rejected with [`OpsError::OwnerOffCurve`]
/// rather than silently producing an address nobody can sign for.
pub fn derive_associated_address(
    owner: &Pubkey,
    mint: &Pubkey,
    allow_owner_off_curve: bool,
) -> Result<Pubkey, OpsError> {
    if !allow_owner_off_curve && !owner.is_on_curve() {
        return Err(OpsError::OwnerOffCurve { owner: *owner });
    }
    let (address, _) = derive_address(
        &[owner.as_ref(), token::ID.as_ref(), mint.as_ref()],
        &associated_token::ID,
    )?;
    Ok(address)
}

// ========== Staking program ==========

/// Staking config PDA: `["config"]`
pub fn config_address(program_id: &Pubkey) -> Result<(Pubkey, u8), OpsError> {
    derive_address(&[CONFIG_SEED], program_id)
}

/// Staking vault authority PDA: `["vault_authority"]`
pub fn vault_authority_address(program_id: &Pubkey) -> Result<(Pubkey, u8), OpsError> {
    derive_address(&[VAULT_AUTHORITY_SEED], program_id)
}

/// Stake counter PDA: `[owner, "stake_counter"]`
pub fn stake_counter_address(owner: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8), OpsError> {
    derive_address(&[owner.as_ref(), STAKE_COUNTER_SEED], program_id)
}

/// Stake account PDA: `[owner, "stake", index as u64 little-endian]`
pub fn stake_address(owner: &Pubkey, index: u64, program_id: &Pubkey) -> Result<(Pubkey, u8), OpsError> {
    derive_address(
        &[owner.as_ref(), STAKE_SEED, &index.to_le_bytes()],
        program_id,
    )
}

/// Global stats PDA: `["global_stats"]`
pub fn global_stats_address(program_id: &Pubkey) -> Result<(Pubkey, u8), OpsError> {
    derive_address(&[GLOBAL_STATS_SEED], program_id)
}

/// User stats PDA: `[owner, "user_stats"]`
pub fn user_stats_address(owner: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8), OpsError> {
    derive_address(&[owner.as_ref(), USER_STATS_SEED], program_id)
}

// ========== Locking program ==========

/// Lock account PDA: `[owner, "nft_lock", nft_mint]`
pub fn lock_address(
    owner: &Pubkey,
    nft_mint: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), OpsError> {
    derive_address(
        &[owner.as_ref(), NFT_LOCK_SEED, nft_mint.as_ref()],
        program_id,
    )
}

/// NFT vault authority PDA: `["nft_vault_authority"]`
pub fn nft_vault_authority_address(program_id: &Pubkey) -> Result<(Pubkey, u8), OpsError> {
    derive_address(&[NFT_VAULT_AUTHORITY_SEED], program_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const WALLET: &str = "8MBg94RS4WTPbggpkAUbsxauqq5HfL5DEvRn8rGcQB7u";

    fn wallet() -> Pubkey {
        Pubkey::from_str(WALLET).unwrap()
    }

    #[test]
    fn test_known_vectors() {
        let program_id = DEFAULT_LOCKING_PROGRAM_ID;

        let (config, bump) = config_address(&program_id).unwrap();
        assert_eq!(
            config,
            Pubkey::from_str("CkjeLgJjTizJ5Qvt9uygC1tSHsoGs8xXgfNcPD9Fh6yS").unwrap()
        );
        assert_eq!(bump, 252);

        let (authority, bump) = nft_vault_authority_address(&program_id).unwrap();
        assert_eq!(
            authority,
            Pubkey::from_str("BZznDgNWR19wqkxhCThQs1aSQaHWzopkT36xBUjMSCJo").unwrap()
        );
        assert_eq!(bump, 255);

        let (stake0, _) = stake_address(&wallet(), 0, &program_id).unwrap();
        let (stake1, _) = stake_address(&wallet(), 1, &program_id).unwrap();
        assert_eq!(
            stake0,
            Pubkey::from_str("DcPpZT5V1xSRu8iyTkuuDFMvGGAMWeNZ8TrnfNhczdGk").unwrap()
        );
        assert_eq!(
            stake1,
            Pubkey::from_str("44FwzoTvjpMXeNRJtkWQdGDPQuEThZxDohdC1KQaDd79").unwrap()
        );
    }

    #[test]
    fn test_matches_find_program_address() {
        let program_id = Pubkey::new_unique();
        let owner = wallet();
        let mint = Pubkey::new_unique();
        let index = 7u64.to_le_bytes();
        let cases: Vec<Vec<&[u8]>> = vec![
            vec![CONFIG_SEED],
            vec![owner.as_ref(), STAKE_COUNTER_SEED],
            vec![owner.as_ref(), STAKE_SEED, &index],
            vec![owner.as_ref(), NFT_LOCK_SEED, mint.as_ref()],
        ];
        for seeds in cases {
            assert_eq!(
                derive_address(&seeds, &program_id).unwrap(),
                Pubkey::find_program_address(&seeds, &program_id)
            );
        }
    }

    #[test]
    fn test_deterministic() {
        let program_id = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let first = stake_address(&owner, 3, &program_id).unwrap();
        for _ in 0..5 {
            assert_eq!(stake_address(&owner, 3, &program_id).unwrap(), first);
        }
    }

    #[test]
    fn test_seed_order_matters() {
        let program_id = Pubkey::new_unique();
        let owner = wallet();
        let (forward, _) = derive_address(&[owner.as_ref(), STAKE_SEED], &program_id).unwrap();
        let (reversed, _) = derive_address(&[STAKE_SEED, owner.as_ref()], &program_id).unwrap();
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_seed_too_long() {
        let program_id = Pubkey::new_unique();
        let long = [1u8; MAX_SEED_LEN + 1];
        assert_eq!(
            derive_address(&[CONFIG_SEED, &long], &program_id),
            Err(OpsError::SeedTooLong {
                index: 1,
                len: MAX_SEED_LEN + 1
            })
        );
        // the first offending component is reported, not the last
        assert_eq!(
            derive_address(&[&long, CONFIG_SEED, &long], &program_id),
            Err(OpsError::SeedTooLong {
                index: 0,
                len: MAX_SEED_LEN + 1
            })
        );
        let exact = [1u8; MAX_SEED_LEN];
        assert!(derive_address(&[&exact], &program_id).is_ok());
    }

    #[test]
    fn test_too_many_seeds() {
        let program_id = Pubkey::new_unique();
        let seeds: Vec<&[u8]> = vec![CONFIG_SEED; MAX_SEEDS];
        assert_eq!(
            derive_address(&seeds, &program_id),
            Err(OpsError::TooManySeeds { count: MAX_SEEDS })
        );
        let seeds: Vec<&[u8]> = vec![CONFIG_SEED; MAX_SEEDS - 1];
        assert!(derive_address(&seeds, &program_id).is_ok());
    }

    #[test]
    fn test_associated_address_matches_spl() {
        let owner = wallet();
        let mint = Pubkey::new_unique();
        assert_eq!(
            derive_associated_address(&owner, &mint, false).unwrap(),
            associated_token::get_associated_token_address(&owner, &mint)
        );
        // wallets may also be derived with the flag set
        assert_eq!(
            derive_associated_address(&owner, &mint, true).unwrap(),
            derive_associated_address(&owner, &mint, false).unwrap()
        );
    }

    #[test]
    fn test_associated_address_off_curve_flag() {
        let (authority, _) = nft_vault_authority_address(&DEFAULT_LOCKING_PROGRAM_ID).unwrap();
        let mint = Pubkey::new_unique();

        let strict = derive_associated_address(&authority, &mint, false);
        let relaxed = derive_associated_address(&authority, &mint, true);
        assert_ne!(strict, relaxed);
        assert_eq!(strict, Err(OpsError::OwnerOffCurve { owner: authority }));
        assert_eq!(
            relaxed.unwrap(),
            associated_token::get_associated_token_address(&authority, &mint)
        );
    }
}
