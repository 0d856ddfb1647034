//! Constants shared by the SKOR operator toolkit.
//!
//! This module defines the PDA seeds, account layout sizes and offsets, time
//! constants and tier thresholds used when talking to the staking and NFT
//! locking programs.

use anchor_lang::prelude::Pubkey;

/// Deployed NFT locking program id, `3CN3wBxMpJnRNndTd8NvghTWRPLbE8c824aBUGBXeSMe`.
pub const DEFAULT_LOCKING_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    32, 160, 144, 146, 69, 45, 240, 36, 240, 222, 204, 227, 7, 26, 18, 42, 207, 107, 7, 255, 2,
    132, 220, 119, 140, 133, 129, 73, 144, 248, 182, 89,
]);

/// Maximum length of a single seed component, in bytes.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seed components, bump byte included.
pub const MAX_SEEDS: usize = 16;

// ========== Staking program seeds ==========

/// Seed for the staking config PDA
pub const CONFIG_SEED: &[u8] = b"config";

/// Seed for the staking vault authority PDA
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

/// Seed for per-user stake counter PDAs (`[owner, seed]`)
pub const STAKE_COUNTER_SEED: &[u8] = b"stake_counter";

/// Seed for stake account PDAs (`[owner, seed, index_le]`)
pub const STAKE_SEED: &[u8] = b"stake";

/// Seed for the global stats PDA
pub const GLOBAL_STATS_SEED: &[u8] = b"global_stats";

/// Seed for per-user stats PDAs (`[owner, seed]`)
pub const USER_STATS_SEED: &[u8] = b"user_stats";

// ========== Locking program seeds ==========

/// Seed for lock account PDAs (`[owner, seed, nft_mint]`)
pub const NFT_LOCK_SEED: &[u8] = b"nft_lock";

/// Seed for the NFT vault authority PDA
pub const NFT_VAULT_AUTHORITY_SEED: &[u8] = b"nft_vault_authority";

// ========== Account layouts ==========

/// Length of the Anchor account discriminator prefix
pub const DISCRIMINATOR_LEN: usize = 8;

/// Size of a stake account: discriminator, staker, deposit, reward,
/// start time, duration, claimed, tier, index
pub const STAKE_ACCOUNT_LEN: usize = 8 + 32 + 8 + 8 + 8 + 8 + 1 + 1 + 8;

/// Size of a lock account: discriminator, owner, nft mint, start time,
/// duration, unlocked
pub const LOCK_ACCOUNT_LEN: usize = 8 + 32 + 32 + 8 + 8 + 1;

/// Size of a stake counter account
pub const STAKE_COUNTER_LEN: usize = 8 + 8;

/// Size of the staking config account
pub const STAKING_CONFIG_LEN: usize = 8 + 32 + 32 + 8 + 1 + 8 + 8;

/// Offset of the staker key inside a stake account (memcmp filter)
pub const STAKE_STAKER_OFFSET: usize = DISCRIMINATOR_LEN;

/// Offset of the owner key inside a lock account (memcmp filter)
pub const LOCK_OWNER_OFFSET: usize = DISCRIMINATOR_LEN;

// ========== Time ==========

/// Number of seconds in a day
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Number of seconds in an hour
pub const SECONDS_PER_HOUR: i64 = 3_600;

/// Number of seconds in a minute
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Days in a year, used for APY annualisation
pub const DAYS_PER_YEAR: u128 = 365;

/// Basis points denominator (100% = 10000 basis points)
pub const BASIS_POINTS_DENOMINATOR: u128 = 10_000;

// ========== Tiers ==========

/// Minimum stake accepted by the program, in whole tokens
pub const MIN_STAKE_WHOLE: u64 = 1_000;

/// Smallest whole-token amount assigned the Silver tier
pub const SILVER_THRESHOLD_WHOLE: u64 = 100_000;

/// Smallest whole-token amount assigned the Gold tier
pub const GOLD_THRESHOLD_WHOLE: u64 = 300_000;
