//! Record classification and aggregation.
//!
//! All functions here are pure: they take already-fetched account data and
//! recompute their results from scratch on every call.

use std::collections::BTreeMap;

use anchor_lang::prelude::Pubkey;
use log::warn;
use serde::Serialize;

use crate::amount::format_amount;
use crate::classify::{DurationLabel, Tier};
use crate::error::OpsError;
use crate::state::{LockAccount, LockState, StakeAccount};

/// Raw account as returned by a program scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawAccount {
    pub address: Pubkey,
    pub data: Vec<u8>,
}

impl RawAccount {
    pub fn new(address: Pubkey, data: Vec<u8>) -> Self {
        Self { address, data }
    }
}

/// A record excluded from a batch because it failed to decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRecord {
    pub address: Pubkey,
    pub error: OpsError,
}

/// Outcome of decoding a batch: the records that decoded and those that did not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded<T> {
    pub records: Vec<(Pubkey, T)>,
    pub skipped: Vec<SkippedRecord>,
}

/// Keeps only accounts whose data is exactly `expected_len` bytes.
///
/// Accounts of other sizes belong to other record kinds and are dropped
/// silently.
pub fn filter_by_exact_size(accounts: Vec<RawAccount>, expected_len: usize) -> Vec<RawAccount> {
    accounts
        .into_iter()
        .filter(|account| account.data.len() == expected_len)
        .collect()
}

/// Decodes every account, collecting failures instead of aborting.
pub fn decode_batch<T>(
    accounts: &[RawAccount],
    unpack: impl Fn(&[u8]) -> Result<T, OpsError>,
) -> Decoded<T> {
    let mut records = Vec::with_capacity(accounts.len());
    let mut skipped = Vec::new();
    for account in accounts {
        match unpack(&account.data) {
            Ok(record) => records.push((account.address, record)),
            Err(error) => {
                warn!("Failed to decode {}: {}", account.address, error);
                skipped.push(SkippedRecord {
                    address: account.address,
                    error,
                });
            }
        }
    }
    Decoded { records, skipped }
}

/// Totals and distributions over a set of stake accounts.
///
/// Amounts are summed as `u128` base units so no realistic total overflows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    pub record_count: u64,
    pub total_staked: u128,
    pub total_rewards: u128,
    /// Deposits of stakes whose rewards were claimed
    pub total_claimed: u128,
    pub active_stakes: u64,
    pub tier_distribution: BTreeMap<Tier, u64>,
    pub duration_distribution: BTreeMap<DurationLabel, u64>,
}

impl AggregateStats {
    pub fn record(&mut self, stake: &StakeAccount) {
        self.record_count += 1;
        self.total_staked += stake.deposit_amount as u128;
        self.total_rewards += stake.reward_amount as u128;
        if stake.claimed {
            self.total_claimed += stake.deposit_amount as u128;
        } else {
            self.active_stakes += 1;
        }
        *self.tier_distribution.entry(stake.tier).or_default() += 1;
        *self
            .duration_distribution
            .entry(stake.duration_label())
            .or_default() += 1;
    }

    /// Folds another aggregate in; equal to aggregating the union.
    pub fn merge(&mut self, other: &AggregateStats) {
        self.record_count += other.record_count;
        self.total_staked += other.total_staked;
        self.total_rewards += other.total_rewards;
        self.total_claimed += other.total_claimed;
        self.active_stakes += other.active_stakes;
        for (tier, count) in &other.tier_distribution {
            *self.tier_distribution.entry(*tier).or_default() += count;
        }
        for (label, count) in &other.duration_distribution {
            *self.duration_distribution.entry(*label).or_default() += count;
        }
    }

    pub fn total_staked_display(&self, decimals: u8) -> Result<String, OpsError> {
        format_amount(self.total_staked, decimals)
    }

    pub fn total_rewards_display(&self, decimals: u8) -> Result<String, OpsError> {
        format_amount(self.total_rewards, decimals)
    }

    pub fn total_claimed_display(&self, decimals: u8) -> Result<String, OpsError> {
        format_amount(self.total_claimed, decimals)
    }
}

/// Aggregates stake accounts in a single pass. Input order does not matter.
pub fn aggregate<'a>(stakes: impl IntoIterator<Item = &'a StakeAccount>) -> AggregateStats {
    let mut stats = AggregateStats::default();
    for stake in stakes {
        stats.record(stake);
    }
    stats
}

/// Aggregates stake accounts grouped by exact staker key.
///
/// A staker appears in the result only if at least one record exists for it.
pub fn aggregate_per_user<'a>(
    stakes: impl IntoIterator<Item = &'a StakeAccount>,
) -> BTreeMap<Pubkey, AggregateStats> {
    let mut per_user: BTreeMap<Pubkey, AggregateStats> = BTreeMap::new();
    for stake in stakes {
        per_user.entry(stake.staker).or_default().record(stake);
    }
    per_user
}

/// Decoded stake accounts with their aggregate and the records that failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakeReport {
    pub stakes: Vec<(Pubkey, StakeAccount)>,
    pub stats: AggregateStats,
    pub skipped: Vec<SkippedRecord>,
}

impl StakeReport {
    /// Decodes and aggregates a batch; malformed records are reported in
    /// `skipped` and left out of the stats.
    pub fn from_accounts(accounts: &[RawAccount]) -> Self {
        let Decoded { records, skipped } = decode_batch(accounts, StakeAccount::unpack);
        let stats = aggregate(records.iter().map(|(_, stake)| stake));
        Self {
            stakes: records,
            stats,
            skipped,
        }
    }

    pub fn per_user(&self) -> BTreeMap<Pubkey, AggregateStats> {
        aggregate_per_user(self.stakes.iter().map(|(_, stake)| stake))
    }
}

/// Counts of locks per lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LockSummary {
    pub total: u64,
    pub locked: u64,
    pub expired: u64,
    pub unlocked: u64,
}

impl LockSummary {
    pub fn record(&mut self, state: LockState) {
        self.total += 1;
        match state {
            LockState::Locked => self.locked += 1,
            LockState::Expired => self.expired += 1,
            LockState::Unlocked => self.unlocked += 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockEntry {
    pub address: Pubkey,
    pub account: LockAccount,
    pub state: LockState,
}

/// Decoded lock accounts classified at one instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockReport {
    pub locks: Vec<LockEntry>,
    pub summary: LockSummary,
    pub skipped: Vec<SkippedRecord>,
}

impl LockReport {
    pub fn from_accounts(accounts: &[RawAccount], now: i64) -> Self {
        let Decoded { records, skipped } = decode_batch(accounts, LockAccount::unpack);
        let mut summary = LockSummary::default();
        let locks = records
            .into_iter()
            .map(|(address, account)| {
                let state = account.state(now);
                summary.record(state);
                LockEntry {
                    address,
                    account,
                    state,
                }
            })
            .collect();
        Self {
            locks,
            summary,
            skipped,
        }
    }
}
