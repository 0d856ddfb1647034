//! Tier and duration classification.
//!
//! Tiers and lock durations are closed sets. Decoding an unknown tier byte is
//! a [`crate::error::OpsError::MalformedRecord`]; durations never fail and fall
//! back to a pass-through [`DurationLabel::Days`] label for off-nominal records.

use std::fmt;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Serialize, Serializer};

use crate::constants::*;
use crate::error::OpsError;

/// Staking tier assigned by the program from the deposit size.
#[derive(
    BorshSerialize,
    BorshDeserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
)]
pub enum Tier {
    /// Below 100 000 whole tokens
    Bronze,
    /// 100 000 to 299 999 whole tokens
    Silver,
    /// 300 000 whole tokens and above
    Gold,
}

impl Tier {
    /// Variant name as shown in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
        }
    }

    /// Tier the program is expected to assign for a deposit of `whole`
    /// tokens. Useful to validate freshly created stakes.
    pub fn for_whole_amount(whole: u64) -> Tier {
        if whole >= GOLD_THRESHOLD_WHOLE {
            Tier::Gold
        } else if whole >= SILVER_THRESHOLD_WHOLE {
            Tier::Silver
        } else {
            Tier::Bronze
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lock period accepted by the `stake_tokens` and `lock_nft` instructions.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LockDuration {
    Sixty,
    Ninety,
    OneEighty,
    ThreeSixtyFive,
}

impl LockDuration {
    /// Every variant, shortest first.
    pub const ALL: [LockDuration; 4] = [
        LockDuration::Sixty,
        LockDuration::Ninety,
        LockDuration::OneEighty,
        LockDuration::ThreeSixtyFive,
    ];

    /// Lock length in days.
    pub fn days(&self) -> i64 {
        match self {
            LockDuration::Sixty => 60,
            LockDuration::Ninety => 90,
            LockDuration::OneEighty => 180,
            LockDuration::ThreeSixtyFive => 365,
        }
    }

    /// Lock length in seconds, as stored in the `duration` field.
    pub fn seconds(&self) -> i64 {
        self.days() * SECONDS_PER_DAY
    }

    /// The variant locking for exactly `days`, if any.
    pub fn from_days(days: i64) -> Option<LockDuration> {
        LockDuration::ALL.into_iter().find(|d| d.days() == days)
    }

    /// Variant name, also the canonical duration label.
    pub fn name(&self) -> &'static str {
        match self {
            LockDuration::Sixty => "Sixty",
            LockDuration::Ninety => "Ninety",
            LockDuration::OneEighty => "OneEighty",
            LockDuration::ThreeSixtyFive => "ThreeSixtyFive",
        }
    }
}

impl FromStr for LockDuration {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LockDuration::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| OpsError::InvalidConfig(format!("invalid duration: {}", s)))
    }
}

impl fmt::Display for LockDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display bucket for a raw duration in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DurationLabel {
    Canonical(LockDuration),
    /// Whole days of a duration matching no canonical period
    Days(i64),
}

impl fmt::Display for DurationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationLabel::Canonical(duration) => f.write_str(duration.name()),
            DurationLabel::Days(days) => write!(f, "{}Days", days),
        }
    }
}

impl Serialize for DurationLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl PartialOrd for LockDuration {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LockDuration {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.days().cmp(&other.days())
    }
}

/// Classifies a raw duration by whole days (`seconds / 86400`).
pub fn classify_duration(duration_seconds: i64) -> DurationLabel {
    let days = duration_seconds / SECONDS_PER_DAY;
    match LockDuration::from_days(days) {
        Some(duration) => DurationLabel::Canonical(duration),
        None => DurationLabel::Days(days),
    }
}

/// Annualised reward rate of a stake in basis points, floored.
///
/// Returns `None` for a zero deposit or a non-positive duration.
pub fn implied_apy_bps(deposit_amount: u64, reward_amount: u64, duration_seconds: i64) -> Option<u128> {
    if deposit_amount == 0 || duration_seconds <= 0 {
        return None;
    }
    let numerator = (reward_amount as u128)
        .checked_mul(DAYS_PER_YEAR * SECONDS_PER_DAY as u128)?
        .checked_mul(BASIS_POINTS_DENOMINATOR)?;
    let denominator = (deposit_amount as u128).checked_mul(duration_seconds as u128)?;
    numerator.checked_div(denominator)
}
