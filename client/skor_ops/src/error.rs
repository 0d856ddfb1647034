//! Error types for the SKOR operator toolkit.
//!
//! Every fallible operation in the crate returns [`OpsError`].
//!
//! ## Error Groups
//! - Derivation errors: always fatal to the calling operation
//! - Record errors: per-record during batch scans, the batch keeps going
//! - Lookup errors: `NotFound` is a normal outcome, not an alarm
//! - Arithmetic, configuration and collaborator errors

use anchor_lang::prelude::Pubkey;
use thiserror::Error;

/// Errors returned by the toolkit.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum OpsError {
    // ========== Derivation Errors ==========

    /// A seed component is longer than the ledger allows.
    #[error("Seed component {index} is {len} bytes, exceeding the maximum seed length")]
    SeedTooLong { index: usize, len: usize },

    /// More seed components than the ledger allows (bump included).
    #[error("Too many seed components: {count}")]
    TooManySeeds { count: usize },

    /// All 256 bump candidates produced on-curve addresses.
    #[error("Unable to find a viable program address bump seed")]
    NoValidBumpFound,

    /// The runtime's address derivation rejected the input for a reason
    /// other than an on-curve candidate.
    #[error("Program address derivation failed: {0}")]
    DerivationFailed(String),

    /// An associated address was requested for an off-curve owner without
    /// allowing it.
    #[error("Owner {owner} is off the ed25519 curve; derive with allow_owner_off_curve")]
    OwnerOffCurve { owner: Pubkey },

    // ========== Record Errors ==========

    /// Raw account bytes do not match the expected fixed layout.
    #[error("Malformed {kind} record: {reason}")]
    MalformedRecord { kind: &'static str, reason: String },

    /// No account exists at the address.
    #[error("No account found at {address}")]
    NotFound { address: Pubkey },

    // ========== Arithmetic Errors ==========

    /// Token decimals too large for integer formatting.
    #[error("Token decimals {0} out of range")]
    DecimalsOutOfRange(u8),

    /// Arithmetic overflow occurred during calculation.
    #[error("Arithmetic overflow occurred during calculation")]
    MathOverflow,

    /// Instruction arguments could not be serialized.
    #[error("Failed to encode instruction data: {0}")]
    InstructionEncoding(String),

    // ========== Configuration / Collaborator Errors ==========

    /// The configuration could not be loaded or contains invalid values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The account source failed to answer.
    #[error("Account source error: {0}")]
    Source(String),
}

impl OpsError {
    /// Shorthand for building a [`OpsError::MalformedRecord`].
    pub fn malformed(kind: &'static str, reason: impl Into<String>) -> Self {
        OpsError::MalformedRecord {
            kind,
            reason: reason.into(),
        }
    }

    /// Whether this error means "no such record yet".
    pub fn is_not_found(&self) -> bool {
        matches!(self, OpsError::NotFound { .. })
    }
}
