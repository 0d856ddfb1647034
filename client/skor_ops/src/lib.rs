//! # SKOR Operator Toolkit
//!
//! Off-chain library for operating the SKOR staking program and its
//! companion NFT locking program.
//!
//! ## Features
//! - Program-derived and associated token address derivation
//! - Fixed-layout decoding of stake, lock, counter and config accounts
//! - Tier and lock duration classification
//! - Stake statistics with exact integer totals, per user or program-wide
//! - Lock status and countdowns against an injected clock
//! - Instruction builders for every staking and locking write
//!
//! Reads go through an [`source::AccountSource`]; the library never talks to
//! an RPC node itself. All program ids and the stake mint travel in a
//! [`config::ProgramContext`].

pub mod amount;
pub mod classify;
pub mod config;
pub mod constants;
pub mod discriminator;
pub mod error;
pub mod instructions;
pub mod pda;
pub mod query;
pub mod source;
pub mod state;
pub mod stats;

pub use classify::{DurationLabel, LockDuration, Tier};
pub use config::{OpsConfig, ProgramContext};
pub use error::OpsError;
pub use source::{AccountFilter, AccountSource, WallClock};
