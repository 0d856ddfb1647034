//! Read flows used by the operator scripts.
//!
//! Each flow derives the addresses it needs from a [`ProgramContext`], pulls
//! raw bytes from an [`AccountSource`] and hands them to the pure decoding and
//! aggregation code.

use anchor_lang::prelude::Pubkey;
use anchor_spl::token::spl_token;
use anchor_spl::token::spl_token::solana_program::program_pack::Pack;
use log::{debug, info};
use serde::Serialize;

use crate::amount::format_amount;
use crate::config::ProgramContext;
use crate::constants::*;
use crate::error::OpsError;
use crate::source::{apply_filters, AccountFilter, AccountSource, WallClock};
use crate::state::{Countdown, LockAccount, LockState, StakeCounter, StakingConfig};
use crate::stats::{LockReport, RawAccount, StakeReport};

fn scan(
    source: &impl AccountSource,
    program_id: &Pubkey,
    filters: &[AccountFilter],
) -> Result<Vec<RawAccount>, OpsError> {
    let accounts = source.program_accounts(program_id, filters)?;
    let scanned = accounts.len();
    let accounts = apply_filters(accounts, filters);
    debug!(
        "Scanned {} accounts of {}, {} after filtering",
        scanned,
        program_id,
        accounts.len()
    );
    Ok(accounts)
}

fn stake_filters(staker: Option<&Pubkey>) -> Vec<AccountFilter> {
    let mut filters = vec![AccountFilter::DataSize(STAKE_ACCOUNT_LEN)];
    if let Some(staker) = staker {
        filters.push(AccountFilter::Memcmp {
            offset: STAKE_STAKER_OFFSET,
            bytes: staker.to_bytes().to_vec(),
        });
    }
    filters
}

/// Every stake account of the staking program, decoded and aggregated.
pub fn stake_report(source: &impl AccountSource, ctx: &ProgramContext) -> Result<StakeReport, OpsError> {
    let accounts = scan(source, &ctx.staking_program_id, &stake_filters(None))?;
    let report = StakeReport::from_accounts(&accounts);
    info!(
        "Found {} stake accounts ({} skipped)",
        report.stakes.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Stake accounts belonging to `staker`.
pub fn user_stake_report(
    source: &impl AccountSource,
    ctx: &ProgramContext,
    staker: &Pubkey,
) -> Result<StakeReport, OpsError> {
    let accounts = scan(source, &ctx.staking_program_id, &stake_filters(Some(staker)))?;
    let report = StakeReport::from_accounts(&accounts);
    info!("Found {} stake(s) for {}", report.stakes.len(), staker);
    Ok(report)
}

/// Index the next stake of `user` will be created at; 0 before the first stake.
pub fn next_stake_index(
    source: &impl AccountSource,
    ctx: &ProgramContext,
    user: &Pubkey,
) -> Result<u64, OpsError> {
    let counter_address = ctx.stake_counter_address(user)?;
    match source.fetch_account(&counter_address) {
        Ok(data) => Ok(StakeCounter::unpack(&data)?.count),
        Err(OpsError::NotFound { .. }) => {
            debug!("No stake counter for {} yet", user);
            Ok(0)
        }
        Err(e) => Err(e),
    }
}

/// Address and index of the stake account the next `stake_tokens` creates.
pub fn next_stake_address(
    source: &impl AccountSource,
    ctx: &ProgramContext,
    user: &Pubkey,
) -> Result<(Pubkey, u64), OpsError> {
    let index = next_stake_index(source, ctx, user)?;
    Ok((ctx.stake_address(user, index)?, index))
}

/// Current staking configuration.
pub fn staking_config(source: &impl AccountSource, ctx: &ProgramContext) -> Result<StakingConfig, OpsError> {
    let data = source.fetch_account(&ctx.config_address()?)?;
    StakingConfig::unpack(&data)
}

/// Lock of one NFT with its state at the clock's current time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockStatus {
    pub address: Pubkey,
    pub account: LockAccount,
    pub state: LockState,
    pub remaining: Countdown,
}

/// Lock status of `nft_mint` for `owner`.
///
/// Returns [`OpsError::NotFound`] when the NFT was never locked, distinct from
/// a lock account that exists but fails to decode.
pub fn lock_status(
    source: &impl AccountSource,
    ctx: &ProgramContext,
    clock: &impl WallClock,
    owner: &Pubkey,
    nft_mint: &Pubkey,
) -> Result<LockStatus, OpsError> {
    let address = ctx.lock_address(owner, nft_mint)?;
    debug!("Lock account PDA: {}", address);
    let account = LockAccount::unpack(&source.fetch_account(&address)?)?;
    let now = clock.now();
    Ok(LockStatus {
        address,
        state: account.state(now),
        remaining: account.countdown(now),
        account,
    })
}

/// Every lock account of the locking program, classified at the clock's time.
pub fn lock_report(
    source: &impl AccountSource,
    ctx: &ProgramContext,
    clock: &impl WallClock,
) -> Result<LockReport, OpsError> {
    let accounts = scan(
        source,
        &ctx.locking_program_id,
        &[AccountFilter::DataSize(LOCK_ACCOUNT_LEN)],
    )?;
    let report = LockReport::from_accounts(&accounts, clock.now());
    info!(
        "Found {} lock accounts ({} skipped)",
        report.locks.len(),
        report.skipped.len()
    );
    Ok(report)
}

fn fetch_mint(source: &impl AccountSource, mint: &Pubkey) -> Result<spl_token::state::Mint, OpsError> {
    let data = source.fetch_account(mint)?;
    spl_token::state::Mint::unpack(&data).map_err(|e| OpsError::malformed("Mint", e.to_string()))
}

/// Decimals of a token mint, read from the mint account.
pub fn mint_decimals(source: &impl AccountSource, mint: &Pubkey) -> Result<u8, OpsError> {
    Ok(fetch_mint(source, mint)?.decimals)
}

/// Total supply of a token mint in base units.
pub fn mint_supply(source: &impl AccountSource, mint: &Pubkey) -> Result<u64, OpsError> {
    Ok(fetch_mint(source, mint)?.supply)
}

/// Supply of a mint split into held-back and circulating amounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TokenSupply {
    pub decimals: u8,
    /// Base units minted
    pub total: u64,
    /// Base units held by the excluded token accounts
    pub excluded: u128,
    /// `total - excluded`, never below zero
    pub circulating: u64,
}

impl TokenSupply {
    pub fn total_display(&self) -> Result<String, OpsError> {
        format_amount(self.total as u128, self.decimals)
    }

    pub fn circulating_display(&self) -> Result<String, OpsError> {
        format_amount(self.circulating as u128, self.decimals)
    }
}

/// Circulating supply of `mint`: total supply minus the balances of
/// `excluded_token_accounts` (treasury, unused allocations). Missing excluded
/// accounts count as empty.
pub fn circulating_supply(
    source: &impl AccountSource,
    mint: &Pubkey,
    excluded_token_accounts: &[Pubkey],
) -> Result<TokenSupply, OpsError> {
    let mint_state = fetch_mint(source, mint)?;
    let mut excluded = 0u128;
    for account in excluded_token_accounts {
        let balance = token_balance(source, account)?;
        debug!("Excluded holder {}: {}", account, balance);
        excluded += balance as u128;
    }
    let circulating = u64::try_from((mint_state.supply as u128).saturating_sub(excluded))
        .map_err(|_| OpsError::MathOverflow)?;
    Ok(TokenSupply {
        decimals: mint_state.decimals,
        total: mint_state.supply,
        excluded,
        circulating,
    })
}

/// Balance of a token account in base units; a missing account holds nothing.
pub fn token_balance(source: &impl AccountSource, token_account: &Pubkey) -> Result<u64, OpsError> {
    match source.account_data(token_account)? {
        Some(data) => {
            let account = spl_token::state::Account::unpack(&data)
                .map_err(|e| OpsError::malformed("TokenAccount", e.to_string()))?;
            Ok(account.amount)
        }
        None => Ok(0),
    }
}
