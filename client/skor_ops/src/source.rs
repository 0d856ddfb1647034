//! Collaborator contracts: where account bytes and the current time come from.
//!
//! RPC transport, retries and timeouts live behind [`AccountSource`]
//! implementations; nothing in this crate talks to the network directly.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use anchor_lang::prelude::Pubkey;

use crate::error::OpsError;
use crate::stats::RawAccount;

/// Server-side filter for program account scans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountFilter {
    /// Account data length must equal the value
    DataSize(usize),
    /// Account data at `offset` must equal `bytes`
    Memcmp { offset: usize, bytes: Vec<u8> },
}

impl AccountFilter {
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            AccountFilter::DataSize(len) => data.len() == *len,
            AccountFilter::Memcmp { offset, bytes } => offset
                .checked_add(bytes.len())
                .and_then(|end| data.get(*offset..end))
                .map_or(false, |window| window == bytes.as_slice()),
        }
    }
}

/// Applies filters client-side; a no-op when the server already applied them.
pub fn apply_filters(accounts: Vec<RawAccount>, filters: &[AccountFilter]) -> Vec<RawAccount> {
    accounts
        .into_iter()
        .filter(|account| filters.iter().all(|filter| filter.matches(&account.data)))
        .collect()
}

/// Read access to ledger accounts.
pub trait AccountSource {
    /// All accounts owned by `program_id`. Implementations may ignore
    /// `filters`; callers re-filter the result.
    fn program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<RawAccount>, OpsError>;

    /// Data of a single account, `None` if it does not exist.
    fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, OpsError>;

    /// Like [`AccountSource::account_data`] but turns absence into
    /// [`OpsError::NotFound`].
    fn fetch_account(&self, address: &Pubkey) -> Result<Vec<u8>, OpsError> {
        self.account_data(address)?
            .ok_or(OpsError::NotFound { address: *address })
    }
}

/// Source of the current unix time in seconds.
pub trait WallClock {
    fn now(&self) -> i64;
}

/// Wall clock backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
            Err(before_epoch) => -i64::try_from(before_epoch.duration().as_secs()).unwrap_or(i64::MAX),
        }
    }
}

/// Wall clock frozen at a fixed instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl WallClock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

/// In-memory account store, e.g. for snapshots or tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    accounts: BTreeMap<Pubkey, (Pubkey, Vec<u8>)>,
    honor_filters: bool,
}

impl MemorySource {
    /// A store that applies scan filters like a full RPC node.
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
            honor_filters: true,
        }
    }

    /// A store that ignores scan filters and returns every owned account.
    pub fn without_filter_support() -> Self {
        Self {
            accounts: BTreeMap::new(),
            honor_filters: false,
        }
    }

    pub fn insert(&mut self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        self.accounts.insert(address, (owner, data));
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountSource for MemorySource {
    fn program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<RawAccount>, OpsError> {
        let owned = self
            .accounts
            .iter()
            .filter(|(_, (owner, _))| owner == program_id)
            .map(|(address, (_, data))| RawAccount::new(*address, data.clone()))
            .collect();
        if self.honor_filters {
            Ok(apply_filters(owned, filters))
        } else {
            Ok(owned)
        }
    }

    fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, OpsError> {
        Ok(self.accounts.get(address).map(|(_, data)| data.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memcmp_filter() {
        let filter = AccountFilter::Memcmp {
            offset: 2,
            bytes: vec![7, 8],
        };
        assert!(filter.matches(&[0, 0, 7, 8, 9]));
        assert!(!filter.matches(&[0, 0, 7, 9, 9]));
        assert!(!filter.matches(&[0, 0, 7]));
        assert!(!AccountFilter::Memcmp {
            offset: usize::MAX,
            bytes: vec![1],
        }
        .matches(&[1]));
    }

    #[test]
    fn test_fetch_account_not_found() {
        let source = MemorySource::new();
        let address = Pubkey::new_unique();
        assert_eq!(source.account_data(&address), Ok(None));
        assert_eq!(
            source.fetch_account(&address),
            Err(OpsError::NotFound { address })
        );
    }

    #[test]
    fn test_filters_honored_or_ignored() {
        let program = Pubkey::new_unique();
        let filters = [AccountFilter::DataSize(3)];
        for (mut source, expected) in [
            (MemorySource::new(), 1),
            (MemorySource::without_filter_support(), 2),
        ] {
            source.insert(Pubkey::new_unique(), program, vec![1, 2, 3]);
            source.insert(Pubkey::new_unique(), program, vec![1, 2]);
            source.insert(Pubkey::new_unique(), Pubkey::new_unique(), vec![1, 2, 3]);
            let scanned = source.program_accounts(&program, &filters).unwrap();
            assert_eq!(scanned.len(), expected);
            assert_eq!(apply_filters(scanned, &filters).len(), 1);
        }
    }

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(42).now(), 42);
        assert!(SystemClock.now() > 1_600_000_000);
    }
}
