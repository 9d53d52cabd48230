//! Oracle registry: built once during bootstrap, frozen before use.

use std::collections::HashMap;
use surety_primitives::Address;

/// Accumulates oracle registrations during bootstrap.
///
/// Freezing consumes the builder, so the registry cannot grow once event
/// handling has started; an account whose registration failed is simply
/// never inserted.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<Address, Vec<u8>>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the index set the contract assigned to an account.
    ///
    /// A repeated insert for the same account replaces the previous set;
    /// the contract assigns indexes once, so this does not occur during a
    /// normal bootstrap.
    pub fn insert<I: Into<Vec<u8>>>(&mut self, account: Address, indexes: I) {
        self.entries.insert(account, indexes.into());
    }

    /// Number of accounts recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freezes the builder into an immutable registry.
    #[must_use]
    pub fn freeze(self) -> OracleRegistry {
        OracleRegistry {
            entries: self.entries,
        }
    }
}

/// Frozen mapping from oracle account to its assigned index set.
///
/// Held in memory only and lost on restart; the accounts re-register on
/// the next bootstrap.
#[derive(Debug)]
pub struct OracleRegistry {
    entries: HashMap<Address, Vec<u8>>,
}

impl OracleRegistry {
    /// Number of registered oracles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if no oracle registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index set assigned to an account, when it registered.
    #[must_use]
    pub fn indexes(&self, account: &Address) -> Option<&[u8]> {
        self.entries.get(account).map(Vec::as_slice)
    }

    /// Accounts whose index set contains the given index, in address
    /// order.
    #[must_use]
    pub fn matching(&self, index: u8) -> Vec<Address> {
        let mut matches: Vec<Address> = self
            .entries
            .iter()
            .filter(|(_, indexes)| indexes.contains(&index))
            .map(|(account, _)| *account)
            .collect();
        matches.sort_unstable();
        matches
    }

    /// Iterates over every registration.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &[u8])> {
        self.entries
            .iter()
            .map(|(account, indexes)| (account, indexes.as_slice()))
    }
}
