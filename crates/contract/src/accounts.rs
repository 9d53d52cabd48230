//! Display-account derivation for the dapp client.

use surety_config::{AIRLINE_ACCOUNT_COUNT, PASSENGER_ACCOUNT_COUNT};
use surety_primitives::Address;

/// Accounts the client presents in its pickers.
///
/// Derived once from the node's account list by slicing at fixed offsets:
/// account 0 is the owner, the next block are airlines, the block after
/// that are passengers. A presentation convenience, not a protocol rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DappAccounts {
    /// Contract owner / administrator account.
    pub owner: Address,
    /// Airline display accounts.
    pub airlines: Vec<Address>,
    /// Passenger display accounts.
    pub passengers: Vec<Address>,
}

impl DappAccounts {
    /// Slices the node account list into display groups.
    ///
    /// A short account list yields short groups; the client renders
    /// whatever is available.
    #[must_use]
    pub fn derive(accounts: &[Address]) -> Option<Self> {
        let (owner, rest) = accounts.split_first()?;
        let airlines: Vec<Address> = rest.iter().copied().take(AIRLINE_ACCOUNT_COUNT).collect();
        let passengers: Vec<Address> = rest
            .iter()
            .copied()
            .skip(AIRLINE_ACCOUNT_COUNT)
            .take(PASSENGER_ACCOUNT_COUNT)
            .collect();

        Some(Self {
            owner: *owner,
            airlines,
            passengers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8) -> Address {
        Address::from_bytes(&[byte; 20]).unwrap()
    }

    #[test]
    fn slices_at_fixed_offsets() {
        let accounts: Vec<Address> = (0u8..30).map(account).collect();
        let derived = DappAccounts::derive(&accounts).unwrap();

        assert_eq!(derived.owner, account(0));
        assert_eq!(derived.airlines.len(), 13);
        assert_eq!(derived.airlines[0], account(1));
        assert_eq!(derived.airlines[12], account(13));
        assert_eq!(derived.passengers.len(), 5);
        assert_eq!(derived.passengers[0], account(14));
        assert_eq!(derived.passengers[4], account(18));
    }

    #[test]
    fn short_account_list_yields_short_groups() {
        let accounts: Vec<Address> = (0u8..4).map(account).collect();
        let derived = DappAccounts::derive(&accounts).unwrap();
        assert_eq!(derived.airlines.len(), 3);
        assert!(derived.passengers.is_empty());
    }

    #[test]
    fn empty_account_list_yields_none() {
        assert!(DappAccounts::derive(&[]).is_none());
    }
}
