//! Relay bootstrap: authorization, fee lookup, oracle registration.

use crate::error::{OracleError, OracleResult};
use crate::registry::{OracleRegistry, RegistryBuilder};
use futures::future::join_all;
use std::sync::Arc;
use surety_chain::Chain;
use surety_config::{ORACLE_FIRST_ACCOUNT, ORACLE_POOL_SIZE};
use surety_contract::{SuretyApp, SuretyData};
use surety_primitives::{Address, Wei};
use tracing::{info, warn};

/// Result of a completed bootstrap.
pub struct BootstrapOutcome {
    /// Owner / administrator account, account 0 of the node list.
    pub owner: Address,
    /// Frozen oracle registry.
    pub registry: OracleRegistry,
}

/// One-shot startup sequence for the relay.
///
/// Authorizes the application contract against storage, reads the
/// registration fee, then registers the oracle pool. Authorization and the
/// fee lookup are awaited in order before any registration is submitted;
/// the pool itself registers concurrently with no ordering among the
/// accounts, and the registry freezes only after every attempt has
/// settled.
pub struct Bootstrap {
    chain: Arc<dyn Chain>,
    app: Arc<SuretyApp>,
    data: Arc<SuretyData>,
}

impl Bootstrap {
    /// Creates a bootstrap over the deployed contract facades.
    #[must_use]
    pub fn new(chain: Arc<dyn Chain>, app: Arc<SuretyApp>, data: Arc<SuretyData>) -> Self {
        Self { chain, app, data }
    }

    /// Runs the sequence and returns the frozen registry.
    ///
    /// A rejected authorization, fee lookup, or individual registration is
    /// logged and skipped, never retried; the affected account simply
    /// stays out of the registry.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::Chain` when the account list cannot be
    /// fetched and `OracleError::NoAccounts` when the node manages none;
    /// without accounts there is no owner and nothing to register.
    pub async fn run(&self) -> OracleResult<BootstrapOutcome> {
        let accounts = self.chain.accounts().await?;
        let Some(owner) = accounts.first().copied() else {
            return Err(OracleError::NoAccounts);
        };

        // Authorization state is unknown after a failure; the sequence
        // continues regardless and later registrations surface their own
        // rejections.
        match self.data.authorize_caller(owner, self.app.address()).await {
            Ok(tx) => {
                info!(target: "surety", %owner, tx = %tx, "application contract authorized")
            }
            Err(e) => warn!(target: "surety", "authorization failed, continuing: {e}"),
        }

        let fee = match self.app.registration_fee().await {
            Ok(fee) => fee,
            Err(e) => {
                warn!(target: "surety", "registration fee lookup failed, using zero: {e}");
                Wei::zero()
            }
        };
        info!(target: "surety", %fee, "registering oracle pool");

        let pool: Vec<Address> = accounts
            .into_iter()
            .skip(ORACLE_FIRST_ACCOUNT)
            .take(ORACLE_POOL_SIZE)
            .collect();

        let tasks = pool.into_iter().map(|account| {
            let app = Arc::clone(&self.app);
            tokio::spawn(async move { (account, register_one(&app, account, fee).await) })
        });

        let mut builder = RegistryBuilder::new();
        for joined in join_all(tasks).await {
            match joined {
                Ok((account, Some(indexes))) => builder.insert(account, indexes),
                Ok((_, None)) => {}
                Err(e) => warn!(target: "surety", "registration task panicked: {e}"),
            }
        }

        let registry = builder.freeze();
        info!(target: "surety", oracles = registry.len(), "oracle registry frozen");
        Ok(BootstrapOutcome { owner, registry })
    }
}

/// Registers one account and queries its assigned indexes. `None` means
/// the account stays out of the registry.
async fn register_one(app: &SuretyApp, account: Address, fee: Wei) -> Option<Vec<u8>> {
    if let Err(e) = app.register_oracle(account, fee).await {
        warn!(target: "surety", %account, "oracle registration rejected: {e}");
        return None;
    }

    match app.my_indexes(account).await {
        Ok(indexes) => {
            info!(target: "surety", %account, ?indexes, "oracle registered");
            Some(indexes.to_vec())
        }
        Err(e) => {
            warn!(target: "surety", %account, "index query failed: {e}");
            None
        }
    }
}
