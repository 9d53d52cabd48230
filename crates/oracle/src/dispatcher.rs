//! Request dispatch: match observed events against the registry and
//! submit status responses.

use crate::registry::OracleRegistry;
use crate::status::FlightStatus;
use futures::future::join_all;
use std::sync::Arc;
use surety_chain::{Log, LogSubscription};
use surety_contract::{AppEvent, SuretyApp};
use surety_primitives::Address;
use tracing::{info, warn};

/// Answers oracle requests from a frozen registry.
///
/// Each event is handled independently; overlapping events may submit
/// transactions concurrently, and per-account submission ordering remains
/// the chain node's guarantee.
pub struct Dispatcher {
    app: Arc<SuretyApp>,
    registry: Arc<OracleRegistry>,
}

impl Dispatcher {
    /// Creates a dispatcher over the application facade.
    #[must_use]
    pub fn new(app: Arc<SuretyApp>, registry: Arc<OracleRegistry>) -> Self {
        Self { app, registry }
    }

    /// Consumes the log stream until it ends.
    pub async fn run(&self, mut subscription: LogSubscription) {
        while let Some(log) = subscription.recv().await {
            self.handle_log(&log).await;
        }
        info!(target: "surety", "event stream ended, dispatcher stopping");
    }

    /// Handles one observed log. Logs the facade does not recognize are
    /// skipped; a recognized event with a payload that does not decode is
    /// logged and skipped.
    pub async fn handle_log(&self, log: &Log) {
        match SuretyApp::decode_event(log) {
            Ok(Some(event)) => self.handle_event(event).await,
            Ok(None) => {}
            Err(e) => warn!(target: "surety", "undecodable event payload: {e}"),
        }
    }

    async fn handle_event(&self, event: AppEvent) {
        match event {
            AppEvent::OracleRequest {
                index,
                airline,
                flight,
                timestamp,
            } => {
                info!(
                    target: "surety",
                    index, %airline, flight = %flight, timestamp,
                    "oracle request observed"
                );
                self.respond(index, airline, &flight, timestamp).await;
            }
            AppEvent::OracleReport {
                airline,
                flight,
                timestamp,
                status,
            } => {
                info!(
                    target: "surety",
                    %airline, flight = %flight, timestamp, status,
                    "oracle report accepted"
                );
            }
            AppEvent::FlightStatusInfo {
                airline,
                flight,
                timestamp,
                status,
            } => {
                info!(
                    target: "surety",
                    %airline, flight = %flight, timestamp, status,
                    "flight status settled"
                );
            }
        }
    }

    /// Submits one response per registered oracle whose index set contains
    /// the request index, each with a freshly drawn status. Returns the
    /// number of submissions attempted.
    ///
    /// Rejected submissions are logged without retry. Deduplication beyond
    /// one-response-per-oracle is the contract's concern, as is any quorum
    /// over multiple responses.
    pub async fn respond(
        &self,
        index: u8,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> usize {
        let responders = self.registry.matching(index);
        if responders.is_empty() {
            // No registered oracle holds the index; the request stays
            // unanswered.
            info!(target: "surety", index, "no registered oracle holds the requested index");
            return 0;
        }

        let submissions = responders.into_iter().map(|oracle| {
            let status = FlightStatus::random(&mut rand::thread_rng());
            async move {
                match self
                    .app
                    .submit_oracle_response(oracle, index, airline, flight, timestamp, status.code())
                    .await
                {
                    Ok(tx) => info!(
                        target: "surety",
                        %oracle, %status, tx = %tx,
                        "response submitted"
                    ),
                    Err(e) => warn!(
                        target: "surety",
                        %oracle, %status,
                        "response rejected: {e}"
                    ),
                }
            }
        });

        let attempts: Vec<_> = submissions.collect();
        let count = attempts.len();
        join_all(attempts).await;
        count
    }
}
