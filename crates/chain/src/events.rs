//! Polling log subscription.
//!
//! The relay consumes chain events as a push-style stream. This module
//! bridges the node's pull-style `eth_getLogs` into a channel: a background
//! task keeps a block cursor, queries new logs each tick, and forwards them
//! to the receiver. The subscription runs until the receiver is dropped or
//! the task is aborted.

use crate::client::Chain;
use crate::types::{Log, LogFilter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default pause between log queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

const CHANNEL_CAPACITY: usize = 256;

/// Builder for a background log subscription.
pub struct LogPoller {
    chain: Arc<dyn Chain>,
    filter: LogFilter,
    interval: Duration,
}

impl LogPoller {
    /// Creates a poller for the given filter.
    #[must_use]
    pub fn new(chain: Arc<dyn Chain>, filter: LogFilter) -> Self {
        Self {
            chain,
            filter,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides the poll interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawns the polling task and returns the receiving half.
    #[must_use]
    pub fn spawn(self) -> LogSubscription {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let Self {
            chain,
            filter,
            interval,
        } = self;

        let handle = tokio::spawn(async move {
            let mut cursor = filter.from_block;
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let mut window = filter.clone();
                window.from_block = cursor;

                let logs = match chain.logs(&window).await {
                    Ok(logs) => logs,
                    Err(e) => {
                        // Transient query failures must not kill the
                        // subscription; the next tick retries the window.
                        warn!(target: "surety", "log query failed: {e}");
                        continue;
                    }
                };

                for log in logs {
                    if let Ok(Some(block)) = log.block() {
                        cursor = cursor.max(block.saturating_add(1));
                    }
                    if sender.send(log).await.is_err() {
                        debug!(target: "surety", "log subscriber dropped, stopping poller");
                        return;
                    }
                }
            }
        });

        LogSubscription { receiver, handle }
    }
}

/// Receiving half of a log subscription.
pub struct LogSubscription {
    receiver: mpsc::Receiver<Log>,
    handle: JoinHandle<()>,
}

impl LogSubscription {
    /// Waits for the next log. Returns `None` once the polling task has
    /// stopped.
    pub async fn recv(&mut self) -> Option<Log> {
        self.receiver.recv().await
    }
}

impl Drop for LogSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChainResult;
    use crate::types::{CallRequest, TransactionRequest, TxHash};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use surety_primitives::Address;

    /// Chain stub that serves scripted log batches, one per query.
    struct ScriptedChain {
        batches: Mutex<VecDeque<Vec<Log>>>,
        windows: Mutex<Vec<u64>>,
    }

    impl ScriptedChain {
        fn new(batches: Vec<Vec<Log>>) -> Self {
            Self {
                batches: Mutex::new(batches.into()),
                windows: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Chain for ScriptedChain {
        async fn accounts(&self) -> ChainResult<Vec<Address>> {
            Ok(vec![])
        }

        async fn call(&self, _request: CallRequest) -> ChainResult<Vec<u8>> {
            Ok(vec![])
        }

        async fn send_transaction(&self, _request: TransactionRequest) -> ChainResult<TxHash> {
            Ok(String::new())
        }

        async fn block_number(&self) -> ChainResult<u64> {
            Ok(0)
        }

        async fn logs(&self, filter: &LogFilter) -> ChainResult<Vec<Log>> {
            self.windows.lock().unwrap().push(filter.from_block);
            Ok(self.batches.lock().unwrap().pop_front().unwrap_or_default())
        }
    }

    fn log_at(block: u64) -> Log {
        Log {
            address: Address::zero(),
            topics: vec!["0xaa".to_string()],
            data: "0x".to_string(),
            block_number: Some(format!("0x{block:x}")),
        }
    }

    #[tokio::test]
    async fn forwards_logs_and_advances_cursor() {
        let chain = Arc::new(ScriptedChain::new(vec![
            vec![log_at(5)],
            vec![log_at(9)],
        ]));
        let filter = LogFilter {
            address: Address::zero(),
            topics: vec![],
            from_block: 0,
        };

        let mut subscription = LogPoller::new(chain.clone(), filter)
            .with_interval(Duration::from_millis(1))
            .spawn();

        let first = subscription.recv().await.unwrap();
        assert_eq!(first.block().unwrap(), Some(5));
        let second = subscription.recv().await.unwrap();
        assert_eq!(second.block().unwrap(), Some(9));
        drop(subscription);

        let windows = chain.windows.lock().unwrap();
        // First query starts at the filter origin; the one that followed
        // the first delivery starts past block 5.
        assert_eq!(windows[0], 0);
        assert_eq!(windows[1], 6);
    }

    #[tokio::test]
    async fn empty_batches_keep_polling() {
        let chain = Arc::new(ScriptedChain::new(vec![vec![], vec![], vec![log_at(2)]]));
        let filter = LogFilter {
            address: Address::zero(),
            topics: vec![],
            from_block: 1,
        };

        let mut subscription = LogPoller::new(chain, filter)
            .with_interval(Duration::from_millis(1))
            .spawn();

        let log = subscription.recv().await.unwrap();
        assert_eq!(log.block().unwrap(), Some(2));
    }
}
