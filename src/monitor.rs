//! Transaction status monitoring.
//!
//! Watched transactions are polled together: every tick sends one
//! `/transaction-types/status` request for all of them, compares each status
//! with the last one seen and fires the transaction's callback on change.
//! Transactions reaching `complete` or `failed` are dropped from the watch
//! list, and the poll task stops once nothing is left to watch.
//!
//! A tick's request is awaited before the next tick is scheduled, so polls
//! never overlap; ticks that would have fired meanwhile are skipped.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};
use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::client::{ClientInner, OstClient};
use crate::endpoints::TransactionTypesStatus;
use crate::error::{Error, Result, TransportError};
use crate::types::TransactionRecord;

pub type StatusCallback = Arc<dyn Fn(&TransactionRecord) + Send + Sync>;
pub type ErrorObserver = Arc<dyn Fn(&Error) + Send + Sync>;

struct WatchedTransaction {
    last_status: Option<String>,
    on_change: StatusCallback,
}

#[derive(Default)]
pub(crate) struct MonitorState {
    watched: HashMap<String, WatchedTransaction>,
    poller: Option<JoinHandle<()>>,
    /// Bumped whenever a poll task starts; older tasks exit on mismatch.
    generation: u64,
    on_error: Option<ErrorObserver>,
}

impl MonitorState {
    fn stop_poller(&mut self) {
        if let Some(handle) = self.poller.take() {
            handle.abort();
            tracing::info!("transaction monitor stopped");
        }
    }
}

impl Drop for MonitorState {
    fn drop(&mut self) {
        if let Some(handle) = self.poller.take() {
            handle.abort();
        }
    }
}

impl OstClient {
    /// Watch `transaction_uuid` and call `on_change` with the full record each
    /// time its status changes.
    ///
    /// Registering an id that is already watched replaces its callback and
    /// forgets its last known status. Must be called from within a tokio
    /// runtime, which hosts the shared poll task.
    pub fn monitor_transaction<F>(
        &self,
        transaction_uuid: impl Into<String>,
        on_change: F,
    ) -> Result<()>
    where
        F: Fn(&TransactionRecord) + Send + Sync + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let transaction_uuid = transaction_uuid.into();

        let mut state = self.inner.lock_monitor();
        state.watched.insert(
            transaction_uuid.clone(),
            WatchedTransaction {
                last_status: None,
                on_change: Arc::new(on_change),
            },
        );
        tracing::debug!(%transaction_uuid, "monitoring transaction");

        // A task that died is as good as none
        if state.poller.as_ref().is_none_or(JoinHandle::is_finished) {
            state.generation += 1;
            let generation = state.generation;
            let period = self.inner.config.poll_interval;
            let client = Arc::downgrade(&self.inner);
            state.poller = Some(runtime.spawn(run_poller(client, period, generation)));
            tracing::info!(interval = ?period, "transaction monitor started");
        }

        Ok(())
    }

    /// Stop watching `transaction_uuid`. Returns whether it was being watched.
    ///
    /// A status request already in flight is not cancelled; its result for
    /// this id is ignored.
    pub fn stop_monitoring_transaction(&self, transaction_uuid: &str) -> bool {
        let mut state = self.inner.lock_monitor();
        let removed = state.watched.remove(transaction_uuid).is_some();
        if state.watched.is_empty() {
            state.stop_poller();
        }
        removed
    }

    /// Ids currently watched, sorted.
    pub fn monitored_transactions(&self) -> Vec<String> {
        let state = self.inner.lock_monitor();
        let mut ids: Vec<String> = state.watched.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Install an observer for failed status polls. Failures are always
    /// logged; the observer additionally receives the error.
    pub fn on_monitor_error<F>(&self, observer: F)
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.inner.lock_monitor().on_error = Some(Arc::new(observer));
    }

    pub fn is_monitoring(&self) -> bool {
        self.inner
            .lock_monitor()
            .poller
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

async fn run_poller(client: Weak<ClientInner>, period: Duration, generation: u64) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let Some(client) = client.upgrade() else {
            break;
        };
        if !client.poll_transactions(generation).await {
            break;
        }
    }
}

impl ClientInner {
    /// One poll tick. Returns `false` once this task should exit.
    async fn poll_transactions(&self, generation: u64) -> bool {
        let transaction_uuids = {
            let state = self.lock_monitor();
            if state.generation != generation || state.watched.is_empty() {
                return false;
            }
            let mut ids: Vec<String> = state.watched.keys().cloned().collect();
            ids.sort();
            ids
        };

        tracing::debug!(count = transaction_uuids.len(), "polling transaction statuses");
        let result = self
            .execute(&TransactionTypesStatus { transaction_uuids })
            .await
            .and_then(transaction_entries);

        match result {
            Ok(entries) => {
                let mut records = Vec::with_capacity(entries.len());
                for entry in entries {
                    match serde_json::from_value::<TransactionRecord>(entry) {
                        Ok(record) => records.push(record),
                        Err(err) => {
                            tracing::warn!(error = %err, "skipping undecodable transaction record");
                            self.report_error(&Error::from(TransportError::Decode(err)));
                        }
                    }
                }
                self.apply_statuses(records);
            }
            Err(err) => {
                tracing::warn!(error = %err, "transaction status poll failed");
                self.report_error(&err);
            }
        }

        true
    }

    fn report_error(&self, err: &Error) {
        let observer = self.lock_monitor().on_error.clone();
        if let Some(observer) = observer {
            if catch_unwind(AssertUnwindSafe(|| observer(err))).is_err() {
                tracing::warn!("monitor error observer panicked");
            }
        }
    }

    fn apply_statuses(&self, records: Vec<TransactionRecord>) {
        let mut notifications = Vec::new();
        {
            let mut state = self.lock_monitor();
            for record in records {
                let Some(entry) = state.watched.get_mut(&record.transaction_uuid) else {
                    continue;
                };
                if entry.last_status.as_deref() == Some(record.status.as_str()) {
                    continue;
                }

                tracing::debug!(
                    transaction_uuid = %record.transaction_uuid,
                    status = %record.status,
                    "transaction status changed"
                );
                entry.last_status = Some(record.status.clone());
                let on_change = entry.on_change.clone();

                if record.state().is_terminal() {
                    state.watched.remove(&record.transaction_uuid);
                }
                notifications.push((on_change, record));
            }

            if state.watched.is_empty() {
                state.stop_poller();
            }
        }

        // Callbacks run without the lock so they may call back into the monitor.
        for (on_change, record) in notifications {
            if catch_unwind(AssertUnwindSafe(|| on_change(&record))).is_err() {
                tracing::warn!(
                    transaction_uuid = %record.transaction_uuid,
                    "transaction callback panicked"
                );
            }
        }
    }
}

/// Status payloads list transactions under `transactions`; a bare array is
/// accepted as well. Entries are returned undecoded so one malformed record
/// cannot sink the rest of the batch.
fn transaction_entries(data: Value) -> Result<Vec<Value>> {
    let list = match data {
        Value::Object(mut map) => map.remove("transactions").unwrap_or(Value::Null),
        other => other,
    };

    match list {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(TransportError::Other(format!(
            "unexpected transaction status payload: {}",
            other
        ))
        .into()),
    }
}
