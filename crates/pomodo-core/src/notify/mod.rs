//! Deferred local alerts for interval transitions.
//!
//! The scheduler registers one-shot alerts as abortable tasks keyed by a
//! small integer id; re-scheduling an id replaces the prior registration,
//! so at most one alert per id is ever pending. Delivery goes through the
//! platform [`AlertSink`]; a refusal is logged and swallowed - the timer
//! keeps going without the alert.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::error::NotifyError;

pub type AlertId = u32;

/// Fired when a short break runs out and focus resumes.
pub const BREAK_ENDED_ALERT: AlertId = 1001;
/// Fired when a focus interval runs out and the break starts.
pub const FOCUS_ENDED_ALERT: AlertId = 1002;

/// A one-shot alert ready for platform delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: AlertId,
    pub title: String,
    pub message: String,
}

/// Platform notification collaborator. Delivery mechanics are outside the
/// core's control; the sink may refuse (exact-alarm permission revoked),
/// which the scheduler treats as recoverable.
pub trait AlertSink: Send + Sync + 'static {
    fn post(&self, alert: Alert) -> Result<(), NotifyError>;
}

pub struct NotificationScheduler<A> {
    sink: Arc<A>,
    pending: Mutex<HashMap<AlertId, JoinHandle<()>>>,
}

impl<A: AlertSink> NotificationScheduler<A> {
    pub fn new(sink: A) -> Self {
        Self {
            sink: Arc::new(sink),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Register a one-shot alert after `delay`, replacing any pending
    /// alert with the same id.
    pub fn schedule(&self, delay: Duration, title: &str, message: &str, id: AlertId) {
        let alert = Alert {
            id,
            title: title.to_string(),
            message: message.to_string(),
        };
        let sink = Arc::clone(&self.sink);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = sink.post(alert) {
                tracing::warn!(alert_id = id, error = %err, "alert dropped");
            }
        });
        let mut pending = self.lock_pending();
        if let Some(prev) = pending.insert(id, handle) {
            prev.abort();
        }
    }

    /// Cancel a pending alert. Cancelling an id with nothing pending is a
    /// no-op.
    pub fn cancel(&self, id: AlertId) {
        if let Some(handle) = self.lock_pending().remove(&id) {
            handle.abort();
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, HashMap<AlertId, JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<A> Drop for NotificationScheduler<A> {
    fn drop(&mut self) {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for handle in pending.values() {
            handle.abort();
        }
    }
}
