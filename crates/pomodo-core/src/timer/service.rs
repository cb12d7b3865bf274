//! Async driver for the timer engine.
//!
//! The engine itself is a pure state machine; this service owns the
//! pieces around it: the one-second countdown task, the live preset
//! subscription, the notification scheduler, and the watch channels the
//! presentation layer observes. Every mutation is serialized through one
//! mutex, which is never held across an await.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::engine::{TimerEngine, TimerPhase, TimerSnapshot};
use super::preset::TimerPreset;
use crate::error::StoreError;
use crate::events::Event;
use crate::notify::{AlertSink, NotificationScheduler, BREAK_ENDED_ALERT, FOCUS_ENDED_ALERT};
use crate::store::{DocumentStore, IdentityProvider, PresetSyncStore};
use crate::timer::TimerMode;

const FOCUS_ENDED_TITLE: &str = "Focus time is up!";
const FOCUS_ENDED_MESSAGE: &str = "Your focus session has ended. Time for a short break!";
const BREAK_ENDED_TITLE: &str = "Break is over!";
const BREAK_ENDED_MESSAGE: &str = "Your break has ended. Time to get back to focus!";

struct ServiceInner<A> {
    engine: Mutex<TimerEngine>,
    snapshot_tx: watch::Sender<TimerSnapshot>,
    presets_tx: watch::Sender<Vec<TimerPreset>>,
    scheduler: NotificationScheduler<A>,
    countdown: Mutex<Option<JoinHandle<()>>>,
}

impl<A: AlertSink> ServiceInner<A> {
    fn lock_engine(&self) -> MutexGuard<'_, TimerEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, engine: &TimerEngine) {
        self.snapshot_tx.send_replace(engine.snapshot());
    }

    fn cancel_alerts(&self) {
        self.scheduler.cancel(FOCUS_ENDED_ALERT);
        self.scheduler.cancel(BREAK_ENDED_ALERT);
    }

    /// Announce an expired interval, immediately.
    fn announce(&self, ended: TimerMode) {
        match ended {
            TimerMode::Focus => self.scheduler.schedule(
                Duration::ZERO,
                FOCUS_ENDED_TITLE,
                FOCUS_ENDED_MESSAGE,
                FOCUS_ENDED_ALERT,
            ),
            TimerMode::ShortBreak => self.scheduler.schedule(
                Duration::ZERO,
                BREAK_ENDED_TITLE,
                BREAK_ENDED_MESSAGE,
                BREAK_ENDED_ALERT,
            ),
        }
    }
}

/// One timer per session: countdown, preset sync and notifications behind
/// a single serialization point. Tear down with [`close`](Self::close)
/// (also runs on drop).
pub struct TimerService<S, I, A> {
    inner: Arc<ServiceInner<A>>,
    store: PresetSyncStore<S, I>,
    subscription: Mutex<Option<JoinHandle<()>>>,
}

impl<S, I, A> TimerService<S, I, A>
where
    S: DocumentStore,
    I: IdentityProvider,
    A: AlertSink,
{
    /// Wire up the service and open the preset subscription. Must run
    /// inside a tokio runtime.
    pub fn spawn(engine: TimerEngine, store: PresetSyncStore<S, I>, sink: A) -> Self {
        let (snapshot_tx, _) = watch::channel(engine.snapshot());
        let (presets_tx, _) = watch::channel(Vec::new());
        let inner = Arc::new(ServiceInner {
            engine: Mutex::new(engine),
            snapshot_tx,
            presets_tx,
            scheduler: NotificationScheduler::new(sink),
            countdown: Mutex::new(None),
        });

        let mut subscription = store.subscribe();
        let sub_inner = Arc::clone(&inner);
        let sub_task = tokio::spawn(async move {
            while let Some(update) = subscription.next().await {
                match update {
                    Ok(presets) => {
                        {
                            let mut engine = sub_inner.lock_engine();
                            engine.apply_presets(&presets);
                            sub_inner.publish(&engine);
                        }
                        sub_inner.presets_tx.send_replace(presets);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "preset subscription failed; live updates stopped");
                        break;
                    }
                }
            }
        });

        Self {
            inner,
            store,
            subscription: Mutex::new(Some(sub_task)),
        }
    }

    // ── Timer commands ───────────────────────────────────────────────

    /// Begin (or resume) the countdown. No-op while already running; at
    /// most one countdown task exists at a time.
    pub fn start(&self) -> Option<Event> {
        let event = {
            let mut engine = self.inner.lock_engine();
            let event = engine.start()?;
            self.inner.publish(&engine);
            event
        };
        self.spawn_countdown();
        tracing::debug!("timer started");
        Some(event)
    }

    /// Pause the countdown and cancel pending interval alerts. No-op
    /// unless running.
    pub fn pause(&self) -> Option<Event> {
        self.abort_countdown();
        let mut engine = self.inner.lock_engine();
        let event = engine.pause()?;
        self.inner.cancel_alerts();
        self.inner.publish(&engine);
        tracing::debug!(remaining_secs = engine.remaining_secs(), "timer paused");
        Some(event)
    }

    /// Stop everything and return to a fresh focus interval.
    pub fn reset(&self) -> Event {
        self.abort_countdown();
        let mut engine = self.inner.lock_engine();
        let event = engine.reset();
        self.inner.cancel_alerts();
        self.inner.publish(&engine);
        tracing::debug!("timer reset");
        event
    }

    /// Select a synced preset by id. An id the collection no longer
    /// contains (deleted remotely in the meantime) is ignored.
    pub fn select_preset(&self, id: &str) {
        let selected = self
            .inner
            .presets_tx
            .borrow()
            .iter()
            .find(|p| p.id.as_deref() == Some(id))
            .cloned();
        match selected {
            Some(preset) => {
                let mut engine = self.inner.lock_engine();
                engine.select_preset(preset);
                self.inner.publish(&engine);
            }
            None => tracing::debug!(preset_id = id, "ignoring selection of unknown preset"),
        }
    }

    pub fn adjust_focus(&self, minutes: u32) {
        let mut engine = self.inner.lock_engine();
        engine.adjust_focus(minutes);
        self.inner.publish(&engine);
    }

    pub fn adjust_short_break(&self, minutes: u32) {
        let mut engine = self.inner.lock_engine();
        engine.adjust_short_break(minutes);
        self.inner.publish(&engine);
    }

    pub fn set_notifications_enabled(&self, enabled: bool) {
        let mut engine = self.inner.lock_engine();
        engine.set_notifications_enabled(enabled);
        self.inner.publish(&engine);
    }

    // ── Preset commands (store passthroughs) ─────────────────────────

    pub async fn create_preset(&self, preset: &TimerPreset) -> Result<(), StoreError> {
        self.store.create(preset).await
    }

    pub async fn update_preset(&self, preset: &TimerPreset) -> Result<(), StoreError> {
        self.store.update(preset).await
    }

    pub async fn delete_preset(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(id).await
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> TimerSnapshot {
        self.inner.snapshot_tx.borrow().clone()
    }

    pub fn watch_snapshot(&self) -> watch::Receiver<TimerSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    pub fn presets(&self) -> Vec<TimerPreset> {
        self.inner.presets_tx.borrow().clone()
    }

    pub fn watch_presets(&self) -> watch::Receiver<Vec<TimerPreset>> {
        self.inner.presets_tx.subscribe()
    }

    // ── Teardown ─────────────────────────────────────────────────────

    /// Cancel the countdown, release the preset subscription and cancel
    /// both pending interval alerts. Unconditional; safe to call twice.
    pub fn close(&self) {
        self.abort_countdown();
        if let Some(task) = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
        self.inner.cancel_alerts();
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Run the countdown: sleep a second, re-check that the timer is
    /// still running, advance the engine. The sleep is the task's only
    /// suspension point; the engine lock is never held across it.
    fn spawn_countdown(&self) {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                let completed = {
                    let mut engine = inner.lock_engine();
                    if engine.phase() != TimerPhase::Running {
                        break;
                    }
                    let event = engine.tick();
                    inner.publish(&engine);
                    match event {
                        Some(Event::IntervalCompleted { ended, next, cycles_completed, .. }) => {
                            Some((ended, next, cycles_completed, engine.notifications_enabled()))
                        }
                        _ => None,
                    }
                };
                if let Some((ended, next, cycles, notify)) = completed {
                    tracing::info!(?ended, ?next, cycles_completed = cycles, "interval completed");
                    if notify {
                        inner.announce(ended);
                    }
                }
            }
        });
        let mut slot = self
            .inner
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(prev) = slot.replace(handle) {
            prev.abort();
        }
    }

    fn abort_countdown(&self) {
        if let Some(handle) = self
            .inner
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

impl<S, I, A> Drop for TimerService<S, I, A> {
    fn drop(&mut self) {
        if let Some(handle) = self
            .inner
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
        if let Some(task) = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
        // Pending alerts die with the scheduler's own drop.
    }
}
