//! Tests for the async timer service: countdown timing, notification
//! wiring and preset stream coordination, all on tokio's paused clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;

use crate::error::NotifyError;
use crate::notify::{Alert, AlertSink, BREAK_ENDED_ALERT, FOCUS_ENDED_ALERT};
use crate::store::{DocumentStore, MemoryStore, PresetSyncStore, StaticIdentity};
use crate::timer::{TimerEngine, TimerMode, TimerPhase, TimerPreset, TimerService};

#[derive(Clone, Default)]
struct RecordingSink(Arc<Mutex<Vec<Alert>>>);

impl RecordingSink {
    fn delivered(&self) -> Vec<Alert> {
        self.0.lock().unwrap().clone()
    }
}

impl AlertSink for RecordingSink {
    fn post(&self, alert: Alert) -> Result<(), NotifyError> {
        self.0.lock().unwrap().push(alert);
        Ok(())
    }
}

type Service = TimerService<MemoryStore, StaticIdentity, RecordingSink>;

fn sync_store(
    backend: &Arc<MemoryStore>,
    identity: StaticIdentity,
) -> PresetSyncStore<MemoryStore, StaticIdentity> {
    PresetSyncStore::new(Arc::clone(backend), Arc::new(identity))
}

fn service() -> (Service, RecordingSink, Arc<MemoryStore>) {
    let backend = Arc::new(MemoryStore::new());
    let sink = RecordingSink::default();
    let service = TimerService::spawn(
        TimerEngine::new(),
        sync_store(&backend, StaticIdentity::authenticated("u1")),
        sink.clone(),
    );
    (service, sink, backend)
}

/// Let spawned tasks drain and the paused clock advance.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

/// A settled service with minute-scale manual durations, ready to run.
async fn adjusted_service(focus_min: u32, break_min: u32) -> (Service, RecordingSink) {
    let (service, sink, _backend) = service();
    settle().await;
    service.adjust_focus(focus_min);
    service.adjust_short_break(break_min);
    (service, sink)
}

#[tokio::test(start_paused = true)]
async fn countdown_decrements_once_per_second() {
    let (service, _sink) = adjusted_service(1, 1).await;
    service.start();

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(service.snapshot().remaining_secs, 57);
    assert_eq!(service.snapshot().phase, TimerPhase::Running);
}

#[tokio::test(start_paused = true)]
async fn double_start_does_not_double_the_tick_rate() {
    let (service, _sink) = adjusted_service(1, 1).await;
    service.start();
    service.start();

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(service.snapshot().remaining_secs, 58);
}

#[tokio::test(start_paused = true)]
async fn expiry_advances_mode_and_schedules_one_alert() {
    let (service, sink) = adjusted_service(1, 5).await;
    service.start();

    tokio::time::sleep(Duration::from_millis(60_500)).await;
    let snap = service.snapshot();
    assert_eq!(snap.mode, TimerMode::ShortBreak);
    assert_eq!(snap.phase, TimerPhase::Running);
    assert_eq!(snap.remaining_secs, 5 * 60);

    let delivered = sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].id, FOCUS_ENDED_ALERT);
}

#[tokio::test(start_paused = true)]
async fn no_alert_when_notifications_disabled() {
    let (service, sink) = adjusted_service(1, 5).await;
    service.set_notifications_enabled(false);
    service.start();

    tokio::time::sleep(Duration::from_millis(60_500)).await;
    assert_eq!(service.snapshot().mode, TimerMode::ShortBreak);
    assert!(sink.delivered().is_empty());
}

#[tokio::test(start_paused = true)]
async fn countdown_runs_through_break_back_into_focus() {
    let (service, sink) = adjusted_service(1, 1).await;
    service.start();

    tokio::time::sleep(Duration::from_millis(120_500)).await;
    let snap = service.snapshot();
    assert_eq!(snap.mode, TimerMode::Focus);
    assert_eq!(snap.cycles_completed, 1);
    assert_eq!(snap.phase, TimerPhase::Running);

    let ids: Vec<_> = sink.delivered().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![FOCUS_ENDED_ALERT, BREAK_ENDED_ALERT]);
}

#[tokio::test(start_paused = true)]
async fn pause_stops_the_countdown_for_good() {
    let (service, _sink) = adjusted_service(1, 1).await;
    service.start();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    service.pause();
    let paused_at = service.snapshot().remaining_secs;
    assert_eq!(paused_at, 59);
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(service.snapshot().remaining_secs, paused_at);
    assert_eq!(service.snapshot().phase, TimerPhase::Paused);
}

#[tokio::test(start_paused = true)]
async fn pause_while_stopped_changes_nothing() {
    let (service, _sink, _backend) = service();
    settle().await;
    let before = service.snapshot();
    assert!(service.pause().is_none());
    assert_eq!(service.snapshot(), before);
}

#[tokio::test(start_paused = true)]
async fn reset_returns_to_stopped_focus() {
    let (service, _sink) = adjusted_service(1, 1).await;
    service.start();
    tokio::time::sleep(Duration::from_millis(2500)).await;

    service.reset();
    let snap = service.snapshot();
    assert_eq!(snap.phase, TimerPhase::Stopped);
    assert_eq!(snap.mode, TimerMode::Focus);
    assert_eq!(snap.remaining_secs, 60);
    assert_eq!(snap.cycles_completed, 0);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(service.snapshot().remaining_secs, 60);
}

#[tokio::test(start_paused = true)]
async fn first_emission_auto_selects_first_preset() {
    let backend = Arc::new(MemoryStore::new());
    let store = sync_store(&backend, StaticIdentity::authenticated("u1"));
    store.create(&TimerPreset::new("Deep Work", 50, 10)).await.unwrap();
    store.create(&TimerPreset::new("Sprints", 15, 3)).await.unwrap();

    let service = TimerService::spawn(TimerEngine::new(), store, RecordingSink::default());
    settle().await;

    let snap = service.snapshot();
    assert_eq!(snap.selected_preset.as_ref().unwrap().name, "Deep Work");
    assert_eq!(snap.remaining_secs, 50 * 60);
    assert_eq!(service.presets().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn manual_adjustment_beats_stale_preset_on_reset() {
    let (service, _sink, backend) = service();
    let store = sync_store(&backend, StaticIdentity::authenticated("u1"));
    store.create(&TimerPreset::new("P", 50, 10)).await.unwrap();
    settle().await;
    assert!(service.snapshot().selected_preset.is_some());

    service.adjust_focus(40);
    assert!(service.snapshot().selected_preset.is_none());
    service.reset();
    assert_eq!(service.snapshot().remaining_secs, 40 * 60);
}

#[tokio::test(start_paused = true)]
async fn select_preset_by_id_from_the_live_collection() {
    let (service, _sink, _backend) = service();
    service.create_preset(&TimerPreset::new("A", 30, 6)).await.unwrap();
    service.create_preset(&TimerPreset::new("B", 45, 9)).await.unwrap();
    settle().await;

    let b_id = service
        .presets()
        .iter()
        .find(|p| p.name == "B")
        .and_then(|p| p.id.clone())
        .unwrap();
    service.select_preset(&b_id);
    let snap = service.snapshot();
    assert_eq!(snap.selected_preset.unwrap().name, "B");
    assert_eq!(snap.remaining_secs, 45 * 60);
}

#[tokio::test(start_paused = true)]
async fn selecting_an_unknown_id_is_ignored() {
    let (service, _sink, _backend) = service();
    settle().await;
    let before = service.snapshot();
    service.select_preset("deleted-elsewhere");
    assert_eq!(service.snapshot(), before);
}

#[tokio::test(start_paused = true)]
async fn deleting_selected_preset_leaves_it_stale() {
    let (service, _sink, _backend) = service();
    service.create_preset(&TimerPreset::new("Chosen", 50, 10)).await.unwrap();
    service.create_preset(&TimerPreset::new("Other", 30, 6)).await.unwrap();
    settle().await;
    let chosen_id = service
        .presets()
        .iter()
        .find(|p| p.name == "Chosen")
        .and_then(|p| p.id.clone())
        .unwrap();

    service.delete_preset(&chosen_id).await.unwrap();
    settle().await;

    // Current behavior: the engine keeps the stale selection and its
    // durations until the user acts again.
    let snap = service.snapshot();
    assert_eq!(service.presets().len(), 1);
    assert_eq!(snap.selected_preset.unwrap().name, "Chosen");
    assert_eq!(snap.focus_duration_secs, 50 * 60);
}

#[tokio::test(start_paused = true)]
async fn unauthenticated_service_falls_back_to_defaults() {
    let backend = Arc::new(MemoryStore::new());
    let service = TimerService::spawn(
        TimerEngine::with_durations(600, 120),
        sync_store(&backend, StaticIdentity::anonymous()),
        RecordingSink::default(),
    );
    settle().await;

    // The single empty emission restores the hard-coded defaults.
    let snap = service.snapshot();
    assert!(snap.selected_preset.is_none());
    assert_eq!(snap.focus_duration_secs, 1500);
    assert_eq!(snap.remaining_secs, 1500);
    assert!(service.presets().is_empty());
}

#[tokio::test(start_paused = true)]
async fn malformed_remote_record_does_not_block_valid_ones() {
    let backend = Arc::new(MemoryStore::new());
    let mut bad = serde_json::Map::new();
    bad.insert("name".into(), json!("bad"));
    bad.insert("focusMinutes".into(), json!("not-a-number"));
    bad.insert("shortBreakMinutes".into(), json!(5));
    backend.add("u1", bad).await.unwrap();

    let store = sync_store(&backend, StaticIdentity::authenticated("u1"));
    store.create(&TimerPreset::new("Good", 30, 6)).await.unwrap();

    let service = TimerService::spawn(TimerEngine::new(), store, RecordingSink::default());
    settle().await;

    let presets = service.presets();
    assert_eq!(presets.len(), 1);
    assert_eq!(presets[0].name, "Good");
    assert_eq!(service.snapshot().selected_preset.unwrap().name, "Good");
}

#[tokio::test(start_paused = true)]
async fn close_cancels_countdown_and_alerts() {
    let (service, sink) = adjusted_service(1, 1).await;
    service.start();
    tokio::time::sleep(Duration::from_millis(1200)).await;

    service.close();
    tokio::time::sleep(Duration::from_secs(120)).await;

    // One tick happened before close; the expiry never did.
    assert_eq!(service.snapshot().remaining_secs, 59);
    assert!(sink.delivered().is_empty());
}
