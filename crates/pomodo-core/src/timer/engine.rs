//! Timer engine implementation.
//!
//! The timer engine is a pure state machine. It does not use internal
//! threads - the caller is responsible for calling `tick()` once per
//! second while the timer is running (the service layer owns that loop).
//!
//! ## State Transitions
//!
//! ```text
//! phase: Stopped -> Running <-> Paused -> Stopped
//! mode:  Focus <-> ShortBreak (on natural expiry only)
//! ```
//!
//! Interval expiry is a single atomic transition: `tick()` swaps the mode,
//! reloads the remaining time and keeps the phase Running, so the countdown
//! continues into the next interval without an observable stop.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::preset::TimerPreset;
use crate::events::Event;

/// Default focus duration when no preset or manual value applies.
pub const DEFAULT_FOCUS_SECS: u64 = 25 * 60;
/// Default short break duration.
pub const DEFAULT_SHORT_BREAK_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Focus,
    ShortBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Stopped,
    Running,
    Paused,
}

/// Serializable view of the full engine state, published to the
/// presentation boundary on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub phase: TimerPhase,
    pub remaining_secs: u64,
    pub focus_duration_secs: u64,
    pub short_break_duration_secs: u64,
    pub cycles_completed: u32,
    pub selected_preset: Option<TimerPreset>,
    pub notifications_enabled: bool,
}

/// Core timer state machine.
///
/// Commands mutate state and return an [`Event`] when a transition
/// happened. Preset selection and manual duration adjustment are mutually
/// exclusive provenance: adjusting a duration always clears the selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    mode: TimerMode,
    phase: TimerPhase,
    remaining_secs: u64,
    focus_secs: u64,
    short_break_secs: u64,
    cycles_completed: u32,
    selected_preset: Option<TimerPreset>,
    notifications_enabled: bool,
}

impl TimerEngine {
    /// Create an engine with the hard-coded 25/5 minute defaults.
    pub fn new() -> Self {
        Self::with_durations(DEFAULT_FOCUS_SECS, DEFAULT_SHORT_BREAK_SECS)
    }

    /// Create an engine with explicit initial durations (seconds).
    pub fn with_durations(focus_secs: u64, short_break_secs: u64) -> Self {
        Self {
            mode: TimerMode::Focus,
            phase: TimerPhase::Stopped,
            remaining_secs: focus_secs,
            focus_secs,
            short_break_secs,
            cycles_completed: 0,
            selected_preset: None,
            notifications_enabled: true,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    pub fn selected_preset(&self) -> Option<&TimerPreset> {
        self.selected_preset.as_ref()
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    /// Configured duration for the given mode, in seconds.
    pub fn duration_for(&self, mode: TimerMode) -> u64 {
        match mode {
            TimerMode::Focus => self.focus_secs,
            TimerMode::ShortBreak => self.short_break_secs,
        }
    }

    /// Build a full state snapshot.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            focus_duration_secs: self.focus_secs,
            short_break_duration_secs: self.short_break_secs,
            cycles_completed: self.cycles_completed,
            selected_preset: self.selected_preset.clone(),
            notifications_enabled: self.notifications_enabled,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.phase {
            TimerPhase::Running => None, // Already running.
            TimerPhase::Stopped | TimerPhase::Paused => {
                self.phase = TimerPhase::Running;
                Some(Event::TimerStarted {
                    mode: self.mode,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        self.phase = TimerPhase::Paused;
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop the countdown and return to a fresh focus interval.
    ///
    /// Remaining time comes from the selected preset when one is set,
    /// otherwise from the manually configured focus duration. Cycle count
    /// is cleared; it only ever grows through natural expiry.
    pub fn reset(&mut self) -> Event {
        self.phase = TimerPhase::Stopped;
        self.mode = TimerMode::Focus;
        self.cycles_completed = 0;
        self.remaining_secs = self
            .selected_preset
            .as_ref()
            .map(TimerPreset::focus_secs)
            .unwrap_or(self.focus_secs);
        Event::TimerReset { at: Utc::now() }
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Some(Event::IntervalCompleted)` when the interval expires.
    /// The expiry transition is atomic: mode flips, remaining time reloads
    /// for the new mode, and the phase stays Running so the countdown
    /// continues uninterrupted. `cycles_completed` increments only when a
    /// short break runs out, completing a full cycle.
    pub fn tick(&mut self) -> Option<Event> {
        if self.phase != TimerPhase::Running || self.remaining_secs == 0 {
            return None;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs > 0 {
            return None;
        }
        let ended = self.mode;
        match ended {
            TimerMode::Focus => {
                self.mode = TimerMode::ShortBreak;
                self.remaining_secs = self.short_break_secs;
            }
            TimerMode::ShortBreak => {
                self.mode = TimerMode::Focus;
                self.remaining_secs = self.focus_secs;
                self.cycles_completed += 1;
            }
        }
        Some(Event::IntervalCompleted {
            ended,
            next: self.mode,
            cycles_completed: self.cycles_completed,
            at: Utc::now(),
        })
    }

    /// Select a named preset and derive both durations from it.
    ///
    /// The remaining time is re-derived from whichever duration matches the
    /// current mode, in every phase.
    pub fn select_preset(&mut self, preset: TimerPreset) {
        self.focus_secs = preset.focus_secs();
        self.short_break_secs = preset.short_break_secs();
        self.selected_preset = Some(preset);
        self.remaining_secs = self.duration_for(self.mode);
    }

    /// Manually set the focus duration. Clears any selected preset.
    pub fn adjust_focus(&mut self, minutes: u32) {
        self.focus_secs = u64::from(minutes) * 60;
        if self.mode == TimerMode::Focus && self.phase == TimerPhase::Stopped {
            self.remaining_secs = self.focus_secs;
        }
        self.selected_preset = None;
    }

    /// Manually set the short break duration. Clears any selected preset.
    pub fn adjust_short_break(&mut self, minutes: u32) {
        self.short_break_secs = u64::from(minutes) * 60;
        if self.mode == TimerMode::ShortBreak && self.phase == TimerPhase::Stopped {
            self.remaining_secs = self.short_break_secs;
        }
        self.selected_preset = None;
    }

    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        self.notifications_enabled = enabled;
    }

    /// Reconcile with an emission of the synced preset collection.
    ///
    /// An existing selection is never overridden. With no selection, the
    /// first preset in store order is auto-selected; an empty collection
    /// restores the hard-coded default durations.
    pub fn apply_presets(&mut self, presets: &[TimerPreset]) {
        if self.selected_preset.is_none() {
            if let Some(first) = presets.first() {
                self.select_preset(first.clone());
                return;
            }
        }
        if presets.is_empty() {
            self.restore_defaults();
        }
    }

    fn restore_defaults(&mut self) {
        self.focus_secs = DEFAULT_FOCUS_SECS;
        self.short_break_secs = DEFAULT_SHORT_BREAK_SECS;
        if self.phase == TimerPhase::Stopped && self.mode == TimerMode::Focus {
            self.remaining_secs = self.focus_secs;
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}
