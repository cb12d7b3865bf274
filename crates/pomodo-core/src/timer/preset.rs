use serde::{Deserialize, Serialize};

/// A named, persisted pair of focus/break durations.
///
/// The wire body stored in the document collection carries only `name`,
/// `focusMinutes` and `shortBreakMinutes`; `id` is the store-assigned
/// document id, attached after decode and never serialized into the body.
/// A preset has no id until the store acknowledges it through the live
/// subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerPreset {
    #[serde(skip)]
    pub id: Option<String>,
    pub name: String,
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
}

impl TimerPreset {
    pub fn new(name: impl Into<String>, focus_minutes: u32, short_break_minutes: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            focus_minutes,
            short_break_minutes,
        }
    }

    /// Focus duration in seconds.
    pub fn focus_secs(&self) -> u64 {
        u64::from(self.focus_minutes) * 60
    }

    /// Short break duration in seconds.
    pub fn short_break_secs(&self) -> u64 {
        u64::from(self.short_break_minutes) * 60
    }
}
