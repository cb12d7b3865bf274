mod engine;
mod preset;
mod service;

#[cfg(test)]
mod service_tests;

pub use engine::{
    TimerEngine, TimerMode, TimerPhase, TimerSnapshot, DEFAULT_FOCUS_SECS, DEFAULT_SHORT_BREAK_SECS,
};
pub use preset::TimerPreset;
pub use service::TimerService;
