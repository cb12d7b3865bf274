use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use pomodo_core::{
    Alert, AlertSink, Config, LocalStore, NotifyError, StaticIdentity, TimerEngine, TimerMode,
    TimerService, TimerSnapshot,
};

type CliService = TimerService<LocalStore, StaticIdentity, ConsoleAlerts>;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the countdown in the foreground until interrupted
    Run {
        /// Focus duration in minutes (clears any preset selection)
        #[arg(long)]
        focus: Option<u32>,
        /// Short break duration in minutes (clears any preset selection)
        #[arg(long)]
        short_break: Option<u32>,
        /// Select a synced preset by name once the collection loads
        #[arg(long)]
        preset: Option<String>,
        /// Stop after this many completed cycles
        #[arg(long)]
        cycles: Option<u32>,
        /// Print one JSON snapshot per state change instead of a status line
        #[arg(long)]
        json: bool,
        /// Suppress terminal notifications
        #[arg(long)]
        silent: bool,
    },
}

/// Terminal stand-in for the platform notification service.
struct ConsoleAlerts {
    silent: bool,
}

impl AlertSink for ConsoleAlerts {
    fn post(&self, alert: Alert) -> Result<(), NotifyError> {
        if !self.silent {
            println!("\n{} {}", alert.title, alert.message);
        }
        Ok(())
    }
}

pub async fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            focus,
            short_break,
            preset,
            cycles,
            json,
            silent,
        } => run_timer(focus, short_break, preset, cycles, json, silent).await,
    }
}

async fn run_timer(
    focus: Option<u32>,
    short_break: Option<u32>,
    preset: Option<String>,
    cycles: Option<u32>,
    json: bool,
    silent: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let store = super::open_preset_store(&config)?;

    let engine = TimerEngine::with_durations(
        u64::from(config.timer.focus_minutes) * 60,
        u64::from(config.timer.short_break_minutes) * 60,
    );
    // In JSON mode the snapshot stream owns stdout.
    let sink = ConsoleAlerts { silent: silent || json };
    let service = TimerService::spawn(engine, store, sink);
    service.set_notifications_enabled(config.notifications.enabled);

    if let Some(name) = preset {
        select_by_name(&service, &name).await?;
    }
    if let Some(minutes) = focus {
        service.adjust_focus(minutes);
    }
    if let Some(minutes) = short_break {
        service.adjust_short_break(minutes);
    }

    service.start();
    let mut snapshots = service.watch_snapshot();
    print_status(&snapshots.borrow().clone(), json)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = snapshots.borrow().clone();
                print_status(&snap, json)?;
                if cycles.is_some_and(|target| snap.cycles_completed >= target) {
                    break;
                }
            }
        }
    }
    if !json {
        println!();
    }

    service.close();
    Ok(())
}

/// Wait briefly for the first collection emission, then select by name.
async fn select_by_name(service: &CliService, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut presets = service.watch_presets();
    let _ = tokio::time::timeout(Duration::from_secs(2), presets.changed()).await;
    let id = presets
        .borrow()
        .iter()
        .find(|p| p.name == name)
        .and_then(|p| p.id.clone());
    match id {
        Some(id) => {
            service.select_preset(&id);
            Ok(())
        }
        None => Err(format!("no preset named '{name}'").into()),
    }
}

fn print_status(snap: &TimerSnapshot, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(snap)?);
        return Ok(());
    }
    let mode = match snap.mode {
        TimerMode::Focus => "focus",
        TimerMode::ShortBreak => "break",
    };
    print!(
        "\r[{mode}] {:02}:{:02}  cycles: {}   ",
        snap.remaining_secs / 60,
        snap.remaining_secs % 60,
        snap.cycles_completed
    );
    std::io::stdout().flush()?;
    Ok(())
}
