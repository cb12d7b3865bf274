use clap::Subcommand;
use pomodo_core::{Config, TimerPreset};

#[derive(Subcommand)]
pub enum PresetAction {
    /// List synced presets
    List,
    /// Create a preset
    Add {
        /// Preset name
        name: String,
        /// Focus duration in minutes
        #[arg(long)]
        focus: u32,
        /// Short break duration in minutes
        #[arg(long)]
        short_break: u32,
    },
    /// Overwrite a preset by id
    Update {
        /// Preset id (see `preset list`)
        id: String,
        /// Preset name
        #[arg(long)]
        name: String,
        /// Focus duration in minutes
        #[arg(long)]
        focus: u32,
        /// Short break duration in minutes
        #[arg(long)]
        short_break: u32,
    },
    /// Delete a preset by id
    Delete {
        /// Preset id
        id: String,
    },
}

pub async fn run(action: PresetAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let store = super::open_preset_store(&config)?;

    match action {
        PresetAction::List => {
            let mut subscription = store.subscribe();
            let presets = match subscription.next().await {
                Some(emission) => emission?,
                None => Vec::new(),
            };
            subscription.close();
            if presets.is_empty() {
                println!("no presets");
                return Ok(());
            }
            for preset in presets {
                println!(
                    "{}  {}  focus {}m / break {}m",
                    preset.id.as_deref().unwrap_or("-"),
                    preset.name,
                    preset.focus_minutes,
                    preset.short_break_minutes
                );
            }
        }
        PresetAction::Add { name, focus, short_break } => {
            store.create(&TimerPreset::new(&name, focus, short_break)).await?;
            println!("preset '{name}' created");
        }
        PresetAction::Update { id, name, focus, short_break } => {
            let mut preset = TimerPreset::new(&name, focus, short_break);
            preset.id = Some(id);
            store.update(&preset).await?;
            println!("preset '{name}' updated");
        }
        PresetAction::Delete { id } => {
            store.delete(&id).await?;
            println!("preset deleted");
        }
    }
    Ok(())
}
