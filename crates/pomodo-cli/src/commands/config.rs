use clap::Subcommand;
use pomodo_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the full configuration as TOML
    Show,
    /// Print a single value
    Get {
        /// Key, e.g. `timer.focus_minutes` or `ui.dark_mode`
        key: String,
    },
    /// Set a single value
    Set {
        /// Key, e.g. `timer.focus_minutes` or `ui.dark_mode`
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load();
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Get { key } => match Config::load().get(&key) {
            Some(value) => println!("{value}"),
            None => println!("(unset)"),
        },
        ConfigAction::Set { key, value } => {
            let mut config = Config::load();
            config.set(&key, &value)?;
            config.save()?;
            println!("{key} = {value}");
        }
    }
    Ok(())
}
