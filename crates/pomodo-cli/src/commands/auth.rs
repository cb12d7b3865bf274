use clap::Subcommand;
use pomodo_core::Config;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the account identifier used to scope preset sync
    Login {
        /// Opaque user identifier
        user_id: String,
    },
    /// Forget the stored account identifier
    Logout,
    /// Show the current identity
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Login { user_id } => {
            let mut config = Config::load();
            config.account.user_id = Some(user_id.clone());
            config.save()?;
            println!("signed in as {user_id}");
        }
        AuthAction::Logout => {
            let mut config = Config::load();
            config.account.user_id = None;
            config.save()?;
            println!("signed out");
        }
        AuthAction::Status => match Config::load().account.user_id {
            Some(user_id) => println!("signed in as {user_id}"),
            None => println!("not signed in"),
        },
    }
    Ok(())
}
