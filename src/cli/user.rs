//! User CLI commands
//!
//! Register, log in and out. PINs are prompted without echo unless given
//! through `--pin` / `TALLY_PIN`.

use clap::Subcommand;
use zeroize::Zeroizing;

use crate::config::settings::Settings;
use crate::error::{TallyError, TallyResult};
use crate::services::AuthService;
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user and log in
    Register {
        /// User name
        name: String,
        /// 4-8 digit PIN (prompted if omitted)
        #[arg(long, env = "TALLY_PIN", hide_env_values = true)]
        pin: Option<String>,
        /// Currency code, e.g. EGP or USD
        #[arg(short, long)]
        currency: Option<String>,
    },
    /// Log in as an existing user
    Login {
        /// User name
        name: String,
        /// PIN (prompted if omitted)
        #[arg(long, env = "TALLY_PIN", hide_env_values = true)]
        pin: Option<String>,
    },
    /// Log out the current user
    Logout,
    /// Show who is logged in
    Whoami,
}

/// Handle a user command
pub fn handle_user_command(
    storage: &Storage,
    settings: &Settings,
    cmd: UserCommands,
) -> TallyResult<()> {
    let service = AuthService::new(storage);

    match cmd {
        UserCommands::Register {
            name,
            pin,
            currency,
        } => {
            let pin = match pin {
                Some(pin) => Zeroizing::new(pin),
                None => prompt_new_pin()?,
            };
            let currency = currency.unwrap_or_else(|| settings.default_currency.clone());

            let session = service.register(&name, &pin, &currency)?;
            println!("Registered user: {}", session.name);
            println!("You are now logged in.");
        }

        UserCommands::Login { name, pin } => {
            let pin = match pin {
                Some(pin) => Zeroizing::new(pin),
                None => prompt_pin("PIN: ")?,
            };

            let session = service.login(&name, &pin)?;
            println!("Welcome back, {}!", session.name);
        }

        UserCommands::Logout => {
            if service.logout()? {
                println!("Logged out.");
            } else {
                println!("Nobody was logged in.");
            }
        }

        UserCommands::Whoami => match service.current_session()? {
            Some(session) => {
                let user = service.user(&session)?;
                println!("Logged in as: {}", user.name);
                println!("  ID:       {}", user.id);
                println!("  Currency: {}", user.currency);
                println!("  Since:    {}", user.created_at.format("%Y-%m-%d"));
            }
            None => println!("Not logged in."),
        },
    }

    Ok(())
}

/// Prompt for a PIN (hidden input)
pub fn prompt_pin(prompt: &str) -> TallyResult<Zeroizing<String>> {
    rpassword::prompt_password(prompt)
        .map(Zeroizing::new)
        .map_err(|e| TallyError::Io(format!("Failed to read PIN: {}", e)))
}

/// Prompt for a new PIN twice
pub fn prompt_new_pin() -> TallyResult<Zeroizing<String>> {
    let first = prompt_pin("Choose a PIN (4-8 digits): ")?;
    let second = prompt_pin("Confirm PIN: ")?;
    if *first != *second {
        return Err(TallyError::Validation("PINs do not match".into()));
    }
    Ok(first)
}
