//! Sign-in CLI commands

use clap::Subcommand;

use crate::config::{MoneyPaths, Settings};
use crate::error::MoneyResult;
use crate::models::Profile;
use crate::session::{pull_profile, IdentityProvider, JsonProfileStore, SessionIdentity};

/// Auth subcommands
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in, creating a local account for a new email
    Login {
        email: String,
    },

    /// Sign out
    Logout,

    /// Show who is signed in
    Whoami,
}

/// Handle an auth command
pub fn handle_auth_command(
    paths: &MoneyPaths,
    settings: &mut Settings,
    cmd: AuthCommands,
) -> MoneyResult<()> {
    let identity = SessionIdentity::new(paths.session_file());

    match cmd {
        AuthCommands::Login { email } => {
            let (user, created) = identity.login(&email)?;

            let store = JsonProfileStore::new(paths.profiles_dir());
            match pull_profile(&store, &user) {
                Some(profile) => settings.cache_profile(profile),
                None => {
                    settings.profile = Profile {
                        email: email.trim().to_lowercase(),
                        ..Profile::default()
                    };
                    settings.profile_completed = false;
                }
            }
            settings.save(paths)?;

            if created {
                println!("Created a new account for {}", email.trim());
            }
            println!("Signed in as {}", email.trim());
            if !settings.profile_completed {
                println!("Complete your profile with `moneyman profile set --name <name>`.");
            }
        }

        AuthCommands::Logout => {
            if identity.logout()? {
                settings.profile = Profile::default();
                settings.profile_completed = false;
                settings.save(paths)?;
                println!("Signed out.");
            } else {
                println!("Not signed in.");
            }
        }

        AuthCommands::Whoami => match identity.current_user()? {
            Some(user) => {
                let email = identity.current_email()?.unwrap_or_default();
                println!("{} ({})", email, user);
            }
            None => println!("Not signed in."),
        },
    }

    Ok(())
}
