//! Profile CLI commands

use clap::Subcommand;

use super::CommandContext;
use crate::audit::EntityType;
use crate::error::{MoneyError, MoneyResult};
use crate::events::ChangeEvent;
use crate::models::profile::CURRENCY_OPTIONS;
use crate::session::{push_profile, JsonProfileStore};

/// Profile subcommands
#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the cached profile
    Show,

    /// Update profile fields; unspecified fields keep their value
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Currency code (INR, USD, EUR, GBP, JPY)
        #[arg(long)]
        currency: Option<String>,
    },

    /// List the supported currencies
    Currencies,
}

/// Handle a profile command
pub fn handle_profile_command(ctx: &CommandContext<'_>, cmd: ProfileCommands) -> MoneyResult<()> {
    match cmd {
        ProfileCommands::Show => {
            let profile = &ctx.settings.profile;
            println!("Name:     {}", profile.name);
            println!("Email:    {}", profile.email);
            println!("Phone:    {}", profile.phone);
            println!("Currency: {}", profile.currency);
            if !ctx.settings.profile_completed {
                println!("\nProfile incomplete.");
            }
        }

        ProfileCommands::Set {
            name,
            email,
            phone,
            currency,
        } => {
            let mut profile = ctx.settings.profile.clone();
            if let Some(name) = name {
                profile.name = name.trim().to_string();
            }
            if let Some(email) = email {
                profile.email = email.trim().to_string();
            }
            if let Some(phone) = phone {
                profile.phone = phone.trim().to_string();
            }
            if let Some(code) = currency {
                profile.currency = resolve_currency(&code)?.to_string();
            }
            profile
                .validate()
                .map_err(|e| MoneyError::Validation(e.to_string()))?;

            let mut settings = ctx.settings.clone();
            settings.cache_profile(profile.clone());
            settings.save(ctx.paths)?;

            let store = JsonProfileStore::new(ctx.paths.profiles_dir());
            if !push_profile(&store, &ctx.user, &profile) {
                println!("Profile saved locally; sync will be retried on next update.");
            }

            ctx.storage.log_replace(
                &ctx.user,
                EntityType::Profile,
                ctx.user.to_string(),
                Some(profile.name.clone()),
                &profile,
            )?;
            ctx.bus.publish(ChangeEvent::ProfileUpdated {
                user: ctx.user.clone(),
            });

            println!("Profile updated: {}", profile);
        }

        ProfileCommands::Currencies => {
            for option in CURRENCY_OPTIONS {
                println!("{}", option);
            }
        }
    }

    Ok(())
}

/// Match a currency code or full label against the supported options
fn resolve_currency(input: &str) -> MoneyResult<&'static str> {
    let wanted = input.trim().to_uppercase();
    CURRENCY_OPTIONS
        .iter()
        .copied()
        .find(|option| {
            option.to_uppercase() == wanted
                || option.split(" - ").next().is_some_and(|code| code == wanted)
        })
        .ok_or_else(|| {
            MoneyError::Validation(format!(
                "Unsupported currency: {} (expected one of INR, USD, EUR, GBP, JPY)",
                input
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_currency() {
        assert_eq!(resolve_currency("usd").unwrap(), "USD - $ United States");
        assert_eq!(resolve_currency("GBP - £ United Kingdom").unwrap(), "GBP - £ United Kingdom");
        assert!(resolve_currency("AUD").unwrap_err().is_validation());
    }
}
