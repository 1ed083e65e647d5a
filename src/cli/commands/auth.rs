use clap::Subcommand;
use dialoguer::Password;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::session::{AuthClient, SessionCache, SignUpOutcome};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in with email and password")]
    Login {
        #[arg(help = "Account email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Register a new account")]
    Register {
        #[arg(help = "Account email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Sign out and discard the cached session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show the signed-in identity")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = resolve_password(password)?;
            let client = AuthClient::from_config(config::config())?;
            let session = client.sign_in(&email, &password).await?;

            SessionCache::open_default()?.save(&session)?;

            output_success(
                &output_format,
                &format!("Signed in as {}", session.user.email),
                Some(json!({
                    "user_id": session.user.id,
                    "expires_at": session.expires_at,
                })),
            )
        }

        AuthCommands::Register { email, password } => {
            let password = resolve_password(password)?;
            let client = AuthClient::from_config(config::config())?;

            match client.sign_up(&email, &password).await? {
                SignUpOutcome::Active(session) => {
                    SessionCache::open_default()?.save(&session)?;
                    output_success(
                        &output_format,
                        &format!("Registered and signed in as {}", session.user.email),
                        Some(json!({ "user_id": session.user.id })),
                    )
                }
                SignUpOutcome::ConfirmationRequired => output_success(
                    &output_format,
                    "Registered; confirm your email, then run 'goaltrack auth login'",
                    None,
                ),
            }
        }

        AuthCommands::Logout => {
            let cache = SessionCache::open_default()?;

            if let Some(session) = cache.load()? {
                let client = AuthClient::from_config(config::config())?;
                // Token revocation is best effort; the cache is cleared
                // either way, which is what actually signs the CLI out.
                if let Err(e) = client.sign_out(&session).await {
                    tracing::warn!("remote sign-out failed: {}", e);
                }
            }

            cache.clear()?;
            output_success(&output_format, "Signed out", None)
        }

        AuthCommands::Status => {
            let session = SessionCache::open_default()?.load()?;
            match (&session, &output_format) {
                (Some(s), OutputFormat::Text) => {
                    println!("Signed in as {} (session expires {})", s.user.email, s.expires_at);
                }
                (Some(s), OutputFormat::Json) => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "signed_in": true,
                            "email": s.user.email,
                            "user_id": s.user.id,
                            "expires_at": s.expires_at,
                        }))?
                    );
                }
                (None, OutputFormat::Text) => println!("Not signed in"),
                (None, OutputFormat::Json) => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({ "signed_in": false }))?
                    );
                }
            }
            Ok(())
        }

        AuthCommands::Whoami => {
            let session = SessionCache::open_default()?
                .load()?
                .ok_or_else(|| anyhow::anyhow!("not signed in; run 'goaltrack auth login' first"))?;

            match output_format {
                OutputFormat::Text => {
                    println!("{} ({})", session.user.email, session.user.id);
                }
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "email": session.user.email,
                            "user_id": session.user.id,
                        }))?
                    );
                }
            }
            Ok(())
        }
    }
}

fn resolve_password(provided: Option<String>) -> anyhow::Result<String> {
    match provided {
        Some(password) => Ok(password),
        None => Ok(Password::new().with_prompt("Password").interact()?),
    }
}
