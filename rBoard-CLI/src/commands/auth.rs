//! Auth commands.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Input, Password};
use rust_i18n::t;

use crate::config::{self, AuthConfig, RememberConfig};
use crate::output::{format_time, print_json, OutputFormat};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in with a user ID and password
    Login {
        /// User ID (prompted when omitted)
        #[arg(short, long)]
        user: Option<String>,
        /// Password (prompted when omitted)
        #[arg(short, long, env = "RBOARD_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Remember the user ID for the next login
        #[arg(short, long)]
        remember: bool,
    },
    /// Logout
    Logout,
    /// Show current auth status
    Status,
}

pub async fn handle(action: AuthAction, format: OutputFormat, _verbose: bool) -> Result<()> {
    match action {
        AuthAction::Login {
            user,
            password,
            remember,
        } => login(user, password, remember).await,
        AuthAction::Logout => logout(),
        AuthAction::Status => status(format),
    }
}

async fn login(user: Option<String>, password: Option<String>, remember: bool) -> Result<()> {
    let mut cfg = config::load_config()?;

    let user = match user {
        Some(user) => user,
        None => {
            let mut input = Input::<String>::new().with_prompt(t!("prompt_user_id"));
            if let Some(saved) = cfg.remembered_user() {
                input = input.default(saved.to_string());
            }
            input.interact_text().context("Failed to read user ID")?
        }
    };
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt(t!("prompt_password"))
            .interact()
            .context("Failed to read password")?,
    };

    let client = config::build_client()?;
    let login = client.auth().login(&user, &password).await?;
    let name = login.user_name.clone();

    cfg.auth = Some(AuthConfig::from(login.into_auth()));
    cfg.remember = remember.then(|| RememberConfig {
        user_id: user.clone(),
    });
    config::save_config(&cfg)?;

    println!(
        "{}",
        t!("logged_in_as", uid = &user, name = &name).to_string().green()
    );
    Ok(())
}

fn logout() -> Result<()> {
    let mut cfg = config::load_config()?;
    cfg.auth = None;
    config::save_config(&cfg)?;
    println!("{}", t!("logged_out"));
    Ok(())
}

fn status(format: OutputFormat) -> Result<()> {
    let cfg = config::load_config()?;
    let auth = cfg.auth.as_ref().map(|a| {
        let info = rboard::AuthInfo::new(&a.token, a.user_id.as_str());
        let expires = info.claims().ok().and_then(|c| c.expires_at());
        (a, expires, info.is_expired(Utc::now()))
    });

    if matches!(format, OutputFormat::Json) {
        print_json(&serde_json::json!({
            "authenticated": auth.as_ref().is_some_and(|(_, _, expired)| !expired),
            "user_id": auth.as_ref().map(|(a, _, _)| &a.user_id),
            "user_name": auth.as_ref().map(|(a, _, _)| &a.user_name),
            "expires_at": auth.as_ref().and_then(|(_, e, _)| *e),
            "remembered_user": cfg.remembered_user(),
        }));
        return Ok(());
    }

    match auth {
        Some((a, expires, expired)) => {
            println!("{}", t!("logged_in_as", uid = &a.user_id, name = &a.user_name));
            if expires.is_some() {
                println!("{}", t!("token_expires", time = format_time(expires)));
            }
            if expired {
                println!("{}", t!("token_expired").to_string().yellow());
            }
        }
        None => println!("{}", t!("not_logged_in")),
    }
    Ok(())
}
