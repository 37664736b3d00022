//! rBoard CLI and MCP Server.

mod commands;
mod config;
mod handlers;
mod mcp;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{auth, comment, draft, post};
use rust_i18n::t;

rust_i18n::i18n!("src/locales", fallback = "en");

/// Discussion board CLI and MCP Server
#[derive(Parser)]
#[command(name = "rboard")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "plain")]
    format: output::OutputFormat,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Language for output (en, ko)
    #[arg(short, long, global = true, default_value = "en")]
    lang: String,

    /// Board API base URL
    #[arg(long, global = true, env = "RBOARD_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Run as MCP Server
    #[arg(long)]
    mcp: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        action: auth::AuthAction,
    },

    /// Post operations
    #[command(alias = "p")]
    Post {
        #[command(subcommand)]
        action: post::PostAction,
    },

    /// Comment operations
    #[command(alias = "c")]
    Comment {
        #[command(subcommand)]
        action: comment::CommentAction,
    },

    /// Saved post drafts
    #[command(alias = "d")]
    Draft {
        #[command(subcommand)]
        action: draft::DraftAction,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    rust_i18n::set_locale(&cli.lang);

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else if cli.mcp {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(url) = cli.base_url {
        config::set_base_url(url);
    }

    if cli.mcp {
        return mcp::run_server().await;
    }

    let command = cli
        .command
        .ok_or_else(|| anyhow::anyhow!("{}", t!("no_command")))?;

    match command {
        Commands::Auth { action } => auth::handle(action, cli.format, cli.verbose).await,
        Commands::Post { action } => post::handle(action, cli.format, cli.verbose).await,
        Commands::Comment { action } => comment::handle(action, cli.format, cli.verbose).await,
        Commands::Draft { action } => draft::handle(action, cli.format, cli.verbose).await,
        Commands::Config => {
            let cfg = config::load_config()?;
            println!(
                "{}",
                t!("config_file", path = config::config_path()?.display())
            );
            println!("{}", t!("base_url", url = cfg.base_url()));
            println!("{}", t!("drafts_dir", path = config::drafts_dir()?.display()));
            println!("{}", t!("authenticated", status = cfg.auth.is_some()));
            if let Some(auth) = &cfg.auth {
                println!("{}", t!("logged_in_as", uid = &auth.user_id, name = &auth.user_name));
            }
            if let Some(user) = cfg.remembered_user() {
                println!("{}", t!("remembered_user", uid = user));
            }
            Ok(())
        }
    }
}
