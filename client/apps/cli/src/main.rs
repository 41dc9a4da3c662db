//! Event Booking Client Entry Point
//!
//! Drives the session subsystem from a terminal: sign in, sign out,
//! register, inspect the session and resolve routes through their gates.
//! Uses `anyhow` for startup errors; session errors are reported through
//! `kernel::error::AppError`.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use auth::{
    AuthConfig, HttpIdentityBackend, HttpUserApi, IdentityToolkitConfig, SessionContext,
};
use clap::{Parser, Subcommand};
use platform::http::{HttpClientConfig, build_client};
use platform::storage::FileStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub type Context = SessionContext<HttpIdentityBackend, HttpUserApi>;

#[derive(Parser)]
#[command(name = "eventbook")]
#[command(about = "Event booking client: session and access checks")]
struct Cli {
    /// Origin whose stored session is used
    #[arg(long, env = "EVENTBOOK_ORIGIN", default_value = "http://localhost:3000")]
    origin: String,

    /// Directory holding per-origin session storage
    #[arg(long, env = "EVENTBOOK_STATE_DIR", default_value = ".eventbook")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "EVENTBOOK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and clear the stored credential
    Logout,

    /// Create an account (does not sign in)
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "EVENTBOOK_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        phone: String,
        #[arg(long, env = "EVENTBOOK_ADMIN_SECRET", hide_env_values = true)]
        admin_secret: Option<String>,
    },

    /// Show the current session and profile
    Whoami,

    /// Resolve a route through its gate
    Visit { path: String },

    /// Print session changes until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventbook=info,auth=info,platform=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = build_context(&cli)?;

    match cli.command {
        Command::Login { email, password } => commands::login(&ctx, email, password).await,
        Command::Logout => commands::logout(&ctx).await,
        Command::Register {
            email,
            password,
            full_name,
            phone,
            admin_secret,
        } => {
            commands::register(&ctx, email, password, full_name, phone, admin_secret).await
        }
        Command::Whoami => commands::whoami(&ctx).await,
        Command::Visit { path } => commands::visit(&ctx, &path).await,
        Command::Watch => commands::watch(&ctx).await,
    }
}

fn build_context(cli: &Cli) -> anyhow::Result<Context> {
    let config = AuthConfig::from_env();

    let client = build_client(&HttpClientConfig {
        request_timeout: config.profile_request_timeout,
        ..Default::default()
    })?;

    let store = Arc::new(FileStore::for_origin(&cli.state_dir, &cli.origin));
    tracing::debug!(path = %store.path().display(), "Using session storage");

    let backend = Arc::new(HttpIdentityBackend::new(
        client.clone(),
        IdentityToolkitConfig::from_env(),
        store.clone(),
    ));
    let user_api = Arc::new(HttpUserApi::new(client, &config));

    Ok(SessionContext::new(config, store, backend, user_api))
}
