mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use portal_api::HttpPortalClient;
use portal_api_sdk::PortalApiClient;
use session::{FileStorage, SessionStore, SystemClock};
use session_sdk::UrlLocation;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "portal", version, about = "Chess portal command-line client")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, short, env = "PORTAL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in with email and password.
    ///
    /// The password is taken from `PORTAL_PASSWORD`, else from the first
    /// line of stdin.
    Login {
        #[arg(long)]
        email: String,
    },
    /// Create an account.
    ///
    /// The password is taken from `PORTAL_PASSWORD`, else from the first
    /// line of stdin.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Forget the persisted session.
    Logout,
    /// Show who is logged in.
    Status,
    /// Check the persisted token against the backend.
    TestAuth,
    /// Fetch the public greeting.
    Hello,
    /// Complete an OAuth login from the landing URL carrying `?token=`.
    Redirect { url: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    logging::init(&cfg.logging);

    let storage_path = cfg.storage_path();
    tracing::debug!(path = %storage_path.display(), base_url = %cfg.api.base_url, "Starting portal client");

    let store = SessionStore::new(
        Arc::new(FileStorage::new(storage_path)),
        Arc::new(SystemClock),
        cfg.session.clone(),
    );
    let api = HttpPortalClient::new(&cfg.api).context("failed to build HTTP client")?;

    run(cli.command, &store, &api).await
}

async fn run(
    command: Command,
    store: &SessionStore,
    api: &dyn PortalApiClient,
) -> anyhow::Result<()> {
    // A redirect landing runs the full start-up sequence itself.
    if !matches!(command, Command::Redirect { .. }) {
        store.restore();
    }

    match command {
        Command::Login { email } => {
            let password = commands::read_password(&mut std::io::stdin().lock())?;
            commands::login(store, api, &email, password).await?;
            println!("{}", commands::describe(&store.snapshot()));
        }
        Command::Register { name, email } => {
            let password = commands::read_password(&mut std::io::stdin().lock())?;
            let user = commands::register(api, &name, &email, password).await?;
            println!("Registered {} <{}> (id {})", user.name, user.email, user.id);
        }
        Command::Logout => {
            store.logout();
            println!("{}", commands::describe(&store.snapshot()));
        }
        Command::Status => println!("{}", commands::describe(&store.snapshot())),
        Command::TestAuth => println!("{}", commands::test_auth(store, api).await?),
        Command::Hello => println!("{}", api.get_hello().await?),
        Command::Redirect { url } => {
            let landing = UrlLocation::parse(&url).context("invalid landing URL")?;
            let location = commands::capture_redirect(store, landing);
            println!("{}", commands::describe(&store.snapshot()));
            println!("{}", location.url());
        }
    }

    Ok(())
}
