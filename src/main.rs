use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::{io, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use westminster_shop::{
    config::{self, AppConfig},
    console::{Console, commands},
    core::{auth::CredentialStore, cart::DiscountPolicy, catalog::CatalogStore, shop::Shop},
    errors::Result,
};

/// Westminster Shopping Centre catalog manager and shop.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the config file. Defaults to `CONFIG_PATH`, then `./config.toml`.
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Add, delete, list and save catalog products
    Manage,
    /// Log in and shop from the saved catalog
    Shop,
}

fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible). Logs go to stderr so they
    //    stay out of the console screens.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 3. Parse the command line and load configuration
    let cli = Cli::parse();
    let app_config = config::load_app_configuration(cli.config.as_deref())
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!("Configuration loaded, catalog at {:?}", app_config.catalog.path);

    // 4. Run the chosen screen on stdin/stdout
    let mut console = Console::new(io::stdin().lock(), io::stdout());
    match cli.command {
        Command::Manage => {
            let mut store = CatalogStore::from_settings(&app_config.catalog);
            commands::run_manager(&mut console, &mut store)
        }
        Command::Shop => run_shop(&mut console, &app_config),
    }
}

fn run_shop(
    console: &mut Console<io::StdinLock<'static>, io::Stdout>,
    app_config: &AppConfig,
) -> Result<()> {
    let mut credentials = CredentialStore::open(&app_config.auth.credentials_path)
        .inspect_err(|e| error!("Failed to open credential store: {}", e))?;
    let Some(username) = commands::run_login(console, &mut credentials)? else {
        return Ok(());
    };

    let catalog = CatalogStore::from_settings(&app_config.catalog);
    let mut shop = Shop::open(
        catalog,
        DiscountPolicy::from(&app_config.cart),
        app_config.catalog.low_stock_threshold,
    )
    .inspect_err(|e| error!("Failed to open the shop: {}", e))?;

    info!("Shop session started for {username}");
    commands::run_shop(console, &mut shop)
}
