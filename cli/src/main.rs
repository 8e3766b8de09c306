use anyhow::Result;
use arc_client::{ApiError, ArcClient, ConfigManager, PartialConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

use commands::Command;

const EXIT_GENERIC_FAILURE: i32 = 1;
const EXIT_API_FAILURE: i32 = 3;

#[derive(Parser, Debug)]
#[command(name = "arc")]
#[command(about = "Command-line client for the Arc fleet API", long_about = None)]
struct Args {
    /// TOML config file (default: config/arc.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Arc API server URL; only scheme, host and port are used
    #[arg(long)]
    url: Option<String>,

    /// Auth token sent as X-Auth-Token
    #[arg(long)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    cmd: Command,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(args).await {
        // Strict operations fail with the full error document; print it for support tickets
        if let Some(api_error) = e.downcast_ref::<ApiError>() {
            error!("{}", api_error);
            eprintln!("{}", api_error.json_data());
            std::process::exit(EXIT_API_FAILURE);
        }
        error!("{:#}", e);
        std::process::exit(EXIT_GENERIC_FAILURE);
    }
}

fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("arc=info".parse()?)
        .add_directive("arc_client=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let overrides = PartialConfig {
        api_server_url: args.url,
        timeout_seconds: args.timeout_secs,
        token: args.token,
    };

    let config_manager = ConfigManager::new(args.config.as_deref(), overrides).await?;
    let config = config_manager.get_current_config();

    let client = ArcClient::from_config(&config)?;
    info!("Using Arc API at {}", client.api_server_url());

    let token = config.token.clone().unwrap_or_default();
    commands::run(&client, &token, args.cmd).await
}
