//! Paseo Amigo checkout service, CLI server
//!
//! ```sh
//! # Default config (~/.config/paseo-checkout/config.toml)
//! paseo-checkout
//!
//! # Custom config path and port
//! paseo-checkout --config /etc/paseo-checkout/config.toml --port 8080
//!
//! # Validate config without starting
//! paseo-checkout --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

use paseo_checkout::config::AppConfig;
use paseo_checkout::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "paseo-checkout",
    version,
    about = "Payment-authorized booking checkout for Paseo Amigo",
    long_about = "PayPal create/capture checkout and booking ledger for the \
                  Paseo Amigo pet-walking service.\n\n\
                  Default config: ~/.config/paseo-checkout/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PASEO_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(paseo_checkout::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::from_env()?, Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            warn!("Failed to load config from {}: {}", config_path.display(), e);
            warn!("Using defaults and environment overrides.");
        }
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        if let Err(e) = config.validate() {
            error!("Configuration is invalid: {}", e);
            return Err(e.into());
        }
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Database    : {}", config.database.url);
        println!("   PayPal API  : {}", config.paypal.resolved_api_base());
        println!("   Credentials : {}", if config.has_provider_credentials() { "set" } else { "missing" });
        println!("   Rate        : {}", config.currency.rate_source_to_target);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
