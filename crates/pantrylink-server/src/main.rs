//! PantryLink gateway - entry point.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pantrylink_config::AppConfig;
use pantrylink_grocy::{GrocyClient, OpenFoodFactsClient};
use pantrylink_server::{ApiServer, AppState};
use pantrylink_store::MemoryStore;
use pantrylink_workflow::ScanInterpreter;

/// Command-line arguments.
struct Args {
    /// Path to configuration file.
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config = args.next().map(PathBuf::from);
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("pantrylink {}", pantrylink_server::VERSION);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self { config }
    }
}

fn print_help() {
    println!(
        r"PantryLink - barcode gateway for Grocy-compatible inventories

USAGE:
    pantrylink [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file (TOML or JSON)
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    PANTRYLINK_LISTEN_ADDR       Bind address (default: 0.0.0.0)
    PANTRYLINK_LISTEN_PORT       Listen port (default: 8123)
    PANTRYLINK_GROCY_URL         Grocy base URL
    PANTRYLINK_GROCY_API_KEY     Grocy API key
    PANTRYLINK_REQUIRE_API_KEY   Require an API key on /api requests
    PANTRYLINK_API_KEY           Add a valid gateway API key
    PANTRYLINK_LOOKUP_URL        Product lookup base URL

EXAMPLES:
    # Run with a configuration file
    pantrylink --config /etc/pantrylink/pantrylink.toml

    # Run with environment variables
    PANTRYLINK_GROCY_URL=http://localhost:9283 pantrylink
"
    );
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pantrylink=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Parse arguments
    let args = Args::parse();

    // Load configuration
    let config = match args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            match AppConfig::from_file(&path) {
                Ok(config) => config.with_env_overrides(),
                Err(e) => {
                    error!("Failed to load configuration: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            info!("Using default configuration with environment overrides");
            AppConfig::default().with_env_overrides()
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    info!("Starting PantryLink v{}", pantrylink_server::VERSION);

    // Wire the collaborators
    let store = Arc::new(MemoryStore::new());
    for key in &config.auth.api_keys {
        store.add_api_key(key.clone());
    }

    let inventory = match GrocyClient::new(
        &config.grocy.url,
        &config.grocy.api_key,
        Duration::from_secs(config.grocy.timeout_secs),
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create inventory client: {e}");
            std::process::exit(1);
        }
    };

    let lookup = match OpenFoodFactsClient::new(
        &config.lookup.url,
        Duration::from_secs(config.lookup.timeout_secs),
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create lookup client: {e}");
            std::process::exit(1);
        }
    };

    let scanner = Arc::new(ScanInterpreter::new(
        store.clone(),
        config.barcodes.clone(),
    ));

    let state = Arc::new(AppState::new(config, store, inventory, lookup, scanner));

    // Run the server
    let server = ApiServer::new(state);
    if let Err(e) = server.run().await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
