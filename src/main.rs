use anyhow::{Context, Result};
use cantinero::catalog::Catalog;
use cantinero::config::Config;
use cantinero::server::{self, AppState};
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the chat backend.
    Serve {
        #[arg(long, help = "Port for the web server (overrides PORT).")]
        port: Option<u16>,
    },
    /// Print the loaded pump and recipe catalog and exit.
    Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for environment variables like API keys)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG (e.g. RUST_LOG=info,cantinero=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_json_file(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::builtin(),
    };

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            if config.gemini_api_key.is_none() {
                warn!("GEMINI_API_KEY is not set; chat turns will fail until it is configured");
            }
            info!(
                rig = %config.rig_base_url,
                cooldown_ms = config.cooldown.as_millis(),
                recipes = catalog.recipes().len(),
                "starting cantinero"
            );
            let state =
                AppState::new(config, catalog).context("Failed to build HTTP clients")?;
            server::start(port, state).await?;
        }
        Commands::Catalog => {
            for pump in catalog.pumps() {
                println!(
                    "pump_{} (GPIO {}): {} @ {} ml/s",
                    pump.id, pump.gpio_pin, pump.ingredient, pump.flow_rate_ml_per_sec
                );
            }
            println!();
            for recipe in catalog.recipes() {
                let ingredients = recipe
                    .ingredients
                    .iter()
                    .map(|i| format!("{} {}ml", i.name, i.ml))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{} ({}): {}", recipe.name, recipe.id, ingredients);
            }
        }
    }

    Ok(())
}
