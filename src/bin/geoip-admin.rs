use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geoip_lookup::config::Config;
use geoip_lookup::index::open_index;
use geoip_lookup::lookup::{LookupOutcome, LookupService};

#[derive(Parser)]
#[command(name = "geoip-admin")]
#[command(about = "GeoIP lookup index management CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an address against the configured index
    Lookup {
        /// IPv4 or IPv6 address
        address: String,
    },
    /// Open the configured index and report whether it loads
    Check,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let index = open_index(&config.index)
        .with_context(|| format!("Failed to open {:?} index", config.index.backend))?;

    match cli.command {
        Commands::Lookup { address } => {
            let service = LookupService::new(index);
            match service.resolve(&address)? {
                LookupOutcome::Found(entry) => {
                    println!("{}", serde_json::to_string_pretty(&entry)?);
                }
                LookupOutcome::NotFound => {
                    println!("⚠ No location record for '{}'", address);
                }
            }
        }
        Commands::Check => {
            println!("✓ {:?} index loaded", config.index.backend);
        }
    }

    Ok(())
}
