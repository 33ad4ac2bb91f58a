//! Drop-in script-tag inspector.
//!
//! # Usage
//!
//! ```bash
//! # Inspect the page described in dropin.toml
//! cargo run -p dropin-cli -- inspect
//!
//! # Inspect another page description
//! CONFIG=/path/to/page.toml cargo run -p dropin-cli -- inspect
//!
//! # Classify an authorization string
//! cargo run -p dropin-cli -- authorization sandbox_abc_123
//!
//! # Configure logging level
//! RUST_LOG=debug cargo run -p dropin-cli -- inspect
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to the page description (default: `dropin.toml`)
//! - `RUST_LOG` - Log level filter (default: `info`)

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dropin::parse_authorization;
use dropin_cli::config::{DEFAULT_CONFIG_PATH, PageConfig};
use dropin_cli::inspect;

/// Inspects drop-in script-tag integrations.
#[derive(Parser, Debug)]
#[command(name = "dropin", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Binds a described page and prints what the widget would be created with.
    Inspect {
        /// Path to the page description.
        #[arg(short, long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
    /// Prints the descriptor of a tokenization key or client token.
    Authorization {
        /// Tokenization key or base64 client token.
        value: String,
    },
}

fn main() {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let output = match args.command {
        Command::Inspect { config } => {
            let page = PageConfig::load_from(&config)?;
            tracing::info!(
                path = %config.display(),
                attributes = page.script.len(),
                "Loaded page description"
            );
            serde_json::to_string_pretty(&inspect(&page)?)?
        }
        Command::Authorization { value } => {
            serde_json::to_string_pretty(&parse_authorization(value.trim())?)?
        }
    };

    println!("{output}");
    Ok(())
}
