//! Paygate CLI - canonical signing strings, signatures and request verification.

use clap::{Parser, Subcommand};
use paygate_core::SignType;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod input;
mod output;

use commands::{canonicalize, sign, verify};

#[derive(Parser)]
#[command(name = "paygate")]
#[command(about = "Payment gateway signing-string and signature tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter used when RUST_LOG is unset (e.g. `debug`, `paygate_core=trace`)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the signing string of an order
    Canonicalize {
        /// Order JSON file (or stdin if not provided)
        input: Option<String>,
        /// Read the compaction policy from `policy` in this config
        #[arg(long)]
        config_url: Option<String>,
    },
    /// Sign an order
    Sign {
        /// Order JSON file (or stdin if not provided)
        input: Option<String>,
        /// Signature scheme (MD5, SHA256, ED25519)
        #[arg(long, default_value = "ED25519")]
        sign_type: SignType,
        /// Shared secret, or hex Ed25519 seed
        #[arg(long)]
        key: String,
        /// Print the order with `sign` set instead of the bare signature
        #[arg(long)]
        attach: bool,
    },
    /// Authenticate an order against merchant configuration
    Verify {
        /// Order JSON file (or stdin if not provided)
        input: Option<String>,
        /// Config URL, e.g. file:///etc/paygate/config.yaml
        #[arg(long)]
        config_url: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Canonicalize { input, config_url } => canonicalize::run(input, config_url),
        Commands::Sign {
            input,
            sign_type,
            key,
            attach,
        } => sign::run(input, sign_type, key, attach),
        Commands::Verify {
            input,
            config_url,
            json,
        } => verify::run(input, config_url, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
