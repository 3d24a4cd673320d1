//! Lendstock CLI - Inspect and reconcile lent orders.
//!
//! # Usage
//!
//! ```bash
//! # List the items of a lending order
//! lendstock items L-100
//!
//! # Preview a reconciliation without submitting it
//! lendstock process L-100 --dest P-1001=sales --sales-order-id INV-9 --dry-run
//!
//! # Sell 4 units of a box, return the rest, write off a serial
//! lendstock process L-100 --dest BOX-9=sales --sell BOX-9=4 \
//!     --dest P-1002=broken --sales-order-id INV-9
//!
//! # Load decisions from a plan file; flags override it
//! lendstock process L-100 --plan plan.yaml --note "End of trade show"
//! ```
//!
//! # Commands
//!
//! - `items` - List the line items of a lending order
//! - `process` - Preview or submit a reconciliation
//!
//! # Environment Variables
//!
//! - `LENDSTOCK_API_URL` - Inventory backend base URL (required)
//! - `LENDSTOCK_API_TOKEN` - Bearer token (optional)
//! - `LENDSTOCK_HTTP_TIMEOUT_SECS` - Request timeout (default: 30)
//! - `RUST_LOG` - Log filter (default: `lendstock=info`)
//! - `LENDSTOCK_LOG_JSON` - Emit JSON logs when set

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "lendstock")]
#[command(author, version, about = "Lendstock lent-order tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the line items of a lending order
    Items {
        /// Lending order ID
        order_id: String,
    },
    /// Reconcile a lending order: return, sell or write off its items
    Process(commands::process::ProcessArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lendstock=info".into());

    let json = std::env::var_os("LENDSTOCK_LOG_JSON").is_some();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Items { order_id } => commands::items::list(&order_id).await?,
        Commands::Process(args) => commands::process::run(args).await?,
    }
    Ok(())
}
