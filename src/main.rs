//! devnull binary.
//!
//! ```text
//!     Client Request            ┌──────────────────────────────────────────┐
//!     ──────────────────────────┼─▶ net listener ─▶ http server ─▶ relay   │
//!                               │                                  │       │
//!                               │          no target: wait, status │       │
//!     Client Response           │                                  ▼       │
//!     ◀─────────────────────────┼── relay response ◀── upstream client ◀───┼──── Target
//!                               └──────────────────────────────────────────┘
//! ```

use clap::Parser;

use devnull::cli::Args;
use devnull::lifecycle;
use devnull::observability::logging::init_logging;

const BANNER: &str = r"
 ____  _______     ___   _ _   _ _     _
|  _ \| ____\ \   / / \ | | | | | |   | |
| | | |  _|  \ \ / /|  \| | | | | |   | |
| |_| | |___  \ V / | |\  | |_| | |___| |___
|____/|_____|  \_/  |_| \_|\___/|_____|_____|

It does literally nothing
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().into_config()?;
    let _log_guard = init_logging(&config.observability)?;

    println!("{BANNER}");
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "devnull starting");

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
