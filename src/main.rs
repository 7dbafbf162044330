//! Notorious R.A.G. dashboard server
//!
//! Entry point for the agent run dashboard.

use std::sync::Arc;

use dotenvy::dotenv;
use mimalloc::MiMalloc;

use ragwatch::config::AppConfig;
use ragwatch::{server, telemetry};

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (M-LOG-STRUCTURED)
    telemetry::init();

    // Load .env (if present)
    let _ = dotenv();

    let config = match AppConfig::load() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    server::start_server(config).await
}
