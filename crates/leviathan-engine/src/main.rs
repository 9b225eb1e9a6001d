//! # Leviathan
//!
//! Runs a headless sea monster session and prints a JSON summary.
//!
//! Usage: `leviathan [config.toml]`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use leviathan_engine::{EngineConfig, Session};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for the summary.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("leviathan=info".parse()?))
        .init();

    info!("Project Leviathan starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::default(),
    };

    let mut session = Session::new(config);
    let summary = session.run();
    println!("{}", summary.to_json()?);

    info!("Project Leviathan shutdown complete");
    Ok(())
}
