//! Notes Server - Main entry point
//!
//! Serves the in-memory notes web UI, or checks that the templates render.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use notes_server::{render::Renderer, Config};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "notes-server")]
#[command(about = "In-memory note-taking web service")]
struct Cli {
    /// Path to a YAML config file (defaults to ./config.yaml when present)
    #[arg(short, long, global = true, env = "NOTES_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the notes server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Load every template and render it against sample data
    CheckTemplates,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,notes_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            tracing::info!("notes-server {} starting", env!("CARGO_PKG_VERSION"));
            notes_server::start_server(config).await
        }
        Commands::CheckTemplates => check_templates(&config),
    }
}

fn check_templates(config: &Config) -> Result<()> {
    let renderer = Renderer::load(config.templates_dir.as_deref())?;

    let mut failures = 0;
    for (name, result) in renderer.check_all() {
        match result {
            Ok(()) => tracing::info!("Template '{}' OK", name),
            Err(e) => {
                failures += 1;
                tracing::error!("Template '{}' failed: {}", name, e);
            }
        }
    }

    if failures > 0 {
        bail!("{} template(s) failed to render", failures);
    }
    Ok(())
}
