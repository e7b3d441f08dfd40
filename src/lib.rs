//! Notes Server
//!
//! A small note-taking web service:
//! - In-memory note store behind a single reader/writer lock
//! - Server-rendered HTML pages via minijinja templates
//! - Axum routing with one error fallback for every handler

pub mod api;
pub mod notes;
pub mod render;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::{Context, Result};
use notes::{IdStrategy, InMemoryNoteStore, NoteIdGenerator};
use render::Renderer;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub templates: TemplatesYamlConfig,
    pub notes: NotesYamlConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Templates configuration section
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TemplatesYamlConfig {
    /// Directory of `<name>.html` files overriding the built-in templates
    pub dir: Option<String>,
}

/// Notes configuration section
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct NotesYamlConfig {
    pub id_strategy: IdStrategy,
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub templates_dir: Option<PathBuf>,
    pub id_strategy: IdStrategy,
}

impl Config {
    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        let id_strategy = match std::env::var("NOTES_ID_STRATEGY") {
            Ok(raw) => raw
                .parse()
                .map_err(anyhow::Error::msg)
                .context("Invalid NOTES_ID_STRATEGY")?,
            Err(_) => yaml.notes.id_strategy,
        };

        Ok(Self {
            host: std::env::var("NOTES_HOST").unwrap_or(yaml.server.host),
            port: std::env::var("NOTES_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            templates_dir: std::env::var("NOTES_TEMPLATES_DIR")
                .ok()
                .or(yaml.templates.dir)
                .map(PathBuf::from),
            id_strategy,
        })
    }

    /// Address the listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Read the YAML file at `yaml_path` (or `./config.yaml`).
    ///
    /// A missing or unparseable file yields all defaults; sections absent from
    /// a readable file are logged and fall back individually.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let path = yaml_path.unwrap_or(Path::new("config.yaml"));

        let Ok(contents) = std::fs::read_to_string(path) else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return YamlConfig::default();
        };

        let config: YamlConfig = match serde_yaml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unparseable {}: {}", path.display(), e);
                return YamlConfig::default();
            }
        };

        for section in missing_sections(&contents) {
            tracing::debug!("No `{}` section in {}, using defaults", section, path.display());
        }
        tracing::info!("Loaded config from {}", path.display());
        config
    }
}

/// Top-level sections of [`YamlConfig`]
const CONFIG_SECTIONS: [&str; 3] = ["server", "templates", "notes"];

/// Sections of [`YamlConfig`] that `contents` does not mention
fn missing_sections(contents: &str) -> Vec<&'static str> {
    let mapping: serde_yaml::Mapping = serde_yaml::from_str(contents).unwrap_or_default();
    CONFIG_SECTIONS
        .into_iter()
        .filter(|section| !mapping.contains_key(*section))
        .collect()
}

// ============================================================================
// Server
// ============================================================================

/// Build the shared server state: an empty store, the templates and the id generator
pub fn build_state(config: &Config) -> Result<api::NotesState> {
    let renderer = Renderer::load(config.templates_dir.as_deref())
        .context("Failed to load templates")?;

    Ok(Arc::new(api::ServerState::new(
        Arc::new(InMemoryNoteStore::new()),
        renderer,
        NoteIdGenerator::new(config.id_strategy),
    )))
}

/// Bind the listener and serve until Ctrl-C.
///
/// A bind failure is returned to the caller, which exits the process.
pub async fn start_server(config: Config) -> Result<()> {
    let state = build_state(&config)?;
    let app = api::create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {} (id strategy: {})", addr, config.id_strategy);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

// ============================================================================
// Tests
// ============================================================================
