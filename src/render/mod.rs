//! HTML template rendering
//!
//! Templates are minijinja (Jinja2 syntax). The built-in set is compiled into
//! the binary; a templates directory can override any of them with a
//! `<name>.html` file. Every template is HTML auto-escaped and undefined
//! variables are errors, so a template asking for a field the handler did not
//! supply fails to render instead of printing nothing.

use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Names of every template the service renders, in load order.
///
/// `layout` comes first because the page templates extend it.
pub const TEMPLATE_NAMES: &[&str] = &["layout", "index", "list", "view", "edit", "error"];

const LAYOUT_TEMPLATE: &str = include_str!("../../templates/layout.html");
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
const LIST_TEMPLATE: &str = include_str!("../../templates/list.html");
const VIEW_TEMPLATE: &str = include_str!("../../templates/view.html");
const EDIT_TEMPLATE: &str = include_str!("../../templates/edit.html");
const ERROR_TEMPLATE: &str = include_str!("../../templates/error.html");

fn embedded_source(name: &str) -> Option<&'static str> {
    match name {
        "layout" => Some(LAYOUT_TEMPLATE),
        "index" => Some(INDEX_TEMPLATE),
        "list" => Some(LIST_TEMPLATE),
        "view" => Some(VIEW_TEMPLATE),
        "edit" => Some(EDIT_TEMPLATE),
        "error" => Some(ERROR_TEMPLATE),
        _ => None,
    }
}

/// Rendering failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    NotFound(String),
    #[error("Failed to render template '{name}': {source}")]
    Execution {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Renders named templates into complete HTTP responses.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Renderer over the built-in templates only
    pub fn embedded() -> Result<Self> {
        Self::load(None)
    }

    /// Renderer over the built-in templates, overridden by `<dir>/<name>.html`
    /// for every file present in `dir`.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        for &name in TEMPLATE_NAMES {
            let override_path = dir.map(|d| d.join(format!("{}.html", name)));
            match override_path.filter(|p| p.is_file()) {
                Some(path) => {
                    let source = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read template {}", path.display()))?;
                    env.add_template_owned(name.to_string(), source)
                        .with_context(|| format!("Invalid template {}", path.display()))?;
                    tracing::info!("Loaded template '{}' from {}", name, path.display());
                }
                None => {
                    let source = embedded_source(name)
                        .with_context(|| format!("No built-in template named '{}'", name))?;
                    env.add_template(name, source)
                        .with_context(|| format!("Invalid built-in template '{}'", name))?;
                }
            }
        }

        Ok(Self { env })
    }

    /// Render `name` against `data` to a string.
    pub fn render_to_string<S: Serialize>(&self, name: &str, data: S) -> Result<String, RenderError> {
        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => RenderError::NotFound(name.to_string()),
            _ => RenderError::Execution {
                name: name.to_string(),
                source: e,
            },
        })?;

        template.render(data).map_err(|source| RenderError::Execution {
            name: name.to_string(),
            source,
        })
    }

    /// Render `name` against `data` into a `text/html` response with `status`.
    ///
    /// The body is rendered in full before the response exists, so on error
    /// nothing has been committed and the caller is free to answer differently.
    pub fn render<S: Serialize>(
        &self,
        status: StatusCode,
        name: &str,
        data: S,
    ) -> Result<Response, RenderError> {
        let body = self.render_to_string(name, data)?;
        Ok((status, Html(body)).into_response())
    }

    /// Render every page template against representative data.
    pub fn check_all(&self) -> Vec<(&'static str, Result<(), RenderError>)> {
        let sample = crate::notes::Note::new("1", "Sample title", "Sample content");
        TEMPLATE_NAMES
            .iter()
            .filter(|&&name| name != "layout")
            .map(|&name| {
                let data = match name {
                    "index" => serde_json::json!({ "note_count": 1 }),
                    "list" => serde_json::json!({ "notes": [&sample] }),
                    "view" | "edit" => serde_json::json!({ "note": &sample }),
                    _ => serde_json::json!({ "error": "Sample error" }),
                };
                (name, self.render_to_string(name, data).map(|_| ()))
            })
            .collect()
    }
}
