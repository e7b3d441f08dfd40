//! Translation of handler failures into error responses
//!
//! Handlers return `Result<Response, AppError>`. An `AppError` turns into a
//! bare plain-text response that carries an [`ErrorReport`] extension; the
//! [`render_error_pages`] middleware wrapped around the router replaces it with
//! the rendered `error` page, or a JSON body for clients that asked for JSON.
//! If the error page cannot be rendered either, the plain-text response stands.

use super::handlers::{ErrorPage, NotesState};
use crate::render::RenderError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Failures a handler can escalate
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unsupported method: {0}")]
    UnsupportedMethod(Method),
    #[error("Error parsing form: {0}")]
    FormParse(String),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::FormParse(_) | AppError::Render(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Status and message of a failed request, attached to its response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let report = ErrorReport {
            status,
            message: self.to_string(),
        };

        let fallback_text = status.canonical_reason().unwrap_or("Internal Server Error");
        let mut response = (status, fallback_text).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

/// Middleware that renders an error page for every response carrying an [`ErrorReport`].
pub async fn render_error_pages(
    State(state): State<NotesState>,
    req: Request,
    next: Next,
) -> Response {
    let wants_json = accepts_json(req.headers());
    let response = next.run(req).await;

    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };

    if report.status.is_server_error() {
        tracing::error!("Request failed ({}): {}", report.status, report.message);
    } else {
        tracing::warn!("Request rejected ({}): {}", report.status, report.message);
    }

    if wants_json {
        let body = Json(serde_json::json!({ "error": report.message }));
        return (report.status, body).into_response();
    }

    let page = ErrorPage {
        error: &report.message,
    };
    match state.renderer.render(report.status, "error", page) {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            response
        }
    }
}

fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false)
}
