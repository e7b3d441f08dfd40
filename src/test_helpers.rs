//! Test helper factories and mock state builders
//!
//! Provides fresh in-memory server state per test and small builders for
//! requests and response bodies.
#![allow(dead_code)]

use crate::api::{NotesState, ServerState};
use crate::notes::{IdStrategy, InMemoryNoteStore, NoteIdGenerator};
use crate::render::Renderer;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// Mock state builders
// ============================================================================

/// Server state over an empty store and the built-in templates
pub fn mock_server_state() -> NotesState {
    Arc::new(ServerState::new(
        Arc::new(InMemoryNoteStore::new()),
        Renderer::embedded().expect("built-in templates"),
        NoteIdGenerator::new(IdStrategy::Timestamp),
    ))
}

/// Server state whose templates are overridden from `dir`
pub fn mock_server_state_with_templates(dir: &Path) -> NotesState {
    Arc::new(ServerState::new(
        Arc::new(InMemoryNoteStore::new()),
        Renderer::load(Some(dir)).expect("templates"),
        NoteIdGenerator::new(IdStrategy::Timestamp),
    ))
}

// ============================================================================
// Requests & responses
// ============================================================================

/// Request with an empty body
pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Request with a url-encoded form body
pub fn form_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Request with a `multipart/form-data` body holding `fields` as text parts
pub fn multipart_request(method: &str, uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    const BOUNDARY: &str = "notes-test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Collect a response body as UTF-8
pub async fn body_string(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
