//! Note id extraction from the request path

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// The id segment of a `/notes/{id}` path.
///
/// Read straight from the URI: the second path segment, or the empty string
/// when there is none. An empty id is a valid lookup that simply finds nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteId(pub String);

impl<S> FromRequestParts<S> for NoteId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(NoteId(extract_id(parts.uri.path()).to_string()))
    }
}

/// Second segment of `path`, e.g. `/notes/42/edit` → `42`, `/notes/` → ``.
pub fn extract_id(path: &str) -> &str {
    path.split('/').nth(2).unwrap_or("")
}
