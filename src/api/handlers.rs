//! API request handlers

use super::fallback::AppError;
use super::form::NoteFields;
use super::path::NoteId;
use crate::notes::{Note, NoteIdGenerator, NoteStore, StoreError};
use crate::render::Renderer;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Shared server state
pub struct ServerState {
    pub store: Arc<dyn NoteStore>,
    pub renderer: Renderer,
    pub ids: NoteIdGenerator,
}

/// Shared notes state
pub type NotesState = Arc<ServerState>;

impl ServerState {
    pub fn new(store: Arc<dyn NoteStore>, renderer: Renderer, ids: NoteIdGenerator) -> Self {
        Self {
            store,
            renderer,
            ids,
        }
    }

    /// Render the 404 page for a missing note
    fn not_found(&self, id: &str) -> Result<Response, AppError> {
        tracing::debug!("Note not found: {:?}", id);
        Ok(self.renderer.render(
            StatusCode::NOT_FOUND,
            "error",
            ErrorPage {
                error: "Note not found",
            },
        )?)
    }
}

// ============================================================================
// Template data
// ============================================================================

#[derive(Serialize)]
pub struct IndexPage {
    pub note_count: usize,
}

#[derive(Serialize)]
pub struct ListPage<'a> {
    pub notes: &'a [Note],
}

/// Data for the `view` and `edit` templates
#[derive(Serialize)]
pub struct NotePage<'a> {
    pub note: &'a Note,
}

#[derive(Serialize)]
pub struct ErrorPage<'a> {
    pub error: &'a str,
}

/// 302 Found pointing at `location`
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

// ============================================================================
// Health & index
// ============================================================================

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub notes: usize,
}

/// Liveness check with the current note count
pub async fn health(State(state): State<NotesState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        notes: state.store.len().await,
    })
}

pub async fn index(State(state): State<NotesState>) -> Result<Response, AppError> {
    let note_count = state.store.len().await;
    Ok(state
        .renderer
        .render(StatusCode::OK, "index", IndexPage { note_count })?)
}

// ============================================================================
// Notes
// ============================================================================

/// List every note, newest first
pub async fn list_notes(State(state): State<NotesState>) -> Result<Response, AppError> {
    let mut notes = state.store.list().await;
    notes.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.id.cmp(&a.id)));

    Ok(state
        .renderer
        .render(StatusCode::OK, "list", ListPage { notes: &notes })?)
}

/// Create a note from the submitted form and redirect home
pub async fn create_note(
    State(state): State<NotesState>,
    NoteFields(form): NoteFields,
) -> Result<Response, AppError> {
    let note = Note::new(state.ids.next_id(), form.title, form.content);
    tracing::debug!("Created note {}", note.id);
    state.store.put(note).await;

    Ok(found("/"))
}

pub async fn get_note(
    State(state): State<NotesState>,
    NoteId(id): NoteId,
) -> Result<Response, AppError> {
    match state.store.get(&id).await {
        Ok(note) => Ok(state
            .renderer
            .render(StatusCode::OK, "view", NotePage { note: &note })?),
        Err(StoreError::NotFound(_)) => state.not_found(&id),
    }
}

/// Edit form for an existing note
pub async fn edit_note(
    State(state): State<NotesState>,
    NoteId(id): NoteId,
) -> Result<Response, AppError> {
    match state.store.get(&id).await {
        Ok(note) => Ok(state
            .renderer
            .render(StatusCode::OK, "edit", NotePage { note: &note })?),
        Err(StoreError::NotFound(_)) => state.not_found(&id),
    }
}

/// Replace title and content of a note, then redirect to it.
///
/// A missing note answers 404 whatever the body holds; a malformed form
/// on an existing note is a `FormParse` failure.
pub async fn update_note(
    State(state): State<NotesState>,
    NoteId(id): NoteId,
    form: Result<NoteFields, AppError>,
) -> Result<Response, AppError> {
    let form = match form {
        Ok(NoteFields(form)) => form,
        Err(e) => {
            if state.store.get(&id).await.is_err() {
                return state.not_found(&id);
            }
            return Err(e);
        }
    };

    match state.store.update(&id, form.title, form.content).await {
        Ok(note) => {
            tracing::debug!("Updated note {}", note.id);
            Ok(found(&note.path()))
        }
        Err(StoreError::NotFound(_)) => state.not_found(&id),
    }
}

pub async fn delete_note(
    State(state): State<NotesState>,
    NoteId(id): NoteId,
) -> Result<Response, AppError> {
    match state.store.delete(&id).await {
        Ok(note) => {
            tracing::debug!("Deleted note {}", note.id);
            Ok(found("/notes"))
        }
        Err(StoreError::NotFound(_)) => state.not_found(&id),
    }
}

/// Method fallback for the note routes
pub async fn unsupported_method(method: Method) -> AppError {
    AppError::UnsupportedMethod(method)
}

/// Router fallback for paths with no route
pub async fn page_not_found(State(state): State<NotesState>) -> Result<Response, AppError> {
    Ok(state.renderer.render(
        StatusCode::NOT_FOUND,
        "error",
        ErrorPage {
            error: "Page not found",
        },
    )?)
}
