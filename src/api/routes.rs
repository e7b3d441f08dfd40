//! API route definitions

use super::fallback;
use super::handlers::{self, NotesState};
use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::trace::TraceLayer;

/// Create the notes router
pub fn create_router(state: NotesState) -> Router {
    // `/notes/` shares these handlers and resolves to the empty id
    let note_routes = get(handlers::get_note)
        .put(handlers::update_note)
        .post(handlers::update_note)
        .delete(handlers::delete_note)
        .fallback(handlers::unsupported_method);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // ====================================================================
        // Notes
        // ====================================================================
        .route(
            "/notes",
            get(handlers::list_notes)
                .post(handlers::create_note)
                .fallback(handlers::unsupported_method),
        )
        .route("/notes/", note_routes.clone())
        .route("/notes/{id}", note_routes)
        .route("/notes/{id}/edit", get(handlers::edit_note))
        .fallback(handlers::page_not_found)
        // Middleware
        .layer(from_fn_with_state(
            state.clone(),
            fallback::render_error_pages,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
