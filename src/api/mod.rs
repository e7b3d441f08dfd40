//! HTTP API for the notes service

pub mod fallback;
pub mod form;
pub mod handlers;
pub mod path;
pub mod routes;

pub use fallback::{AppError, ErrorReport};
pub use handlers::{NotesState, ServerState};
pub use routes::create_router;
