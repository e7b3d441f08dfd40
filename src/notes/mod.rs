//! Notes module
//!
//! The note record, the in-memory store that owns every note for the life of
//! the process, and the id generator used when notes are created.

pub mod id;
pub mod models;
pub mod store;

pub use id::{IdStrategy, NoteIdGenerator};
pub use models::*;
pub use store::{InMemoryNoteStore, NoteStore, StoreError};
