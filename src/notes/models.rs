//! Note models and form DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Core Structs
// ============================================================================

/// A short text note kept in memory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    /// Opaque identifier, unique within the store and never reassigned
    pub id: String,
    pub title: String,
    pub content: String,
    /// Set once at creation, untouched by updates
    pub created: DateTime<Utc>,
}

impl Note {
    /// Create a note stamped with the current time
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            created: Utc::now(),
        }
    }

    /// Path of this note's view page
    pub fn path(&self) -> String {
        format!("/notes/{}", self.id)
    }
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Submitted `title` / `content` form fields.
///
/// Missing fields read as empty strings, like a plain form lookup would.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
}
