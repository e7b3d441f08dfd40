//! NoteStore trait and its in-memory implementation
//!
//! Every operation takes the map lock exactly once. Read-modify-write
//! sequences (`update`, `delete`) hold a single write guard from lookup to
//! mutation, so concurrent writers to the same id never interleave.
//! Callers get owned copies back and render after the guard is dropped.

use crate::notes::models::Note;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors returned by note storage
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Note not found: {0}")]
    NotFound(String),
}

/// Abstract interface over the note collection.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Get a note by id
    async fn get(&self, id: &str) -> Result<Note, StoreError>;

    /// Snapshot of every note, in no particular order
    async fn list(&self) -> Vec<Note>;

    /// Insert a note under its own id, replacing any existing entry
    async fn put(&self, note: Note);

    /// Replace title and content of an existing note, keeping `id` and `created`
    async fn update(&self, id: &str, title: String, content: String) -> Result<Note, StoreError>;

    /// Remove a note, returning what was stored
    async fn delete(&self, id: &str) -> Result<Note, StoreError>;

    /// Number of stored notes
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Process-local note store behind one reader/writer lock.
#[derive(Debug, Default)]
pub struct InMemoryNoteStore {
    notes: RwLock<HashMap<String, Note>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn get(&self, id: &str) -> Result<Note, StoreError> {
        self.notes
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list(&self) -> Vec<Note> {
        self.notes.read().await.values().cloned().collect()
    }

    async fn put(&self, note: Note) {
        self.notes.write().await.insert(note.id.clone(), note);
    }

    async fn update(&self, id: &str, title: String, content: String) -> Result<Note, StoreError> {
        let mut notes = self.notes.write().await;
        let existing = notes
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let updated = Note {
            id: existing.id.clone(),
            title,
            content,
            created: existing.created,
        };
        notes.insert(updated.id.clone(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<Note, StoreError> {
        self.notes
            .write()
            .await
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn len(&self) -> usize {
        self.notes.read().await.len()
    }
}
