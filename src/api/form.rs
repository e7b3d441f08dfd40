//! Note form extraction
//!
//! Reads `title` and `content` the way an HTML form submission arrives:
//! url-encoded or multipart bodies, with query-string values filling any field
//! the body leaves out. Bodies of any other content type contribute nothing,
//! so those fields read as empty strings. Only a body that claims to be a form
//! and cannot be decoded is a `FormParse` failure.

use super::fallback::AppError;
use crate::notes::NoteForm;
use axum::{
    extract::{FromRequest, Multipart, Query, Request},
    http::header,
    Form,
};
use serde::Deserialize;

/// Fields as submitted; `None` when a source did not mention them
#[derive(Debug, Default, Deserialize)]
struct SubmittedFields {
    title: Option<String>,
    content: Option<String>,
}

impl SubmittedFields {
    /// Fill gaps in `self` from `fallback`
    fn or(self, fallback: SubmittedFields) -> Self {
        Self {
            title: self.title.or(fallback.title),
            content: self.content.or(fallback.content),
        }
    }

    fn into_form(self) -> NoteForm {
        NoteForm {
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
        }
    }
}

/// `title` / `content` collected from the request body and query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFields(pub NoteForm);

impl<S> FromRequest<S> for NoteFields
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = Query::<SubmittedFields>::try_from_uri(req.uri())
            .map(|Query(fields)| fields)
            .unwrap_or_default();

        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let body = if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<SubmittedFields>::from_request(req, state)
                .await
                .map_err(|e| AppError::FormParse(e.body_text()))?;
            fields
        } else if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::FormParse(e.body_text()))?;
            read_multipart(multipart).await?
        } else {
            SubmittedFields::default()
        };

        Ok(NoteFields(body.or(query).into_form()))
    }
}

/// First `title` and `content` parts of a multipart body; other parts are skipped
async fn read_multipart(mut multipart: Multipart) -> Result<SubmittedFields, AppError> {
    let mut fields = SubmittedFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::FormParse(e.body_text()))?
    {
        let slot = match field.name() {
            Some("title") => &mut fields.title,
            Some("content") => &mut fields.content,
            _ => continue,
        };
        let value = field
            .text()
            .await
            .map_err(|e| AppError::FormParse(e.body_text()))?;
        slot.get_or_insert(value);
    }

    Ok(fields)
}
