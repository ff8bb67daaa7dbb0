use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Longest title accepted on create or update, counted in characters.
pub const TITLE_MAX_CHARS: usize = 200;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The identity record stored in the `users` table. Resolved by the `AuthUser` extractor
/// to confirm the acting identity exists, and joined into listings as the owner's name.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
}

/// Visibility
///
/// Controls who may view a suggestion. Stored as the Postgres enum `suggestion_status`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema, sqlx::Type,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "suggestion_status", rename_all = "lowercase")]
#[ts(export)]
pub enum Visibility {
    /// Viewable by any authenticated identity.
    #[default]
    Public,
    /// Viewable by the owner only.
    Private,
}

impl Visibility {
    pub const ALL: [Visibility; 2] = [Visibility::Public, Visibility::Private];

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// Suggestion
///
/// A record from the `suggestions` table. `user_id` is the owner: it is written once,
/// from the acting identity, when the record is created, and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct Suggestion {
    pub id: Uuid,
    // FK to users.id (Owner).
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub status: Visibility,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,

    // Loaded via a LEFT JOIN on users; absent for inserts and orphaned rows.
    #[sqlx(default)]
    pub owner_name: Option<String>,
}

impl Suggestion {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// NewSuggestion
///
/// A validated create payload bound to its owner. This is the only shape the repository
/// accepts for inserts, so the owner can never come from the client.
#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub status: Visibility,
}

// --- Request Payloads (Input Schemas) ---

/// CreateSuggestionRequest
///
/// Input payload for POST /suggestions. There is deliberately no owner field; keys such as
/// `user` or `user_id` in the submitted JSON are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateSuggestionRequest {
    #[schema(example = "Dark mode for the dashboard")]
    pub title: String,
    pub body: String,
    /// Defaults to `public` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Visibility>,
}

impl CreateSuggestionRequest {
    /// Checks the payload against the record schema and binds it to `owner`.
    pub fn into_new(self, owner: Uuid) -> Result<NewSuggestion, AppError> {
        let title = validate_title(&self.title)?;
        let body = validate_body(&self.body)?;

        Ok(NewSuggestion {
            user_id: owner,
            title,
            body,
            status: self.status.unwrap_or_default(),
        })
    }
}

/// UpdateSuggestionRequest
///
/// Partial update payload for PUT /suggestions/{id}. Enumerates every field an owner may
/// change; anything else in the request body is dropped during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct UpdateSuggestionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Visibility>,
}

impl UpdateSuggestionRequest {
    /// Validates the provided fields, returning the normalized payload.
    pub fn validated(self) -> Result<Self, AppError> {
        Ok(Self {
            title: self.title.as_deref().map(validate_title).transpose()?,
            body: self.body.as_deref().map(validate_body).transpose()?,
            status: self.status,
        })
    }

    /// Applies the provided fields to `suggestion` in place.
    pub fn apply_to(&self, suggestion: &mut Suggestion) {
        if let Some(title) = &self.title {
            suggestion.title = title.clone();
        }
        if let Some(body) = &self.body {
            suggestion.body = body.clone();
        }
        if let Some(status) = self.status {
            suggestion.status = status;
        }
    }
}

fn validate_title(raw: &str) -> Result<String, AppError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::Validation(format!(
            "title must be at most {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_body(raw: &str) -> Result<String, AppError> {
    if raw.trim().is_empty() {
        return Err(AppError::Validation("body is required".to_string()));
    }
    Ok(raw.to_string())
}

// --- View Models (Output) ---

/// SuggestionFormView
///
/// The creation form (GET /suggestions/add): the selectable visibility options and the
/// one pre-selected.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SuggestionFormView {
    pub statuses: Vec<Visibility>,
    pub default_status: Visibility,
}

impl Default for SuggestionFormView {
    fn default() -> Self {
        Self {
            statuses: Visibility::ALL.to_vec(),
            default_status: Visibility::default(),
        }
    }
}

/// SuggestionEditView
///
/// The edit form (GET /suggestions/edit/{id}), pre-filled with the owner's record.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SuggestionEditView {
    pub suggestion: Suggestion,
    pub statuses: Vec<Visibility>,
}

impl From<Suggestion> for SuggestionEditView {
    fn from(suggestion: Suggestion) -> Self {
        Self {
            suggestion,
            statuses: Visibility::ALL.to_vec(),
        }
    }
}
