use crate::{
    access,
    models::{NewSuggestion, Suggestion, UpdateSuggestionRequest, User},
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// RepoError
///
/// Any failure of the storage layer. Handlers never inspect the cause; they map it to
/// the server-error view.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository Trait
///
/// The persistence contract for suggestions and the users that own them.
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Listings ---
    // Public records, optionally of one owner, newest first.
    async fn list_public(&self, owner: Option<Uuid>) -> RepoResult<Vec<Suggestion>>;
    // All records of one owner regardless of visibility (dashboard).
    async fn list_owned(&self, owner: Uuid) -> RepoResult<Vec<Suggestion>>;

    // --- Single Record ---
    // Plain lookup, no visibility check. Callers apply the access rules.
    async fn get_suggestion(&self, id: Uuid) -> RepoResult<Option<Suggestion>>;

    // --- Owner Actions ---
    async fn create_suggestion(&self, new: NewSuggestion) -> RepoResult<Suggestion>;
    // Owner-Only: `None` when no row matches both id and owner.
    async fn update_suggestion(
        &self,
        id: Uuid,
        owner: Uuid,
        req: UpdateSuggestionRequest,
    ) -> RepoResult<Option<Suggestion>>;
    // Owner-Only: returns true if a row was removed.
    async fn delete_suggestion(&self, id: Uuid, owner: Uuid) -> RepoResult<bool>;

    // --- Users ---
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

// Every read joins the owner's display name.
const SELECT_SUGGESTION: &str = r#"
    SELECT
        s.id, s.user_id, s.title, s.body, s.status, s.created_at, s.updated_at,
        u.display_name AS owner_name
    FROM suggestions s
    LEFT JOIN users u ON u.id = s.user_id
"#;

/// PostgresRepository
///
/// The `Repository` implementation backed by PostgreSQL (schema in `migrations/`).
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// list_public
    ///
    /// Strictly enforces `status = 'public'` in the base query; the owner filter is bound
    /// as a parameter.
    async fn list_public(&self, owner: Option<Uuid>) -> RepoResult<Vec<Suggestion>> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(SELECT_SUGGESTION);
        builder.push(" WHERE s.status = 'public'");

        if let Some(owner) = owner {
            builder.push(" AND s.user_id = ");
            builder.push_bind(owner);
        }

        builder.push(" ORDER BY s.created_at DESC");

        let suggestions = builder
            .build_query_as::<Suggestion>()
            .fetch_all(&self.pool)
            .await?;
        Ok(suggestions)
    }

    async fn list_owned(&self, owner: Uuid) -> RepoResult<Vec<Suggestion>> {
        let query = format!("{SELECT_SUGGESTION} WHERE s.user_id = $1 ORDER BY s.created_at DESC");
        let suggestions = sqlx::query_as::<_, Suggestion>(&query)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(suggestions)
    }

    async fn get_suggestion(&self, id: Uuid) -> RepoResult<Option<Suggestion>> {
        let query = format!("{SELECT_SUGGESTION} WHERE s.id = $1");
        let suggestion = sqlx::query_as::<_, Suggestion>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(suggestion)
    }

    /// create_suggestion
    ///
    /// The id and both timestamps are assigned here; `user_id` comes from `NewSuggestion`,
    /// which only the authenticated handler can build.
    async fn create_suggestion(&self, new: NewSuggestion) -> RepoResult<Suggestion> {
        let suggestion = sqlx::query_as::<_, Suggestion>(
            r#"
            INSERT INTO suggestions (id, user_id, title, body, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id, user_id, title, body, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.title)
        .bind(new.body)
        .bind(new.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(suggestion)
    }

    /// update_suggestion
    ///
    /// Uses `COALESCE` so only the provided fields change. The `user_id` predicate keeps the
    /// write owner-only even if a caller skipped the access check.
    async fn update_suggestion(
        &self,
        id: Uuid,
        owner: Uuid,
        req: UpdateSuggestionRequest,
    ) -> RepoResult<Option<Suggestion>> {
        let suggestion = sqlx::query_as::<_, Suggestion>(
            r#"
            UPDATE suggestions
            SET title = COALESCE($3, title),
                body = COALESCE($4, body),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, body, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(req.title)
        .bind(req.body)
        .bind(req.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(suggestion)
    }

    async fn delete_suggestion(&self, id: Uuid, owner: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM suggestions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, display_name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

/// MemoryRepository
///
/// An in-process `Repository` used by the test suites. Listings go through the same
/// `access` rules the Postgres queries encode. `new_failing` builds a store whose every
/// call fails, to exercise the server-error path.
#[derive(Default)]
pub struct MemoryRepository {
    suggestions: RwLock<HashMap<Uuid, Suggestion>>,
    users: RwLock<HashMap<Uuid, User>>,
    should_fail: bool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Registers a user so the identity layer can resolve it.
    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Stores a record as-is, keeping its id and timestamps. Lets tests control ordering.
    pub async fn insert_suggestion(&self, suggestion: Suggestion) {
        self.suggestions
            .write()
            .await
            .insert(suggestion.id, suggestion);
    }

    fn check(&self) -> RepoResult<()> {
        if self.should_fail {
            return Err(RepoError::Unavailable(
                "simulated storage failure".to_string(),
            ));
        }
        Ok(())
    }

    async fn with_owner_name(&self, mut suggestion: Suggestion) -> Suggestion {
        suggestion.owner_name = self
            .users
            .read()
            .await
            .get(&suggestion.user_id)
            .map(|u| u.display_name.clone());
        suggestion
    }

    async fn with_owner_names(&self, suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
        let users = self.users.read().await;
        suggestions
            .into_iter()
            .map(|mut s| {
                s.owner_name = users.get(&s.user_id).map(|u| u.display_name.clone());
                s
            })
            .collect()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn list_public(&self, owner: Option<Uuid>) -> RepoResult<Vec<Suggestion>> {
        self.check()?;
        let all: Vec<Suggestion> = self.suggestions.read().await.values().cloned().collect();
        Ok(self
            .with_owner_names(access::list_public(all, owner))
            .await)
    }

    async fn list_owned(&self, owner: Uuid) -> RepoResult<Vec<Suggestion>> {
        self.check()?;
        let all: Vec<Suggestion> = self.suggestions.read().await.values().cloned().collect();
        Ok(self.with_owner_names(access::list_owned(all, owner)).await)
    }

    async fn get_suggestion(&self, id: Uuid) -> RepoResult<Option<Suggestion>> {
        self.check()?;
        let found = self.suggestions.read().await.get(&id).cloned();
        match found {
            Some(s) => Ok(Some(self.with_owner_name(s).await)),
            None => Ok(None),
        }
    }

    async fn create_suggestion(&self, new: NewSuggestion) -> RepoResult<Suggestion> {
        self.check()?;
        let now = Utc::now();
        let suggestion = Suggestion {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            title: new.title,
            body: new.body,
            status: new.status,
            created_at: now,
            updated_at: now,
            owner_name: None,
        };
        self.suggestions
            .write()
            .await
            .insert(suggestion.id, suggestion.clone());
        Ok(suggestion)
    }

    async fn update_suggestion(
        &self,
        id: Uuid,
        owner: Uuid,
        req: UpdateSuggestionRequest,
    ) -> RepoResult<Option<Suggestion>> {
        self.check()?;
        let mut suggestions = self.suggestions.write().await;
        let Some(stored) = suggestions.get_mut(&id).filter(|s| s.is_owned_by(owner)) else {
            return Ok(None);
        };
        req.apply_to(stored);
        stored.updated_at = Utc::now();
        let updated = stored.clone();
        drop(suggestions);
        Ok(Some(self.with_owner_name(updated).await))
    }

    async fn delete_suggestion(&self, id: Uuid, owner: Uuid) -> RepoResult<bool> {
        self.check()?;
        let mut suggestions = self.suggestions.write().await;
        if suggestions.get(&id).is_some_and(|s| s.is_owned_by(owner)) {
            suggestions.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        self.check()?;
        Ok(self.users.read().await.get(&id).cloned())
    }
}
