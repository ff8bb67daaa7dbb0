use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    repository::RepositoryState,
};

/// Header accepted in `Env::Local` in place of a bearer token.
pub const LOCAL_USER_HEADER: &str = "x-user-id";

/// Claims
///
/// The payload expected inside an HS256 JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the UUID of the user, looked up in the `users` table.
    pub sub: Uuid,
    /// Expiration Time (exp): tokens past this instant are rejected.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

/// AuthUser
///
/// The acting identity of a request. Every suggestion handler receives it as an explicit
/// argument and passes `id` into the access rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

/// AuthUser Extractor Implementation
///
/// Resolution order:
/// 1. Local Bypass: in `Env::Local`, an `x-user-id` header naming an existing user.
/// 2. Token Validation: `Authorization: Bearer <jwt>`, signature and expiry checked.
/// 3. DB Lookup: the subject must still exist in storage.
///
/// Rejection: 401 on any identity failure, 500 if the user lookup itself fails.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        // 1. Local Development Bypass
        if config.env == Env::Local {
            let bypass_id = parts
                .headers
                .get(LOCAL_USER_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|raw| Uuid::parse_str(raw).ok());

            if let Some(user_id) = bypass_id {
                if let Some(user) = lookup_user(&repo, user_id).await? {
                    return Ok(user);
                }
            }
        }
        // Production, or a bypass that did not resolve: fall through to the JWT flow.

        // 2. Token Extraction
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        // The default validation is HS256 with `exp` required and checked.
        let token_data =
            decode::<Claims>(token, &decoding_key, &Validation::default()).map_err(|e| {
                tracing::debug!("rejected bearer token: {:?}", e.kind());
                StatusCode::UNAUTHORIZED
            })?;

        // 3. Database Lookup
        // A valid token whose user has since been removed is not an identity.
        lookup_user(&repo, token_data.claims.sub)
            .await?
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

async fn lookup_user(repo: &RepositoryState, id: Uuid) -> Result<Option<AuthUser>, StatusCode> {
    match repo.get_user(id).await {
        Ok(user) => Ok(user.map(|u| AuthUser { id: u.id })),
        Err(e) => {
            tracing::error!("identity lookup failed: {:?}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
