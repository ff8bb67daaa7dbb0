use crate::{
    AppState,
    access::{self, DASHBOARD_PATH, LISTING_PATH, MutateDecision},
    auth::AuthUser,
    error::AppError,
    models::{
        CreateSuggestionRequest, Suggestion, SuggestionEditView, SuggestionFormView,
        UpdateSuggestionRequest,
    },
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

/// Path ids that are not UUIDs cannot name a record.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

// --- Listings ---

/// list_suggestions
///
/// Lists every public suggestion, newest first.
#[utoipa::path(
    get,
    path = "/suggestions",
    responses(
        (status = 200, description = "Public suggestions", body = [Suggestion]),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_suggestions(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Suggestion>>, AppError> {
    let suggestions = state.repo.list_public(None).await?;
    Ok(Json(suggestions))
}

/// list_user_suggestions
///
/// Lists the public suggestions of one user, newest first. Private records never appear,
/// even when the caller is that user; the dashboard is where owners see those.
#[utoipa::path(
    get,
    path = "/suggestions/user/{user_id}",
    params(("user_id" = Uuid, Path, description = "Owner ID")),
    responses((status = 200, description = "Public suggestions of the user", body = [Suggestion]))
)]
pub async fn list_user_suggestions(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Suggestion>>, AppError> {
    // An id that cannot name a user owns nothing.
    let Ok(owner) = Uuid::parse_str(&user_id) else {
        return Ok(Json(Vec::new()));
    };
    let suggestions = state.repo.list_public(Some(owner)).await?;
    Ok(Json(suggestions))
}

/// get_dashboard
///
/// The caller's own suggestions, public and private. Target of every successful mutation.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses((status = 200, description = "My suggestions", body = [Suggestion]))
)]
pub async fn get_dashboard(
    AuthUser { id }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Suggestion>>, AppError> {
    let suggestions = state.repo.list_owned(id).await?;
    Ok(Json(suggestions))
}

// --- Single Record ---

/// show_suggestion
///
/// Shows one suggestion if it is public or owned by the caller. A private suggestion of
/// someone else gets the same 404 view as a missing one.
#[utoipa::path(
    get,
    path = "/suggestions/{id}",
    params(("id" = Uuid, Path, description = "Suggestion ID")),
    responses(
        (status = 200, description = "Found", body = Suggestion),
        (status = 404, description = "Not found or not visible")
    )
)]
pub async fn show_suggestion(
    AuthUser { id: actor }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Suggestion>, AppError> {
    let id = parse_id(&id)?;
    let found = state.repo.get_suggestion(id).await?;
    let suggestion = access::visible_to(found, actor)?;
    Ok(Json(suggestion))
}

/// show_add_form
///
/// The creation form. Identity is required even though nothing is read.
#[utoipa::path(
    get,
    path = "/suggestions/add",
    responses((status = 200, description = "Creation form", body = SuggestionFormView))
)]
pub async fn show_add_form(_user: AuthUser) -> Json<SuggestionFormView> {
    Json(SuggestionFormView::default())
}

/// show_edit_form
///
/// The edit form, for the owner only. Anyone else is sent back to the listing.
#[utoipa::path(
    get,
    path = "/suggestions/edit/{id}",
    params(("id" = Uuid, Path, description = "Suggestion ID")),
    responses(
        (status = 200, description = "Edit form", body = SuggestionEditView),
        (status = 303, description = "Not the owner, redirected to /suggestions"),
        (status = 404, description = "Not found")
    )
)]
pub async fn show_edit_form(
    AuthUser { id: actor }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let found = state.repo.get_suggestion(id).await?;

    match (access::can_mutate(found.as_ref(), actor), found) {
        (MutateDecision::Allow, Some(suggestion)) => {
            Ok(Json(SuggestionEditView::from(suggestion)).into_response())
        }
        (MutateDecision::Redirect, _) => Ok(Redirect::to(LISTING_PATH).into_response()),
        _ => Err(AppError::NotFound),
    }
}

// --- Owner Actions ---

/// create_suggestion
///
/// Creates a suggestion owned by the caller. The owner is taken from `AuthUser`; the
/// payload has no way to name one.
#[utoipa::path(
    post,
    path = "/suggestions",
    request_body = CreateSuggestionRequest,
    responses(
        (status = 303, description = "Created, redirected to /dashboard"),
        (status = 422, description = "Invalid payload")
    )
)]
pub async fn create_suggestion(
    AuthUser { id }: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateSuggestionRequest>, JsonRejection>,
) -> Result<Redirect, AppError> {
    let Json(payload) = payload?;
    let new = payload.into_new(id)?;
    let created = state.repo.create_suggestion(new).await?;

    tracing::info!(suggestion_id = %created.id, owner = %id, "suggestion created");
    Ok(Redirect::to(DASHBOARD_PATH))
}

/// update_suggestion
///
/// Applies the provided fields if the caller owns the record. A non-owner's payload is
/// discarded unread and the caller is redirected to the listing. The body is only
/// inspected once ownership is settled, so a malformed body from a non-owner still
/// redirects and one aimed at a missing record still gets the 404 view.
#[utoipa::path(
    put,
    path = "/suggestions/{id}",
    params(("id" = Uuid, Path, description = "Suggestion ID")),
    request_body = UpdateSuggestionRequest,
    responses(
        (status = 303, description = "Updated (to /dashboard) or not the owner (to /suggestions)"),
        (status = 404, description = "Not found"),
        (status = 422, description = "Invalid payload")
    )
)]
pub async fn update_suggestion(
    AuthUser { id: actor }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSuggestionRequest>, JsonRejection>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id)?;
    let found = state.repo.get_suggestion(id).await?;

    match access::can_mutate(found.as_ref(), actor) {
        MutateDecision::NotFound => return Err(AppError::NotFound),
        MutateDecision::Redirect => {
            tracing::debug!(suggestion_id = %id, actor = %actor, "update by non-owner ignored");
            return Ok(Redirect::to(LISTING_PATH));
        }
        MutateDecision::Allow => {}
    }

    let Json(payload) = payload?;
    let payload = payload.validated()?;
    // `None` here means the record vanished between the read and the write.
    state
        .repo
        .update_suggestion(id, actor, payload)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(suggestion_id = %id, owner = %actor, "suggestion updated");
    Ok(Redirect::to(DASHBOARD_PATH))
}

/// delete_suggestion
///
/// Permanently removes the record if the caller owns it.
#[utoipa::path(
    delete,
    path = "/suggestions/{id}",
    params(("id" = Uuid, Path, description = "Suggestion ID")),
    responses(
        (status = 303, description = "Deleted (to /dashboard) or not the owner (to /suggestions)"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_suggestion(
    AuthUser { id: actor }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id)?;
    let found = state.repo.get_suggestion(id).await?;

    match access::can_mutate(found.as_ref(), actor) {
        MutateDecision::NotFound => Err(AppError::NotFound),
        MutateDecision::Redirect => {
            tracing::debug!(suggestion_id = %id, actor = %actor, "delete by non-owner ignored");
            Ok(Redirect::to(LISTING_PATH))
        }
        MutateDecision::Allow => {
            if !state.repo.delete_suggestion(id, actor).await? {
                return Err(AppError::NotFound);
            }
            tracing::info!(suggestion_id = %id, owner = %actor, "suggestion deleted");
            Ok(Redirect::to(DASHBOARD_PATH))
        }
    }
}
