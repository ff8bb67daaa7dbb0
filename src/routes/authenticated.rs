use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Every suggestion route. The router above wraps this module in the `AuthUser` layer, and
/// each handler also takes `AuthUser` as an argument so the acting identity reaches the
/// access rules explicitly.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /suggestions/add
        // Creation form. Registered before `/suggestions/{id}`; static segments win anyway.
        .route("/suggestions/add", get(handlers::show_add_form))
        // GET/POST /suggestions
        // Public listing, newest first; creation owned by the caller.
        .route(
            "/suggestions",
            get(handlers::list_suggestions).post(handlers::create_suggestion),
        )
        // GET/PUT/DELETE /suggestions/{id}
        // Show is visibility-checked; update and delete are owner-only.
        .route(
            "/suggestions/{id}",
            get(handlers::show_suggestion)
                .put(handlers::update_suggestion)
                .delete(handlers::delete_suggestion),
        )
        // GET /suggestions/edit/{id}
        // Edit form for the owner; everyone else is redirected to the listing.
        .route("/suggestions/edit/{id}", get(handlers::show_edit_form))
        // GET /suggestions/user/{user_id}
        // Public suggestions of one user.
        .route(
            "/suggestions/user/{user_id}",
            get(handlers::list_user_suggestions),
        )
        // GET /dashboard
        // The caller's own suggestions; redirect target after create/update/delete.
        .route("/dashboard", get(handlers::get_dashboard))
}
