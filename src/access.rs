//! Suggestion access rules.
//!
//! Decides, for a resolved record and an acting identity, whether the record may be shown
//! or mutated. Handlers translate the decisions into views, redirects and error views.

use uuid::Uuid;

use crate::{
    error::AppError,
    models::{Suggestion, Visibility},
};

/// Where a non-owner lands after attempting to edit, update or delete.
pub const LISTING_PATH: &str = "/suggestions";

/// Where an owner lands after a successful create, update or delete.
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewDecision {
    Show,
    /// Private record, different viewer.
    Deny,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutateDecision {
    Allow,
    /// Silent redirect to the listing page.
    Redirect,
    NotFound,
}

/// can_view
///
/// Public records are visible to everyone; private records only to their owner.
pub fn can_view(suggestion: Option<&Suggestion>, actor: Uuid) -> ViewDecision {
    match suggestion {
        None => ViewDecision::NotFound,
        Some(s) if s.status == Visibility::Public => ViewDecision::Show,
        Some(s) if s.is_owned_by(actor) => ViewDecision::Show,
        Some(_) => ViewDecision::Deny,
    }
}

/// can_mutate
///
/// Only the owner may edit, update or delete, whatever the record's visibility.
pub fn can_mutate(suggestion: Option<&Suggestion>, actor: Uuid) -> MutateDecision {
    match suggestion {
        None => MutateDecision::NotFound,
        Some(s) if s.is_owned_by(actor) => MutateDecision::Allow,
        Some(_) => MutateDecision::Redirect,
    }
}

/// Resolves a lookup into the record the actor may see. `Deny` and `NotFound` collapse
/// into the same error so a private record's existence is not revealed.
pub fn visible_to(suggestion: Option<Suggestion>, actor: Uuid) -> Result<Suggestion, AppError> {
    match (can_view(suggestion.as_ref(), actor), suggestion) {
        (ViewDecision::Show, Some(s)) => Ok(s),
        _ => Err(AppError::NotFound),
    }
}

/// list_public
///
/// Keeps public records (optionally of a single owner), newest first.
pub fn list_public<I>(suggestions: I, owner: Option<Uuid>) -> Vec<Suggestion>
where
    I: IntoIterator<Item = Suggestion>,
{
    let listed = suggestions
        .into_iter()
        .filter(|s| s.status == Visibility::Public)
        .filter(|s| owner.is_none_or(|o| s.is_owned_by(o)))
        .collect();
    newest_first(listed)
}

/// list_owned
///
/// Every record of `owner`, public and private, newest first.
pub fn list_owned<I>(suggestions: I, owner: Uuid) -> Vec<Suggestion>
where
    I: IntoIterator<Item = Suggestion>,
{
    let listed = suggestions
        .into_iter()
        .filter(|s| s.is_owned_by(owner))
        .collect();
    newest_first(listed)
}

fn newest_first(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    suggestions
}
