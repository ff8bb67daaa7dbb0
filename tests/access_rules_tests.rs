use chrono::{Duration, TimeZone, Utc};
use suggestion_board::{
    AppError,
    access::{self, MutateDecision, ViewDecision},
    models::{Suggestion, Visibility},
};
use uuid::Uuid;

const OWNER: Uuid = Uuid::from_u128(1);
const OTHER: Uuid = Uuid::from_u128(2);

fn suggestion(owner: Uuid, status: Visibility, age_minutes: i64) -> Suggestion {
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let created_at = base - Duration::minutes(age_minutes);
    Suggestion {
        id: Uuid::new_v4(),
        user_id: owner,
        title: format!("suggestion {age_minutes}"),
        body: "body".to_string(),
        status,
        created_at,
        updated_at: created_at,
        owner_name: None,
    }
}

// --- can_view ---

#[test]
fn test_public_suggestion_visible_to_everyone() {
    let s = suggestion(OWNER, Visibility::Public, 0);
    assert_eq!(access::can_view(Some(&s), OWNER), ViewDecision::Show);
    assert_eq!(access::can_view(Some(&s), OTHER), ViewDecision::Show);
    assert_eq!(
        access::can_view(Some(&s), Uuid::new_v4()),
        ViewDecision::Show
    );
}

#[test]
fn test_private_suggestion_visible_to_owner_only() {
    let s = suggestion(OWNER, Visibility::Private, 0);
    assert_eq!(access::can_view(Some(&s), OWNER), ViewDecision::Show);
    assert_eq!(access::can_view(Some(&s), OTHER), ViewDecision::Deny);
}

#[test]
fn test_missing_suggestion_is_not_found() {
    assert_eq!(access::can_view(None, OWNER), ViewDecision::NotFound);
    assert_eq!(access::can_mutate(None, OWNER), MutateDecision::NotFound);
}

#[test]
fn test_visible_to_conflates_deny_with_not_found() {
    let private = suggestion(OWNER, Visibility::Private, 0);

    let denied = access::visible_to(Some(private.clone()), OTHER);
    assert!(matches!(denied, Err(AppError::NotFound)));

    let missing = access::visible_to(None, OTHER);
    assert!(matches!(missing, Err(AppError::NotFound)));

    let shown = access::visible_to(Some(private.clone()), OWNER).unwrap();
    assert_eq!(shown.id, private.id);
}

// --- can_mutate ---

#[test]
fn test_only_owner_may_mutate_regardless_of_visibility() {
    for status in Visibility::ALL {
        let s = suggestion(OWNER, status, 0);
        assert_eq!(access::can_mutate(Some(&s), OWNER), MutateDecision::Allow);
        assert_eq!(
            access::can_mutate(Some(&s), OTHER),
            MutateDecision::Redirect
        );
    }
}

// --- listings ---

#[test]
fn test_list_public_filters_and_sorts_newest_first() {
    let oldest = suggestion(OWNER, Visibility::Public, 30);
    let newest = suggestion(OTHER, Visibility::Public, 1);
    let middle = suggestion(OWNER, Visibility::Public, 10);
    let hidden = suggestion(OWNER, Visibility::Private, 0);

    let listed = access::list_public(
        vec![oldest.clone(), hidden, newest.clone(), middle.clone()],
        None,
    );

    let ids: Vec<Uuid> = listed.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);
    assert!(
        listed
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at)
    );
}

#[test]
fn test_list_public_by_owner_returns_only_that_owners_public_records() {
    let mine_public = suggestion(OWNER, Visibility::Public, 5);
    let mine_private = suggestion(OWNER, Visibility::Private, 4);
    let theirs = suggestion(OTHER, Visibility::Public, 3);

    let listed = access::list_public(vec![mine_public.clone(), mine_private, theirs], Some(OWNER));

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine_public.id);
}

#[test]
fn test_list_owned_includes_private_records() {
    let public = suggestion(OWNER, Visibility::Public, 10);
    let private = suggestion(OWNER, Visibility::Private, 2);
    let theirs = suggestion(OTHER, Visibility::Private, 1);

    let listed = access::list_owned(vec![public.clone(), theirs, private.clone()], OWNER);

    let ids: Vec<Uuid> = listed.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![private.id, public.id]);
}

#[test]
fn test_list_public_of_empty_input_is_empty() {
    assert!(access::list_public(Vec::new(), None).is_empty());
}
