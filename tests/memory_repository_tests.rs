use suggestion_board::{
    MemoryRepository,
    models::{NewSuggestion, UpdateSuggestionRequest, User, Visibility},
    repository::{RepoError, Repository},
};
use uuid::Uuid;

const OWNER: Uuid = Uuid::from_u128(100);
const OTHER: Uuid = Uuid::from_u128(200);

fn new_suggestion(title: &str, status: Visibility) -> NewSuggestion {
    NewSuggestion {
        user_id: OWNER,
        title: title.to_string(),
        body: "body".to_string(),
        status,
    }
}

#[tokio::test]
async fn test_create_assigns_id_and_timestamps() {
    let repo = MemoryRepository::new();

    let a = repo
        .create_suggestion(new_suggestion("a", Visibility::Public))
        .await
        .unwrap();
    let b = repo
        .create_suggestion(new_suggestion("b", Visibility::Public))
        .await
        .unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(a.created_at, a.updated_at);
    assert_eq!(a.user_id, OWNER);
}

#[tokio::test]
async fn test_update_and_delete_require_matching_owner() {
    let repo = MemoryRepository::new();
    let s = repo
        .create_suggestion(new_suggestion("owned", Visibility::Public))
        .await
        .unwrap();
    let req = UpdateSuggestionRequest {
        status: Some(Visibility::Private),
        ..UpdateSuggestionRequest::default()
    };

    assert!(
        repo.update_suggestion(s.id, OTHER, req.clone())
            .await
            .unwrap()
            .is_none()
    );
    assert!(!repo.delete_suggestion(s.id, OTHER).await.unwrap());

    let updated = repo
        .update_suggestion(s.id, OWNER, req)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, Visibility::Private);
    assert!(updated.updated_at >= s.updated_at);

    assert!(repo.delete_suggestion(s.id, OWNER).await.unwrap());
    assert!(repo.get_suggestion(s.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_owner_name_is_joined_when_user_exists() {
    let repo = MemoryRepository::new();
    repo.insert_user(User {
        id: OWNER,
        display_name: "Owner".to_string(),
    })
    .await;
    let s = repo
        .create_suggestion(new_suggestion("named", Visibility::Public))
        .await
        .unwrap();

    let fetched = repo.get_suggestion(s.id).await.unwrap().unwrap();
    assert_eq!(fetched.owner_name.as_deref(), Some("Owner"));

    let listed = repo.list_public(None).await.unwrap();
    assert_eq!(listed[0].owner_name.as_deref(), Some("Owner"));
}

#[tokio::test]
async fn test_failing_store_fails_every_call() {
    let repo = MemoryRepository::new_failing();

    assert!(matches!(
        repo.list_public(None).await,
        Err(RepoError::Unavailable(_))
    ));
    assert!(repo.get_suggestion(Uuid::new_v4()).await.is_err());
    assert!(repo.get_user(OWNER).await.is_err());
    assert!(
        repo.create_suggestion(new_suggestion("x", Visibility::Public))
            .await
            .is_err()
    );
}
