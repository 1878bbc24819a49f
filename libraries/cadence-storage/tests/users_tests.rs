//! Integration tests for the users slice


use cadence_core::SubscriptionTier;
use cadence_storage::users::{self, NewUser, UpdateProfile};
use cadence_storage::StorageError;
use test_helpers::*;

#[tokio::test]
async fn test_create_user_defaults() {
    let test_db = TestDb::new().await;
    let user = create_test_user(test_db.pool(), "Ada@Example.com").await;

    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.subscription_tier, SubscriptionTier::Free);
    assert!(user.avatar.contains("ada@example.com"));
}

#[tokio::test]
async fn test_duplicate_email_rejected_case_insensitively() {
    let test_db = TestDb::new().await;
    create_test_user(test_db.pool(), "ada@example.com").await;

    let result = users::create(
        test_db.pool(),
        NewUser {
            email: "ADA@example.com".to_string(),
            password_hash: "hash".to_string(),
            display_name: "Ada again".to_string(),
            avatar: None,
        },
    )
    .await;

    assert!(matches!(result, Err(StorageError::Duplicate(msg)) if msg == "User already exists"));
}

#[tokio::test]
async fn test_lookup_by_email_returns_hash() {
    let test_db = TestDb::new().await;
    let created = create_test_user(test_db.pool(), "grace@example.com").await;

    let (user, hash) = users::get_with_password_hash(test_db.pool(), "Grace@Example.com")
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(user.id, created.id);
    assert!(hash.starts_with("$2b$"));

    assert!(users::get_by_email(test_db.pool(), "nobody@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_profile_keeps_unset_fields() {
    let test_db = TestDb::new().await;
    let user = create_test_user(test_db.pool(), "linus@example.com").await;

    let updated = users::update_profile(
        test_db.pool(),
        &user.id,
        UpdateProfile {
            display_name: Some("Linus".to_string()),
            avatar: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.display_name, "Linus");
    assert_eq!(updated.avatar, user.avatar);
}

#[tokio::test]
async fn test_refresh_token_set_and_clear() {
    let test_db = TestDb::new().await;
    let id = create_test_user_id(test_db.pool(), "ken@example.com").await;

    users::set_refresh_token(test_db.pool(), &id, Some("token-1"))
        .await
        .unwrap();
    assert_eq!(
        users::get_refresh_token(test_db.pool(), &id).await.unwrap(),
        Some("token-1".to_string())
    );

    users::set_refresh_token(test_db.pool(), &id, None).await.unwrap();
    assert_eq!(users::get_refresh_token(test_db.pool(), &id).await.unwrap(), None);
}

#[tokio::test]
async fn test_subscription_tier_upgrade() {
    let test_db = TestDb::new().await;
    let id = create_test_user_id(test_db.pool(), "barbara@example.com").await;

    users::set_subscription_tier(test_db.pool(), &id, SubscriptionTier::Premium)
        .await
        .unwrap();

    let user = users::get_by_id(test_db.pool(), &id).await.unwrap().unwrap();
    assert!(user.is_premium());
}
