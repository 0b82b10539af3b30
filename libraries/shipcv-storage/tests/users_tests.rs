//! Integration tests for the users slice
//!
//! Tests:
//! - Creation defaults and email lookup
//! - Credentials
//! - Target role documents
//! - Anonymization and full deletion

mod test_helpers;

use serde_json::json;
use shipcv_core::types::*;
use shipcv_storage::{maintenance, users, StorageError};
use test_helpers::*;

#[tokio::test]
async fn test_create_and_get_user() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "Ada@Example.com").await;

    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.openai_credits, DEFAULT_OPENAI_CREDITS);

    let fetched = users::get_by_id(pool, &user.id).await.unwrap().unwrap();
    assert_eq!(fetched, user);
}

#[tokio::test]
async fn test_find_by_email_ignores_case() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "grace@example.com").await;

    let found = users::find_by_email(pool, "GRACE@example.COM").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    assert!(users::find_by_email(pool, "nobody@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_user(pool, "dup@example.com").await;
    let result = users::create(pool, NewUser::new("DUP@example.com")).await;

    assert!(matches!(result, Err(StorageError::Database(_))));
}

#[tokio::test]
async fn test_password_hash_lookup() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let oauth_user = create_test_user(pool, "oauth@example.com").await;
    assert!(users::get_password_hash(pool, &oauth_user.id).await.unwrap().is_none());

    let user = users::create(
        pool,
        NewUser::new("pw@example.com").with_password_hash("$2b$12$hash"),
    )
    .await
    .unwrap();
    assert_eq!(
        users::get_password_hash(pool, &user.id).await.unwrap().as_deref(),
        Some("$2b$12$hash")
    );

    assert!(users::get_password_hash(pool, &UserId::new("missing"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_set_target_role_stores_document() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_user(pool, "role@example.com").await;
    let description = json!({ "title": "Platform Engineer", "requiredSkills": ["rust"] });

    users::set_target_role(pool, &user.id, Some("Platform Engineer"), Some(&description))
        .await
        .unwrap();

    let fetched = users::get_by_id(pool, &user.id).await.unwrap().unwrap();
    assert_eq!(fetched.target_role.as_deref(), Some("Platform Engineer"));
    assert_eq!(fetched.job_description, Some(description));

    let missing = users::set_target_role(pool, &UserId::new("missing"), None, None).await;
    assert!(matches!(missing, Err(StorageError::NotFound { .. })));
}

#[tokio::test]
async fn test_anonymize_clears_personal_data() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = users::create(
        pool,
        NewUser::new("private@example.com").with_password_hash("hash"),
    )
    .await
    .unwrap();
    create_test_resume(pool, &user.id, "Backend resume").await;

    let email = users::anonymize(pool, &user.id).await.unwrap();
    assert_eq!(email, format!("deleted+{}@example.invalid", user.id));

    let fetched = users::get_by_id(pool, &user.id).await.unwrap().unwrap();
    assert_eq!(fetched.email, email);
    assert!(fetched.name.is_none());
    assert!(users::get_password_hash(pool, &user.id).await.unwrap().is_none());

    // Owned rows survive anonymization
    assert_eq!(maintenance::count_rows(pool, "resumes").await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_with_data_removes_owned_rows_only() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let doomed = create_populated_user(pool, "doomed@example.com").await;
    let keeper = create_populated_user(pool, "keeper@example.com").await;

    assert!(users::delete_with_data(pool, &doomed.id).await.unwrap());
    assert!(!users::delete_with_data(pool, &doomed.id).await.unwrap());

    assert!(users::get_by_id(pool, &keeper.id).await.unwrap().is_some());
    for table in maintenance::WIPE_ORDER {
        assert_eq!(maintenance::count_rows(pool, table).await.unwrap(), 1, "{table}");
    }
}
