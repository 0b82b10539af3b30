//! Maintenance command tests
mod common;

use common::TestApp;
use shipcv_core::NewResume;
use shipcv_server::{admin, services::AuthService};
use shipcv_storage::maintenance::{count_rows, WIPE_ORDER};

async fn add_resume(app: &TestApp, user: &shipcv_core::User) {
    shipcv_storage::resumes::create(
        &app.pool,
        NewResume {
            user_id: user.id.clone(),
            title: "Backend resume".to_string(),
            target_role: None,
            template_id: "modern".to_string(),
            latex_content: String::new(),
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_wipe_database_empties_every_table() {
    let app = TestApp::new().await;
    let ada = app.create_user("ada@example.com").await;
    app.connect_platform(&ada, "github", "ada-gh").await;
    add_resume(&app, &ada).await;

    let summary = admin::wipe_database(&app.pool).await.unwrap();

    assert_eq!(summary.users, 1);
    assert_eq!(summary.platform_connections, 1);
    assert_eq!(summary.resumes, 1);
    for table in WIPE_ORDER {
        assert_eq!(count_rows(&app.pool, table).await.unwrap(), 0, "{}", table);
    }
}

#[tokio::test]
async fn test_wipe_database_reports_failure() {
    let app = TestApp::new().await;
    app.pool.close().await;

    assert!(admin::wipe_database(&app.pool).await.is_err());
}

#[tokio::test]
async fn test_anonymize_users_keeps_rows() {
    let app = TestApp::new().await;
    let ada = app.create_user("ada@example.com").await;
    app.connect_platform(&ada, "github", "ada-gh").await;

    let report = admin::anonymize_users(
        &app.pool,
        &["ADA@example.com".to_string(), "ghost@example.com".to_string()],
        false,
    )
    .await
    .unwrap();

    assert_eq!(report.processed, vec!["ADA@example.com".to_string()]);
    assert_eq!(report.skipped, vec!["ghost@example.com".to_string()]);

    let user = shipcv_storage::users::get_by_id(&app.pool, &ada.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.email, format!("deleted+{}@example.invalid", ada.id));
    assert!(user.name.is_none());
    assert_eq!(count_rows(&app.pool, "platform_connections").await.unwrap(), 1);
}

#[tokio::test]
async fn test_anonymize_users_with_delete_removes_owned_data() {
    let app = TestApp::new().await;
    let ada = app.create_user("ada@example.com").await;
    let bob = app.create_user("bob@example.com").await;
    app.connect_platform(&ada, "github", "ada-gh").await;
    app.connect_platform(&bob, "github", "bob-gh").await;
    add_resume(&app, &ada).await;

    admin::anonymize_users(&app.pool, &["ada@example.com".to_string()], true)
        .await
        .unwrap();

    assert!(shipcv_storage::users::get_by_id(&app.pool, &ada.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(count_rows(&app.pool, "resumes").await.unwrap(), 0);
    assert_eq!(count_rows(&app.pool, "platform_connections").await.unwrap(), 1);
    assert_eq!(count_rows(&app.pool, "users").await.unwrap(), 1);
}

#[tokio::test]
async fn test_anonymize_users_requires_emails() {
    let app = TestApp::new().await;

    assert!(admin::anonymize_users(&app.pool, &[], false).await.is_err());
}

#[tokio::test]
async fn test_check_db_lists_scored_projects() {
    let app = TestApp::new().await;
    let ada = app.create_user("ada@example.com").await;

    let scored = shipcv_storage::projects::create(
        &app.pool,
        shipcv_core::NewProject {
            user_id: ada.id.clone(),
            platform: "github".to_string(),
            external_id: "1".to_string(),
            name: "shipcv".to_string(),
            description: None,
            url: "https://github.com/ada/shipcv".to_string(),
        },
    )
    .await
    .unwrap();
    shipcv_storage::projects::set_analysis(&app.pool, &scored.id, Some(0.9), false)
        .await
        .unwrap();

    shipcv_storage::projects::create(
        &app.pool,
        shipcv_core::NewProject {
            user_id: ada.id.clone(),
            platform: "github".to_string(),
            external_id: "2".to_string(),
            name: "dotfiles".to_string(),
            description: None,
            url: "https://github.com/ada/dotfiles".to_string(),
        },
    )
    .await
    .unwrap();

    let output = admin::check_db(&app.pool).await.unwrap();
    let projects: serde_json::Value = serde_json::from_str(&output).unwrap();
    let projects = projects.as_array().unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "shipcv");
}

#[tokio::test]
async fn test_add_user_can_sign_in() {
    let app = TestApp::new().await;
    let auth = AuthService::new("secret".to_string(), 1);

    let user = admin::add_user(&app.pool, &auth, "new@example.com", "hunter22", Some("New"))
        .await
        .unwrap();
    assert_eq!(user.name.as_deref(), Some("New"));

    let hash = shipcv_storage::users::get_password_hash(&app.pool, &user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(auth.verify_password("hunter22", &hash).unwrap());

    assert!(admin::add_user(&app.pool, &auth, "new@example.com", "other", None)
        .await
        .is_err());
}
