//! Maintenance commands run from the CLI
//!
//! Each command works on an already migrated pool so it can be driven from
//! `main` or from tests.

use crate::services::AuthService;
use anyhow::{bail, Context};
use shipcv_core::{NewUser, User};
use shipcv_storage::WipeSummary;
use sqlx::SqlitePool;

/// Outcome of [`anonymize_users`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AnonymizeReport {
    pub processed: Vec<String>,
    pub skipped: Vec<String>,
}

/// Empty every table, children first
pub async fn wipe_database(pool: &SqlitePool) -> anyhow::Result<WipeSummary> {
    tracing::info!("Starting database wipe...");

    let summary = shipcv_storage::maintenance::wipe_all(pool)
        .await
        .context("Error wiping database")?;

    tracing::info!(
        resumes = summary.resumes,
        projects = summary.projects,
        platform_connections = summary.platform_connections,
        users = summary.users,
        "Database wiped successfully"
    );

    Ok(summary)
}

/// Anonymize (or delete, with `delete`) the users behind `emails`
///
/// Unknown emails are logged and skipped.
pub async fn anonymize_users(
    pool: &SqlitePool,
    emails: &[String],
    delete: bool,
) -> anyhow::Result<AnonymizeReport> {
    if emails.is_empty() {
        bail!("Usage: shipcv-server anonymize-users <email>... [--delete]");
    }

    let mut report = AnonymizeReport::default();

    for email in emails {
        let Some(user) = shipcv_storage::users::find_by_email(pool, email).await? else {
            tracing::warn!(email = %email, "No user with this email, skipping");
            report.skipped.push(email.clone());
            continue;
        };

        if delete {
            shipcv_storage::users::delete_with_data(pool, &user.id)
                .await
                .with_context(|| format!("Failed to delete {email}"))?;
            tracing::info!(user_id = %user.id, "Deleted user and owned data");
        } else {
            let new_email = shipcv_storage::users::anonymize(pool, &user.id)
                .await
                .with_context(|| format!("Failed to anonymize {email}"))?;
            tracing::info!(user_id = %user.id, email = %new_email, "Anonymized user");
        }

        report.processed.push(email.clone());
    }

    Ok(report)
}

/// Projects that were scored or selected, as pretty JSON
pub async fn check_db(pool: &SqlitePool) -> anyhow::Result<String> {
    let projects = shipcv_storage::projects::get_analyzed_or_selected(pool)
        .await
        .context("Failed to load projects")?;

    tracing::info!("Found {} analyzed or selected projects", projects.len());

    Ok(serde_json::to_string_pretty(&projects)?)
}

/// Create a user who can sign in with `password`
pub async fn add_user(
    pool: &SqlitePool,
    auth_service: &AuthService,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> anyhow::Result<User> {
    if password.is_empty() {
        bail!("Password must not be empty");
    }

    let password_hash = auth_service.hash_password(password)?;

    let mut new_user = NewUser::new(email).with_password_hash(password_hash);
    if let Some(name) = name {
        new_user = new_user.with_name(name);
    }

    let user = shipcv_storage::users::create(pool, new_user)
        .await
        .with_context(|| format!("Failed to create user {email}"))?;

    tracing::info!(user_id = %user.id, email = %user.email, "User created");
    Ok(user)
}
