//! Imported projects

use crate::rows::{now, timestamp};
use crate::{Result, StorageError};
use shipcv_core::types::{NewProject, Project, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const PROJECT_COLUMNS: &str =
    "id, user_id, platform, external_id, name, description, url, ai_score, is_selected, created_at";

fn map_project(row: &SqliteRow) -> Result<Project> {
    Ok(Project {
        id: row.try_get("id")?,
        user_id: UserId::new(row.try_get::<String, _>("user_id")?),
        platform: row.try_get("platform")?,
        external_id: row.try_get("external_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        url: row.try_get("url")?,
        ai_score: row.try_get("ai_score")?,
        is_selected: row.try_get("is_selected")?,
        created_at: timestamp(row.try_get("created_at")?)?,
    })
}

/// Create a project
pub async fn create(pool: &SqlitePool, project: NewProject) -> Result<Project> {
    let id = Uuid::new_v4().to_string();
    let created_at = now();

    sqlx::query(
        "INSERT INTO projects (id, user_id, platform, external_id, name, description, url, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(project.user_id.as_str())
    .bind(&project.platform)
    .bind(&project.external_id)
    .bind(&project.name)
    .bind(&project.description)
    .bind(&project.url)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(Project {
        id,
        user_id: project.user_id,
        platform: project.platform,
        external_id: project.external_id,
        name: project.name,
        description: project.description,
        url: project.url,
        ai_score: None,
        is_selected: false,
        created_at: timestamp(created_at)?,
    })
}

/// Record an AI score and selection flag
pub async fn set_analysis(
    pool: &SqlitePool,
    id: &str,
    ai_score: Option<f64>,
    is_selected: bool,
) -> Result<()> {
    let result = sqlx::query("UPDATE projects SET ai_score = ?, is_selected = ? WHERE id = ?")
        .bind(ai_score)
        .bind(is_selected)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Project", id));
    }
    Ok(())
}

/// Get a user's projects
pub async fn get_by_user(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Project>> {
    let rows = sqlx::query(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE user_id = ? ORDER BY created_at, rowid"
    ))
    .bind(user_id.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_project).collect()
}

/// Projects that have been scored or picked, across all users
pub async fn get_analyzed_or_selected(pool: &SqlitePool) -> Result<Vec<Project>> {
    let rows = sqlx::query(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects
         WHERE ai_score IS NOT NULL OR is_selected = 1
         ORDER BY created_at, rowid"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_project).collect()
}
