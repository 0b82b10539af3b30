//! Generated resumes

use crate::rows::{now, timestamp};
use crate::Result;
use shipcv_core::types::{NewResume, Resume, UserId};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Store a generated resume
pub async fn create(pool: &SqlitePool, resume: NewResume) -> Result<Resume> {
    let id = Uuid::new_v4().to_string();
    let created_at = now();

    sqlx::query(
        "INSERT INTO resumes (id, user_id, title, target_role, template_id, latex_content, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(resume.user_id.as_str())
    .bind(&resume.title)
    .bind(&resume.target_role)
    .bind(&resume.template_id)
    .bind(&resume.latex_content)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(Resume {
        id,
        user_id: resume.user_id,
        title: resume.title,
        target_role: resume.target_role,
        template_id: resume.template_id,
        latex_content: resume.latex_content,
        pdf_url: None,
        created_at: timestamp(created_at)?,
    })
}

/// Number of resumes a user has generated
pub async fn count_by_user(pool: &SqlitePool, user_id: &UserId) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE user_id = ?")
        .bind(user_id.as_str())
        .fetch_one(pool)
        .await?;

    Ok(count)
}
