use anyhow::Context;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// Unrated plate joined with an owner who can be reminded.
#[derive(Debug, Clone, FromRow)]
pub struct PendingReminder {
    pub plate_id: i64,
    pub plate_name: String,
    pub created_at: OffsetDateTime,
    pub username: String,
    pub email: String,
    pub reminder_freq: String,
}

pub async fn list_pending(db: &SqlitePool) -> anyhow::Result<Vec<PendingReminder>> {
    let rows = sqlx::query_as::<_, PendingReminder>(
        r#"
        SELECT p.id AS plate_id, p.plate AS plate_name, p.created_at,
               u.username, u.email, u.reminder_freq
          FROM plates p
          JOIN users u ON u.id = p.user_id
         WHERE p.rating IS NULL
           AND u.email IS NOT NULL
           AND u.email <> ''
           AND u.reminder_freq <> 'none'
         ORDER BY p.id DESC
        "#,
    )
    .fetch_all(db)
    .await
    .context("list plates pending a reminder")?;
    Ok(rows)
}
