use anyhow::Context;
use sqlx::SqlitePool;

use crate::plates::repo_types::Plate;

/// Idempotent; returns true only when a new row was written.
pub async fn add(db: &SqlitePool, user_id: i64, plate_id: i64) -> anyhow::Result<bool> {
    let res = sqlx::query("INSERT OR IGNORE INTO favorites (user_id, plate_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(plate_id)
        .execute(db)
        .await
        .context("insert favorite")?;
    Ok(res.rows_affected() > 0)
}

/// A user's favorited plates, most recent plate first.
pub async fn list_for_user(db: &SqlitePool, user_id: i64) -> anyhow::Result<Vec<Plate>> {
    let plates = sqlx::query_as::<_, Plate>(
        r#"
        SELECT p.id, p.user_id, p.restaurant, p.plate, p.category, p.address, p.zipcode,
               p.city, p.state, p.rating, p.comment, p.photo,
               CASE WHEN typeof(p.latitude) IN ('real', 'integer') THEN p.latitude END AS latitude,
               CASE WHEN typeof(p.longitude) IN ('real', 'integer') THEN p.longitude END AS longitude,
               p.created_at
          FROM plates p
          JOIN favorites f ON f.plate_id = p.id
         WHERE f.user_id = ?
         ORDER BY p.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list favorites")?;
    Ok(plates)
}
