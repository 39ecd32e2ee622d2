use anyhow::Context;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::repo_types::{NewPlate, Plate};

// Legacy rows may hold text in the coordinate columns; those read back as NULL.
const PLATE_COLUMNS: &str = r#"
    id, user_id, restaurant, plate, category, address, zipcode, city, state,
    rating, comment, photo,
    CASE WHEN typeof(latitude) IN ('real', 'integer') THEN latitude END AS latitude,
    CASE WHEN typeof(longitude) IN ('real', 'integer') THEN longitude END AS longitude,
    created_at
"#;

pub async fn insert(db: &SqlitePool, new: &NewPlate) -> anyhow::Result<i64> {
    insert_at(db, new, OffsetDateTime::now_utc()).await
}

/// Insert with an explicit creation time.
pub async fn insert_at(
    db: &SqlitePool,
    new: &NewPlate,
    created_at: OffsetDateTime,
) -> anyhow::Result<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO plates (user_id, restaurant, plate, category, address, zipcode, city, state,
                            rating, comment, photo, latitude, longitude, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new.user_id)
    .bind(&new.restaurant)
    .bind(&new.plate)
    .bind(&new.category)
    .bind(&new.address)
    .bind(&new.zipcode)
    .bind(&new.city)
    .bind(&new.state)
    .bind(new.rating)
    .bind(&new.comment)
    .bind(&new.photo)
    .bind(new.latitude)
    .bind(new.longitude)
    .bind(created_at)
    .execute(db)
    .await
    .context("insert plate")?
    .last_insert_rowid();
    Ok(id)
}

pub async fn get(db: &SqlitePool, id: i64) -> anyhow::Result<Option<Plate>> {
    let sql = format!("SELECT {PLATE_COLUMNS} FROM plates WHERE id = ?");
    let plate = sqlx::query_as::<_, Plate>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
        .with_context(|| format!("get plate {}", id))?;
    Ok(plate)
}

/// Every plate, most recent first.
pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<Plate>> {
    let sql = format!("SELECT {PLATE_COLUMNS} FROM plates ORDER BY id DESC");
    let plates = sqlx::query_as::<_, Plate>(&sql)
        .fetch_all(db)
        .await
        .context("list plates")?;
    Ok(plates)
}

pub async fn list_by_zipcode(db: &SqlitePool, zipcode: &str) -> anyhow::Result<Vec<Plate>> {
    let sql = format!("SELECT {PLATE_COLUMNS} FROM plates WHERE zipcode = ? ORDER BY id DESC");
    let plates = sqlx::query_as::<_, Plate>(&sql)
        .bind(zipcode)
        .fetch_all(db)
        .await
        .context("list plates by zipcode")?;
    Ok(plates)
}

/// Sets rating and comment on a plate that has not been rated yet.
///
/// Returns false when no plate has this id or the plate already carries a
/// rating.
pub async fn update_rating_and_comment(
    db: &SqlitePool,
    id: i64,
    rating: i64,
    comment: Option<&str>,
) -> anyhow::Result<bool> {
    let res = sqlx::query("UPDATE plates SET rating = ?, comment = ? WHERE id = ? AND rating IS NULL")
        .bind(rating)
        .bind(comment)
        .bind(id)
        .execute(db)
        .await
        .with_context(|| format!("rate plate {}", id))?;
    Ok(res.rows_affected() > 0)
}

#[cfg(test)]
pub(crate) fn sample(restaurant: &str, plate: &str) -> NewPlate {
    NewPlate {
        restaurant: restaurant.into(),
        plate: plate.into(),
        address: "1 Main St".into(),
        ..Default::default()
    }
}
