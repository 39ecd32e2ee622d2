use crate::auth::repo_types::User;
use crate::reminders::schedule::ReminderFreq;
use sqlx::SqlitePool;
use time::OffsetDateTime;

impl User {
    /// Find a user by username.
    pub async fn find_by_username(db: &SqlitePool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, reminder_freq, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, reminder_freq, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password. A taken username surfaces as a
    /// unique-constraint `sqlx::Error` inside the returned error.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
    ) -> anyhow::Result<User> {
        let id = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, email, reminder_freq, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(email)
        .bind(ReminderFreq::default().as_str())
        .bind(OffsetDateTime::now_utc())
        .execute(db)
        .await?
        .last_insert_rowid();

        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user {} vanished after insert", id))
    }

    /// Returns false when the user does not exist.
    pub async fn update_reminders(
        db: &SqlitePool,
        id: i64,
        freq: ReminderFreq,
        email: Option<&str>,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE users
               SET reminder_freq = ?, email = COALESCE(?, email)
             WHERE id = ?
            "#,
        )
        .bind(freq.as_str())
        .bind(email)
        .bind(id)
        .execute(db)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn create_and_find() {
        let db = test_pool().await;
        let user = User::create(&db, "alice", "hash", Some("alice@example.com"))
            .await
            .unwrap();
        assert_eq!(user.reminder_freq(), ReminderFreq::OneDay);

        let found = User::find_by_username(&db, "alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.email.as_deref(), Some("alice@example.com"));
        assert!(User::find_by_username(&db, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_unique_violation() {
        let db = test_pool().await;
        User::create(&db, "alice", "hash", None).await.unwrap();
        let err = User::create(&db, "alice", "other", None).await.unwrap_err();
        let db_err = err
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .expect("database error");
        assert!(db_err.is_unique_violation());
    }

    #[tokio::test]
    async fn update_reminders_keeps_email_when_absent() {
        let db = test_pool().await;
        let user = User::create(&db, "alice", "hash", Some("a@example.com")).await.unwrap();
        assert!(User::update_reminders(&db, user.id, ReminderFreq::Never, None).await.unwrap());
        let user = User::find_by_id(&db, user.id).await.unwrap().unwrap();
        assert_eq!(user.reminder_freq(), ReminderFreq::Never);
        assert_eq!(user.email.as_deref(), Some("a@example.com"));
        assert!(!User::update_reminders(&db, 999, ReminderFreq::OneDay, None).await.unwrap());
    }
}
