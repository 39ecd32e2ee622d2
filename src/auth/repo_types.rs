use sqlx::FromRow;
use time::OffsetDateTime;

use crate::reminders::schedule::ReminderFreq;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,                      // unique user ID
    pub username: String,             // unique login name
    pub password_hash: String,        // Argon2 hash
    pub email: Option<String>,        // reminder address
    pub reminder_freq: String,        // 45min | 1day | 1week | none
    pub created_at: OffsetDateTime,   // creation timestamp
}

impl User {
    /// Stored preference; an unrecognised value reads as the default.
    pub fn reminder_freq(&self) -> ReminderFreq {
        self.reminder_freq.parse().unwrap_or_default()
    }
}
