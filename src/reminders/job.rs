use std::{sync::Arc, time::Duration};

use sqlx::SqlitePool;
use time::OffsetDateTime;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::{notifier::Notifier, repo, schedule::ReminderFreq};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub scanned: usize,
    pub sent: usize,
    pub failed: usize,
}

/// One pass over unrated plates. Each plate whose window is open at `now`
/// gets exactly one notify call; a failed send is logged and dropped.
pub async fn run_once(
    db: &SqlitePool,
    notifier: &dyn Notifier,
    now: OffsetDateTime,
) -> anyhow::Result<RunSummary> {
    let pending = repo::list_pending(db).await?;
    let mut summary = RunSummary {
        scanned: pending.len(),
        ..Default::default()
    };

    for p in pending {
        let freq = match p.reminder_freq.parse::<ReminderFreq>() {
            Ok(f) => f,
            Err(e) => {
                warn!(error = %e, plate_id = p.plate_id, "skipping plate");
                continue;
            }
        };
        if !freq.is_due_at(p.created_at, now) {
            continue;
        }
        match notifier
            .notify(&p.email, &p.username, p.plate_id, &p.plate_name)
            .await
        {
            Ok(()) => {
                debug!(plate_id = p.plate_id, username = %p.username, %freq, "reminder sent");
                summary.sent += 1;
            }
            Err(e) => {
                warn!(error = %e, plate_id = p.plate_id, "reminder not delivered");
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

/// Run `run_once` on a fixed interval until the task is dropped.
pub async fn run_forever(db: SqlitePool, notifier: Arc<dyn Notifier>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(interval_secs = every.as_secs(), "reminder scheduler started");
    loop {
        ticker.tick().await;
        match run_once(&db, notifier.as_ref(), OffsetDateTime::now_utc()).await {
            Ok(s) if s.sent > 0 || s.failed > 0 => {
                info!(scanned = s.scanned, sent = s.sent, failed = s.failed, "reminder pass")
            }
            Ok(s) => debug!(scanned = s.scanned, "reminder pass, nothing due"),
            Err(e) => error!(error = ?e, "reminder pass failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::Duration as TimeDuration;

    use super::*;
    use crate::{
        auth::repo_types::User,
        db::test_pool,
        plates::{repo as plates_repo, repo::sample},
        reminders::notifier::testing::RecordingNotifier,
    };

    async fn user_with(db: &SqlitePool, name: &str, email: Option<&str>, freq: ReminderFreq) -> i64 {
        let user = User::create(db, name, "hash", email).await.unwrap();
        User::update_reminders(db, user.id, freq, None).await.unwrap();
        user.id
    }

    async fn plate_for(db: &SqlitePool, user_id: Option<i64>, name: &str, age: TimeDuration, now: OffsetDateTime) -> i64 {
        let mut new = sample("Diner", name);
        new.user_id = user_id;
        plates_repo::insert_at(db, &new, now - age).await.unwrap()
    }

    #[tokio::test]
    async fn one_day_plate_is_reminded_only_on_day_one() {
        let db = test_pool().await;
        let now = OffsetDateTime::now_utc();
        let alice = user_with(&db, "alice", Some("alice@example.com"), ReminderFreq::OneDay).await;
        plate_for(&db, Some(alice), "fresh", TimeDuration::hours(2), now).await;
        let due = plate_for(&db, Some(alice), "yesterday", TimeDuration::hours(30), now).await;
        plate_for(&db, Some(alice), "stale", TimeDuration::hours(50), now).await;

        let notifier = RecordingNotifier::default();
        let summary = run_once(&db, &notifier, now).await.unwrap();
        assert_eq!(summary, RunSummary { scanned: 3, sent: 1, failed: 0 });

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].plate_id, due);
        assert_eq!(sent[0].email, "alice@example.com");
        assert_eq!(sent[0].username, "alice");
        assert_eq!(sent[0].plate_name, "yesterday");
    }

    #[tokio::test]
    async fn forty_five_minute_and_weekly_windows() {
        let db = test_pool().await;
        let now = OffsetDateTime::now_utc();
        let quick = user_with(&db, "quick", Some("q@example.com"), ReminderFreq::FortyFiveMinutes).await;
        let slow = user_with(&db, "slow", Some("s@example.com"), ReminderFreq::OneWeek).await;
        let q_due = plate_for(&db, Some(quick), "q45", TimeDuration::minutes(45), now).await;
        plate_for(&db, Some(quick), "q47", TimeDuration::minutes(47), now).await;
        let s_due = plate_for(&db, Some(slow), "s7", TimeDuration::days(7), now).await;
        plate_for(&db, Some(slow), "s6", TimeDuration::days(6), now).await;

        let notifier = RecordingNotifier::default();
        run_once(&db, &notifier, now).await.unwrap();
        let mut ids: Vec<i64> = notifier.sent().iter().map(|s| s.plate_id).collect();
        ids.sort();
        assert_eq!(ids, vec![q_due, s_due]);
    }

    #[tokio::test]
    async fn rated_none_no_email_and_anonymous_plates_never_notify() {
        let db = test_pool().await;
        let now = OffsetDateTime::now_utc();
        let day = TimeDuration::hours(25);
        let rater = user_with(&db, "rater", Some("r@example.com"), ReminderFreq::OneDay).await;
        let opted_out = user_with(&db, "quiet", Some("q@example.com"), ReminderFreq::Never).await;
        let no_email = user_with(&db, "ghost", None, ReminderFreq::OneDay).await;
        let blank_email = user_with(&db, "blank", Some(""), ReminderFreq::OneDay).await;

        let rated = plate_for(&db, Some(rater), "rated", day, now).await;
        plates_repo::update_rating_and_comment(&db, rated, 5, None).await.unwrap();
        plate_for(&db, Some(opted_out), "quiet", day, now).await;
        plate_for(&db, Some(no_email), "ghost", day, now).await;
        plate_for(&db, Some(blank_email), "blank", day, now).await;
        plate_for(&db, None, "anonymous", day, now).await;

        let notifier = RecordingNotifier::default();
        let summary = run_once(&db, &notifier, now).await.unwrap();
        assert_eq!(summary.scanned, 0);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn failed_send_does_not_stop_the_pass() {
        let db = test_pool().await;
        let now = OffsetDateTime::now_utc();
        let alice = user_with(&db, "alice", Some("a@example.com"), ReminderFreq::OneDay).await;
        let broken = plate_for(&db, Some(alice), "broken", TimeDuration::hours(26), now).await;
        let fine = plate_for(&db, Some(alice), "fine", TimeDuration::hours(27), now).await;

        let notifier = RecordingNotifier {
            fail_for: vec![broken],
            ..Default::default()
        };
        let summary = run_once(&db, &notifier, now).await.unwrap();
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(notifier.sent()[0].plate_id, fine);
    }

    #[tokio::test]
    async fn repeated_pass_in_window_sends_again() {
        let db = test_pool().await;
        let now = OffsetDateTime::now_utc();
        let alice = user_with(&db, "alice", Some("a@example.com"), ReminderFreq::OneDay).await;
        plate_for(&db, Some(alice), "again", TimeDuration::hours(30), now).await;

        let notifier = RecordingNotifier::default();
        run_once(&db, &notifier, now).await.unwrap();
        run_once(&db, &notifier, now + TimeDuration::minutes(1)).await.unwrap();
        assert_eq!(notifier.sent().len(), 2);
    }
}
