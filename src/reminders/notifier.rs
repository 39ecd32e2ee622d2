use async_trait::async_trait;
use tracing::info;

/// Outbound channel for "please rate your plate" messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        email: &str,
        username: &str,
        plate_id: i64,
        plate_name: &str,
    ) -> anyhow::Result<()>;
}

/// Writes each reminder to the log instead of sending mail.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        email: &str,
        username: &str,
        plate_id: i64,
        plate_name: &str,
    ) -> anyhow::Result<()> {
        info!(
            %email,
            %username,
            plate_id,
            %plate_name,
            "rating reminder"
        );
        Ok(())
    }
}
