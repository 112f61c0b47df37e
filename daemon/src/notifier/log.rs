use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::notifier::{Notifier, OutgoingMail};

/// Writes mail to the log instead of delivering it. Useful for dry runs.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        info!(
            from = %mail.from,
            to = ?mail.to,
            subject = %mail.subject,
            body = %mail.body,
            "log backend: mail not delivered"
        );
        Ok(())
    }
}
