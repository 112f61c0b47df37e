mod log;
mod smtp;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{DaemonConfig, NotifierBackend};
pub use self::log::LogNotifier;
pub use self::smtp::SmtpNotifier;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

pub fn build_notifier(config: &DaemonConfig) -> Result<Arc<dyn Notifier>> {
    let notifier: Arc<dyn Notifier> = match config.notifier.backend {
        NotifierBackend::Smtp => Arc::new(SmtpNotifier::new(&config.smtp)?),
        NotifierBackend::Log => Arc::new(LogNotifier),
    };
    Ok(notifier)
}
