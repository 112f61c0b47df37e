use std::sync::Arc;

use chrono::Local;
use quotey_core::{QuoteSelector, SelectionPath, UsageLedger};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::EmailConfig;
use crate::notifier::{Notifier, OutgoingMail};
use crate::state::LedgerStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered {
        quote: String,
        path: SelectionPath,
        persisted: bool,
    },
    DeliveryFailed,
}

struct RotationState {
    ledger: UsageLedger,
    rng: StdRng,
}

/// Runs one select, send, persist cycle per trigger.
///
/// The ledger lock is held for the whole cycle, so overlapping triggers are
/// serialised instead of racing on the persisted state.
pub struct QuoteDispatcher {
    selector: QuoteSelector,
    email: EmailConfig,
    notifier: Arc<dyn Notifier>,
    persistence: Arc<dyn LedgerStore>,
    state: Mutex<RotationState>,
}

impl QuoteDispatcher {
    pub fn new(
        selector: QuoteSelector,
        ledger: UsageLedger,
        email: EmailConfig,
        notifier: Arc<dyn Notifier>,
        persistence: Arc<dyn LedgerStore>,
    ) -> Self {
        Self::with_rng(
            selector,
            ledger,
            email,
            notifier,
            persistence,
            StdRng::from_entropy(),
        )
    }

    pub fn with_rng(
        selector: QuoteSelector,
        ledger: UsageLedger,
        email: EmailConfig,
        notifier: Arc<dyn Notifier>,
        persistence: Arc<dyn LedgerStore>,
        rng: StdRng,
    ) -> Self {
        Self {
            selector,
            email,
            notifier,
            persistence,
            state: Mutex::new(RotationState { ledger, rng }),
        }
    }

    #[cfg(test)]
    pub async fn ledger(&self) -> UsageLedger {
        self.state.lock().await.ledger.clone()
    }

    pub async fn send_now(&self) -> DispatchOutcome {
        let mut state = self.state.lock().await;
        let RotationState { ledger, rng } = &mut *state;

        let selection = self.selector.select(ledger, rng);
        debug!(
            path = ?selection.path,
            available = selection.available,
            ledger_len = selection.ledger.len(),
            "selected quote"
        );

        let mail = self.mail(self.email.subject.clone(), format!("{}\n", selection.quote));
        if let Err(error) = self.notifier.send(&mail).await {
            error!("failed to send quote email: {error:#}");
            return DispatchOutcome::DeliveryFailed;
        }
        info!(quote = %selection.quote, path = ?selection.path, "successfully sent quote");

        let persisted = match self.persistence.save(&selection.ledger).await {
            Ok(()) => true,
            Err(error) => {
                warn!("quote sent but ledger was not persisted: {error:#}");
                false
            }
        };
        *ledger = selection.ledger;

        DispatchOutcome::Delivered {
            quote: selection.quote,
            path: selection.path,
            persisted,
        }
    }

    pub async fn send_startup_notification(&self, schedule: &str) -> bool {
        let body = format!(
            "Quotey service has started successfully at {}.\nThe quote service is running and scheduled for {}.\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            schedule
        );
        let mail = self.mail(format!("{} - Startup Notification", self.email.subject), body);
        match self.notifier.send(&mail).await {
            Ok(()) => {
                info!("successfully sent startup notification email");
                true
            }
            Err(error) => {
                error!("failed to send startup notification email: {error:#}");
                false
            }
        }
    }

    fn mail(&self, subject: String, body: String) -> OutgoingMail {
        OutgoingMail {
            from: self.email.from.clone(),
            to: self.email.to.clone(),
            subject,
            body,
        }
    }
}
