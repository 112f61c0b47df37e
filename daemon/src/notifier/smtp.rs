use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{SmtpConfig, SmtpSecurity};
use crate::notifier::{Notifier, OutgoingMail};

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let server = config.server.trim();
        if server.is_empty() {
            return Err(anyhow!("notifier.backend is smtp but smtp.server is empty"));
        }

        let builder = match config.security {
            SmtpSecurity::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(server)
                .with_context(|| format!("failed to configure STARTTLS relay {server}"))?,
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(server)
                .with_context(|| format!("failed to configure TLS relay {server}"))?,
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(server),
        };

        let mut builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_secs.max(1))));
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn build_message(mail: &OutgoingMail) -> Result<Message> {
    let from: Mailbox = mail
        .from
        .parse()
        .with_context(|| format!("invalid sender address {:?}", mail.from))?;
    let mut builder = Message::builder()
        .from(from)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_PLAIN);
    for recipient in &mail.to {
        let to: Mailbox = recipient
            .parse()
            .with_context(|| format!("invalid recipient address {recipient:?}"))?;
        builder = builder.to(to);
    }
    builder
        .body(mail.body.clone())
        .context("failed to build email message")
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let message = build_message(mail)?;
        self.transport
            .send(message)
            .await
            .context("SMTP delivery failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(to: &[&str]) -> OutgoingMail {
        OutgoingMail {
            from: "Quotey <quotes@example.com>".to_string(),
            to: to.iter().map(|r| r.to_string()).collect(),
            subject: "Your Daily Quote".to_string(),
            body: "Simplicity is prerequisite for reliability.".to_string(),
        }
    }

    #[test]
    fn builds_plain_text_message_for_every_recipient() {
        let message = build_message(&mail(&["a@example.com", "b@example.com"])).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Your Daily Quote"));
        assert!(raw.contains("a@example.com"));
        assert!(raw.contains("b@example.com"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("Simplicity is prerequisite for reliability."));
        assert_eq!(message.envelope().to().len(), 2);
    }

    #[test]
    fn rejects_malformed_recipient() {
        let error = build_message(&mail(&["not an address"])).unwrap_err();
        assert!(format!("{error:#}").contains("invalid recipient"));
    }

    #[tokio::test]
    async fn plain_transport_builds_without_connecting() {
        let config = SmtpConfig {
            server: "localhost".to_string(),
            port: 2525,
            username: String::new(),
            password: String::new(),
            security: SmtpSecurity::None,
            timeout_secs: 1,
        };
        assert!(SmtpNotifier::new(&config).is_ok());
    }
}
