//! Outgoing mail through an authenticated SMTP relay.

use async_trait::async_trait;
use friday_rs_config::EmailConfig;
use friday_rs_protocol::ToolError;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{info, warn};
use std::time::Duration;

/// A plain-text message to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Primary recipient.
    pub to: String,
    /// Optional carbon-copy recipient.
    pub cc: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Mail transport interface.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message.
    async fn send(&self, message: EmailMessage) -> Result<(), ToolError>;
}

/// STARTTLS SMTP mailer whose credentials come from the process environment.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: EmailConfig,
    timeout: Duration,
}

impl SmtpMailer {
    /// Create a mailer for the configured relay.
    pub fn new(config: EmailConfig, timeout: Duration) -> Self {
        Self { config, timeout }
    }

    /// Read the username and password at call time.
    fn credentials(&self) -> Result<(String, String), ToolError> {
        let user = std::env::var(&self.config.username_env).unwrap_or_default();
        let password = std::env::var(&self.config.password_env).unwrap_or_default();
        if user.trim().is_empty() || password.trim().is_empty() {
            warn!(
                "smtp credentials missing (username_env={}, password_env={})",
                self.config.username_env, self.config.password_env
            );
            return Err(ToolError::Unavailable(
                "Gmail credentials not configured.".to_string(),
            ));
        }
        Ok((user, password))
    }
}

/// Parse and validate a mailbox address.
pub fn parse_mailbox(raw: &str) -> Result<Mailbox, ToolError> {
    raw.trim()
        .parse::<Mailbox>()
        .map_err(|err| ToolError::InvalidArguments(format!("Invalid email address '{raw}': {err}")))
}

/// Build the MIME message for a send.
pub fn build_message(from: &str, message: &EmailMessage) -> Result<Message, ToolError> {
    let from = parse_mailbox(from)?;
    let mut builder = Message::builder()
        .from(from)
        .to(parse_mailbox(&message.to)?)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN);
    if let Some(cc) = message.cc.as_deref()
        && !cc.trim().is_empty()
    {
        builder = builder.cc(parse_mailbox(cc)?);
    }
    builder
        .body(message.body.clone())
        .map_err(|err| ToolError::InvalidArguments(err.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), ToolError> {
        let (user, password) = self.credentials()?;
        let email = build_message(&user, &message)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
            .map_err(|err| ToolError::ExecutionFailed(format!("SMTP error - {err}")))?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(user, password))
            .timeout(Some(self.timeout))
            .build();
        transport.send(email).await.map_err(|err| {
            if err.is_permanent() && err.status().is_some_and(|code| code.to_string() == "535") {
                ToolError::ExecutionFailed(
                    "Authentication error. Please check your Gmail credentials.".to_string(),
                )
            } else {
                ToolError::ExecutionFailed(format!("SMTP error - {err}"))
            }
        })?;
        info!("email sent (has_cc={})", message.cc.is_some());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{EmailMessage, SmtpMailer, build_message, parse_mailbox};
    use friday_rs_config::EmailConfig;
    use friday_rs_protocol::ToolError;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn message(cc: Option<&str>) -> EmailMessage {
        EmailMessage {
            to: "tony@example.com".to_string(),
            cc: cc.map(str::to_string),
            subject: "Suit maintenance".to_string(),
            body: "The mark 42 needs polishing.".to_string(),
        }
    }

    #[test]
    fn builds_plain_text_message_with_cc() {
        let email = build_message("friday@example.com", &message(Some("pepper@example.com")))
            .expect("message");
        let formatted = String::from_utf8(email.formatted()).expect("utf8");
        assert!(formatted.contains("To: tony@example.com"));
        assert!(formatted.contains("Cc: pepper@example.com"));
        assert!(formatted.contains("Subject: Suit maintenance"));
        assert!(formatted.contains("Content-Type: text/plain"));
    }

    #[test]
    fn rejects_invalid_addresses() {
        let err = parse_mailbox("not an address").expect_err("invalid");
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        let mut bad = message(None);
        bad.to = "@nowhere".to_string();
        assert!(build_message("friday@example.com", &bad).is_err());
    }

    #[test]
    fn missing_credentials_are_unavailable() {
        let mailer = SmtpMailer::new(
            EmailConfig {
                username_env: "FRIDAY_TEST_UNSET_SMTP_USER".to_string(),
                password_env: "FRIDAY_TEST_UNSET_SMTP_PASSWORD".to_string(),
                ..EmailConfig::default()
            },
            Duration::from_secs(1),
        );
        assert_eq!(
            mailer.credentials().expect_err("missing"),
            ToolError::Unavailable("Gmail credentials not configured.".to_string())
        );
    }
}
