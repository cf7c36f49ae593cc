// src/services/notifier.rs

//! Change notification by email.
//!
//! One message per run lists every changed target. Delivery goes through a
//! [`Transport`]; [`SmtpMailer`] submits over STARTTLS with a login.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use html_escape::{encode_double_quoted_attribute, encode_text};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::Result;
use crate::logging::Logger;
use crate::models::{Credentials, MailConfig, Target};

/// Outbound message delivery.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver an HTML message to all recipients.
    async fn send(&self, recipients: &[String], subject: &str, html_body: &str) -> Result<()>;
}

/// Authenticated SMTP submission.
pub struct SmtpMailer {
    from: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build a mailer for the configured relay.
    pub fn new(config: &MailConfig, credentials: &Credentials) -> Result<Self> {
        let from = Mailbox::new(
            Some(config.sender_name.clone()),
            credentials.user.parse()?,
        );
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(SmtpCredentials::new(
                credentials.user.clone(),
                credentials.password.clone(),
            ))
            .build();
        Ok(Self { from, mailer })
    }
}

#[async_trait]
impl Transport for SmtpMailer {
    async fn send(&self, recipients: &[String], subject: &str, html_body: &str) -> Result<()> {
        let mut builder = Message::builder().from(self.from.clone()).subject(subject);
        for recipient in recipients {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }
        let message = builder
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?;

        self.mailer.send(message).await?;
        Ok(())
    }
}

/// Logs messages instead of delivering them (`run --dry-run`).
pub struct LogTransport {
    logger: Logger,
}

impl LogTransport {
    pub fn new(logger: &Logger) -> Self {
        Self {
            logger: logger.scoped("dry-run"),
        }
    }
}

#[async_trait]
impl Transport for LogTransport {
    async fn send(&self, recipients: &[String], subject: &str, html_body: &str) -> Result<()> {
        self.logger.info(&format!(
            "Would send \"{}\" to {} recipient(s) ({} bytes)",
            subject,
            recipients.len(),
            html_body.len()
        ));
        self.logger.debug(html_body);
        Ok(())
    }
}

/// Rendered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub html: String,
}

/// Builds and dispatches the per-run change report.
pub struct Notifier {
    transport: Box<dyn Transport>,
    recipients: Vec<String>,
    sender_name: String,
    logger: Logger,
}

impl Notifier {
    pub fn new(
        transport: Box<dyn Transport>,
        recipients: Vec<String>,
        sender_name: impl Into<String>,
        logger: &Logger,
    ) -> Self {
        Self {
            transport,
            recipients,
            sender_name: sender_name.into(),
            logger: logger.scoped("notify"),
        }
    }

    /// Send one message covering all `changed` targets.
    pub async fn notify(&self, changed: &[Target], monitored: usize) -> Result<()> {
        if changed.is_empty() {
            return Ok(());
        }

        self.logger.info(&format!(
            "Sending notification for {} changed target(s) to {} recipient(s)",
            changed.len(),
            self.recipients.len()
        ));

        let report = self.compose(changed, monitored, Local::now());
        self.transport
            .send(&self.recipients, &report.subject, &report.html)
            .await?;

        self.logger.info("Notification sent");
        Ok(())
    }

    /// Render the subject and HTML body.
    pub fn compose(&self, changed: &[Target], monitored: usize, now: DateTime<Local>) -> Report {
        let subject = match changed {
            [single] => format!("Change detected - {}", single.name),
            _ => format!("{} sites updated", changed.len()),
        };

        let mut items = String::new();
        for target in changed {
            let name = encode_text(&target.name);
            let href = encode_double_quoted_attribute(&target.url);
            let url = encode_text(&target.url);
            items.push_str(&format!(
                r#"
            <div style="margin:15px 0; padding:15px; background:#f9f9f9; border-left:4px solid #1e88e5">
                <h3 style="margin:0 0 10px 0; color:#1e88e5">{name}</h3>
                <p style="margin:5px 0"><a href="{href}" style="color:#1e88e5">{url}</a></p>
            </div>"#
            ));
        }

        let html = format!(
            r#"<html>
<body style="font-family: Arial, sans-serif; background:#f5f5f5;">
  <div style="max-width:600px;margin:auto;background:#ffffff;padding:20px;border-radius:8px">
    <h2 style="color:#1e88e5;">Changes detected</h2>
    <p>The following pages were updated:</p>
    {items}
    <ul style="margin-top:20px">
      <li><b>Date/Time:</b> {time}</li>
      <li><b>Sites monitored:</b> {monitored}</li>
      <li><b>Sites changed:</b> {count}</li>
    </ul>
    <hr style="margin:20px 0">
    <small style="color:#666">{sender} &bull; automatic message</small>
  </div>
</body>
</html>
"#,
            time = now.format("%d/%m/%Y %H:%M:%S"),
            count = changed.len(),
            sender = encode_text(&self.sender_name),
        );

        Report { subject, html }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::TimeZone;

    use super::*;
    use crate::error::AppError;

    type Sent = Arc<Mutex<Vec<(Vec<String>, String, String)>>>;

    struct RecordingTransport {
        sent: Sent,
        fail: bool,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, recipients: &[String], subject: &str, html_body: &str) -> Result<()> {
            if self.fail {
                return Err(AppError::config("relay refused"));
            }
            self.sent.lock().unwrap().push((
                recipients.to_vec(),
                subject.to_string(),
                html_body.to_string(),
            ));
            Ok(())
        }
    }

    fn notifier(fail: bool) -> (Notifier, Sent) {
        let sent = Sent::default();
        let transport = RecordingTransport {
            sent: Arc::clone(&sent),
            fail,
        };
        let notifier = Notifier::new(
            Box::new(transport),
            vec!["ops@example.com".to_string()],
            "Page Monitor",
            &Logger::new(),
        );
        (notifier, sent)
    }

    fn target(url: &str) -> Target {
        Target::new(url).unwrap()
    }

    #[test]
    fn test_single_target_subject_names_it() {
        let (notifier, _) = notifier(false);
        let now = Local.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap();
        let report = notifier.compose(&[target("https://www.rektmag.net/")], 3, now);

        assert_eq!(report.subject, "Change detected - REKTMAG");
        assert!(report.html.contains("07/03/2025 14:05:09"));
        assert!(report.html.contains("<b>Sites monitored:</b> 3"));
        assert!(report.html.contains("<b>Sites changed:</b> 1"));
        assert!(report.html.contains(r#"href="https://www.rektmag.net/""#));
    }

    #[test]
    fn test_multi_target_subject_counts() {
        let (notifier, _) = notifier(false);
        let changed = [
            target("https://www.rektmag.net/"),
            target("https://www.eueanatureza.com.br/ensaios_modelos"),
        ];
        let report = notifier.compose(&changed, 3, Local::now());

        assert_eq!(report.subject, "2 sites updated");
        assert!(report.html.contains("REKTMAG"));
        assert!(report.html.contains("EUEANATUREZA"));
    }

    #[test]
    fn test_body_escapes_urls() {
        let (notifier, _) = notifier(false);
        let report = notifier.compose(&[target("https://example.com/?a=1&b=2")], 1, Local::now());
        assert!(report.html.contains("https://example.com/?a=1&amp;b=2"));
    }

    #[test]
    fn test_body_escapes_names() {
        let (notifier, _) = notifier(false);
        let target = Target::with_name("https://example.com/", "Fish & <Chips>").unwrap();
        let report = notifier.compose(&[target], 1, Local::now());

        assert_eq!(report.subject, "Change detected - Fish & <Chips>");
        assert!(report.html.contains("Fish &amp; &lt;Chips&gt;"));
        assert!(!report.html.contains("<Chips>"));
    }

    #[tokio::test]
    async fn test_notify_sends_once() {
        let (notifier, sent) = notifier(false);
        let changed = [target("https://a.example.com/"), target("https://b.example.com/")];
        notifier.notify(&changed, 5).await.unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, vec!["ops@example.com"]);
        assert_eq!(sent[0].1, "2 sites updated");
    }

    #[tokio::test]
    async fn test_notify_skips_empty() {
        let (notifier, sent) = notifier(false);
        notifier.notify(&[], 5).await.unwrap();
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notify_propagates_transport_failure() {
        let (notifier, _) = notifier(true);
        let result = notifier.notify(&[target("https://a.example.com/")], 1).await;
        assert!(result.is_err());
    }
}
