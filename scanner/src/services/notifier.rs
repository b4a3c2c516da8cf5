// Email delivery of result files
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{CredentialProvider, EmailSettings};
use crate::error::ScanError;

const STARTTLS_PORT: u16 = 587;

/// Sends result files as `application/octet-stream` attachments over SMTP.
pub struct EmailNotifier {
    settings: EmailSettings,
    password: String,
}

impl std::fmt::Debug for EmailNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailNotifier")
            .field("settings", &self.settings)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl EmailNotifier {
    /// Validates the addresses and resolves the SMTP password. A missing
    /// password is an error, so nothing is sent without credentials.
    pub fn from_settings(settings: &EmailSettings, credentials: &dyn CredentialProvider) -> Result<Self, ScanError> {
        settings.validate()?;
        let password = credentials.secret(&settings.credential_name)?;
        Ok(Self {
            settings: settings.clone(),
            password,
        })
    }

    pub async fn build_message(&self, attachments: &[PathBuf]) -> Result<Message, ScanError> {
        let from: Mailbox = self.settings.sender.parse()?;
        let to: Mailbox = self.settings.recipient.parse()?;
        let octet_stream = ContentType::parse("application/octet-stream")
            .map_err(|e| ScanError::EmailError(format!("bad content type: {}", e)))?;

        let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(self.settings.body.clone()));
        for path in attachments {
            let bytes = tokio::fs::read(path).await?;
            multipart = multipart.singlepart(Attachment::new(file_name(path)?).body(bytes, octet_stream.clone()));
        }

        Ok(Message::builder()
            .from(from)
            .to(to)
            .subject(self.settings.subject.clone())
            .multipart(multipart)?)
    }

    pub async fn send(&self, attachments: &[PathBuf]) -> Result<(), ScanError> {
        let message = self.build_message(attachments).await?;
        let host = self.settings.smtp_host.as_str();

        // 587 negotiates TLS after connecting, everything else is TLS from the first byte
        let builder = if self.settings.smtp_port == STARTTLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        };
        let mailer = builder
            .port(self.settings.smtp_port)
            .credentials(Credentials::new(self.settings.login().to_string(), self.password.clone()))
            .build();

        mailer.send(message).await?;
        info!(
            recipient = %self.settings.recipient,
            attachments = ?attachments.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "Email sent"
        );
        Ok(())
    }
}

fn file_name(path: &Path) -> Result<String, ScanError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ScanError::EmailError(format!("attachment '{}' has no file name", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn settings() -> EmailSettings {
        EmailSettings {
            sender: "bot@example.com".to_string(),
            recipient: "desk@example.com".to_string(),
            subject: "Daily analysis results".to_string(),
            ..EmailSettings::default()
        }
    }

    fn secrets() -> HashMap<String, String> {
        HashMap::from([("EMAIL_PASSWORD".to_string(), "app-password".to_string())])
    }

    #[test]
    fn test_missing_password_is_fatal() {
        let result = EmailNotifier::from_settings(&settings(), &HashMap::<String, String>::new());
        assert!(matches!(result, Err(ScanError::MissingCredential(name)) if name == "EMAIL_PASSWORD"));
    }

    #[test]
    fn test_missing_recipient_is_config_error() {
        let mut email = settings();
        email.recipient.clear();
        let result = EmailNotifier::from_settings(&email, &secrets());
        assert!(matches!(result, Err(ScanError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_message_carries_attachment() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("analysis_results.csv");
        std::fs::write(&path, "symbol,close,rsi,sma,signal\nAAPL,105.0,25.0,100.0,BUY\n").unwrap();

        let notifier = EmailNotifier::from_settings(&settings(), &secrets()).unwrap();
        let message = notifier.build_message(&[path]).await.unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: bot@example.com"));
        assert!(raw.contains("To: desk@example.com"));
        assert!(raw.contains("Subject: Daily analysis results"));
        assert!(raw.contains("Content-Type: application/octet-stream"));
        assert!(raw.contains("filename=\"analysis_results.csv\""));
    }

    #[tokio::test]
    async fn test_missing_attachment_file() {
        let notifier = EmailNotifier::from_settings(&settings(), &secrets()).unwrap();
        let result = notifier.build_message(&[PathBuf::from("/no/such/results.csv")]).await;
        assert!(matches!(result, Err(ScanError::IoError { .. })));
    }

    #[test]
    fn test_debug_redacts_password() {
        let notifier = EmailNotifier::from_settings(&settings(), &secrets()).unwrap();
        assert!(!format!("{:?}", notifier).contains("app-password"));
    }
}
