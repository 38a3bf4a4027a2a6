//! Digest delivery over Gmail SMTP.

use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use wod_format::Digest;

use crate::config::EmailConfig;
use crate::error::DeliveryError;

/// Subject line: `"{brand} - {subject} ({week_label})"`.
#[must_use]
pub fn subject_line(brand: &str, subject: &str, week_label: &str) -> String {
    format!("{brand} - {subject} ({week_label})")
}

/// Email sender for WOD digests.
pub struct EmailSender {
    config: EmailConfig,
}

impl EmailSender {
    /// Create a sender. Fails when credentials or the recipient are missing.
    pub fn new(config: EmailConfig) -> Result<Self, crate::error::ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Subject configured for digests.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.config.subject
    }

    /// Build the multipart message for a digest without sending it.
    pub fn build_message(&self, subject: &str, digest: &Digest) -> Result<Message, DeliveryError> {
        build_message(&self.config, subject, &digest.html, &digest.text)
    }

    /// Send a digest.
    pub async fn send_digest(&self, subject: &str, digest: &Digest) -> Result<(), DeliveryError> {
        let email = self.build_message(subject, digest)?;
        self.deliver(email).await?;

        tracing::info!(
            to = %self.config.to,
            subject = subject,
            entries = digest.entry_count,
            "Digest email sent"
        );
        Ok(())
    }

    /// Send a simple test email to verify configuration.
    pub async fn send_test(&self) -> Result<(), DeliveryError> {
        let subject = "Wodify Box Sync - Test Email";
        let html_body = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>
        body { font-family: 'Roboto', Helvetica, Arial, sans-serif; padding: 20px; }
        h1 { color: #2980b9; }
    </style>
</head>
<body>
    <h1>Wodify Box Sync</h1>
    <p>La configuración de correo funciona correctamente.</p>
</body>
</html>
"#;
        let text_body = "Wodify Box Sync\n\nLa configuración de correo funciona correctamente.\n";

        let email = build_message(&self.config, subject, html_body, text_body)?;
        self.deliver(email).await?;
        tracing::info!(to = %self.config.to, "Test email sent");
        Ok(())
    }

    async fn deliver(&self, email: Message) -> Result<(), DeliveryError> {
        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());

        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build();

        mailer.send(email).await?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address.parse().map_err(|error| DeliveryError::Address {
        address: address.to_string(),
        error,
    })
}

fn build_message(
    config: &EmailConfig,
    subject: &str,
    html_body: &str,
    text_body: &str,
) -> Result<Message, DeliveryError> {
    let from = parse_mailbox(config.from_address())?;
    let to = parse_mailbox(&config.to)?;

    // Plain text first: clients show the last alternative they support.
    let email = Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(text_body.to_string()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html_body.to_string()),
                ),
        )?;
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wod_format::{DigestAssembler, DigestHeader};

    fn config() -> EmailConfig {
        EmailConfig {
            username: "box@gmail.com".to_string(),
            password: "pw".to_string(),
            to: "team@example.com".to_string(),
            ..EmailConfig::default()
        }
    }

    #[test]
    fn test_subject_line() {
        assert_eq!(
            subject_line("N8", "WODs de la semana", "03/03/2025 - 07/03/2025"),
            "N8 - WODs de la semana (03/03/2025 - 07/03/2025)"
        );
    }

    #[test]
    fn test_new_requires_credentials() {
        assert!(EmailSender::new(EmailConfig::default()).is_err());
        assert!(EmailSender::new(config()).is_ok());
    }

    #[test]
    fn test_build_message_is_multipart_alternative() {
        let sender = EmailSender::new(config()).unwrap();
        let digest = DigestAssembler::new(DigestHeader::new("N8", "03/03/2025 - 07/03/2025"))
            .assemble(&[]);
        let message = sender.build_message("N8 - WODs", &digest).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("To: team@example.com"));
        assert!(raw.contains("From: box@gmail.com"));
    }

    #[test]
    fn test_invalid_recipient() {
        let sender = EmailSender::new(EmailConfig {
            to: "not an address".to_string(),
            ..config()
        })
        .unwrap();
        let digest = DigestAssembler::new(DigestHeader::new("N8", "x")).assemble(&[]);
        assert!(matches!(
            sender.build_message("s", &digest),
            Err(DeliveryError::Address { .. })
        ));
    }
}
