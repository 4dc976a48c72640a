use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{CompanyProfile, SmtpConfig};

/// Assembled message ready for a transport: recipient, templated HTML body,
/// and the report attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub cc: Option<String>,
    pub subject: String,
    pub html_body: String,
    pub attachment: EmailAttachment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("invalid mail address: {0}")]
    Address(String),
    #[error("failed to assemble mail message: {0}")]
    Message(String),
    #[error("mail transport rejected the message: {0}")]
    Transport(String),
}

/// Outbound delivery seam so the pipeline can be exercised with an
/// in-memory transport in tests.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), DeliveryError>;
}

/// SMTP delivery via the configured relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(smtp: &SmtpConfig, company: &CompanyProfile) -> Result<Self, DeliveryError> {
        let sender: Mailbox = format!("{} ROI+ Calculator <{}>", company.name, smtp.username)
            .parse()
            .map_err(|err: lettre::address::AddressError| DeliveryError::Address(err.to_string()))?;

        let builder = if smtp.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
        }
        .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let transport = builder
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();

        Ok(Self { transport, sender })
    }

    fn assemble(&self, email: OutboundEmail) -> Result<Message, DeliveryError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|err: lettre::address::AddressError| DeliveryError::Address(err.to_string()))?;

        let mut builder = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(email.subject);

        if let Some(cc) = email.cc {
            let cc: Mailbox = cc.parse().map_err(|err: lettre::address::AddressError| {
                DeliveryError::Address(err.to_string())
            })?;
            builder = builder.cc(cc);
        }

        let pdf = ContentType::parse("application/pdf")
            .map_err(|err| DeliveryError::Message(err.to_string()))?;

        builder
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::html(email.html_body))
                    .singlepart(Attachment::new(email.attachment.filename).body(
                        email.attachment.bytes,
                        pdf,
                    )),
            )
            .map_err(|err| DeliveryError::Message(err.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), DeliveryError> {
        let message = self.assemble(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            secure: false,
            username: "reports@example.com".to_string(),
            password: "secret".to_string(),
        }
    }

    fn company() -> CompanyProfile {
        CompanyProfile {
            name: "AI1team".to_string(),
            email: "roi@ai1team.com".to_string(),
            website: "https://ai1team.com".to_string(),
        }
    }

    fn email() -> OutboundEmail {
        OutboundEmail {
            to: "customer@example.com".to_string(),
            cc: Some("roi@ai1team.com".to_string()),
            subject: "Your ROI+ Report".to_string(),
            html_body: "<p>hello</p>".to_string(),
            attachment: EmailAttachment {
                filename: "ROIplus_Report_Acme.pdf".to_string(),
                bytes: b"%PDF".to_vec(),
            },
        }
    }

    #[tokio::test]
    async fn assembles_a_multipart_message() {
        let mailer = SmtpMailer::from_config(&smtp_config(), &company()).expect("mailer builds");
        let message = mailer.assemble(email()).expect("message assembles");
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("ROIplus_Report_Acme.pdf"));
        assert!(raw.contains("customer@example.com"));
    }

    #[tokio::test]
    async fn rejects_unparseable_recipients() {
        let mailer = SmtpMailer::from_config(&smtp_config(), &company()).expect("mailer builds");
        let mut bad = email();
        bad.to = "not an address".to_string();
        assert!(matches!(
            mailer.assemble(bad),
            Err(DeliveryError::Address(_))
        ));
    }
}
