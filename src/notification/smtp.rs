//! SMTP mail transport backed by lettre.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{Mailer, OutboundEmail};
use crate::config::MailTransportConfig;
use crate::errors::NotificationError;

/// Mailer that delivers through a configured SMTP relay.
///
/// Credentials are optional; without them the transport connects
/// unauthenticated, which matches local relay setups.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer from the process-level mail configuration.
    pub fn new(config: &MailTransportConfig) -> Result<Self, NotificationError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host).map_err(
            |e| NotificationError::TransportFailed {
                details: format!("invalid relay host {}: {}", config.host, e),
            },
        )?;

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::MessageBuildFailed {
                details: format!("invalid from address {}: {}", config.from_address, e),
            })?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), NotificationError> {
        let to = format!("{} <{}>", email.to_name, email.to_address)
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::MessageBuildFailed {
                details: format!("invalid recipient {}: {}", email.to_address, e),
            })?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                email.html_body.clone(),
            ))
            .map_err(|e| NotificationError::MessageBuildFailed {
                details: e.to_string(),
            })?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::TransportFailed {
                details: e.to_string(),
            })?;

        Ok(())
    }
}
