use std::time::Duration;

use common::errors::AppError;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::composer::EmailContent;
use crate::config::Config;

const SENDER_NAME: &str = "Weather Monitoring";
const SEND_TIMEOUT_SECS: u64 = 30;

/// SMTP mailer for alert delivery
#[cfg_attr(test, derive(Debug))]
pub struct AlertMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl AlertMailer {
    /// Build the transport and parse every address up front so a bad
    /// configuration fails before the scheduler loop starts.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let from = Mailbox::new(
            Some(SENDER_NAME.to_string()),
            config.email_from.parse().map_err(|_| {
                AppError::config(format!("Invalid sender address: {}", config.email_from))
            })?,
        );

        let mut to = Vec::with_capacity(config.email_to.len());
        for address in &config.email_to {
            to.push(address.parse().map_err(|_| {
                AppError::config(format!("Invalid recipient address: {}", address))
            })?);
        }

        // Exchange servers commonly require LOGIN auth; STARTTLS is
        // attempted but the session continues without it when unsupported.
        let tls = TlsParameters::new(config.smtp_server.clone())
            .map_err(|e| AppError::config(format!("TLS setup failed: {}", e)))?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_server)
                .port(config.smtp_port)
                .tls(Tls::Opportunistic(tls))
                .timeout(Some(Duration::from_secs(SEND_TIMEOUT_SECS)));

        if !config.smtp_user.is_empty() {
            builder = builder
                .authentication(vec![Mechanism::Login])
                .credentials(Credentials::new(
                    config.smtp_user.clone(),
                    config.smtp_password.clone(),
                ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }

    /// Submit one alert as multipart/alternative (plain text + HTML, UTF-8)
    pub async fn send(&self, subject: &str, content: &EmailContent) -> Result<(), AppError> {
        let mut builder = Message::builder().from(self.from.clone()).subject(subject);
        for mailbox in &self.to {
            builder = builder.to(mailbox.clone());
        }

        let message = builder
            .multipart(MultiPart::alternative_plain_html(
                content.text.clone(),
                content.html.clone(),
            ))
            .map_err(|e| AppError::send(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::send(e.to_string()))?;

        info!(recipients = self.to.len(), "Alert email submitted");
        Ok(())
    }
}
