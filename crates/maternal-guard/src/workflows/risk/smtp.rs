use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::alert::{AlertMessage, AlertTransport, NotificationError};
use crate::config::NotificationConfig;

/// STARTTLS mail relay delivering alerts to a single configured recipient.
pub struct SmtpAlertTransport {
    sender: Mailbox,
    recipient: Mailbox,
    relay: SmtpTransport,
}

impl SmtpAlertTransport {
    pub fn new(config: &NotificationConfig) -> Result<Self, NotificationError> {
        let sender = parse_mailbox(&config.sender)?;
        let recipient = parse_mailbox(&config.recipient)?;

        let relay = SmtpTransport::starttls_relay(&config.smtp_host)
            .map_err(|err| NotificationError::Transport(err.to_string()))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout))
            .build();

        Ok(Self {
            sender,
            recipient,
            relay,
        })
    }

    pub fn recipient(&self) -> &Mailbox {
        &self.recipient
    }

    fn compose(&self, message: &AlertMessage) -> Result<Message, NotificationError> {
        Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|err| NotificationError::Message(err.to_string()))
    }
}

impl AlertTransport for SmtpAlertTransport {
    fn deliver(&self, message: &AlertMessage) -> Result<(), NotificationError> {
        let email = self.compose(message)?;
        self.relay
            .send(&email)
            .map(|_| ())
            .map_err(|err| NotificationError::Transport(err.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse::<Mailbox>()
        .map_err(|err| NotificationError::Address {
            address: address.to_string(),
            detail: err.to_string(),
        })
}

/// Transport chosen from configuration: SMTP when alerts are configured, otherwise disabled.
pub enum MailRelay {
    Smtp(SmtpAlertTransport),
    Disabled,
}

impl MailRelay {
    pub fn from_config(config: Option<&NotificationConfig>) -> Result<Self, NotificationError> {
        match config {
            Some(config) => SmtpAlertTransport::new(config).map(Self::Smtp),
            None => Ok(Self::Disabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, MailRelay::Smtp(_))
    }
}

impl AlertTransport for MailRelay {
    fn deliver(&self, message: &AlertMessage) -> Result<(), NotificationError> {
        match self {
            MailRelay::Smtp(transport) => transport.deliver(message),
            MailRelay::Disabled => Err(NotificationError::NotConfigured),
        }
    }
}
