use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::classifier::RiskLevel;

pub const SOS_SUBJECT: &str = "🚨 SOS Alert - Maternal Risk Detected";

/// Fixed-subject, templated alert addressed to the configured recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

impl AlertMessage {
    pub fn sos(patient_name: &str, risk: RiskLevel) -> Self {
        Self {
            subject: SOS_SUBJECT.to_string(),
            body: format!(
                "Patient {patient_name} is {}. Immediate attention required.",
                risk.label()
            ),
        }
    }
}

/// Outbound channel for alert delivery (mail relay, test doubles).
pub trait AlertTransport: Send + Sync {
    /// Make exactly one delivery attempt.
    fn deliver(&self, message: &AlertMessage) -> Result<(), NotificationError>;
}

impl<T: AlertTransport + ?Sized> AlertTransport for Arc<T> {
    fn deliver(&self, message: &AlertMessage) -> Result<(), NotificationError> {
        (**self).deliver(message)
    }
}

/// Delivery failures; always recovered by the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("alert delivery is not configured")]
    NotConfigured,
    #[error("invalid alert address '{address}': {detail}")]
    Address { address: String, detail: String },
    #[error("failed to compose alert message: {0}")]
    Message(String),
    #[error("alert transport failed: {0}")]
    Transport(String),
}

/// Sends SOS alerts for high-risk assessments, one attempt per call.
///
/// Callers gate on [`RiskLevel::High`]; the dispatcher does not re-check the level.
pub struct AlertDispatcher<T> {
    transport: T,
}

impl<T: AlertTransport> AlertDispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Attempt delivery and hand the failure back for presentation.
    pub fn try_send_alert(
        &self,
        patient_name: &str,
        risk: RiskLevel,
    ) -> Result<(), NotificationError> {
        let message = AlertMessage::sos(patient_name, risk);
        match self.transport.deliver(&message) {
            Ok(()) => {
                info!(patient = patient_name, %risk, "sos alert delivered");
                Ok(())
            }
            Err(err) => {
                warn!(patient = patient_name, %risk, error = %err, "failed to send sos alert");
                Err(err)
            }
        }
    }

    /// `true` when the transport accepted the message, `false` when it was not sent.
    pub fn send_alert(&self, patient_name: &str, risk: RiskLevel) -> bool {
        self.try_send_alert(patient_name, risk).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<AlertMessage>>,
    }

    impl AlertTransport for Outbox {
        fn deliver(&self, message: &AlertMessage) -> Result<(), NotificationError> {
            self.sent.lock().expect("outbox mutex").push(message.clone());
            Ok(())
        }
    }

    struct RefusingRelay;

    impl AlertTransport for RefusingRelay {
        fn deliver(&self, _message: &AlertMessage) -> Result<(), NotificationError> {
            Err(NotificationError::Transport("535 authentication failed".to_string()))
        }
    }

    #[test]
    fn composes_templated_sos_message() {
        let message = AlertMessage::sos("Asha", RiskLevel::High);
        assert_eq!(message.subject, SOS_SUBJECT);
        assert_eq!(
            message.body,
            "Patient Asha is High Risk. Immediate attention required."
        );
    }

    #[test]
    fn successful_delivery_returns_true() {
        let dispatcher = AlertDispatcher::new(Outbox::default());
        assert!(dispatcher.send_alert("Asha", RiskLevel::High));

        let sent = dispatcher.transport().sent.lock().expect("outbox mutex");
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("Asha"));
    }

    #[test]
    fn transport_failure_returns_false_without_panicking() {
        let dispatcher = AlertDispatcher::new(RefusingRelay);
        assert!(!dispatcher.send_alert("Asha", RiskLevel::High));
        assert!(matches!(
            dispatcher.try_send_alert("Asha", RiskLevel::High),
            Err(NotificationError::Transport(_))
        ));
    }

    #[test]
    fn each_call_is_a_single_attempt() {
        let dispatcher = AlertDispatcher::new(Outbox::default());
        dispatcher.send_alert("Asha", RiskLevel::High);
        dispatcher.send_alert("Asha", RiskLevel::High);

        assert_eq!(dispatcher.transport().sent.lock().expect("outbox mutex").len(), 2);
    }
}
