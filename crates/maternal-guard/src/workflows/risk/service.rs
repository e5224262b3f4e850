use serde::{Deserialize, Serialize};
use tracing::info;

use super::alert::{AlertDispatcher, AlertTransport};
use super::classifier::{ClassificationError, RiskClassifier, RiskLevel, RiskModel};
use super::vitals::{ValidationError, VitalsInput, VitalsSample};

/// Risk assessment form: patient details, raw vitals, and whether to raise an SOS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessmentRequest {
    #[serde(default)]
    pub patient_name: String,
    #[serde(flatten)]
    pub vitals: VitalsInput,
    /// Send the SOS alert when the result is high risk.
    #[serde(default)]
    pub notify: bool,
}

/// Result of a single alert attempt as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationOutcome {
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Classified assessment returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub patient_name: String,
    pub risk_level: RiskLevel,
    pub label: &'static str,
    pub sos_required: bool,
    /// Present only when an alert was attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationOutcome>,
}

/// Validation → classification → (high risk, opted in) alert.
pub struct RiskAssessmentService<M, T> {
    classifier: RiskClassifier<M>,
    dispatcher: AlertDispatcher<T>,
}

impl<M, T> RiskAssessmentService<M, T>
where
    M: RiskModel + 'static,
    T: AlertTransport + 'static,
{
    pub fn new(model: M, transport: T) -> Self {
        Self {
            classifier: RiskClassifier::new(model),
            dispatcher: AlertDispatcher::new(transport),
        }
    }

    pub fn classifier(&self) -> &RiskClassifier<M> {
        &self.classifier
    }

    pub fn dispatcher(&self) -> &AlertDispatcher<T> {
        &self.dispatcher
    }

    pub fn classify(&self, sample: &VitalsSample) -> Result<RiskLevel, ClassificationError> {
        self.classifier.classify(sample)
    }

    /// Run the full assessment. Notification failures are folded into the result.
    pub fn assess(
        &self,
        request: RiskAssessmentRequest,
    ) -> Result<RiskAssessment, RiskAssessmentError> {
        let RiskAssessmentRequest {
            patient_name,
            vitals,
            notify,
        } = request;

        let sample = vitals.validate()?;
        let risk_level = self.classifier.classify(&sample)?;
        info!(patient = %patient_name, %risk_level, "risk assessment classified");

        let sos_required = risk_level.requires_sos();
        let notification = if sos_required && notify {
            Some(match self.dispatcher.try_send_alert(&patient_name, risk_level) {
                Ok(()) => NotificationOutcome {
                    sent: true,
                    error: None,
                },
                Err(err) => NotificationOutcome {
                    sent: false,
                    error: Some(format!("Failed to send SOS notification: {err}")),
                },
            })
        } else {
            None
        };

        Ok(RiskAssessment {
            patient_name,
            risk_level,
            label: risk_level.label(),
            sos_required,
            notification,
        })
    }
}

/// Error raised by the risk assessment service; terminal for the request.
#[derive(Debug, thiserror::Error)]
pub enum RiskAssessmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Classification(#[from] ClassificationError),
}
