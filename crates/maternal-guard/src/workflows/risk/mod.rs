//! Maternal risk assessment: vitals validation, model-backed classification, and SOS alerts.

pub mod alert;
pub mod classifier;
pub mod model;
pub mod router;
pub mod service;
pub mod smtp;
pub mod vitals;

#[cfg(test)]
mod tests;

pub use alert::{AlertDispatcher, AlertMessage, AlertTransport, NotificationError};
pub use classifier::{ClassificationError, ModelError, RiskClassifier, RiskLevel, RiskModel};
pub use model::{ModelLoadError, TreeEnsembleModel};
pub use router::risk_router;
pub use service::{
    NotificationOutcome, RiskAssessment, RiskAssessmentError, RiskAssessmentRequest,
    RiskAssessmentService,
};
pub use smtp::{MailRelay, SmtpAlertTransport};
pub use vitals::{ValidationError, VitalField, VitalsInput, VitalsSample};
