use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::risk::alert::{AlertMessage, AlertTransport, NotificationError};
use crate::workflows::risk::classifier::{ModelError, RiskModel};
use crate::workflows::risk::service::{RiskAssessmentRequest, RiskAssessmentService};
use crate::workflows::risk::vitals::VitalsInput;

/// Model fixture returning a scripted class code and recording its inputs.
pub(super) struct ScriptedModel {
    code: i64,
    pub(super) calls: Mutex<Vec<[f64; 6]>>,
}

impl ScriptedModel {
    pub(super) fn returning(code: i64) -> Self {
        Self {
            code,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl RiskModel for ScriptedModel {
    fn predict(&self, features: [f64; 6]) -> Result<i64, ModelError> {
        self.calls.lock().expect("model mutex").push(features);
        Ok(self.code)
    }
}

#[derive(Default)]
pub(super) struct RecordingTransport {
    sent: Mutex<Vec<AlertMessage>>,
}

impl RecordingTransport {
    pub(super) fn sent(&self) -> Vec<AlertMessage> {
        self.sent.lock().expect("transport mutex").clone()
    }
}

impl AlertTransport for RecordingTransport {
    fn deliver(&self, message: &AlertMessage) -> Result<(), NotificationError> {
        self.sent.lock().expect("transport mutex").push(message.clone());
        Ok(())
    }
}

/// Simulates a relay that refuses the connection.
pub(super) struct FailingTransport;

impl AlertTransport for FailingTransport {
    fn deliver(&self, _message: &AlertMessage) -> Result<(), NotificationError> {
        Err(NotificationError::Transport(
            "connection refused by smtp.example.org:587".to_string(),
        ))
    }
}

pub(super) fn high_risk_vitals() -> VitalsInput {
    VitalsInput {
        age: 28,
        systolic_bp: 150,
        diastolic_bp: 95,
        heart_rate: 110,
        oxygen_level: 88,
        temperature: 38.5,
    }
}

pub(super) fn request(notify: bool) -> RiskAssessmentRequest {
    RiskAssessmentRequest {
        patient_name: "Asha Rao".to_string(),
        vitals: high_risk_vitals(),
        notify,
    }
}

pub(super) fn build_service(
    code: i64,
) -> (
    RiskAssessmentService<Arc<ScriptedModel>, Arc<RecordingTransport>>,
    Arc<ScriptedModel>,
    Arc<RecordingTransport>,
) {
    let model = Arc::new(ScriptedModel::returning(code));
    let transport = Arc::new(RecordingTransport::default());
    let service = RiskAssessmentService::new(model.clone(), transport.clone());
    (service, model, transport)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
