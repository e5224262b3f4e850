use std::sync::Mutex;

use maternal_guard::workflows::risk::{
    AlertDispatcher, AlertMessage, AlertTransport, ClassificationError, MailRelay, ModelError,
    NotificationError, RiskAssessmentRequest, RiskAssessmentService, RiskClassifier, RiskLevel,
    RiskModel, TreeEnsembleModel, VitalsInput, VitalsSample,
};

const MODEL_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../models/maternal_risk.json");

struct FixtureModel(i64);

impl RiskModel for FixtureModel {
    fn predict(&self, _features: [f64; 6]) -> Result<i64, ModelError> {
        Ok(self.0)
    }
}

struct DroppedConnection;

impl AlertTransport for DroppedConnection {
    fn deliver(&self, _message: &AlertMessage) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("connection reset by peer".to_string()))
    }
}

#[derive(Default)]
struct Outbox(Mutex<Vec<AlertMessage>>);

impl AlertTransport for Outbox {
    fn deliver(&self, message: &AlertMessage) -> Result<(), NotificationError> {
        self.0.lock().expect("outbox mutex").push(message.clone());
        Ok(())
    }
}

fn high_risk_sample() -> VitalsSample {
    VitalsSample::new(28, 150, 95, 110, 88, 38.5).expect("valid vitals")
}

#[test]
fn high_risk_fixture_then_failed_alert_returns_false() {
    let classifier = RiskClassifier::new(FixtureModel(2));
    let risk = classifier.classify(&high_risk_sample()).expect("classifies");
    assert_eq!(risk, RiskLevel::High);

    let dispatcher = AlertDispatcher::new(DroppedConnection);
    assert!(!dispatcher.send_alert("Meera", risk));
}

#[test]
fn classify_returns_exactly_one_level_for_every_code() {
    let sample = high_risk_sample();
    for code in 0..=2 {
        let level = RiskClassifier::new(FixtureModel(code))
            .classify(&sample)
            .expect("known code maps");
        assert_eq!(RiskLevel::from_code(code), Some(level));
    }

    assert!(matches!(
        RiskClassifier::new(FixtureModel(5)).classify(&sample),
        Err(ClassificationError::UnmappedPrediction(5))
    ));
}

#[test]
fn shipped_model_artifact_loads_and_grades_vitals() {
    let model = TreeEnsembleModel::from_path(MODEL_PATH).expect("artifact loads");
    let classifier = RiskClassifier::new(model);

    let high = classifier.classify(&high_risk_sample()).expect("classifies");
    assert_eq!(high, RiskLevel::High);

    let low = VitalsSample::new(25, 110, 70, 80, 98, 36.8).expect("valid vitals");
    assert_eq!(classifier.classify(&low).expect("classifies"), RiskLevel::Low);

    let mid = VitalsSample::new(30, 130, 85, 105, 95, 37.2).expect("valid vitals");
    assert_eq!(classifier.classify(&mid).expect("classifies"), RiskLevel::Mid);
}

#[test]
fn service_with_shipped_model_sends_alert_for_high_risk() {
    let model = TreeEnsembleModel::from_path(MODEL_PATH).expect("artifact loads");
    let service = RiskAssessmentService::new(model, Outbox::default());

    let assessment = service
        .assess(RiskAssessmentRequest {
            patient_name: "Meera".to_string(),
            vitals: VitalsInput {
                age: 28,
                systolic_bp: 150,
                diastolic_bp: 95,
                heart_rate: 110,
                oxygen_level: 88,
                temperature: 38.5,
            },
            notify: true,
        })
        .expect("assessment succeeds");

    assert_eq!(assessment.risk_level, RiskLevel::High);
    assert_eq!(assessment.notification.map(|outcome| outcome.sent), Some(true));
    let outbox = service.dispatcher().transport().0.lock().expect("outbox mutex");
    assert_eq!(outbox.len(), 1);
}

#[test]
fn unconfigured_relay_reports_not_sent() {
    let service = RiskAssessmentService::new(
        FixtureModel(2),
        MailRelay::from_config(None).expect("disabled relay"),
    );

    let assessment = service
        .assess(RiskAssessmentRequest {
            patient_name: "Meera".to_string(),
            vitals: VitalsInput {
                age: 28,
                systolic_bp: 150,
                diastolic_bp: 95,
                heart_rate: 110,
                oxygen_level: 88,
                temperature: 38.5,
            },
            notify: true,
        })
        .expect("assessment succeeds");

    let notification = assessment.notification.expect("alert attempted");
    assert!(!notification.sent);
    assert!(notification
        .error
        .expect("error message")
        .contains("not configured"));
}
