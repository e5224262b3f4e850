use maternal_guard::config::AppConfig;
use maternal_guard::error::AppError;
use maternal_guard::workflows::donors::{CsvDonorStore, DonorRegistry};
use maternal_guard::workflows::risk::{MailRelay, RiskAssessmentService, TreeEnsembleModel};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) type RiskService = RiskAssessmentService<TreeEnsembleModel, MailRelay>;
pub(crate) type Registry = DonorRegistry<CsvDonorStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the pinned model and mail relay; a missing or incompatible model is fatal.
pub(crate) fn build_risk_service(config: &AppConfig) -> Result<RiskService, AppError> {
    let model = TreeEnsembleModel::from_path(&config.model.path)?;
    info!(
        model = model.name(),
        trees = model.tree_count(),
        path = %config.model.path.display(),
        "risk model loaded"
    );

    let relay = MailRelay::from_config(config.notification.as_ref())?;
    if !relay.is_enabled() {
        warn!("APP_ALERT_RECIPIENT not set; SOS alerts will be reported as not sent");
    }

    Ok(RiskAssessmentService::new(model, relay))
}

pub(crate) fn build_registry(config: &AppConfig) -> Registry {
    DonorRegistry::new(Arc::new(CsvDonorStore::new(
        config.storage.donor_csv.clone(),
    )))
}

pub(crate) fn apply_overrides(
    config: &mut AppConfig,
    donor_csv: Option<PathBuf>,
    model: Option<PathBuf>,
) {
    if let Some(path) = donor_csv {
        config.storage.donor_csv = path;
    }
    if let Some(path) = model {
        config.model.path = path;
    }
}
