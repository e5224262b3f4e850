use crate::cli::ServeArgs;
use crate::infra::{apply_overrides, build_registry, build_risk_service, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use maternal_guard::config::AppConfig;
use maternal_guard::error::AppError;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut config: AppConfig, mut args: ServeArgs) -> Result<(), AppError> {
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    apply_overrides(&mut config, args.donor_csv.take(), args.model.take());

    let risk_service = Arc::new(build_risk_service(&config)?);
    let registry = Arc::new(build_registry(&config));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_service_routes(risk_service, registry)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        donor_csv = %config.storage.donor_csv.display(),
        "maternal guard service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
