use crate::cli::ServeArgs;
use crate::infra::{file_repository, AppState};
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_tracker::applications::{
    ApplicationRepository, ApplicationService, InMemoryApplicationRepository,
};
use job_tracker::config::AppConfig;
use job_tracker::error::AppError;
use job_tracker::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if args.in_memory {
        warn!("serving from memory; applications are discarded on shutdown");
        let repository = Arc::new(InMemoryApplicationRepository::default());
        serve(&config, repository).await
    } else {
        let repository = Arc::new(file_repository(&config, args.data_file.take()));
        info!(data_file = %repository.path().display(), "using JSON application store");
        serve(&config, repository).await
    }
}

async fn serve<R>(config: &AppConfig, repository: Arc<R>) -> Result<(), AppError>
where
    R: ApplicationRepository + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let application_service = Arc::new(ApplicationService::new(repository));

    let app = with_application_routes(application_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job application tracker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
