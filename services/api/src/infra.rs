use job_tracker::applications::{JsonFileRepository, YearMonth};
use job_tracker::config::AppConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_month(raw: &str) -> Result<YearMonth, String> {
    raw.parse::<YearMonth>().map_err(|err| err.to_string())
}

/// The `--data-file` flag wins over `APP_DATA_FILE`.
pub(crate) fn file_repository(
    config: &AppConfig,
    data_file: Option<PathBuf>,
) -> JsonFileRepository {
    JsonFileRepository::new(data_file.unwrap_or_else(|| config.storage.data_file.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_month_reports_expected_format() {
        assert_eq!(
            parse_month("2024-11"),
            Ok(YearMonth::new(2024, 11).expect("valid"))
        );
        let err = parse_month("11/2024").expect_err("rejected");
        assert!(err.contains("YYYY-MM"));
    }
}
