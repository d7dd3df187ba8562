use grade_advisor::config::{AppConfig, EngineConfig};
use grade_advisor::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Engine settings from the environment with the command-line switch applied.
pub(crate) fn engine_settings(disable_engine: bool) -> Result<EngineConfig, AppError> {
    let mut settings = AppConfig::load()?.engine;
    if disable_engine {
        settings.enabled = false;
    }
    Ok(settings)
}

pub(crate) fn render_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(AppError::from)
}
