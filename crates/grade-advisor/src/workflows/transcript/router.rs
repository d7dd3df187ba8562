use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;

use super::domain::{Module, ModuleRecord};
use super::import::TranscriptImporter;
use super::report::views::TranscriptReportSummary;
use super::Transcript;
use crate::config::EngineConfig;
use crate::error::AppError;

/// Transcript supplied either as a CSV export, as extracted records, or both.
#[derive(Debug, Default, Deserialize)]
pub struct TranscriptReportRequest {
    #[serde(default)]
    pub transcript_csv: Option<String>,
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
    #[serde(default)]
    pub include_modules: bool,
}

/// Router builder exposing the transcript report endpoint.
pub fn transcript_router(settings: Arc<EngineConfig>) -> Router {
    Router::new()
        .route("/api/v1/transcript/report", post(report_handler))
        .with_state(settings)
}

pub(crate) async fn report_handler(
    State(settings): State<Arc<EngineConfig>>,
    axum::Json(request): axum::Json<TranscriptReportRequest>,
) -> Response {
    match build_summary(&settings, request) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error.into_response(),
    }
}

fn build_summary(
    settings: &EngineConfig,
    request: TranscriptReportRequest,
) -> Result<TranscriptReportSummary, AppError> {
    let mut transcript = match request.transcript_csv.as_deref() {
        Some(csv) => {
            let imported = TranscriptImporter::from_reader(Cursor::new(csv.as_bytes()))?;
            if imported.orphan_elements > 0 {
                tracing::debug!(
                    orphan_elements = imported.orphan_elements,
                    "transcript export contained elements outside modules"
                );
            }
            imported.transcript
        }
        None => Transcript::default(),
    };
    transcript.extend(request.modules.into_iter().map(Module::from_record));

    let engine = settings.engine();
    let mut summary = transcript.report(engine.as_ref()).summary();
    if !request.include_modules {
        summary.modules.clear();
    }
    Ok(summary)
}
