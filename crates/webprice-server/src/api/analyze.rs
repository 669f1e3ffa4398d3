use std::path::Path;

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use webprice_engine::{analyze_bytes, AnalysisReport, TracingObserver};

use crate::middleware::RequestId;

use super::{ApiError, AppState, ResponseMeta};

const FILE_FIELD: &str = "file";
const ALLOWED_EXTENSIONS: [&str; 3] = ["csv", "txt", "tsv"];

#[derive(Debug, Serialize)]
pub(super) struct AnalyzeResponse {
    #[serde(flatten)]
    report: AnalysisReport,
    meta: ResponseMeta,
}

struct Upload {
    file_name: String,
    bytes: Bytes,
}

pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let request_id = req_id.0;
    let mut multipart =
        multipart.map_err(|e| ApiError::bad_request(request_id.clone(), e.body_text()))?;
    let Upload { file_name, bytes } = read_upload(&mut multipart, &request_id).await?;

    tracing::info!(
        request_id = %request_id,
        file = %file_name,
        bytes = bytes.len(),
        "analyzing upload"
    );

    let settings = state.config.analysis.clone();
    let outcome =
        tokio::task::spawn_blocking(move || analyze_bytes(&bytes, &settings, &TracingObserver))
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "analysis task failed");
                ApiError::new(request_id.clone(), "internal_error", "analysis task failed")
            })?;

    let report = outcome.map_err(|e| {
        tracing::warn!(
            request_id = %request_id,
            file = %file_name,
            code = e.code(),
            error = %e,
            "upload rejected"
        );
        ApiError::new(request_id.clone(), e.code(), e.to_string())
    })?;

    tracing::info!(
        request_id = %request_id,
        file = %file_name,
        rows = report.diagnostics.rows,
        suggestions = report.data.len(),
        "analysis complete"
    );

    Ok(Json(AnalyzeResponse {
        report,
        meta: ResponseMeta::new(request_id),
    }))
}

/// Pulls the `file` field out of the form, rejecting anything unusable.
async fn read_upload(multipart: &mut Multipart, request_id: &str) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(request_id, &e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::trim).unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(ApiError::bad_request(request_id, "no file selected"));
        }
        if !has_allowed_extension(&file_name) {
            return Err(ApiError::bad_request(
                request_id,
                format!("unsupported file type for {file_name}; expected .csv, .txt or .tsv"),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(request_id, &e))?;
        if bytes.is_empty() {
            return Err(ApiError::bad_request(request_id, "uploaded file is empty"));
        }
        return Ok(Upload { file_name, bytes });
    }

    Err(ApiError::bad_request(
        request_id,
        format!("missing multipart field `{FILE_FIELD}`"),
    ))
}

fn multipart_error(request_id: &str, error: &MultipartError) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::new(request_id, "payload_too_large", "uploaded file is too large")
    } else {
        ApiError::bad_request(request_id, error.body_text())
    }
}

fn has_allowed_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_allowed_extension("export.csv"));
        assert!(has_allowed_extension("EXPORT.CSV"));
        assert!(has_allowed_extension("dump.tsv"));
        assert!(has_allowed_extension("relatorio final.txt"));
    }

    #[test]
    fn extension_check_rejects_other_files() {
        assert!(!has_allowed_extension("export.xlsx"));
        assert!(!has_allowed_extension("csv"));
        assert!(!has_allowed_extension("export.csv.gz"));
        assert!(!has_allowed_extension(""));
    }
}
