use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, info, warn};

use crate::error::ExportError;
use crate::export::{export_issues, Export, ExportRequest, CONTENT_TYPE};
use crate::sonar::SonarClient;

use super::AppState;

pub async fn index() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

pub async fn health() -> &'static str {
    "ok"
}

/// `POST /api/export` - returns the workbook or `{ "error": ... }`
pub async fn export(
    State(state): State<AppState>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected export request body");
            return error_response(StatusCode::BAD_REQUEST, &rejection.body_text());
        }
    };

    match run_export(&state, request).await {
        Ok(export) => {
            info!(
                file = %export.filename,
                issues = export.issue_count,
                bytes = export.bytes.len(),
                "export ready"
            );
            workbook_response(export)
        }
        Err(err) => err.into_response(),
    }
}

async fn run_export(state: &AppState, request: ExportRequest) -> Result<Export, ExportError> {
    let request = request.validate()?;
    let client = SonarClient::with_http(state.http.clone(), &request.base_url, &request.token);
    export_issues(&client, &request, &state.pagination).await
}

fn workbook_response(export: Export) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    (
        [
            (header::CONTENT_TYPE, CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.bytes,
    )
        .into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.is_validation() {
            warn!(error = %self, "invalid export request");
        } else {
            error!(error = %self, "export failed");
        }
        error_response(status, &self.to_string())
    }
}
