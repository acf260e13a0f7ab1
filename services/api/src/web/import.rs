//! services/api/src/web/import.rs
//!
//! The bulk CSV quiz import endpoint.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use coursehub_core::importer::{import_quizzes, ImportError};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::protocol::{ErrorResponse, ImportResponse};
use crate::web::state::AppState;

fn multipart_error(context: &str, e: MultipartError) -> ApiError {
    let message = format!("{}: {}", context, e.body_text());
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(message)
    } else {
        ApiError::BadRequest(message)
    }
}

/// Import quizzes for a course from a CSV file.
///
/// Accepts a multipart/form-data request with a `csvFile` file part and a `courseId`
/// text part. Rows that fail validation are reported in `errorDetails`; the valid
/// quizzes are still created.
#[utoipa::path(
    post,
    path = "/content-generation/bulk-import-quizzes",
    request_body(content_type = "multipart/form-data", description = "`csvFile` and `courseId` fields."),
    responses(
        (status = 200, description = "Import finished, possibly with row errors", body = ImportResponse),
        (status = 400, description = "Missing fields or unreadable CSV", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 413, description = "Upload exceeds the size limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn bulk_import_quizzes_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ApiError> {
    let mut csv_data = None;
    let mut course_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart data", e))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("csvFile") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Failed to read file bytes", e))?;
                csv_data = Some(data);
            }
            Some("courseId") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Failed to read courseId", e))?;
                course_id = Some(text);
            }
            _ => {}
        }
    }

    let csv_data =
        csv_data.ok_or_else(|| ApiError::BadRequest("CSV file is required".to_string()))?;
    let course_id = course_id
        .ok_or_else(|| ApiError::BadRequest("courseId is required".to_string()))
        .and_then(|id| {
            Uuid::parse_str(id.trim())
                .map_err(|_| ApiError::BadRequest("Invalid courseId format".to_string()))
        })?;

    app_state
        .db
        .get_course(course_id)
        .await
        .map_err(|e| app_state.port_error("Failed to load course", e))?;

    let summary = import_quizzes(app_state.db.as_ref(), course_id, &csv_data)
        .await
        .map_err(|e: ImportError| ApiError::BadRequest(e.to_string()))?;

    let message = format!(
        "Imported {} quizzes with {} errors",
        summary.imported_count, summary.error_count
    );
    Ok(Json(ImportResponse {
        success: true,
        message,
        data: summary.into(),
    }))
}
