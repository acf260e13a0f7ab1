//! services/api/src/web/certificates.rs
//!
//! Certificate issuance and public verification.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use coursehub_core::certificate::issue_certificate;
use coursehub_core::ports::PortError;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::web::protocol::{
    CertificateResponse, ErrorResponse, IssueCertificateRequest, VerifyCertificateResponse,
};
use crate::web::state::AppState;

/// Issue a completion certificate for a course.
#[utoipa::path(
    post,
    path = "/certificates",
    request_body = IssueCertificateRequest,
    responses(
        (status = 201, description = "Certificate issued", body = CertificateResponse),
        (status = 400, description = "Student name missing", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
pub async fn issue_certificate_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<IssueCertificateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CertificateResponse>), ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;

    let student_name = request
        .student_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Student name is required".to_string()))?;

    let course = app_state
        .db
        .get_course(request.course_id)
        .await
        .map_err(|e| app_state.port_error("Failed to load course", e))?;

    let certificate = issue_certificate(&student_name, &course);
    app_state
        .db
        .save_certificate(&certificate)
        .await
        .map_err(|e| app_state.port_error("Failed to save certificate", e))?;

    info!(
        certificate_id = %certificate.certificate_id,
        course_id = %course.id,
        "Issued certificate"
    );
    Ok((StatusCode::CREATED, Json(certificate.into())))
}

/// Check whether a certificate id was issued by this platform.
#[utoipa::path(
    get,
    path = "/certificates/verify/{certificate_id}",
    params(("certificate_id" = String, Path, description = "Public certificate id, e.g. CERT-20240115-9F86D081")),
    responses(
        (status = 200, description = "Certificate is valid", body = VerifyCertificateResponse),
        (status = 404, description = "No such certificate", body = VerifyCertificateResponse)
    )
)]
pub async fn verify_certificate_handler(
    State(app_state): State<Arc<AppState>>,
    Path(certificate_id): Path<String>,
) -> Result<(StatusCode, Json<VerifyCertificateResponse>), ApiError> {
    match app_state.db.find_certificate(certificate_id.trim()).await {
        Ok(certificate) => Ok((
            StatusCode::OK,
            Json(VerifyCertificateResponse {
                valid: true,
                certificate: Some(certificate.into()),
            }),
        )),
        Err(PortError::NotFound(_)) => Ok((
            StatusCode::NOT_FOUND,
            Json(VerifyCertificateResponse {
                valid: false,
                certificate: None,
            }),
        )),
        Err(e) => Err(app_state.port_error("Failed to verify certificate", e)),
    }
}
