//! services/api/src/web/rest.rs
//!
//! The REST router and the root OpenAPI document.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::web::{certificates, chat, courses, import, protocol, state::AppState};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        chat::chat_handler,
        import::bulk_import_quizzes_handler,
        courses::create_course_handler,
        courses::list_courses_handler,
        courses::get_course_handler,
        courses::create_quiz_handler,
        courses::list_quizzes_handler,
        certificates::issue_certificate_handler,
        certificates::verify_certificate_handler,
    ),
    components(
        schemas(
            protocol::ErrorResponse,
            protocol::ChatRequest,
            protocol::ChatResponse,
            protocol::CreateCourseRequest,
            protocol::CourseResponse,
            protocol::CreateQuizRequest,
            protocol::QuizResponse,
            protocol::QuestionPayload,
            protocol::OptionPayload,
            protocol::QuizSummaryResponse,
            protocol::ImportData,
            protocol::ImportResponse,
            protocol::IssueCertificateRequest,
            protocol::CertificateResponse,
            protocol::VerifyCertificateResponse,
        )
    ),
    tags(
        (name = "Coursehub API", description = "Courses, quizzes, certificates and the AI learning assistant.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Router
//=========================================================================================

/// Builds the API router. CORS and the Swagger UI are layered on by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    let body_limit = app_state.config.max_upload_bytes;

    Router::new()
        .route("/api/ai-support/chat", post(chat::chat_handler))
        .route(
            "/content-generation/bulk-import-quizzes",
            post(import::bulk_import_quizzes_handler),
        )
        .route(
            "/courses",
            post(courses::create_course_handler).get(courses::list_courses_handler),
        )
        .route("/courses/{course_id}", get(courses::get_course_handler))
        .route(
            "/courses/{course_id}/quizzes",
            post(courses::create_quiz_handler).get(courses::list_quizzes_handler),
        )
        .route("/certificates", post(certificates::issue_certificate_handler))
        .route(
            "/certificates/verify/{certificate_id}",
            get(certificates::verify_certificate_handler),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/ai-support/chat",
            "/content-generation/bulk-import-quizzes",
            "/courses",
            "/courses/{course_id}",
            "/courses/{course_id}/quizzes",
            "/certificates",
            "/certificates/verify/{certificate_id}",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {}", expected);
        }
    }
}
