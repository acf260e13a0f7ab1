//! In-memory fakes and request helpers shared by the handler tests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::Utc;
use coursehub_core::assistant::ChatAssistant;
use coursehub_core::domain::{Certificate, Course, Quiz, QuizDraft};
use coursehub_core::generation::{Candidate, FinishReason, GenerationRequest, RawGeneration};
use coursehub_core::ports::{
    DatabaseService, GenerationError, GenerativeModelService, PortError, PortResult,
};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::Level;
use uuid::Uuid;

use crate::config::Config;
use crate::web::state::AppState;

//=========================================================================================
// Fakes
//=========================================================================================

#[derive(Default)]
struct Tables {
    courses: Vec<Course>,
    quizzes: Vec<Quiz>,
    certificates: Vec<Certificate>,
}

/// A `DatabaseService` backed by vectors. Clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryDb {
    tables: Arc<Mutex<Tables>>,
}

#[async_trait]
impl DatabaseService for InMemoryDb {
    async fn create_course(
        &self,
        title: &str,
        description: &str,
        instructor: Option<&str>,
    ) -> PortResult<Course> {
        let course = Course {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            instructor: instructor.map(str::to_string),
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().courses.push(course.clone());
        Ok(course)
    }

    async fn list_courses(&self) -> PortResult<Vec<Course>> {
        Ok(self.tables.lock().unwrap().courses.clone())
    }

    async fn get_course(&self, course_id: Uuid) -> PortResult<Course> {
        self.tables
            .lock()
            .unwrap()
            .courses
            .iter()
            .find(|course| course.id == course_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Course {} not found", course_id)))
    }

    async fn create_quiz(&self, course_id: Uuid, draft: &QuizDraft) -> PortResult<Quiz> {
        let quiz = Quiz {
            id: Uuid::new_v4(),
            course_id,
            title: draft.title.clone(),
            quiz_type: draft.quiz_type.clone(),
            module_index: draft.module_index,
            lesson_index: draft.lesson_index,
            duration_minutes: draft.duration_minutes,
            passing_score: draft.passing_score,
            questions: draft.questions.clone(),
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().quizzes.push(quiz.clone());
        Ok(quiz)
    }

    async fn list_quizzes(&self, course_id: Uuid) -> PortResult<Vec<Quiz>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .quizzes
            .iter()
            .filter(|quiz| quiz.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn save_certificate(&self, certificate: &Certificate) -> PortResult<()> {
        self.tables
            .lock()
            .unwrap()
            .certificates
            .push(certificate.clone());
        Ok(())
    }

    async fn find_certificate(&self, certificate_id: &str) -> PortResult<Certificate> {
        self.tables
            .lock()
            .unwrap()
            .certificates
            .iter()
            .find(|certificate| certificate.certificate_id == certificate_id)
            .cloned()
            .ok_or_else(|| {
                PortError::NotFound(format!("Certificate {} not found", certificate_id))
            })
    }
}

/// Replays `(finish reason, text)` responses in order, then fails.
struct ScriptedModel {
    responses: Mutex<VecDeque<RawGeneration>>,
}

#[async_trait]
impl GenerativeModelService for ScriptedModel {
    async fn generate_content(
        &self,
        _request: &GenerationRequest,
    ) -> Result<RawGeneration, GenerationError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GenerationError::Network("connection refused".to_string()))
    }
}

pub fn scripted_model(script: &[(&str, &str)]) -> Arc<dyn GenerativeModelService> {
    let responses = script
        .iter()
        .map(|(reason, text)| RawGeneration {
            candidates: vec![Candidate {
                finish_reason: Some(FinishReason::parse(reason)),
                text: Some(text.to_string()),
            }],
        })
        .collect();
    Arc::new(ScriptedModel {
        responses: Mutex::new(responses),
    })
}

pub fn failing_model() -> Arc<dyn GenerativeModelService> {
    scripted_model(&[])
}

//=========================================================================================
// App Construction
//=========================================================================================

pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused".to_string(),
        log_level: Level::DEBUG,
        app_env: "test".to_string(),
        gemini_api_key: None,
        gemini_model: "gemini-test".to_string(),
        gemini_base_url: "http://localhost".to_string(),
        gemini_timeout: Duration::from_secs(1),
        chat_max_output_tokens: 1024,
        cors_origin: "http://localhost:5173".to_string(),
        max_upload_bytes: 1024 * 1024,
    }
}

pub fn test_state(
    db: InMemoryDb,
    model: Option<Arc<dyn GenerativeModelService>>,
) -> Arc<AppState> {
    let config = test_config();
    let assistant = model.map(|model| ChatAssistant::new(model, config.chat_max_output_tokens));
    Arc::new(AppState {
        db: Arc::new(db),
        config: Arc::new(config),
        assistant,
    })
}

pub fn app(state: Arc<AppState>) -> Router {
    crate::web::router(state)
}

//=========================================================================================
// Requests and Responses
//=========================================================================================

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a multipart/form-data request from `(name, file name, content)` parts.
pub fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    const BOUNDARY: &str = "coursehub-test-boundary";
    let mut body = String::new();
    for (name, file_name, content) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match file_name {
            Some(file_name) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/csv\r\n\r\n",
                name, file_name
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::Value;

    #[tokio::test]
    async fn test_internal_error_detail_hidden_in_production() {
        let mut config = test_config();
        config.app_env = "production".to_string();
        let state = AppState {
            db: Arc::new(InMemoryDb::default()),
            config: Arc::new(config),
            assistant: None,
        };

        let response = state
            .port_error("Failed to save", PortError::Unexpected("pool timed out".to_string()))
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = read_json(response).await;
        assert_eq!(body["message"], "Failed to save");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_detail_shown_outside_production() {
        let state = test_state(InMemoryDb::default(), None);

        let response = state
            .internal_error("Failed to save", "pool timed out")
            .into_response();

        let body: Value = read_json(response).await;
        assert_eq!(body["error"], "pool timed out");
    }

    #[tokio::test]
    async fn test_startup_errors_render_generic_500() {
        let err = ApiError::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = read_json(response).await;
        assert_eq!(body["success"], false);
    }
}
