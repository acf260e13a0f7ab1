//! crates/coursehub_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Certificate, ChatReply, Course, Quiz, QuizDraft};
use crate::generation::{GenerationRequest, RawGeneration};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Failure of a single call to the generative model. The caller decides what to do
/// with it; the client never retries on its own.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Transport failure, including the request timing out.
    #[error("Network error: {0}")]
    Network(String),
    #[error("Model API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Could not decode model response: {0}")]
    Decode(String),
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Courses ---
    async fn create_course(
        &self,
        title: &str,
        description: &str,
        instructor: Option<&str>,
    ) -> PortResult<Course>;

    async fn list_courses(&self) -> PortResult<Vec<Course>>;

    async fn get_course(&self, course_id: Uuid) -> PortResult<Course>;

    // --- Quizzes ---
    async fn create_quiz(&self, course_id: Uuid, draft: &QuizDraft) -> PortResult<Quiz>;

    async fn list_quizzes(&self, course_id: Uuid) -> PortResult<Vec<Quiz>>;

    // --- Certificates ---
    async fn save_certificate(&self, certificate: &Certificate) -> PortResult<()>;

    async fn find_certificate(&self, certificate_id: &str) -> PortResult<Certificate>;
}

#[async_trait]
pub trait GenerativeModelService: Send + Sync {
    /// Issues exactly one generation request and returns the decoded response.
    async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<RawGeneration, GenerationError>;
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Delivers one user message and waits for the single reply to it.
    async fn send(&self, message: &str) -> PortResult<ChatReply>;
}
