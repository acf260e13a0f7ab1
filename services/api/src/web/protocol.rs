//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.
//! Field names are camelCase to match the frontend.

use chrono::{DateTime, Utc};
use coursehub_core::domain::{
    Certificate, Course, OptionDraft, QuestionDraft, Quiz, QuizDraft, QuizSummary,
};
use coursehub_core::importer::ImportSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Shared
//=========================================================================================

/// The body of every failed request.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Error detail, only present outside production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

//=========================================================================================
// AI Chat
//=========================================================================================

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    /// Present and `true` when the answer was cut off at the token limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
    /// Present and `true` when the answer is a canned fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
}

//=========================================================================================
// Courses and Quizzes
//=========================================================================================

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateCourseRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    pub instructor: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub instructor: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            instructor: course.instructor,
            created_at: course.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionPayload {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    pub text: String,
    #[serde(rename = "type", default = "default_question_type")]
    pub question_type: String,
    #[serde(default)]
    pub options: Vec<OptionPayload>,
    #[serde(default)]
    pub correct_answer: String,
    pub explanation: Option<String>,
    #[serde(default = "default_points")]
    pub points: u32,
}

fn default_question_type() -> String {
    coursehub_core::importer::DEFAULT_QUESTION_TYPE.to_string()
}

fn default_points() -> u32 {
    coursehub_core::importer::DEFAULT_POINTS
}

impl From<QuestionPayload> for QuestionDraft {
    fn from(payload: QuestionPayload) -> Self {
        Self {
            text: payload.text,
            question_type: payload.question_type,
            options: payload
                .options
                .into_iter()
                .map(|option| OptionDraft {
                    text: option.text,
                    is_correct: option.is_correct,
                })
                .collect(),
            correct_answer: payload.correct_answer,
            explanation: payload.explanation,
            points: payload.points,
        }
    }
}

impl From<QuestionDraft> for QuestionPayload {
    fn from(question: QuestionDraft) -> Self {
        Self {
            text: question.text,
            question_type: question.question_type,
            options: question
                .options
                .into_iter()
                .map(|option| OptionPayload {
                    text: option.text,
                    is_correct: option.is_correct,
                })
                .collect(),
            correct_answer: question.correct_answer,
            explanation: question.explanation,
            points: question.points,
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub quiz_type: Option<String>,
    pub module_index: Option<u32>,
    pub lesson_index: Option<u32>,
    pub duration: Option<u32>,
    pub passing_score: Option<u32>,
    #[serde(default)]
    pub questions: Vec<QuestionPayload>,
}

impl From<CreateQuizRequest> for QuizDraft {
    fn from(request: CreateQuizRequest) -> Self {
        use coursehub_core::importer::{
            DEFAULT_DURATION_MINUTES, DEFAULT_PASSING_SCORE, DEFAULT_QUIZ_TYPE,
        };
        Self {
            title: request.title.trim().to_string(),
            quiz_type: request
                .quiz_type
                .unwrap_or_else(|| DEFAULT_QUIZ_TYPE.to_string()),
            module_index: request.module_index,
            lesson_index: request.lesson_index,
            duration_minutes: request.duration.unwrap_or(DEFAULT_DURATION_MINUTES),
            passing_score: request.passing_score.unwrap_or(DEFAULT_PASSING_SCORE),
            questions: request.questions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub quiz_type: String,
    pub module_index: Option<u32>,
    pub lesson_index: Option<u32>,
    pub duration: u32,
    pub passing_score: u32,
    pub questions: Vec<QuestionPayload>,
    pub created_at: DateTime<Utc>,
}

impl From<Quiz> for QuizResponse {
    fn from(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            course_id: quiz.course_id,
            title: quiz.title,
            quiz_type: quiz.quiz_type,
            module_index: quiz.module_index,
            lesson_index: quiz.lesson_index,
            duration: quiz.duration_minutes,
            passing_score: quiz.passing_score,
            questions: quiz.questions.into_iter().map(Into::into).collect(),
            created_at: quiz.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub question_count: usize,
}

impl From<QuizSummary> for QuizSummaryResponse {
    fn from(summary: QuizSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            question_count: summary.question_count,
        }
    }
}

//=========================================================================================
// Bulk Import
//=========================================================================================

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportData {
    pub imported: usize,
    pub errors: usize,
    pub quizzes: Vec<QuizSummaryResponse>,
    pub error_details: Vec<String>,
}

impl From<ImportSummary> for ImportData {
    fn from(summary: ImportSummary) -> Self {
        Self {
            imported: summary.imported_count,
            errors: summary.error_count,
            quizzes: summary.created_quizzes.into_iter().map(Into::into).collect(),
            error_details: summary.error_details,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
    pub data: ImportData,
}

//=========================================================================================
// Certificates
//=========================================================================================

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueCertificateRequest {
    pub student_name: Option<String>,
    pub course_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponse {
    pub certificate_id: String,
    pub student_name: String,
    pub course_id: Uuid,
    pub course_title: String,
    pub issued_at: DateTime<Utc>,
}

impl From<Certificate> for CertificateResponse {
    fn from(certificate: Certificate) -> Self {
        Self {
            certificate_id: certificate.certificate_id,
            student_name: certificate.student_name,
            course_id: certificate.course_id,
            course_title: certificate.course_title,
            issued_at: certificate.issued_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct VerifyCertificateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<CertificateResponse>,
}
