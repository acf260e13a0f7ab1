//! crates/coursehub_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

//=========================================================================================
// Course Content
//=========================================================================================

/// A course that quizzes and certificates hang off.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub instructor: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A single answer choice of a question.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDraft {
    pub text: String,
    pub is_correct: bool,
}

/// A question as authored, before or after persistence (questions live inside their quiz).
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    pub text: String,
    pub question_type: String,
    pub options: Vec<OptionDraft>,
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub points: u32,
}

/// A quiz that has not been persisted yet, e.g. one group of imported CSV rows.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizDraft {
    pub title: String,
    pub quiz_type: String,
    pub module_index: Option<u32>,
    pub lesson_index: Option<u32>,
    pub duration_minutes: u32,
    pub passing_score: u32,
    pub questions: Vec<QuestionDraft>,
}

/// A persisted quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub quiz_type: String,
    pub module_index: Option<u32>,
    pub lesson_index: Option<u32>,
    pub duration_minutes: u32,
    pub passing_score: u32,
    pub questions: Vec<QuestionDraft>,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            id: self.id,
            title: self.title.clone(),
            question_count: self.questions.len(),
        }
    }
}

/// The short form of a quiz reported back by the importer and the listing endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSummary {
    pub id: Uuid,
    pub title: String,
    pub question_count: usize,
}

/// A course completion certificate. `certificate_id` is the public, human-readable
/// identifier used for verification.
#[derive(Debug, Clone, PartialEq)]
pub struct Certificate {
    pub id: Uuid,
    pub certificate_id: String,
    pub student_name: String,
    pub course_id: Uuid,
    pub course_title: String,
    pub issued_at: DateTime<Utc>,
}

//=========================================================================================
// AI Chat
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Bot,
}

/// One entry of a chat transcript. Immutable once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub suggestions: Vec<String>,
    pub is_error: bool,
    pub is_partial: bool,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text.into())
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Bot, text.into())
    }

    fn new(role: ChatRole, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text,
            timestamp: Utc::now(),
            suggestions: Vec::new(),
            is_error: false,
            is_partial: false,
        }
    }
}

/// The answer to one chat turn as the assistant (or its HTTP proxy) reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    /// The model stopped at its token limit; `text` ends with an ellipsis.
    pub partial: bool,
    /// The model was not used; `text` comes from the canned fallback answers.
    pub fallback: bool,
}

impl ChatReply {
    pub fn answer(text: String) -> Self {
        Self {
            text,
            partial: false,
            fallback: false,
        }
    }

    pub fn partial(text: String) -> Self {
        Self {
            text,
            partial: true,
            fallback: false,
        }
    }

    pub fn fallback(text: String) -> Self {
        Self {
            text,
            partial: false,
            fallback: true,
        }
    }
}
