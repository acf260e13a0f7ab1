//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coursehub_core::domain::{Certificate, Course, OptionDraft, QuestionDraft, Quiz, QuizDraft};
use coursehub_core::ports::{DatabaseService, PortError, PortResult};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn not_found_or_unexpected(e: sqlx::Error, what: String) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what),
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct CourseRecord {
    id: Uuid,
    title: String,
    description: String,
    instructor: Option<String>,
    created_at: DateTime<Utc>,
}
impl CourseRecord {
    fn to_domain(self) -> Course {
        Course {
            id: self.id,
            title: self.title,
            description: self.description,
            instructor: self.instructor,
            created_at: self.created_at,
        }
    }
}

/// How a question is laid out inside the `quizzes.questions` JSON column.
#[derive(Serialize, Deserialize)]
struct QuestionDocument {
    text: String,
    question_type: String,
    options: Vec<OptionDocument>,
    correct_answer: String,
    explanation: Option<String>,
    points: u32,
}

#[derive(Serialize, Deserialize)]
struct OptionDocument {
    text: String,
    is_correct: bool,
}

impl QuestionDocument {
    fn from_domain(question: &QuestionDraft) -> Self {
        Self {
            text: question.text.clone(),
            question_type: question.question_type.clone(),
            options: question
                .options
                .iter()
                .map(|option| OptionDocument {
                    text: option.text.clone(),
                    is_correct: option.is_correct,
                })
                .collect(),
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
            points: question.points,
        }
    }

    fn to_domain(self) -> QuestionDraft {
        QuestionDraft {
            text: self.text,
            question_type: self.question_type,
            options: self
                .options
                .into_iter()
                .map(|option| OptionDraft {
                    text: option.text,
                    is_correct: option.is_correct,
                })
                .collect(),
            correct_answer: self.correct_answer,
            explanation: self.explanation,
            points: self.points,
        }
    }
}

#[derive(FromRow)]
struct QuizRecord {
    id: Uuid,
    course_id: Uuid,
    title: String,
    quiz_type: String,
    module_index: Option<i32>,
    lesson_index: Option<i32>,
    duration_minutes: i32,
    passing_score: i32,
    questions: Json<Vec<QuestionDocument>>,
    created_at: DateTime<Utc>,
}
impl QuizRecord {
    fn to_domain(self) -> Quiz {
        Quiz {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            quiz_type: self.quiz_type,
            module_index: self.module_index.map(|i| i as u32),
            lesson_index: self.lesson_index.map(|i| i as u32),
            duration_minutes: self.duration_minutes as u32,
            passing_score: self.passing_score as u32,
            questions: self
                .questions
                .0
                .into_iter()
                .map(QuestionDocument::to_domain)
                .collect(),
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct CertificateRecord {
    id: Uuid,
    certificate_id: String,
    student_name: String,
    course_id: Uuid,
    course_title: String,
    issued_at: DateTime<Utc>,
}
impl CertificateRecord {
    fn to_domain(self) -> Certificate {
        Certificate {
            id: self.id,
            certificate_id: self.certificate_id,
            student_name: self.student_name,
            course_id: self.course_id,
            course_title: self.course_title,
            issued_at: self.issued_at,
        }
    }
}

const QUIZ_COLUMNS: &str = "id, course_id, title, quiz_type, module_index, lesson_index, \
                            duration_minutes, passing_score, questions, created_at";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_course(
        &self,
        title: &str,
        description: &str,
        instructor: Option<&str>,
    ) -> PortResult<Course> {
        let record = sqlx::query_as::<_, CourseRecord>(
            "INSERT INTO courses (id, title, description, instructor) VALUES ($1, $2, $3, $4) \
             RETURNING id, title, description, instructor, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(description)
        .bind(instructor)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(record.to_domain())
    }

    async fn list_courses(&self) -> PortResult<Vec<Course>> {
        let records = sqlx::query_as::<_, CourseRecord>(
            "SELECT id, title, description, instructor, created_at FROM courses ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let courses = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(courses)
    }

    async fn get_course(&self, course_id: Uuid) -> PortResult<Course> {
        let record = sqlx::query_as::<_, CourseRecord>(
            "SELECT id, title, description, instructor, created_at FROM courses WHERE id = $1",
        )
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_unexpected(e, format!("Course {} not found", course_id)))?;
        Ok(record.to_domain())
    }

    async fn create_quiz(&self, course_id: Uuid, draft: &QuizDraft) -> PortResult<Quiz> {
        let questions: Vec<QuestionDocument> =
            draft.questions.iter().map(QuestionDocument::from_domain).collect();

        let record = sqlx::query_as::<_, QuizRecord>(&format!(
            "INSERT INTO quizzes (id, course_id, title, quiz_type, module_index, lesson_index, \
             duration_minutes, passing_score, questions) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            QUIZ_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(course_id)
        .bind(&draft.title)
        .bind(&draft.quiz_type)
        .bind(draft.module_index.map(|i| i as i32))
        .bind(draft.lesson_index.map(|i| i as i32))
        .bind(draft.duration_minutes as i32)
        .bind(draft.passing_score as i32)
        .bind(Json(questions))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(record.to_domain())
    }

    async fn list_quizzes(&self, course_id: Uuid) -> PortResult<Vec<Quiz>> {
        let records = sqlx::query_as::<_, QuizRecord>(&format!(
            "SELECT {} FROM quizzes WHERE course_id = $1 ORDER BY created_at ASC",
            QUIZ_COLUMNS
        ))
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let quizzes = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(quizzes)
    }

    async fn save_certificate(&self, certificate: &Certificate) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO certificates (id, certificate_id, student_name, course_id, course_title, issued_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(certificate.id)
        .bind(&certificate.certificate_id)
        .bind(&certificate.student_name)
        .bind(certificate.course_id)
        .bind(&certificate.course_title)
        .bind(certificate.issued_at)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn find_certificate(&self, certificate_id: &str) -> PortResult<Certificate> {
        let record = sqlx::query_as::<_, CertificateRecord>(
            "SELECT id, certificate_id, student_name, course_id, course_title, issued_at \
             FROM certificates WHERE certificate_id = $1",
        )
        .bind(certificate_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            not_found_or_unexpected(e, format!("Certificate {} not found", certificate_id))
        })?;
        Ok(record.to_domain())
    }
}
