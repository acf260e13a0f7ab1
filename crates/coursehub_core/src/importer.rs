//! crates/coursehub_core/src/importer.rs
//!
//! Bulk quiz import from CSV. Each row is one question; rows are grouped into quizzes
//! by `quizTitle`. Bad rows and bad groups are reported without aborting the batch.

use std::collections::HashMap;

use csv::{Position, ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{OptionDraft, QuestionDraft, QuizDraft, QuizSummary};
use crate::ports::DatabaseService;

pub const DEFAULT_QUIZ_TYPE: &str = "practice";
pub const DEFAULT_QUESTION_TYPE: &str = "multiple-choice";
pub const DEFAULT_DURATION_MINUTES: u32 = 30;
pub const DEFAULT_PASSING_SCORE: u32 = 70;
pub const DEFAULT_POINTS: u32 = 1;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const REQUIRED_COLUMNS: [&str; 2] = ["quizTitle", "questionText"];

/// Errors that reject the whole upload rather than a single row.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("CSV file contains no data rows")]
    NoRows,
    #[error("CSV file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("CSV file could not be read: {0}")]
    Csv(#[from] csv::Error),
}

/// One CSV row as uploaded. Empty cells deserialize to `None`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizImportRow {
    pub quiz_title: Option<String>,
    pub quiz_type: Option<String>,
    pub module_index: Option<u32>,
    pub lesson_index: Option<u32>,
    pub duration: Option<u32>,
    pub passing_score: Option<u32>,
    pub question_text: Option<String>,
    pub question_type: Option<String>,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    pub option4: Option<String>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub points: Option<u32>,
}

/// The result of parsing an upload, before anything is persisted.
#[derive(Debug, Default)]
pub struct ParsedImport {
    /// Quizzes with at least one valid question, in first-seen order.
    pub quizzes: Vec<QuizDraft>,
    pub errors: Vec<String>,
}

#[derive(Debug, Default, PartialEq)]
pub struct ImportSummary {
    pub imported_count: usize,
    pub error_count: usize,
    pub created_quizzes: Vec<QuizSummary>,
    pub error_details: Vec<String>,
}

/// Checks the rules every question must satisfy, whether imported or authored by hand.
pub fn validate_question(question: &QuestionDraft) -> Result<(), String> {
    if question.text.trim().is_empty() {
        return Err("question text is required".to_string());
    }
    if question.options.len() < 2 {
        return Err("question must have at least 2 options".to_string());
    }
    if question.options.iter().any(|option| option.text.trim().is_empty()) {
        return Err("option text must not be empty".to_string());
    }
    if !question.options.iter().any(|option| option.is_correct) {
        return Err("at least one option must be marked correct".to_string());
    }
    Ok(())
}

fn question_from_row(row: QuizImportRow) -> Result<QuestionDraft, String> {
    let correct_answer = row.correct_answer.unwrap_or_default();
    let expected = correct_answer.to_lowercase();
    let options = [row.option1, row.option2, row.option3, row.option4]
        .into_iter()
        .flatten()
        .map(|text| OptionDraft {
            is_correct: !expected.is_empty() && text.to_lowercase() == expected,
            text,
        })
        .collect();

    let question = QuestionDraft {
        text: row.question_text.unwrap_or_default(),
        question_type: row
            .question_type
            .unwrap_or_else(|| DEFAULT_QUESTION_TYPE.to_string()),
        options,
        correct_answer,
        explanation: row.explanation,
        points: row.points.unwrap_or(DEFAULT_POINTS),
    };

    validate_question(&question)?;
    Ok(question)
}

fn quiz_from_row(title: String, row: &QuizImportRow) -> QuizDraft {
    QuizDraft {
        title,
        quiz_type: row
            .quiz_type
            .clone()
            .unwrap_or_else(|| DEFAULT_QUIZ_TYPE.to_string()),
        module_index: row.module_index,
        lesson_index: row.lesson_index,
        duration_minutes: row.duration.unwrap_or(DEFAULT_DURATION_MINUTES),
        passing_score: row.passing_score.unwrap_or(DEFAULT_PASSING_SCORE),
        questions: Vec::new(),
    }
}

/// Names the quiz-level fields of `row` that disagree with the quiz built from the
/// first row of its group. Empty cells never disagree.
fn divergent_fields(quiz: &QuizDraft, row: &QuizImportRow) -> Vec<&'static str> {
    let checks = [
        ("quizType", row.quiz_type.as_ref().is_some_and(|t| *t != quiz.quiz_type)),
        ("moduleIndex", row.module_index.is_some() && row.module_index != quiz.module_index),
        ("lessonIndex", row.lesson_index.is_some() && row.lesson_index != quiz.lesson_index),
        ("duration", row.duration.is_some_and(|d| d != quiz.duration_minutes)),
        ("passingScore", row.passing_score.is_some_and(|s| s != quiz.passing_score)),
    ];
    checks
        .into_iter()
        .filter_map(|(field, differs)| differs.then_some(field))
        .collect()
}

/// The first row of a group decides the quiz-level fields; later rows that disagree
/// are only logged.
fn warn_on_divergence(quiz: &QuizDraft, row: &QuizImportRow, line: u64) {
    let fields = divergent_fields(quiz, row);
    if !fields.is_empty() {
        warn!(
            quiz = %quiz.title,
            line,
            fields = %fields.join(", "),
            "Quiz-level fields differ from the first row of the quiz, keeping the first values"
        );
    }
}

/// A record's position is taken before the reader skips blank lines, so the newlines
/// between that byte offset and the record itself are added back.
fn record_start_line(data: &[u8], position: &Position) -> u64 {
    let start = usize::try_from(position.byte())
        .unwrap_or(data.len())
        .min(data.len());
    let skipped = data[start..]
        .iter()
        .take_while(|byte| matches!(**byte, b'\r' | b'\n'))
        .filter(|byte| **byte == b'\n')
        .count();
    position.line() + skipped as u64
}

/// Parses and validates an upload. Row numbers in error messages are CSV line
/// numbers, with the header on line 1.
pub fn parse_quiz_csv(data: &[u8]) -> Result<ParsedImport, ImportError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let mut parsed = ParsedImport::default();
    let mut groups: Vec<QuizDraft> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut row_count = 0;

    for result in reader.records() {
        row_count += 1;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e
                    .position()
                    .map_or(0, |position| record_start_line(data, position));
                parsed.errors.push(format!("Row {}: could not parse row: {}", line, e));
                continue;
            }
        };
        let line = record
            .position()
            .map_or(0, |position| record_start_line(data, position));

        let row: QuizImportRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                parsed.errors.push(format!("Row {}: could not parse row: {}", line, e));
                continue;
            }
        };

        let Some(title) = row.quiz_title.clone() else {
            parsed.errors.push(format!("Row {}: quizTitle is required", line));
            continue;
        };

        let slot = match group_index.get(&title) {
            Some(&slot) => {
                warn_on_divergence(&groups[slot], &row, line);
                slot
            }
            None => {
                groups.push(quiz_from_row(title.clone(), &row));
                group_index.insert(title.clone(), groups.len() - 1);
                groups.len() - 1
            }
        };

        match question_from_row(row) {
            Ok(question) => groups[slot].questions.push(question),
            Err(reason) => parsed
                .errors
                .push(format!("Row {} (quiz '{}'): {}", line, title, reason)),
        }
    }

    if row_count == 0 {
        return Err(ImportError::NoRows);
    }

    for quiz in groups {
        if quiz.questions.is_empty() {
            parsed
                .errors
                .push(format!("Quiz '{}': no valid questions, quiz not created", quiz.title));
        } else {
            parsed.quizzes.push(quiz);
        }
    }

    Ok(parsed)
}

/// Parses the upload and persists every valid quiz under `course_id`. Each quiz is
/// written on its own; a failed write is reported and the rest continue.
pub async fn import_quizzes(
    db: &dyn DatabaseService,
    course_id: Uuid,
    data: &[u8],
) -> Result<ImportSummary, ImportError> {
    let parsed = parse_quiz_csv(data)?;
    let mut summary = ImportSummary {
        error_details: parsed.errors,
        ..ImportSummary::default()
    };

    for draft in parsed.quizzes {
        match db.create_quiz(course_id, &draft).await {
            Ok(quiz) => summary.created_quizzes.push(quiz.summary()),
            Err(e) => {
                warn!(quiz = %draft.title, "Failed to save imported quiz: {}", e);
                summary
                    .error_details
                    .push(format!("Quiz '{}': failed to save: {}", draft.title, e));
            }
        }
    }

    summary.imported_count = summary.created_quizzes.len();
    summary.error_count = summary.error_details.len();
    info!(
        %course_id,
        imported = summary.imported_count,
        errors = summary.error_count,
        "Quiz import finished"
    );

    Ok(summary)
}
