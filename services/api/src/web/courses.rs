//! services/api/src/web/courses.rs
//!
//! Course authoring and quiz creation endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use coursehub_core::domain::QuizDraft;
use coursehub_core::importer::validate_question;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::protocol::{
    CourseResponse, CreateCourseRequest, CreateQuizRequest, ErrorResponse, QuizResponse,
};
use crate::web::state::AppState;

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))
}

/// Create a course.
#[utoipa::path(
    post,
    path = "/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Title missing", body = ErrorResponse)
    )
)]
pub async fn create_course_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreateCourseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    let request = json_body(payload)?;
    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Course title is required".to_string()))?;

    let course = app_state
        .db
        .create_course(title, request.description.trim(), request.instructor.as_deref())
        .await
        .map_err(|e| app_state.port_error("Failed to create course", e))?;

    info!(course_id = %course.id, "Created course");
    Ok((StatusCode::CREATED, Json(course.into())))
}

/// List all courses.
#[utoipa::path(
    get,
    path = "/courses",
    responses((status = 200, description = "All courses", body = [CourseResponse]))
)]
pub async fn list_courses_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = app_state
        .db
        .list_courses()
        .await
        .map_err(|e| app_state.port_error("Failed to list courses", e))?;
    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// Fetch a single course.
#[utoipa::path(
    get,
    path = "/courses/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "The course", body = CourseResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
pub async fn get_course_handler(
    State(app_state): State<Arc<AppState>>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = app_state
        .db
        .get_course(course_id)
        .await
        .map_err(|e| app_state.port_error("Failed to load course", e))?;
    Ok(Json(course.into()))
}

/// Create a quiz by hand. Questions follow the same rules as imported ones.
#[utoipa::path(
    post,
    path = "/courses/{course_id}/quizzes",
    params(("course_id" = Uuid, Path, description = "Course id")),
    request_body = CreateQuizRequest,
    responses(
        (status = 201, description = "Quiz created", body = QuizResponse),
        (status = 400, description = "Invalid quiz", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
pub async fn create_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    Path(course_id): Path<Uuid>,
    payload: Result<Json<CreateQuizRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    let draft: QuizDraft = json_body(payload)?.into();

    if draft.title.is_empty() {
        return Err(ApiError::BadRequest("Quiz title is required".to_string()));
    }
    if draft.questions.is_empty() {
        return Err(ApiError::BadRequest(
            "Quiz must have at least one question".to_string(),
        ));
    }
    let problems: Vec<String> = draft
        .questions
        .iter()
        .enumerate()
        .filter_map(|(i, question)| {
            validate_question(question)
                .err()
                .map(|reason| format!("Question {}: {}", i + 1, reason))
        })
        .collect();
    if !problems.is_empty() {
        return Err(ApiError::BadRequest(problems.join("; ")));
    }

    app_state
        .db
        .get_course(course_id)
        .await
        .map_err(|e| app_state.port_error("Failed to load course", e))?;

    let quiz = app_state
        .db
        .create_quiz(course_id, &draft)
        .await
        .map_err(|e| app_state.port_error("Failed to create quiz", e))?;

    info!(quiz_id = %quiz.id, %course_id, "Created quiz");
    Ok((StatusCode::CREATED, Json(quiz.into())))
}

/// List the quizzes of a course.
#[utoipa::path(
    get,
    path = "/courses/{course_id}/quizzes",
    params(("course_id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Quizzes of the course", body = [QuizResponse]),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
pub async fn list_quizzes_handler(
    State(app_state): State<Arc<AppState>>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<QuizResponse>>, ApiError> {
    app_state
        .db
        .get_course(course_id)
        .await
        .map_err(|e| app_state.port_error("Failed to load course", e))?;

    let quizzes = app_state
        .db
        .list_quizzes(course_id)
        .await
        .map_err(|e| app_state.port_error("Failed to list quizzes", e))?;
    Ok(Json(quizzes.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use crate::web::test_support::{app, get, post_json, read_json, test_state, InMemoryDb};
    use axum::http::StatusCode;
    use coursehub_core::ports::DatabaseService;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_create_and_fetch_course() {
        let db = InMemoryDb::default();
        let router = app(test_state(db.clone(), None));

        let response = router
            .clone()
            .oneshot(post_json(
                "/courses",
                json!({ "title": " Intro to CSS ", "description": "Styling", "instructor": "Grace" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Value = read_json(response).await;
        assert_eq!(created["title"], "Intro to CSS");

        let id = created["id"].as_str().unwrap();
        let response = router.oneshot(get(&format!("/courses/{}", id))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: Value = read_json(response).await;
        assert_eq!(fetched["instructor"], "Grace");
        assert_eq!(db.list_courses().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_course_without_title_is_400() {
        let response = app(test_state(InMemoryDb::default(), None))
            .oneshot(post_json("/courses", json!({ "description": "no title" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_course_is_404() {
        let response = app(test_state(InMemoryDb::default(), None))
            .oneshot(get(&format!("/courses/{}", Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_quiz_and_list() {
        let db = InMemoryDb::default();
        let course = db.create_course("JS", "", None).await.unwrap();
        let router = app(test_state(db, None));
        let uri = format!("/courses/{}/quizzes", course.id);

        let response = router
            .clone()
            .oneshot(post_json(
                &uri,
                json!({
                    "title": "Arrays",
                    "passingScore": 60,
                    "questions": [{
                        "text": "Which method adds to the end?",
                        "options": [
                            { "text": "push", "isCorrect": true },
                            { "text": "shift" }
                        ],
                        "correctAnswer": "push"
                    }]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let quiz: Value = read_json(response).await;
        assert_eq!(quiz["passingScore"], 60);
        assert_eq!(quiz["duration"], 30);
        assert_eq!(quiz["type"], "practice");
        assert_eq!(quiz["questions"][0]["points"], 1);

        let response = router.oneshot(get(&uri)).await.unwrap();
        let quizzes: Value = read_json(response).await;
        assert_eq!(quizzes.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_quiz_with_invalid_question_is_400() {
        let db = InMemoryDb::default();
        let course = db.create_course("JS", "", None).await.unwrap();

        let response = app(test_state(db, None))
            .oneshot(post_json(
                &format!("/courses/{}/quizzes", course.id),
                json!({
                    "title": "Arrays",
                    "questions": [{ "text": "Lonely?", "options": [{ "text": "yes", "isCorrect": true }] }]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_json(response).await;
        assert_eq!(body["message"], "Question 1: question must have at least 2 options");
    }

    #[tokio::test]
    async fn test_quiz_with_blank_option_is_400() {
        let db = InMemoryDb::default();
        let course = db.create_course("JS", "", None).await.unwrap();

        let response = app(test_state(db.clone(), None))
            .oneshot(post_json(
                &format!("/courses/{}/quizzes", course.id),
                json!({
                    "title": "Arrays",
                    "questions": [{
                        "text": "Which method adds to the end?",
                        "options": [{ "text": "  " }, { "text": "push", "isCorrect": true }]
                    }]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_json(response).await;
        assert_eq!(body["message"], "Question 1: option text must not be empty");
        assert!(db.list_quizzes(course.id).await.unwrap().is_empty());
    }
}
