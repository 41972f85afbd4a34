use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::RegistrationForm;
use super::progression::ProgressionError;
use super::repository::{AcademyRecord, AcademyRepository, AcademySessionId};
use super::service::{AcademyService, AcademyServiceError};
use super::session::SessionError;
use crate::error::AppError;
use crate::workflows::RepositoryError;

type SharedService<A> = State<Arc<AcademyService<A>>>;

/// Router builder exposing the academy dashboard and level sessions.
pub fn academy_router<A>(service: Arc<AcademyService<A>>) -> Router
where
    A: AcademyRepository + 'static,
{
    Router::new()
        .route("/api/v1/academy/sessions", post(register_handler::<A>))
        .route(
            "/api/v1/academy/sessions/:session_id",
            get(status_handler::<A>),
        )
        .route(
            "/api/v1/academy/sessions/:session_id/levels/:level_id/select",
            post(select_level_handler::<A>),
        )
        .route(
            "/api/v1/academy/sessions/:session_id/active/retry",
            post(retry_material_handler::<A>),
        )
        .route(
            "/api/v1/academy/sessions/:session_id/active/reading",
            post(reading_handler::<A>),
        )
        .route(
            "/api/v1/academy/sessions/:session_id/active/exercise",
            post(begin_exercise_handler::<A>),
        )
        .route(
            "/api/v1/academy/sessions/:session_id/active/exercise/answer",
            post(exercise_answer_handler::<A>),
        )
        .route(
            "/api/v1/academy/sessions/:session_id/active/quiz",
            post(begin_quiz_handler::<A>),
        )
        .route(
            "/api/v1/academy/sessions/:session_id/active/quiz/answers",
            post(quiz_answer_handler::<A>),
        )
        .route(
            "/api/v1/academy/sessions/:session_id/active/quiz/submit",
            post(submit_quiz_handler::<A>),
        )
        .route(
            "/api/v1/academy/sessions/:session_id/active/quiz/retake",
            post(retake_quiz_handler::<A>),
        )
        .route(
            "/api/v1/academy/sessions/:session_id/active/finish",
            post(finish_level_handler::<A>),
        )
        .route(
            "/api/v1/academy/sessions/:session_id/active/leave",
            post(leave_level_handler::<A>),
        )
        .route(
            "/api/v1/academy/sessions/:session_id/certificate",
            get(certificate_handler::<A>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct ReadingProgress {
    pub percent: u8,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseAnswer {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct QuizAnswer {
    pub question_id: u32,
    pub option: usize,
}

fn view_response(status: StatusCode, record: AcademyRecord) -> Response {
    (status, axum::Json(record.view())).into_response()
}

fn respond(outcome: Result<AcademyRecord, AcademyServiceError>) -> Response {
    match outcome {
        Ok(record) => view_response(StatusCode::OK, record),
        Err(error) => error_response(error),
    }
}

pub(crate) fn status_for(error: &AcademyServiceError) -> StatusCode {
    match error {
        AcademyServiceError::Registration(_)
        | AcademyServiceError::Progression(ProgressionError::Session(
            SessionError::Validation(_),
        )) => StatusCode::UNPROCESSABLE_ENTITY,
        AcademyServiceError::Progression(ProgressionError::UnknownLevel(_))
        | AcademyServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AcademyServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AcademyServiceError::Progression(_)
        | AcademyServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
    }
}

fn error_response(error: AcademyServiceError) -> Response {
    AppError::from(error).into_response()
}

pub(crate) async fn register_handler<A>(
    State(service): SharedService<A>,
    axum::Json(form): axum::Json<RegistrationForm>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    match service.register(form) {
        Ok(record) => view_response(StatusCode::CREATED, record),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<A>(
    State(service): SharedService<A>,
    Path(session_id): Path<String>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    respond(service.get(&AcademySessionId(session_id)))
}

pub(crate) async fn select_level_handler<A>(
    State(service): SharedService<A>,
    Path((session_id, level_id)): Path<(String, u32)>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    let id = AcademySessionId(session_id);
    respond(service.select_level(&id, level_id).await)
}

pub(crate) async fn retry_material_handler<A>(
    State(service): SharedService<A>,
    Path(session_id): Path<String>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    respond(service.retry_material(&AcademySessionId(session_id)).await)
}

pub(crate) async fn reading_handler<A>(
    State(service): SharedService<A>,
    Path(session_id): Path<String>,
    axum::Json(progress): axum::Json<ReadingProgress>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    let id = AcademySessionId(session_id);
    respond(service.record_reading(&id, progress.percent))
}

pub(crate) async fn begin_exercise_handler<A>(
    State(service): SharedService<A>,
    Path(session_id): Path<String>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    respond(service.begin_exercise(&AcademySessionId(session_id)))
}

pub(crate) async fn exercise_answer_handler<A>(
    State(service): SharedService<A>,
    Path(session_id): Path<String>,
    axum::Json(payload): axum::Json<ExerciseAnswer>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    let id = AcademySessionId(session_id);
    respond(service.submit_exercise(&id, &payload.answer).await)
}

pub(crate) async fn begin_quiz_handler<A>(
    State(service): SharedService<A>,
    Path(session_id): Path<String>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    respond(service.begin_quiz(&AcademySessionId(session_id)).await)
}

pub(crate) async fn quiz_answer_handler<A>(
    State(service): SharedService<A>,
    Path(session_id): Path<String>,
    axum::Json(answer): axum::Json<QuizAnswer>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    let id = AcademySessionId(session_id);
    respond(service.answer_quiz(&id, answer.question_id, answer.option))
}

pub(crate) async fn submit_quiz_handler<A>(
    State(service): SharedService<A>,
    Path(session_id): Path<String>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    match service.submit_quiz(&AcademySessionId(session_id)) {
        Ok((outcome, record)) => {
            let payload = json!({
                "outcome": outcome,
                "session": record.view(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn retake_quiz_handler<A>(
    State(service): SharedService<A>,
    Path(session_id): Path<String>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    respond(service.retake_quiz(&AcademySessionId(session_id)))
}

pub(crate) async fn finish_level_handler<A>(
    State(service): SharedService<A>,
    Path(session_id): Path<String>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    respond(service.finish_level(&AcademySessionId(session_id)))
}

pub(crate) async fn leave_level_handler<A>(
    State(service): SharedService<A>,
    Path(session_id): Path<String>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    respond(service.leave_level(&AcademySessionId(session_id)))
}

pub(crate) async fn certificate_handler<A>(
    State(service): SharedService<A>,
    Path(session_id): Path<String>,
) -> Response
where
    A: AcademyRepository + 'static,
{
    match service.certificate(&AcademySessionId(session_id)) {
        Ok(certificate) => (StatusCode::OK, axum::Json(certificate)).into_response(),
        Err(error) => error_response(error),
    }
}
