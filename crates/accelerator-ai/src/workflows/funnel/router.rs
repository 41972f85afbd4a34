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

use super::controller::{FunnelError, IdeaInput, PersonalitySubmission};
use super::domain::ApplicantProfile;
use super::repository::{FunnelRecord, FunnelRepository, FunnelSessionId};
use super::service::{FunnelService, FunnelServiceError};
use crate::error::AppError;
use crate::workflows::academy::{self, AcademyRepository};
use crate::workflows::RepositoryError;

type SharedService<R, A> = State<Arc<FunnelService<R, A>>>;

/// Router builder exposing the applicant funnel.
pub fn funnel_router<R, A>(service: Arc<FunnelService<R, A>>) -> Router
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    Router::new()
        .route("/api/v1/funnel/sessions", post(start_handler::<R, A>))
        .route(
            "/api/v1/funnel/sessions/:session_id",
            get(status_handler::<R, A>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/admin",
            post(open_admin_handler::<R, A>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/admin/close",
            post(close_admin_handler::<R, A>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/profile",
            post(profile_handler::<R, A>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/personality",
            post(personality_handler::<R, A>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/analytical/questions",
            post(analytical_questions_handler::<R, A>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/analytical/answers",
            post(analytical_answer_handler::<R, A>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/analytical/score",
            post(analytical_score_handler::<R, A>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/project-evaluation",
            post(project_evaluation_handler::<R, A>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/project-evaluation/confirm",
            post(confirm_evaluation_handler::<R, A>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/continue",
            post(continue_handler::<R, A>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/restart",
            post(restart_handler::<R, A>),
        )
        .route(
            "/api/v1/funnel/sessions/:session_id/program",
            post(program_handler::<R, A>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct AnalyticalAnswer {
    pub option: usize,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticalScore {
    pub score: u8,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProgramEntry {
    #[serde(default)]
    pub startup_name: Option<String>,
}

fn respond(outcome: Result<FunnelRecord, FunnelServiceError>) -> Response {
    match outcome {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn status_for(error: &FunnelServiceError) -> StatusCode {
    match error {
        FunnelServiceError::Academy(inner) => academy::router::status_for(inner),
        FunnelServiceError::Funnel(FunnelError::Validation(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        FunnelServiceError::Funnel(_)
        | FunnelServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        FunnelServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        FunnelServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(error: FunnelServiceError) -> Response {
    AppError::from(error).into_response()
}

pub(crate) async fn start_handler<R, A>(State(service): SharedService<R, A>) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    match service.start() {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(session_id): Path<String>,
) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    respond(service.get(&FunnelSessionId(session_id)))
}

pub(crate) async fn open_admin_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(session_id): Path<String>,
) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    respond(service.open_admin(&FunnelSessionId(session_id)))
}

pub(crate) async fn close_admin_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(session_id): Path<String>,
) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    respond(service.close_admin(&FunnelSessionId(session_id)))
}

pub(crate) async fn profile_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(session_id): Path<String>,
    axum::Json(profile): axum::Json<ApplicantProfile>,
) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    respond(service.submit_profile(&FunnelSessionId(session_id), profile))
}

pub(crate) async fn personality_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(session_id): Path<String>,
    axum::Json(submission): axum::Json<PersonalitySubmission>,
) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    respond(service.submit_personality(&FunnelSessionId(session_id), submission))
}

pub(crate) async fn analytical_questions_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(session_id): Path<String>,
) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    let id = FunnelSessionId(session_id);
    respond(service.load_analytical_questions(&id).await)
}

pub(crate) async fn analytical_answer_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(session_id): Path<String>,
    axum::Json(answer): axum::Json<AnalyticalAnswer>,
) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    match service.answer_analytical(&FunnelSessionId(session_id), answer.option) {
        Ok((progress, record)) => {
            let payload = json!({
                "progress": progress,
                "session": record.view(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn analytical_score_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(session_id): Path<String>,
    axum::Json(payload): axum::Json<AnalyticalScore>,
) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    respond(service.complete_analytical(&FunnelSessionId(session_id), payload.score))
}

pub(crate) async fn project_evaluation_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(session_id): Path<String>,
    axum::Json(input): axum::Json<IdeaInput>,
) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    let id = FunnelSessionId(session_id);
    respond(service.evaluate_project(&id, input).await)
}

pub(crate) async fn confirm_evaluation_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(session_id): Path<String>,
) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    respond(service.complete_project_evaluation(&FunnelSessionId(session_id)))
}

pub(crate) async fn continue_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(session_id): Path<String>,
) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    respond(service.continue_from_assessment(&FunnelSessionId(session_id)))
}

pub(crate) async fn restart_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(session_id): Path<String>,
) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    respond(service.restart(&FunnelSessionId(session_id)))
}

pub(crate) async fn program_handler<R, A>(
    State(service): SharedService<R, A>,
    Path(session_id): Path<String>,
    axum::Json(entry): axum::Json<ProgramEntry>,
) -> Response
where
    R: FunnelRepository + 'static,
    A: AcademyRepository + 'static,
{
    let id = FunnelSessionId(session_id);
    match service.enter_program(&id, entry.startup_name.as_deref()) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}
