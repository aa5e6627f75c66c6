//! HTTP handlers: one per route, each a thin wrapper around a
//! `RoomRegistry` call.
//!
//! Successful responses are wrapped in an [`Envelope`]. Errors go through
//! [`QuizroomError`]'s `IntoResponse`, which produces the same envelope
//! shape with `success: false`.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::StatusCode;
use quizroom_protocol::{
    AnswerResult, AwardPointsRequest, CreateQuestionRequest, CreateRoomRequest,
    Envelope, Health, ParticipantList, PlayerRequest, QuestionView,
    RegistryStats, RoomCode, RoomView, ScoreEntry, ScoreUpdate,
    SubmitAnswerRequest,
};
use quizroom_room::RoomRegistry;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::{ApiResult, QuizroomError};

/// State shared by every handler.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) registry: Arc<RoomRegistry>,
}

type Ok200<T> = ApiResult<Json<Envelope<T>>>;
type Ok201<T> = ApiResult<(StatusCode, Json<Envelope<T>>)>;

/// `Json` extractor whose rejection is an enveloped error.
pub(crate) struct ApiJson<T>(pub(crate) T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = QuizroomError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

/// Oversized bodies keep their 413. Every other rejection, including a
/// missing `content-type`, is reported as 400.
fn rejection_to_error(rejection: JsonRejection) -> QuizroomError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return QuizroomError::PayloadTooLarge;
    }
    QuizroomError::BadRequest(rejection.body_text())
}

fn ok<T>(message: &str, data: T) -> Json<Envelope<T>> {
    Json(Envelope::ok_with_message(message, data))
}

fn created<T>(message: &str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, ok(message, data))
}

// -- Service ---------------------------------------------------------------

pub(crate) async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub(crate) async fn stats(State(state): State<AppState>) -> Json<Envelope<RegistryStats>> {
    Json(Envelope::ok(state.registry.stats()))
}

// -- Rooms -----------------------------------------------------------------

pub(crate) async fn create_room(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateRoomRequest>,
) -> Ok201<RoomView> {
    let room = state.registry.create_room(&req.name)?;
    Ok(created("Room created", room))
}

pub(crate) async fn get_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Ok200<RoomView> {
    Ok(Json(Envelope::ok(state.registry.get_room(&code)?)))
}

pub(crate) async fn delete_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Ok200<Value> {
    state.registry.delete_room(&code)?;
    let code = RoomCode::new(&code);
    Ok(ok("Room deleted", json!({ "code": code })))
}

pub(crate) async fn join_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ApiJson(req): ApiJson<PlayerRequest>,
) -> Ok200<ParticipantList> {
    let list = state.registry.join_room(&code, &req.player_name)?;
    Ok(ok("Joined room", list))
}

pub(crate) async fn leave_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ApiJson(req): ApiJson<PlayerRequest>,
) -> Ok200<ParticipantList> {
    let list = state.registry.leave_room(&code, &req.player_name)?;
    Ok(ok("Left room", list))
}

pub(crate) async fn participants(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Ok200<ParticipantList> {
    Ok(Json(Envelope::ok(state.registry.participants(&code)?)))
}

pub(crate) async fn start_game(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Ok200<RoomView> {
    Ok(ok("Game started", state.registry.start_game(&code)?))
}

pub(crate) async fn finish_game(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Ok200<RoomView> {
    Ok(ok("Game finished", state.registry.finish_game(&code)?))
}

// -- Questions -------------------------------------------------------------

pub(crate) async fn create_question(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ApiJson(req): ApiJson<CreateQuestionRequest>,
) -> Ok201<QuestionView> {
    let question = state.registry.create_question(
        &code,
        &req.question,
        &req.answer,
        req.helping_letters,
        req.points,
    )?;
    Ok(created("Question created", question))
}

pub(crate) async fn list_questions(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Ok200<Vec<QuestionView>> {
    Ok(Json(Envelope::ok(state.registry.list_questions(&code)?)))
}

pub(crate) async fn current_question(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Ok200<QuestionView> {
    Ok(Json(Envelope::ok(state.registry.current_question(&code)?)))
}

pub(crate) async fn clear_current_question(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Ok200<Value> {
    state.registry.clear_current_question(&code)?;
    Ok(ok("Current question cleared", Value::Null))
}

pub(crate) async fn mark_wrong(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Ok200<QuestionView> {
    Ok(ok("Wrong answer recorded", state.registry.mark_wrong(&code)?))
}

pub(crate) async fn next_question(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Ok200<QuestionView> {
    Ok(ok("Moved to next question", state.registry.next_question(&code)?))
}

pub(crate) async fn select_question(
    State(state): State<AppState>,
    Path((code, question_id)): Path<(String, String)>,
) -> Ok200<QuestionView> {
    let question = state.registry.set_current_question(&code, &question_id)?;
    Ok(ok("Current question set", question))
}

pub(crate) async fn reveal_question(
    State(state): State<AppState>,
    Path((code, question_id)): Path<(String, String)>,
) -> Ok200<QuestionView> {
    let question = state.registry.reveal_question(&code, &question_id)?;
    Ok(ok("Answer revealed", question))
}

pub(crate) async fn delete_question(
    State(state): State<AppState>,
    Path((code, question_id)): Path<(String, String)>,
) -> Ok200<Value> {
    state.registry.delete_question(&code, &question_id)?;
    Ok(ok("Question deleted", Value::Null))
}

// -- Answers and scores ----------------------------------------------------

pub(crate) async fn submit_answer(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ApiJson(req): ApiJson<SubmitAnswerRequest>,
) -> Ok200<AnswerResult> {
    let result = state
        .registry
        .submit_answer(&code, &req.player_name, &req.answer)?;
    Ok(Json(Envelope::ok(result)))
}

pub(crate) async fn award_points(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ApiJson(req): ApiJson<AwardPointsRequest>,
) -> Ok200<ScoreUpdate> {
    let update = state
        .registry
        .award_points(&code, &req.player_name, req.points)?;
    Ok(ok("Points awarded", update))
}

pub(crate) async fn scores(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Ok200<Vec<ScoreEntry>> {
    Ok(Json(Envelope::ok(state.registry.scores(&code)?)))
}

pub(crate) async fn player_score(
    State(state): State<AppState>,
    Path((code, player_name)): Path<(String, String)>,
) -> Ok200<ScoreEntry> {
    Ok(Json(Envelope::ok(state.registry.player_score(&code, &player_name)?)))
}
