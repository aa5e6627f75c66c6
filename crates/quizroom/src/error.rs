//! Unified error type for the Quizroom server, and how it becomes an
//! HTTP response.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quizroom_protocol::Envelope;
use quizroom_room::RoomError;

/// Message sent to clients for anything that isn't their fault.
const INTERNAL_MESSAGE: &str = "internal server error";

pub type ApiResult<T> = Result<T, QuizroomError>;

/// Top-level error for the server crate.
///
/// Registry errors convert via `#[from]`, so handlers can use `?` on any
/// `RoomRegistry` call.
#[derive(Debug, thiserror::Error)]
pub enum QuizroomError {
    /// A registry rule rejected the request (bad input, missing room,
    /// duplicate name).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The request body could not be decoded.
    #[error("invalid request body: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured limit.
    #[error("request body too large")]
    PayloadTooLarge,

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Something that should not happen. Logged, never shown to clients.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QuizroomError {
    /// HTTP status for this error.
    ///
    /// A duplicate player name is a 400, not a 409: existing clients
    /// only distinguish 400 from 404.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Room(RoomError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Room(RoomError::Conflict(_)) => StatusCode::BAD_REQUEST,
            Self::Room(RoomError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message placed in the response envelope.
    fn client_message(&self) -> String {
        match self {
            Self::Room(e) => e.to_string(),
            Self::BadRequest(_) | Self::PayloadTooLarge | Self::Timeout => {
                self.to_string()
            }
            Self::Io(_) | Self::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for QuizroomError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(Envelope::error(self.client_message()))).into_response()
    }
}
