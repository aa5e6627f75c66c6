//! Error types for the room layer.

use quizroom_protocol::{QuestionId, RoomCode};

/// Errors that can occur during registry operations.
///
/// Every variant is recoverable and safe to show to the caller: none of
/// them mean the registry is in a bad state. The message is the full
/// user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// A request field is missing, blank, or out of bounds, or the
    /// operation isn't possible right now (e.g. no more questions).
    #[error("{0}")]
    InvalidInput(String),

    /// The room, question, or participant does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The player name is already taken in this room.
    #[error("{0}")]
    Conflict(String),
}

impl RoomError {
    pub(crate) fn room_not_found(code: &RoomCode) -> Self {
        Self::NotFound(format!("room {code} not found"))
    }

    pub(crate) fn question_not_found(id: &QuestionId) -> Self {
        Self::NotFound(format!("question {id} not found"))
    }

    pub(crate) fn no_current_question() -> Self {
        Self::NotFound("no current question".to_string())
    }
}
