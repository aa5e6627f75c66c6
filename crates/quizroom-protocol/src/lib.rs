//! Wire protocol for Quizroom.
//!
//! This crate defines the "language" that hosts, participants and the
//! server speak over HTTP:
//!
//! - **Types** ([`RoomCode`], [`QuestionId`], [`RoomStatus`], the
//!   `*View` structs): what the server sends back.
//! - **Requests** ([`CreateRoomRequest`], [`SubmitAnswerRequest`], etc.):
//!   the JSON bodies clients send.
//! - **Envelope** ([`Envelope`]): the uniform `{success, message, data}`
//!   wrapper every API response travels in.
//!
//! # Architecture
//!
//! The protocol layer has no logic. It sits below the room registry
//! (which produces the views) and the HTTP layer (which decodes requests
//! and encodes envelopes).
//!
//! ```text
//! HTTP (JSON bytes) → Protocol (Request / Envelope) → Room registry
//! ```

mod envelope;
mod request;
mod types;

pub use envelope::Envelope;
pub use request::{
    AwardPointsRequest, CreateQuestionRequest, CreateRoomRequest,
    PlayerRequest, SubmitAnswerRequest,
};
pub use types::{
    AnswerResult, Health, HelpingLetter, ParticipantList, QuestionId,
    QuestionStatus, QuestionView, RegistryStats, RoomCode, RoomStatus,
    RoomView, ScoreEntry, ScoreUpdate,
};
