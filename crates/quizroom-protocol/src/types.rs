//! Core protocol types for Quizroom's wire format.
//!
//! Every type here is something that gets serialized to JSON and sent to
//! a host or participant, or parsed out of a request path.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The short code that identifies a room, e.g. `X7K2M9`.
///
/// Codes are always stored uppercase. Constructing one with
/// [`RoomCode::new`] normalizes whatever the caller typed, so `ab12cd`
/// and `AB12CD` name the same room.
///
/// `#[serde(transparent)]` makes this a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Builds a code from caller input, uppercasing it.
    pub fn new(raw: &str) -> Self {
        Self(raw.to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a question within one room: `q1`, `q2`, …
///
/// Ids are minted lowercase from the room's question counter. Caller
/// input goes through [`QuestionId::new`], which lowercases it, so a
/// transport that uppercases path segments still resolves `Q1` to `q1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Builds an id from caller input.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_lowercase())
    }

    /// The id for the `n`-th question ever created in a room.
    pub fn from_seq(n: u64) -> Self {
        Self(format!("q{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// The lifecycle status of a room.
///
/// ```text
/// waiting ──(start, ≥1 participant)──→ playing
///    any  ──(finish)──────────────────→ finished
/// ```
///
/// Nothing prevents other writes: start and finish overwrite the field
/// regardless of its current value. `finished` is terminal only by
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Waiting,
    Playing,
    Finished,
}

impl RoomStatus {
    /// Returns `true` for rooms still counted as active in stats.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Finished)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Playing => write!(f, "playing"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// Whether a question's answer has been shown to participants.
/// The only transition is `active → revealed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestionStatus {
    #[default]
    Active,
    Revealed,
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Revealed => write!(f, "revealed"),
        }
    }
}

/// A hint shown in the answer grid before the reveal.
///
/// The server never interprets these; they are stored and echoed back
/// exactly as the host sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpingLetter {
    pub position: i64,
    pub letter: String,
}

// ---------------------------------------------------------------------------
// Views: what the server sends back
// ---------------------------------------------------------------------------

/// Snapshot of a room for polling clients.
///
/// Questions are summarized by count only; the question list (with
/// answers) is a separate host endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub code: RoomCode,
    pub name: String,
    pub status: RoomStatus,
    pub participants: Vec<String>,
    pub participant_count: usize,
    pub total_questions: usize,
    pub current_question_id: Option<QuestionId>,
    pub player_scores: BTreeMap<String, i64>,
    pub created_at: DateTime<Utc>,
}

/// A question as seen by a client.
///
/// `answer` is `None` (JSON `null`) unless the question has been revealed
/// or the view was built for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub question_id: QuestionId,
    pub question: String,
    pub answer: Option<String>,
    pub answer_length: usize,
    pub helping_letters: Vec<HelpingLetter>,
    pub points: i64,
    pub status: QuestionStatus,
    pub revealed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_wrong_at: Option<DateTime<Utc>>,
}

/// Ordered participant names plus their count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantList {
    pub participants: Vec<String>,
    pub count: usize,
}

/// Outcome of one answer submission.
///
/// `correct_answer` is only filled in when the guess was right, so a
/// wrong guess never leaks the solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub player_name: String,
    pub is_correct: bool,
    pub correct_answer: Option<String>,
}

/// One row of the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player_name: String,
    pub score: i64,
}

/// Result of awarding points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub player_name: String,
    pub points: i64,
    pub total_score: i64,
}

/// Aggregate counts across the whole registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RegistryStats {
    pub total_rooms: usize,
    /// Rooms whose status is not `finished`.
    pub active_rooms: usize,
    pub total_participants: usize,
}

/// Body of `/api/health`. Not wrapped in an [`Envelope`](crate::Envelope).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn ok() -> Self {
        Self { status: "ok".to_string() }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The JSON shapes here are what the browser client reads, so these
    //! tests pin the serde attributes down.

    use super::*;

    #[test]
    fn test_room_code_new_uppercases() {
        assert_eq!(RoomCode::new("ab12cd").as_str(), "AB12CD");
        assert_eq!(RoomCode::new("ab12cd"), RoomCode::new("AB12CD"));
    }

    #[test]
    fn test_room_code_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomCode::new("x7k2m9")).unwrap();
        assert_eq!(json, "\"X7K2M9\"");
    }

    #[test]
    fn test_question_id_from_seq() {
        assert_eq!(QuestionId::from_seq(1).as_str(), "q1");
        assert_eq!(QuestionId::from_seq(12).to_string(), "q12");
    }

    #[test]
    fn test_question_id_new_ignores_case() {
        assert_eq!(QuestionId::new("Q3"), QuestionId::from_seq(3));
        assert_eq!(QuestionId::new(" q3 "), QuestionId::from_seq(3));
    }

    #[test]
    fn test_room_status_serializes_lowercase() {
        let json = serde_json::to_string(&RoomStatus::Playing).unwrap();
        assert_eq!(json, "\"playing\"");
        let parsed: RoomStatus = serde_json::from_str("\"finished\"").unwrap();
        assert_eq!(parsed, RoomStatus::Finished);
    }

    #[test]
    fn test_room_status_default_is_waiting() {
        assert_eq!(RoomStatus::default(), RoomStatus::Waiting);
    }

    #[test]
    fn test_room_status_is_active() {
        assert!(RoomStatus::Waiting.is_active());
        assert!(RoomStatus::Playing.is_active());
        assert!(!RoomStatus::Finished.is_active());
    }

    #[test]
    fn test_question_status_display() {
        assert_eq!(QuestionStatus::Active.to_string(), "active");
        assert_eq!(QuestionStatus::Revealed.to_string(), "revealed");
    }

    #[test]
    fn test_question_view_withheld_answer_is_null() {
        let view = QuestionView {
            question_id: QuestionId::from_seq(1),
            question: "Capital of Indonesia".into(),
            answer: None,
            answer_length: 7,
            helping_letters: vec![HelpingLetter {
                position: 0,
                letter: "J".into(),
            }],
            points: 10,
            status: QuestionStatus::Active,
            revealed_at: None,
            created_at: Utc::now(),
            last_wrong_at: None,
        };
        let json = serde_json::to_value(&view).unwrap();

        assert!(json["answer"].is_null());
        assert_eq!(json["question_id"], "q1");
        assert_eq!(json["status"], "active");
        assert_eq!(json["helping_letters"][0]["letter"], "J");
    }

    #[test]
    fn test_health_ok_shape() {
        let json = serde_json::to_value(Health::ok()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }
}
