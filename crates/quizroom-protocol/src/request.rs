//! JSON request bodies.
//!
//! String fields default to empty when missing so that "field absent"
//! and "field blank" reach the registry as the same thing and get the
//! same `InvalidInput` message. Malformed JSON is rejected by the HTTP
//! layer before these are ever built.

use serde::{Deserialize, Serialize};

use crate::HelpingLetter;

/// `POST /api/rooms`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub name: String,
}

/// Body of join and leave: just the player's display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRequest {
    #[serde(default)]
    pub player_name: String,
}

/// `POST /api/rooms/{code}/questions`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateQuestionRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub helping_letters: Vec<HelpingLetter>,
    /// Falls back to the room default when absent.
    #[serde(default)]
    pub points: Option<i64>,
}

/// `POST /api/rooms/{code}/answers`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub answer: String,
}

/// `POST /api/rooms/{code}/scores`
///
/// `points` is required; it may be negative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardPointsRequest {
    #[serde(default)]
    pub player_name: String,
    pub points: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_room_missing_name_defaults_empty() {
        let req: CreateRoomRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.name, "");
    }

    #[test]
    fn test_create_question_optional_fields() {
        let req: CreateQuestionRequest = serde_json::from_str(
            r#"{"question": "Capital of Indonesia", "answer": "jakarta"}"#,
        )
        .unwrap();
        assert!(req.helping_letters.is_empty());
        assert_eq!(req.points, None);
    }

    #[test]
    fn test_create_question_with_helping_letters() {
        let req: CreateQuestionRequest = serde_json::from_str(
            r#"{
                "question": "Capital of Indonesia",
                "answer": "JAKARTA",
                "helping_letters": [{"position": 0, "letter": "J"}, {"position": 3, "letter": "A"}],
                "points": 25
            }"#,
        )
        .unwrap();
        assert_eq!(req.helping_letters.len(), 2);
        assert_eq!(req.helping_letters[1].position, 3);
        assert_eq!(req.points, Some(25));
    }

    #[test]
    fn test_award_points_requires_points() {
        let result: Result<AwardPointsRequest, _> =
            serde_json::from_str(r#"{"player_name": "Alice"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_award_points_accepts_negative() {
        let req: AwardPointsRequest =
            serde_json::from_str(r#"{"player_name": "Alice", "points": -30}"#)
                .unwrap();
        assert_eq!(req.points, -30);
    }
}
