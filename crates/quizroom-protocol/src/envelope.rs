//! The uniform response envelope.
//!
//! Every API response (except `/api/health`) is shaped like:
//!
//! ```text
//! { "success": true,  "message": "Room created", "data": { ... } }
//! { "success": false, "message": "room ABC123 not found" }
//! ```
//!
//! `message` and `data` are omitted from the JSON when absent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// A successful response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// A successful response with a human-readable message.
    pub fn ok_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// A failed response. Failures never carry data.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_omits_message() {
        let json = serde_json::to_value(Envelope::ok(5)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 5 }));
    }

    #[test]
    fn test_ok_with_message_carries_both() {
        let env = Envelope::ok_with_message("Room created", "X7K2M9");
        let json = serde_json::to_value(env).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Room created");
        assert_eq!(json["data"], "X7K2M9");
    }

    #[test]
    fn test_error_omits_data() {
        let json = serde_json::to_value(Envelope::error("nope")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "message": "nope" })
        );
    }

    #[test]
    fn test_decode_without_optional_fields() {
        let env: Envelope<u32> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(env.success);
        assert_eq!(env.message, None);
        assert_eq!(env.data, None);
    }
}
