//! Registry limits.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomLimits
// ---------------------------------------------------------------------------

/// Input bounds and defaults enforced by the registry.
///
/// The defaults match what the browser client was built against; a
/// server can override them through the builder, tests usually don't.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLimits {
    /// Maximum room name length, in characters, after trimming.
    pub max_room_name_len: usize,

    /// Maximum player name length, in characters, after trimming.
    pub max_player_name_len: usize,

    /// Number of symbols in a generated room code.
    pub code_length: usize,

    /// Points attached to a question when the host doesn't specify any.
    pub default_points: i64,
}

impl Default for RoomLimits {
    fn default() -> Self {
        Self {
            max_room_name_len: 50,
            max_player_name_len: 30,
            code_length: 6,
            default_points: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_limits_default() {
        let limits = RoomLimits::default();
        assert_eq!(limits.max_room_name_len, 50);
        assert_eq!(limits.max_player_name_len, 30);
        assert_eq!(limits.code_length, 6);
        assert_eq!(limits.default_points, 10);
    }
}
