//! The room registry: creates, tracks, and mutates rooms.
//!
//! # Locking
//!
//! The map of rooms sits behind an `RwLock`; each room sits behind its
//! own `Mutex`. Creating or deleting a room takes the map write lock.
//! Every other operation takes the map read lock just long enough to
//! clone the room's `Arc`, then locks that room alone, so traffic on one
//! room never blocks another.
//!
//! Lock order is always map → room. Nothing takes the map lock while
//! holding a room lock.
//!
//! Poisoned locks are recovered rather than propagated: room methods
//! validate before they mutate, so a panic can't leave a room
//! half-updated.

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};

use quizroom_protocol::{
    AnswerResult, HelpingLetter, ParticipantList, QuestionId, QuestionView,
    RegistryStats, RoomCode, RoomView, ScoreEntry, ScoreUpdate,
};

use crate::room::{validate_player_name, validate_room_name};
use crate::{CodeSource, RandomCodes, Room, RoomError, RoomLimits};

type RoomMap = HashMap<RoomCode, Arc<Mutex<Room>>>;

/// Lock a room, recovering from poisoning.
fn lock_room(room: &Mutex<Room>) -> MutexGuard<'_, Room> {
    room.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The single source of truth for every live room.
///
/// Construct one at startup and share it (`Arc<RoomRegistry>`) with all
/// request handlers. All methods take `&self`.
pub struct RoomRegistry<C: CodeSource = RandomCodes> {
    rooms: RwLock<RoomMap>,
    codes: C,
    limits: RoomLimits,
}

impl RoomRegistry {
    /// Creates an empty registry with random codes and default limits.
    pub fn new() -> Self {
        Self::with_code_source(RandomCodes, RoomLimits::default())
    }

    /// Creates an empty registry with random codes and custom limits.
    pub fn with_limits(limits: RoomLimits) -> Self {
        Self::with_code_source(RandomCodes, limits)
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CodeSource> RoomRegistry<C> {
    /// Creates an empty registry drawing codes from `codes`.
    pub fn with_code_source(codes: C, limits: RoomLimits) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            codes,
            limits,
        }
    }

    pub fn limits(&self) -> &RoomLimits {
        &self.limits
    }

    fn read_rooms(&self) -> RwLockReadGuard<'_, RoomMap> {
        self.rooms.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_rooms(&self) -> RwLockWriteGuard<'_, RoomMap> {
        self.rooms.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up a room handle. The map lock is released on return.
    fn room(&self, code: &str) -> Result<Arc<Mutex<Room>>, RoomError> {
        let code = RoomCode::new(code);
        self.read_rooms()
            .get(&code)
            .cloned()
            .ok_or_else(|| RoomError::room_not_found(&code))
    }

    /// Runs `f` with exclusive access to one room.
    fn with_room<T>(
        &self,
        code: &str,
        f: impl FnOnce(&mut Room) -> Result<T, RoomError>,
    ) -> Result<T, RoomError> {
        let handle = self.room(code)?;
        let mut room = lock_room(&handle);
        f(&mut room)
    }

    // -- Rooms ------------------------------------------------------------

    /// Creates a new room in `waiting` status.
    ///
    /// Codes are drawn until one is free; there is no retry cap.
    pub fn create_room(&self, name: &str) -> Result<RoomView, RoomError> {
        let name = validate_room_name(name, &self.limits)?;

        let mut rooms = self.write_rooms();
        let code = loop {
            let candidate = self.codes.next_code(self.limits.code_length);
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
            tracing::debug!(code = %candidate, "room code collision, redrawing");
        };

        let room = Room::new(code.clone(), name);
        let view = room.view();
        rooms.insert(code.clone(), Arc::new(Mutex::new(room)));
        tracing::info!(%code, name = %view.name, "room created");
        Ok(view)
    }

    /// Returns a snapshot of a room. The code is case-insensitive.
    pub fn get_room(&self, code: &str) -> Result<RoomView, RoomError> {
        self.with_room(code, |room| Ok(room.view()))
    }

    /// Removes a room and everything in it.
    pub fn delete_room(&self, code: &str) -> Result<(), RoomError> {
        let code = RoomCode::new(code);
        self.write_rooms()
            .remove(&code)
            .ok_or_else(|| RoomError::room_not_found(&code))?;
        tracing::info!(%code, "room deleted");
        Ok(())
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.read_rooms().len()
    }

    /// Aggregate counts across all rooms.
    pub fn stats(&self) -> RegistryStats {
        let rooms = self.read_rooms();
        let mut stats = RegistryStats {
            total_rooms: rooms.len(),
            ..RegistryStats::default()
        };
        for handle in rooms.values() {
            let room = lock_room(handle);
            if room.status().is_active() {
                stats.active_rooms += 1;
            }
            stats.total_participants += room.participant_count();
        }
        stats
    }

    // -- Participants -----------------------------------------------------

    /// Adds a player to a room.
    ///
    /// The name is checked before the room is looked up; the duplicate
    /// check comes after.
    pub fn join_room(
        &self,
        code: &str,
        player_name: &str,
    ) -> Result<ParticipantList, RoomError> {
        let player_name = validate_player_name(player_name, &self.limits)?;
        let list = self.with_room(code, |room| room.join(player_name.clone()))?;
        tracing::info!(
            code = %RoomCode::new(code),
            player = %player_name,
            players = list.count,
            "player joined"
        );
        Ok(list)
    }

    /// Removes a player from a room.
    pub fn leave_room(
        &self,
        code: &str,
        player_name: &str,
    ) -> Result<ParticipantList, RoomError> {
        let player_name = player_name.trim();
        let list = self.with_room(code, |room| room.leave(player_name))?;
        tracing::info!(
            code = %RoomCode::new(code),
            player = %player_name,
            players = list.count,
            "player left"
        );
        Ok(list)
    }

    pub fn participants(&self, code: &str) -> Result<ParticipantList, RoomError> {
        self.with_room(code, |room| Ok(room.participants()))
    }

    // -- Status -----------------------------------------------------------

    /// Sets the room to `playing`. Needs at least one participant.
    pub fn start_game(&self, code: &str) -> Result<RoomView, RoomError> {
        let view = self.with_room(code, |room| {
            room.start()?;
            Ok(room.view())
        })?;
        tracing::info!(
            code = %view.code,
            players = view.participant_count,
            "game started"
        );
        Ok(view)
    }

    /// Sets the room to `finished`, from any status.
    pub fn finish_game(&self, code: &str) -> Result<RoomView, RoomError> {
        let view = self.with_room(code, |room| {
            room.finish();
            Ok(room.view())
        })?;
        tracing::info!(code = %view.code, "game finished");
        Ok(view)
    }

    // -- Questions --------------------------------------------------------

    /// Appends a question. It becomes current if nothing else is.
    pub fn create_question(
        &self,
        code: &str,
        text: &str,
        answer: &str,
        helping_letters: Vec<HelpingLetter>,
        points: Option<i64>,
    ) -> Result<QuestionView, RoomError> {
        let view = self.with_room(code, |room| {
            room.add_question(text, answer, helping_letters, points, &self.limits)
        })?;
        tracing::info!(
            code = %RoomCode::new(code),
            question_id = %view.question_id,
            "question created"
        );
        Ok(view)
    }

    /// Every question in the room, answers included.
    pub fn list_questions(
        &self,
        code: &str,
    ) -> Result<Vec<QuestionView>, RoomError> {
        self.with_room(code, |room| Ok(room.questions_for_host()))
    }

    /// The current question, answer withheld until revealed.
    pub fn current_question(
        &self,
        code: &str,
    ) -> Result<QuestionView, RoomError> {
        self.with_room(code, |room| {
            room.current_question().map(|q| q.public_view())
        })
    }

    pub fn set_current_question(
        &self,
        code: &str,
        question_id: &str,
    ) -> Result<QuestionView, RoomError> {
        let question_id = QuestionId::new(question_id);
        self.with_room(code, |room| room.set_current(&question_id))
    }

    /// Unsets the current question. Never fails for an existing room.
    pub fn clear_current_question(&self, code: &str) -> Result<(), RoomError> {
        self.with_room(code, |room| {
            room.clear_current();
            Ok(())
        })
    }

    /// Deletes a question. Deleting an unknown id is a no-op.
    pub fn delete_question(
        &self,
        code: &str,
        question_id: &str,
    ) -> Result<(), RoomError> {
        let question_id = QuestionId::new(question_id);
        let removed =
            self.with_room(code, |room| Ok(room.delete_question(&question_id)))?;
        if removed {
            tracing::info!(
                code = %RoomCode::new(code),
                %question_id,
                "question deleted"
            );
        }
        Ok(())
    }

    pub fn reveal_question(
        &self,
        code: &str,
        question_id: &str,
    ) -> Result<QuestionView, RoomError> {
        let question_id = QuestionId::new(question_id);
        let view = self.with_room(code, |room| room.reveal(&question_id))?;
        tracing::info!(
            code = %RoomCode::new(code),
            %question_id,
            "question revealed"
        );
        Ok(view)
    }

    /// Flags a wrong answer on the current question.
    pub fn mark_wrong(&self, code: &str) -> Result<QuestionView, RoomError> {
        self.with_room(code, |room| room.mark_wrong())
    }

    pub fn next_question(&self, code: &str) -> Result<QuestionView, RoomError> {
        self.with_room(code, |room| room.next_question())
    }

    // -- Answers and scores -----------------------------------------------

    pub fn submit_answer(
        &self,
        code: &str,
        player_name: &str,
        answer: &str,
    ) -> Result<AnswerResult, RoomError> {
        let result =
            self.with_room(code, |room| room.submit_answer(player_name, answer))?;
        tracing::debug!(
            code = %RoomCode::new(code),
            player = %player_name,
            correct = result.is_correct,
            "answer submitted"
        );
        Ok(result)
    }

    /// Adds points to a player's score. `points` may be negative.
    pub fn award_points(
        &self,
        code: &str,
        player_name: &str,
        points: i64,
    ) -> Result<ScoreUpdate, RoomError> {
        let update =
            self.with_room(code, |room| room.award_points(player_name, points))?;
        tracing::info!(
            code = %RoomCode::new(code),
            player = %update.player_name,
            points,
            total = update.total_score,
            "points awarded"
        );
        Ok(update)
    }

    /// Scoreboard, highest first; ties by name.
    pub fn scores(&self, code: &str) -> Result<Vec<ScoreEntry>, RoomError> {
        self.with_room(code, |room| Ok(room.scores()))
    }

    pub fn player_score(
        &self,
        code: &str,
        player_name: &str,
    ) -> Result<ScoreEntry, RoomError> {
        self.with_room(code, |room| Ok(room.player_score(player_name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_room_rejects_bad_names_without_inserting() {
        let registry = RoomRegistry::new();
        assert!(registry.create_room("   ").is_err());
        assert!(registry.create_room(&"x".repeat(51)).is_err());
        assert_eq!(registry.room_count(), 0);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = RoomRegistry::new();
        let view = registry.create_room("Quiz Night").unwrap();
        let lower = view.code.as_str().to_lowercase();
        assert_eq!(registry.get_room(&lower).unwrap().code, view.code);
    }

    #[test]
    fn test_delete_room_twice() {
        let registry = RoomRegistry::new();
        let code = registry.create_room("Quiz").unwrap().code;
        registry.delete_room(code.as_str()).unwrap();
        assert!(matches!(
            registry.delete_room(code.as_str()),
            Err(RoomError::NotFound(_))
        ));
    }

    #[test]
    fn test_join_validates_name_before_room_lookup() {
        let registry = RoomRegistry::new();
        // Both the name and the room are bad; the name error wins.
        let err = registry.join_room("NOROOM", "  ").unwrap_err();
        assert!(matches!(err, RoomError::InvalidInput(_)));

        let err = registry.join_room("NOROOM", "Alice").unwrap_err();
        assert!(matches!(err, RoomError::NotFound(_)));
    }

    #[test]
    fn test_join_stores_trimmed_name() {
        let registry = RoomRegistry::new();
        let code = registry.create_room("Quiz").unwrap().code;
        let list = registry.join_room(code.as_str(), "  Alice ").unwrap();
        assert_eq!(list.participants, vec!["Alice"]);
    }

    #[test]
    fn test_stats_counts_active_and_participants() {
        let registry = RoomRegistry::new();
        let a = registry.create_room("A").unwrap().code;
        let b = registry.create_room("B").unwrap().code;
        registry.join_room(a.as_str(), "Alice").unwrap();
        registry.join_room(a.as_str(), "Bob").unwrap();
        registry.join_room(b.as_str(), "Carol").unwrap();
        registry.finish_game(b.as_str()).unwrap();

        let stats = registry.stats();
        assert_eq!(stats.total_rooms, 2);
        assert_eq!(stats.active_rooms, 1);
        assert_eq!(stats.total_participants, 3);
    }

    #[test]
    fn test_question_id_path_case_insensitive() {
        let registry = RoomRegistry::new();
        let code = registry.create_room("Quiz").unwrap().code;
        registry
            .create_question(code.as_str(), "A", "a", vec![], None)
            .unwrap();
        let view = registry.reveal_question(code.as_str(), "Q1").unwrap();
        assert_eq!(view.question_id.as_str(), "q1");
    }
}
