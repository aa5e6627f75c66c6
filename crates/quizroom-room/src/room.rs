//! The room aggregate: participants, questions, and scores.
//!
//! A [`Room`] is plain data plus the rules for changing it. It knows
//! nothing about locking; the registry hands out `&mut Room` only while
//! holding that room's mutex. Every method checks everything it needs
//! before touching a field, so a returned error always means nothing
//! changed.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use quizroom_protocol::{
    AnswerResult, HelpingLetter, ParticipantList, QuestionId, QuestionStatus,
    QuestionView, RoomCode, RoomStatus, RoomView, ScoreEntry, ScoreUpdate,
};

use crate::{RoomError, RoomLimits};

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

/// Trims a room name and checks it is 1..=max characters.
pub(crate) fn validate_room_name(
    name: &str,
    limits: &RoomLimits,
) -> Result<String, RoomError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RoomError::InvalidInput("room name is required".into()));
    }
    if name.chars().count() > limits.max_room_name_len {
        return Err(RoomError::InvalidInput(format!(
            "room name must be at most {} characters",
            limits.max_room_name_len
        )));
    }
    Ok(name.to_string())
}

/// Trims a player name and checks it is 1..=max characters.
pub(crate) fn validate_player_name(
    name: &str,
    limits: &RoomLimits,
) -> Result<String, RoomError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RoomError::InvalidInput("player name is required".into()));
    }
    if name.chars().count() > limits.max_player_name_len {
        return Err(RoomError::InvalidInput(format!(
            "player name must be at most {} characters",
            limits.max_player_name_len
        )));
    }
    Ok(name.to_string())
}

/// Canonical form used for both stored answers and guesses.
fn normalize_answer(answer: &str) -> String {
    answer.trim().to_uppercase()
}

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// One round: a prompt, its answer, and optional hints.
#[derive(Debug, Clone)]
pub struct Question {
    id: QuestionId,
    text: String,
    /// Uppercased and trimmed at creation.
    answer: String,
    /// Character count of `answer` at creation. Never recomputed.
    answer_length: usize,
    helping_letters: Vec<HelpingLetter>,
    points: i64,
    status: QuestionStatus,
    revealed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    last_wrong_at: Option<DateTime<Utc>>,
}

impl Question {
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn status(&self) -> QuestionStatus {
        self.status
    }

    /// What participants see: the answer only after the reveal.
    pub fn public_view(&self) -> QuestionView {
        self.view(self.status == QuestionStatus::Revealed)
    }

    /// What the host sees: always includes the answer.
    pub fn host_view(&self) -> QuestionView {
        self.view(true)
    }

    fn view(&self, with_answer: bool) -> QuestionView {
        QuestionView {
            question_id: self.id.clone(),
            question: self.text.clone(),
            answer: with_answer.then(|| self.answer.clone()),
            answer_length: self.answer_length,
            helping_letters: self.helping_letters.clone(),
            points: self.points,
            status: self.status,
            revealed_at: self.revealed_at,
            created_at: self.created_at,
            last_wrong_at: self.last_wrong_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// A play session: one host, its participants, its questions.
#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    name: String,
    status: RoomStatus,
    /// Insertion order matters; names are unique (exact match).
    participants: Vec<String>,
    /// Creation order, never reordered.
    questions: Vec<Question>,
    current_question_id: Option<QuestionId>,
    /// Created lazily; may name players who already left.
    player_scores: HashMap<String, i64>,
    /// Mints question ids. Only ever goes up.
    question_count: u64,
    created_at: DateTime<Utc>,
}

impl Room {
    /// Creates an empty room in `waiting` status. `name` must already be
    /// validated.
    pub(crate) fn new(code: RoomCode, name: String) -> Self {
        Self {
            code,
            name,
            status: RoomStatus::Waiting,
            participants: Vec::new(),
            questions: Vec::new(),
            current_question_id: None,
            player_scores: HashMap::new(),
            question_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn current_question_id(&self) -> Option<&QuestionId> {
        self.current_question_id.as_ref()
    }

    pub fn view(&self) -> RoomView {
        RoomView {
            code: self.code.clone(),
            name: self.name.clone(),
            status: self.status,
            participants: self.participants.clone(),
            participant_count: self.participants.len(),
            total_questions: self.questions.len(),
            current_question_id: self.current_question_id.clone(),
            player_scores: self
                .player_scores
                .iter()
                .map(|(name, score)| (name.clone(), *score))
                .collect::<BTreeMap<_, _>>(),
            created_at: self.created_at,
        }
    }

    // -- Participants -----------------------------------------------------

    pub fn participants(&self) -> ParticipantList {
        ParticipantList {
            participants: self.participants.clone(),
            count: self.participants.len(),
        }
    }

    /// Appends a validated player name.
    pub(crate) fn join(
        &mut self,
        player_name: String,
    ) -> Result<ParticipantList, RoomError> {
        if self.participants.contains(&player_name) {
            return Err(RoomError::Conflict(format!(
                "player name {player_name} is already taken in this room"
            )));
        }
        self.participants.push(player_name);
        Ok(self.participants())
    }

    pub(crate) fn leave(
        &mut self,
        player_name: &str,
    ) -> Result<ParticipantList, RoomError> {
        let index = self
            .participants
            .iter()
            .position(|p| p == player_name)
            .ok_or_else(|| {
                RoomError::NotFound(format!(
                    "player {player_name} is not in room {}",
                    self.code
                ))
            })?;
        self.participants.remove(index);
        Ok(self.participants())
    }

    // -- Status -----------------------------------------------------------

    /// Moves the room to `playing`.
    ///
    /// Also gives every participant a 0 score if they have none yet, and
    /// selects the first question when nothing is current.
    pub(crate) fn start(&mut self) -> Result<(), RoomError> {
        if self.participants.is_empty() {
            return Err(RoomError::InvalidInput(
                "at least one participant required".into(),
            ));
        }
        self.status = RoomStatus::Playing;
        for name in &self.participants {
            self.player_scores.entry(name.clone()).or_insert(0);
        }
        if self.current_question_id.is_none() {
            self.current_question_id =
                self.questions.first().map(|q| q.id.clone());
        }
        Ok(())
    }

    /// Moves the room to `finished`, whatever it was before.
    pub(crate) fn finish(&mut self) {
        self.status = RoomStatus::Finished;
    }

    // -- Questions --------------------------------------------------------

    /// Appends a new active question and returns its host view.
    ///
    /// Becomes the current question when none is set.
    pub(crate) fn add_question(
        &mut self,
        text: &str,
        answer: &str,
        helping_letters: Vec<HelpingLetter>,
        points: Option<i64>,
        limits: &RoomLimits,
    ) -> Result<QuestionView, RoomError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RoomError::InvalidInput(
                "question text is required".into(),
            ));
        }
        let answer = normalize_answer(answer);
        if answer.is_empty() {
            return Err(RoomError::InvalidInput("answer is required".into()));
        }
        let points = points.unwrap_or(limits.default_points);
        if points < 1 {
            return Err(RoomError::InvalidInput(
                "points must be at least 1".into(),
            ));
        }

        self.question_count += 1;
        let question = Question {
            id: QuestionId::from_seq(self.question_count),
            text: text.to_string(),
            answer_length: answer.chars().count(),
            answer,
            helping_letters,
            points,
            status: QuestionStatus::Active,
            revealed_at: None,
            created_at: Utc::now(),
            last_wrong_at: None,
        };
        let view = question.host_view();

        if self.current_question_id.is_none() {
            self.current_question_id = Some(question.id.clone());
        }
        self.questions.push(question);
        Ok(view)
    }

    /// Every question with its answer, in creation order.
    pub fn questions_for_host(&self) -> Vec<QuestionView> {
        self.questions.iter().map(Question::host_view).collect()
    }

    fn find_question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    fn find_question_mut(&mut self, id: &QuestionId) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| &q.id == id)
    }

    /// The question the current pointer references.
    ///
    /// `NotFound` when no pointer is set, or when it references nothing.
    pub fn current_question(&self) -> Result<&Question, RoomError> {
        let id = self
            .current_question_id
            .as_ref()
            .ok_or_else(RoomError::no_current_question)?;
        self.find_question(id)
            .ok_or_else(|| RoomError::question_not_found(id))
    }

    pub(crate) fn set_current(
        &mut self,
        id: &QuestionId,
    ) -> Result<QuestionView, RoomError> {
        let view = self
            .find_question(id)
            .map(Question::public_view)
            .ok_or_else(|| RoomError::question_not_found(id))?;
        self.current_question_id = Some(id.clone());
        Ok(view)
    }

    pub(crate) fn clear_current(&mut self) {
        self.current_question_id = None;
    }

    /// Removes a question by id. Returns `false` if there was nothing to
    /// remove, which is not an error.
    pub(crate) fn delete_question(&mut self, id: &QuestionId) -> bool {
        let before = self.questions.len();
        self.questions.retain(|q| &q.id != id);
        let removed = self.questions.len() != before;
        if self.current_question_id.as_ref() == Some(id) {
            self.current_question_id = None;
        }
        removed
    }

    /// Marks a question revealed. Revealing again refreshes the timestamp.
    pub(crate) fn reveal(
        &mut self,
        id: &QuestionId,
    ) -> Result<QuestionView, RoomError> {
        let question = self
            .find_question_mut(id)
            .ok_or_else(|| RoomError::question_not_found(id))?;
        question.status = QuestionStatus::Revealed;
        question.revealed_at = Some(Utc::now());
        Ok(question.public_view())
    }

    /// Stamps the current question with the time the host flagged a
    /// wrong answer, so polling participants can flash their grid.
    pub(crate) fn mark_wrong(&mut self) -> Result<QuestionView, RoomError> {
        let id = self
            .current_question_id
            .clone()
            .ok_or_else(RoomError::no_current_question)?;
        let question = self
            .find_question_mut(&id)
            .ok_or_else(|| RoomError::question_not_found(&id))?;
        question.last_wrong_at = Some(Utc::now());
        Ok(question.public_view())
    }

    /// Advances the pointer to the question after the current one.
    ///
    /// A pointer that matches nothing (or no pointer at all) counts as
    /// sitting before the first question, so the next one is index 0.
    pub(crate) fn next_question(&mut self) -> Result<QuestionView, RoomError> {
        let next_index = self
            .current_question_id
            .as_ref()
            .and_then(|id| self.questions.iter().position(|q| &q.id == id))
            .map_or(0, |index| index + 1);

        let next = self
            .questions
            .get(next_index)
            .ok_or_else(|| RoomError::InvalidInput("no more questions".into()))?;
        let view = next.public_view();
        self.current_question_id = Some(next.id.clone());
        Ok(view)
    }

    // -- Answers and scores -----------------------------------------------

    /// Checks a guess against the current question.
    pub(crate) fn submit_answer(
        &self,
        player_name: &str,
        answer: &str,
    ) -> Result<AnswerResult, RoomError> {
        let id = self.current_question_id.as_ref().ok_or_else(|| {
            RoomError::InvalidInput("no current question".into())
        })?;
        let question = self
            .find_question(id)
            .ok_or_else(|| RoomError::question_not_found(id))?;

        let is_correct = normalize_answer(answer) == question.answer;
        Ok(AnswerResult {
            player_name: player_name.to_string(),
            is_correct,
            correct_answer: is_correct.then(|| question.answer.clone()),
        })
    }

    /// Adds `points` (possibly negative) to a player's score, starting
    /// from 0 the first time.
    pub(crate) fn award_points(
        &mut self,
        player_name: &str,
        points: i64,
    ) -> Result<ScoreUpdate, RoomError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(RoomError::InvalidInput("player name is required".into()));
        }
        let current = self.player_scores.get(player_name).copied().unwrap_or(0);
        let total_score = current
            .checked_add(points)
            .ok_or_else(|| RoomError::InvalidInput("score out of range".into()))?;
        self.player_scores
            .insert(player_name.to_string(), total_score);
        Ok(ScoreUpdate {
            player_name: player_name.to_string(),
            points,
            total_score,
        })
    }

    /// Scoreboard, highest first; equal scores ordered by name.
    pub fn scores(&self) -> Vec<ScoreEntry> {
        let mut entries: Vec<ScoreEntry> = self
            .player_scores
            .iter()
            .map(|(name, score)| ScoreEntry {
                player_name: name.clone(),
                score: *score,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.player_name.cmp(&b.player_name))
        });
        entries
    }

    /// A single player's score, 0 if they never scored.
    pub fn player_score(&self, player_name: &str) -> ScoreEntry {
        let player_name = player_name.trim();
        ScoreEntry {
            player_name: player_name.to_string(),
            score: self.player_scores.get(player_name).copied().unwrap_or(0),
        }
    }
}
