//! Room registry for Quizroom.
//!
//! Holds every live room in memory and implements the rules of the game:
//! who can join, which question is current, how answers are checked and
//! how scores add up.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: creates/deletes rooms, runs every room operation
//! - [`Room`]: one session's participants, questions and scores
//! - [`CodeSource`]: where room codes come from ([`RandomCodes`] by default)
//! - [`RoomLimits`]: name lengths, code length, default points
//! - [`RoomError`]: `InvalidInput`, `NotFound`, `Conflict`

mod code;
mod config;
mod error;
mod registry;
mod room;

pub use code::{CODE_ALPHABET, CodeSource, RandomCodes};
pub use config::RoomLimits;
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{Question, Room};
