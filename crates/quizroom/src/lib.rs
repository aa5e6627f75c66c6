//! # Quizroom
//!
//! HTTP server for crossword-style quiz rooms.
//!
//! A host creates a room, players join with a name, the host feeds
//! questions (with optional helping letters), players submit answers and
//! the host awards points. All state lives in memory in a
//! [`RoomRegistry`]; this crate puts it behind a JSON API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quizroom::prelude::*;
//!
//! # async fn run() -> Result<(), QuizroomError> {
//! let server = QuizServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .limits(RoomLimits::default())
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{HttpSettings, LogFormat, ServerConfig};
pub use error::{ApiResult, QuizroomError};
pub use server::{QuizServer, QuizServerBuilder, build_router};

pub use quizroom_protocol::{Envelope, RoomCode, QuestionId};
pub use quizroom_room::{RoomError, RoomLimits, RoomRegistry};

/// Convenience re-exports for embedding the server.
pub mod prelude {
    pub use crate::{
        HttpSettings, QuizServer, QuizroomError, RoomLimits, RoomRegistry,
        ServerConfig, build_router,
    };
    pub use quizroom_protocol::{
        Envelope, QuestionView, RoomCode, RoomStatus, RoomView, ScoreEntry,
    };
}
