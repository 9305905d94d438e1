//! Strictly Bulls library - Bulls and Cows game service
//!
//! Serves the game in [`strictly_bulls_cows`] over HTTP, one session per
//! player.
//!
//! # Architecture
//!
//! - **Controller**: validates intents and applies them to sessions
//! - **Session**: registry of live games behind one lock
//! - **Server**: axum routes for start, guess, history, state and reset
//! - **Client**: typed REST client plus a heartbeat probe
//! - **Play**: line-oriented terminal front end
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use strictly_bulls::{ScriptedSecrets, SessionController, SessionManager};
//! use strictly_bulls_cows::{Code, Outcome};
//!
//! let secret = Code::parse("4827").unwrap();
//! let sessions = SessionManager::with_secrets(Arc::new(ScriptedSecrets::fixed(secret)));
//! let controller = SessionController::new(sessions);
//!
//! controller.on_start("alice", 10).unwrap();
//! let reply = controller.on_guess("alice", "4827").unwrap();
//! assert_eq!(reply.outcome, Outcome::Won);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod controller;
mod error;
mod heartbeat;
pub mod play;
pub mod server;
mod session;
mod view;

// Crate-level exports - Configuration
pub use config::{ConfigError, DEFAULT_CONFIG_FILE, ServiceConfig};

// Crate-level exports - Errors
pub use error::GameError;

// Crate-level exports - Session management
pub use session::{
    DEFAULT_PLAYER, LiveSession, PlayerId, RandomSecrets, ScriptedSecrets, SecretSource, SessionId,
    SessionManager,
};

// Crate-level exports - Controller and views
pub use controller::{GuessResponse, PastGuessesResponse, SessionController, StartResponse};
pub use view::{Phase, SessionView, result_label};

// Crate-level exports - HTTP
pub use client::{ClientError, RestGameClient};
pub use heartbeat::{Heartbeat, probe};
pub use server::{AppState, ErrorBody, Health, router};
