//! Live game sessions, one per player.

use crate::error::GameError;
use derive_new::new;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strictly_bulls_cows::{AttemptLimit, Code, Feedback, GameSession, Outcome, SessionState};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Unique identifier for a game session.
pub type SessionId = Uuid;

/// Identifier for a player. Each player has at most one live session.
pub type PlayerId = String;

/// Player used when a request does not name one.
pub const DEFAULT_PLAYER: &str = "default";

/// Supplies secrets for new sessions.
pub trait SecretSource: Send + Sync + Debug {
    /// Returns the secret for the next session.
    fn next_secret(&self) -> Code;
}

/// Draws each secret uniformly from all valid codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSecrets;

impl SecretSource for RandomSecrets {
    fn next_secret(&self) -> Code {
        Code::random(&mut rand::thread_rng())
    }
}

/// Hands out a fixed list of secrets in order, cycling at the end.
#[derive(Debug)]
pub struct ScriptedSecrets {
    secrets: Vec<Code>,
    next: AtomicUsize,
}

impl ScriptedSecrets {
    /// Creates a source from a non-empty list of secrets.
    ///
    /// Returns `None` if `secrets` is empty.
    pub fn new(secrets: Vec<Code>) -> Option<Self> {
        (!secrets.is_empty()).then(|| Self {
            secrets,
            next: AtomicUsize::new(0),
        })
    }

    /// A source that always returns `secret`.
    pub fn fixed(secret: Code) -> Self {
        Self {
            secrets: vec![secret],
            next: AtomicUsize::new(0),
        }
    }
}

impl SecretSource for ScriptedSecrets {
    fn next_secret(&self) -> Code {
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        self.secrets[i % self.secrets.len()]
    }
}

/// A game bound to a session id.
#[derive(Debug, Clone, new)]
pub struct LiveSession {
    /// Session id, fresh for every start.
    pub id: SessionId,
    /// The game record.
    pub game: GameSession,
}

/// Registry of live sessions.
///
/// All access goes through one mutex, so intents against the same player
/// are applied one at a time and a guess's append and outcome transition
/// are never observed half-done.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<PlayerId, LiveSession>>>,
    secrets: Arc<dyn SecretSource>,
}

impl SessionManager {
    /// Creates a session manager with random secrets.
    #[instrument]
    pub fn new() -> Self {
        Self::with_secrets(Arc::new(RandomSecrets))
    }

    /// Creates a session manager drawing secrets from `secrets`.
    #[instrument]
    pub fn with_secrets(secrets: Arc<dyn SecretSource>) -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            secrets,
        }
    }

    // Poison is ignored: no holder leaves a record half-updated.
    fn lock(&self) -> MutexGuard<'_, HashMap<PlayerId, LiveSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new session for `player`, replacing any previous one.
    #[instrument(skip(self))]
    pub fn start(&self, player: &str, limit: AttemptLimit) -> SessionId {
        let session = LiveSession::new(
            Uuid::new_v4(),
            GameSession::new(self.secrets.next_secret(), limit),
        );
        let id = session.id;

        let replaced = self.lock().insert(player.to_string(), session);
        if let Some(old) = replaced {
            debug!(old_session = %old.id, "Replaced previous session");
        }

        info!(session_id = %id, %limit, "Started session");
        id
    }

    /// Runs `f` on the player's session while holding the lock.
    ///
    /// Returns `None` if the player has no session.
    #[instrument(skip(self, f))]
    pub fn with_session<T>(&self, player: &str, f: impl FnOnce(&mut LiveSession) -> T) -> Option<T> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(player);
        if session.is_none() {
            debug!("No session for player");
        }
        session.map(f)
    }

    /// Appends a scored guess to the player's session.
    #[instrument(skip(self))]
    pub fn record_guess(
        &self,
        player: &str,
        guess: Code,
        feedback: Feedback,
    ) -> Result<Outcome, GameError> {
        self.with_session(player, |session| session.game.record_guess(guess, feedback))
            .ok_or(GameError::SessionNotActive(None))?
            .map_err(GameError::from)
    }

    /// Read-only projection of the player's session.
    #[instrument(skip(self))]
    pub fn current_state(&self, player: &str) -> Option<SessionState> {
        self.with_session(player, |session| session.game.state())
    }

    /// Id of the player's current session.
    pub fn session_id(&self, player: &str) -> Option<SessionId> {
        self.with_session(player, |session| session.id)
    }

    /// Discards the player's session. Returns `true` if one existed.
    #[instrument(skip(self))]
    pub fn reset(&self, player: &str) -> bool {
        let removed = self.lock().remove(player);
        match &removed {
            Some(session) => info!(session_id = %session.id, "Session reset"),
            None => warn!("Reset requested with no active session"),
        }
        removed.is_some()
    }

    /// Number of players with a session.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when no player has a session.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
