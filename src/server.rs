//! HTTP interface for the game.
//!
//! Routes keep the shapes the browser front end already uses:
//!
//! | Method | Path | Intent |
//! |---|---|---|
//! | `POST` | `/start?limit=10` | start session (`unlimited=true` when `limit` is absent) |
//! | `POST` | `/guess?guess=1234` | submit guess |
//! | `GET` | `/past_guesses` | list history |
//! | `GET` | `/state` | session view |
//! | `POST` | `/reset` | discard session |
//! | `GET` | `/`, `/health` | liveness probe |
//!
//! Every route takes an optional `player` query parameter. Unparseable or
//! repeated query values are rejected with the same `{error, message}` body
//! as any other [`GameError`].

use crate::config::ServiceConfig;
use crate::controller::{GuessResponse, PastGuessesResponse, SessionController, StartResponse};
use crate::error::GameError;
use crate::session::DEFAULT_PLAYER;
use crate::view::SessionView;
use axum::extract::{Query, Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strictly_bulls_cows::AttemptLimit;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};

/// Error body returned for every rejected intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error kind, e.g. `"MalformedGuess"`.
    pub error: String,
    /// Displayable message.
    pub message: String,
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Always `"ok"`.
    pub status: String,
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = match self {
            GameError::InvalidConfiguration(_)
            | GameError::MalformedGuess(_)
            | GameError::DuplicateDigits(_) => StatusCode::BAD_REQUEST,
            GameError::RepeatedGuess(_) | GameError::SessionNotActive(_) => StatusCode::CONFLICT,
        };
        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Shared handler state.
#[derive(Debug, Clone, new)]
pub struct AppState {
    controller: SessionController,
    default_limit: AttemptLimit,
}

/// Raw query pairs.
///
/// Routes read their parameters from this instead of a typed `Query`, so a
/// missing, repeated or unparseable value becomes a [`GameError`] with a
/// JSON body rather than an extractor rejection.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    /// Value of `key` when given at most once. Repeated values come back
    /// joined with `,` as the error.
    fn single(&self, key: &str) -> Result<Option<&str>, String> {
        let values: Vec<&str> = self
            .0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect();
        match values.as_slice() {
            [] => Ok(None),
            [value] => Ok(Some(*value)),
            many => Err(many.join(",")),
        }
    }

    /// The named player. The last value wins if repeated.
    fn player(&self) -> &str {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == "player")
            .map(|(_, v)| v.as_str())
            .unwrap_or(DEFAULT_PLAYER)
    }

    /// Attempt limit requested by `/start`.
    ///
    /// An explicit `limit` wins over the legacy `unlimited=true` flag; with
    /// neither, `default` applies.
    fn attempt_limit(&self, default: AttemptLimit) -> Result<u32, GameError> {
        if let Some(raw) = self.single("limit").map_err(GameError::InvalidConfiguration)? {
            return raw
                .trim()
                .parse()
                .map_err(|_| GameError::InvalidConfiguration(raw.to_string()));
        }

        match self.single("unlimited").map_err(GameError::InvalidConfiguration)? {
            None => Ok(default.as_u32()),
            Some(raw) => match raw.trim().parse::<bool>() {
                Ok(true) => Ok(0),
                Ok(false) => Ok(default.as_u32()),
                Err(_) => Err(GameError::InvalidConfiguration(format!("unlimited={raw}"))),
            },
        }
    }

    /// The guess exactly as typed. Missing reads as empty.
    fn guess(&self) -> Result<&str, GameError> {
        self.single("guess")
            .map(Option::unwrap_or_default)
            .map_err(GameError::MalformedGuess)
    }
}

/// Builds the application router.
#[instrument(skip(controller, config), fields(origins = config.allowed_origins().len()))]
pub fn router(controller: SessionController, config: &ServiceConfig) -> Router {
    let state = AppState::new(controller, *config.default_attempt_limit());

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/start", post(start_game))
        .route("/guess", post(submit_guess))
        .route("/past_guesses", get(past_guesses))
        .route("/state", get(session_state))
        .route("/reset", post(reset_game))
        .with_state(state);

    let app = if config.allowed_origins().is_empty() {
        app
    } else {
        info!(origins = ?config.allowed_origins(), "CORS enabled");
        let origins = Arc::new(config.allowed_origins().clone());
        app.layer(middleware::from_fn_with_state(origins, cors))
    };

    app.layer(ServiceBuilder::new().map_request(|req: Request| {
        debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
        req
    }))
}

/// Binds and serves until the listener fails.
#[instrument(skip_all, fields(addr = %config.bind_address()))]
pub async fn serve(controller: SessionController, config: &ServiceConfig) -> anyhow::Result<()> {
    let app = router(controller, config);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(addr = %listener.local_addr()?, "Server ready");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

#[instrument(skip(state))]
async fn start_game(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<StartResponse>, GameError> {
    let limit = params.attempt_limit(state.default_limit)?;
    state.controller.on_start(params.player(), limit).map(Json)
}

#[instrument(skip(state))]
async fn submit_guess(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<GuessResponse>, GameError> {
    let guess = params.guess()?;
    state.controller.on_guess(params.player(), guess).map(Json)
}

#[instrument(skip(state))]
async fn past_guesses(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Json<PastGuessesResponse> {
    Json(state.controller.on_past_guesses(params.player()))
}

#[instrument(skip(state))]
async fn session_state(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Json<SessionView> {
    Json(state.controller.on_state(params.player()))
}

#[instrument(skip(state))]
async fn reset_game(State(state): State<AppState>, Query(params): Query<QueryPairs>) -> StatusCode {
    state.controller.on_reset(params.player());
    StatusCode::NO_CONTENT
}

/// Echoes allowed origins and answers preflight requests.
async fn cors(State(origins): State<Arc<Vec<String>>>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(ORIGIN)
        .and_then(|o| o.to_str().ok())
        .filter(|o| origins.iter().any(|allowed| allowed == o))
        .and_then(|o| HeaderValue::from_str(o).ok());

    let Some(origin) = origin else {
        if req.headers().contains_key(ORIGIN) {
            warn!(origin = ?req.headers().get(ORIGIN), "Origin not allowed");
        }
        return next.run(req).await;
    };

    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, POST, OPTIONS"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers.insert(VARY, HeaderValue::from_static("Origin"));
    response
}
