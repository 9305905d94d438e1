//! Typed HTTP client for the game server.

use crate::controller::{GuessResponse, PastGuessesResponse, StartResponse};
use crate::server::{ErrorBody, Health};
use crate::session::DEFAULT_PLAYER;
use crate::view::SessionView;
use derive_more::Display;
use reqwest::Url;
use serde::de::DeserializeOwned;
use strictly_bulls_cows::{AttemptLimit, GuessRecord};
use tracing::{debug, info, instrument, warn};

/// Why a request did not produce a result.
#[derive(Debug, Display)]
pub enum ClientError {
    /// The server rejected the intent; the message is meant for the player.
    #[display("{}", _0)]
    Rejected(ErrorBody),

    /// The server answered with an unexpected status and no error body.
    #[display("Server returned HTTP {}", _0)]
    Status(u16),

    /// The request never completed.
    #[display("Transport error: {}", _0)]
    Transport(reqwest::Error),

    /// The base URL could not be joined with a route.
    #[display("Invalid URL: {}", _0)]
    Url(String),
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err)
    }
}

impl ClientError {
    /// Returns `true` for network failures, as opposed to game rejections.
    ///
    /// A 5xx without an error body counts as a network failure.
    pub fn is_transport(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Status(code) => *code >= 500,
            ClientError::Rejected(_) | ClientError::Url(_) => false,
        }
    }
}

/// Client bound to one server and one player.
#[derive(Debug, Clone)]
pub struct RestGameClient {
    base_url: String,
    player: String,
    client: reqwest::Client,
}

impl RestGameClient {
    /// Creates a client for the default player.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::for_player(base_url, DEFAULT_PLAYER)
    }

    /// Creates a client for `player`.
    #[instrument(skip_all)]
    pub fn for_player(base_url: impl Into<String>, player: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let player = player.into();
        debug!(%base_url, %player, "Creating REST client");
        Self {
            base_url,
            player,
            client: reqwest::Client::new(),
        }
    }

    /// Server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, extra: &[(&str, String)]) -> Result<Url, ClientError> {
        let mut params: Vec<(&str, String)> = vec![("player", self.player.clone())];
        params.extend(extra.iter().cloned());
        Url::parse_with_params(&format!("{}{}", self.base_url, path), &params)
            .map_err(|e| ClientError::Url(e.to_string()))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        match response.json::<ErrorBody>().await {
            Ok(body) => {
                debug!(error = %body.error, message = %body.message, "Request rejected");
                Err(ClientError::Rejected(body))
            }
            Err(_) => {
                warn!(%status, "Unexpected response without error body");
                Err(ClientError::Status(status.as_u16()))
            }
        }
    }

    /// Starts a new session.
    #[instrument(skip(self), fields(player = %self.player))]
    pub async fn start(&self, limit: AttemptLimit) -> Result<StartResponse, ClientError> {
        info!(%limit, "Starting game");
        let url = self.url("/start", &[("limit", limit.as_u32().to_string())])?;
        Self::decode(self.client.post(url).send().await?).await
    }

    /// Submits a guess exactly as typed.
    #[instrument(skip(self), fields(player = %self.player))]
    pub async fn guess(&self, raw: &str) -> Result<GuessResponse, ClientError> {
        let url = self.url("/guess", &[("guess", raw.to_string())])?;
        Self::decode(self.client.post(url).send().await?).await
    }

    /// Fetches the guess log.
    #[instrument(skip(self), fields(player = %self.player))]
    pub async fn past_guesses(&self) -> Result<Vec<GuessRecord>, ClientError> {
        let url = self.url("/past_guesses", &[])?;
        let body: PastGuessesResponse = Self::decode(self.client.get(url).send().await?).await?;
        Ok(body.past_guesses)
    }

    /// Fetches the session view.
    #[instrument(skip(self), fields(player = %self.player))]
    pub async fn state(&self) -> Result<SessionView, ClientError> {
        let url = self.url("/state", &[])?;
        Self::decode(self.client.get(url).send().await?).await
    }

    /// Discards the session on the server.
    #[instrument(skip(self), fields(player = %self.player))]
    pub async fn reset(&self) -> Result<(), ClientError> {
        let url = self.url("/reset", &[])?;
        let response = self.client.post(url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::Status(response.status().as_u16()))
        }
    }

    /// Calls the liveness endpoint.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<Health, ClientError> {
        let url = self.url("/health", &[])?;
        Self::decode(self.client.get(url).send().await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_not_transport() {
        let rejected = ClientError::Rejected(ErrorBody {
            error: "InvalidConfiguration".into(),
            message: "bad limit".into(),
        });
        assert!(!rejected.is_transport());
        assert_eq!(rejected.to_string(), "bad limit");

        assert!(!ClientError::Status(400).is_transport());
        assert!(!ClientError::Url("nope".into()).is_transport());
        assert!(ClientError::Status(502).is_transport());
    }

    #[test]
    fn test_url_carries_player() {
        let client = RestGameClient::for_player("http://localhost:3000/", "alice");
        assert_eq!(client.base_url(), "http://localhost:3000");

        let url = client
            .url("/guess", &[("guess", "0193".to_string())])
            .expect("valid url");
        assert_eq!(url.path(), "/guess");
        assert_eq!(url.query(), Some("player=alice&guess=0193"));
    }
}
