//! HTTP calls that create or join a game before the live connection opens.
//!
//! ```text
//! POST /api/games       {playerName, password} → {code, token, playerId}
//! POST /api/games/join  {playerName, code}     → {token, playerId}
//! ```
//!
//! A non-success status comes back with `{"error": "<reason>"}`.

use drawl_protocol::PlayerId;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::{ClientConfig, OnboardingError};

pub const CREATE_PATH: &str = "/api/games";
pub const JOIN_PATH: &str = "/api/games/join";

/// What the server hands back once a seat is secured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub code: String,
    /// Opaque credential for the persistent connection.
    pub token: String,
    pub player_id: PlayerId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateGameRequest<'a> {
    player_name: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinGameRequest<'a> {
    player_name: &'a str,
    code: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    #[serde(default)]
    code: Option<String>,
    token: String,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin typed client for the onboarding endpoints.
#[derive(Debug, Clone)]
pub struct OnboardingClient {
    http: Client,
    config: ClientConfig,
}

impl OnboardingClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Creates a game with the caller as host.
    ///
    /// # Errors
    /// `OnboardingError::Rejected` when the server refuses (e.g. wrong
    /// password); `OnboardingError::Http` when no usable answer came back.
    pub async fn create_game(
        &self,
        name: &str,
        password: &str,
    ) -> Result<Session, OnboardingError> {
        let url = self.config.api_url(CREATE_PATH)?;
        tracing::debug!(%url, "creating game");
        let response = self
            .http
            .post(url)
            .json(&CreateGameRequest {
                player_name: name,
                password,
            })
            .send()
            .await?;

        let body: SessionResponse = accept(response).await?.json().await?;
        let code = body.code.unwrap_or_default();
        tracing::info!(game = %code, player_id = %body.player_id, "game created");
        Ok(Session {
            code,
            token: body.token,
            player_id: body.player_id,
        })
    }

    /// Takes a seat in an existing game.
    pub async fn join_game(&self, name: &str, code: &str) -> Result<Session, OnboardingError> {
        let url = self.config.api_url(JOIN_PATH)?;
        tracing::debug!(%url, game = code, "joining game");
        let response = self
            .http
            .post(url)
            .json(&JoinGameRequest {
                player_name: name,
                code,
            })
            .send()
            .await?;

        let body: SessionResponse = accept(response).await?.json().await?;
        tracing::info!(game = code, player_id = %body.player_id, "joined game");
        Ok(Session {
            code: body.code.unwrap_or_else(|| code.to_string()),
            token: body.token,
            player_id: body.player_id,
        })
    }
}

/// Passes success responses through; turns anything else into
/// `OnboardingError::Rejected` with the server's reason.
async fn accept(response: Response) -> Result<Response, OnboardingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = rejection_message(status.as_u16(), &text);
    tracing::debug!(status = status.as_u16(), %message, "onboarding rejected");
    Err(OnboardingError::Rejected {
        status: status.as_u16(),
        message,
    })
}

fn rejection_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error }) if !error.is_empty() => error,
        _ => format!("request failed with status {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_bodies_use_wire_names() {
        let create = serde_json::to_value(CreateGameRequest {
            player_name: "Ann",
            password: "hunter2",
        })
        .unwrap();
        assert_eq!(create, serde_json::json!({"playerName": "Ann", "password": "hunter2"}));

        let join = serde_json::to_value(JoinGameRequest {
            player_name: "Bo",
            code: "WXYZ",
        })
        .unwrap();
        assert_eq!(join, serde_json::json!({"playerName": "Bo", "code": "WXYZ"}));
    }

    #[test]
    fn test_join_response_has_no_code() {
        let body: SessionResponse =
            serde_json::from_str(r#"{"token":"t","playerId":"p1"}"#).unwrap();
        assert_eq!(body.code, None);
        assert_eq!(body.player_id, PlayerId::new("p1"));
    }

    #[test]
    fn test_rejection_message_prefers_server_reason() {
        assert_eq!(rejection_message(404, r#"{"error":"game not found"}"#), "game not found");
        assert_eq!(
            rejection_message(502, "<html>bad gateway</html>"),
            "request failed with status 502"
        );
    }
}
