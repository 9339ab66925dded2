//! Session/token client - the single point of network access.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

/// Login failure. The `Display` output is shown verbatim in the login screen.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Token endpoint answered with a non-200 status.
    #[error("Error: {0}")]
    Status(u16),
    /// Transport-level failure or an unusable token response.
    #[error("{0}")]
    Transport(String),
}

/// Authenticated client for the solapi REST service.
///
/// Owns the bearer token. The token is written exactly once, during
/// `login`, while the client is still exclusively owned; afterwards the
/// client is shared read-only behind an `Arc` across fetch tasks.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    scope: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create an unauthenticated client.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            client_id: config.api.client_id.clone(),
            scope: config.api.scope.clone(),
            token: None,
        }
    }

    /// Whether a bearer token is held.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Exchange username/password for a bearer token (OAuth2 password grant).
    ///
    /// Stores the token on HTTP 200. Any other status fails with
    /// `Error: <status>`; transport failures and unusable bodies fail with
    /// their own description. Does not retry.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), LoginError> {
        debug!(username, "login attempt");
        let form = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("scope", self.scope.as_str()),
            ("client_id", self.client_id.as_str()),
        ];

        let response = self
            .http
            .post(format!("{}/connect/token", self.base_url))
            .form(&form)
            .send()
            .await
            .map_err(|e| LoginError::Transport(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(LoginError::Status(response.status().as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LoginError::Transport(e.to_string()))?;

        match body.get("access_token").and_then(|t| t.as_str()) {
            Some(token) => {
                self.token = Some(token.to_string());
                Ok(())
            }
            None => Err(LoginError::Transport(
                "token response missing access_token".to_string(),
            )),
        }
    }

    /// Authenticated JSON GET.
    ///
    /// Fails closed without a token: no request is issued. Every failure
    /// (non-200 status, transport, undecodable body) collapses to `None` -
    /// callers only ever see "no data". The cause is logged before it is
    /// swallowed.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Option<T> {
        let token = self.token.as_ref()?;

        let url = format!("{}/{}", self.base_url, endpoint);
        let response = match self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!(endpoint, error = %e, "request failed");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            debug!(endpoint, status = %response.status(), "non-OK response");
            return None;
        }

        match response.json::<T>().await {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(endpoint, error = %e, "undecodable response body");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::net::SocketAddr;
    use tiny_http::{Header, Response, Server};

    fn test_config(addr: SocketAddr) -> Config {
        let mut config = Config::default();
        config.api.base_url = format!("http://{addr}");
        config
    }

    #[tokio::test]
    async fn rejected_token_request_reports_status_and_keeps_token_unset() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            let request = server.recv().unwrap();
            let _ = request.respond(Response::from_string("").with_status_code(401));
        });

        let mut client = ApiClient::new(&test_config(addr));
        let err = client.login("user", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Error: 401");
        assert!(!client.has_token());
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn successful_login_stores_the_token() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            let request = server.recv().unwrap();
            assert_eq!(request.url(), "/connect/token");
            let _ = request.respond(
                Response::from_string(r#"{"access_token":"tok-123"}"#)
                    .with_header(Header::from_bytes("Content-Type", "application/json").unwrap()),
            );
        });

        let mut client = ApiClient::new(&test_config(addr));
        client.login("user", "secret").await.unwrap();
        assert!(client.has_token());
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn token_response_without_access_token_is_a_failure() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            let request = server.recv().unwrap();
            let _ = request.respond(
                Response::from_string(r#"{"error":"invalid_grant"}"#)
                    .with_header(Header::from_bytes("Content-Type", "application/json").unwrap()),
            );
        });

        let mut client = ApiClient::new(&test_config(addr));
        assert!(client.login("user", "secret").await.is_err());
        assert!(!client.has_token());
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn get_without_token_issues_no_request() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();

        let client = ApiClient::new(&test_config(addr));
        let result: Option<serde_json::Value> = client.get("v1/user", &[]).await;
        assert!(result.is_none());

        // Nothing reached the server.
        assert!(server.try_recv().unwrap().is_none());
    }

    #[tokio::test]
    async fn get_sends_bearer_header_and_query() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            let request = server.recv().unwrap();
            let url = request.url().to_string();
            let auth = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Authorization"))
                .map(|h| h.value.to_string());
            let _ = request.respond(
                Response::from_string(r#"{"ok":true}"#)
                    .with_header(Header::from_bytes("Content-Type", "application/json").unwrap()),
            );
            (url, auth)
        });

        let mut client = ApiClient::new(&test_config(addr));
        client.token = Some("tok-123".to_string());

        let result: Option<serde_json::Value> = client
            .get("v1/user", &[("studentId", "S1".to_string())])
            .await;
        assert!(result.is_some());

        let (url, auth) = handle.join().unwrap();
        assert!(url.starts_with("/v1/user"));
        assert!(url.contains("studentId=S1"));
        assert_eq!(auth.as_deref(), Some("Bearer tok-123"));
    }

    #[tokio::test]
    async fn non_ok_status_collapses_to_none() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            let request = server.recv().unwrap();
            let _ = request.respond(Response::from_string("").with_status_code(500));
        });

        let mut client = ApiClient::new(&test_config(addr));
        client.token = Some("tok-123".to_string());
        let result: Option<serde_json::Value> = client.get("v1/user", &[]).await;
        assert!(result.is_none());
        handle.join().unwrap();
    }
}
