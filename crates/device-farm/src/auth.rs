//! Exchange the static API token for a bearer token.

use reqwest::header::ACCEPT;
use tracing::{debug, info, warn};

use crate::error::ActionError;
use crate::http::{status_text, ApiClient};
use crate::models::{LoginRequest, LoginResponse};

/// Message used when login succeeds but yields no token.
const NO_TOKEN: &str = "No token received from Corellium authentication";

/// Logs in against `POST /v1/auth/login`.
#[derive(Clone, Debug)]
pub struct Authenticator {
    api: ApiClient,
}

impl Authenticator {
    /// Create an authenticator using `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Log in with a static API token and return the bearer token.
    ///
    /// The request itself carries no `Authorization` header.
    ///
    /// # Errors
    /// Returns [`ActionError::Authentication`] on transport failure, a
    /// non-success status, or a body without a `token`.
    pub async fn login(&self, api_token: &str) -> Result<String, ActionError> {
        let url = self.api.url("/v1/auth/login");
        debug!(url = %url, "POST request");

        let response = self
            .api
            .client()
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(&LoginRequest { api_token })
            .send()
            .await
            .map_err(|e| {
                ActionError::Authentication(format!("Failed to authenticate with Corellium: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Login rejected");
            return Err(ActionError::Authentication(format!(
                "Failed to authenticate with Corellium: {}",
                status_text(status)
            )));
        }

        let body: LoginResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse login response");
            ActionError::Authentication(NO_TOKEN.to_string())
        })?;

        let token = body
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ActionError::Authentication(NO_TOKEN.to_string()))?;

        info!(expiration = ?body.expiration, "Authenticated with Corellium");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn authenticator(server: &MockServer) -> Authenticator {
        Authenticator::new(ApiClient::new(server.uri()).unwrap())
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/login"))
            .and(body_json(json!({"apiToken": "static"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc"})))
            .expect(1)
            .mount(&server)
            .await;

        let token = authenticator(&server).await.login("static").await.unwrap();
        assert_eq!(token, "abc");

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = authenticator(&server).await.login("bad").await.unwrap_err();
        assert!(matches!(err, ActionError::Authentication(_)));
        assert_eq!(
            err.to_string(),
            "Failed to authenticate with Corellium: Unauthorized"
        );
    }

    #[tokio::test]
    async fn test_login_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"expiration": "soon"})))
            .mount(&server)
            .await;

        let err = authenticator(&server).await.login("static").await.unwrap_err();
        assert!(matches!(err, ActionError::Authentication(ref m) if m == NO_TOKEN));
    }

    #[tokio::test]
    async fn test_login_with_unparseable_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = authenticator(&server).await.login("static").await.unwrap_err();
        assert!(matches!(err, ActionError::Authentication(_)));
    }
}
