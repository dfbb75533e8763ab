//! HTTP client for the external authentication service.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::AuthError;

use super::model::{ActivationData, ApiErrorPayload, Credentials, LoginResponse, MessageResponse};

/// The three calls the wizard host makes against the auth service.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError>;

    /// End the session identified by `session_id`.
    async fn logout(&self, session_id: &SecretString) -> Result<MessageResponse, AuthError>;

    async fn activate_account(&self, data: &ActivationData) -> Result<MessageResponse, AuthError>;
}

/// `AuthApi` over JSON POSTs to `{base_url}/auth/*`.
pub struct HttpAuthClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAuthClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/auth/{path}", self.base_url)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, AuthError> {
        let resp = self
            .client
            .post(self.api_url(path))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let payload: ApiErrorPayload = resp.json().await.unwrap_or_default();
            let message = payload
                .into_message()
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            warn!(path, status = status.as_u16(), error = %message, "Auth call failed");
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!(path, status = status.as_u16(), "Auth call succeeded");
        resp.json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        let body = serde_json::json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        });
        self.post("login", body).await
    }

    async fn logout(&self, session_id: &SecretString) -> Result<MessageResponse, AuthError> {
        let body = serde_json::json!({ "session_id": session_id.expose_secret() });
        self.post("logout", body).await
    }

    async fn activate_account(&self, data: &ActivationData) -> Result<MessageResponse, AuthError> {
        let body = serde_json::json!({
            "token": data.token,
            "password": data.password.expose_secret(),
        });
        self.post("activate", body).await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn credentials(password: &str) -> Credentials {
        Credentials {
            email: "ana@example.com".to_string(),
            password: SecretString::from(password.to_string()),
        }
    }

    fn stub() -> Router {
        Router::new()
            .route(
                "/auth/login",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "secret" {
                        (
                            StatusCode::OK,
                            Json(json!({
                                "user": {"id": "u-1", "email": body["email"]},
                                "tokens": {"access_token": "a-1", "refresh_token": "r-1"}
                            })),
                        )
                    } else {
                        (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({"error": "invalid credentials"})),
                        )
                    }
                }),
            )
            .route(
                "/auth/logout",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["session_id"], "r-1");
                    Json(json!({"message": "Signed out"}))
                }),
            )
            .route(
                "/auth/activate",
                post(|| async { (StatusCode::GONE, "not json") }),
            )
    }

    #[tokio::test]
    async fn login_success_parses_user_and_tokens() {
        let client = HttpAuthClient::new(serve(stub()).await);
        let resp = client.login(&credentials("secret")).await.unwrap();
        assert_eq!(resp.user.email, "ana@example.com");
        assert_eq!(resp.tokens.access_token.expose_secret(), "a-1");
    }

    #[tokio::test]
    async fn login_failure_carries_message_verbatim() {
        let client = HttpAuthClient::new(serve(stub()).await);
        let err = client.login(&credentials("wrong")).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Api { status: 401, ref message } if message == "invalid credentials"
        ));
    }

    #[tokio::test]
    async fn logout_sends_session_identifier() {
        let client = HttpAuthClient::new(serve(stub()).await);
        let resp = client
            .logout(&SecretString::from("r-1".to_string()))
            .await
            .unwrap();
        assert_eq!(resp.message, "Signed out");
    }

    #[tokio::test]
    async fn error_without_payload_gets_status_message() {
        let client = HttpAuthClient::new(serve(stub()).await);
        let data = ActivationData {
            token: "t".to_string(),
            password: SecretString::from("pw".to_string()),
        };
        let err = client.activate_account(&data).await.unwrap_err();
        assert_eq!(err.user_message(), "Request failed with status 410");
    }

    #[tokio::test]
    async fn unreachable_service_is_http_error() {
        let client = HttpAuthClient::new("http://127.0.0.1:1");
        let err = client.login(&credentials("secret")).await.unwrap_err();
        assert!(matches!(err, AuthError::Http(_)));
    }
}
