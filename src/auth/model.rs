//! Wire types of the authentication service.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Login form. The password never leaves this process except to the auth API.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Access and refresh tokens issued at login.
#[derive(Debug, Deserialize)]
pub struct Tokens {
    #[serde(alias = "accessToken")]
    pub access_token: SecretString,
    #[serde(alias = "refreshToken")]
    pub refresh_token: SecretString,
}

impl Tokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }
}

impl Clone for Tokens {
    fn clone(&self) -> Self {
        Self::new(
            self.access_token.expose_secret(),
            self.refresh_token.expose_secret(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub tokens: Tokens,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Account activation request, as received from the activation link.
#[derive(Debug, Deserialize)]
pub struct ActivationData {
    pub token: String,
    pub password: SecretString,
}

/// Error body of a failed call. Either key may carry the text.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorPayload {
    pub fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .filter(|m| !m.trim().is_empty())
    }
}
