//! Auth flows: call the service, update the session, raise toasts.
//!
//! A failed call never touches the session. Its message is shown verbatim.

use std::sync::Arc;

use tracing::info;

use crate::error::AuthError;
use crate::notify::ToastQueue;

use super::client::AuthApi;
use super::model::{ActivationData, Credentials, MessageResponse};
use super::session::{SessionSnapshot, SessionStore};

pub struct AuthService {
    api: Arc<dyn AuthApi>,
    session: Arc<SessionStore>,
    toasts: Arc<ToastQueue>,
}

impl AuthService {
    pub fn new(api: Arc<dyn AuthApi>, session: Arc<SessionStore>, toasts: Arc<ToastQueue>) -> Self {
        Self {
            api,
            session,
            toasts,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub async fn login(&self, credentials: Credentials) -> Result<SessionSnapshot, AuthError> {
        match self.api.login(&credentials).await {
            Ok(resp) => {
                info!(user = %resp.user.email, "Login succeeded");
                let message = resp.message.unwrap_or_else(|| "Signed in".to_string());
                self.session.set_auth(resp.user, resp.tokens).await;
                self.toasts.success(message).await;
                Ok(self.session.snapshot().await)
            }
            Err(e) => Err(self.report(e).await),
        }
    }

    pub async fn logout(&self) -> Result<MessageResponse, AuthError> {
        let Some(session_id) = self.session.session_id().await else {
            return Err(self.report(AuthError::NotAuthenticated).await);
        };
        match self.api.logout(&session_id).await {
            Ok(resp) => {
                self.session.clear_auth().await;
                self.toasts.success(resp.message.clone()).await;
                Ok(resp)
            }
            Err(e) => Err(self.report(e).await),
        }
    }

    pub async fn activate_account(&self, data: ActivationData) -> Result<MessageResponse, AuthError> {
        match self.api.activate_account(&data).await {
            Ok(resp) => {
                self.toasts.success(resp.message.clone()).await;
                Ok(resp)
            }
            Err(e) => Err(self.report(e).await),
        }
    }

    async fn report(&self, error: AuthError) -> AuthError {
        self.toasts.error(error.user_message()).await;
        error
    }
}
