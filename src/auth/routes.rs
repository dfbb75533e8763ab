//! REST endpoints for login, logout, activation and the session snapshot.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::AuthError;
use crate::wizard::WizardRegistry;

use super::guard::{HOME_PATH, LOGIN_PATH, RouteAccess, RouteGuard, enforce};
use super::model::{ActivationData, Credentials};
use super::service::AuthService;

/// Shared state for auth routes.
#[derive(Clone)]
pub struct AuthRouteState {
    pub service: Arc<AuthService>,
    /// In-progress wizards belong to the signed-in user and go with them.
    pub wizards: Arc<WizardRegistry>,
}

fn error_response(err: &AuthError) -> Response {
    let status = match err {
        AuthError::Api { status, .. } => StatusCode::from_u16(*status)
            .ok()
            .filter(|s| s.is_client_error())
            .unwrap_or(StatusCode::BAD_GATEWAY),
        AuthError::Http(_) | AuthError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        AuthError::NotAuthenticated => StatusCode::UNAUTHORIZED,
    };
    (
        status,
        Json(serde_json::json!({"error": err.user_message()})),
    )
        .into_response()
}

/// POST /api/auth/login
async fn login(
    State(state): State<AuthRouteState>,
    Json(credentials): Json<Credentials>,
) -> Response {
    match state.service.login(credentials).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST /api/auth/logout
async fn logout(State(state): State<AuthRouteState>) -> Response {
    match state.service.logout().await {
        Ok(resp) => {
            state.wizards.clear().await;
            Json(resp).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST /api/auth/activate
async fn activate(
    State(state): State<AuthRouteState>,
    Json(data): Json<ActivationData>,
) -> Response {
    match state.service.activate_account(data).await {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /login: where anonymous callers land.
async fn login_page() -> impl IntoResponse {
    Json(serde_json::json!({
        "is_authenticated": false,
        "login": "/api/auth/login",
        "activate": "/api/auth/activate"
    }))
}

/// GET /: where signed-in callers land.
async fn home(State(state): State<AuthRouteState>) -> impl IntoResponse {
    Json(state.service.session().snapshot().await)
}

/// GET /api/session
async fn session(State(state): State<AuthRouteState>) -> impl IntoResponse {
    Json(state.service.session().snapshot().await)
}

/// Build the auth routes, each behind its guard.
pub fn auth_routes(state: AuthRouteState) -> Router {
    let guard = |access| {
        middleware::from_fn_with_state(
            RouteGuard::new(state.service.session().clone(), access),
            enforce,
        )
    };

    let guest = Router::new()
        .route(LOGIN_PATH, get(login_page))
        .route("/api/auth/login", post(login))
        .route_layer(guard(RouteAccess::GuestOnly));
    let protected = Router::new()
        .route(HOME_PATH, get(home))
        .route("/api/auth/logout", post(logout))
        .route_layer(guard(RouteAccess::Protected));
    let public = Router::new()
        .route("/api/auth/activate", post(activate))
        .route("/api/session", get(session));

    guest
        .merge(protected)
        .merge(public)
        .with_state(state)
}
