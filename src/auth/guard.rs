//! Route guard: who may reach which routes.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use super::session::SessionStore;

/// Redirect targets. Both are served by [`super::routes::auth_routes`].
pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Access class of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Reachable by anyone.
    Public,
    /// Only for signed-out visitors, e.g. login.
    GuestOnly,
    /// Requires an authenticated session.
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

impl RouteAccess {
    pub fn decide(self, is_authenticated: bool) -> GuardDecision {
        match (self, is_authenticated) {
            (Self::Protected, false) => GuardDecision::Redirect(LOGIN_PATH),
            (Self::GuestOnly, true) => GuardDecision::Redirect(HOME_PATH),
            _ => GuardDecision::Allow,
        }
    }
}

/// State for [`enforce`]: the session to consult and the class being guarded.
#[derive(Clone)]
pub struct RouteGuard {
    pub session: Arc<SessionStore>,
    pub access: RouteAccess,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>, access: RouteAccess) -> Self {
        Self { session, access }
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`.
pub async fn enforce(State(guard): State<RouteGuard>, request: Request, next: Next) -> Response {
    let authenticated = guard.session.is_authenticated().await;
    match guard.access.decide(authenticated) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(to) => {
            debug!(path = %request.uri().path(), access = ?guard.access, to, "Guard redirect");
            Redirect::to(to).into_response()
        }
    }
}
