//! HTTP host: shared state and the assembled router.

use std::sync::Arc;

use axum::extract::State;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{
    AuthApi, AuthRouteState, AuthService, HttpAuthClient, JsonFileSessionPersistence, RouteAccess,
    RouteGuard, SessionStore, auth_routes, enforce,
};
use crate::config::ServerConfig;
use crate::notify::ToastQueue;
use crate::save::{FileSaveSink, HttpSaveSink, SaveSink};
use crate::wizard::{WizardRegistry, WizardRouteState, wizard_routes};

/// Everything the routes share. One signed-in session per host process.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<WizardRegistry>,
    pub session: Arc<SessionStore>,
    pub toasts: Arc<ToastQueue>,
    pub auth: Arc<AuthService>,
    pub save: Arc<dyn SaveSink>,
}

impl AppState {
    pub fn new(api: Arc<dyn AuthApi>, session: Arc<SessionStore>, save: Arc<dyn SaveSink>) -> Self {
        let toasts = ToastQueue::new();
        let auth = Arc::new(AuthService::new(api, session.clone(), toasts.clone()));
        Self {
            registry: WizardRegistry::new(),
            session,
            toasts,
            auth,
            save,
        }
    }

    /// Wire the production collaborators described by `config`.
    pub fn from_config(config: &ServerConfig) -> Self {
        let api: Arc<dyn AuthApi> = Arc::new(HttpAuthClient::new(&config.auth_base_url));
        let session = SessionStore::with_persistence(Arc::new(JsonFileSessionPersistence::new(
            &config.session_file,
        )));
        let save: Arc<dyn SaveSink> = match &config.save_url {
            Some(url) => Arc::new(HttpSaveSink::new(url)),
            None => Arc::new(FileSaveSink::new(&config.submissions_dir)),
        };
        Self::new(api, session, save)
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "kyc-wizard"
    }))
}

/// GET /api/toasts: hand over and forget every pending toast.
async fn drain_toasts(State(toasts): State<Arc<ToastQueue>>) -> impl IntoResponse {
    Json(toasts.drain().await)
}

/// Assemble the full router.
pub fn router(state: AppState) -> Router {
    let wizards = wizard_routes(WizardRouteState {
        registry: state.registry.clone(),
        toasts: state.toasts.clone(),
        save: state.save.clone(),
    })
    .route_layer(middleware::from_fn_with_state(
        RouteGuard::new(state.session.clone(), RouteAccess::Protected),
        enforce,
    ));

    let auth = auth_routes(AuthRouteState {
        service: state.auth.clone(),
        wizards: state.registry.clone(),
    });

    let misc = Router::new()
        .route("/health", get(health))
        .route("/api/toasts", get(drain_toasts))
        .with_state(state.toasts.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(misc)
        .merge(auth)
        .merge(wizards)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
