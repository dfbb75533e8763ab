//! Authentication: the external auth API client, the injected session
//! store, the route guard and the HTTP endpoints tying them together.

pub mod client;
pub mod guard;
pub mod model;
pub mod routes;
pub mod service;
pub mod session;

pub use client::{AuthApi, HttpAuthClient};
pub use guard::{GuardDecision, RouteAccess, RouteGuard, enforce};
pub use model::{ActivationData, Credentials, LoginResponse, MessageResponse, Tokens, User};
pub use routes::{AuthRouteState, auth_routes};
pub use service::AuthService;
pub use session::{
    JsonFileSessionPersistence, PersistedSession, SessionPersistence, SessionSnapshot,
    SessionStore,
};
