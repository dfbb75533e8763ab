//! REST endpoints driving wizard sessions.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{FormError, WizardError};
use crate::form::FormValues;
use crate::notify::ToastQueue;
use crate::save::SaveSink;

use super::controller::SubmitOutcome;
use super::definition::{FormType, StepId};
use super::registry::{Completion, WizardRegistry};

/// Shared state for wizard routes.
#[derive(Clone)]
pub struct WizardRouteState {
    pub registry: Arc<WizardRegistry>,
    pub toasts: Arc<ToastQueue>,
    pub save: Arc<dyn SaveSink>,
}

#[derive(Debug, Deserialize)]
struct CreateWizard {
    form_type: FormType,
}

fn error_body(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

/// Map a wizard error to a response. List notices also raise a warning toast.
async fn error_response(state: &WizardRouteState, err: WizardError) -> Response {
    match err {
        WizardError::SessionNotFound(_) => {
            error_body(StatusCode::NOT_FOUND, json!({"error": err.to_string()}))
        }
        WizardError::Form(FormError::List(notice)) => {
            state.toasts.warning(notice.to_string()).await;
            error_body(
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"error": notice.to_string(), "notice": notice}),
            )
        }
        WizardError::Form(e) => error_body(StatusCode::BAD_REQUEST, json!({"error": e.to_string()})),
        WizardError::IncompleteSteps(ref steps) => error_body(
            StatusCode::CONFLICT,
            json!({"error": err.to_string(), "incomplete_steps": steps}),
        ),
        WizardError::NotOnLastStep | WizardError::SaveInProgress(_) => {
            error_body(StatusCode::CONFLICT, json!({"error": err.to_string()}))
        }
        WizardError::EmptyDefinition | WizardError::NonSequentialStep { .. } => error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": err.to_string()}),
        ),
    }
}

/// POST /api/wizards
async fn create_wizard(
    State(state): State<WizardRouteState>,
    Json(body): Json<CreateWizard>,
) -> impl IntoResponse {
    let view = state.registry.create(body.form_type).await;
    (StatusCode::CREATED, Json(view))
}

/// GET /api/wizards/{id}
async fn get_wizard(State(state): State<WizardRouteState>, Path(id): Path<Uuid>) -> Response {
    match state.registry.view(id).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(&state, e).await,
    }
}

/// DELETE /api/wizards/{id}
async fn delete_wizard(State(state): State<WizardRouteState>, Path(id): Path<Uuid>) -> Response {
    if state.registry.remove(id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        error_response(&state, WizardError::SessionNotFound(id)).await
    }
}

/// PATCH /api/wizards/{id}/values
async fn update_values(
    State(state): State<WizardRouteState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<FormValues>,
) -> Response {
    match state.registry.update_values(id, patch).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(&state, e).await,
    }
}

/// POST /api/wizards/{id}/next
///
/// 200 with the new view on success, 422 with field errors otherwise.
async fn next_step(State(state): State<WizardRouteState>, Path(id): Path<Uuid>) -> Response {
    match state.registry.next(id).await {
        Ok((SubmitOutcome::Advanced { .. }, view)) => Json(view).into_response(),
        Ok((SubmitOutcome::Invalid(errors), view)) => error_body(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"errors": errors, "wizard": view}),
        ),
        Err(e) => error_response(&state, e).await,
    }
}

/// POST /api/wizards/{id}/back
async fn previous_step(State(state): State<WizardRouteState>, Path(id): Path<Uuid>) -> Response {
    match state.registry.back(id).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(&state, e).await,
    }
}

/// POST /api/wizards/{id}/jump/{step}
async fn jump_to_step(
    State(state): State<WizardRouteState>,
    Path((id, step)): Path<(Uuid, StepId)>,
) -> Response {
    match state.registry.jump(id, step).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(&state, e).await,
    }
}

/// POST /api/wizards/{id}/save
///
/// Validates the last step, hands the submission to the save sink and
/// discards the session once the sink accepts it.
async fn save_wizard(State(state): State<WizardRouteState>, Path(id): Path<Uuid>) -> Response {
    let submission = match state.registry.complete(id).await {
        Ok(Completion::Ready(submission)) => submission,
        Ok(Completion::Invalid { errors, view }) => {
            return error_body(
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"errors": errors, "wizard": view}),
            );
        }
        Err(e) => return error_response(&state, e).await,
    };

    match state.save.save(id, &submission).await {
        Ok(receipt) => {
            state.registry.remove(id).await;
            state.toasts.success("Application saved").await;
            info!(wizard_id = %id, reference = %receipt.reference, "Wizard saved");
            Json(receipt).into_response()
        }
        Err(e) => {
            state.registry.release(id).await;
            error!(wizard_id = %id, error = %e, "Save failed");
            state.toasts.error("Could not save the application").await;
            error_body(StatusCode::BAD_GATEWAY, json!({"error": e.to_string()}))
        }
    }
}

/// POST /api/wizards/{id}/lists/{field}
async fn add_list_item(
    State(state): State<WizardRouteState>,
    Path((id, field)): Path<(Uuid, String)>,
) -> Response {
    match state.registry.list_add(id, &field).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(&state, e).await,
    }
}

/// PUT /api/wizards/{id}/lists/{field}/{index}
async fn update_list_item(
    State(state): State<WizardRouteState>,
    Path((id, field, index)): Path<(Uuid, String, usize)>,
    Json(item): Json<Value>,
) -> Response {
    match state.registry.list_update(id, &field, index, item).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(&state, e).await,
    }
}

/// DELETE /api/wizards/{id}/lists/{field}/{index}
async fn remove_list_item(
    State(state): State<WizardRouteState>,
    Path((id, field, index)): Path<(Uuid, String, usize)>,
) -> Response {
    match state.registry.list_remove(id, &field, index).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => error_response(&state, e).await,
    }
}

/// Build the wizard REST routes.
pub fn wizard_routes(state: WizardRouteState) -> Router {
    Router::new()
        .route("/api/wizards", post(create_wizard))
        .route("/api/wizards/{id}", get(get_wizard).delete(delete_wizard))
        .route("/api/wizards/{id}/values", patch(update_values))
        .route("/api/wizards/{id}/next", post(next_step))
        .route("/api/wizards/{id}/back", post(previous_step))
        .route("/api/wizards/{id}/jump/{step}", post(jump_to_step))
        .route("/api/wizards/{id}/save", post(save_wizard))
        .route("/api/wizards/{id}/lists/{field}", post(add_list_item))
        .route(
            "/api/wizards/{id}/lists/{field}/{index}",
            put(update_list_item).delete(remove_list_item),
        )
        .with_state(state)
}
