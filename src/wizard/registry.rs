//! In-memory registry of live wizard sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::WizardError;
use crate::form::{FieldErrors, FormValues};

use super::controller::SubmitOutcome;
use super::definition::{FormType, StepId};
use super::result::Submission;
use super::session::{WizardSession, WizardView};

/// What finishing a wizard produced.
#[derive(Debug, Clone)]
pub enum Completion {
    /// Every step is complete; hand this to the save sink.
    Ready(Submission),
    /// The last step did not validate.
    Invalid { errors: FieldErrors, view: WizardView },
}

/// Live sessions keyed by id. Nothing here survives a restart.
pub struct WizardRegistry {
    sessions: RwLock<HashMap<Uuid, WizardSession>>,
}

impl WizardRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Start a new wizard for `form_type`.
    pub async fn create(&self, form_type: FormType) -> WizardView {
        let session = WizardSession::new(form_type);
        let view = session.view();
        info!(wizard_id = %view.id, %form_type, "Wizard started");
        self.sessions.write().await.insert(view.id, session);
        view
    }

    pub async fn view(&self, id: Uuid) -> Result<WizardView, WizardError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .map(WizardSession::view)
            .ok_or(WizardError::SessionNotFound(id))
    }

    /// Drop a session. Unsaved payloads are lost.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(wizard_id = %id, "Wizard discarded");
        }
        removed
    }

    /// Drop every session. Called when the signed-in user leaves.
    pub async fn clear(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let count = sessions.len();
        sessions.clear();
        if count > 0 {
            info!(count, "Wizards discarded");
        }
        count
    }

    /// Drop sessions untouched for longer than `max_idle`.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        self.prune_idle_at(Utc::now(), max_idle).await
    }

    async fn prune_idle_at(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let max_idle = chrono::Duration::from_std(max_idle).unwrap_or(chrono::Duration::MAX);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = session.is_saving() || now - session.last_active_at() <= max_idle;
            if !keep {
                debug!(wizard_id = %id, "Pruning idle wizard");
            }
            keep
        });
        let pruned = before - sessions.len();
        if pruned > 0 {
            info!(pruned, "Idle wizards pruned");
        }
        pruned
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Patch values of the current step's form.
    pub async fn update_values(&self, id: Uuid, patch: FormValues) -> Result<WizardView, WizardError> {
        self.edit(id, |session| Ok(session.set_values(patch)?)).await
    }

    pub async fn list_add(&self, id: Uuid, field: &str) -> Result<WizardView, WizardError> {
        self.edit(id, |session| {
            let index = session.list_add(field)?;
            debug!(wizard_id = %id, field, index, "List item added");
            Ok(())
        })
        .await
    }

    pub async fn list_update(
        &self,
        id: Uuid,
        field: &str,
        index: usize,
        item: Value,
    ) -> Result<WizardView, WizardError> {
        self.edit(id, |session| Ok(session.list_update(field, index, item)?))
            .await
    }

    pub async fn list_remove(
        &self,
        id: Uuid,
        field: &str,
        index: usize,
    ) -> Result<WizardView, WizardError> {
        self.edit(id, |session| Ok(session.list_remove(field, index)?))
            .await
    }

    /// Validate the current step and advance if it passes.
    pub async fn next(&self, id: Uuid) -> Result<(SubmitOutcome, WizardView), WizardError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(WizardError::SessionNotFound(id))?;
        session.touch();
        let outcome = session.next().await;
        match &outcome {
            SubmitOutcome::Advanced { from, to } => {
                info!(wizard_id = %id, step_id = from, next = to, "Step submitted");
            }
            SubmitOutcome::Invalid(errors) => {
                debug!(wizard_id = %id, error_count = errors.len(), "Step rejected");
            }
        }
        Ok((outcome, session.view()))
    }

    pub async fn back(&self, id: Uuid) -> Result<WizardView, WizardError> {
        self.edit(id, |session| {
            session.back();
            Ok(())
        })
        .await
    }

    pub async fn jump(&self, id: Uuid, step_id: StepId) -> Result<WizardView, WizardError> {
        self.edit(id, |session| {
            session.jump_to(step_id);
            Ok(())
        })
        .await
    }

    /// Validate the last step and collect the submission.
    ///
    /// A ready session is claimed for saving: further calls fail with
    /// [`WizardError::SaveInProgress`] until [`WizardRegistry::remove`] or
    /// [`WizardRegistry::release`] is called.
    pub async fn complete(&self, id: Uuid) -> Result<Completion, WizardError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(WizardError::SessionNotFound(id))?;
        if session.is_saving() {
            return Err(WizardError::SaveInProgress(id));
        }
        session.touch();
        match session.finish().await? {
            Ok(submission) => {
                session.set_saving(true);
                info!(wizard_id = %id, steps = submission.steps.len(), "Wizard complete");
                Ok(Completion::Ready(submission))
            }
            Err(errors) => Ok(Completion::Invalid {
                errors,
                view: session.view(),
            }),
        }
    }

    /// Give a claimed session back after a failed save so it can be retried.
    pub async fn release(&self, id: Uuid) {
        if let Some(session) = self.sessions.write().await.get_mut(&id) {
            session.set_saving(false);
        }
    }

    async fn edit<F>(&self, id: Uuid, f: F) -> Result<WizardView, WizardError>
    where
        F: FnOnce(&mut WizardSession) -> Result<(), WizardError>,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(WizardError::SessionNotFound(id))?;
        session.touch();
        f(session)?;
        Ok(session.view())
    }
}
