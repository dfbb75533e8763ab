//! One user's pass through a wizard: controller plus a live form per step.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{FormError, WizardError};
use crate::form::{FieldErrors, FormValues, RenderedField, SchemaForm};
use crate::steps;

use super::controller::{StepStatus, SubmitOutcome, WizardController};
use super::definition::{FormType, StepDescriptor, StepId};
use super::result::Submission;
use super::step::StepForm;

/// A live wizard. Forms keep their values when the user navigates away.
#[derive(Debug, Clone)]
pub struct WizardSession {
    id: Uuid,
    form_type: FormType,
    controller: WizardController,
    forms: Vec<SchemaForm>,
    created_at: DateTime<Utc>,
    last_active_at: DateTime<Utc>,
    /// Set while the submission is with the save sink.
    saving: bool,
}

/// Snapshot of a session for clients.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub id: Uuid,
    pub form_type: FormType,
    pub current_step: StepDescriptor,
    pub step_count: StepId,
    pub progress: f64,
    pub is_first: bool,
    pub is_last: bool,
    pub steps: Vec<StepStatus>,
    pub fields: Vec<RenderedField>,
    pub errors: FieldErrors,
    pub created_at: DateTime<Utc>,
}

impl WizardSession {
    pub fn new(form_type: FormType) -> Self {
        let definition = form_type.definition();
        let forms = definition
            .steps()
            .iter()
            .map(|step| SchemaForm::new(steps::schema_for(step.kind, form_type)))
            .collect();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            form_type,
            controller: WizardController::new(definition),
            forms,
            created_at: now,
            last_active_at: now,
            saving: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn form_type(&self) -> FormType {
        self.form_type
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn last_active_at(&self) -> DateTime<Utc> {
        self.last_active_at
    }

    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
    }

    /// Form of the current step.
    pub fn current_form(&self) -> &SchemaForm {
        &self.forms[self.current_index()]
    }

    fn current_form_mut(&mut self) -> &mut SchemaForm {
        let index = self.current_index();
        &mut self.forms[index]
    }

    pub fn set_values(&mut self, patch: FormValues) -> Result<(), FormError> {
        self.current_form_mut().set_values(patch)
    }

    pub fn list_add(&mut self, field: &str) -> Result<usize, FormError> {
        self.current_form_mut().list_add(field)
    }

    pub fn list_update(&mut self, field: &str, index: usize, item: Value) -> Result<(), FormError> {
        self.current_form_mut().list_update(field, index, item)
    }

    pub fn list_remove(&mut self, field: &str, index: usize) -> Result<(), FormError> {
        self.current_form_mut().list_remove(field, index)
    }

    /// Validate the current step and advance on success.
    pub async fn next(&mut self) -> SubmitOutcome {
        let index = self.current_index();
        let form = &mut self.forms[index];
        self.controller.submit_current(form).await
    }

    pub fn back(&mut self) {
        self.controller.retreat();
    }

    pub fn jump_to(&mut self, step_id: StepId) {
        self.controller.jump_to(step_id);
    }

    /// Validate the last step and build the submission.
    ///
    /// `Ok(Err(errors))` means the last step itself did not validate.
    pub async fn finish(&mut self) -> Result<Result<Submission, FieldErrors>, WizardError> {
        if !self.controller.is_last_step() {
            return Err(WizardError::NotOnLastStep);
        }
        if let SubmitOutcome::Invalid(errors) = self.next().await {
            return Ok(Err(errors));
        }
        self.controller.submission(self.form_type).map(Ok)
    }

    pub fn view(&self) -> WizardView {
        let form = self.current_form();
        WizardView {
            id: self.id,
            form_type: self.form_type,
            current_step: self.controller.current_step().clone(),
            step_count: self.controller.step_count(),
            progress: self.controller.progress_fraction(),
            is_first: self.controller.is_first_step(),
            is_last: self.controller.is_last_step(),
            steps: self.controller.statuses(),
            fields: form.render(),
            errors: form.errors().clone(),
            created_at: self.created_at,
        }
    }

    fn current_index(&self) -> usize {
        (self.controller.current_step_id() - 1) as usize
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::wizard::StepKind;

    fn patch(value: Value) -> FormValues {
        value.as_object().cloned().unwrap()
    }

    fn address() -> FormValues {
        patch(json!({
            "street": "Av. Reforma",
            "exterior_number": "222",
            "neighborhood": "Juárez",
            "postal_code": "06600",
            "city": "Ciudad de México",
            "state": "CDMX",
            "country": "MX"
        }))
    }

    #[test]
    fn session_has_one_form_per_step() {
        let session = WizardSession::new(FormType::Trust);
        assert_eq!(session.forms.len(), 6);
        assert_eq!(session.current_form().kind(), StepKind::GeneralData);
        let view = session.view();
        assert!(view.is_first);
        assert_eq!(view.step_count, 6);
        assert!(!view.fields.is_empty());
    }

    #[tokio::test]
    async fn invalid_step_keeps_position_and_exposes_errors() {
        let mut session = WizardSession::new(FormType::SimplifiedRegime);
        let outcome = session.next().await;
        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        let view = session.view();
        assert_eq!(view.current_step.id, 1);
        assert!(!view.errors.is_empty());
    }

    #[tokio::test]
    async fn values_survive_navigation() {
        let mut session = WizardSession::new(FormType::SimplifiedRegime);
        session.jump_to(2);
        session.set_values(address()).unwrap();
        session.back();
        session.jump_to(2);
        assert_eq!(session.current_form().values()["street"], "Av. Reforma");
        assert_eq!(session.next().await, SubmitOutcome::Advanced { from: 2, to: 3 });
        assert!(session.controller().is_step_complete(2));
    }

    #[tokio::test]
    async fn finish_only_on_last_step() {
        let mut session = WizardSession::new(FormType::SimplifiedRegime);
        assert!(matches!(
            session.finish().await,
            Err(WizardError::NotOnLastStep)
        ));
    }
}
