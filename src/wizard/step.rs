//! Step form adapter: the contract every step implements so the controller
//! can drive heterogeneous forms uniformly.
//!
//! The controller never reaches into a step. It sends a [`StepCommand`] and
//! gets back a [`StepOutcome`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::form::{FieldErrors, FormValues};

use super::definition::StepKind;

/// Validated data produced by a single step.
///
/// Opaque to the controller: it is stored and handed to the final save
/// without being interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepPayload(serde_json::Value);

impl StepPayload {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<FormValues> for StepPayload {
    fn from(values: FormValues) -> Self {
        Self(serde_json::Value::Object(values))
    }
}

/// Commands the controller issues to the active step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCommand {
    /// Run local validation and hand back the payload if valid.
    ValidateAndCollect,
}

/// What a step answers to [`StepCommand::ValidateAndCollect`].
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Valid(StepPayload),
    Invalid(FieldErrors),
}

/// A step the wizard controller can drive.
#[async_trait]
pub trait StepForm: Send {
    /// Which step this form implements.
    fn kind(&self) -> StepKind;

    /// Current (unvalidated) field values.
    fn values(&self) -> &FormValues;

    /// Errors from the last validation pass, empty if it succeeded.
    fn errors(&self) -> &FieldErrors;

    /// Handle a command from the controller.
    async fn handle(&mut self, command: StepCommand) -> StepOutcome;
}

/// Validate-and-submit a step.
///
/// On success `on_next` receives the payload and `true` is returned. On
/// failure `on_next` is not called; the errors stay readable on the step.
pub async fn submit<F>(step: &mut dyn StepForm, on_next: F) -> bool
where
    F: FnOnce(StepPayload) + Send,
{
    match step.handle(StepCommand::ValidateAndCollect).await {
        StepOutcome::Valid(payload) => {
            on_next(payload);
            true
        }
        StepOutcome::Invalid(errors) => {
            tracing::debug!(
                step = ?step.kind(),
                error_count = errors.len(),
                "Step validation failed"
            );
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Step double that answers with a canned outcome.
    pub(crate) struct FixedStep {
        pub kind: StepKind,
        pub values: FormValues,
        pub errors: FieldErrors,
        pub outcome: StepOutcome,
        pub commands: usize,
    }

    impl FixedStep {
        pub(crate) fn valid(kind: StepKind, payload: serde_json::Value) -> Self {
            Self {
                kind,
                values: FormValues::new(),
                errors: FieldErrors::default(),
                outcome: StepOutcome::Valid(StepPayload::new(payload)),
                commands: 0,
            }
        }

        pub(crate) fn invalid(kind: StepKind, field: &str, message: &str) -> Self {
            let mut errors = FieldErrors::default();
            errors.insert(field, message);
            Self {
                kind,
                values: FormValues::new(),
                errors: FieldErrors::default(),
                outcome: StepOutcome::Invalid(errors),
                commands: 0,
            }
        }
    }

    #[async_trait]
    impl StepForm for FixedStep {
        fn kind(&self) -> StepKind {
            self.kind
        }

        fn values(&self) -> &FormValues {
            &self.values
        }

        fn errors(&self) -> &FieldErrors {
            &self.errors
        }

        async fn handle(&mut self, _command: StepCommand) -> StepOutcome {
            self.commands += 1;
            if let StepOutcome::Invalid(errors) = &self.outcome {
                self.errors = errors.clone();
            }
            self.outcome.clone()
        }
    }

    #[tokio::test]
    async fn submit_calls_on_next_when_valid() {
        let mut step = FixedStep::valid(StepKind::GeneralData, serde_json::json!({"name": "Ana"}));
        let mut received = None;
        let ok = submit(&mut step, |payload| received = Some(payload)).await;
        assert!(ok);
        assert_eq!(step.commands, 1);
        assert_eq!(received.unwrap().as_value()["name"], "Ana");
    }

    #[tokio::test]
    async fn submit_skips_on_next_when_invalid() {
        let mut step = FixedStep::invalid(StepKind::TaxData, "rfc", "Invalid RFC");
        let mut called = false;
        let ok = submit(&mut step, |_| called = true).await;
        assert!(!ok);
        assert!(!called);
        assert_eq!(step.errors().get("rfc"), Some("Invalid RFC"));
    }

    #[test]
    fn payload_is_transparent_json() {
        let payload = StepPayload::new(serde_json::json!({"a": 1}));
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"a":1}"#);
    }
}
