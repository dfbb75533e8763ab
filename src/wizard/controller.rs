//! Wizard controller: step sequencing and completion bookkeeping.
//!
//! States are the step ids `1..=N`; the initial state is 1 and N is
//! terminal. Navigation never fails: out-of-range moves are ignored.

use chrono::Utc;
use serde::Serialize;

use crate::error::WizardError;
use crate::form::FieldErrors;

use super::definition::{FormType, StepDescriptor, StepId, WizardDefinition};
use super::result::{AccumulatedResult, Submission};
use super::step::{self, StepForm, StepPayload};

/// Result of asking the current step to validate and submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Payload stored. `from` is the submitted step, `to` the step now current.
    Advanced { from: StepId, to: StepId },
    /// Validation failed; the controller stayed put.
    Invalid(FieldErrors),
}

/// A step together with its completion flag.
#[derive(Debug, Clone, Serialize)]
pub struct StepStatus {
    #[serde(flatten)]
    pub descriptor: StepDescriptor,
    pub completed: bool,
}

/// Owns the current step, completion flags and accumulated result.
#[derive(Debug, Clone)]
pub struct WizardController {
    definition: WizardDefinition,
    completed: Vec<bool>,
    current: StepId,
    results: AccumulatedResult,
}

impl WizardController {
    pub fn new(definition: WizardDefinition) -> Self {
        let completed = vec![false; definition.steps().len()];
        Self {
            definition,
            completed,
            current: 1,
            results: AccumulatedResult::new(),
        }
    }

    pub fn definition(&self) -> &WizardDefinition {
        &self.definition
    }

    pub fn step_count(&self) -> StepId {
        self.definition.step_count()
    }

    pub fn current_step_id(&self) -> StepId {
        self.current
    }

    pub fn current_step(&self) -> &StepDescriptor {
        // `current` is kept within 1..=N by every transition.
        &self.definition.steps()[self.index(self.current)]
    }

    pub fn results(&self) -> &AccumulatedResult {
        &self.results
    }

    /// Mark the current step complete and move forward unless on the last step.
    pub fn advance(&mut self) {
        let index = self.index(self.current);
        self.completed[index] = true;
        if !self.is_last_step() {
            self.current += 1;
        }
        tracing::debug!(step = self.current, "Wizard advanced");
    }

    /// Move back one step unless on the first. Completion flags are untouched.
    pub fn retreat(&mut self) {
        if !self.is_first_step() {
            self.current -= 1;
        }
    }

    /// Jump straight to `step_id`. Ids outside `1..=N` are ignored.
    pub fn jump_to(&mut self, step_id: StepId) {
        if (1..=self.step_count()).contains(&step_id) {
            self.current = step_id;
        } else {
            tracing::debug!(step_id, "Ignoring jump outside wizard bounds");
        }
    }

    pub fn is_first_step(&self) -> bool {
        self.current == 1
    }

    pub fn is_last_step(&self) -> bool {
        self.current == self.step_count()
    }

    /// Current step over total steps, in `(0, 1]`.
    pub fn progress_fraction(&self) -> f64 {
        f64::from(self.current) / f64::from(self.step_count())
    }

    pub fn is_step_complete(&self, step_id: StepId) -> bool {
        self.definition
            .step(step_id)
            .map(|_| self.completed[self.index(step_id)])
            .unwrap_or(false)
    }

    /// All steps with their completion flags, in order.
    pub fn statuses(&self) -> Vec<StepStatus> {
        self.definition
            .steps()
            .iter()
            .zip(&self.completed)
            .map(|(descriptor, completed)| StepStatus {
                descriptor: descriptor.clone(),
                completed: *completed,
            })
            .collect()
    }

    /// Ids of the steps not yet completed.
    pub fn incomplete_steps(&self) -> Vec<StepId> {
        self.statuses()
            .into_iter()
            .filter(|s| !s.completed)
            .map(|s| s.descriptor.id)
            .collect()
    }

    /// Store a payload for `step_id` and mark it complete.
    ///
    /// Other steps keep their payloads and flags. Unknown ids are ignored.
    pub fn record(&mut self, step_id: StepId, payload: StepPayload) {
        if self.definition.step(step_id).is_none() {
            tracing::warn!(step_id, "Ignoring payload for unknown step");
            return;
        }
        let index = self.index(step_id);
        self.completed[index] = true;
        if self.results.merge(step_id, payload).is_some() {
            tracing::debug!(step_id, "Step payload replaced");
        }
    }

    /// Ask `form` (the current step's form) to validate and collect.
    ///
    /// On success the payload is stored under the current step and the
    /// controller advances.
    pub async fn submit_current(&mut self, form: &mut dyn StepForm) -> SubmitOutcome {
        let from = self.current;
        let mut collected = None;
        if step::submit(form, |payload| collected = Some(payload)).await {
            if let Some(payload) = collected {
                self.record(from, payload);
            }
            self.advance();
            SubmitOutcome::Advanced {
                from,
                to: self.current,
            }
        } else {
            SubmitOutcome::Invalid(form.errors().clone())
        }
    }

    /// Build the submission for the final save.
    ///
    /// Every step must be complete; cross-step consistency is not checked.
    pub fn submission(&self, form_type: FormType) -> Result<Submission, WizardError> {
        let incomplete = self.incomplete_steps();
        if !incomplete.is_empty() {
            return Err(WizardError::IncompleteSteps(incomplete));
        }
        Ok(Submission {
            form_type,
            steps: self.results.clone(),
            submitted_at: Utc::now(),
        })
    }

    fn index(&self, step_id: StepId) -> usize {
        (step_id - 1) as usize
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::wizard::definition::StepKind;
    use crate::wizard::step::tests::FixedStep;

    fn two_steps() -> WizardController {
        let def = WizardDefinition::new(vec![
            StepDescriptor::new(1, "General", StepKind::GeneralData),
            StepDescriptor::new(2, "Tax", StepKind::TaxData),
        ])
        .unwrap();
        WizardController::new(def)
    }

    fn n_steps(n: StepId) -> WizardController {
        let steps = (1..=n)
            .map(|id| StepDescriptor::new(id, format!("Step {id}"), StepKind::GeneralData))
            .collect();
        WizardController::new(WizardDefinition::new(steps).unwrap())
    }

    #[test]
    fn advance_then_retreat_keeps_completion() {
        let mut wizard = two_steps();
        assert_eq!(wizard.current_step_id(), 1);

        wizard.advance();
        assert_eq!(wizard.current_step_id(), 2);
        assert!(wizard.is_step_complete(1));

        wizard.retreat();
        assert_eq!(wizard.current_step_id(), 1);
        assert!(wizard.is_step_complete(1));
        assert!(!wizard.is_step_complete(2));
    }

    #[test]
    fn advance_on_last_step_marks_complete_without_moving() {
        let mut wizard = two_steps();
        wizard.jump_to(2);
        wizard.advance();
        assert_eq!(wizard.current_step_id(), 2);
        assert!(wizard.is_step_complete(2));
    }

    #[test]
    fn retreat_on_first_step_is_noop() {
        let mut wizard = two_steps();
        wizard.retreat();
        assert_eq!(wizard.current_step_id(), 1);
        assert!(!wizard.is_step_complete(1));
    }

    #[test]
    fn jump_outside_bounds_is_ignored() {
        let mut wizard = n_steps(4);
        wizard.jump_to(3);
        assert_eq!(wizard.current_step_id(), 3);
        wizard.jump_to(0);
        assert_eq!(wizard.current_step_id(), 3);
        wizard.jump_to(5);
        assert_eq!(wizard.current_step_id(), 3);
    }

    #[test]
    fn current_step_stays_in_bounds_for_any_sequence() {
        for n in 1..=6 {
            let mut wizard = n_steps(n);
            // Deterministic pseudo-random walk over the three operations.
            let mut seed: u32 = 0x9e37_79b9 ^ n;
            for _ in 0..200 {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                match seed % 3 {
                    0 => wizard.advance(),
                    1 => wizard.retreat(),
                    _ => wizard.jump_to(seed % (n + 3)),
                }
                let current = wizard.current_step_id();
                assert!((1..=n).contains(&current), "step {current} out of 1..={n}");
            }
        }
    }

    #[test]
    fn single_step_wizard_is_first_and_last() {
        let mut wizard = n_steps(1);
        assert!(wizard.is_first_step());
        assert!(wizard.is_last_step());
        assert_eq!(wizard.progress_fraction(), 1.0);
        wizard.advance();
        assert_eq!(wizard.current_step_id(), 1);
        assert!(wizard.is_step_complete(1));
    }

    #[test]
    fn progress_fraction_tracks_current() {
        let mut wizard = n_steps(4);
        assert_eq!(wizard.progress_fraction(), 0.25);
        wizard.jump_to(3);
        assert_eq!(wizard.progress_fraction(), 0.75);
    }

    #[test]
    fn record_overwrites_without_touching_later_steps() {
        let mut wizard = n_steps(3);
        wizard.record(1, StepPayload::new(json!({"v": 1})));
        wizard.record(2, StepPayload::new(json!({"v": 2})));
        wizard.record(1, StepPayload::new(json!({"v": 10})));
        assert!(wizard.is_step_complete(2));
        assert_eq!(wizard.results().get(1).unwrap().as_value()["v"], 10);
        assert_eq!(wizard.results().get(2).unwrap().as_value()["v"], 2);
    }

    #[tokio::test]
    async fn submit_valid_step_stores_and_advances() {
        let mut wizard = two_steps();
        let mut step = FixedStep::valid(StepKind::GeneralData, json!({"first_name": "Ana"}));
        let outcome = wizard.submit_current(&mut step).await;
        assert_eq!(outcome, SubmitOutcome::Advanced { from: 1, to: 2 });
        assert!(wizard.is_step_complete(1));
        assert_eq!(
            wizard.results().get(1).unwrap().as_value()["first_name"],
            "Ana"
        );
    }

    #[tokio::test]
    async fn submit_invalid_step_stays() {
        let mut wizard = two_steps();
        let mut step = FixedStep::invalid(StepKind::GeneralData, "email", "Invalid email");
        let outcome = wizard.submit_current(&mut step).await;
        match outcome {
            SubmitOutcome::Invalid(errors) => assert_eq!(errors.get("email"), Some("Invalid email")),
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert_eq!(wizard.current_step_id(), 1);
        assert!(!wizard.is_step_complete(1));
        assert!(wizard.results().is_empty());
    }

    #[tokio::test]
    async fn resubmitting_earlier_step_keeps_later_completion() {
        let mut wizard = n_steps(3);
        let mut first = FixedStep::valid(StepKind::GeneralData, json!({"v": 1}));
        let mut second = FixedStep::valid(StepKind::GeneralData, json!({"v": 2}));
        wizard.submit_current(&mut first).await;
        wizard.submit_current(&mut second).await;
        wizard.jump_to(1);
        let mut again = FixedStep::valid(StepKind::GeneralData, json!({"v": 3}));
        wizard.submit_current(&mut again).await;
        assert_eq!(wizard.current_step_id(), 2);
        assert!(wizard.is_step_complete(2));
        assert_eq!(wizard.results().get(1).unwrap().as_value()["v"], 3);
    }

    #[test]
    fn submission_requires_all_steps() {
        let mut wizard = two_steps();
        wizard.record(1, StepPayload::new(json!({})));
        match wizard.submission(FormType::Individual) {
            Err(WizardError::IncompleteSteps(ids)) => assert_eq!(ids, vec![2]),
            other => panic!("expected IncompleteSteps, got {other:?}"),
        }
        wizard.record(2, StepPayload::new(json!({})));
        let submission = wizard.submission(FormType::Individual).unwrap();
        assert_eq!(submission.steps.len(), 2);
        assert_eq!(submission.form_type, FormType::Individual);
    }
}
