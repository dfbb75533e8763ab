//! Accumulated wizard result and the final submission envelope.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::definition::{FormType, StepId};
use super::step::StepPayload;

/// Payloads collected so far, keyed by step id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccumulatedResult {
    steps: BTreeMap<StepId, StepPayload>,
}

impl AccumulatedResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a step's payload, replacing any earlier one. Returns the replaced payload.
    pub fn merge(&mut self, step_id: StepId, payload: StepPayload) -> Option<StepPayload> {
        self.steps.insert(step_id, payload)
    }

    pub fn get(&self, step_id: StepId) -> Option<&StepPayload> {
        self.steps.get(&step_id)
    }

    pub fn contains(&self, step_id: StepId) -> bool {
        self.steps.contains_key(&step_id)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StepId, &StepPayload)> {
        self.steps.iter().map(|(id, payload)| (*id, payload))
    }
}

/// Everything handed to the save collaborator at the end of the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub form_type: FormType,
    pub steps: AccumulatedResult,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn merge_overwrites_previous_payload() {
        let mut result = AccumulatedResult::new();
        assert!(result.merge(1, StepPayload::new(json!({"v": 1}))).is_none());
        let old = result.merge(1, StepPayload::new(json!({"v": 2})));
        assert_eq!(old.unwrap().as_value()["v"], 1);
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(1).unwrap().as_value()["v"], 2);
    }

    #[test]
    fn serializes_keyed_by_step_id() {
        let mut result = AccumulatedResult::new();
        result.merge(2, StepPayload::new(json!({"rfc": "XAXX010101000"})));
        result.merge(1, StepPayload::new(json!({"name": "Ana"})));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["1"]["name"], "Ana");
        assert_eq!(value["2"]["rfc"], "XAXX010101000");
    }

    #[test]
    fn iter_is_ordered_by_step() {
        let mut result = AccumulatedResult::new();
        result.merge(3, StepPayload::new(json!({})));
        result.merge(1, StepPayload::new(json!({})));
        let ids: Vec<StepId> = result.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
