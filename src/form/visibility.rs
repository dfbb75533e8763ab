//! Conditional field visibility within a single step.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::field::FieldConfig;
use super::values::FormValues;

/// Predicate over the current values of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// `field` equals `value`.
    Equals { field: String, value: Value },
    /// `field` equals any of `values`.
    OneOf { field: String, values: Vec<Value> },
    /// Checkbox `field` is ticked.
    Checked { field: String },
}

impl Condition {
    pub fn equals(field: &str, value: impl Into<Value>) -> Self {
        Self::Equals {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn checked(field: &str) -> Self {
        Self::Checked {
            field: field.to_string(),
        }
    }

    pub fn evaluate(&self, values: &FormValues) -> bool {
        match self {
            Self::Equals { field, value } => values.get(field) == Some(value),
            Self::OneOf { field, values: any } => {
                values.get(field).is_some_and(|v| any.contains(v))
            }
            Self::Checked { field } => values.get(field).and_then(Value::as_bool).unwrap_or(false),
        }
    }
}

/// Fields shown only while `when` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalSection {
    pub name: String,
    pub when: Condition,
    pub fields: Vec<FieldConfig>,
}

impl ConditionalSection {
    pub fn new(name: &str, when: Condition, fields: Vec<FieldConfig>) -> Self {
        Self {
            name: name.to_string(),
            when,
            fields,
        }
    }

    pub fn is_visible(&self, values: &FormValues) -> bool {
        self.when.evaluate(values)
    }

    /// Overwrite this section's fields with their defaults.
    pub fn reset(&self, values: &mut FormValues) {
        for field in &self.fields {
            values.insert(field.name().to_string(), field.default_value());
        }
    }
}

/// Remembers which sections were visible so reveals can be detected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionVisibility {
    visible: Vec<bool>,
}

impl SectionVisibility {
    pub fn new(sections: &[ConditionalSection], values: &FormValues) -> Self {
        Self {
            visible: sections.iter().map(|s| s.is_visible(values)).collect(),
        }
    }

    /// Re-evaluate every section against `values`.
    ///
    /// Sections going hidden -> visible get their fields reset to defaults.
    /// Returns the names of the revealed sections.
    pub fn sync(&mut self, sections: &[ConditionalSection], values: &mut FormValues) -> Vec<String> {
        let mut revealed = Vec::new();
        for (section, was_visible) in sections.iter().zip(self.visible.iter_mut()) {
            let now_visible = section.is_visible(values);
            if now_visible && !*was_visible {
                section.reset(values);
                revealed.push(section.name.clone());
            }
            *was_visible = now_visible;
        }
        revealed
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::form::field::FieldConfig;

    fn values(v: Value) -> FormValues {
        v.as_object().cloned().unwrap()
    }

    fn termination_section() -> ConditionalSection {
        ConditionalSection::new(
            "termination",
            Condition::equals("account_status", "CANCELED"),
            vec![FieldConfig::date("termination_date", "Termination date").required()],
        )
    }

    #[test]
    fn equals_condition() {
        let cond = Condition::equals("account_status", "CANCELED");
        assert!(cond.evaluate(&values(json!({"account_status": "CANCELED"}))));
        assert!(!cond.evaluate(&values(json!({"account_status": "ACTIVE"}))));
        assert!(!cond.evaluate(&values(json!({}))));
    }

    #[test]
    fn checked_condition_treats_missing_as_false() {
        let cond = Condition::checked("has_equity_links");
        assert!(cond.evaluate(&values(json!({"has_equity_links": true}))));
        assert!(!cond.evaluate(&values(json!({"has_equity_links": false}))));
        assert!(!cond.evaluate(&values(json!({"has_equity_links": "yes"}))));
        assert!(!cond.evaluate(&values(json!({}))));
    }

    #[test]
    fn one_of_condition() {
        let cond = Condition::OneOf {
            field: "regime".to_string(),
            values: vec![json!("601"), json!("603")],
        };
        assert!(cond.evaluate(&values(json!({"regime": "603"}))));
        assert!(!cond.evaluate(&values(json!({"regime": "605"}))));
    }

    #[test]
    fn reveal_resets_fields_to_defaults() {
        let sections = vec![termination_section()];
        let mut vals = values(json!({"account_status": "CANCELED", "termination_date": "2020-01-01"}));
        let mut visibility = SectionVisibility::new(&sections, &vals);
        assert!(visibility.is_visible(0));

        vals.insert("account_status".into(), json!("ACTIVE"));
        assert!(visibility.sync(&sections, &mut vals).is_empty());
        assert!(!visibility.is_visible(0));
        // Hidden values are kept until the next reveal.
        assert_eq!(vals["termination_date"], "2020-01-01");

        vals.insert("account_status".into(), json!("CANCELED"));
        let revealed = visibility.sync(&sections, &mut vals);
        assert_eq!(revealed, vec!["termination".to_string()]);
        assert_eq!(vals["termination_date"], "");
    }

    #[test]
    fn sync_is_idempotent_while_visible() {
        let sections = vec![termination_section()];
        let mut vals = values(json!({"account_status": "CANCELED", "termination_date": "2020-01-01"}));
        let mut visibility = SectionVisibility::new(&sections, &vals);
        assert!(visibility.sync(&sections, &mut vals).is_empty());
        assert!(visibility.sync(&sections, &mut vals).is_empty());
        assert_eq!(vals["termination_date"], "2020-01-01");
    }
}
