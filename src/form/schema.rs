//! Step schemas and the generic schema-driven step form.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::FormError;
use crate::wizard::{StepCommand, StepForm, StepKind, StepOutcome, StepPayload};

use super::field::{FieldConfig, ListField, RenderedField, render};
use super::list::RepeatableList;
use super::rules::CrossFieldCheck;
use super::values::{FieldErrors, FormValues};
use super::visibility::{ConditionalSection, SectionVisibility};

/// Shape and rules of one step's form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSchema {
    pub kind: StepKind,
    pub fields: Vec<FieldConfig>,
    pub sections: Vec<ConditionalSection>,
    pub checks: Vec<CrossFieldCheck>,
}

impl StepSchema {
    pub fn new(kind: StepKind, fields: Vec<FieldConfig>) -> Self {
        Self {
            kind,
            fields,
            sections: Vec::new(),
            checks: Vec::new(),
        }
    }

    pub fn with_section(mut self, section: ConditionalSection) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_check(mut self, check: CrossFieldCheck) -> Self {
        self.checks.push(check);
        self
    }

    /// Initial values: every field, hidden ones included, at its default.
    pub fn defaults(&self) -> FormValues {
        self.all_fields()
            .map(|f| (f.name().to_string(), f.default_value()))
            .collect()
    }

    /// Every field of the schema regardless of visibility.
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldConfig> {
        self.fields
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.fields.iter()))
    }

    /// Fields that take part in validation for `values`.
    pub fn visible_fields<'a>(
        &'a self,
        values: &'a FormValues,
    ) -> impl Iterator<Item = &'a FieldConfig> + 'a {
        self.fields.iter().chain(
            self.sections
                .iter()
                .filter(move |s| s.is_visible(values))
                .flat_map(|s| s.fields.iter()),
        )
    }

    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.all_fields().find(|f| f.name() == name)
    }

    /// Validate visible fields and run cross-field checks.
    ///
    /// The returned payload only contains visible fields.
    pub fn validate(&self, values: &FormValues) -> Result<FormValues, FieldErrors> {
        let mut errors = FieldErrors::default();
        let mut payload = FormValues::new();
        for field in self.visible_fields(values) {
            match field.validate(values.get(field.name())) {
                Ok(value) => {
                    payload.insert(field.name().to_string(), value);
                }
                Err(e) => errors.extend(e),
            }
        }
        if errors.is_empty() {
            for check in &self.checks {
                if let Some((path, message)) = check.evaluate(&payload) {
                    errors.insert(path, message);
                }
            }
        }
        if errors.is_empty() {
            Ok(payload)
        } else {
            Err(errors)
        }
    }

    /// Render the visible fields with their current values.
    pub fn render(&self, values: &FormValues) -> Vec<RenderedField> {
        self.visible_fields(values)
            .map(|field| render(field, values))
            .collect()
    }
}

/// A live, editable form for one step.
#[derive(Debug, Clone)]
pub struct SchemaForm {
    schema: StepSchema,
    values: FormValues,
    visibility: SectionVisibility,
    errors: FieldErrors,
}

impl SchemaForm {
    pub fn new(schema: StepSchema) -> Self {
        let values = schema.defaults();
        let visibility = SectionVisibility::new(&schema.sections, &values);
        Self {
            schema,
            values,
            visibility,
            errors: FieldErrors::default(),
        }
    }

    pub fn schema(&self) -> &StepSchema {
        &self.schema
    }

    /// Set one field. Unknown names are rejected.
    pub fn set_value(&mut self, name: &str, value: Value) -> Result<(), FormError> {
        if self.schema.field(name).is_none() {
            return Err(FormError::UnknownField(name.to_string()));
        }
        self.values.insert(name.to_string(), value);
        self.sync_sections();
        Ok(())
    }

    /// Apply several field updates at once.
    ///
    /// All names are checked before anything is written.
    pub fn set_values(&mut self, patch: FormValues) -> Result<(), FormError> {
        if let Some(unknown) = patch.keys().find(|k| self.schema.field(k).is_none()) {
            return Err(FormError::UnknownField(unknown.clone()));
        }
        self.values.extend(patch.clone());
        self.sync_sections();
        // Values sent together with a reveal win over its reset.
        self.values.extend(patch);
        Ok(())
    }

    /// Append a default item to list `name`. Returns the new index.
    pub fn list_add(&mut self, name: &str) -> Result<usize, FormError> {
        self.edit_list(name, |list| list.add())
    }

    pub fn list_remove(&mut self, name: &str, index: usize) -> Result<(), FormError> {
        self.edit_list(name, |list| list.remove(index).map(|_| ()))
    }

    pub fn list_update(&mut self, name: &str, index: usize, item: Value) -> Result<(), FormError> {
        self.edit_list(name, |list| list.update(index, item))
    }

    /// Render visible fields with current values.
    pub fn render(&self) -> Vec<RenderedField> {
        self.schema.render(&self.values)
    }

    fn list_field(&self, name: &str) -> Result<&ListField, FormError> {
        match self.schema.field(name) {
            Some(FieldConfig::RepeatableList(list)) => Ok(list),
            Some(_) => Err(FormError::NotAList(name.to_string())),
            None => Err(FormError::UnknownField(name.to_string())),
        }
    }

    fn edit_list<T, F>(&mut self, name: &str, edit: F) -> Result<T, FormError>
    where
        F: FnOnce(&mut RepeatableList<Value>) -> Result<T, super::ListNotice>,
    {
        let field = self.list_field(name)?;
        let items = self
            .values
            .get(name)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let mut list =
            RepeatableList::from_items(items, field.item_template(), field.min_items, field.max_items);
        let result = edit(&mut list).inspect_err(|notice| {
            tracing::warn!(field = name, %notice, "List edit rejected");
        })?;
        self.values
            .insert(name.to_string(), Value::Array(list.into_items()));
        Ok(result)
    }

    fn sync_sections(&mut self) {
        for section in self.visibility.sync(&self.schema.sections, &mut self.values) {
            tracing::debug!(section = %section, "Conditional section revealed");
        }
    }
}

#[async_trait]
impl StepForm for SchemaForm {
    fn kind(&self) -> StepKind {
        self.schema.kind
    }

    fn values(&self) -> &FormValues {
        &self.values
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    async fn handle(&mut self, command: StepCommand) -> StepOutcome {
        match command {
            StepCommand::ValidateAndCollect => match self.schema.validate(&self.values) {
                Ok(payload) => {
                    self.errors = FieldErrors::default();
                    StepOutcome::Valid(StepPayload::from(payload))
                }
                Err(errors) => {
                    self.errors = errors.clone();
                    StepOutcome::Invalid(errors)
                }
            },
        }
    }
}
