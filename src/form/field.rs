//! Typed field configuration.
//!
//! Every input of every step is one of five variants. Rendering, defaults
//! and validation each dispatch on the variant in one place.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::rules::TextFormat;
use super::values::{FieldErrors, FormValues};

const REQUIRED: &str = "This field is required";

/// One option of a select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    /// Build options from a static `(value, label)` catalog.
    pub fn from_catalog(entries: &[(&str, &str)]) -> Vec<Self> {
        entries
            .iter()
            .map(|(value, label)| Self {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextField {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<TextFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectField {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateField {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    /// Reject dates after today.
    #[serde(default)]
    pub past_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckboxField {
    pub name: String,
    pub label: String,
    /// When set, the box must be ticked.
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListField {
    pub name: String,
    pub label: String,
    pub item_fields: Vec<FieldConfig>,
    pub min_items: usize,
    pub max_items: usize,
}

impl ListField {
    /// Default-valued record appended by "add".
    pub fn item_template(&self) -> Value {
        let item: FormValues = self
            .item_fields
            .iter()
            .map(|f| (f.name().to_string(), f.default_value()))
            .collect();
        Value::Object(item)
    }
}

/// Closed set of field kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldConfig {
    Text(TextField),
    Select(SelectField),
    Date(DateField),
    Checkbox(CheckboxField),
    RepeatableList(ListField),
}

impl FieldConfig {
    pub fn text(name: &str, label: &str) -> Self {
        Self::Text(TextField {
            name: name.to_string(),
            label: label.to_string(),
            required: false,
            format: None,
            max_len: None,
        })
    }

    pub fn select(name: &str, label: &str, options: Vec<SelectOption>) -> Self {
        Self::Select(SelectField {
            name: name.to_string(),
            label: label.to_string(),
            required: false,
            options,
        })
    }

    pub fn date(name: &str, label: &str) -> Self {
        Self::Date(DateField {
            name: name.to_string(),
            label: label.to_string(),
            required: false,
            past_only: false,
        })
    }

    pub fn checkbox(name: &str, label: &str) -> Self {
        Self::Checkbox(CheckboxField {
            name: name.to_string(),
            label: label.to_string(),
            required: false,
        })
    }

    pub fn list(
        name: &str,
        label: &str,
        item_fields: Vec<FieldConfig>,
        min_items: usize,
        max_items: usize,
    ) -> Self {
        Self::RepeatableList(ListField {
            name: name.to_string(),
            label: label.to_string(),
            item_fields,
            min_items,
            max_items,
        })
    }

    /// Mark the field as required. Lists express this through `min_items`.
    pub fn required(mut self) -> Self {
        match &mut self {
            Self::Text(f) => f.required = true,
            Self::Select(f) => f.required = true,
            Self::Date(f) => f.required = true,
            Self::Checkbox(f) => f.required = true,
            Self::RepeatableList(_) => {}
        }
        self
    }

    /// Enforce a text format. No effect on non-text fields.
    pub fn format(mut self, format: TextFormat) -> Self {
        if let Self::Text(f) = &mut self {
            f.format = Some(format);
        }
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        if let Self::Text(f) = &mut self {
            f.max_len = Some(max_len);
        }
        self
    }

    pub fn past_only(mut self) -> Self {
        if let Self::Date(f) = &mut self {
            f.past_only = true;
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Text(f) => &f.name,
            Self::Select(f) => &f.name,
            Self::Date(f) => &f.name,
            Self::Checkbox(f) => &f.name,
            Self::RepeatableList(f) => &f.name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Text(f) => &f.label,
            Self::Select(f) => &f.label,
            Self::Date(f) => &f.label,
            Self::Checkbox(f) => &f.label,
            Self::RepeatableList(f) => &f.label,
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            Self::Text(f) => f.required,
            Self::Select(f) => f.required,
            Self::Date(f) => f.required,
            Self::Checkbox(f) => f.required,
            Self::RepeatableList(f) => f.min_items > 0,
        }
    }

    /// Value a fresh or reset field starts with.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Text(_) | Self::Select(_) | Self::Date(_) => Value::String(String::new()),
            Self::Checkbox(_) => Value::Bool(false),
            Self::RepeatableList(list) => {
                Value::Array(vec![list.item_template(); list.min_items])
            }
        }
    }

    /// Validate `raw` and return the cleaned value.
    ///
    /// Errors are keyed by this field's name, or `name[i].item` for list items.
    pub fn validate(&self, raw: Option<&Value>) -> Result<Value, FieldErrors> {
        let single = |message: &str| {
            let mut errors = FieldErrors::default();
            errors.insert(self.name(), message);
            errors
        };
        match self {
            Self::Text(f) => validate_text(f, raw).map_err(single),
            Self::Select(f) => validate_select(f, raw).map_err(single),
            Self::Date(f) => validate_date(f, raw).map_err(single),
            Self::Checkbox(f) => validate_checkbox(f, raw).map_err(single),
            Self::RepeatableList(f) => validate_list(f, raw),
        }
    }
}

fn as_text(raw: Option<&Value>) -> Result<String, &'static str> {
    match raw {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err("Expected text"),
    }
}

fn validate_text(field: &TextField, raw: Option<&Value>) -> Result<Value, &'static str> {
    let text = as_text(raw)?;
    if text.is_empty() {
        return if field.required {
            Err(REQUIRED)
        } else {
            Ok(Value::String(text))
        };
    }
    if field.max_len.is_some_and(|max| text.chars().count() > max) {
        return Err("Value is too long");
    }
    let text = match field.format {
        Some(format) => {
            let normalized = format.normalize(&text);
            format.check(&normalized)?;
            normalized
        }
        None => text,
    };
    Ok(Value::String(text))
}

fn validate_select(field: &SelectField, raw: Option<&Value>) -> Result<Value, &'static str> {
    let choice = as_text(raw)?;
    if choice.is_empty() {
        return if field.required {
            Err(REQUIRED)
        } else {
            Ok(Value::String(choice))
        };
    }
    if field.options.iter().any(|o| o.value == choice) {
        Ok(Value::String(choice))
    } else {
        Err("Select a valid option")
    }
}

fn validate_date(field: &DateField, raw: Option<&Value>) -> Result<Value, &'static str> {
    let text = as_text(raw)?;
    if text.is_empty() {
        return if field.required {
            Err(REQUIRED)
        } else {
            Ok(Value::String(text))
        };
    }
    let date =
        NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|_| "Enter a date as YYYY-MM-DD")?;
    if field.past_only && date > Utc::now().date_naive() {
        return Err("Date cannot be in the future");
    }
    Ok(Value::String(date.format("%Y-%m-%d").to_string()))
}

fn validate_checkbox(field: &CheckboxField, raw: Option<&Value>) -> Result<Value, &'static str> {
    let checked = match raw {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => return Err("Expected true or false"),
    };
    if field.required && !checked {
        return Err("This box must be checked");
    }
    Ok(Value::Bool(checked))
}

fn validate_list(field: &ListField, raw: Option<&Value>) -> Result<Value, FieldErrors> {
    let mut errors = FieldErrors::default();
    let items: &[Value] = match raw {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.insert(&field.name, "Expected a list");
            return Err(errors);
        }
    };

    if items.len() < field.min_items {
        errors.insert(
            &field.name,
            format!("At least {} item(s) are required", field.min_items),
        );
    } else if items.len() > field.max_items {
        errors.insert(
            &field.name,
            format!("At most {} items are allowed", field.max_items),
        );
    }

    let empty = FormValues::new();
    let mut cleaned = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item = item.as_object().unwrap_or(&empty);
        let mut out = FormValues::new();
        for sub in &field.item_fields {
            match sub.validate(item.get(sub.name())) {
                Ok(value) => {
                    out.insert(sub.name().to_string(), value);
                }
                Err(e) => errors.extend_prefixed(&format!("{}[{index}]", field.name), e),
            }
        }
        cleaned.push(Value::Object(out));
    }

    if errors.is_empty() {
        Ok(Value::Array(cleaned))
    } else {
        Err(errors)
    }
}

/// Serializable description of one input, ready for a client to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedField {
    pub name: String,
    pub label: String,
    pub widget: &'static str,
    pub required: bool,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<TextFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Vec<RenderedField>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

/// Render `field` with its current value taken from `values`.
pub fn render(field: &FieldConfig, values: &FormValues) -> RenderedField {
    let value = values
        .get(field.name())
        .cloned()
        .unwrap_or_else(|| field.default_value());
    let mut rendered = RenderedField {
        name: field.name().to_string(),
        label: field.label().to_string(),
        widget: "",
        required: field.is_required(),
        value,
        format: None,
        options: None,
        items: None,
        min_items: None,
        max_items: None,
    };
    match field {
        FieldConfig::Text(f) => {
            rendered.widget = "text";
            rendered.format = f.format;
        }
        FieldConfig::Select(f) => {
            rendered.widget = "select";
            rendered.options = Some(f.options.clone());
        }
        FieldConfig::Date(_) => rendered.widget = "date",
        FieldConfig::Checkbox(_) => rendered.widget = "checkbox",
        FieldConfig::RepeatableList(f) => {
            rendered.widget = "repeatable_list";
            let empty = FormValues::new();
            let items = rendered
                .value
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .map(|item| {
                            let item = item.as_object().unwrap_or(&empty);
                            f.item_fields.iter().map(|sub| render(sub, item)).collect()
                        })
                        .collect()
                })
                .unwrap_or_default();
            rendered.items = Some(items);
            rendered.min_items = Some(f.min_items);
            rendered.max_items = Some(f.max_items);
        }
    }
    rendered
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn phones() -> FieldConfig {
        FieldConfig::list(
            "phones",
            "Phone numbers",
            vec![FieldConfig::text("number", "Number")
                .required()
                .format(TextFormat::Phone)],
            1,
            3,
        )
    }

    #[test]
    fn required_text_rejects_blank() {
        let field = FieldConfig::text("first_name", "First name").required();
        let errors = field.validate(Some(&json!("   "))).unwrap_err();
        assert_eq!(errors.get("first_name"), Some(REQUIRED));
    }

    #[test]
    fn optional_text_accepts_missing() {
        let field = FieldConfig::text("second_last_name", "Second last name");
        assert_eq!(field.validate(None).unwrap(), json!(""));
    }

    #[test]
    fn text_format_normalizes() {
        let field = FieldConfig::text("rfc", "RFC").required().format(TextFormat::Rfc);
        assert_eq!(
            field.validate(Some(&json!("gode561231gr8"))).unwrap(),
            json!("GODE561231GR8")
        );
    }

    #[test]
    fn text_max_len() {
        let field = FieldConfig::text("alias", "Alias").max_len(3);
        assert!(field.validate(Some(&json!("abcd"))).is_err());
        assert!(field.validate(Some(&json!("abc"))).is_ok());
    }

    #[test]
    fn select_rejects_unknown_option() {
        let field = FieldConfig::select(
            "status",
            "Status",
            SelectOption::from_catalog(&[("ACTIVE", "Active"), ("CANCELED", "Canceled")]),
        )
        .required();
        assert!(field.validate(Some(&json!("ACTIVE"))).is_ok());
        let errors = field.validate(Some(&json!("FROZEN"))).unwrap_err();
        assert_eq!(errors.get("status"), Some("Select a valid option"));
    }

    #[test]
    fn date_parsing_and_future_check() {
        let field = FieldConfig::date("birth_date", "Birth date").required().past_only();
        assert_eq!(
            field.validate(Some(&json!("1990-05-17"))).unwrap(),
            json!("1990-05-17")
        );
        assert!(field.validate(Some(&json!("17/05/1990"))).is_err());
        let future = (Utc::now().date_naive() + chrono::Days::new(30))
            .format("%Y-%m-%d")
            .to_string();
        let errors = field.validate(Some(&json!(future))).unwrap_err();
        assert_eq!(errors.get("birth_date"), Some("Date cannot be in the future"));
    }

    #[test]
    fn required_checkbox_must_be_ticked() {
        let field = FieldConfig::checkbox("accepts_terms", "I accept").required();
        assert!(field.validate(Some(&json!(false))).is_err());
        assert!(field.validate(None).is_err());
        assert_eq!(field.validate(Some(&json!(true))).unwrap(), json!(true));
        assert!(field.validate(Some(&json!("yes"))).is_err());
    }

    #[test]
    fn list_validates_count_and_items() {
        let field = phones();
        let errors = field.validate(Some(&json!([]))).unwrap_err();
        assert_eq!(errors.get("phones"), Some("At least 1 item(s) are required"));

        let errors = field
            .validate(Some(&json!([{"number": "5512345678"}, {"number": "12"}])))
            .unwrap_err();
        assert_eq!(
            errors.get("phones[1].number"),
            Some("Enter a 10-digit phone number")
        );
        assert!(!errors.contains("phones[0].number"));

        let cleaned = field
            .validate(Some(&json!([{"number": "55 1234 5678", "extra": 1}])))
            .unwrap();
        assert_eq!(cleaned, json!([{"number": "5512345678"}]));
    }

    #[test]
    fn list_default_has_min_items() {
        assert_eq!(phones().default_value(), json!([{"number": ""}]));
    }

    #[test]
    fn render_dispatches_on_variant() {
        let values = json!({"phones": [{"number": "5512345678"}]});
        let rendered = render(&phones(), values.as_object().unwrap());
        assert_eq!(rendered.widget, "repeatable_list");
        assert_eq!(rendered.max_items, Some(3));
        let items = rendered.items.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0][0].widget, "text");
        assert_eq!(items[0][0].value, json!("5512345678"));
        assert_eq!(items[0][0].format, Some(TextFormat::Phone));
    }

    #[test]
    fn field_config_serde_is_tagged() {
        let field = FieldConfig::checkbox("is_pep", "Politically exposed person");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "checkbox");
        let parsed: FieldConfig = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, field);
    }
}
