//! Form layer: typed field configuration, validation rules, conditional
//! sections, repeatable lists, and the schema-driven step form.

pub mod field;
pub mod list;
pub mod rules;
pub mod schema;
pub mod values;
pub mod visibility;

pub use field::{FieldConfig, RenderedField, SelectOption, render};
pub use list::{ListNotice, RepeatableList};
pub use rules::{CrossFieldCheck, TextFormat};
pub use schema::{SchemaForm, StepSchema};
pub use values::{FieldErrors, FormValues};
pub use visibility::{Condition, ConditionalSection, SectionVisibility};
