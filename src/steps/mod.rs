//! Concrete step schemas for each legal-entity type.

mod activity;
mod address;
mod general;
mod parties;
mod tax;
mod usage;

use crate::form::{FieldConfig, SelectOption, StepSchema};
use crate::wizard::{FormType, StepKind};

/// Schema of `kind` as asked of a `form_type` applicant.
pub fn schema_for(kind: StepKind, form_type: FormType) -> StepSchema {
    match kind {
        StepKind::GeneralData => general::schema(form_type),
        StepKind::TaxData => tax::schema(form_type),
        StepKind::Address => address::schema(),
        StepKind::EconomicActivity => activity::schema(form_type),
        StepKind::RelatedParties => parties::related_parties(form_type),
        StepKind::BeneficialOwnership => parties::beneficial_ownership(),
        StepKind::AccountUsage => usage::schema(form_type),
    }
}

fn options(catalog: &[(&str, &str)]) -> Vec<SelectOption> {
    SelectOption::from_catalog(catalog)
}

/// Phone list shared by the general-data variants.
fn phones() -> FieldConfig {
    use crate::catalog::PHONE_TYPES;
    use crate::form::TextFormat;

    FieldConfig::list(
        "phones",
        "Phone numbers",
        vec![
            FieldConfig::select("phone_type", "Type", options(PHONE_TYPES)).required(),
            FieldConfig::text("number", "Number")
                .required()
                .format(TextFormat::Phone),
        ],
        1,
        3,
    )
}
