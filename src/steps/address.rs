use crate::catalog::COUNTRIES;
use crate::form::{FieldConfig, StepSchema, TextFormat};
use crate::wizard::StepKind;

use super::options;

/// Same address shape for every entity type.
pub(super) fn schema() -> StepSchema {
    StepSchema::new(
        StepKind::Address,
        vec![
            FieldConfig::text("street", "Street").required().max_len(120),
            FieldConfig::text("exterior_number", "Exterior number").required().max_len(10),
            FieldConfig::text("interior_number", "Interior number").max_len(10),
            FieldConfig::text("neighborhood", "Neighborhood").required(),
            FieldConfig::text("postal_code", "Postal code")
                .required()
                .format(TextFormat::PostalCode),
            FieldConfig::text("city", "City").required(),
            FieldConfig::text("state", "State").required(),
            FieldConfig::select("country", "Country", options(COUNTRIES)).required(),
        ],
    )
}
