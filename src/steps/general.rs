use crate::catalog::{COUNTRIES, GENDERS};
use crate::form::{FieldConfig, StepSchema, TextFormat};
use crate::wizard::{FormType, StepKind};

use super::{options, phones};

pub(super) fn schema(form_type: FormType) -> StepSchema {
    let fields = match form_type {
        FormType::Individual | FormType::SimplifiedRegime => {
            let mut fields = vec![
                FieldConfig::text("first_name", "First name").required().max_len(60),
                FieldConfig::text("last_name", "Last name").required().max_len(60),
                FieldConfig::text("second_last_name", "Second last name").max_len(60),
                FieldConfig::date("birth_date", "Birth date").required().past_only(),
                FieldConfig::select("gender", "Gender", options(GENDERS)).required(),
                FieldConfig::select("nationality", "Nationality", options(COUNTRIES)).required(),
            ];
            if form_type == FormType::SimplifiedRegime {
                fields.push(
                    FieldConfig::text("curp", "CURP")
                        .required()
                        .format(TextFormat::Curp),
                );
            }
            fields
        }
        FormType::CorporateEntity => vec![
            FieldConfig::text("business_name", "Business name").required().max_len(120),
            FieldConfig::date("incorporation_date", "Incorporation date")
                .required()
                .past_only(),
            FieldConfig::select("nationality", "Nationality", options(COUNTRIES)).required(),
            FieldConfig::text("deed_number", "Incorporation deed number").required(),
        ],
        FormType::Trust => vec![
            FieldConfig::text("trust_name", "Trust name").required().max_len(120),
            FieldConfig::text("trust_number", "Trust number").required(),
            FieldConfig::date("constitution_date", "Constitution date")
                .required()
                .past_only(),
            FieldConfig::text("trustee_institution", "Trustee institution").required(),
        ],
    };

    let mut schema = StepSchema::new(StepKind::GeneralData, fields);
    schema.fields.push(
        FieldConfig::text("email", "Email")
            .required()
            .format(TextFormat::Email),
    );
    schema.fields.push(phones());
    schema
}
