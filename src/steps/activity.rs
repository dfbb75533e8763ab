use crate::catalog::ECONOMIC_SECTORS;
use crate::form::{Condition, ConditionalSection, FieldConfig, StepSchema, TextFormat};
use crate::wizard::{FormType, StepKind};

use super::options;

pub(super) fn schema(form_type: FormType) -> StepSchema {
    let mut fields = vec![
        FieldConfig::select("economic_sector", "Economic sector", options(ECONOMIC_SECTORS))
            .required(),
        FieldConfig::text("activity", "Main activity").required().max_len(200),
    ];
    if form_type == FormType::Individual {
        fields.push(FieldConfig::text("occupation", "Occupation").required());
        fields.push(FieldConfig::text("employer", "Employer"));
    }
    fields.push(FieldConfig::checkbox("is_pep", "Politically exposed person"));
    fields.push(FieldConfig::checkbox(
        "has_equity_links",
        "Holds equity in other companies",
    ));

    StepSchema::new(StepKind::EconomicActivity, fields)
        .with_section(ConditionalSection::new(
            "pep",
            Condition::checked("is_pep"),
            vec![
                FieldConfig::text("pep_position", "Public position held").required(),
                FieldConfig::date("pep_since", "Holding the position since")
                    .required()
                    .past_only(),
            ],
        ))
        .with_section(ConditionalSection::new(
            "linked_companies",
            Condition::checked("has_equity_links"),
            vec![FieldConfig::list(
                "linked_companies",
                "Linked companies",
                vec![
                    FieldConfig::text("business_name", "Business name").required(),
                    FieldConfig::text("rfc", "RFC").required().format(TextFormat::Rfc),
                    FieldConfig::text("share_percentage", "Share (%)")
                        .required()
                        .format(TextFormat::Percentage),
                ],
                1,
                5,
            )],
        ))
}
