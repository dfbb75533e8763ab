//! Related parties and beneficial ownership.

use rust_decimal::Decimal;

use crate::catalog::{COMMITTEE_ROLES, COUNTRIES, RELATED_PARTY_ROLES};
use crate::form::{
    Condition, ConditionalSection, CrossFieldCheck, FieldConfig, StepSchema, TextFormat,
};
use crate::wizard::{FormType, StepKind};

use super::options;

pub(super) fn related_parties(form_type: FormType) -> StepSchema {
    match form_type {
        FormType::Trust => trust_parties(),
        _ => company_parties(),
    }
}

fn company_parties() -> StepSchema {
    StepSchema::new(
        StepKind::RelatedParties,
        vec![
            FieldConfig::list(
                "legal_representatives",
                "Legal representatives",
                vec![
                    FieldConfig::text("full_name", "Full name").required(),
                    FieldConfig::text("rfc", "RFC").required().format(TextFormat::Rfc),
                    FieldConfig::text("power_of_attorney", "Power of attorney deed").required(),
                ],
                1,
                5,
            ),
            FieldConfig::list(
                "shareholders",
                "Shareholders",
                vec![
                    FieldConfig::text("full_name", "Full name").required(),
                    FieldConfig::text("rfc", "RFC").required().format(TextFormat::Rfc),
                    FieldConfig::text("share_percentage", "Share (%)")
                        .required()
                        .format(TextFormat::Percentage),
                ],
                1,
                10,
            ),
        ],
    )
    .with_check(CrossFieldCheck::PercentageTotal {
        list: "shareholders".to_string(),
        field: "share_percentage".to_string(),
        max: Decimal::ONE_HUNDRED,
    })
}

/// Trust parties, plus the technical committee when the trust has one.
fn trust_parties() -> StepSchema {
    StepSchema::new(
        StepKind::RelatedParties,
        vec![
            FieldConfig::list(
                "parties",
                "Trust parties",
                vec![
                    FieldConfig::text("full_name", "Full name").required(),
                    FieldConfig::select("role", "Role", options(RELATED_PARTY_ROLES)).required(),
                    FieldConfig::text("rfc", "RFC").required().format(TextFormat::Rfc),
                ],
                2,
                10,
            ),
            FieldConfig::checkbox("has_technical_committee", "The trust has a technical committee"),
        ],
    )
    .with_section(ConditionalSection::new(
        "technical_committee",
        Condition::checked("has_technical_committee"),
        vec![FieldConfig::list(
            "committee_members",
            "Committee members",
            vec![
                FieldConfig::text("full_name", "Full name").required(),
                FieldConfig::select("committee_role", "Committee role", options(COMMITTEE_ROLES))
                    .required(),
                FieldConfig::text("email", "Email").format(TextFormat::Email),
            ],
            1,
            10,
        )],
    ))
}

pub(super) fn beneficial_ownership() -> StepSchema {
    StepSchema::new(
        StepKind::BeneficialOwnership,
        vec![
            FieldConfig::list(
                "owners",
                "Beneficial owners",
                vec![
                    FieldConfig::text("full_name", "Full name").required(),
                    FieldConfig::date("birth_date", "Birth date").required().past_only(),
                    FieldConfig::select("nationality", "Nationality", options(COUNTRIES))
                        .required(),
                    FieldConfig::text("ownership_percentage", "Ownership (%)")
                        .required()
                        .format(TextFormat::Percentage),
                    FieldConfig::checkbox("is_pep", "Politically exposed person"),
                ],
                1,
                10,
            ),
            FieldConfig::checkbox(
                "declares_complete",
                "I declare these are all the beneficial owners",
            )
            .required(),
        ],
    )
    .with_check(CrossFieldCheck::PercentageTotal {
        list: "owners".to_string(),
        field: "ownership_percentage".to_string(),
        max: Decimal::ONE_HUNDRED,
    })
}
