use crate::catalog::{ACCOUNT_PURPOSES, ACCOUNT_STATUSES, BANKS, MONTHLY_OPERATIONS};
use crate::form::{Condition, ConditionalSection, FieldConfig, StepSchema, TextFormat};
use crate::wizard::{FormType, StepKind};

use super::options;

pub(super) fn schema(form_type: FormType) -> StepSchema {
    // Simplified-regime accounts are limited to a single linked account.
    let max_accounts = if form_type == FormType::SimplifiedRegime { 1 } else { 3 };

    StepSchema::new(
        StepKind::AccountUsage,
        vec![
            FieldConfig::select("account_purpose", "Account purpose", options(ACCOUNT_PURPOSES))
                .required(),
            FieldConfig::select(
                "monthly_operations",
                "Expected operations per month",
                options(MONTHLY_OPERATIONS),
            )
            .required(),
            FieldConfig::text("expected_monthly_amount", "Expected monthly amount (MXN)")
                .required()
                .format(TextFormat::Amount),
            FieldConfig::text("funds_origin", "Origin of funds").required().max_len(200),
            FieldConfig::list(
                "bank_accounts",
                "Bank accounts",
                vec![
                    FieldConfig::select("bank", "Bank", options(BANKS)).required(),
                    FieldConfig::text("clabe", "CLABE").required().format(TextFormat::Clabe),
                    FieldConfig::text("holder_name", "Account holder").required(),
                ],
                1,
                max_accounts,
            ),
            FieldConfig::select(
                "previous_account_status",
                "Previous account with us",
                options(ACCOUNT_STATUSES),
            )
            .required(),
        ],
    )
    .with_section(ConditionalSection::new(
        "termination",
        Condition::equals("previous_account_status", "CANCELED"),
        vec![
            FieldConfig::date("termination_date", "Termination date")
                .required()
                .past_only(),
            FieldConfig::text("termination_reason", "Reason for termination").max_len(200),
        ],
    ))
}
