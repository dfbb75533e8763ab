use crate::catalog::{COUNTRIES, FISCAL_REGIMES};
use crate::form::{Condition, ConditionalSection, FieldConfig, StepSchema, TextFormat};
use crate::wizard::{FormType, StepKind};

use super::options;

pub(super) fn schema(form_type: FormType) -> StepSchema {
    let mut fields = vec![
        FieldConfig::text("rfc", "RFC").required().format(TextFormat::Rfc),
        FieldConfig::select("fiscal_regime", "Fiscal regime", options(FISCAL_REGIMES)).required(),
    ];
    if matches!(form_type, FormType::Individual | FormType::SimplifiedRegime) {
        fields.push(
            FieldConfig::text("curp", "CURP")
                .required()
                .format(TextFormat::Curp),
        );
    }
    fields.push(
        FieldConfig::select("tax_residence", "Country of tax residence", options(COUNTRIES))
            .required(),
    );
    fields.push(FieldConfig::checkbox(
        "has_foreign_tax_id",
        "I have a tax id in another country",
    ));

    StepSchema::new(StepKind::TaxData, fields).with_section(ConditionalSection::new(
        "foreign_tax",
        Condition::checked("has_foreign_tax_id"),
        vec![
            FieldConfig::text("foreign_tax_id", "Foreign tax id").required().max_len(40),
            FieldConfig::select("foreign_tax_country", "Issuing country", options(COUNTRIES))
                .required(),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn foreign_tax_id_only_when_checked() {
        let schema = schema(FormType::CorporateEntity);
        let mut values = json!({
            "rfc": "ABC010101AB1",
            "fiscal_regime": "601",
            "tax_residence": "MX",
            "has_foreign_tax_id": false
        })
        .as_object()
        .cloned()
        .unwrap();
        let payload = schema.validate(&values).unwrap();
        assert!(payload.get("foreign_tax_id").is_none());

        values.insert("has_foreign_tax_id".into(), json!(true));
        let errors = schema.validate(&values).unwrap_err();
        assert!(errors.contains("foreign_tax_id"));
        assert!(errors.contains("foreign_tax_country"));
    }

    #[test]
    fn entities_are_not_asked_for_curp() {
        assert!(schema(FormType::CorporateEntity).field("curp").is_none());
        assert!(schema(FormType::Individual).field("curp").is_some());
    }
}
