//! Step registry: the ordered steps each form type walks through.

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

/// 1-based step identifier.
pub type StepId = u32;

/// Legal-entity type selected before the wizard starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    Individual,
    CorporateEntity,
    Trust,
    SimplifiedRegime,
}

impl FormType {
    pub const ALL: [FormType; 4] = [
        FormType::Individual,
        FormType::CorporateEntity,
        FormType::Trust,
        FormType::SimplifiedRegime,
    ];

    /// Step kinds, in order, for this form type.
    pub fn step_kinds(&self) -> &'static [StepKind] {
        use StepKind::*;
        match self {
            Self::Individual => &[GeneralData, TaxData, Address, EconomicActivity, AccountUsage],
            Self::CorporateEntity => &[
                GeneralData,
                TaxData,
                Address,
                EconomicActivity,
                RelatedParties,
                BeneficialOwnership,
                AccountUsage,
            ],
            Self::Trust => &[
                GeneralData,
                TaxData,
                Address,
                RelatedParties,
                BeneficialOwnership,
                AccountUsage,
            ],
            Self::SimplifiedRegime => &[GeneralData, Address, AccountUsage],
        }
    }

    /// Build the wizard definition for this form type.
    pub fn definition(&self) -> WizardDefinition {
        let steps = self
            .step_kinds()
            .iter()
            .zip(1..)
            .map(|(kind, id)| StepDescriptor::new(id, kind.label(), *kind))
            .collect();
        WizardDefinition { steps }
    }
}

impl std::fmt::Display for FormType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Individual => "individual",
            Self::CorporateEntity => "corporate_entity",
            Self::Trust => "trust",
            Self::SimplifiedRegime => "simplified_regime",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for FormType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(Self::Individual),
            "corporate_entity" => Ok(Self::CorporateEntity),
            "trust" => Ok(Self::Trust),
            "simplified_regime" => Ok(Self::SimplifiedRegime),
            other => Err(format!("Unknown form type: {other}")),
        }
    }
}

/// What a step collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    GeneralData,
    TaxData,
    Address,
    EconomicActivity,
    RelatedParties,
    BeneficialOwnership,
    AccountUsage,
}

impl StepKind {
    /// Human label shown in the step header.
    pub fn label(&self) -> &'static str {
        match self {
            Self::GeneralData => "General data",
            Self::TaxData => "Tax data",
            Self::Address => "Address",
            Self::EconomicActivity => "Economic activity",
            Self::RelatedParties => "Related parties",
            Self::BeneficialOwnership => "Beneficial ownership",
            Self::AccountUsage => "Account usage",
        }
    }
}

/// Identifies one step of a wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescriptor {
    pub id: StepId,
    pub label: String,
    pub kind: StepKind,
}

impl StepDescriptor {
    pub fn new(id: StepId, label: impl Into<String>, kind: StepKind) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
        }
    }
}

/// Ordered, immutable list of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardDefinition {
    steps: Vec<StepDescriptor>,
}

impl WizardDefinition {
    /// Build a definition from explicit steps.
    ///
    /// Steps must be non-empty with ids running 1, 2, .., N.
    pub fn new(steps: Vec<StepDescriptor>) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::EmptyDefinition);
        }
        for (expected, step) in (1..).zip(&steps) {
            if step.id != expected {
                return Err(WizardError::NonSequentialStep {
                    expected,
                    found: step.id,
                });
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn step_count(&self) -> StepId {
        self.steps.len() as StepId
    }

    /// Look up a step by its 1-based id.
    pub fn step(&self, id: StepId) -> Option<&StepDescriptor> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.steps.get(index)
    }
}
