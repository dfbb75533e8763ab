//! Text formats and value rules used by field validation.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Individuals have four letters, entities three.
static RFC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-ZÑ&]{3,4}[0-9]{6}[A-Z0-9]{3}$").expect("valid RFC regex"));

static CURP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{4}[0-9]{6}[HM][A-Z]{5}[A-Z0-9][0-9]$").expect("valid CURP regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}$").expect("valid postal code regex"));

/// Weights applied cyclically to the first 17 CLABE digits.
const CLABE_WEIGHTS: [u32; 3] = [3, 7, 1];

/// Structured text formats a text field may enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    Email,
    Rfc,
    Curp,
    Phone,
    PostalCode,
    /// 18-digit interbank account number with check digit.
    Clabe,
    /// Positive decimal amount.
    Amount,
    /// Decimal in (0, 100].
    Percentage,
}

impl TextFormat {
    /// Canonical form stored in the payload.
    pub fn normalize(&self, input: &str) -> String {
        let trimmed = input.trim();
        match self {
            Self::Rfc | Self::Curp => trimmed.to_uppercase(),
            Self::Email => trimmed.to_lowercase(),
            Self::Phone | Self::Clabe => trimmed.chars().filter(|c| !c.is_whitespace()).collect(),
            Self::PostalCode | Self::Amount | Self::Percentage => trimmed.to_string(),
        }
    }

    /// Check an already normalized value.
    pub fn check(&self, value: &str) -> Result<(), &'static str> {
        let ok = match self {
            Self::Email => EMAIL_RE.is_match(value),
            Self::Rfc => RFC_RE.is_match(value),
            Self::Curp => CURP_RE.is_match(value),
            Self::Phone => PHONE_RE.is_match(value),
            Self::PostalCode => POSTAL_CODE_RE.is_match(value),
            Self::Clabe => is_valid_clabe(value),
            Self::Amount => parse_decimal(value).is_some_and(|d| d > Decimal::ZERO),
            Self::Percentage => parse_decimal(value)
                .is_some_and(|d| d > Decimal::ZERO && d <= Decimal::ONE_HUNDRED),
        };
        if ok { Ok(()) } else { Err(self.message()) }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::Email => "Enter a valid email address",
            Self::Rfc => "Enter a valid RFC",
            Self::Curp => "Enter a valid CURP",
            Self::Phone => "Enter a 10-digit phone number",
            Self::PostalCode => "Enter a 5-digit postal code",
            Self::Clabe => "Enter a valid 18-digit CLABE",
            Self::Amount => "Enter an amount greater than zero",
            Self::Percentage => "Enter a percentage between 0 and 100",
        }
    }
}

/// Parse a decimal, tolerating thousands separators.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let cleaned: String = value.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(cleaned.trim()).ok()
}

fn is_valid_clabe(value: &str) -> bool {
    if value.len() != 18 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u32> = value.bytes().map(|b| u32::from(b - b'0')).collect();
    let sum: u32 = digits[..17]
        .iter()
        .zip(CLABE_WEIGHTS.iter().cycle())
        .map(|(d, w)| (d * w) % 10)
        .sum();
    (10 - sum % 10) % 10 == digits[17]
}

/// Checks that span several fields of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CrossFieldCheck {
    /// Sum of `field` over the items of `list` must not exceed `max`.
    PercentageTotal {
        list: String,
        field: String,
        max: Decimal,
    },
}

impl CrossFieldCheck {
    /// Returns the offending path and message when the check fails.
    pub fn evaluate(&self, values: &super::FormValues) -> Option<(String, String)> {
        match self {
            Self::PercentageTotal { list, field, max } => {
                let items = values.get(list)?.as_array()?;
                let total: Decimal = items
                    .iter()
                    .filter_map(|item| item.get(field)?.as_str())
                    .filter_map(parse_decimal)
                    .sum();
                (total > *max).then(|| {
                    (
                        list.clone(),
                        format!("Total {field} is {total}, it cannot exceed {max}"),
                    )
                })
            }
        }
    }
}
