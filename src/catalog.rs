//! Static reference lists used as select options.
//!
//! Values are the identifiers stored in payloads; labels are display text.

pub const COUNTRIES: &[(&str, &str)] = &[
    ("MX", "Mexico"),
    ("US", "United States"),
    ("CA", "Canada"),
    ("ES", "Spain"),
    ("CO", "Colombia"),
    ("AR", "Argentina"),
    ("BR", "Brazil"),
    ("CL", "Chile"),
];

pub const GENDERS: &[(&str, &str)] = &[("F", "Female"), ("M", "Male"), ("X", "Not specified")];

pub const PHONE_TYPES: &[(&str, &str)] = &[
    ("MOBILE", "Mobile"),
    ("HOME", "Home"),
    ("OFFICE", "Office"),
];

/// SAT fiscal regimes.
pub const FISCAL_REGIMES: &[(&str, &str)] = &[
    ("601", "General de Ley Personas Morales"),
    ("603", "Personas Morales con Fines no Lucrativos"),
    ("605", "Sueldos y Salarios"),
    ("606", "Arrendamiento"),
    ("612", "Actividades Empresariales y Profesionales"),
    ("616", "Sin obligaciones fiscales"),
    ("621", "Incorporación Fiscal"),
    ("626", "Régimen Simplificado de Confianza"),
];

pub const ECONOMIC_SECTORS: &[(&str, &str)] = &[
    ("AGRICULTURE", "Agriculture"),
    ("MANUFACTURING", "Manufacturing"),
    ("CONSTRUCTION", "Construction"),
    ("COMMERCE", "Commerce"),
    ("FINANCIAL_SERVICES", "Financial services"),
    ("REAL_ESTATE", "Real estate"),
    ("PROFESSIONAL_SERVICES", "Professional services"),
    ("GOVERNMENT", "Government"),
];

pub const ACCOUNT_PURPOSES: &[(&str, &str)] = &[
    ("SAVINGS", "Savings"),
    ("PAYROLL", "Payroll"),
    ("INVESTMENT", "Investment"),
    ("SUPPLIER_PAYMENTS", "Supplier payments"),
    ("COLLECTIONS", "Collections"),
];

pub const MONTHLY_OPERATIONS: &[(&str, &str)] = &[
    ("1_10", "1 to 10"),
    ("11_50", "11 to 50"),
    ("51_100", "51 to 100"),
    ("100_PLUS", "More than 100"),
];

pub const ACCOUNT_STATUSES: &[(&str, &str)] = &[
    ("NONE", "No previous account"),
    ("ACTIVE", "Active"),
    ("CANCELED", "Canceled"),
];

pub const BANKS: &[(&str, &str)] = &[
    ("002", "Banamex"),
    ("012", "BBVA México"),
    ("014", "Santander"),
    ("021", "HSBC"),
    ("032", "IXE"),
    ("072", "Banorte"),
    ("137", "BanCoppel"),
];

pub const COMMITTEE_ROLES: &[(&str, &str)] = &[
    ("CHAIR", "Chair"),
    ("SECRETARY", "Secretary"),
    ("MEMBER", "Member"),
];

pub const RELATED_PARTY_ROLES: &[(&str, &str)] = &[
    ("SHAREHOLDER", "Shareholder"),
    ("LEGAL_REPRESENTATIVE", "Legal representative"),
    ("SETTLOR", "Settlor"),
    ("TRUSTEE", "Trustee"),
    ("BENEFICIARY", "Beneficiary"),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalog_values_are_unique() {
        let catalogs = [
            COUNTRIES,
            GENDERS,
            PHONE_TYPES,
            FISCAL_REGIMES,
            ECONOMIC_SECTORS,
            ACCOUNT_PURPOSES,
            MONTHLY_OPERATIONS,
            ACCOUNT_STATUSES,
            BANKS,
            COMMITTEE_ROLES,
            RELATED_PARTY_ROLES,
        ];
        for catalog in catalogs {
            let values: HashSet<&str> = catalog.iter().map(|(v, _)| *v).collect();
            assert_eq!(values.len(), catalog.len());
        }
    }
}
