use crate::company::Company;

use super::{is_blank, matches_digit_groups, AddressValidator, Validator};

/// Checks the company name, the `XXX-XXX-XX-XX` tax id, then the address.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyValidator;

impl Validator<Company> for CompanyValidator {
    fn validate(&self, company: &Company) -> Vec<String> {
        let mut result = Vec::new();

        if is_blank(&company.name) {
            tracing::warn!("parameter name cannot be null or empty");
            result.push("Company name must not be null or empty".to_string());
        }

        if is_blank(&company.tax_identification_number) {
            tracing::warn!("parameter taxIdentificationNumber cannot be null or empty");
            result.push("Company tax ID must not be null or empty".to_string());
        } else if !matches_digit_groups(&company.tax_identification_number, &[3, 3, 2, 2]) {
            tracing::warn!(
                tax_id = %company.tax_identification_number,
                "parameter taxIdentificationNumber must be in the format XXX-XXX-XX-XX"
            );
            result.push("Company tax ID must be in the format XXX-XXX-XX-XX".to_string());
        }

        result.extend(AddressValidator.validate(&company.address));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;

    fn company(name: &str, tax_id: &str) -> Company {
        Company::new(name, tax_id, Address::new("Baker Street 1/2", "12-345", "Warsaw"))
    }

    #[test]
    fn valid_company_has_no_violations() {
        assert!(CompanyValidator.validate(&company("XYZ", "123-456-78-90")).is_empty());
    }

    #[test]
    fn rejects_empty_name_and_tax_id() {
        assert_eq!(
            CompanyValidator.validate(&company(" ", "")),
            vec![
                "Company name must not be null or empty",
                "Company tax ID must not be null or empty",
            ]
        );
    }

    #[test]
    fn rejects_malformed_tax_id() {
        for tax_id in ["1234567890", "123-456-789-0", "abc-def-gh-ij", "11111"] {
            assert_eq!(
                CompanyValidator.validate(&company("XYZ", tax_id)),
                vec!["Company tax ID must be in the format XXX-XXX-XX-XX"],
                "tax id {tax_id}"
            );
        }
    }

    #[test]
    fn includes_address_violations() {
        let mut c = company("XYZ", "123-456-78-90");
        c.address.postal_code = "1234".to_string();
        assert_eq!(
            CompanyValidator.validate(&c),
            vec!["Postal code must be in the format XX-XXX"]
        );
    }
}
