use crate::address::Address;

use super::{is_blank, is_iso_country, matches_digit_groups, Validator};

/// Checks street, city, ISO country code and the `XX-XXX` postal code.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressValidator;

impl Validator<Address> for AddressValidator {
    fn validate(&self, address: &Address) -> Vec<String> {
        let mut result = Vec::new();

        if is_blank(&address.city) {
            tracing::warn!("parameter city cannot be null or empty");
            result.push("City must not be null or empty".to_string());
        }

        if is_blank(&address.street_address) {
            tracing::warn!("parameter streetAddress cannot be null or empty");
            result.push("Street address must not be null or empty".to_string());
        }

        if is_blank(&address.country_code) {
            tracing::warn!("parameter countryCode cannot be null or empty");
            result.push("Country must not be null or empty".to_string());
        } else if !is_iso_country(&address.country_code) {
            tracing::warn!(country_code = %address.country_code, "parameter countryCode must be in the ISO format");
            result.push("Country must be in the ISO format".to_string());
        }

        if is_blank(&address.postal_code) {
            tracing::warn!("parameter postalCode cannot be null or empty");
            result.push("Postal code must not be null or empty".to_string());
        } else if !matches_digit_groups(&address.postal_code, &[2, 3]) {
            tracing::warn!(postal_code = %address.postal_code, "parameter postalCode must be in the format XX-XXX");
            result.push("Postal code must be in the format XX-XXX".to_string());
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_address_has_no_violations() {
        let address = Address::new("Baker Street 1/2", "12-345", "Warsaw");
        assert!(AddressValidator.validate(&address).is_empty());
    }

    #[test]
    fn empty_address_reports_every_field() {
        let violations = AddressValidator.validate(&Address::default());
        assert_eq!(
            violations,
            vec![
                "City must not be null or empty",
                "Street address must not be null or empty",
                "Country must not be null or empty",
                "Postal code must not be null or empty",
            ]
        );
    }

    #[test]
    fn rejects_malformed_postal_code() {
        for postal_code in ["12345", "1-2345", "AB-CDE", "12-34"] {
            let address = Address::new("Baker Street 1/2", postal_code, "Warsaw");
            assert_eq!(
                AddressValidator.validate(&address),
                vec!["Postal code must be in the format XX-XXX"],
                "postal code {postal_code}"
            );
        }
    }

    #[test]
    fn rejects_unknown_country_code() {
        let address = Address::with_country("Baker Street 1/2", "12-345", "London", "UK");
        assert_eq!(
            AddressValidator.validate(&address),
            vec!["Country must be in the ISO format"]
        );
    }
}
