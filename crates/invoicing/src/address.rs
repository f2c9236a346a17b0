use serde::{Deserialize, Serialize};

use invoicebook_core::ValueObject;

/// Country assumed when an address is built without one.
pub const DEFAULT_COUNTRY_CODE: &str = "PL";

/// Postal address of a company.
///
/// Missing fields decode as empty strings so the validators can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street_address: String,
    /// Format `XX-XXX`.
    pub postal_code: String,
    pub city: String,
    /// ISO-3166 alpha-2 code.
    pub country_code: String,
}

impl Address {
    pub fn new(
        street_address: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self::with_country(street_address, postal_code, city, DEFAULT_COUNTRY_CODE)
    }

    pub fn with_country(
        street_address: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            street_address: street_address.into(),
            postal_code: postal_code.into(),
            city: city.into(),
            country_code: country_code.into(),
        }
    }
}

impl ValueObject for Address {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_country_to_poland() {
        let address = Address::new("Baker Street 1/2", "12-345", "Warsaw");
        assert_eq!(address.country_code, "PL");
    }

    #[test]
    fn uses_camel_case_field_names() {
        let address = Address::with_country("Baker Street 1/2", "12-345", "London", "GB");
        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["streetAddress"], "Baker Street 1/2");
        assert_eq!(json["postalCode"], "12-345");
        assert_eq!(json["countryCode"], "GB");
    }

    #[test]
    fn missing_fields_decode_as_empty() {
        let address: Address = serde_json::from_str(r#"{"city":"Gdansk"}"#).unwrap();
        assert_eq!(address.city, "Gdansk");
        assert!(address.street_address.is_empty());
        assert!(address.country_code.is_empty());
    }
}
