use rust_decimal::Decimal;

use crate::entry::InvoiceEntry;

use super::{is_blank, Validator};

/// Checks description, quantity and net value of a single invoice line.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceEntryValidator;

impl Validator<InvoiceEntry> for InvoiceEntryValidator {
    fn validate(&self, entry: &InvoiceEntry) -> Vec<String> {
        let mut result = Vec::new();

        if is_blank(entry.description()) {
            tracing::warn!("parameter description cannot be null or empty");
            result.push("Invoice entry description must not be null or empty".to_string());
        }

        if entry.quantity() <= 0 {
            tracing::warn!(quantity = entry.quantity(), "parameter quantity must be positive");
            result.push("Quantity must be positive value".to_string());
        }

        if entry.value() < Decimal::ZERO {
            tracing::warn!(value = %entry.value(), "parameter value cannot be negative");
            result.push("Invoice entry value must not be negative number".to_string());
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Vat;
    use proptest::prelude::*;

    #[test]
    fn valid_entry_has_no_violations() {
        let entry = InvoiceEntry::new("Tire", 4, Decimal::new(12523, 2), Vat::Vat23);
        assert!(InvoiceEntryValidator.validate(&entry).is_empty());
    }

    #[test]
    fn zero_value_is_allowed() {
        let entry = InvoiceEntry::new("Gift", 1, Decimal::ZERO, Vat::Vat0);
        assert!(InvoiceEntryValidator.validate(&entry).is_empty());
    }

    #[test]
    fn reports_all_violations_in_order() {
        let entry = InvoiceEntry::new("", 0, Decimal::new(-1, 0), Vat::Vat8);
        assert_eq!(
            InvoiceEntryValidator.validate(&entry),
            vec![
                "Invoice entry description must not be null or empty",
                "Quantity must be positive value",
                "Invoice entry value must not be negative number",
            ]
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, ..ProptestConfig::default() })]

        #[test]
        fn non_positive_quantity_is_rejected(quantity in i32::MIN..=0) {
            let entry = InvoiceEntry::new("Oil", quantity, Decimal::ONE, Vat::Vat5);
            prop_assert_eq!(
                InvoiceEntryValidator.validate(&entry),
                vec!["Quantity must be positive value".to_string()]
            );
        }

        #[test]
        fn positive_quantity_and_value_pass(quantity in 1..=10_000i32, cents in 0..=10_000_000i64) {
            let entry = InvoiceEntry::new("Oil", quantity, Decimal::new(cents, 2), Vat::Vat23);
            prop_assert!(InvoiceEntryValidator.validate(&entry).is_empty());
        }
    }
}
