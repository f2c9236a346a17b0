//! Field validators.
//!
//! Each validator is a pure function from a value to a list of human-readable
//! violations; an empty list means the value is valid. Violations are also
//! logged at `warn`.

mod address;
mod company;
mod country;
mod entry;
mod invoice;

pub use address::AddressValidator;
pub use company::CompanyValidator;
pub use country::{is_iso_country, ISO_COUNTRIES};
pub use entry::InvoiceEntryValidator;
pub use invoice::InvoiceValidator;

/// Validates values of type `T`.
pub trait Validator<T: ?Sized> {
    /// Returns every violation found; empty means valid.
    fn validate(&self, value: &T) -> Vec<String>;
}

/// Blank strings count as missing.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// `true` when `value` is groups of ASCII digits of the given lengths joined by `-`.
///
/// `matches_digit_groups("12-345", &[2, 3])` holds; `"12345"` or `"1a-345"` do not.
pub(crate) fn matches_digit_groups(value: &str, groups: &[usize]) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    parts.len() == groups.len()
        && parts
            .iter()
            .zip(groups)
            .all(|(part, len)| part.len() == *len && part.bytes().all(|b| b.is_ascii_digit()))
}
