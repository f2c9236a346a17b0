//! Value object trait: equality by value, not identity.
//!
//! Addresses, companies and invoice entries have **no identity**: two of them
//! with the same attribute values are the same thing. Only an invoice carries
//! an identifier, and that one is handed out by storage.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one with the new values.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Address {
///     street_address: String,
///     postal_code: String,
/// }
///
/// impl ValueObject for Address {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
