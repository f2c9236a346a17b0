//! Invoicing domain module.
//!
//! This crate contains the invoice data model and its field validators,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod address;
pub mod company;
pub mod entry;
pub mod invoice;
pub mod validation;

pub use address::Address;
pub use company::Company;
pub use entry::{InvoiceEntry, Vat};
pub use invoice::{Invoice, InvoiceDraft};
pub use validation::{
    AddressValidator, CompanyValidator, InvoiceEntryValidator, InvoiceValidator, Validator,
};
