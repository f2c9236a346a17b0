use serde::{Deserialize, Serialize};

use invoicebook_core::ValueObject;

use crate::address::Address;

/// Seller or buyer on an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub name: String,
    /// NIP, format `XXX-XXX-XX-XX`.
    pub tax_identification_number: String,
    pub address: Address,
}

impl Company {
    pub fn new(
        name: impl Into<String>,
        tax_identification_number: impl Into<String>,
        address: Address,
    ) -> Self {
        Self {
            name: name.into(),
            tax_identification_number: tax_identification_number.into(),
            address,
        }
    }
}

impl ValueObject for Company {}
