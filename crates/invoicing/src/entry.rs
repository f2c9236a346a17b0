use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use invoicebook_core::{DomainError, ValueObject};

/// VAT rate applied to an invoice entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vat {
    #[serde(rename = "VAT_0")]
    Vat0,
    #[serde(rename = "VAT_5")]
    Vat5,
    #[serde(rename = "VAT_8")]
    Vat8,
    #[serde(rename = "VAT_23")]
    Vat23,
}

impl Vat {
    pub const ALL: [Vat; 4] = [Vat::Vat0, Vat::Vat5, Vat::Vat8, Vat::Vat23];

    /// Rate as a fraction (`0.23` for 23 %).
    pub fn rate(self) -> Decimal {
        match self {
            Vat::Vat0 => Decimal::ZERO,
            Vat::Vat5 => Decimal::new(5, 2),
            Vat::Vat8 => Decimal::new(8, 2),
            Vat::Vat23 => Decimal::new(23, 2),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Vat::Vat0 => "VAT_0",
            Vat::Vat5 => "VAT_5",
            Vat::Vat8 => "VAT_8",
            Vat::Vat23 => "VAT_23",
        }
    }
}

impl core::fmt::Display for Vat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Vat::ALL
            .into_iter()
            .find(|vat| vat.as_str() == s)
            .ok_or_else(|| DomainError::validation(vec![format!("unknown VAT rate `{s}`")]))
    }
}

/// One line of an invoice.
///
/// `vat_value` is derived (`rate × value`) on construction and on decode; any
/// `vatValue` present in incoming JSON is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "EntryFields")]
pub struct InvoiceEntry {
    description: String,
    quantity: i32,
    value: Decimal,
    vat_rate: Vat,
    vat_value: Decimal,
}

impl InvoiceEntry {
    pub fn new(description: impl Into<String>, quantity: i32, value: Decimal, vat_rate: Vat) -> Self {
        Self {
            description: description.into(),
            quantity,
            value,
            vat_rate,
            vat_value: vat_rate.rate() * value,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    /// Unit value (net).
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn vat_rate(&self) -> Vat {
        self.vat_rate
    }

    pub fn vat_value(&self) -> Decimal {
        self.vat_value
    }
}

impl ValueObject for InvoiceEntry {}

/// Decode target for [`InvoiceEntry`]; the VAT value is recomputed from these.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryFields {
    #[serde(default)]
    description: String,
    #[serde(default)]
    quantity: i32,
    #[serde(default)]
    value: Decimal,
    vat_rate: Vat,
}

impl From<EntryFields> for InvoiceEntry {
    fn from(fields: EntryFields) -> Self {
        InvoiceEntry::new(fields.description, fields.quantity, fields.value, fields.vat_rate)
    }
}
