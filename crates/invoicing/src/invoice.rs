use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use invoicebook_core::{DomainError, DomainResult, InvoiceId};

use crate::company::Company;
use crate::entry::{InvoiceEntry, Vat};
use crate::validation::{InvoiceValidator, Validator};

/// An accepted invoice.
///
/// Every required part is present; the identifier is absent until storage
/// assigns one on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<InvoiceId>,
    invoice_number: String,
    date: NaiveDate,
    seller: Company,
    buyer: Company,
    #[serde(default)]
    invoice_entries: Vec<InvoiceEntry>,
}

impl Invoice {
    pub fn new(
        invoice_number: impl Into<String>,
        date: NaiveDate,
        seller: Company,
        buyer: Company,
    ) -> Self {
        Self {
            id: None,
            invoice_number: invoice_number.into(),
            date,
            seller,
            buyer,
            invoice_entries: Vec::new(),
        }
    }

    /// Builder-style entry append.
    pub fn with_entry(
        mut self,
        description: impl Into<String>,
        quantity: i32,
        value: Decimal,
        vat_rate: Vat,
    ) -> Self {
        self.add_entry(InvoiceEntry::new(description, quantity, value, vat_rate));
        self
    }

    pub fn add_entry(&mut self, entry: InvoiceEntry) {
        self.invoice_entries.push(entry);
    }

    /// The same invoice stored under `id`.
    pub fn with_id(mut self, id: InvoiceId) -> Self {
        self.id = Some(id);
        self
    }

    /// The same invoice with its identifier cleared.
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    pub fn id(&self) -> Option<InvoiceId> {
        self.id
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn seller(&self) -> &Company {
        &self.seller
    }

    pub fn buyer(&self) -> &Company {
        &self.buyer
    }

    pub fn invoice_entries(&self) -> &[InvoiceEntry] {
        &self.invoice_entries
    }
}

/// An invoice as received from a client, before validation.
///
/// Required parts are optional and strings default to empty so that every
/// missing or malformed field is reported by [`InvoiceValidator`] rather than by
/// the JSON decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<InvoiceId>,
    pub invoice_number: String,
    pub date: Option<NaiveDate>,
    pub seller: Option<Company>,
    pub buyer: Option<Company>,
    pub invoice_entries: Vec<InvoiceEntry>,
}

impl InvoiceDraft {
    /// Run [`InvoiceValidator`] and turn the draft into an [`Invoice`].
    ///
    /// The draft's `id` is carried over unchanged.
    pub fn validate(self) -> DomainResult<Invoice> {
        let violations = InvoiceValidator.validate(&self);
        if !violations.is_empty() {
            return Err(DomainError::validation(violations));
        }

        let InvoiceDraft {
            id,
            invoice_number,
            date: Some(date),
            seller: Some(seller),
            buyer: Some(buyer),
            invoice_entries,
        } = self
        else {
            return Err(DomainError::validation(vec![
                "Invoice is missing required parts".to_string(),
            ]));
        };

        Ok(Invoice {
            id,
            invoice_number,
            date,
            seller,
            buyer,
            invoice_entries,
        })
    }
}

impl From<Invoice> for InvoiceDraft {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            date: Some(invoice.date),
            seller: Some(invoice.seller),
            buyer: Some(invoice.buyer),
            invoice_entries: invoice.invoice_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;

    fn seller() -> Company {
        Company::new(
            "XYZ",
            "111-111-11-11",
            Address::new("Baker Street 1/2", "12-345", "Warsaw"),
        )
    }

    fn buyer() -> Company {
        Company::new(
            "QAZ",
            "222-222-22-22",
            Address::with_country("Main Street 5", "54-321", "Berlin", "DE"),
        )
    }

    fn sample_invoice() -> Invoice {
        Invoice::new(
            "inv1",
            NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            seller(),
            buyer(),
        )
        .with_entry("Kiwi", 10, Decimal::new(12523, 2), Vat::Vat23)
        .with_entry("Jablka", 100, Decimal::new(199, 2), Vat::Vat8)
    }

    #[test]
    fn new_invoice_has_no_id_until_stored() {
        let invoice = sample_invoice();
        assert_eq!(invoice.id(), None);
        let stored = invoice.with_id(InvoiceId::new(3));
        assert_eq!(stored.id(), Some(InvoiceId::new(3)));
        assert_eq!(stored.without_id().id(), None);
    }

    #[test]
    fn entries_keep_insertion_order() {
        let invoice = sample_invoice();
        let names: Vec<_> = invoice
            .invoice_entries()
            .iter()
            .map(|e| e.description().to_string())
            .collect();
        assert_eq!(names, vec!["Kiwi", "Jablka"]);
    }

    #[test]
    fn json_uses_camel_case_and_iso_dates() {
        let json = serde_json::to_value(sample_invoice().with_id(InvoiceId::new(1))).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["invoiceNumber"], "inv1");
        assert_eq!(json["date"], "2019-01-01");
        assert_eq!(json["seller"]["taxIdentificationNumber"], "111-111-11-11");
        assert_eq!(json["invoiceEntries"][0]["vatRate"], "VAT_23");
        assert_eq!(json["invoiceEntries"][0]["vatValue"], "28.8029");
    }

    #[test]
    fn json_round_trip_preserves_invoice() {
        let invoice = sample_invoice().with_id(InvoiceId::new(9));
        let line = serde_json::to_string(&invoice).unwrap();
        let back: Invoice = serde_json::from_str(&line).unwrap();
        assert_eq!(back, invoice);
    }

    #[test]
    fn valid_draft_becomes_invoice() {
        let draft = InvoiceDraft::from(sample_invoice());
        let invoice = draft.validate().unwrap();
        assert_eq!(invoice, sample_invoice());
    }

    #[test]
    fn empty_draft_reports_every_missing_part() {
        let err = InvoiceDraft::default().validate().unwrap_err();
        assert_eq!(
            err.violations(),
            &[
                "Invoice number must not be null or empty".to_string(),
                "Buyer must not be null".to_string(),
                "Seller must not be null".to_string(),
                "Invoice date must not be null".to_string(),
                "Invoice entries must not be null or empty".to_string(),
            ]
        );
    }

    #[test]
    fn draft_decodes_from_partial_json() {
        let draft: InvoiceDraft =
            serde_json::from_str(r#"{"invoiceNumber":"inv7","date":"2020-05-17"}"#).unwrap();
        assert_eq!(draft.invoice_number, "inv7");
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2020, 5, 17));
        assert!(draft.seller.is_none());
        assert!(draft.invoice_entries.is_empty());
    }
}
