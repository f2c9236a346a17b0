use crate::invoice::InvoiceDraft;

use super::{is_blank, CompanyValidator, InvoiceEntryValidator, Validator};

/// Checks an incoming invoice: number, buyer, seller, date, then entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceValidator;

impl Validator<InvoiceDraft> for InvoiceValidator {
    fn validate(&self, invoice: &InvoiceDraft) -> Vec<String> {
        let mut result = Vec::new();

        if is_blank(&invoice.invoice_number) {
            tracing::warn!("parameter invoiceNumber cannot be null or empty");
            result.push("Invoice number must not be null or empty".to_string());
        }

        match &invoice.buyer {
            Some(buyer) => result.extend(CompanyValidator.validate(buyer)),
            None => {
                tracing::warn!("parameter buyer cannot be null");
                result.push("Buyer must not be null".to_string());
            }
        }

        match &invoice.seller {
            Some(seller) => result.extend(CompanyValidator.validate(seller)),
            None => {
                tracing::warn!("parameter seller cannot be null");
                result.push("Seller must not be null".to_string());
            }
        }

        if invoice.date.is_none() {
            tracing::warn!("parameter date cannot be null");
            result.push("Invoice date must not be null".to_string());
        }

        if invoice.invoice_entries.is_empty() {
            tracing::warn!("parameter invoiceEntries cannot be null or empty");
            result.push("Invoice entries must not be null or empty".to_string());
        } else {
            for entry in &invoice.invoice_entries {
                result.extend(InvoiceEntryValidator.validate(entry));
            }
        }

        result
    }
}
