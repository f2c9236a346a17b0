//! Invoice storage.
//!
//! [`InvoiceDatabase`] is the storage contract the service layer talks to. All
//! backends agree on the same semantics:
//!
//! - ids are assigned on save, sequentially from 1, and never reused after a
//!   delete (also across reopening a persistent backend);
//! - `update`/`delete` of an unknown id return `false` and change nothing;
//! - `update` stores the invoice under the given id.

mod document;
mod factory;
pub mod file_helper;
mod in_file;
mod in_memory;
mod sql;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use invoicebook_core::InvoiceId;
use invoicebook_invoicing::Invoice;

pub use document::DocumentDatabase;
pub use factory::{open_database, DatabaseConfig, DatabaseKind};
pub use in_file::InFileDatabase;
pub use in_memory::InMemoryDatabase;
pub use sql::SqlDatabase;

pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupted record at line {line}: {message}")]
    Corrupted { line: usize, message: String },

    #[error("invalid row: {0}")]
    InvalidRow(String),

    #[error("sql error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("lock poisoned")]
    Poisoned,
}

/// Storage contract for invoices.
#[async_trait]
pub trait InvoiceDatabase: Send + Sync {
    /// Store a new invoice and return the id assigned to it.
    ///
    /// Any id carried by `invoice` is ignored.
    async fn save(&self, invoice: Invoice) -> DatabaseResult<InvoiceId>;

    async fn get_by_id(&self, id: InvoiceId) -> DatabaseResult<Option<Invoice>>;

    /// All invoices ordered by id.
    async fn list(&self) -> DatabaseResult<Vec<Invoice>>;

    /// Replace the invoice stored under `id`; `false` when there is none.
    async fn update(&self, id: InvoiceId, invoice: Invoice) -> DatabaseResult<bool>;

    /// Remove the invoice stored under `id`; `false` when there is none.
    async fn delete(&self, id: InvoiceId) -> DatabaseResult<bool>;
}

#[async_trait]
impl<S> InvoiceDatabase for Arc<S>
where
    S: InvoiceDatabase + ?Sized,
{
    async fn save(&self, invoice: Invoice) -> DatabaseResult<InvoiceId> {
        (**self).save(invoice).await
    }

    async fn get_by_id(&self, id: InvoiceId) -> DatabaseResult<Option<Invoice>> {
        (**self).get_by_id(id).await
    }

    async fn list(&self) -> DatabaseResult<Vec<Invoice>> {
        (**self).list().await
    }

    async fn update(&self, id: InvoiceId, invoice: Invoice) -> DatabaseResult<bool> {
        (**self).update(id, invoice).await
    }

    async fn delete(&self, id: InvoiceId) -> DatabaseResult<bool> {
        (**self).delete(id).await
    }
}

/// Shared contract checks run against every backend.
#[cfg(test)]
pub(crate) mod contract {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use invoicebook_core::InvoiceId;
    use invoicebook_invoicing::{Address, Company, Invoice, Vat};

    use super::InvoiceDatabase;

    pub fn invoice(number: &str) -> Invoice {
        let seller = Company::new(
            "Seller Ltd",
            "111-222-33-44",
            Address::new("Long Street 7", "00-950", "Warsaw"),
        );
        let buyer = Company::new(
            "Buyer SA",
            "123-456-78-90",
            Address::with_country("Harbour Road 2", "80-001", "Gdansk", "PL"),
        );
        Invoice::new(
            number,
            NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            seller,
            buyer,
        )
        .with_entry("Tire", 10, Decimal::new(12523, 2), Vat::Vat23)
        .with_entry("Oil", 100, Decimal::new(199, 2), Vat::Vat8)
    }

    pub async fn save_assigns_sequential_ids(db: &dyn InvoiceDatabase) {
        let first = db.save(invoice("inv1")).await.unwrap();
        let second = db.save(invoice("inv2")).await.unwrap();
        assert_eq!(first, InvoiceId::new(1));
        assert_eq!(second, InvoiceId::new(2));

        let stored = db.get_by_id(second).await.unwrap().unwrap();
        assert_eq!(stored, invoice("inv2").with_id(second));
    }

    pub async fn ids_are_not_reused_after_delete(db: &dyn InvoiceDatabase) {
        let first = db.save(invoice("inv1")).await.unwrap();
        let second = db.save(invoice("inv2")).await.unwrap();
        assert!(db.delete(second).await.unwrap());

        let third = db.save(invoice("inv3")).await.unwrap();
        assert!(third > second);
        assert!(second > first);
        assert!(db.get_by_id(second).await.unwrap().is_none());
    }

    pub async fn list_is_ordered_by_id(db: &dyn InvoiceDatabase) {
        assert!(db.list().await.unwrap().is_empty());
        for number in ["a", "b", "c"] {
            db.save(invoice(number)).await.unwrap();
        }
        let numbers: Vec<String> = db
            .list()
            .await
            .unwrap()
            .iter()
            .map(|i| i.invoice_number().to_string())
            .collect();
        assert_eq!(numbers, vec!["a", "b", "c"]);
    }

    pub async fn update_replaces_under_path_id(db: &dyn InvoiceDatabase) {
        let id = db.save(invoice("inv1")).await.unwrap();
        let other = db.save(invoice("inv2")).await.unwrap();

        let replacement = invoice("inv1-corrected").with_id(other);
        assert!(db.update(id, replacement).await.unwrap());

        let stored = db.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.id(), Some(id));
        assert_eq!(stored.invoice_number(), "inv1-corrected");
        assert_eq!(
            db.get_by_id(other).await.unwrap().unwrap().invoice_number(),
            "inv2"
        );
    }

    pub async fn unknown_ids_report_false(db: &dyn InvoiceDatabase) {
        let id = db.save(invoice("inv1")).await.unwrap();
        let missing = InvoiceId::new(99);

        assert!(!db.update(missing, invoice("ghost")).await.unwrap());
        assert!(!db.delete(missing).await.unwrap());
        assert!(db.get_by_id(missing).await.unwrap().is_none());

        let all = db.list().await.unwrap();
        assert_eq!(all, vec![invoice("inv1").with_id(id)]);
    }

    pub async fn delete_removes(db: &dyn InvoiceDatabase) {
        let id = db.save(invoice("inv1")).await.unwrap();
        assert!(db.delete(id).await.unwrap());
        assert!(db.get_by_id(id).await.unwrap().is_none());
        assert!(!db.delete(id).await.unwrap());
    }
}
