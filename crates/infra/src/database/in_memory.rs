use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use invoicebook_core::InvoiceId;
use invoicebook_invoicing::Invoice;

use super::{DatabaseError, DatabaseResult, InvoiceDatabase};

#[derive(Debug)]
struct State {
    invoices: BTreeMap<InvoiceId, Invoice>,
    next_id: InvoiceId,
}

impl Default for State {
    fn default() -> Self {
        Self {
            invoices: BTreeMap::new(),
            next_id: InvoiceId::FIRST,
        }
    }
}

/// In-memory invoice store.
///
/// Intended for tests/dev. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    state: RwLock<State>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn write<T>(&self, f: impl FnOnce(&mut State) -> T) -> DatabaseResult<T> {
        let mut state = self.state.write().map_err(|_| DatabaseError::Poisoned)?;
        Ok(f(&mut state))
    }

    fn read<T>(&self, f: impl FnOnce(&State) -> T) -> DatabaseResult<T> {
        let state = self.state.read().map_err(|_| DatabaseError::Poisoned)?;
        Ok(f(&state))
    }
}

#[async_trait]
impl InvoiceDatabase for InMemoryDatabase {
    async fn save(&self, invoice: Invoice) -> DatabaseResult<InvoiceId> {
        let id = self.write(|state| {
            let id = state.next_id;
            state.next_id = id.next();
            state.invoices.insert(id, invoice.with_id(id));
            id
        })?;
        tracing::debug!(invoice_id = %id, "invoice stored in memory");
        Ok(id)
    }

    async fn get_by_id(&self, id: InvoiceId) -> DatabaseResult<Option<Invoice>> {
        self.read(|state| state.invoices.get(&id).cloned())
    }

    async fn list(&self) -> DatabaseResult<Vec<Invoice>> {
        self.read(|state| state.invoices.values().cloned().collect())
    }

    async fn update(&self, id: InvoiceId, invoice: Invoice) -> DatabaseResult<bool> {
        self.write(|state| match state.invoices.get_mut(&id) {
            Some(slot) => {
                *slot = invoice.with_id(id);
                true
            }
            None => false,
        })
    }

    async fn delete(&self, id: InvoiceId) -> DatabaseResult<bool> {
        self.write(|state| state.invoices.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::contract;

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        contract::save_assigns_sequential_ids(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        contract::ids_are_not_reused_after_delete(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        contract::list_is_ordered_by_id(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn update_replaces_under_path_id() {
        contract::update_replaces_under_path_id(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn unknown_ids_report_false() {
        contract::unknown_ids_report_false(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn delete_removes() {
        contract::delete_removes(&InMemoryDatabase::new()).await;
    }

    #[tokio::test]
    async fn usable_through_shared_handle() {
        let db = std::sync::Arc::new(InMemoryDatabase::new());
        let id = db.save(contract::invoice("inv1")).await.unwrap();
        assert_eq!(db.list().await.unwrap().len(), 1);
        assert!(db.get_by_id(id).await.unwrap().is_some());
    }
}
