use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use invoicebook_core::InvoiceId;
use invoicebook_invoicing::Invoice;

use super::sql::{from_sql_id, memory_pool, to_sql_id};
use super::{DatabaseError, DatabaseResult, InvoiceDatabase};

/// Document invoice store: each invoice is kept whole as one JSON document in
/// the `invoice_documents` collection table.
#[derive(Debug, Clone)]
pub struct DocumentDatabase {
    pool: SqlitePool,
}

impl DocumentDatabase {
    pub async fn connect(url: &str) -> DatabaseResult<Self> {
        let pool = SqlitePoolOptions::new().connect(url).await?;
        Self::with_pool(pool).await
    }

    pub async fn in_memory() -> DatabaseResult<Self> {
        Self::with_pool(memory_pool().await?).await
    }

    pub async fn with_pool(pool: SqlitePool) -> DatabaseResult<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS invoice_documents (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                document TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }
}

fn decode(id: i64, document: &str) -> DatabaseResult<Invoice> {
    let invoice: Invoice = serde_json::from_str(document)
        .map_err(|e| DatabaseError::InvalidRow(format!("document {id}: {e}")))?;
    Ok(invoice.with_id(from_sql_id(id)?))
}

#[async_trait]
impl InvoiceDatabase for DocumentDatabase {
    async fn save(&self, invoice: Invoice) -> DatabaseResult<InvoiceId> {
        let mut tx = self.pool.begin().await?;
        let id = sqlx::query("INSERT INTO invoice_documents (document) VALUES ('{}')")
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
        let invoice_id = from_sql_id(id)?;

        let document = serde_json::to_string(&invoice.with_id(invoice_id))?;
        sqlx::query("UPDATE invoice_documents SET document = ?1 WHERE id = ?2")
            .bind(document)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::debug!(invoice_id = %invoice_id, "invoice document inserted");
        Ok(invoice_id)
    }

    async fn get_by_id(&self, id: InvoiceId) -> DatabaseResult<Option<Invoice>> {
        let sql_id = to_sql_id(id)?;
        let document: Option<String> =
            sqlx::query_scalar("SELECT document FROM invoice_documents WHERE id = ?1")
                .bind(sql_id)
                .fetch_optional(&self.pool)
                .await?;
        document.map(|d| decode(sql_id, &d)).transpose()
    }

    async fn list(&self) -> DatabaseResult<Vec<Invoice>> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, document FROM invoice_documents ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(|(id, d)| decode(*id, d)).collect()
    }

    async fn update(&self, id: InvoiceId, invoice: Invoice) -> DatabaseResult<bool> {
        let document = serde_json::to_string(&invoice.with_id(id))?;
        let updated = sqlx::query("UPDATE invoice_documents SET document = ?1 WHERE id = ?2")
            .bind(document)
            .bind(to_sql_id(id)?)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(updated > 0)
    }

    async fn delete(&self, id: InvoiceId) -> DatabaseResult<bool> {
        let deleted = sqlx::query("DELETE FROM invoice_documents WHERE id = ?1")
            .bind(to_sql_id(id)?)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::contract;

    async fn fresh() -> DocumentDatabase {
        DocumentDatabase::in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        contract::save_assigns_sequential_ids(&fresh().await).await;
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        contract::ids_are_not_reused_after_delete(&fresh().await).await;
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        contract::list_is_ordered_by_id(&fresh().await).await;
    }

    #[tokio::test]
    async fn update_replaces_under_path_id() {
        contract::update_replaces_under_path_id(&fresh().await).await;
    }

    #[tokio::test]
    async fn unknown_ids_report_false() {
        contract::unknown_ids_report_false(&fresh().await).await;
    }

    #[tokio::test]
    async fn delete_removes() {
        contract::delete_removes(&fresh().await).await;
    }

    #[tokio::test]
    async fn stores_camel_case_document() {
        let db = fresh().await;
        let id = db.save(contract::invoice("inv1")).await.unwrap();
        let document: String =
            sqlx::query_scalar("SELECT document FROM invoice_documents WHERE id = ?1")
                .bind(to_sql_id(id).unwrap())
                .fetch_one(&db.pool)
                .await
                .unwrap();
        let value: serde_json::Value = serde_json::from_str(&document).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["seller"]["taxIdentificationNumber"], "111-222-33-44");
    }
}
