use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use invoicebook_core::InvoiceId;
use invoicebook_invoicing::{Address, Company, Invoice, InvoiceEntry, Vat};

use super::{DatabaseError, DatabaseResult, InvoiceDatabase};

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS address (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        street_address TEXT NOT NULL,
        postal_code    TEXT NOT NULL,
        city           TEXT NOT NULL,
        country_code   TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS company (
        id                        INTEGER PRIMARY KEY AUTOINCREMENT,
        name                      TEXT NOT NULL,
        tax_identification_number TEXT NOT NULL,
        address_id                INTEGER NOT NULL REFERENCES address(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoice (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        invoice_number TEXT NOT NULL,
        date           TEXT NOT NULL,
        seller_id      INTEGER NOT NULL REFERENCES company(id),
        buyer_id       INTEGER NOT NULL REFERENCES company(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoice_entry (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        invoice_id  INTEGER NOT NULL REFERENCES invoice(id),
        position    INTEGER NOT NULL,
        description TEXT NOT NULL,
        quantity    INTEGER NOT NULL,
        value       TEXT NOT NULL,
        vat_rate    TEXT NOT NULL,
        vat_value   TEXT NOT NULL
    )
    "#,
];

/// Relational invoice store over normalized `address`, `company`, `invoice`
/// and `invoice_entry` tables.
///
/// Every seller and buyer gets its own company and address rows. Mutations run
/// in a single transaction each; `AUTOINCREMENT` keeps deleted ids retired.
#[derive(Debug, Clone)]
pub struct SqlDatabase {
    pool: SqlitePool,
}

impl SqlDatabase {
    /// Connect to `url` and create the schema when missing.
    pub async fn connect(url: &str) -> DatabaseResult<Self> {
        let pool = SqlitePoolOptions::new().connect(url).await?;
        Self::with_pool(pool).await
    }

    /// A private in-memory database.
    pub async fn in_memory() -> DatabaseResult<Self> {
        let pool = memory_pool().await?;
        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> DatabaseResult<Self> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }
}

/// Single long-lived connection, since every sqlite `:memory:` connection is
/// its own database.
pub(crate) async fn memory_pool() -> DatabaseResult<SqlitePool> {
    Ok(SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect("sqlite::memory:")
        .await?)
}

pub(crate) fn to_sql_id(id: InvoiceId) -> DatabaseResult<i64> {
    i64::try_from(id.get())
        .map_err(|_| DatabaseError::InvalidArgument(format!("invoice id {id} is out of range")))
}

pub(crate) fn from_sql_id(id: i64) -> DatabaseResult<InvoiceId> {
    u64::try_from(id)
        .map(InvoiceId::new)
        .map_err(|_| DatabaseError::InvalidRow(format!("negative invoice id {id}")))
}

async fn insert_company(conn: &mut SqliteConnection, company: &Company) -> DatabaseResult<i64> {
    let address = &company.address;
    let address_id = sqlx::query(
        "INSERT INTO address (street_address, postal_code, city, country_code) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&address.street_address)
    .bind(&address.postal_code)
    .bind(&address.city)
    .bind(&address.country_code)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    let company_id = sqlx::query(
        "INSERT INTO company (name, tax_identification_number, address_id) VALUES (?1, ?2, ?3)",
    )
    .bind(&company.name)
    .bind(&company.tax_identification_number)
    .bind(address_id)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(company_id)
}

async fn insert_entries(
    conn: &mut SqliteConnection,
    invoice_id: i64,
    entries: &[InvoiceEntry],
) -> DatabaseResult<()> {
    for (position, entry) in entries.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO invoice_entry
                (invoice_id, position, description, quantity, value, vat_rate, vat_value)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(invoice_id)
        .bind(position as i64)
        .bind(entry.description())
        .bind(entry.quantity())
        .bind(entry.value().to_string())
        .bind(entry.vat_rate().as_str())
        .bind(entry.vat_value().to_string())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Seller and buyer company ids of an invoice.
async fn party_ids(conn: &mut SqliteConnection, invoice_id: i64) -> DatabaseResult<Option<[i64; 2]>> {
    let Some(row) = sqlx::query("SELECT seller_id, buyer_id FROM invoice WHERE id = ?1")
        .bind(invoice_id)
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };
    Ok(Some([row.try_get("seller_id")?, row.try_get("buyer_id")?]))
}

/// Remove companies and their addresses. No invoice may still reference them.
async fn delete_companies(conn: &mut SqliteConnection, company_ids: [i64; 2]) -> DatabaseResult<()> {
    for company_id in company_ids {
        let address_id: Option<i64> =
            sqlx::query_scalar("SELECT address_id FROM company WHERE id = ?1")
                .bind(company_id)
                .fetch_optional(&mut *conn)
                .await?;
        sqlx::query("DELETE FROM company WHERE id = ?1")
            .bind(company_id)
            .execute(&mut *conn)
            .await?;
        if let Some(address_id) = address_id {
            sqlx::query("DELETE FROM address WHERE id = ?1")
                .bind(address_id)
                .execute(&mut *conn)
                .await?;
        }
    }
    Ok(())
}

async fn load_company(conn: &mut SqliteConnection, company_id: i64) -> DatabaseResult<Company> {
    let row = sqlx::query(
        r#"
        SELECT c.name, c.tax_identification_number,
               a.street_address, a.postal_code, a.city, a.country_code
        FROM company c
        JOIN address a ON a.id = c.address_id
        WHERE c.id = ?1
        "#,
    )
    .bind(company_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DatabaseError::InvalidRow(format!("company {company_id} is missing")))?;

    Ok(Company::new(
        row.try_get::<String, _>("name")?,
        row.try_get::<String, _>("tax_identification_number")?,
        Address::with_country(
            row.try_get::<String, _>("street_address")?,
            row.try_get::<String, _>("postal_code")?,
            row.try_get::<String, _>("city")?,
            row.try_get::<String, _>("country_code")?,
        ),
    ))
}

fn entry_from_row(row: &SqliteRow) -> DatabaseResult<InvoiceEntry> {
    let value: String = row.try_get("value")?;
    let value = Decimal::from_str(&value)
        .map_err(|e| DatabaseError::InvalidRow(format!("entry value `{value}`: {e}")))?;
    let vat_rate: String = row.try_get("vat_rate")?;
    let vat_rate = Vat::from_str(&vat_rate)
        .map_err(|e| DatabaseError::InvalidRow(format!("entry vat rate: {e}")))?;

    Ok(InvoiceEntry::new(
        row.try_get::<String, _>("description")?,
        row.try_get::<i32, _>("quantity")?,
        value,
        vat_rate,
    ))
}

async fn load_invoice(conn: &mut SqliteConnection, row: &SqliteRow) -> DatabaseResult<Invoice> {
    let id: i64 = row.try_get("id")?;
    let date: String = row.try_get("date")?;
    let date = NaiveDate::from_str(&date)
        .map_err(|e| DatabaseError::InvalidRow(format!("invoice {id} date `{date}`: {e}")))?;

    let seller = load_company(conn, row.try_get("seller_id")?).await?;
    let buyer = load_company(conn, row.try_get("buyer_id")?).await?;

    let mut invoice = Invoice::new(row.try_get::<String, _>("invoice_number")?, date, seller, buyer);
    let entries = sqlx::query(
        r#"
        SELECT description, quantity, value, vat_rate
        FROM invoice_entry
        WHERE invoice_id = ?1
        ORDER BY position
        "#,
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;
    for entry in &entries {
        invoice.add_entry(entry_from_row(entry)?);
    }

    Ok(invoice.with_id(from_sql_id(id)?))
}

const SELECT_INVOICE: &str = "SELECT id, invoice_number, date, seller_id, buyer_id FROM invoice";

#[async_trait]
impl InvoiceDatabase for SqlDatabase {
    async fn save(&self, invoice: Invoice) -> DatabaseResult<InvoiceId> {
        let mut tx = self.pool.begin().await?;

        let seller_id = insert_company(&mut tx, invoice.seller()).await?;
        let buyer_id = insert_company(&mut tx, invoice.buyer()).await?;
        let invoice_id = sqlx::query(
            "INSERT INTO invoice (invoice_number, date, seller_id, buyer_id) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(invoice.invoice_number())
        .bind(invoice.date().to_string())
        .bind(seller_id)
        .bind(buyer_id)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        insert_entries(&mut tx, invoice_id, invoice.invoice_entries()).await?;

        tx.commit().await?;
        let id = from_sql_id(invoice_id)?;
        tracing::debug!(invoice_id = %id, "invoice inserted");
        Ok(id)
    }

    async fn get_by_id(&self, id: InvoiceId) -> DatabaseResult<Option<Invoice>> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query(&format!("{SELECT_INVOICE} WHERE id = ?1"))
            .bind(to_sql_id(id)?)
            .fetch_optional(&mut *conn)
            .await?;
        match row {
            Some(row) => Ok(Some(load_invoice(&mut conn, &row).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> DatabaseResult<Vec<Invoice>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(&format!("{SELECT_INVOICE} ORDER BY id"))
            .fetch_all(&mut *conn)
            .await?;
        let mut invoices = Vec::with_capacity(rows.len());
        for row in &rows {
            invoices.push(load_invoice(&mut conn, row).await?);
        }
        Ok(invoices)
    }

    // Mutations write before they read so the transaction holds the write
    // lock from its first statement; a deferred read lock cannot be upgraded
    // while another connection is writing.
    async fn update(&self, id: InvoiceId, invoice: Invoice) -> DatabaseResult<bool> {
        let sql_id = to_sql_id(id)?;
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE invoice SET invoice_number = ?1, date = ?2 WHERE id = ?3")
            .bind(invoice.invoice_number())
            .bind(invoice.date().to_string())
            .bind(sql_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Ok(false);
        }
        let old_parties = party_ids(&mut tx, sql_id)
            .await?
            .ok_or_else(|| DatabaseError::InvalidRow(format!("invoice {id} vanished")))?;

        let seller_id = insert_company(&mut tx, invoice.seller()).await?;
        let buyer_id = insert_company(&mut tx, invoice.buyer()).await?;
        sqlx::query("UPDATE invoice SET seller_id = ?1, buyer_id = ?2 WHERE id = ?3")
            .bind(seller_id)
            .bind(buyer_id)
            .bind(sql_id)
            .execute(&mut *tx)
            .await?;
        delete_companies(&mut tx, old_parties).await?;

        sqlx::query("DELETE FROM invoice_entry WHERE invoice_id = ?1")
            .bind(sql_id)
            .execute(&mut *tx)
            .await?;
        insert_entries(&mut tx, sql_id, invoice.invoice_entries()).await?;

        tx.commit().await?;
        tracing::debug!(invoice_id = %id, "invoice updated");
        Ok(true)
    }

    async fn delete(&self, id: InvoiceId) -> DatabaseResult<bool> {
        let sql_id = to_sql_id(id)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM invoice_entry WHERE invoice_id = ?1")
            .bind(sql_id)
            .execute(&mut *tx)
            .await?;
        let Some(parties) = party_ids(&mut tx, sql_id).await? else {
            return Ok(false);
        };
        sqlx::query("DELETE FROM invoice WHERE id = ?1")
            .bind(sql_id)
            .execute(&mut *tx)
            .await?;
        delete_companies(&mut tx, parties).await?;

        tx.commit().await?;
        tracing::debug!(invoice_id = %id, "invoice deleted");
        Ok(true)
    }
}
