use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use invoicebook_core::InvoiceId;
use invoicebook_invoicing::Invoice;

use super::file_helper;
use super::{DatabaseError, DatabaseResult, InvoiceDatabase};

/// Flat-file invoice store: one JSON object per line.
///
/// Saves append a line; updates and deletes rewrite the whole file. The last
/// assigned id is also kept in a `<file>.seq` sidecar so that deleting the most
/// recent invoice never frees its id, even across restarts.
///
/// Operations are serialized within the process. Nothing guards the file
/// against a second process writing to it.
#[derive(Debug)]
pub struct InFileDatabase {
    path: PathBuf,
    seq_path: PathBuf,
    next_id: Mutex<InvoiceId>,
}

impl InFileDatabase {
    /// Open (creating if needed) the store at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> DatabaseResult<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(DatabaseError::InvalidArgument(
                "database file path must not be empty".to_string(),
            ));
        }
        file_helper::ensure_exists(&path).await?;

        let seq_path = sequence_path(&path);
        let last_in_file = match file_helper::last_line(&path).await? {
            Some((line_number, line)) => decode(&line, line_number)?
                .id()
                .map(InvoiceId::get)
                .unwrap_or(0),
            None => 0,
        };
        let last_issued = read_sequence(&seq_path).await?;
        let next_id = InvoiceId::new(last_in_file.max(last_issued) + 1);

        tracing::info!(path = %path.display(), next_id = %next_id, "opened invoice file");
        Ok(Self {
            path,
            seq_path,
            next_id: Mutex::new(next_id),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> DatabaseResult<BTreeMap<InvoiceId, Invoice>> {
        let mut invoices = BTreeMap::new();
        for (index, line) in file_helper::read_lines(&self.path).await?.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let invoice = decode(line, index + 1)?;
            let Some(id) = invoice.id() else {
                return Err(DatabaseError::Corrupted {
                    line: index + 1,
                    message: "record has no id".to_string(),
                });
            };
            invoices.insert(id, invoice);
        }
        Ok(invoices)
    }

    async fn store(&self, invoices: &BTreeMap<InvoiceId, Invoice>) -> DatabaseResult<()> {
        let lines = invoices
            .values()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        file_helper::write_lines(&self.path, &lines, false).await?;
        Ok(())
    }
}

#[async_trait]
impl InvoiceDatabase for InFileDatabase {
    async fn save(&self, invoice: Invoice) -> DatabaseResult<InvoiceId> {
        let mut next_id = self.next_id.lock().await;
        let id = *next_id;
        let line = serde_json::to_string(&invoice.with_id(id))?;

        tokio::fs::write(&self.seq_path, id.to_string()).await?;
        file_helper::write_lines(&self.path, &[line], true).await?;
        *next_id = id.next();

        tracing::debug!(invoice_id = %id, path = %self.path.display(), "invoice appended");
        Ok(id)
    }

    async fn get_by_id(&self, id: InvoiceId) -> DatabaseResult<Option<Invoice>> {
        let _guard = self.next_id.lock().await;
        Ok(self.load().await?.remove(&id))
    }

    async fn list(&self) -> DatabaseResult<Vec<Invoice>> {
        let _guard = self.next_id.lock().await;
        Ok(self.load().await?.into_values().collect())
    }

    async fn update(&self, id: InvoiceId, invoice: Invoice) -> DatabaseResult<bool> {
        let _guard = self.next_id.lock().await;
        let mut invoices = self.load().await?;
        let Some(slot) = invoices.get_mut(&id) else {
            return Ok(false);
        };
        *slot = invoice.with_id(id);
        self.store(&invoices).await?;
        Ok(true)
    }

    async fn delete(&self, id: InvoiceId) -> DatabaseResult<bool> {
        let _guard = self.next_id.lock().await;
        let mut invoices = self.load().await?;
        if invoices.remove(&id).is_none() {
            return Ok(false);
        }
        self.store(&invoices).await?;
        Ok(true)
    }
}

fn decode(line: &str, line_number: usize) -> DatabaseResult<Invoice> {
    serde_json::from_str(line).map_err(|e| DatabaseError::Corrupted {
        line: line_number,
        message: e.to_string(),
    })
}

fn sequence_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".seq");
    PathBuf::from(name)
}

async fn read_sequence(path: &Path) -> DatabaseResult<u64> {
    if !tokio::fs::try_exists(path).await? {
        return Ok(0);
    }
    let raw = tokio::fs::read_to_string(path).await?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse().map_err(|_| DatabaseError::Corrupted {
        line: 1,
        message: format!("invalid id sequence `{raw}` in {}", path.display()),
    })
}
